use crate::data::ProbeResult;

/// Pick the download source from a set of probe results.
///
/// The direct origin is the starting incumbent when its throughput is
/// positive. A mirror takes over only when it succeeded, has positive
/// throughput, and is strictly faster than the current best, so ties keep
/// whichever result was seen first.
pub fn choose_best<'a>(direct: &'a ProbeResult, mirrors: &'a [ProbeResult]) -> Option<&'a ProbeResult> {
    let mut best = direct.is_usable().then_some(direct);
    let mut best_speed = best.map_or(0.0, |r| r.throughput_bps);

    for result in mirrors.iter().filter(|r| r.is_usable()) {
        if result.throughput_bps > best_speed {
            best_speed = result.throughput_bps;
            best = Some(result);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Source;

    fn result(source: Source, throughput_bps: f64, succeeded: bool) -> ProbeResult {
        ProbeResult {
            source,
            throughput_bps,
            succeeded,
        }
    }

    fn mirror(name: &str, speed: f64) -> ProbeResult {
        result(Source::mirror(name, format!("https://{name}.example/")), speed, true)
    }

    #[test]
    fn fastest_mirror_wins() {
        let direct = result(Source::direct(), 100.0, true);
        let mirrors = [
            mirror("a", 50.0),
            mirror("b", 150.0),
            result(Source::mirror("c", "https://c.example/"), 0.0, false),
        ];
        let best = choose_best(&direct, &mirrors).unwrap();
        assert_eq!(best.source.name, "b");
    }

    #[test]
    fn tie_keeps_direct() {
        let direct = result(Source::direct(), 100.0, true);
        let mirrors = [mirror("a", 100.0)];
        assert!(choose_best(&direct, &mirrors).unwrap().source.is_direct());
    }

    #[test]
    fn tie_between_mirrors_keeps_first() {
        let direct = result(Source::direct(), 0.0, false);
        let mirrors = [mirror("a", 80.0), mirror("b", 80.0)];
        assert_eq!(choose_best(&direct, &mirrors).unwrap().source.name, "a");
    }

    #[test]
    fn nothing_usable() {
        let direct = result(Source::direct(), 0.0, false);
        let mirrors = [
            result(Source::mirror("a", "https://a.example/"), 0.0, false),
            mirror("b", 0.0),
        ];
        assert!(choose_best(&direct, &mirrors).is_none());
    }

    #[test]
    fn failed_mirror_with_speed_is_ignored() {
        let direct = result(Source::direct(), 0.0, false);
        let mirrors = [result(Source::mirror("a", "https://a.example/"), 500.0, false)];
        assert!(choose_best(&direct, &mirrors).is_none());
    }
}
