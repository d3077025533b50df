use ffbin_fetch::{Source, SourceList};

/// How the caller wants the first source chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceChoice {
    /// Only the upstream host, no speed test.
    DirectOnly,
    /// This 1-based list position first, then the rest in order.
    Pinned(usize),
    /// Speed-test and lead with the winner.
    Auto,
}

impl SourceChoice {
    /// Interpret a user-supplied index: `0` is direct only, `1..=len`
    /// pins a source, anything else (including none) means auto.
    pub fn from_index(index: Option<usize>, len: usize) -> Self {
        match index {
            Some(0) => SourceChoice::DirectOnly,
            Some(i) if i <= len => SourceChoice::Pinned(i),
            _ => SourceChoice::Auto,
        }
    }

    pub fn needs_selection(&self) -> bool {
        matches!(self, SourceChoice::Auto)
    }
}

/// Order in which sources are attempted.
///
/// `winner` is only consulted for [`SourceChoice::Auto`]; with no winner
/// the configured order is used unchanged.
pub fn plan_candidates(sources: &SourceList, choice: SourceChoice, winner: Option<&Source>) -> Vec<Source> {
    let lead = match choice {
        SourceChoice::DirectOnly => return vec![sources.direct().clone()],
        SourceChoice::Pinned(index) => sources.get_one_based(index),
        SourceChoice::Auto => winner,
    };

    match lead {
        Some(lead) => std::iter::once(lead)
            .chain(sources.iter().filter(|s| *s != lead))
            .cloned()
            .collect(),
        None => sources.as_slice().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(candidates: &[Source]) -> Vec<&str> {
        candidates.iter().map(|s| s.name.as_str()).collect()
    }

    fn list() -> SourceList {
        SourceList::new([
            Source::proxy("a", "https://a.example/"),
            Source::proxy("b", "https://b.example/"),
            Source::proxy("c", "https://c.example/"),
        ])
    }

    #[test]
    fn index_interpretation() {
        assert_eq!(SourceChoice::from_index(Some(0), 4), SourceChoice::DirectOnly);
        assert_eq!(SourceChoice::from_index(Some(1), 4), SourceChoice::Pinned(1));
        assert_eq!(SourceChoice::from_index(Some(4), 4), SourceChoice::Pinned(4));
        assert_eq!(SourceChoice::from_index(Some(5), 4), SourceChoice::Auto);
        assert_eq!(SourceChoice::from_index(None, 4), SourceChoice::Auto);
    }

    #[test]
    fn direct_only_is_single_candidate() {
        let plan = plan_candidates(&list(), SourceChoice::DirectOnly, None);
        assert_eq!(names(&plan), ["github"]);
    }

    #[test]
    fn pinned_leads_then_configured_order() {
        let plan = plan_candidates(&list(), SourceChoice::Pinned(3), None);
        assert_eq!(names(&plan), ["b", "github", "a", "c"]);
    }

    #[test]
    fn auto_winner_leads() {
        let sources = list();
        let winner = sources.mirrors()[2].clone();
        let plan = plan_candidates(&sources, SourceChoice::Auto, Some(&winner));
        assert_eq!(names(&plan), ["c", "github", "a", "b"]);
    }

    #[test]
    fn auto_without_winner_keeps_order() {
        let plan = plan_candidates(&list(), SourceChoice::Auto, None);
        assert_eq!(names(&plan), ["github", "a", "b", "c"]);
    }

    #[test]
    fn every_source_appears_once() {
        let sources = list();
        for index in 1..=sources.len() {
            let plan = plan_candidates(&sources, SourceChoice::Pinned(index), None);
            assert_eq!(plan.len(), sources.len());
        }
    }
}
