use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::{choose_best, format_speed};
use crate::data::{ProbeOptions, ProbeResult, Source, SourceList};
use crate::effects::http::HttpClient;
use crate::effects::probe::probe;

/// Decides which source to try first.
///
/// The orchestrator only needs a winner; how it is found is up to the
/// implementation. Returning `None` means "no preference".
pub trait SourceSelector: Send + Sync {
    fn select(&self, sources: &SourceList) -> impl Future<Output = Option<Source>> + Send;
}

/// Every probe result from one selection round, plus the winner.
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    pub best: Option<Source>,
    /// Direct origin first, then mirrors in configured order.
    pub results: Vec<ProbeResult>,
}

impl Selection {
    /// Results ordered fastest first. Failed probes sink to the end, keeping
    /// their configured order.
    pub fn ranked(&self) -> Vec<&ProbeResult> {
        let mut ranked: Vec<_> = self.results.iter().collect();
        ranked.sort_by(|a, b| {
            b.is_usable()
                .cmp(&a.is_usable())
                .then(b.throughput_bps.total_cmp(&a.throughput_bps))
        });
        ranked
    }

    pub fn best_result(&self) -> Option<&ProbeResult> {
        let best = self.best.as_ref()?;
        self.results.iter().find(|r| &r.source == best)
    }
}

/// Selector that speed-tests every source.
///
/// The direct origin is probed first and on its own. Mirrors are then
/// probed together, interleaved on the current task.
#[derive(Clone)]
pub struct ProbeSelector<C> {
    client: C,
    options: ProbeOptions,
    on_probe: Option<Arc<dyn Fn(&ProbeResult) + Send + Sync>>,
    on_selection: Option<Arc<dyn Fn(&Selection) + Send + Sync>>,
}

impl<C> fmt::Debug for ProbeSelector<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeSelector")
            .field("options", &self.options)
            .field("on_probe", &"{ ... }")
            .field("on_selection", &"{ ... }")
            .finish_non_exhaustive()
    }
}

impl<C: HttpClient> ProbeSelector<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            options: ProbeOptions::default(),
            on_probe: None,
            on_selection: None,
        }
    }

    #[must_use]
    pub fn options(mut self, options: ProbeOptions) -> Self {
        self.options = options;
        self
    }

    /// Called once per finished probe. Has no say in the outcome.
    #[must_use]
    pub fn on_probe(mut self, on_probe: Arc<dyn Fn(&ProbeResult) + Send + Sync>) -> Self {
        self.on_probe = Some(on_probe);
        self
    }

    /// Called with the full round once a winner, if any, is known.
    #[must_use]
    pub fn on_selection(mut self, on_selection: Arc<dyn Fn(&Selection) + Send + Sync>) -> Self {
        self.on_selection = Some(on_selection);
        self
    }

    pub async fn select_best(&self, sources: &SourceList) -> Selection {
        let direct = self.probe_one(sources.direct()).await;
        let mirrors = join_all(sources.mirrors().iter().map(|source| self.probe_one(source))).await;

        let best = match choose_best(&direct, &mirrors) {
            Some(winner) => {
                info!(
                    source = %winner.source.name,
                    speed = %format_speed(winner.throughput_bps),
                    "selected fastest source"
                );
                Some(winner.source.clone())
            }
            None => {
                warn!("every speed test failed, falling back to configured order");
                None
            }
        };

        let mut results = Vec::with_capacity(sources.len());
        results.push(direct);
        results.extend(mirrors);
        let selection = Selection { best, results };

        for (rank, result) in selection.ranked().into_iter().enumerate() {
            debug!(
                rank = rank + 1,
                source = %result.source.name,
                speed = %format_speed(result.throughput_bps),
                usable = result.is_usable(),
                "speed test ranking"
            );
        }
        if let Some(callback) = &self.on_selection {
            callback(&selection);
        }
        selection
    }

    async fn probe_one(&self, source: &Source) -> ProbeResult {
        let result = probe(&self.client, source, &self.options).await;
        if let Some(callback) = &self.on_probe {
            callback(&result);
        }
        result
    }
}

impl<C: HttpClient> SourceSelector for ProbeSelector<C> {
    async fn select(&self, sources: &SourceList) -> Option<Source> {
        self.select_best(sources).await.best
    }
}
