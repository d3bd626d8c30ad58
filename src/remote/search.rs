//! Catalog-wide compatibility search.
//!
//! Every catalog entry is fetched independently under a concurrency limit.
//! A failed fetch drops only that entry; the rest of the catalog is still
//! evaluated and results keep catalog order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::core::compat::{filter_candidates, DEFAULT_TOTAL_MARGIN};
use crate::data::record::AttributeRecord;
use crate::data::species::SpeciesStub;
use crate::data::stats::BaseStats;
use crate::error::{EngineError, Result};
use crate::service::AttributeService;

/// Shared flag a caller sets to abandon the fetches that have not started.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Debug)]
pub struct SearchOptions {
    pub concurrency: usize,
    pub total_margin: u32,
    pub cancel: Option<CancelFlag>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            concurrency: 8,
            total_margin: DEFAULT_TOTAL_MARGIN,
            cancel: None,
        }
    }
}

impl SearchOptions {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            concurrency: config.search_concurrency,
            total_margin: config.total_margin,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchReport {
    /// Passing identifiers in catalog order.
    pub candidates: Vec<String>,
    /// Entries whose fetch failed, in catalog order.
    pub failures: Vec<(String, EngineError)>,
    /// Number of entries whose record was fetched and tested.
    pub evaluated: usize,
    /// Set when cancellation skipped at least one fetch.
    pub cancelled: bool,
}

enum Outcome {
    Fetched(Result<AttributeRecord>),
    Skipped,
}

pub async fn find_candidates(
    service: Arc<dyn AttributeService>,
    catalog: &[SpeciesStub],
    reference: &BaseStats,
    exclude: &str,
) -> Vec<String> {
    find_candidates_with(service, catalog, reference, exclude, &SearchOptions::default())
        .await
        .candidates
}

pub async fn find_candidates_with(
    service: Arc<dyn AttributeService>,
    catalog: &[SpeciesStub],
    reference: &BaseStats,
    exclude: &str,
    options: &SearchOptions,
) -> SearchReport {
    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, stub) in catalog.iter().enumerate() {
        if stub.identifier == exclude {
            continue;
        }
        let service = Arc::clone(&service);
        let semaphore = Arc::clone(&semaphore);
        let cancel = options.cancel.clone();
        let identifier = stub.identifier.clone();
        tasks.spawn(async move {
            let outcome = match semaphore.acquire_owned().await {
                Ok(_permit) if !cancel.as_ref().is_some_and(CancelFlag::is_cancelled) => {
                    Outcome::Fetched(service.fetch_attributes(&identifier).await)
                }
                _ => Outcome::Skipped,
            };
            (index, identifier, outcome)
        });
    }

    let mut fetched: Vec<(usize, String, AttributeRecord)> = Vec::new();
    let mut failures: Vec<(usize, String, EngineError)> = Vec::new();
    let mut skipped = 0;
    while let Some(joined) = tasks.join_next().await {
        let (index, identifier, outcome) = match joined {
            Ok(done) => done,
            Err(e) => {
                warn!(error = %e, "search task failed to complete");
                continue;
            }
        };
        match outcome {
            Outcome::Fetched(Ok(record)) => {
                debug!(%identifier, "candidate fetched");
                fetched.push((index, identifier, record));
            }
            Outcome::Fetched(Err(err)) => {
                warn!(%identifier, error = %err, "skipping candidate");
                failures.push((index, identifier, err));
            }
            Outcome::Skipped => skipped += 1,
        }
    }

    fetched.sort_by_key(|(index, _, _)| *index);
    failures.sort_by_key(|(index, _, _)| *index);

    let candidates = filter_candidates(
        reference,
        fetched
            .iter()
            .map(|(_, identifier, record)| (identifier.as_str(), &record.base_stats)),
        exclude,
        options.total_margin,
    );
    let report = SearchReport {
        candidates,
        failures: failures
            .into_iter()
            .map(|(_, identifier, err)| (identifier, err))
            .collect(),
        evaluated: fetched.len(),
        cancelled: skipped > 0,
    };
    info!(
        matches = report.candidates.len(),
        evaluated = report.evaluated,
        failed = report.failures.len(),
        cancelled = report.cancelled,
        "compatibility search finished"
    );
    report
}
