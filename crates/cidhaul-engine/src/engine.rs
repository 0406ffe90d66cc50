use std::collections::HashSet;
use std::sync::Arc;

use cidhaul_core::{Cid, FileKind, discover, sniff};
use cidhaul_fetch::{FetchError, GatewayFetcher, HttpClient};
use futures_util::stream::{FuturesUnordered, StreamExt};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use crate::progress::ProgressSet;
use crate::store::Store;

/// One top-level unit of work: a display name and the identifier to
/// materialize. Work lists are not deduplicated at the source; the
/// existence check makes repeats cheap.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub name: String,
    pub cid: Cid,
}

/// Unrecoverable engine failures. Per-identifier fetch failures are
/// not errors — they surface as `Ok(false)` from [`Engine::process`]
/// and as the `failed` count in [`RunSummary`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("store write failed: {0}")]
    Store(#[source] std::io::Error),

    #[error("progress save failed: {0}")]
    Progress(#[source] std::io::Error),

    #[error("worker task failed: {0}")]
    Join(#[source] JoinError),
}

/// Counts for one batch run. `completed` and `failed` are tracked
/// separately so a re-run can tell "attempted and failed" apart from
/// "never attempted".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Top-level items handed to the worker pool.
    pub attempted: usize,
    /// Items whose root identifier is now on disk.
    pub completed: usize,
    /// Items whose root identifier exhausted every gateway attempt.
    pub failed: usize,
    /// Size of the progress set after the run, nested content
    /// included.
    pub total_unique: usize,
}

/// What one traversal step concluded about an identifier.
enum Step {
    /// On disk (newly fetched or pre-existing); expansion may have
    /// produced new frontier entries.
    Materialized(HashSet<Cid>),
    /// The gateway gave up on this identifier.
    Unreachable,
}

/// Orchestrates existence checks, gateway fetches, classification,
/// storage, and nested-reference expansion.
///
/// The engine owns its [`ProgressSet`]; runs with isolated state are
/// just separate engines. Re-running a batch is safe and cheap: every
/// identifier is validated against the store before any network
/// access.
pub struct Engine<C: HttpClient> {
    fetcher: GatewayFetcher<C>,
    store: Store,
    progress: ProgressSet,
}

impl<C: HttpClient + 'static> Engine<C> {
    pub fn new(fetcher: GatewayFetcher<C>, store: Store, progress: ProgressSet) -> Self {
        Self {
            fetcher,
            store,
            progress,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn progress(&self) -> &ProgressSet {
        &self.progress
    }

    /// Materialize one identifier and everything reachable from it.
    ///
    /// Nested references run on an explicit frontier local to this
    /// call: deeply nested documents cannot grow the call stack, and
    /// expansion never fans out to other tasks. An unreachable nested
    /// identifier is logged and dropped; only the root identifier
    /// decides the return value, which is `Ok(true)` when it is now
    /// on disk.
    pub async fn process(&self, cid: &Cid, name: &str) -> Result<bool, EngineError> {
        let mut frontier = vec![cid.clone()];
        let mut visited: HashSet<Cid> = frontier.iter().cloned().collect();
        let mut root_ok = true;

        while let Some(current) = frontier.pop() {
            let is_root = current == *cid;
            let step = self
                .step(&current, if is_root { name } else { "" })
                .await?;
            match step {
                Step::Materialized(found) => {
                    for nested in found {
                        if visited.insert(nested.clone()) {
                            frontier.push(nested);
                        }
                    }
                }
                Step::Unreachable => {
                    if is_root {
                        root_ok = false;
                    }
                }
            }
        }
        Ok(root_ok)
    }

    /// One state transition for one identifier: existence check,
    /// fetch, classify-and-persist, expand.
    async fn step(&self, cid: &Cid, name: &str) -> Result<Step, EngineError> {
        // Idempotent short-circuit: anything already on disk is never
        // re-fetched, but stored documents are still re-walked so a
        // previously interrupted run picks up missing nested content.
        if let Some((path, kind)) = self.store.existing(cid) {
            debug!(cid = %cid, kind = kind.ext(), "already materialized");
            if kind.expandable() {
                match self.store.read(&path).await {
                    Ok(bytes) => return Ok(Step::Materialized(self.fresh_references(&bytes, kind, cid))),
                    Err(err) => {
                        warn!(cid = %cid, error = %err, "stored document unreadable, skipping expansion");
                    }
                }
            }
            return Ok(Step::Materialized(HashSet::new()));
        }

        let body = match self.fetcher.fetch(cid).await {
            Ok(body) => body,
            Err(err @ FetchError::Exhausted { .. }) => {
                warn!(cid = %cid, name, error = %err, "giving up on identifier");
                return Ok(Step::Unreachable);
            }
            Err(err) => {
                warn!(cid = %cid, name, error = %err, "fetch failed");
                return Ok(Step::Unreachable);
            }
        };

        let kind = sniff(&body);
        self.store
            .write(cid, kind, &body)
            .await
            .map_err(EngineError::Store)?;
        self.progress
            .record(cid.clone())
            .await
            .map_err(EngineError::Progress)?;
        info!(cid = %cid, name, kind = kind.ext(), bytes = body.len(), "materialized");

        if kind.expandable() {
            return Ok(Step::Materialized(self.fresh_references(&body, kind, cid)));
        }
        Ok(Step::Materialized(HashSet::new()))
    }

    /// Discover nested references, keeping only the ones not yet on
    /// disk. Already-materialized references are reported but never
    /// reprocessed.
    fn fresh_references(&self, bytes: &[u8], kind: FileKind, parent: &Cid) -> HashSet<Cid> {
        let found = discover(bytes, kind, parent);
        if !found.is_empty() {
            debug!(parent = %parent, count = found.len(), "nested references discovered");
        }
        found
            .into_iter()
            .filter(|nested| {
                if self.store.existing(nested).is_some() {
                    debug!(cid = %nested, "nested reference already on disk");
                    false
                } else {
                    true
                }
            })
            .collect()
    }

    /// Process a batch of top-level items through a bounded worker
    /// pool.
    ///
    /// Only top-level items fan out; expansion of nested references
    /// stays on the task that owns the item, so total concurrency is
    /// bounded by `workers` regardless of document depth. Worker
    /// count 1 runs the batch fully sequentially. Completion order
    /// across items is unspecified.
    pub async fn run(
        self: Arc<Self>,
        items: Vec<WorkItem>,
        workers: usize,
    ) -> Result<RunSummary, EngineError> {
        let attempted = items.len();
        info!(items = attempted, workers, "starting batch");

        let semaphore = Arc::new(Semaphore::new(workers.max(1)));
        let mut tasks = FuturesUnordered::new();
        for item in items {
            let engine = Arc::clone(&self);
            let semaphore = Arc::clone(&semaphore);
            tasks.push(tokio::spawn(async move {
                let _permit = semaphore.acquire().await.expect("semaphore never closed");
                engine.process(&item.cid, &item.name).await
            }));
        }

        let mut completed = 0;
        let mut failed = 0;
        while let Some(joined) = tasks.next().await {
            if joined.map_err(EngineError::Join)?? {
                completed += 1;
            } else {
                failed += 1;
            }
        }

        let summary = RunSummary {
            attempted,
            completed,
            failed,
            total_unique: self.progress.len().await,
        };
        info!(?summary, "batch finished");
        Ok(summary)
    }
}
