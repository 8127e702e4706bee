//! Off-path equity estimation.
//!
//! Each request is tagged with a generation from a shared counter. Submitting a new
//! request, or calling [`EquityWorker::cancel`], bumps the counter; running jobs check
//! it between chunks and give up, and anything that still arrives for an older
//! generation is dropped on receipt.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::equity::{EquityConfig, EquityResult};
use crate::errors::WorkerError;
use crate::game::{equity_request, update_equities, EquityRequest, GameState};

/// A finished estimate together with the request it answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityOutcome {
    pub generation: u64,
    pub request: EquityRequest,
    pub result: EquityResult,
}

impl EquityOutcome {
    /// Folds the estimate into `state` if it is still the snapshot that asked for it;
    /// otherwise `None`.
    pub fn apply(&self, state: &GameState) -> Option<GameState> {
        self.request
            .matches(state)
            .then(|| update_equities(state, self.result.equities.clone()))
    }
}

pub struct EquityWorker {
    pool: ThreadPool,
    config: EquityConfig,
    generation: Arc<AtomicU64>,
    tx: Sender<EquityOutcome>,
    rx: Receiver<EquityOutcome>,
}

impl EquityWorker {
    /// Starts a pool of `threads` workers (at least one).
    pub fn new(threads: usize, config: EquityConfig) -> Result<Self, WorkerError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("holdex-equity-{i}"))
            .build()?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            pool,
            config,
            generation: Arc::new(AtomicU64::new(0)),
            tx,
            rx,
        })
    }

    pub fn config(&self) -> &EquityConfig {
        &self.config
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Queues `request`, superseding whatever was queued before. Returns its generation.
    pub fn submit(&self, request: EquityRequest) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.generation);
        let tx = self.tx.clone();
        let config = self.config;
        debug!(generation, phase = %request.phase, "equity request queued");

        self.pool.spawn(move || {
            let cancelled = || current.load(Ordering::SeqCst) != generation;
            let sim = request.simulation();
            let Some(tally) = sim.run(config.iterations, &request.seed, &cancelled) else {
                debug!(generation, "equity request abandoned");
                return;
            };
            let result = sim.result(&tally, config.tie_share);
            // receiver gone means the worker was dropped; nothing to report to
            let _ = tx.send(EquityOutcome {
                generation,
                request,
                result,
            });
        });
        generation
    }

    /// Submits the estimate `state` is waiting for, if it is waiting for one.
    pub fn request_for(&self, state: &GameState) -> Option<u64> {
        equity_request(state).map(|r| self.submit(r))
    }

    /// Invalidates every outstanding request.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn accept(&self, outcome: EquityOutcome) -> Option<EquityOutcome> {
        let current = self.current_generation();
        if outcome.generation == current {
            Some(outcome)
        } else {
            warn!(
                generation = outcome.generation,
                current, "discarding stale equity result"
            );
            None
        }
    }

    /// Non-blocking: the current generation's result if it has arrived.
    pub fn try_latest(&self) -> Option<EquityOutcome> {
        let mut latest = None;
        while let Ok(outcome) = self.rx.try_recv() {
            if let Some(o) = self.accept(outcome) {
                latest = Some(o);
            }
        }
        latest
    }

    /// Blocks up to `timeout` for the current generation's result.
    pub fn wait_latest(&self, timeout: Duration) -> Option<EquityOutcome> {
        let deadline = Instant::now() + timeout;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(left) {
                Ok(outcome) => {
                    if let Some(o) = self.accept(outcome) {
                        return Some(o);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            }
        }
    }

    /// Convenience for synchronous callers: request, wait, apply.
    ///
    /// Returns the input unchanged when it needs no estimate or none arrives in time.
    pub fn resolve(&self, state: &GameState, timeout: Duration) -> GameState {
        if self.request_for(state).is_none() {
            return state.clone();
        }
        self.wait_latest(timeout)
            .and_then(|o| o.apply(state))
            .unwrap_or_else(|| state.clone())
    }
}
