// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The poll loop bridging the deployment graph and asynchronously created objects.

use crate::accessor::{ControlPlaneAccessor, Lookup, TargetRef};
use crate::error::{LookupError, WaitError};
use crate::waiter::request::{WaitRequest, WaitResult};
use crate::waiter::state::{Observation, WaitState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

type Slot = Arc<OnceCell<WaitResult>>;

/// Waits for objects to appear through a [`ControlPlaneAccessor`].
///
/// Successful results are remembered per target, so asking again for a target
/// that already resolved returns the same fields without another lookup.
/// Concurrent waits for one target share a single poll loop.
pub struct Waiter<A> {
    accessor: A,
    resolved: Mutex<HashMap<TargetRef, Slot>>,
}

impl<A: ControlPlaneAccessor> Waiter<A> {
    pub fn new(accessor: A) -> Self {
        Self {
            accessor,
            resolved: Mutex::new(HashMap::new()),
        }
    }

    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    pub async fn wait(&self, request: &WaitRequest) -> Result<WaitResult, WaitError> {
        self.wait_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Wait for `request.target`, giving up early once `cancel` fires.
    ///
    /// Cancellation is observed before the first lookup, while sleeping between
    /// attempts and while queued behind another caller polling the same target.
    /// A cancelled, timed out or failed wait leaves nothing behind; the next
    /// call starts again from the first attempt.
    #[instrument(skip(self, request, cancel), fields(target = %request.target))]
    pub async fn wait_with_cancel(
        &self,
        request: &WaitRequest,
        cancel: &CancellationToken,
    ) -> Result<WaitResult, WaitError> {
        let target = &request.target;
        if let Err(err) = request.policy.validate() {
            error!("Refusing to wait for {}: {}", target, err);
            return Err(err);
        }

        let slot = self.slot(target);
        if let Some(result) = slot.get() {
            info!(
                "{} already resolved after {} attempts, reusing result",
                target, result.attempts_used
            );
            return Ok(result.clone());
        }

        let started = Instant::now();
        let outcome = if cancel.is_cancelled() {
            Err(cancelled(target, 0, Duration::ZERO))
        } else {
            tokio::select! {
                biased;
                result = slot.get_or_try_init(|| self.poll(request, cancel)) => result.cloned(),
                _ = cancel.cancelled() => Err(cancelled(target, 0, started.elapsed())),
            }
        };

        if outcome.is_err() {
            self.release(target, &slot);
        }
        outcome
    }

    /// Forget a resolved target so the next wait polls again.
    pub fn invalidate(&self, target: &TargetRef) -> bool {
        self.resolved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(target)
            .is_some()
    }

    fn slot(&self, target: &TargetRef) -> Slot {
        self.resolved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(target.clone())
            .or_default()
            .clone()
    }

    /// Drop an empty slot nobody else is waiting on.
    fn release(&self, target: &TargetRef, slot: &Slot) {
        let mut resolved = self.resolved.lock().unwrap_or_else(PoisonError::into_inner);
        // Slots are only cloned under this lock: one reference in the map, one held by us
        let unused = resolved.get(target).is_some_and(|current| {
            Arc::ptr_eq(current, slot) && !current.initialized() && Arc::strong_count(current) == 2
        });
        if unused {
            resolved.remove(target);
        }
    }

    async fn poll(
        &self,
        request: &WaitRequest,
        cancel: &CancellationToken,
    ) -> Result<WaitResult, WaitError> {
        let target = &request.target;
        let max_attempts = request.policy.max_attempts;
        let start = Instant::now();
        let mut backoff = request.policy.backoff();
        let mut state = WaitState::initial();
        let mut attempt = 1;

        loop {
            debug!("Looking up {} (attempt {}/{})", target, attempt, max_attempts);
            let lookup = self.accessor.lookup(target).await;
            let elapsed = start.elapsed();
            state = state.advance(observe(&lookup), max_attempts);

            match (state, lookup) {
                (WaitState::Succeeded, Ok(Lookup::Found(resolved_fields))) => {
                    info!(
                        "{} resolved on attempt {}/{} after {:?}",
                        target, attempt, max_attempts, elapsed
                    );
                    return Ok(WaitResult {
                        target: target.clone(),
                        resolved_fields,
                        attempts_used: attempt,
                        elapsed,
                    });
                }
                (WaitState::Fatal, Err(source)) => {
                    error!(
                        "Lookup of {} failed on attempt {}/{} after {:?}: {}",
                        target, attempt, max_attempts, elapsed, source
                    );
                    return Err(WaitError::Fatal {
                        name: target.name.clone(),
                        namespace: target.namespace.clone(),
                        attempt,
                        elapsed,
                        source,
                    });
                }
                (WaitState::TimedOut, _) => {
                    warn!(
                        "Gave up on {} after {} attempts ({:?} elapsed)",
                        target, attempt, elapsed
                    );
                    return Err(WaitError::Timeout {
                        name: target.name.clone(),
                        namespace: target.namespace.clone(),
                        attempts: attempt,
                        elapsed,
                    });
                }
                (WaitState::Polling { attempt: next }, _) => {
                    let delay = backoff.next_delay();
                    info!(
                        "{} not found yet (attempt {}/{}, {:?} elapsed), retrying in {:?}",
                        target, attempt, max_attempts, elapsed, delay
                    );

                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            let elapsed = start.elapsed();
                            warn!(
                                "Wait for {} cancelled after {} attempts ({:?} elapsed)",
                                target, attempt, elapsed
                            );
                            return Err(cancelled(target, attempt, elapsed));
                        }
                        _ = sleep(delay) => {}
                    }
                    attempt = next;
                }
                (state, _) => unreachable!("lookup outcome cannot lead to {:?}", state),
            }
        }
    }
}

fn observe(lookup: &Result<Lookup, LookupError>) -> Observation {
    match lookup {
        Ok(Lookup::Found(_)) => Observation::Found,
        Ok(Lookup::NotFound) => Observation::NotFound,
        Err(_) => Observation::Failed,
    }
}

fn cancelled(target: &TargetRef, attempts: u32, elapsed: Duration) -> WaitError {
    WaitError::Cancelled {
        name: target.name.clone(),
        namespace: target.namespace.clone(),
        attempts,
        elapsed,
    }
}
