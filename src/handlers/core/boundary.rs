//! Failure boundary around a single handler invocation.
//!
//! A handler that returns an error, panics, or overruns its deadline is
//! logged with the owning feature and route, counted, and discarded. Nothing
//! propagates to the dispatcher or to sibling handlers.

use super::context::Route;
use crate::error::HandlerResult;
use futures_util::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, error, warn};

/// How one handler invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    Completed,
    /// Handler returned an error; carries its error code.
    Failed(&'static str),
    /// Handler panicked; carries the panic message when it was a string.
    Panicked(String),
    TimedOut,
    /// Task was aborted or dropped before finishing.
    Cancelled,
}

impl HandlerOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Counters shared by the dispatcher and every boundary it creates.
#[derive(Debug, Default)]
pub(crate) struct BoundaryCounters {
    pub(crate) completed: AtomicU64,
    pub(crate) errors: AtomicU64,
    pub(crate) panics: AtomicU64,
    pub(crate) timeouts: AtomicU64,
}

pub(crate) struct FailureBoundary {
    feature: Arc<str>,
    route: Route,
    deadline: Option<Duration>,
    counters: Arc<BoundaryCounters>,
}

impl FailureBoundary {
    pub(crate) fn new(
        feature: Arc<str>,
        route: Route,
        deadline: Option<Duration>,
        counters: Arc<BoundaryCounters>,
    ) -> Self {
        Self {
            feature,
            route,
            deadline,
            counters,
        }
    }

    /// Drive `fut` to completion, converting every failure mode to an outcome.
    pub(crate) async fn run<F>(self, fut: F) -> HandlerOutcome
    where
        F: Future<Output = HandlerResult>,
    {
        let guarded = AssertUnwindSafe(fut).catch_unwind();
        let result = match self.deadline {
            Some(deadline) => match tokio::time::timeout(deadline, guarded).await {
                Ok(result) => result,
                Err(_) => {
                    self.counters.timeouts.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        feature = %self.feature,
                        route = %self.route,
                        deadline_ms = deadline.as_millis() as u64,
                        "Handler exceeded its deadline and was dropped"
                    );
                    return HandlerOutcome::TimedOut;
                }
            },
            None => guarded.await,
        };

        match result {
            Ok(Ok(())) => {
                self.counters.completed.fetch_add(1, Ordering::Relaxed);
                debug!(feature = %self.feature, route = %self.route, "Handler completed");
                HandlerOutcome::Completed
            }
            Ok(Err(e)) => {
                self.counters.errors.fetch_add(1, Ordering::Relaxed);
                error!(
                    feature = %self.feature,
                    route = %self.route,
                    error = %e,
                    code = e.error_code(),
                    "Handler failed"
                );
                HandlerOutcome::Failed(e.error_code())
            }
            Err(payload) => {
                self.counters.panics.fetch_add(1, Ordering::Relaxed);
                let message = panic_message(payload.as_ref());
                error!(
                    feature = %self.feature,
                    route = %self.route,
                    panic = %message,
                    "Handler panicked"
                );
                HandlerOutcome::Panicked(message)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
