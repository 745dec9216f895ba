use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use tracing::{debug, info, warn};

use crate::errors::{CallError, PipelineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Design,
    Breakdown,
    TopView,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StageKind::Design => "design",
            StageKind::Breakdown => "breakdown",
            StageKind::TopView => "top-view",
        })
    }
}

/// Upstream error fragments that mean the service itself is down or misconfigured.
const UNAVAILABLE_SIGNATURES: &[&str] = &["model not found", "invalid argument"];

fn is_unavailable(err: &CallError) -> bool {
    let CallError::Status { detail, .. } = err else {
        return false;
    };
    let text = detail.to_lowercase();
    UNAVAILABLE_SIGNATURES.iter().any(|sig| text.contains(sig))
}

impl StageKind {
    fn failure_prefix(self) -> &'static str {
        match self {
            StageKind::Design => "Design generation failed",
            StageKind::Breakdown => "Failed to generate breakdown",
            StageKind::TopView => "Failed to generate top-view plan",
        }
    }

    fn unavailable_message(self) -> &'static str {
        match self {
            StageKind::Design => "Image generation is temporarily unavailable. Try again later.",
            StageKind::Breakdown => {
                "Vision analysis is temporarily unavailable. Try again later or check xAI status."
            }
            StageKind::TopView => "Plan generation is temporarily unavailable. Try again later.",
        }
    }

    fn empty_message(self) -> &'static str {
        match self {
            StageKind::Design => "Design was generated but returned no image.",
            StageKind::Breakdown => "Breakdown was generated but returned empty content.",
            StageKind::TopView => "Top-view plan was generated but returned no image.",
        }
    }

    /// User-facing text for a failed call.
    pub fn failure_message(self, err: &CallError) -> String {
        if matches!(err, CallError::Empty) {
            return self.empty_message().to_string();
        }
        if is_unavailable(err) {
            return self.unavailable_message().to_string();
        }
        let detail = err.to_string();
        if detail.trim().is_empty() {
            format!("{}: Unknown error", self.failure_prefix())
        } else {
            format!("{}: {}", self.failure_prefix(), detail)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageState<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(String),
}

impl<T> StageState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, StageState::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, StageState::Pending)
    }

    pub fn artifact(&self) -> Option<&T> {
        match self {
            StageState::Succeeded(a) => Some(a),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            StageState::Failed(m) => Some(m),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StageState::Idle => "idle",
            StageState::Pending => "pending",
            StageState::Succeeded(_) => "succeeded",
            StageState::Failed(_) => "failed",
        }
    }
}

struct Inner<T> {
    state: StageState<T>,
    // bumped by every begin/reset; completions carrying an older value are dropped
    epoch: u64,
}

/// Request lifecycle of one pipeline stage.
pub struct StageController<T> {
    kind: StageKind,
    inner: Mutex<Inner<T>>,
}

/// Proof that a stage moved to Pending. Settle it with [`StageTicket::finish`];
/// dropping it unsettled puts the stage back to Idle.
#[must_use]
pub struct StageTicket<'a, T: Clone> {
    controller: &'a StageController<T>,
    epoch: u64,
    settled: bool,
}

impl<T: Clone> StageController<T> {
    pub fn new(kind: StageKind) -> Self {
        Self { kind, inner: Mutex::new(Inner { state: StageState::Idle, epoch: 0 }) }
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn state(&self) -> StageState<T> {
        self.inner.lock().state.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.lock().state.is_pending()
    }

    /// Moves to Pending. Rejected (not queued) while a call is in flight.
    pub fn begin(&self) -> Result<StageTicket<'_, T>, PipelineError> {
        let mut inner = self.inner.lock();
        if inner.state.is_pending() {
            debug!(stage = %self.kind, "trigger rejected: already pending");
            return Err(PipelineError::Busy(self.kind));
        }
        inner.epoch += 1;
        inner.state = StageState::Pending;
        debug!(stage = %self.kind, epoch = inner.epoch, "pending");
        Ok(StageTicket { controller: self, epoch: inner.epoch, settled: false })
    }

    /// Forces Idle from any state. An in-flight call keeps running but its
    /// result is discarded.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        if !inner.state.is_idle() {
            debug!(stage = %self.kind, from = inner.state.label(), "reset");
        }
        inner.state = StageState::Idle;
    }

    /// `begin`, one call, then settle with its outcome.
    pub async fn trigger<F, Fut>(&self, call: F) -> Result<StageState<T>, PipelineError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CallError>>,
    {
        let ticket = self.begin()?;
        let outcome = call().await;
        Ok(ticket.finish(outcome))
    }

    fn settle(&self, epoch: u64, outcome: Result<T, CallError>) -> StageState<T> {
        let mut inner = self.inner.lock();
        if inner.epoch != epoch {
            warn!(stage = %self.kind, "discarding result of a superseded call");
            return inner.state.clone();
        }
        inner.state = match outcome {
            Ok(artifact) => {
                info!(stage = %self.kind, "succeeded");
                StageState::Succeeded(artifact)
            }
            Err(err) => {
                warn!(stage = %self.kind, error = %err, "failed");
                StageState::Failed(self.kind.failure_message(&err))
            }
        };
        inner.state.clone()
    }

    fn abandon(&self, epoch: u64) {
        let mut inner = self.inner.lock();
        if inner.epoch == epoch && inner.state.is_pending() {
            debug!(stage = %self.kind, "abandoned while pending");
            inner.state = StageState::Idle;
        }
    }
}

impl<'a, T: Clone> StageTicket<'a, T> {
    pub fn finish(mut self, outcome: Result<T, CallError>) -> StageState<T> {
        self.settled = true;
        self.controller.settle(self.epoch, outcome)
    }
}

impl<'a, T: Clone> Drop for StageTicket<'a, T> {
    fn drop(&mut self) {
        if !self.settled {
            self.controller.abandon(self.epoch);
        }
    }
}
