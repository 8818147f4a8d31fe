//! Observable claim progress.

use std::sync::Arc;

use link_claim_core::ClaimProgress;
use tokio::sync::watch;

/// Holds the current [`ClaimProgress`] and enforces its transition rules.
///
/// Clones share the same state. Observers get accepted transitions through
/// [`ProgressStateMachine::subscribe`]; a watch channel only keeps the latest
/// value, so `Done` and `Failed` are usually replaced by `Idle` before a
/// subscriber wakes. The terminal stage of each claim is kept separately and
/// read through [`ProgressStateMachine::last_finished`] or
/// [`ProgressStateMachine::subscribe_finished`].
#[derive(Debug, Clone)]
pub struct ProgressStateMachine {
    tx: Arc<watch::Sender<ClaimProgress>>,
    finished: Arc<watch::Sender<Option<ClaimProgress>>>,
}

impl Default for ProgressStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressStateMachine {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ClaimProgress::Idle);
        let (finished, _rx) = watch::channel(None);
        Self {
            tx: Arc::new(tx),
            finished: Arc::new(finished),
        }
    }

    pub fn current(&self) -> ClaimProgress {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ClaimProgress> {
        self.tx.subscribe()
    }

    /// Terminal stage (`Done` or `Failed`) of the most recent claim.
    pub fn last_finished(&self) -> Option<ClaimProgress> {
        *self.finished.borrow()
    }

    pub fn subscribe_finished(&self) -> watch::Receiver<Option<ClaimProgress>> {
        self.finished.subscribe()
    }

    /// Move to `next` if the transition is legal. Illegal moves are dropped.
    pub fn advance(&self, next: ClaimProgress) -> bool {
        let accepted = self.tx.send_if_modified(|current| {
            if !current.can_transition_to(next) {
                tracing::warn!(from = %current, to = %next, "Refusing illegal progress transition");
                return false;
            }
            tracing::debug!(from = %current, to = %next, "Claim progress");
            *current = next;
            true
        });
        if accepted && next.is_terminal() {
            self.finished.send_replace(Some(next));
        }
        accepted
    }

    /// Force the machine back to idle, from any stage.
    pub fn reset(&self) {
        self.tx.send_if_modified(|current| {
            if current.is_idle() {
                return false;
            }
            *current = ClaimProgress::Idle;
            true
        });
    }
}
