//! Checkout attempt state machine.

use serde::{Deserialize, Serialize};

/// The state of a single checkout attempt.
///
/// State transitions:
/// ```text
/// Received ──► Validating ──┬──► Rejected
///                           └──► Applying ──┬──► Persisted ──► Accepted
///                                           └──► PersistFailed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckoutState {
    /// Request arrived, nothing checked yet.
    #[default]
    Received,

    /// Customer fields and item availability are being checked.
    Validating,

    /// Validation failed, nothing was changed (terminal state).
    Rejected,

    /// Stock is being decremented and the order appended.
    Applying,

    /// Catalog and ledger were flushed to storage.
    Persisted,

    /// The order was handed back to the caller (terminal state).
    Accepted,

    /// The flush failed and the in-memory changes were rolled back (terminal state).
    PersistFailed,
}

impl CheckoutState {
    /// Returns true if `next` is a legal successor of this state.
    pub fn can_advance_to(&self, next: CheckoutState) -> bool {
        use CheckoutState::*;
        matches!(
            (self, next),
            (Received, Validating)
                | (Validating, Rejected)
                | (Validating, Applying)
                | (Applying, Rejected)
                | (Applying, Persisted)
                | (Applying, PersistFailed)
                | (Persisted, Accepted)
        )
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CheckoutState::Rejected | CheckoutState::Accepted | CheckoutState::PersistFailed
        )
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Received => "Received",
            CheckoutState::Validating => "Validating",
            CheckoutState::Rejected => "Rejected",
            CheckoutState::Applying => "Applying",
            CheckoutState::Persisted => "Persisted",
            CheckoutState::Accepted => "Accepted",
            CheckoutState::PersistFailed => "PersistFailed",
        }
    }
}

impl std::fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracks the state of one checkout attempt and logs each transition.
#[derive(Debug, Default)]
pub(crate) struct CheckoutAttempt {
    state: CheckoutState,
}

impl CheckoutAttempt {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn state(&self) -> CheckoutState {
        self.state
    }

    pub(crate) fn advance(&mut self, next: CheckoutState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal checkout transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(from = %self.state, to = %next, "checkout state transition");
        self.state = next;
    }
}
