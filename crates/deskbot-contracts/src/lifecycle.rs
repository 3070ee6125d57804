// Ticket lifecycle policy
//
// The desk performs exactly two transitions of its own:
//   open -> in_progress   the first time a human views the ticket detail
//   in_progress -> resolved   on the explicit resolve action
// `awaiting_info` and `closed` stay representable (external collaborators set
// them) but no operation here produces them. Re-applying a transition the
// ticket has already taken is a tolerated no-op so a double-submitting UI
// cannot error; anything else is a caller bug and must never reach the store.

use crate::status::TicketStatus;

/// Result of asking the policy whether a transition may run from a given
/// starting status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Legal: update local state and issue the store write.
    Apply(TicketStatus),
    /// Already in the target state: succeed without issuing a write.
    Noop,
    /// Not a transition this desk may perform; no write may be issued.
    Illegal,
}

impl TicketStatus {
    /// Status change triggered by a human first opening the detail view.
    ///
    /// Viewing is the signal that someone has begun working the ticket, so
    /// selecting an `open` ticket moves it to `in_progress`. Every other
    /// status is left untouched by viewing.
    pub fn view_transition(self) -> Option<TicketStatus> {
        match self {
            TicketStatus::Open => Some(TicketStatus::InProgress),
            _ => None,
        }
    }

    /// Whether the explicit resolve action may run from this status.
    pub fn resolve_outcome(self) -> TransitionOutcome {
        match self {
            TicketStatus::InProgress => TransitionOutcome::Apply(TicketStatus::Resolved),
            TicketStatus::Resolved => TransitionOutcome::Noop,
            TicketStatus::Open | TicketStatus::AwaitingInfo | TicketStatus::Closed => {
                TransitionOutcome::Illegal
            }
        }
    }

    /// Terminal states: nothing this desk does moves a ticket out of them.
    pub fn is_terminal(self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }
}
