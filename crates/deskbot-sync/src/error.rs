// Error types for controller operations

use deskbot_contracts::{TicketId, TicketStatus};
use deskbot_store::StoreError;
use thiserror::Error;

use crate::intake::ValidationError;

/// Errors surfaced by the synchronization controller.
///
/// Every variant is scoped to the single operation that raised it; nothing
/// propagates to a global handler or terminates the process.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The draft failed intake validation; nothing was sent to the store
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A transition the lifecycle policy forbids; no store call was issued
    #[error("illegal status transition: {from} -> {to}")]
    IllegalTransition {
        from: TicketStatus,
        to: TicketStatus,
    },

    /// Feedback was submitted before an AI response exists
    #[error("ticket {0} has no response to rate yet")]
    FeedbackUnavailable(TicketId),

    /// Feedback was submitted for a ticket that already has some
    #[error("ticket {0} already has feedback")]
    AlreadyRated(TicketId),

    /// The operation referenced a ticket no current view knows about
    #[error("ticket {0} is not loaded in the current view")]
    UnknownTicket(TicketId),

    /// The store call itself failed
    #[error(transparent)]
    Store(#[from] StoreError),
}
