// The store client trait

use async_trait::async_trait;

use deskbot_contracts::{Ticket, TicketId, TicketStatus};

use crate::error::Result;
use crate::models::{NewFeedback, NewTicket};

/// Async client contract for the hosted ticket store.
///
/// Implementations:
/// - `RestTicketStore`: the hosted relational store, over its REST surface
/// - `InMemoryTicketStore`: per-instance double for tests and demos
///
/// The store owns persistence, identity and ordering. It performs no
/// lifecycle validation on status updates - transition legality is the
/// caller's responsibility. Any operation may fail with a `StoreError`; a
/// failed write is never reported as a success.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Insert a ticket. The store assigns id and timestamps, defaults
    /// `status` to `open` and the email flag to `pending`, and returns the
    /// full created record so the caller can hold a local copy.
    async fn create(&self, ticket: NewTicket) -> Result<Ticket>;

    /// All tickets, newest first. The result is a complete snapshot at read
    /// time; no pagination contract exists.
    async fn list(&self) -> Result<Vec<Ticket>>;

    /// Point read of the latest persisted state, including any AI response
    /// or email-status change that arrived since the last read.
    async fn get(&self, id: &TicketId) -> Result<Ticket>;

    /// Persist a status value and refresh `updated_at`.
    async fn update_status(&self, id: &TicketId, status: TicketStatus) -> Result<()>;

    /// Insert a feedback row. Fails with `Rejected` if the store's
    /// at-most-one-per-ticket constraint is violated. Returns no row.
    async fn create_feedback(&self, feedback: NewFeedback) -> Result<()>;
}
