// In-memory ticket store for tests and demos
//
// Per-instance state behind the same trait as the hosted store, so every test
// gets a fresh store instead of sharing a process-wide mock. Also carries the
// side doors the external collaborators use (`attach_ai_response`,
// `set_email_status`): those writes happen outside the client contract, and
// the desk only ever observes them through a re-read.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use deskbot_contracts::{EmailStatus, Feedback, Ticket, TicketId, TicketStatus};

use crate::error::{Result, StoreError};
use crate::models::{NewFeedback, NewTicket};
use crate::store::TicketStore;

/// Per-operation call counters, for asserting write counts in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpCounts {
    pub creates: usize,
    pub lists: usize,
    pub gets: usize,
    pub status_updates: usize,
    pub feedback_creates: usize,
}

#[derive(Debug, Default)]
struct Inner {
    tickets: Vec<Ticket>,
    counts: OpCounts,
}

/// In-memory ticket store
#[derive(Debug, Default, Clone)]
pub struct InMemoryTicketStore {
    inner: Arc<RwLock<Inner>>,
    faults: Arc<Mutex<VecDeque<StoreError>>>,
    latency: Option<Duration>,
}

impl InMemoryTicketStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a network round trip of the given duration on every operation
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Pre-populate with tickets (useful for testing)
    pub async fn seed(&self, tickets: Vec<Ticket>) {
        self.inner.write().await.tickets = tickets;
    }

    /// Queue an error to be returned by the next operation instead of
    /// touching state. Queued faults are consumed in order.
    pub async fn fail_next(&self, error: StoreError) {
        self.faults.lock().await.push_back(error);
    }

    /// Call counters accumulated so far
    pub async fn op_counts(&self) -> OpCounts {
        self.inner.read().await.counts
    }

    /// Side door for the external AI collaborator: attach a generated
    /// response and mark the notification email sent. Not part of the
    /// `TicketStore` contract - the desk never calls this.
    pub async fn attach_ai_response(&self, id: &TicketId, response: impl Into<String>) -> Result<()> {
        let mut inner = self.inner.write().await;
        let ticket = find_mut(&mut inner.tickets, id)?;
        let now = Utc::now();
        ticket.ai_response = Some(response.into());
        ticket.ai_response_generated_at = Some(now);
        ticket.email_notification = EmailStatus::Sent;
        ticket.updated_at = now;
        Ok(())
    }

    /// Side door for the external notification collaborator.
    pub async fn set_email_status(&self, id: &TicketId, status: EmailStatus) -> Result<()> {
        let mut inner = self.inner.write().await;
        let ticket = find_mut(&mut inner.tickets, id)?;
        ticket.email_notification = status;
        Ok(())
    }

    async fn simulate_round_trip(&self) -> Result<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(error) = self.faults.lock().await.pop_front() {
            return Err(error);
        }
        Ok(())
    }
}

fn find_mut<'a>(tickets: &'a mut [Ticket], id: &TicketId) -> Result<&'a mut Ticket> {
    tickets
        .iter_mut()
        .find(|t| &t.id == id)
        .ok_or_else(|| StoreError::NotFound(id.clone()))
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn create(&self, ticket: NewTicket) -> Result<Ticket> {
        self.simulate_round_trip().await?;
        let mut inner = self.inner.write().await;
        inner.counts.creates += 1;

        let now = Utc::now();
        let created = Ticket {
            id: TicketId::new(format!("TKT-{:03}", inner.tickets.len() + 1)),
            subject: ticket.subject,
            description: ticket.description,
            status: TicketStatus::Open,
            priority: ticket.priority,
            created_at: now,
            updated_at: now,
            attachment: ticket.attachment,
            ai_response: None,
            ai_response_generated_at: None,
            feedback: None,
            email_notification: EmailStatus::Pending,
        };
        inner.tickets.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Ticket>> {
        self.simulate_round_trip().await?;
        let mut inner = self.inner.write().await;
        inner.counts.lists += 1;

        let mut tickets = inner.tickets.clone();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets)
    }

    async fn get(&self, id: &TicketId) -> Result<Ticket> {
        self.simulate_round_trip().await?;
        let mut inner = self.inner.write().await;
        inner.counts.gets += 1;

        inner
            .tickets
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn update_status(&self, id: &TicketId, status: TicketStatus) -> Result<()> {
        self.simulate_round_trip().await?;
        let mut inner = self.inner.write().await;
        inner.counts.status_updates += 1;

        let ticket = find_mut(&mut inner.tickets, id)?;
        ticket.status = status;
        ticket.updated_at = Utc::now();
        Ok(())
    }

    async fn create_feedback(&self, feedback: NewFeedback) -> Result<()> {
        self.simulate_round_trip().await?;
        let mut inner = self.inner.write().await;
        inner.counts.feedback_creates += 1;

        let ticket = find_mut(&mut inner.tickets, &feedback.ticket_id)?;
        if ticket.feedback.is_some() {
            return Err(StoreError::rejected(format!(
                "ticket {} already has feedback",
                feedback.ticket_id
            )));
        }
        ticket.feedback = Some(Feedback {
            id: Uuid::new_v4().to_string(),
            ticket_id: feedback.ticket_id.clone(),
            rating: feedback.rating,
            comment: feedback.comment,
            created_at: Utc::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskbot_contracts::{Rating, TicketDraft, TicketPriority};

    fn draft(subject: &str) -> NewTicket {
        NewTicket::from(TicketDraft::new(
            subject,
            "something broke",
            TicketPriority::Medium,
            "user@example.com",
        ))
    }

    #[tokio::test]
    async fn create_assigns_defaults_and_sequential_ids() {
        let store = InMemoryTicketStore::new();
        let first = store.create(draft("a")).await.unwrap();
        let second = store.create(draft("b")).await.unwrap();

        assert_eq!(first.id.as_str(), "TKT-001");
        assert_eq!(second.id.as_str(), "TKT-002");
        assert_eq!(first.status, TicketStatus::Open);
        assert_eq!(first.email_notification, EmailStatus::Pending);
        assert!(first.ai_response.is_none());
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let store = InMemoryTicketStore::new();
        store.create(draft("oldest")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
        store.create(draft("newest")).await.unwrap();

        let tickets = store.list().await.unwrap();
        assert_eq!(tickets[0].subject, "newest");
        assert_eq!(tickets[1].subject, "oldest");
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let store = InMemoryTicketStore::new();
        let err = store.get(&TicketId::from("TKT-999")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_status_refreshes_updated_at() {
        let store = InMemoryTicketStore::new();
        let created = store.create(draft("a")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;

        store
            .update_status(&created.id, TicketStatus::InProgress)
            .await
            .unwrap();
        let fetched = store.get(&created.id).await.unwrap();
        assert_eq!(fetched.status, TicketStatus::InProgress);
        assert!(fetched.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn second_feedback_row_is_rejected() {
        let store = InMemoryTicketStore::new();
        let created = store.create(draft("a")).await.unwrap();
        let feedback = NewFeedback {
            ticket_id: created.id.clone(),
            rating: Rating::new(5).unwrap(),
            comment: None,
        };

        store.create_feedback(feedback.clone()).await.unwrap();
        let err = store.create_feedback(feedback).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
    }

    #[tokio::test]
    async fn queued_fault_fails_exactly_one_operation() {
        let store = InMemoryTicketStore::new();
        let created = store.create(draft("a")).await.unwrap();

        store.fail_next(StoreError::transport("socket reset")).await;
        assert!(store.get(&created.id).await.is_err());
        assert!(store.get(&created.id).await.is_ok());
    }

    #[tokio::test]
    async fn ai_side_door_attaches_response_and_flips_email() {
        let store = InMemoryTicketStore::new();
        let created = store.create(draft("a")).await.unwrap();

        store
            .attach_ai_response(&created.id, "Reinstall the driver.")
            .await
            .unwrap();
        let fetched = store.get(&created.id).await.unwrap();
        assert_eq!(fetched.ai_response.as_deref(), Some("Reinstall the driver."));
        assert!(fetched.ai_response_generated_at.is_some());
        assert_eq!(fetched.email_notification, EmailStatus::Sent);
    }

    #[tokio::test]
    async fn counters_track_writes() {
        let store = InMemoryTicketStore::new();
        let created = store.create(draft("a")).await.unwrap();
        store
            .update_status(&created.id, TicketStatus::InProgress)
            .await
            .unwrap();
        store.list().await.unwrap();

        let counts = store.op_counts().await;
        assert_eq!(counts.creates, 1);
        assert_eq!(counts.status_updates, 1);
        assert_eq!(counts.lists, 1);
    }
}
