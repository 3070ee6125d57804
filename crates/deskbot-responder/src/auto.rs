// Auto-responder task
//
// Mirrors the production flow: some time after a ticket is created, the
// external process writes an answer into the store. The desk finds out on its
// next re-read, never through a callback.

use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::warn;

use deskbot_contracts::TicketId;
use deskbot_store::{InMemoryTicketStore, StoreError};

use crate::ResponseGenerator;

/// Write access to wherever generated responses land. Implemented by store
/// backends that expose the collaborator side door.
#[async_trait]
pub trait ResponseSink: Send + Sync {
    async fn attach_response(&self, id: &TicketId, response: String) -> Result<(), StoreError>;
}

#[async_trait]
impl ResponseSink for InMemoryTicketStore {
    async fn attach_response(&self, id: &TicketId, response: String) -> Result<(), StoreError> {
        self.attach_ai_response(id, response).await
    }
}

/// Spawn a task that generates an answer for the ticket and writes it into
/// the sink after `delay`. Fire and forget: a failed write is logged, not
/// retried, matching the collaborator's contract with the desk (none).
pub fn spawn_auto_responder<S, G>(
    sink: S,
    generator: G,
    id: TicketId,
    subject: String,
    description: String,
    delay: Duration,
) -> JoinHandle<()>
where
    S: ResponseSink + 'static,
    G: ResponseGenerator + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let response = generator.generate(&subject, &description).await;
        if let Err(error) = sink.attach_response(&id, response).await {
            warn!(ticket_id = %id, error = %error, "auto-responder write failed");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskbot_contracts::{TicketDraft, TicketPriority};
    use deskbot_store::{NewTicket, TicketStore};

    #[tokio::test(start_paused = true)]
    async fn attaches_a_response_after_the_delay() {
        let store = InMemoryTicketStore::new();
        let created = store
            .create(NewTicket::from(TicketDraft::new(
                "Email sync broken",
                "Outlook stopped syncing this morning",
                TicketPriority::Medium,
                "user@example.com",
            )))
            .await
            .unwrap();

        let handle = spawn_auto_responder(
            store.clone(),
            crate::CannedResponder::new(),
            created.id.clone(),
            created.subject.clone(),
            created.description.clone(),
            Duration::from_secs(3),
        );

        // Not yet: the delay has not elapsed.
        let before = store.get(&created.id).await.unwrap();
        assert!(before.ai_response.is_none());

        handle.await.unwrap();
        let after = store.get(&created.id).await.unwrap();
        assert!(after.ai_response.is_some());
        assert!(after.ai_response_generated_at.is_some());
    }
}
