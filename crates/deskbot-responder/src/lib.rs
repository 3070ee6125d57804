// Stand-in for the external AI generation collaborator
//
// In production the generation process lives entirely outside this system:
// it reads a ticket's subject/description and, at some later time, writes an
// answer into the store. The desk never calls it and only observes the effect
// through re-reads. This crate reproduces that shape for demos and tests: a
// generator picks a canned analysis, and an auto-responder task writes it
// into a store after a delay.

mod auto;
mod canned;

pub use auto::{spawn_auto_responder, ResponseSink};
pub use canned::CannedResponder;

use async_trait::async_trait;

/// Produces the answer text for a ticket.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, subject: &str, description: &str) -> String;
}
