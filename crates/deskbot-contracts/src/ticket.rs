// Ticket and feedback entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::{EmailStatus, TicketPriority, TicketStatus};

/// Opaque ticket identifier assigned by the store at creation ("TKT-042").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TicketId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TicketId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Reference to an uploaded file. The upload itself lives in external file
/// storage; the desk only records the url/name pair, and the pair is always
/// complete (a lone url or lone name never occurs in the domain model).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
    pub name: String,
}

/// A support request tracked through the status lifecycle.
///
/// `ai_response` and `email_notification` are mutated store-side by external
/// collaborators at unpredictable times; the only way to observe those writes
/// is a fresh read. No field correlation is enforced between `status` and
/// `ai_response` - every combination must display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    pub id: TicketId,
    pub subject: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_response_generated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    pub email_notification: EmailStatus,
}

impl Ticket {
    /// Whether the external AI process has attached an answer yet.
    pub fn has_ai_response(&self) -> bool {
        self.ai_response.is_some()
    }

    /// Tickets the list view must re-poll to pick up late-arriving answers.
    pub fn awaiting_response(&self) -> bool {
        self.ai_response.is_none()
    }

    /// Feedback is offered only once an answer exists and never twice.
    pub fn can_rate(&self) -> bool {
        self.ai_response.is_some() && self.feedback.is_none()
    }
}

/// One-shot user rating of an AI response. Immutable once created; at most
/// one per ticket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feedback {
    pub id: String,
    pub ticket_id: TicketId,
    pub rating: Rating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Star rating constrained to 1..=5.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, RatingOutOfRange> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating must be between 1 and 5, got {0}")]
pub struct RatingOutOfRange(pub u8);

impl TryFrom<u8> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> u8 {
        rating.0
    }
}

/// User-supplied draft for a new ticket. Validated by the intake layer before
/// any store call; the store assigns id, timestamps and status defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketDraft {
    pub subject: String,
    pub description: String,
    pub priority: TicketPriority,
    pub contact_email: String,
    pub attachment: Option<Attachment>,
}

impl TicketDraft {
    pub fn new(
        subject: impl Into<String>,
        description: impl Into<String>,
        priority: TicketPriority,
        contact_email: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            description: description.into(),
            priority,
            contact_email: contact_email.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_id_serializes_as_bare_string() {
        let id = TicketId::from("TKT-007");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"TKT-007\"");
    }

    #[test]
    fn rating_rejects_out_of_range_values() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert_eq!(Rating::new(3).unwrap().get(), 3);
    }

    #[test]
    fn rating_deserializes_through_validation() {
        assert!(serde_json::from_str::<Rating>("5").is_ok());
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }

    #[test]
    fn can_rate_requires_response_and_no_prior_feedback() {
        let mut ticket = fixture();
        assert!(!ticket.can_rate());

        ticket.ai_response = Some("Try turning it off and on again.".to_string());
        assert!(ticket.can_rate());

        ticket.feedback = Some(Feedback {
            id: "fb-1".to_string(),
            ticket_id: ticket.id.clone(),
            rating: Rating::new(4).unwrap(),
            comment: None,
            created_at: Utc::now(),
        });
        assert!(!ticket.can_rate());
    }

    fn fixture() -> Ticket {
        let now = Utc::now();
        Ticket {
            id: TicketId::from("TKT-001"),
            subject: "VPN keeps dropping".to_string(),
            description: "Disconnects every few minutes with error 809".to_string(),
            status: TicketStatus::Open,
            priority: TicketPriority::High,
            created_at: now,
            updated_at: now,
            attachment: None,
            ai_response: None,
            ai_response_generated_at: None,
            feedback: None,
            email_notification: EmailStatus::Pending,
        }
    }
}
