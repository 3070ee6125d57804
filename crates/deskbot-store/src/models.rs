// Wire records for the hosted store
//
// The store speaks snake_case JSON (`created_at`, `ai_response`, `file_url`);
// the domain model is richer: validated enums, a paired attachment, a bounded
// rating. Every field crosses this boundary through an explicit conversion,
// so a record the client cannot interpret is a `Malformed` error rather than
// a silently coerced value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use deskbot_contracts::{
    Attachment, EmailStatus, Feedback, Rating, Ticket, TicketDraft, TicketId, TicketPriority,
    TicketStatus,
};

use crate::error::StoreError;

// ============================================
// Ticket records
// ============================================

/// A ticket row as the store returns it. Feedback rows arrive embedded as an
/// array (the store enforces at most one; the conversion takes the first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: String,
    pub subject: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_response_generated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feedback: Vec<FeedbackRecord>,
    pub email_notification_status: String,
}

impl TryFrom<TicketRecord> for Ticket {
    type Error = StoreError;

    fn try_from(record: TicketRecord) -> Result<Self, Self::Error> {
        let status: TicketStatus = record.status.parse().map_err(StoreError::Malformed)?;
        let priority: TicketPriority = record.priority.parse().map_err(StoreError::Malformed)?;
        let email_notification: EmailStatus = record
            .email_notification_status
            .parse()
            .map_err(StoreError::Malformed)?;

        let attachment = match (record.file_url, record.file_name) {
            (Some(url), Some(name)) => Some(Attachment { url, name }),
            (None, None) => None,
            _ => {
                return Err(StoreError::malformed(format!(
                    "ticket {} has a dangling attachment field (url/name must be paired)",
                    record.id
                )))
            }
        };

        let feedback = record
            .feedback
            .into_iter()
            .next()
            .map(Feedback::try_from)
            .transpose()?;

        Ok(Ticket {
            id: TicketId::from(record.id),
            subject: record.subject,
            description: record.description,
            status,
            priority,
            created_at: record.created_at,
            updated_at: record.updated_at,
            attachment,
            ai_response: record.ai_response,
            ai_response_generated_at: record.ai_response_generated_at,
            feedback,
            email_notification,
        })
    }
}

impl From<&Ticket> for TicketRecord {
    fn from(ticket: &Ticket) -> Self {
        TicketRecord {
            id: ticket.id.as_str().to_string(),
            subject: ticket.subject.clone(),
            description: ticket.description.clone(),
            status: ticket.status.to_string(),
            priority: ticket.priority.to_string(),
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
            file_url: ticket.attachment.as_ref().map(|a| a.url.clone()),
            file_name: ticket.attachment.as_ref().map(|a| a.name.clone()),
            ai_response: ticket.ai_response.clone(),
            ai_response_generated_at: ticket.ai_response_generated_at,
            feedback: ticket.feedback.iter().map(FeedbackRecord::from).collect(),
            email_notification_status: ticket.email_notification.to_string(),
        }
    }
}

// ============================================
// Feedback records
// ============================================

/// A feedback row as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: String,
    pub ticket_id: String,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<FeedbackRecord> for Feedback {
    type Error = StoreError;

    fn try_from(record: FeedbackRecord) -> Result<Self, Self::Error> {
        let rating = Rating::new(record.rating)
            .map_err(|e| StoreError::malformed(format!("feedback {}: {e}", record.id)))?;
        Ok(Feedback {
            id: record.id,
            ticket_id: TicketId::from(record.ticket_id),
            rating,
            comment: record.comment,
            created_at: record.created_at,
        })
    }
}

impl From<&Feedback> for FeedbackRecord {
    fn from(feedback: &Feedback) -> Self {
        FeedbackRecord {
            id: feedback.id.clone(),
            ticket_id: feedback.ticket_id.as_str().to_string(),
            rating: feedback.rating.get(),
            comment: feedback.comment.clone(),
            created_at: feedback.created_at,
        }
    }
}

// ============================================
// Write payloads
// ============================================

/// Payload for creating a ticket. The store assigns id, timestamps,
/// `status = open` and `email_notification_status = pending`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub subject: String,
    pub description: String,
    pub priority: TicketPriority,
    pub contact_email: String,
    pub attachment: Option<Attachment>,
}

impl From<TicketDraft> for NewTicket {
    fn from(draft: TicketDraft) -> Self {
        NewTicket {
            subject: draft.subject,
            description: draft.description,
            priority: draft.priority,
            contact_email: draft.contact_email,
            attachment: draft.attachment,
        }
    }
}

/// Wire shape of a ticket insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTicketRecord {
    pub subject: String,
    pub description: String,
    pub priority: String,
    pub contact_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl From<&NewTicket> for NewTicketRecord {
    fn from(ticket: &NewTicket) -> Self {
        NewTicketRecord {
            subject: ticket.subject.clone(),
            description: ticket.description.clone(),
            priority: ticket.priority.to_string(),
            contact_email: ticket.contact_email.clone(),
            file_url: ticket.attachment.as_ref().map(|a| a.url.clone()),
            file_name: ticket.attachment.as_ref().map(|a| a.name.clone()),
        }
    }
}

/// Payload for inserting a feedback row. The store answers only
/// success/failure, never the created row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    pub ticket_id: TicketId,
    pub rating: Rating,
    pub comment: Option<String>,
}

/// Wire shape of a feedback insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeedbackRecord {
    pub ticket_id: String,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl From<&NewFeedback> for NewFeedbackRecord {
    fn from(feedback: &NewFeedback) -> Self {
        NewFeedbackRecord {
            ticket_id: feedback.ticket_id.as_str().to_string(),
            rating: feedback.rating.get(),
            comment: feedback.comment.clone(),
        }
    }
}

/// Wire shape of a status update. `updated_at` travels with the patch so the
/// row's freshness is refreshed by the same write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusPatch {
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

impl StatusPatch {
    pub fn new(status: TicketStatus) -> Self {
        StatusPatch {
            status: status.to_string(),
            updated_at: Utc::now(),
        }
    }
}
