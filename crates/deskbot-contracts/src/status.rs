// Status and priority enums
// Wire strings are snake_case, matching the hosted store's columns.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a ticket.
///
/// The desk itself only ever produces `open -> in_progress` and
/// `in_progress -> resolved` (see `lifecycle`); `awaiting_info` and `closed`
/// are set by out-of-scope collaborators but must decode and display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    AwaitingInfo,
    Closed,
    Resolved,
}

impl TicketStatus {
    /// All declared variants, in display order.
    pub const ALL: [TicketStatus; 5] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::AwaitingInfo,
        TicketStatus::Closed,
        TicketStatus::Resolved,
    ];
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketStatus::Open => write!(f, "open"),
            TicketStatus::InProgress => write!(f, "in_progress"),
            TicketStatus::AwaitingInfo => write!(f, "awaiting_info"),
            TicketStatus::Closed => write!(f, "closed"),
            TicketStatus::Resolved => write!(f, "resolved"),
        }
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "in_progress" => Ok(TicketStatus::InProgress),
            "awaiting_info" => Ok(TicketStatus::AwaitingInfo),
            "closed" => Ok(TicketStatus::Closed),
            "resolved" => Ok(TicketStatus::Resolved),
            _ => Err(format!("Unknown ticket status: {}", s)),
        }
    }
}

/// Priority chosen at intake; the desk never changes it afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 4] = [
        TicketPriority::Low,
        TicketPriority::Medium,
        TicketPriority::High,
        TicketPriority::Urgent,
    ];
}

impl Default for TicketPriority {
    fn default() -> Self {
        TicketPriority::Medium
    }
}

impl std::fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketPriority::Low => write!(f, "low"),
            TicketPriority::Medium => write!(f, "medium"),
            TicketPriority::High => write!(f, "high"),
            TicketPriority::Urgent => write!(f, "urgent"),
        }
    }
}

impl std::str::FromStr for TicketPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TicketPriority::Low),
            "medium" => Ok(TicketPriority::Medium),
            "high" => Ok(TicketPriority::High),
            "urgent" => Ok(TicketPriority::Urgent),
            _ => Err(format!("Unknown ticket priority: {}", s)),
        }
    }
}

/// Delivery state of the notification email, owned entirely by the external
/// notification collaborator. The desk reads and displays it, nothing more.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EmailStatus {
    Pending,
    Sent,
    Failed,
}

impl EmailStatus {
    pub const ALL: [EmailStatus; 3] =
        [EmailStatus::Pending, EmailStatus::Sent, EmailStatus::Failed];
}

impl std::fmt::Display for EmailStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmailStatus::Pending => write!(f, "pending"),
            EmailStatus::Sent => write!(f, "sent"),
            EmailStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for EmailStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EmailStatus::Pending),
            "sent" => Ok(EmailStatus::Sent),
            "failed" => Ok(EmailStatus::Failed),
            _ => Err(format!("Unknown email status: {}", s)),
        }
    }
}
