// List-view filtering

use crate::status::{TicketPriority, TicketStatus};
use crate::ticket::Ticket;

/// Filter applied to a list snapshot. All criteria are conjunctive; the
/// search term matches case-insensitively against subject, description and id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub search: Option<String>,
}

impl TicketFilter {
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(status) = self.status {
            if ticket.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if ticket.priority != priority {
                return false;
            }
        }
        if let Some(term) = self.search.as_deref() {
            let term = term.trim().to_lowercase();
            if !term.is_empty() {
                let hit = ticket.subject.to_lowercase().contains(&term)
                    || ticket.description.to_lowercase().contains(&term)
                    || ticket.id.as_str().to_lowercase().contains(&term);
                if !hit {
                    return false;
                }
            }
        }
        true
    }

    pub fn apply<'a>(&self, tickets: &'a [Ticket]) -> Vec<&'a Ticket> {
        tickets.iter().filter(|t| self.matches(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::EmailStatus;
    use crate::ticket::TicketId;
    use chrono::Utc;

    fn ticket(id: &str, subject: &str, status: TicketStatus, priority: TicketPriority) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: TicketId::from(id),
            subject: subject.to_string(),
            description: "user reported a problem".to_string(),
            status,
            priority,
            created_at: now,
            updated_at: now,
            attachment: None,
            ai_response: None,
            ai_response_generated_at: None,
            feedback: None,
            email_notification: EmailStatus::Pending,
        }
    }

    #[test]
    fn filters_by_status_and_priority_together() {
        let tickets = vec![
            ticket("TKT-001", "VPN down", TicketStatus::Open, TicketPriority::High),
            ticket("TKT-002", "Printer offline", TicketStatus::Open, TicketPriority::Low),
            ticket("TKT-003", "Email sync", TicketStatus::Closed, TicketPriority::High),
        ];
        let filter = TicketFilter {
            status: Some(TicketStatus::Open),
            priority: Some(TicketPriority::High),
            search: None,
        };
        let hits = filter.apply(&tickets);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "TKT-001");
    }

    #[test]
    fn search_matches_id_case_insensitively() {
        let tickets = vec![ticket(
            "TKT-042",
            "Laptop battery",
            TicketStatus::Open,
            TicketPriority::Medium,
        )];
        let filter = TicketFilter {
            search: Some("tkt-042".to_string()),
            ..TicketFilter::default()
        };
        assert_eq!(filter.apply(&tickets).len(), 1);
    }

    #[test]
    fn blank_search_matches_everything() {
        let tickets = vec![ticket(
            "TKT-001",
            "VPN down",
            TicketStatus::Open,
            TicketPriority::High,
        )];
        let filter = TicketFilter {
            search: Some("   ".to_string()),
            ..TicketFilter::default()
        };
        assert_eq!(filter.apply(&tickets).len(), 1);
    }
}
