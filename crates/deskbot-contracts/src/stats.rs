// Dashboard overview counters

use serde::Serialize;

use crate::status::TicketStatus;
use crate::ticket::Ticket;

/// Aggregate counters for the dashboard overview. Recomputed from every fresh
/// list snapshot; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeskStats {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub awaiting_info: usize,
    pub resolved: usize,
    pub closed: usize,
    /// Tickets that already carry an AI response.
    pub ai_responses: usize,
    /// Mean of submitted feedback ratings, if any feedback exists.
    pub average_rating: Option<f32>,
}

impl DeskStats {
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        let mut stats = DeskStats {
            total: tickets.len(),
            ..DeskStats::default()
        };

        let mut rating_sum = 0u32;
        let mut rating_count = 0u32;

        for ticket in tickets {
            match ticket.status {
                TicketStatus::Open => stats.open += 1,
                TicketStatus::InProgress => stats.in_progress += 1,
                TicketStatus::AwaitingInfo => stats.awaiting_info += 1,
                TicketStatus::Resolved => stats.resolved += 1,
                TicketStatus::Closed => stats.closed += 1,
            }
            if ticket.has_ai_response() {
                stats.ai_responses += 1;
            }
            if let Some(feedback) = &ticket.feedback {
                rating_sum += u32::from(feedback.rating.get());
                rating_count += 1;
            }
        }

        if rating_count > 0 {
            stats.average_rating = Some(rating_sum as f32 / rating_count as f32);
        }
        stats
    }
}
