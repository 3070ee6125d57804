// Desk view state
//
// One snapshot holds everything the presentation layer renders: the list
// view, at most one detail view, and the most recent background failure.
// Snapshots are replaced wholesale; fields from two reads are never merged.

use deskbot_contracts::{DeskStats, Feedback, Ticket, TicketId};

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeskSnapshot {
    pub list: ListState,
    pub detail: Option<DetailView>,
    /// Most recent background failure, surfaced as a retryable notice.
    pub last_error: Option<String>,
}

/// State of the ticket list view.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ListState {
    #[default]
    Idle,
    /// Initial load; nothing to show yet.
    Loading,
    Ready(Vec<Ticket>),
    /// A reload is in flight; the previous snapshot stays visible.
    Refreshing(Vec<Ticket>),
    /// Load failed; retryable.
    Failed(String),
}

impl ListState {
    /// The currently visible tickets, if any.
    pub fn tickets(&self) -> &[Ticket] {
        match self {
            ListState::Ready(tickets) | ListState::Refreshing(tickets) => tickets,
            _ => &[],
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, ListState::Loading | ListState::Refreshing(_))
    }
}

/// The detail view plus the liveness epoch it was opened under. Background
/// results tagged with an older epoch belong to a dismissed view and are
/// dropped before they can touch state.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub epoch: u64,
    pub state: DetailState,
}

/// State of the single open detail view.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    /// No local copy yet; the authoritative read is in flight.
    Loading(TicketId),
    Ready {
        ticket: Ticket,
        /// A user-visible round trip (resolve, feedback) is running.
        busy: bool,
    },
    /// The ticket could not be loaded; rendered distinctly, never as stale data.
    Unavailable(TicketId),
}

impl DetailState {
    pub fn ticket(&self) -> Option<&Ticket> {
        match self {
            DetailState::Ready { ticket, .. } => Some(ticket),
            _ => None,
        }
    }

    pub fn id(&self) -> &TicketId {
        match self {
            DetailState::Loading(id) | DetailState::Unavailable(id) => id,
            DetailState::Ready { ticket, .. } => &ticket.id,
        }
    }
}

impl DeskSnapshot {
    /// The locally known copy of a ticket: the detail view's if it matches
    /// (freshest), otherwise the list entry.
    pub fn find(&self, id: &TicketId) -> Option<&Ticket> {
        if let Some(detail) = &self.detail {
            if let Some(ticket) = detail.state.ticket() {
                if &ticket.id == id {
                    return Some(ticket);
                }
            }
        }
        self.list.tickets().iter().find(|t| &t.id == id)
    }

    /// Dashboard counters for the current list snapshot.
    pub fn stats(&self) -> DeskStats {
        DeskStats::from_tickets(self.list.tickets())
    }

    /// Guarded reconciliation: replace every local copy of this ticket with
    /// the freshly read one, unless the read is strictly staler than what we
    /// hold (it then predates a write we already applied optimistically).
    pub(crate) fn reconcile(&mut self, ticket: Ticket) {
        self.apply(ticket, false);
    }

    /// Forced replacement with server truth, staleness guard bypassed. Used
    /// after a write completed (or failed), when the local copy is the one
    /// that must not win.
    pub(crate) fn force_apply(&mut self, ticket: Ticket) {
        self.apply(ticket, true);
    }

    fn apply(&mut self, ticket: Ticket, force: bool) {
        if let ListState::Ready(tickets) | ListState::Refreshing(tickets) = &mut self.list {
            if let Some(entry) = tickets.iter_mut().find(|t| t.id == ticket.id) {
                if force || ticket.updated_at >= entry.updated_at {
                    *entry = ticket.clone();
                }
            }
        }
        if let Some(detail) = &mut self.detail {
            if detail.state.id() == &ticket.id {
                let replace = match &detail.state {
                    DetailState::Ready {
                        ticket: current, ..
                    } => force || ticket.updated_at >= current.updated_at,
                    DetailState::Loading(_) | DetailState::Unavailable(_) => true,
                };
                if replace {
                    let busy = matches!(&detail.state, DetailState::Ready { busy: true, .. });
                    detail.state = DetailState::Ready { ticket, busy };
                } else {
                    tracing::debug!(
                        ticket_id = %ticket.id,
                        "discarding stale read (predates the local copy)"
                    );
                }
            }
        }
    }

    /// Apply the view transition (open -> in_progress) to every local copy,
    /// bumping the local `updated_at` so pre-write reads are recognizably
    /// stale. Returns true if a transition was applied and a store write must
    /// follow.
    pub(crate) fn acknowledge_locally(&mut self, id: &TicketId) -> bool {
        let Some(known) = self.find(id) else {
            return false;
        };
        let Some(next) = known.status.view_transition() else {
            return false;
        };
        let now = chrono::Utc::now();
        self.for_each_copy(id, |ticket| {
            ticket.status = next;
            ticket.updated_at = now;
        });
        true
    }

    /// Mark the detail view busy (resolve/feedback round trip in flight).
    pub(crate) fn set_detail_busy(&mut self, id: &TicketId, value: bool) {
        if let Some(detail) = &mut self.detail {
            if let DetailState::Ready { ticket, busy } = &mut detail.state {
                if &ticket.id == id {
                    *busy = value;
                }
            }
        }
    }

    /// Attach a locally constructed feedback record to every copy of the
    /// ticket. The store returns no row for feedback inserts, so this local
    /// copy stands until the next authoritative read.
    pub(crate) fn attach_feedback(&mut self, id: &TicketId, feedback: Feedback) {
        self.for_each_copy(id, |ticket| ticket.feedback = Some(feedback.clone()));
    }

    /// Insert a freshly created ticket at the top of the list, if one is
    /// loaded.
    pub(crate) fn insert_created(&mut self, ticket: Ticket) {
        if let ListState::Ready(tickets) | ListState::Refreshing(tickets) = &mut self.list {
            tickets.insert(0, ticket);
        }
    }

    fn for_each_copy(&mut self, id: &TicketId, mut f: impl FnMut(&mut Ticket)) {
        if let ListState::Ready(tickets) | ListState::Refreshing(tickets) = &mut self.list {
            if let Some(entry) = tickets.iter_mut().find(|t| &t.id == id) {
                f(entry);
            }
        }
        if let Some(detail) = &mut self.detail {
            if let DetailState::Ready { ticket, .. } = &mut detail.state {
                if &ticket.id == id {
                    f(ticket);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use deskbot_contracts::{EmailStatus, TicketPriority, TicketStatus};

    fn ticket(id: &str, status: TicketStatus) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: TicketId::from(id),
            subject: "subject".to_string(),
            description: "description".to_string(),
            status,
            priority: TicketPriority::Medium,
            created_at: now,
            updated_at: now,
            attachment: None,
            ai_response: None,
            ai_response_generated_at: None,
            feedback: None,
            email_notification: EmailStatus::Pending,
        }
    }

    fn snapshot_with(tickets: Vec<Ticket>) -> DeskSnapshot {
        DeskSnapshot {
            list: ListState::Ready(tickets),
            ..DeskSnapshot::default()
        }
    }

    #[test]
    fn acknowledge_bumps_updated_at_on_every_copy() {
        let t = ticket("TKT-001", TicketStatus::Open);
        let before = t.updated_at;
        let mut snap = snapshot_with(vec![t.clone()]);
        snap.detail = Some(DetailView {
            epoch: 1,
            state: DetailState::Ready {
                ticket: t,
                busy: false,
            },
        });

        assert!(snap.acknowledge_locally(&TicketId::from("TKT-001")));
        let list_copy = &snap.list.tickets()[0];
        assert_eq!(list_copy.status, TicketStatus::InProgress);
        assert!(list_copy.updated_at >= before);
        let detail_copy = snap.detail.as_ref().unwrap().state.ticket().unwrap();
        assert_eq!(detail_copy.status, TicketStatus::InProgress);
    }

    #[test]
    fn acknowledge_is_a_noop_off_open() {
        let mut snap = snapshot_with(vec![ticket("TKT-001", TicketStatus::InProgress)]);
        assert!(!snap.acknowledge_locally(&TicketId::from("TKT-001")));
        assert!(!snap.acknowledge_locally(&TicketId::from("TKT-404")));
    }

    #[test]
    fn reconcile_discards_a_strictly_staler_read() {
        let mut fresh = ticket("TKT-001", TicketStatus::InProgress);
        fresh.updated_at = Utc::now();
        let mut stale = ticket("TKT-001", TicketStatus::Open);
        stale.updated_at = fresh.updated_at - Duration::seconds(30);

        let mut snap = snapshot_with(vec![fresh.clone()]);
        snap.reconcile(stale);
        assert_eq!(snap.list.tickets()[0].status, TicketStatus::InProgress);
    }

    #[test]
    fn reconcile_applies_a_newer_read() {
        let mut old = ticket("TKT-001", TicketStatus::Open);
        old.updated_at = Utc::now() - Duration::seconds(30);
        let mut new = ticket("TKT-001", TicketStatus::InProgress);
        new.ai_response = Some("answer".to_string());

        let mut snap = snapshot_with(vec![old]);
        snap.reconcile(new);
        let entry = &snap.list.tickets()[0];
        assert_eq!(entry.status, TicketStatus::InProgress);
        assert!(entry.has_ai_response());
    }

    #[test]
    fn force_apply_overrides_a_newer_local_copy() {
        let mut optimistic = ticket("TKT-001", TicketStatus::InProgress);
        optimistic.updated_at = Utc::now();
        let mut server_truth = ticket("TKT-001", TicketStatus::Open);
        server_truth.updated_at = optimistic.updated_at - Duration::seconds(5);

        let mut snap = snapshot_with(vec![optimistic]);
        snap.force_apply(server_truth);
        assert_eq!(snap.list.tickets()[0].status, TicketStatus::Open);
    }

    #[test]
    fn find_prefers_the_detail_copy() {
        let list_copy = ticket("TKT-001", TicketStatus::Open);
        let mut detail_copy = ticket("TKT-001", TicketStatus::InProgress);
        detail_copy.updated_at = Utc::now() + Duration::seconds(1);

        let mut snap = snapshot_with(vec![list_copy]);
        snap.detail = Some(DetailView {
            epoch: 7,
            state: DetailState::Ready {
                ticket: detail_copy,
                busy: false,
            },
        });
        let found = snap.find(&TicketId::from("TKT-001")).unwrap();
        assert_eq!(found.status, TicketStatus::InProgress);
    }
}
