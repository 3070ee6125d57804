// The synchronization controller
//
// All application state lives in one snapshot published through a watch
// channel; every mutation goes through `send_modify`, so the presentation
// layer always observes whole consistent snapshots. Store writes triggered
// by view transitions run as background tasks and never block the view;
// deliberate actions (resolve, feedback) await their round trip and report
// a loading indication through the snapshot instead.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use deskbot_contracts::{
    Feedback, Rating, Ticket, TicketDraft, TicketId, TicketStatus, TransitionOutcome,
};
use deskbot_store::{NewFeedback, NewTicket, TicketStore};

use crate::error::SyncError;
use crate::intake::validate_draft;
use crate::state::{DeskSnapshot, DetailState, DetailView, ListState};

/// Confirmation line shown after a successful ticket submission.
pub const TICKET_CREATED_NOTICE: &str =
    "Ticket created. The assistant is analyzing your request and will post a response shortly.";

/// Reconciles local desk snapshots with the authoritative ticket store.
///
/// The store is the only shared mutable resource; the controller holds no
/// cache beyond the current snapshot and replaces ticket objects wholesale on
/// every reconciliation. AI responses and email-status changes arrive
/// store-side with no notification, so views observe them exclusively through
/// the re-reads issued here.
pub struct DeskController {
    store: Arc<dyn TicketStore>,
    state: Arc<watch::Sender<DeskSnapshot>>,
    epoch: Arc<AtomicU64>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl DeskController {
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        let (tx, _rx) = watch::channel(DeskSnapshot::default());
        Self {
            store,
            state: Arc::new(tx),
            epoch: Arc::new(AtomicU64::new(0)),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> DeskSnapshot {
        self.state.borrow().clone()
    }

    /// Observe snapshot changes, including those made by background
    /// reconciliation tasks.
    pub fn subscribe(&self) -> watch::Receiver<DeskSnapshot> {
        self.state.subscribe()
    }

    // ============================================
    // List view
    // ============================================

    /// Load (or reload) the ticket list. The previous snapshot stays visible
    /// while a reload is in flight; a failure leaves the list in a retryable
    /// error state.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        self.state.send_modify(|snap| {
            snap.last_error = None;
            snap.list = match std::mem::take(&mut snap.list) {
                ListState::Ready(tickets) | ListState::Refreshing(tickets) => {
                    ListState::Refreshing(tickets)
                }
                _ => ListState::Loading,
            };
        });

        match self.store.list().await {
            Ok(tickets) => {
                self.state
                    .send_modify(|snap| snap.list = ListState::Ready(tickets));
                Ok(())
            }
            Err(error) => {
                warn!(error = %error, "ticket list load failed");
                let message = error.to_string();
                self.state
                    .send_modify(|snap| snap.list = ListState::Failed(message));
                Err(error.into())
            }
        }
    }

    /// Re-read every listed ticket still awaiting an AI response. The only
    /// way a response's arrival can be observed is such a pull; callers run
    /// this after rendering a list and on whatever cadence they like.
    /// Returns how many of the re-read tickets now carry a response.
    pub async fn poll_pending(&self) -> usize {
        let pending: Vec<TicketId> = self
            .state
            .borrow()
            .list
            .tickets()
            .iter()
            .filter(|t| t.awaiting_response())
            .map(|t| t.id.clone())
            .collect();
        if pending.is_empty() {
            return 0;
        }

        let reads =
            futures::future::join_all(pending.iter().map(|id| self.store.get(id))).await;

        let mut gained = 0;
        self.state.send_modify(|snap| {
            for (id, result) in pending.iter().zip(reads) {
                match result {
                    Ok(ticket) => {
                        if ticket.has_ai_response() {
                            gained += 1;
                        }
                        snap.reconcile(ticket);
                    }
                    // A single failed read only costs this pass its update.
                    Err(error) => {
                        debug!(ticket_id = %id, error = %error, "response poll read failed")
                    }
                }
            }
        });
        if gained > 0 {
            info!(count = gained, "picked up AI responses on poll");
        }
        gained
    }

    // ============================================
    // Detail view
    // ============================================

    /// Open the detail view for a ticket. Renders immediately from the
    /// locally known copy (acknowledging it if it was `open`), then lets a
    /// fresh authoritative read replace the copy once it lands. Returns the
    /// view's liveness epoch.
    pub fn select(&self, id: &TicketId) -> u64 {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|snap| {
            snap.last_error = None;
            let state = match snap.find(id) {
                Some(ticket) => DetailState::Ready {
                    ticket: ticket.clone(),
                    busy: false,
                },
                None => DetailState::Loading(id.clone()),
            };
            snap.detail = Some(DetailView { epoch, state });
        });

        self.acknowledge(id);
        self.spawn_detail_fetch(epoch, id.clone());
        epoch
    }

    /// The named open -> in_progress transition a first view triggers.
    /// Exposed separately from `select` so a front end can open a detail view
    /// without acknowledging. Applies the optimistic local transition and
    /// issues the store write in the background; returns whether a transition
    /// was initiated (false when the ticket is unknown or not `open`).
    pub fn acknowledge(&self, id: &TicketId) -> bool {
        let mut acked = false;
        self.state
            .send_modify(|snap| acked = snap.acknowledge_locally(id));
        if acked {
            debug!(ticket_id = %id, "acknowledged: open -> in_progress");
            self.spawn_status_write(id.clone(), TicketStatus::InProgress);
        }
        acked
    }

    /// Dismiss the detail view. In-flight reads or writes belonging to it
    /// will find the epoch advanced and drop their results.
    pub fn close_detail(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|snap| snap.detail = None);
    }

    /// Explicitly resolve a ticket. Legal only from `in_progress`; resolving
    /// an already-resolved ticket is a tolerated no-op (no store call), any
    /// other starting status is rejected without a store call. The round
    /// trip is awaited and the local copy is replaced with server truth
    /// afterwards - the optimistic value is never trusted on this path.
    pub async fn resolve(&self, id: &TicketId) -> Result<(), SyncError> {
        let mut known: Option<TicketStatus> = None;
        self.state.send_modify(|snap| {
            snap.last_error = None;
            known = snap.find(id).map(|t| t.status);
        });
        let from = known.ok_or_else(|| SyncError::UnknownTicket(id.clone()))?;

        let target = match from.resolve_outcome() {
            TransitionOutcome::Noop => return Ok(()),
            TransitionOutcome::Illegal => {
                return Err(SyncError::IllegalTransition {
                    from,
                    to: TicketStatus::Resolved,
                })
            }
            TransitionOutcome::Apply(next) => next,
        };

        self.state.send_modify(|snap| snap.set_detail_busy(id, true));
        let write = self.store.update_status(id, target).await;
        if let Err(error) = &write {
            warn!(ticket_id = %id, error = %error, "resolve write failed");
        }

        let read = self.store.get(id).await;
        let id_for_state = id.clone();
        self.state.send_modify(move |snap| {
            snap.set_detail_busy(&id_for_state, false);
            match read {
                Ok(ticket) => snap.force_apply(ticket),
                Err(error) if error.is_not_found() => {
                    if let Some(detail) = &mut snap.detail {
                        if detail.state.id() == &id_for_state {
                            detail.state = DetailState::Unavailable(id_for_state.clone());
                        }
                    }
                }
                Err(error) => {
                    warn!(ticket_id = %id_for_state, error = %error, "post-resolve read failed");
                    snap.last_error = Some(error.to_string());
                }
            }
        });

        write.map_err(SyncError::from)
    }

    // ============================================
    // Intake
    // ============================================

    /// Validate a draft and create the ticket. Validation failures never
    /// reach the store. On success the created ticket enters the top of the
    /// loaded list snapshot.
    pub async fn submit_ticket(&self, draft: TicketDraft) -> Result<Ticket, SyncError> {
        validate_draft(&draft)?;
        let created = self.store.create(NewTicket::from(draft)).await?;
        info!(ticket_id = %created.id, priority = %created.priority, "ticket created");
        let for_list = created.clone();
        self.state.send_modify(move |snap| {
            snap.last_error = None;
            snap.insert_created(for_list);
        });
        Ok(created)
    }

    // ============================================
    // Feedback
    // ============================================

    /// Submit the one-shot rating for a ticket's AI response. Gated
    /// client-side: no response yet or already rated means no store call.
    /// The store returns only success/failure, so on success the local
    /// snapshot carries a locally built record until the next authoritative
    /// read replaces it.
    pub async fn submit_feedback(
        &self,
        id: &TicketId,
        rating: Rating,
        comment: Option<String>,
    ) -> Result<Feedback, SyncError> {
        let mut known: Option<(bool, bool)> = None;
        self.state.send_modify(|snap| {
            snap.last_error = None;
            known = snap
                .find(id)
                .map(|t| (t.has_ai_response(), t.feedback.is_some()));
        });
        let (has_response, has_feedback) =
            known.ok_or_else(|| SyncError::UnknownTicket(id.clone()))?;
        if !has_response {
            return Err(SyncError::FeedbackUnavailable(id.clone()));
        }
        if has_feedback {
            return Err(SyncError::AlreadyRated(id.clone()));
        }

        self.state.send_modify(|snap| snap.set_detail_busy(id, true));
        let result = self
            .store
            .create_feedback(NewFeedback {
                ticket_id: id.clone(),
                rating,
                comment: comment.clone(),
            })
            .await;

        match result {
            Ok(()) => {
                let feedback = Feedback {
                    id: Uuid::new_v4().to_string(),
                    ticket_id: id.clone(),
                    rating,
                    comment,
                    created_at: Utc::now(),
                };
                let attached = feedback.clone();
                let id_for_state = id.clone();
                self.state.send_modify(move |snap| {
                    snap.set_detail_busy(&id_for_state, false);
                    snap.attach_feedback(&id_for_state, attached);
                });
                info!(ticket_id = %id, rating = rating.get(), "feedback submitted");
                Ok(feedback)
            }
            Err(error) => {
                warn!(ticket_id = %id, error = %error, "feedback submission failed");
                let message = error.to_string();
                let id_for_state = id.clone();
                self.state.send_modify(move |snap| {
                    snap.set_detail_busy(&id_for_state, false);
                    snap.last_error = Some(message);
                });
                Err(error.into())
            }
        }
    }

    // ============================================
    // Background tasks
    // ============================================

    /// Await every background task spawned so far. Used by tests and by
    /// orderly shutdown; views never need it.
    pub async fn quiesce(&self) {
        loop {
            let drained: Vec<JoinHandle<()>> = self.lock_tasks().drain(..).collect();
            if drained.is_empty() {
                break;
            }
            for handle in drained {
                let _ = handle.await;
            }
        }
    }

    fn spawn_status_write(&self, id: TicketId, status: TicketStatus) {
        let store = Arc::clone(&self.store);
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            match store.update_status(&id, status).await {
                Ok(()) => debug!(ticket_id = %id, status = %status, "status write confirmed"),
                Err(error) => {
                    warn!(ticket_id = %id, error = %error, "status write failed; restoring server truth");
                    let message = error.to_string();
                    state.send_modify(|snap| snap.last_error = Some(message));
                    // The optimistic copy is wrong now; fetch what the store
                    // actually holds and force it in.
                    match store.get(&id).await {
                        Ok(ticket) => state.send_modify(move |snap| snap.force_apply(ticket)),
                        Err(error) => {
                            warn!(ticket_id = %id, error = %error, "rollback read failed")
                        }
                    }
                }
            }
        });
        self.track(handle);
    }

    fn spawn_detail_fetch(&self, epoch: u64, id: TicketId) {
        let store = Arc::clone(&self.store);
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            let result = store.get(&id).await;
            state.send_modify(move |snap| {
                let live = snap.detail.as_ref().is_some_and(|d| d.epoch == epoch);
                if !live {
                    debug!(ticket_id = %id, "dropping fetch result for a dismissed view");
                    return;
                }
                match result {
                    Ok(ticket) => snap.reconcile(ticket),
                    Err(error) if error.is_not_found() => {
                        if let Some(detail) = &mut snap.detail {
                            detail.state = DetailState::Unavailable(id.clone());
                        }
                    }
                    Err(error) => {
                        warn!(ticket_id = %id, error = %error, "detail read failed");
                        snap.last_error = Some(error.to_string());
                        // With no local copy to show, the view degrades to
                        // the distinct unavailable state, never a blank.
                        if let Some(detail) = &mut snap.detail {
                            if matches!(detail.state, DetailState::Loading(_)) {
                                detail.state = DetailState::Unavailable(id.clone());
                            }
                        }
                    }
                }
            });
        });
        self.track(handle);
    }

    fn track(&self, handle: JoinHandle<()>) {
        self.lock_tasks().push(handle);
    }

    fn lock_tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for DeskController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeskController")
            .field("epoch", &self.epoch.load(Ordering::SeqCst))
            .finish()
    }
}
