//! End-to-End Desk Walkthrough
//!
//! This example drives the full desk flow against the in-memory store:
//! a ticket is submitted, the stand-in AI collaborator writes its answer
//! into the store after a delay, the desk picks the answer up on a poll,
//! and the user rates the response and resolves the ticket.
//!
//! Run with: cargo run --example desk_demo -p deskbot-sync

use std::sync::Arc;
use std::time::Duration;

use deskbot_contracts::{format_age, Rating, TicketDraft, TicketPriority};
use deskbot_responder::{spawn_auto_responder, CannedResponder};
use deskbot_store::InMemoryTicketStore;
use deskbot_sync::{DeskController, TICKET_CREATED_NOTICE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set up logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Deskbot Desk Walkthrough ===\n");

    let store = InMemoryTicketStore::new();
    let desk = DeskController::new(Arc::new(store.clone()));
    desk.refresh().await?;

    // Intake.
    let created = desk
        .submit_ticket(TicketDraft::new(
            "VPN connection timeouts",
            "Drops every 10-15 minutes with error 809 since this morning.",
            TicketPriority::High,
            "remote.worker@example.com",
        ))
        .await?;
    println!("{TICKET_CREATED_NOTICE}");
    println!(
        "Created {} [{}] priority {}\n",
        created.id,
        created.status.badge().label,
        created.priority.badge().label
    );

    // The external AI process answers some time later; the desk only ever
    // observes the effect of that write through its own re-reads.
    spawn_auto_responder(
        store.clone(),
        CannedResponder::new(),
        created.id.clone(),
        created.subject.clone(),
        created.description.clone(),
        Duration::from_secs(2),
    );

    // Opening the ticket acknowledges it (open -> in_progress) without
    // waiting for the store write.
    desk.select(&created.id);
    print_list(&desk);

    // Poll until the answer lands.
    loop {
        if desk.poll_pending().await > 0 {
            break;
        }
        println!("AI is analyzing the request...");
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    let snapshot = desk.snapshot();
    let detail = snapshot
        .detail
        .as_ref()
        .and_then(|d| d.state.ticket())
        .expect("detail view is open");
    println!("\n--- AI response for {} ---", detail.id);
    println!("{}\n", detail.ai_response.as_deref().unwrap_or_default());
    println!("Notification: {}\n", detail.email_notification.badge().label);

    // Rate the answer and resolve the ticket.
    let feedback = desk
        .submit_feedback(
            &created.id,
            Rating::new(5).unwrap(),
            Some("Fixed it on the first try.".to_string()),
        )
        .await?;
    println!("Rated {}/5", feedback.rating.get());

    desk.resolve(&created.id).await?;
    print_list(&desk);

    let stats = desk.snapshot().stats();
    println!(
        "\nDashboard: {} tickets, {} resolved, {} with AI responses, average rating {:?}",
        stats.total, stats.resolved, stats.ai_responses, stats.average_rating
    );

    println!("\n=== Walkthrough complete ===");
    Ok(())
}

fn print_list(desk: &DeskController) {
    let snapshot = desk.snapshot();
    let now = chrono::Utc::now();
    println!("--- Ticket list ---");
    for ticket in snapshot.list.tickets() {
        println!(
            "{}  {:<12}  {:<8}  {}  ({})",
            ticket.id,
            ticket.status.badge().label,
            ticket.priority.badge().label,
            ticket.subject,
            format_age(ticket.created_at, now)
        );
    }
}
