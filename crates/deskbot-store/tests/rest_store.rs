// Integration tests for the REST store client against a mocked HTTP surface

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use deskbot_contracts::{TicketDraft, TicketId, TicketPriority, TicketStatus};
use deskbot_store::{NewFeedback, NewTicket, RestTicketStore, StoreError, TicketStore};

fn ticket_row(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "subject": "VPN keeps dropping",
        "description": "Disconnects with error 809",
        "status": status,
        "priority": "high",
        "created_at": "2024-01-15T10:30:00Z",
        "updated_at": "2024-01-15T10:30:00Z",
        "email_notification_status": "pending"
    })
}

#[tokio::test]
async fn list_decodes_rows_and_sends_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickets"))
        .and(query_param("order", "created_at.desc"))
        .and(header("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            ticket_row("TKT-002", "open"),
            ticket_row("TKT-001", "closed"),
        ])))
        .mount(&server)
        .await;

    let store = RestTicketStore::new(server.uri(), "test-key");
    let tickets = store.list().await.unwrap();
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0].id.as_str(), "TKT-002");
    assert_eq!(tickets[1].status, TicketStatus::Closed);
}

#[tokio::test]
async fn get_filters_by_id_and_maps_empty_result_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickets"))
        .and(query_param("id", "eq.TKT-001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([ticket_row("TKT-001", "open")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tickets"))
        .and(query_param("id", "eq.TKT-999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = RestTicketStore::new(server.uri(), "test-key");
    let ticket = store.get(&TicketId::from("TKT-001")).await.unwrap();
    assert_eq!(ticket.id.as_str(), "TKT-001");

    let err = store.get(&TicketId::from("TKT-999")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn create_posts_wire_fields_and_returns_the_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tickets"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({
            "subject": "VPN keeps dropping",
            "priority": "high",
            "contact_email": "user@example.com"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([ticket_row("TKT-003", "open")])))
        .mount(&server)
        .await;

    let store = RestTicketStore::new(server.uri(), "test-key");
    let draft = TicketDraft::new(
        "VPN keeps dropping",
        "Disconnects with error 809",
        TicketPriority::High,
        "user@example.com",
    );
    let created = store.create(NewTicket::from(draft)).await.unwrap();
    assert_eq!(created.id.as_str(), "TKT-003");
    assert_eq!(created.status, TicketStatus::Open);
}

#[tokio::test]
async fn update_status_patches_the_filtered_row() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/tickets"))
        .and(query_param("id", "eq.TKT-001"))
        .and(body_partial_json(json!({ "status": "in_progress" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([ticket_row("TKT-001", "in_progress")])),
        )
        .mount(&server)
        .await;

    let store = RestTicketStore::new(server.uri(), "test-key");
    store
        .update_status(&TicketId::from("TKT-001"), TicketStatus::InProgress)
        .await
        .unwrap();
}

#[tokio::test]
async fn update_status_on_unknown_id_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = RestTicketStore::new(server.uri(), "test-key");
    let err = store
        .update_status(&TicketId::from("TKT-404"), TicketStatus::Resolved)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn duplicate_feedback_conflict_maps_to_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/feedback"))
        .respond_with(ResponseTemplate::new(409).set_body_string("duplicate key value"))
        .mount(&server)
        .await;

    let store = RestTicketStore::new(server.uri(), "test-key");
    let err = store
        .create_feedback(NewFeedback {
            ticket_id: TicketId::from("TKT-001"),
            rating: deskbot_contracts::Rating::new(5).unwrap(),
            comment: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Rejected(_)));
}

#[tokio::test]
async fn server_error_surfaces_as_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickets"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let store = RestTicketStore::new(server.uri(), "test-key");
    let err = store.list().await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)));
}

#[tokio::test]
async fn malformed_row_surfaces_as_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([ticket_row("TKT-001", "triaged")])))
        .mount(&server)
        .await;

    let store = RestTicketStore::new(server.uri(), "test-key");
    let err = store.list().await.unwrap_err();
    assert!(matches!(err, StoreError::Malformed(_)));
}
