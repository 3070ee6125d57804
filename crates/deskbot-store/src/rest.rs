// REST client for the hosted ticket store
//
// The hosted store exposes its tables over a PostgREST-style surface:
// filters are query parameters (`id=eq.TKT-001`), feedback rows embed into
// ticket reads via `select`, and writes answer with the affected rows when
// asked via the `Prefer` header.

use reqwest::{header, Client, StatusCode};

use deskbot_contracts::{Ticket, TicketId, TicketStatus};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::models::{
    NewFeedback, NewFeedbackRecord, NewTicket, NewTicketRecord, StatusPatch, TicketRecord,
};
use crate::store::TicketStore;
use async_trait::async_trait;

const TICKET_SELECT: &str = "*,feedback(*)";

/// Client for the hosted relational ticket store.
///
/// # Example
///
/// ```ignore
/// use deskbot_store::RestTicketStore;
///
/// let store = RestTicketStore::from_env()?;
/// // or
/// let store = RestTicketStore::new("https://store.example.com/rest/v1", "api-key");
/// ```
#[derive(Clone)]
pub struct RestTicketStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestTicketStore {
    /// Create a client for the given endpoint and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Create a client from `DESKBOT_STORE_URL` / `DESKBOT_STORE_KEY`.
    pub fn from_env() -> Result<Self> {
        let config = StoreConfig::from_env()?;
        Ok(Self::from_config(&config))
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.base_url.clone(), config.api_key.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.base_url, path))
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    /// Map a non-success response to the store error taxonomy.
    async fn fail(response: reqwest::Response) -> StoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::CONFLICT => StoreError::rejected(body),
            _ => StoreError::transport(format!("store returned {status}: {body}")),
        }
    }

    async fn rows(response: reqwest::Response) -> Result<Vec<TicketRecord>> {
        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        let records: Vec<TicketRecord> = response
            .json()
            .await
            .map_err(|e| StoreError::malformed(format!("undecodable ticket rows: {e}")))?;
        Ok(records)
    }
}

#[async_trait]
impl TicketStore for RestTicketStore {
    async fn create(&self, ticket: NewTicket) -> Result<Ticket> {
        let response = self
            .request(reqwest::Method::POST, "tickets")
            .header("Prefer", "return=representation")
            .query(&[("select", TICKET_SELECT)])
            .json(&NewTicketRecord::from(&ticket))
            .send()
            .await?;

        let records = Self::rows(response).await?;
        let record = records
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::malformed("create returned no row"))?;
        let created = Ticket::try_from(record)?;
        tracing::debug!(ticket_id = %created.id, "created ticket");
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Ticket>> {
        let response = self
            .request(reqwest::Method::GET, "tickets")
            .query(&[("select", TICKET_SELECT), ("order", "created_at.desc")])
            .send()
            .await?;

        Self::rows(response)
            .await?
            .into_iter()
            .map(Ticket::try_from)
            .collect()
    }

    async fn get(&self, id: &TicketId) -> Result<Ticket> {
        let id_filter = format!("eq.{id}");
        let response = self
            .request(reqwest::Method::GET, "tickets")
            .query(&[("select", TICKET_SELECT), ("id", id_filter.as_str())])
            .send()
            .await?;

        let records = Self::rows(response).await?;
        match records.into_iter().next() {
            Some(record) => Ticket::try_from(record),
            None => Err(StoreError::NotFound(id.clone())),
        }
    }

    async fn update_status(&self, id: &TicketId, status: TicketStatus) -> Result<()> {
        let id_filter = format!("eq.{id}");
        let response = self
            .request(reqwest::Method::PATCH, "tickets")
            .header("Prefer", "return=representation")
            .query(&[("id", id_filter.as_str())])
            .json(&StatusPatch::new(status))
            .send()
            .await?;

        let records = Self::rows(response).await?;
        if records.is_empty() {
            return Err(StoreError::NotFound(id.clone()));
        }
        tracing::debug!(ticket_id = %id, status = %status, "updated ticket status");
        Ok(())
    }

    async fn create_feedback(&self, feedback: NewFeedback) -> Result<()> {
        let response = self
            .request(reqwest::Method::POST, "feedback")
            .header("Prefer", "return=minimal")
            .json(&NewFeedbackRecord::from(&feedback))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        tracing::debug!(ticket_id = %feedback.ticket_id, "submitted feedback");
        Ok(())
    }
}

impl std::fmt::Debug for RestTicketStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestTicketStore")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
