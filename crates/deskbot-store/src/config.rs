// Store client configuration

use crate::error::StoreError;

/// Connection settings for the hosted store, read from the environment.
///
/// - `DESKBOT_STORE_URL`: base URL of the store's REST surface
/// - `DESKBOT_STORE_KEY`: API key sent with every request
#[derive(Clone)]
pub struct StoreConfig {
    pub base_url: String,
    pub api_key: String,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Load configuration from the environment (reading `.env` if present).
    pub fn from_env() -> Result<Self, StoreError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("DESKBOT_STORE_URL")
            .map_err(|_| StoreError::config("DESKBOT_STORE_URL is not set"))?;
        let api_key = std::env::var("DESKBOT_STORE_KEY")
            .map_err(|_| StoreError::config("DESKBOT_STORE_KEY is not set"))?;
        Ok(Self { base_url, api_key })
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_the_key() {
        let config = StoreConfig::new("https://store.example.com", "secret-key");
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret-key"));
    }
}
