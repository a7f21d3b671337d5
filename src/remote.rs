//! Client interface to the authoritative care-notes backend.
//!
//! The sync engine only needs two operations and never distinguishes
//! failure sub-causes: any error from either call means "remote
//! unavailable" for control-flow purposes. Timeouts are the transport
//! client's concern, not the engine's.

use crate::error::RemoteError;
use crate::note::{Note, NoteDraft};
use async_trait::async_trait;
use reqwest::Client;

/// The backend's note operations as seen by the sync engine.
#[async_trait]
pub trait Remote: Send + Sync {
    /// Fetch the backend's full note set.
    async fn list(&self) -> Result<Vec<Note>, RemoteError>;

    /// Create a note on the backend; the server assigns the final id.
    async fn create(&self, draft: &NoteDraft) -> Result<Note, RemoteError>;
}

/// HTTP implementation of [`Remote`] against the `/care-notes` endpoints.
pub struct HttpRemote {
    client: Client,
    base_url: String,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Use a caller-configured client (timeouts, proxies, TLS settings).
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn notes_url(&self) -> String {
        format!("{}/care-notes", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Remote for HttpRemote {
    async fn list(&self) -> Result<Vec<Note>, RemoteError> {
        let resp = self.client.get(self.notes_url()).send().await?;
        if !resp.status().is_success() {
            return Err(RemoteError::Status(resp.status().as_u16()));
        }
        Ok(resp.json().await?)
    }

    async fn create(&self, draft: &NoteDraft) -> Result<Note, RemoteError> {
        let resp = self
            .client
            .post(self.notes_url())
            .json(draft)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(RemoteError::Status(resp.status().as_u16()));
        }
        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_url_handles_trailing_slash() {
        let remote = HttpRemote::new("http://localhost:3001/api/");
        assert_eq!(remote.notes_url(), "http://localhost:3001/api/care-notes");

        let remote = HttpRemote::new("http://localhost:3001/api");
        assert_eq!(remote.notes_url(), "http://localhost:3001/api/care-notes");
    }
}
