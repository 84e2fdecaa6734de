//! HTTP adapter shipping audit entries to a remote collector.
//!
//! `reqwest::Client` is `Clone + Send + Sync`, so no external locking is
//! needed. The recorder in front of this sink already tolerates failures, so
//! the adapter maps them faithfully instead of retrying.

use async_trait::async_trait;
use url::Url;

use crate::domain::AuditEntry;
use crate::domain::ports::{AuditSink, AuditSinkError};

/// Sink posting entries to `{base}/api/audit-entries`.
#[derive(Debug, Clone)]
pub struct HttpAuditSink {
    client: reqwest::Client,
    base: Url,
}

impl HttpAuditSink {
    /// Create a sink for the given collector base URL.
    #[must_use]
    pub fn new(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    fn endpoint(&self) -> Result<Url, AuditSinkError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| AuditSinkError::rejected("collector base URL cannot take a path"))?
            .extend(["api", "audit-entries"]);
        Ok(url)
    }
}

#[async_trait]
impl AuditSink for HttpAuditSink {
    async fn append(&self, entry: &AuditEntry) -> Result<(), AuditSinkError> {
        let url = self.endpoint()?;
        let response = self
            .client
            .post(url)
            .json(entry)
            .send()
            .await
            .map_err(|error| AuditSinkError::connection(error.to_string()))?;

        if !response.status().is_success() {
            return Err(AuditSinkError::rejected(format!(
                "HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }
}
