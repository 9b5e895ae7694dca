//! Draft delivery sinks.
//!
//! A `DraftSink` receives a composed email and stores it somewhere a human
//! can review before anything is sent. The Gmail implementation creates a
//! real draft in the authenticated mailbox; the file outbox is the dry-run
//! sink used to preview a campaign.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Destination for composed drafts.
#[async_trait]
pub trait DraftSink: Send + Sync {
    async fn create_draft(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Production endpoint of the Gmail API.
pub const DEFAULT_API_BASE: &str = "https://gmail.googleapis.com";

/// Gmail sink: creates a draft under the authenticated user.
pub struct GmailDrafts {
    http: reqwest::Client,
    api_base: String,
    access_token: String,
}

impl GmailDrafts {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            access_token: access_token.into(),
        }
    }

    /// Override the API endpoint (tests, proxies).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl DraftSink for GmailDrafts {
    async fn create_draft(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let raw = URL_SAFE_NO_PAD.encode(build_rfc2822(to, subject, body));

        let resp = self
            .http
            .post(format!("{}/gmail/v1/users/me/drafts", self.api_base))
            .bearer_auth(&self.access_token)
            .json(&json!({ "message": { "raw": raw } }))
            .send()
            .await
            .context("draft creation request failed")?;

        let status = resp.status();
        if !status.is_success() {
            bail!("draft creation returned {status}");
        }
        debug!(to, "gmail draft created");
        Ok(())
    }
}

/// Assemble the RFC 2822 message the drafts API expects.
pub(crate) fn build_rfc2822(to: &str, subject: &str, body: &str) -> String {
    format!(
        "To: {to}\r\nSubject: {subject}\r\nContent-Type: text/plain; charset=\"UTF-8\"\r\n\r\n{body}"
    )
}

/// Dry-run sink: one numbered `.eml` file per draft in an outbox directory.
pub struct FileOutbox {
    dir: PathBuf,
    counter: AtomicUsize,
}

impl FileOutbox {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counter: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DraftSink for FileOutbox {
    async fn create_draft(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create outbox at {}", self.dir.display()))?;

        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let path = self.dir.join(format!("draft_{n:03}.eml"));
        std::fs::write(&path, build_rfc2822(to, subject, body))
            .with_context(|| format!("failed to write draft to {}", path.display()))?;
        debug!(path = %path.display(), "draft written to outbox");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_rfc2822() {
        let message = build_rfc2822("jane@initech.com", "Hello", "Body text");
        assert!(message.starts_with("To: jane@initech.com\r\n"));
        assert!(message.contains("Subject: Hello\r\n"));
        assert!(message.ends_with("\r\n\r\nBody text"));
    }

    #[tokio::test]
    async fn test_gmail_draft_round_trips_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gmail/v1/users/me/drafts"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "id": "draft-1" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let sink = GmailDrafts::new("tok-123").with_api_base(server.uri());
        sink.create_draft("jane@initech.com", "Hello", "Body")
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let raw = body["message"]["raw"].as_str().unwrap();
        let decoded = String::from_utf8(URL_SAFE_NO_PAD.decode(raw).unwrap()).unwrap();
        assert_eq!(decoded, build_rfc2822("jane@initech.com", "Hello", "Body"));
    }

    #[tokio::test]
    async fn test_gmail_error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gmail/v1/users/me/drafts"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let sink = GmailDrafts::new("tok-123").with_api_base(server.uri());
        let result = sink.create_draft("jane@initech.com", "Hello", "Body").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_file_outbox_numbers_drafts() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileOutbox::new(dir.path());

        sink.create_draft("a@example.com", "One", "1").await.unwrap();
        sink.create_draft("b@example.com", "Two", "2").await.unwrap();

        let first = std::fs::read_to_string(dir.path().join("draft_001.eml")).unwrap();
        assert!(first.contains("To: a@example.com"));
        let second = std::fs::read_to_string(dir.path().join("draft_002.eml")).unwrap();
        assert!(second.contains("Subject: Two"));
    }
}
