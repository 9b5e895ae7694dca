//! Remote browser session provisioning.
//!
//! Thin client for a Browserbase-style session API: create a persistent
//! browser context once, then create sessions bound to it so LinkedIn
//! authentication survives across runs. Sessions are routed through a
//! geolocated proxy.

use crate::config::SessionConfig;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::json;

/// Production endpoint of the session-provisioning API.
pub const DEFAULT_API_BASE: &str = "https://api.browserbase.com";

/// A provisioned remote browser session.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSession {
    /// Session id, also usable with the service's live inspector.
    pub id: String,
    /// CDP websocket URL to connect a driver to.
    #[serde(rename = "connectUrl")]
    pub connect_url: String,
}

/// Client for the session-provisioning API.
pub struct SessionClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl SessionClient {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Create a persisted browser context under `project_id`; returns its id.
    ///
    /// Run once per account: the returned id goes into the configuration so
    /// later sessions reuse the stored cookies.
    pub async fn create_context(&self, project_id: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct ContextResponse {
            id: String,
        }

        let resp = self
            .http
            .post(format!("{}/v1/contexts", self.api_base))
            .header("X-BB-API-Key", &self.api_key)
            .json(&json!({ "projectId": project_id }))
            .send()
            .await
            .context("context creation request failed")?;

        let status = resp.status();
        if !status.is_success() {
            bail!("context creation returned {status}");
        }

        Ok(resp.json::<ContextResponse>().await?.id)
    }

    /// Create a session, bound to the configured persistent context when one
    /// is set, with cookie persistence enabled.
    pub async fn create_session(&self, config: &SessionConfig) -> Result<BrowserSession> {
        let browser_settings = match &config.context_id {
            Some(context_id) => json!({
                "context": { "id": context_id, "persist": true }
            }),
            None => json!({}),
        };

        let body = json!({
            "projectId": config.project_id,
            "browserSettings": browser_settings,
            "proxies": [{
                "type": "browserbase",
                "geolocation": config.geolocation,
            }],
        });

        let resp = self
            .http
            .post(format!("{}/v1/sessions", self.api_base))
            .header("X-BB-API-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("session creation request failed")?;

        let status = resp.status();
        if !status.is_success() {
            bail!("session creation returned {status}");
        }

        resp.json::<BrowserSession>()
            .await
            .context("malformed session creation response")
    }

    /// Human-viewable inspector URL for a session.
    pub fn inspector_url(session_id: &str) -> String {
        format!("https://browserbase.com/sessions/{session_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Geolocation;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(api_base: String, context_id: Option<String>) -> SessionConfig {
        SessionConfig {
            api_key: "test-key".to_string(),
            project_id: "proj-1".to_string(),
            context_id,
            geolocation: Geolocation::default(),
            api_base,
        }
    }

    #[tokio::test]
    async fn test_create_session_with_persistent_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/sessions"))
            .and(header("X-BB-API-Key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "projectId": "proj-1",
                "browserSettings": {
                    "context": { "id": "ctx-9", "persist": true }
                },
                "proxies": [{
                    "type": "browserbase",
                    "geolocation": { "city": "New York", "state": "NY", "country": "US" }
                }],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "sess-42",
                "connectUrl": "wss://connect.example/sess-42",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = test_config(server.uri(), Some("ctx-9".to_string()));
        let session = SessionClient::new(&config)
            .create_session(&config)
            .await
            .unwrap();

        assert_eq!(session.id, "sess-42");
        assert_eq!(session.connect_url, "wss://connect.example/sess-42");
    }

    #[tokio::test]
    async fn test_create_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/contexts"))
            .and(body_partial_json(serde_json::json!({ "projectId": "proj-1" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "id": "ctx-new" })),
            )
            .mount(&server)
            .await;

        let config = test_config(server.uri(), None);
        let id = SessionClient::new(&config)
            .create_context("proj-1")
            .await
            .unwrap();
        assert_eq!(id, "ctx-new");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/sessions"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let config = test_config(server.uri(), None);
        let result = SessionClient::new(&config).create_session(&config).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_inspector_url() {
        assert_eq!(
            SessionClient::inspector_url("sess-42"),
            "https://browserbase.com/sessions/sess-42"
        );
    }
}
