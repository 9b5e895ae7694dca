//! Pluggable post-selection strategies.
//!
//! The deterministic fallback list is the default; the chat-completion-backed
//! strategy must be enabled explicitly and is never consulted by tests. Its
//! proposals are sanitized before use and any API failure degrades to "no
//! proposal" so the caller falls through to the fixed selector list.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

/// Maximum HTML characters shipped to the model.
const MAX_HTML_SNIPPET_CHARS: usize = 3_000;

const DEFAULT_API_BASE: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o-2024-11-20";

/// Proposes a CSS selector for the most recent post on a notifications page.
#[async_trait]
pub trait SelectorStrategy: Send + Sync {
    /// A sanitized selector proposal, or `None` to use the fallback list.
    async fn propose(&self, page_html: &str) -> Result<Option<String>>;
}

/// Deterministic strategy: never proposes, callers use the fallback list.
pub struct FallbackOnly;

#[async_trait]
impl SelectorStrategy for FallbackOnly {
    async fn propose(&self, _page_html: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Chat-completion-backed strategy.
pub struct LlmSelector {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl LlmSelector {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the API endpoint (tests, proxies).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl SelectorStrategy for LlmSelector {
    async fn propose(&self, page_html: &str) -> Result<Option<String>> {
        #[derive(Deserialize)]
        struct Completion {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }
        #[derive(Deserialize)]
        struct Message {
            content: String,
        }

        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are a web automation expert. Return only CSS selectors."
                },
                { "role": "user", "content": build_prompt(page_html) },
            ],
            "max_tokens": 200,
            "temperature": 0.1,
        });

        let resp = self
            .http
            .post(format!("{}/v1/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await;

        let resp = match resp {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                warn!(status = %resp.status(), "selector proposal request rejected");
                return Ok(None);
            }
            Err(err) => {
                warn!(error = %err, "selector proposal request failed");
                return Ok(None);
            }
        };

        let completion: Completion = match resp.json().await {
            Ok(completion) => completion,
            Err(err) => {
                warn!(error = %err, "malformed selector proposal response");
                return Ok(None);
            }
        };

        let proposal = completion
            .choices
            .first()
            .and_then(|choice| sanitize_selector(&choice.message.content));
        if let Some(selector) = &proposal {
            debug!(selector, "model proposed selector");
        }
        Ok(proposal)
    }
}

/// Instruction sent alongside a truncated HTML snippet.
fn build_prompt(page_html: &str) -> String {
    let snippet: String = page_html.chars().take(MAX_HTML_SNIPPET_CHARS).collect();
    format!(
        "Here is the HTML of a LinkedIn notifications page:\n\n{snippet}\n\n\
         Provide a single CSS selector that clicks the FIRST (most recent) \
         post notification. Look for links to posts (href containing \
         \"/feed/update/\"), clickable notification items, or the topmost \
         item in the list. Return ONLY the selector, nothing else."
    )
}

/// Strip code fences and backticks from a model reply and keep the first
/// non-empty line. `None` when nothing usable remains.
pub(crate) fn sanitize_selector(raw: &str) -> Option<String> {
    let cleaned = raw
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with("```"))
        .map(|line| line.trim_matches('`').trim())
        .find(|line| !line.is_empty())?;
    Some(cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_sanitize_selector() {
        assert_eq!(
            sanitize_selector("`a[href*=\"/feed/update/\"]:first-of-type`").as_deref(),
            Some("a[href*=\"/feed/update/\"]:first-of-type")
        );
        assert_eq!(
            sanitize_selector("```css\n.notification-item a\n```").as_deref(),
            Some(".notification-item a")
        );
        assert_eq!(
            sanitize_selector("  li[data-urn] a  ").as_deref(),
            Some("li[data-urn] a")
        );
        assert_eq!(sanitize_selector("```\n```"), None);
        assert_eq!(sanitize_selector(""), None);
    }

    #[test]
    fn test_build_prompt_truncates_html() {
        let html = "x".repeat(10_000);
        let prompt = build_prompt(&html);
        assert!(prompt.len() < 4_000);
        assert!(prompt.contains("CSS selector"));
    }

    #[tokio::test]
    async fn test_fallback_only_never_proposes() {
        let proposal = FallbackOnly.propose("<html></html>").await.unwrap();
        assert!(proposal.is_none());
    }

    #[tokio::test]
    async fn test_llm_proposal_is_sanitized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": "`a[href*=\"/feed/update/\"]:first-of-type`"
                    }
                }]
            })))
            .mount(&server)
            .await;

        let strategy = LlmSelector::new("sk-test").with_api_base(server.uri());
        let proposal = strategy.propose("<html></html>").await.unwrap();
        assert_eq!(
            proposal.as_deref(),
            Some("a[href*=\"/feed/update/\"]:first-of-type")
        );
    }

    #[tokio::test]
    async fn test_llm_error_degrades_to_no_proposal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let strategy = LlmSelector::new("sk-test").with_api_base(server.uri());
        let proposal = strategy.propose("<html></html>").await.unwrap();
        assert!(proposal.is_none());
    }
}
