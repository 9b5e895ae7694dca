//! Runtime configuration loaded from the environment.
//!
//! Every credential and identifier is read here and injected at call
//! boundaries; nothing downstream reads the environment or hardcodes an id.
//! A `.env` file is honored when present (loaded by the binary entry point).

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable is missing or unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),
    #[error("{0} environment variable cannot be empty")]
    Empty(&'static str),
}

/// Proxy geolocation for the browser session.
#[derive(Debug, Clone, Serialize)]
pub struct Geolocation {
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Default for Geolocation {
    fn default() -> Self {
        Self {
            city: "New York".to_string(),
            state: "NY".to_string(),
            country: "US".to_string(),
        }
    }
}

/// Session-provisioning settings for the remote browser API.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// API key for the session-provisioning service.
    pub api_key: String,
    /// Project the sessions are created under.
    pub project_id: String,
    /// Persistent browser context to reuse, when one has been created.
    pub context_id: Option<String>,
    /// Proxy geolocation for created sessions.
    pub geolocation: Geolocation,
    /// Base URL of the provisioning API. Overridable for tests.
    pub api_base: String,
}

impl SessionConfig {
    /// Read session settings from `BROWSERBASE_*` and `REACH_GEO_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let geolocation = Geolocation {
            city: optional("REACH_GEO_CITY").unwrap_or_else(|| Geolocation::default().city),
            state: optional("REACH_GEO_STATE").unwrap_or_else(|| Geolocation::default().state),
            country: optional("REACH_GEO_COUNTRY").unwrap_or_else(|| Geolocation::default().country),
        };

        Ok(Self {
            api_key: require("BROWSERBASE_API_KEY")?,
            project_id: require("BROWSERBASE_PROJECT_ID")?,
            context_id: optional("BROWSERBASE_CONTEXT_ID"),
            geolocation,
            api_base: optional("BROWSERBASE_API_BASE")
                .unwrap_or_else(|| crate::acquisition::session::DEFAULT_API_BASE.to_string()),
        })
    }
}

/// LinkedIn form-login credentials.
#[derive(Debug, Clone)]
pub struct LinkedInCredentials {
    pub username: String,
    pub password: String,
}

impl LinkedInCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            username: require("LINKEDIN_USERNAME")?,
            password: require("LINKEDIN_PASSWORD")?,
        })
    }
}

/// Optional API keys for the selector-LLM, enrichment, and draft services.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub openai: Option<String>,
    pub apollo: Option<String>,
    pub gmail_access_token: Option<String>,
}

impl ApiKeys {
    pub fn from_env() -> Self {
        Self {
            openai: optional("OPENAI_API_KEY"),
            apollo: optional("APOLLO_API_KEY"),
            gmail_access_token: optional("GMAIL_ACCESS_TOKEN"),
        }
    }
}

/// LinkedIn origin used for URL resolution, overridable for tests.
pub fn linkedin_origin() -> String {
    optional("REACH_ORIGIN")
        .unwrap_or_else(|| crate::extraction::reactors::LINKEDIN_ORIGIN.to_string())
}

/// Directory run artifacts are written to.
pub fn output_dir() -> PathBuf {
    optional("REACH_OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Required variable: must be set and non-empty after trimming.
fn require(name: &'static str) -> Result<String, ConfigError> {
    let value = std::env::var(name).map_err(|_| ConfigError::Missing(name))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty(name));
    }
    Ok(trimmed.to_string())
}

/// Optional variable: unset and empty both collapse to `None`.
fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_reports_missing_and_empty() {
        std::env::remove_var("REACH_TEST_REQUIRE_A");
        assert_eq!(
            require("REACH_TEST_REQUIRE_A"),
            Err(ConfigError::Missing("REACH_TEST_REQUIRE_A"))
        );

        std::env::set_var("REACH_TEST_REQUIRE_B", "   ");
        assert_eq!(
            require("REACH_TEST_REQUIRE_B"),
            Err(ConfigError::Empty("REACH_TEST_REQUIRE_B"))
        );

        std::env::set_var("REACH_TEST_REQUIRE_C", " value ");
        assert_eq!(require("REACH_TEST_REQUIRE_C").unwrap(), "value");
    }

    #[test]
    fn test_optional_collapses_empty_to_none() {
        std::env::remove_var("REACH_TEST_OPTIONAL_A");
        assert_eq!(optional("REACH_TEST_OPTIONAL_A"), None);

        std::env::set_var("REACH_TEST_OPTIONAL_B", "");
        assert_eq!(optional("REACH_TEST_OPTIONAL_B"), None);

        std::env::set_var("REACH_TEST_OPTIONAL_C", "ctx-123");
        assert_eq!(optional("REACH_TEST_OPTIONAL_C").as_deref(), Some("ctx-123"));
    }

    #[test]
    fn test_default_geolocation() {
        let geo = Geolocation::default();
        assert_eq!(geo.city, "New York");
        assert_eq!(geo.state, "NY");
        assert_eq!(geo.country, "US");
    }
}
