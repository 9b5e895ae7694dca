//! Contact enrichment via a people-match REST API.
//!
//! Looks up an email address for an extracted reactor by name and, when
//! known, employer. Any API or transport failure degrades to "no match":
//! the caller skips the contact and moves on.

use crate::extraction::reactors::ReactorRecord;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

/// Production endpoint of the enrichment API.
pub const DEFAULT_API_BASE: &str = "https://api.apollo.io";

/// Enrichment result for one contact.
#[derive(Debug, Clone, Default)]
pub struct EnrichedContact {
    pub email: Option<String>,
    pub email_status: Option<String>,
    pub title: Option<String>,
    pub organization: Option<String>,
    pub linkedin_url: Option<String>,
}

/// Client for the people-match API.
pub struct EnrichmentClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl EnrichmentClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Override the API endpoint (tests, proxies).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Look up a contact. `None` covers both "no match" and any API failure.
    pub async fn match_person(&self, record: &ReactorRecord) -> Option<EnrichedContact> {
        #[derive(Deserialize)]
        struct MatchResponse {
            person: Option<Person>,
        }
        #[derive(Deserialize)]
        struct Person {
            email: Option<String>,
            email_status: Option<String>,
            title: Option<String>,
            organization: Option<Organization>,
            linkedin_url: Option<String>,
        }
        #[derive(Deserialize)]
        struct Organization {
            name: Option<String>,
        }

        let resp = self
            .http
            .post(format!("{}/v1/people/match", self.api_base))
            .header("X-Api-Key", &self.api_key)
            .header("Cache-Control", "no-cache")
            .json(&build_match_body(record))
            .send()
            .await;

        let resp = match resp {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                warn!(status = %resp.status(), name = %record.name, "enrichment API error");
                return None;
            }
            Err(err) => {
                warn!(error = %err, name = %record.name, "enrichment request failed");
                return None;
            }
        };

        let parsed: MatchResponse = match resp.json().await {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "malformed enrichment response");
                return None;
            }
        };

        let person = parsed.person?;
        Some(EnrichedContact {
            email: person.email,
            email_status: person.email_status,
            title: person.title,
            organization: person.organization.and_then(|org| org.name),
            linkedin_url: person.linkedin_url,
        })
    }
}

/// Request body for a person match: full name, first/last split when the
/// name has at least two words, and the employer only when one was derived.
pub(crate) fn build_match_body(record: &ReactorRecord) -> Value {
    let mut body = json!({
        "name": record.name,
        "reveal_personal_emails": false,
    });

    let mut words = record.name.split_whitespace();
    if let (Some(first), Some(second)) = (words.next(), words.next()) {
        let rest: Vec<&str> = std::iter::once(second).chain(words).collect();
        body["first_name"] = json!(first);
        body["last_name"] = json!(rest.join(" "));
    }

    if let Some(company) = &record.company {
        body["organization_name"] = json!(company);
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::reactors::ConnectionDegree;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(name: &str, company: Option<&str>) -> ReactorRecord {
        ReactorRecord {
            name: name.to_string(),
            title: None,
            company: company.map(String::from),
            connection_degree: ConnectionDegree::Unknown,
            profile_url: None,
            extraction_timestamp: "2026-08-06T00:00:00+00:00".to_string(),
            element_text: String::new(),
        }
    }

    #[test]
    fn test_build_match_body_splits_name() {
        let body = build_match_body(&record("Jane van der Berg", Some("Initech")));
        assert_eq!(body["name"], "Jane van der Berg");
        assert_eq!(body["first_name"], "Jane");
        assert_eq!(body["last_name"], "van der Berg");
        assert_eq!(body["organization_name"], "Initech");
        assert_eq!(body["reveal_personal_emails"], false);
    }

    #[test]
    fn test_build_match_body_single_word_name() {
        let body = build_match_body(&record("Cher", None));
        assert_eq!(body["name"], "Cher");
        assert!(body.get("first_name").is_none());
        assert!(body.get("organization_name").is_none());
    }

    #[tokio::test]
    async fn test_match_person_returns_contact() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/people/match"))
            .and(header("X-Api-Key", "apollo-key"))
            .and(body_partial_json(serde_json::json!({
                "first_name": "Jane",
                "last_name": "Doe",
                "organization_name": "Initech",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "person": {
                    "email": "jane@initech.com",
                    "email_status": "verified",
                    "title": "Senior Engineer",
                    "organization": { "name": "Initech" },
                    "linkedin_url": "https://www.linkedin.com/in/janedoe"
                }
            })))
            .mount(&server)
            .await;

        let client = EnrichmentClient::new("apollo-key").with_api_base(server.uri());
        let contact = client
            .match_person(&record("Jane Doe", Some("Initech")))
            .await
            .unwrap();

        assert_eq!(contact.email.as_deref(), Some("jane@initech.com"));
        assert_eq!(contact.email_status.as_deref(), Some("verified"));
        assert_eq!(contact.organization.as_deref(), Some("Initech"));
    }

    #[tokio::test]
    async fn test_match_person_api_error_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/people/match"))
            .respond_with(ResponseTemplate::new(422))
            .mount(&server)
            .await;

        let client = EnrichmentClient::new("apollo-key").with_api_base(server.uri());
        assert!(client.match_person(&record("Jane Doe", None)).await.is_none());
    }

    #[tokio::test]
    async fn test_match_person_empty_match_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/people/match"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "person": null })),
            )
            .mount(&server)
            .await;

        let client = EnrichmentClient::new("apollo-key").with_api_base(server.uri());
        assert!(client.match_person(&record("Jane Doe", None)).await.is_none());
    }
}
