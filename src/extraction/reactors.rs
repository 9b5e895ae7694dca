//! Reactor profile extraction from a rendered reactions modal.
//!
//! Given the modal's HTML, locates reactor list elements through ordered
//! selector families and derives a `ReactorRecord` per element from its
//! unstructured text. Extraction is best-effort: an element without a
//! plausible name yields no record, and a malformed element never fails the
//! whole call.

use crate::extraction::selectors::{first_matching_family, SelectorFamily};
use chrono::Utc;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

// ---- Public types -----------------------------------------------------------

/// Origin used to absolutize relative profile hrefs.
pub const LINKEDIN_ORIGIN: &str = "https://www.linkedin.com";

/// Sentinel serialized for fields no value could be derived for.
pub const NOT_AVAILABLE: &str = "N/A";

/// Hard cap on processed reactor elements per modal.
pub const MAX_REACTORS: usize = 20;

/// Network distance between the viewer and a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionDegree {
    #[serde(rename = "1st")]
    First,
    #[serde(rename = "2nd")]
    Second,
    #[serde(rename = "3rd")]
    Third,
    #[serde(rename = "N/A")]
    Unknown,
}

impl ConnectionDegree {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionDegree::First => "1st",
            ConnectionDegree::Second => "2nd",
            ConnectionDegree::Third => "3rd",
            ConnectionDegree::Unknown => NOT_AVAILABLE,
        }
    }
}

impl fmt::Display for ConnectionDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single extracted reactor profile.
///
/// Immutable once created; a fresh extraction produces a fresh list. Optional
/// fields serialize to exactly `"N/A"` when absent, which downstream report
/// and outreach code compares against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactorRecord {
    /// Display name; never empty and never a structural noise token.
    pub name: String,
    /// Headline or job title.
    #[serde(with = "na_string")]
    pub title: Option<String>,
    /// Employer, usually derived from an "at <company>" pattern.
    #[serde(with = "na_string")]
    pub company: Option<String>,
    /// Connection degree label.
    pub connection_degree: ConnectionDegree,
    /// Absolute profile URL.
    #[serde(with = "na_string")]
    pub profile_url: Option<String>,
    /// Wall-clock time of extraction, set once at creation.
    pub extraction_timestamp: String,
    /// Truncated raw text snapshot kept for downstream debugging.
    pub element_text: String,
}

/// Serialize `None` as the `"N/A"` sentinel and read it back as `None`.
mod na_string {
    use super::NOT_AVAILABLE;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(NOT_AVAILABLE))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw.is_empty() || raw == NOT_AVAILABLE {
            None
        } else {
            Some(raw)
        })
    }
}

// ---- Extraction -------------------------------------------------------------

/// Reactor list-element families, highest priority first.
const REACTOR_FAMILIES: &[SelectorFamily] = &[
    SelectorFamily {
        name: "hotkey-item",
        css: "[data-finite-scroll-hotkey-item]",
    },
    SelectorFamily {
        name: "artdeco-list",
        css: ".artdeco-list__item",
    },
    SelectorFamily {
        name: "profile-card",
        css: r#"[data-view-name="profile-card"]"#,
    },
    SelectorFamily {
        name: "reaction-list",
        css: ".reaction-list-item",
    },
    SelectorFamily {
        name: "shared-actor",
        css: ".feed-shared-actor",
    },
    SelectorFamily {
        name: "urn-item",
        css: "li[data-urn]",
    },
];

/// Inner-element selectors likely to hold the display name.
const NAME_SELECTORS: &[&str] = &[
    "h3",
    ".actor-name",
    ".feed-shared-actor__name",
    r#"span[dir="ltr"]"#,
    "strong",
];

/// Structural noise a derived name must not equal.
const NOISE_TOKENS: &[&str] = &["view", "profile", "degree", "connection"];

/// Role words that mark a text line as a headline rather than a name.
const ROLE_KEYWORDS: &[&str] = &[
    "manager",
    "engineer",
    "founder",
    "director",
    "lead",
    "specialist",
    "aws",
    "amazon",
];

/// Title keywords for the last-resort element search.
const TITLE_KEYWORDS: &[&str] = &["Manager", "Engineer", "Founder"];

const ELEMENT_TEXT_SNAPSHOT_CHARS: usize = 200;

/// Extract reactor profiles from the HTML of a rendered reactions modal.
///
/// Locates candidate elements via [`REACTOR_FAMILIES`] (first family with a
/// match wins), processes at most [`MAX_REACTORS`] of them, and derives one
/// record per element. Elements without a plausible name are dropped with a
/// diagnostic; duplicate names within one modal are collapsed. Empty input
/// yields an empty list, never an error.
pub fn extract_reactors(html: &str, origin: &str) -> Vec<ReactorRecord> {
    let doc = Html::parse_document(html);

    let elements = match first_matching_family(&doc, REACTOR_FAMILIES) {
        Some((family, matches)) => {
            debug!(family, count = matches.len(), "matched reactor family");
            matches
        }
        None => {
            let fallback = keyword_fallback(&doc);
            if fallback.is_empty() {
                warn!("no reactor elements found in modal HTML");
            } else {
                debug!(count = fallback.len(), "using keyword fallback elements");
            }
            fallback
        }
    };

    let mut seen_names: HashSet<String> = HashSet::new();
    let mut records = Vec::new();

    for (idx, element) in elements.into_iter().take(MAX_REACTORS).enumerate() {
        match extract_one(element, origin) {
            Some(record) if seen_names.insert(record.name.clone()) => records.push(record),
            Some(record) => debug!(idx, name = %record.name, "dropped duplicate reactor"),
            None => debug!(idx, "skipped reactor element without a plausible name"),
        }
    }

    records
}

/// Last-resort candidates: any `div` whose text mentions a common title word.
fn keyword_fallback<'a>(doc: &'a Html) -> Vec<ElementRef<'a>> {
    let selector = Selector::parse("div").expect("div selector is valid");
    doc.select(&selector)
        .filter(|el| {
            let text: String = el.text().collect();
            TITLE_KEYWORDS.iter().any(|kw| text.contains(kw))
        })
        .collect()
}

/// Derive one record from a reactor element, or `None` if no acceptable name
/// could be found.
fn extract_one(element: ElementRef<'_>, origin: &str) -> Option<ReactorRecord> {
    let lines = element_text_lines(element);
    let raw_text = lines.join("\n");

    let name = derive_name(element, &lines)?;
    let title = derive_title(&lines, &name);
    let company = derive_company(title.as_deref(), &raw_text);

    Some(ReactorRecord {
        connection_degree: derive_degree(&raw_text),
        profile_url: derive_profile_url(element, origin),
        extraction_timestamp: Utc::now().to_rfc3339(),
        element_text: raw_text.chars().take(ELEMENT_TEXT_SNAPSHOT_CHARS).collect(),
        name,
        title,
        company,
    })
}

/// Non-empty trimmed text lines of an element, in document order.
fn element_text_lines(element: ElementRef<'_>) -> Vec<String> {
    element
        .text()
        .flat_map(|chunk| chunk.split('\n'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Find the display name: inner selectors first, then a top-to-bottom line
/// scan that skips obvious non-name lines.
fn derive_name(element: ElementRef<'_>, lines: &[String]) -> Option<String> {
    for css in NAME_SELECTORS {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        if let Some(inner) = element.select(&selector).next() {
            let text = collapse_whitespace(&inner.text().collect::<String>());
            if text.len() > 1 && !is_numeric(&text) {
                return validate_name(&text);
            }
        }
    }

    let candidate = lines.iter().find(|line| {
        line.len() > 2
            && !is_numeric(line)
            && !line.contains('\u{2022}')
            && !contains_role_keyword(line)
    })?;
    validate_name(candidate)
}

/// Final acceptance gate: reject empty, purely numeric, and noise-token names.
fn validate_name(candidate: &str) -> Option<String> {
    let name = candidate.trim();
    if name.len() <= 1 || is_numeric(name) {
        return None;
    }
    let lower = name.to_lowercase();
    if NOISE_TOKENS.contains(&lower.as_str()) {
        return None;
    }
    Some(name.to_string())
}

/// The first non-empty line strictly after the line matching `name`.
fn derive_title(lines: &[String], name: &str) -> Option<String> {
    lines
        .iter()
        .skip_while(|line| line.as_str() != name)
        .nth(1)
        .cloned()
}

/// First profile anchor; relative hrefs are rewritten against `origin`.
fn derive_profile_url(element: ElementRef<'_>, origin: &str) -> Option<String> {
    let selector = Selector::parse(r#"a[href*="/in/"]"#).expect("profile anchor selector is valid");
    let href = element.select(&selector).next()?.value().attr("href")?;
    if href.starts_with('/') {
        Some(format!("{origin}{href}"))
    } else {
        Some(href.to_string())
    }
}

/// First ordinal-suffixed digit run anywhere in the raw text.
fn derive_degree(raw_text: &str) -> ConnectionDegree {
    let re = Regex::new(r"(\d+)(st|nd|rd|th)").expect("degree regex is valid");
    let Some(caps) = re.captures(raw_text) else {
        return ConnectionDegree::Unknown;
    };
    let digits = caps.get(1).map_or("", |m| m.as_str());
    let suffix = caps.get(2).map_or("", |m| m.as_str());
    match (digits, suffix) {
        ("1", "st") => ConnectionDegree::First,
        ("2", "nd") => ConnectionDegree::Second,
        ("3", "rd") => ConnectionDegree::Third,
        _ => ConnectionDegree::Unknown,
    }
}

/// Company from the title's last " at " segment, else from the raw text.
fn derive_company(title: Option<&str>, raw_text: &str) -> Option<String> {
    if let Some(title) = title {
        if let Some(idx) = title.rfind(" at ") {
            let company = title[idx + 4..].trim();
            if !company.is_empty() {
                return Some(company.to_string());
            }
        }
    }

    let re = Regex::new(r" at ([^\n\u{2022}]+)").expect("company regex is valid");
    re.captures(raw_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|company| !company.is_empty())
}

fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

fn contains_role_keyword(line: &str) -> bool {
    let lower = line.to_lowercase();
    ROLE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---- Tests ------------------------------------------------------------------
