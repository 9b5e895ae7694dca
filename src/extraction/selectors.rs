//! Ordered selector families with first-match-wins resolution.
//!
//! LinkedIn markup drifts constantly, so nothing here trusts a single CSS
//! selector. A lookup is an ordered list of families; the first family that
//! yields at least one element wins and later families are never consulted.

use scraper::{ElementRef, Html, Selector};

/// One candidate selector in an ordered fallback list.
#[derive(Debug, Clone, Copy)]
pub struct SelectorFamily {
    /// Short label used in diagnostics.
    pub name: &'static str,
    /// The CSS selector for this family.
    pub css: &'static str,
}

/// Apply `families` in order against a parsed document.
///
/// Returns the winning family's name and every element it matched, or `None`
/// when no family matched anything. Families whose selector fails to parse
/// are skipped.
pub fn first_matching_family<'a>(
    doc: &'a Html,
    families: &[SelectorFamily],
) -> Option<(&'static str, Vec<ElementRef<'a>>)> {
    for family in families {
        let Ok(selector) = Selector::parse(family.css) else {
            continue;
        };
        let matches: Vec<ElementRef<'a>> = doc.select(&selector).collect();
        if !matches.is_empty() {
            return Some((family.name, matches));
        }
    }
    None
}
