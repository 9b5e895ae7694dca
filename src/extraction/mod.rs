//! Reactor profile extraction.
//!
//! Turns the rendered HTML of a reactions modal into structured contact
//! records. Selector families are tried in a fixed priority order and each
//! matched element is reduced to a best-effort `ReactorRecord`.

pub mod reactors;
pub mod selectors;
