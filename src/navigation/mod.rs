//! Notifications-to-modal navigation.
//!
//! Drives the authenticated tab from the notifications page to a post and
//! expands its reaction list, using ordered selector fallbacks and an
//! optional LLM-proposed selector.

pub mod notifications;
pub mod reactions;
pub mod strategy;
