//! CLI subcommand implementations for the `reach` binary.

pub mod doctor;
pub mod extract_cmd;
pub mod login_cmd;
pub mod outreach_cmd;
pub mod output;
