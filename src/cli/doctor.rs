//! Configuration readiness check.
//!
//! Verifies the environment before a run: required session variables,
//! optional credentials for login/enrichment/drafting, and a writable
//! output directory. Every failure names the variable to set.

use crate::cli::output::{self, Styled};
use crate::config::{self, ApiKeys, LinkedInCredentials, SessionConfig};
use anyhow::Result;

/// Run the doctor diagnostic. Errors when the session config is unusable.
pub async fn run() -> Result<()> {
    if output::is_json() {
        return run_json();
    }

    let s = Styled::new();
    let mut ready = true;
    let mut has_warning = false;

    output::print_header(&s);

    // ── Session ─────────────────────────────────────────────────────────
    output::print_section(&s, "Session");
    match SessionConfig::from_env() {
        Ok(config) => {
            output::print_check(s.ok_sym(), "Provisioning API:", "configured");
            match &config.context_id {
                Some(id) => output::print_check(s.ok_sym(), "Context:", id),
                None => {
                    output::print_check(s.warn_sym(), "Context:", "none");
                    output::print_detail("Run 'reach login' to create one.");
                    has_warning = true;
                }
            }
            output::print_check(
                s.ok_sym(),
                "Proxy geolocation:",
                &format!(
                    "{}, {} ({})",
                    config.geolocation.city, config.geolocation.state, config.geolocation.country
                ),
            );
        }
        Err(err) => {
            output::print_check(s.fail_sym(), "Provisioning API:", &err.to_string());
            ready = false;
        }
    }
    eprintln!();

    // ── Credentials ─────────────────────────────────────────────────────
    output::print_section(&s, "Credentials");
    match LinkedInCredentials::from_env() {
        Ok(creds) => output::print_check(s.ok_sym(), "LinkedIn login:", &creds.username),
        Err(err) => {
            output::print_check(s.warn_sym(), "LinkedIn login:", &err.to_string());
            output::print_detail("Needed only for 'reach login'.");
            has_warning = true;
        }
    }

    let keys = ApiKeys::from_env();
    check_optional_key(&s, &mut has_warning, "Selector LLM:", keys.openai.is_some(), "OPENAI_API_KEY");
    check_optional_key(&s, &mut has_warning, "Enrichment:", keys.apollo.is_some(), "APOLLO_API_KEY");
    check_optional_key(
        &s,
        &mut has_warning,
        "Draft creation:",
        keys.gmail_access_token.is_some(),
        "GMAIL_ACCESS_TOKEN",
    );
    eprintln!();

    // ── Output ──────────────────────────────────────────────────────────
    output::print_section(&s, "Output");
    let out_dir = config::output_dir();
    match probe_writable(&out_dir) {
        Ok(()) => output::print_check(s.ok_sym(), "Directory:", &out_dir.display().to_string()),
        Err(err) => {
            output::print_check(
                s.fail_sym(),
                "Directory:",
                &format!("{} ({err})", out_dir.display()),
            );
            output::print_detail("Set REACH_OUTPUT_DIR to a writable path.");
            ready = false;
        }
    }

    if !ready {
        output::print_status(&s, &s.red("not ready"), "fix the failures above");
        anyhow::bail!("environment is not ready");
    }
    if has_warning {
        output::print_status(&s, &s.yellow("ready with warnings"), "extract can run");
    } else {
        output::print_status(&s, &s.green("ready"), "extract can run");
    }
    Ok(())
}

fn check_optional_key(s: &Styled, has_warning: &mut bool, label: &str, present: bool, var: &str) {
    if present {
        output::print_check(s.ok_sym(), label, "configured");
    } else {
        output::print_check(s.warn_sym(), label, "not configured");
        output::print_detail(&format!("Optional; set {var} to enable."));
        *has_warning = true;
    }
}

/// Write-and-remove probe for the output directory.
fn probe_writable(dir: &std::path::Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let probe = dir.join(".reach-doctor-probe");
    std::fs::write(&probe, b"probe")?;
    std::fs::remove_file(&probe)?;
    Ok(())
}

fn run_json() -> Result<()> {
    let session = SessionConfig::from_env();
    let keys = ApiKeys::from_env();
    let out_dir = config::output_dir();

    output::print_json(&serde_json::json!({
        "session_configured": session.is_ok(),
        "context_configured": session
            .as_ref()
            .map(|c| c.context_id.is_some())
            .unwrap_or(false),
        "linkedin_credentials": LinkedInCredentials::from_env().is_ok(),
        "openai_key": keys.openai.is_some(),
        "apollo_key": keys.apollo.is_some(),
        "gmail_token": keys.gmail_access_token.is_some(),
        "output_dir": &out_dir,
        "output_writable": probe_writable(&out_dir).is_ok(),
    }));

    if session.is_err() {
        anyhow::bail!("environment is not ready");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_writable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(probe_writable(dir.path()).is_ok());
        // The probe file is cleaned up.
        assert!(!dir.path().join(".reach-doctor-probe").exists());
    }
}
