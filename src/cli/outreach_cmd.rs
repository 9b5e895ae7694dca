//! `reach outreach` — enrich a saved extraction and create drafts.

use crate::audit::logger::RunLog;
use crate::cli::output::{self, Styled};
use crate::config::{self, ApiKeys};
use crate::extraction::reactors::ReactorRecord;
use crate::outreach::compose::PostContext;
use crate::outreach::draft::{DraftSink, FileOutbox, GmailDrafts};
use crate::outreach::enrich::EnrichmentClient;
use crate::outreach::run_campaign;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Run the outreach command against a `reactions_data_*.json` file.
pub async fn run(data_file: PathBuf, dry_run: bool) -> Result<()> {
    let s = Styled::new();
    let keys = ApiKeys::from_env();

    let records = load_records(&data_file)?;
    if records.is_empty() {
        bail!("{} contains no reactor records", data_file.display());
    }

    let Some(apollo_key) = keys.apollo else {
        bail!("APOLLO_API_KEY must be set for enrichment");
    };
    let enricher = EnrichmentClient::new(apollo_key);

    let out_dir = config::output_dir();
    let sink: Box<dyn DraftSink> = if dry_run {
        Box::new(FileOutbox::new(out_dir.join("outbox")))
    } else {
        let Some(token) = keys.gmail_access_token else {
            bail!("GMAIL_ACCESS_TOKEN must be set to create drafts (or pass --dry-run)");
        };
        Box::new(GmailDrafts::new(token))
    };

    let post_context = post_context_from_env();

    if !output::is_quiet() && !output::is_json() {
        output::print_header(&s);
        eprintln!(
            "  {} {} contacts loaded from {}",
            s.ok_sym(),
            records.len(),
            data_file.display()
        );
        if dry_run {
            eprintln!(
                "  {} dry run: drafts go to {}",
                s.warn_sym(),
                out_dir.join("outbox").display()
            );
        }
        eprintln!();
    }

    let campaign_started = std::time::Instant::now();
    let outcome = run_campaign(&records, &enricher, sink.as_ref(), &post_context).await?;

    let run_id = uuid::Uuid::new_v4().to_string();
    let status = if outcome.failed == 0 { "ok" } else { "partial" };
    RunLog::default_log()?.log_step(
        &run_id,
        "outreach",
        data_file.to_str(),
        campaign_started.elapsed().as_millis() as u64,
        status,
    )?;

    // Campaign report alongside the input data.
    let report = serde_json::json!({
        "campaign_date": chrono::Utc::now().to_rfc3339(),
        "source": &data_file,
        "dry_run": dry_run,
        "outcome": &outcome,
    });
    let report_path = out_dir.join(format!(
        "outreach_campaign_{}.json",
        chrono::Utc::now().timestamp()
    ));
    std::fs::write(&report_path, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    if output::is_json() {
        output::print_json(&report);
        return Ok(());
    }

    if !output::is_quiet() {
        eprintln!(
            "  {} {} enriched, {} drafted, {} failed (of {})",
            if outcome.failed == 0 {
                s.ok_sym()
            } else {
                s.warn_sym()
            },
            outcome.enriched,
            outcome.drafted,
            outcome.failed,
            outcome.total,
        );
        eprintln!();
        eprintln!("  Report:   {}", report_path.display());
    }

    Ok(())
}

fn load_records(path: &Path) -> Result<Vec<ReactorRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("malformed record file {}", path.display()))
}

/// Post/sender context from `REACH_*` variables, with neutral defaults.
fn post_context_from_env() -> PostContext {
    let defaults = PostContext::default();
    PostContext {
        topic: std::env::var("REACH_POST_TOPIC").unwrap_or(defaults.topic),
        calendar_link: std::env::var("REACH_CALENDAR_LINK").ok(),
        sender_name: std::env::var("REACH_SENDER_NAME").unwrap_or(defaults.sender_name),
        sender_title: std::env::var("REACH_SENDER_TITLE").unwrap_or(defaults.sender_title),
        sender_company: std::env::var("REACH_SENDER_COMPANY").unwrap_or(defaults.sender_company),
    }
}
