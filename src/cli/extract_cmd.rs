//! `reach extract` — run the full reaction-extraction pipeline.
//!
//! Session, notifications, post, reaction modal, extraction, reports. One
//! browser tab, strictly sequential. An empty record list is a degraded but
//! successful run; failing to reach a modal at all is an error.

use crate::acquisition::cdp::CdpDriver;
use crate::acquisition::driver::PageDriver;
use crate::acquisition::session::SessionClient;
use crate::audit::logger::RunLog;
use crate::cli::output::{self, Styled};
use crate::config::{self, ApiKeys, SessionConfig};
use crate::extraction::reactors::{extract_reactors, ReactorRecord};
use crate::navigation::notifications::open_recent_post;
use crate::navigation::reactions::expand_reactions;
use crate::navigation::strategy::{FallbackOnly, LlmSelector, SelectorStrategy};
use crate::report::write_reports;
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Run the extract command.
pub async fn run(post_index: usize, llm_selector: bool, out: Option<PathBuf>) -> Result<()> {
    let s = Styled::new();
    let run_id = Uuid::new_v4().to_string();
    let mut audit = RunLog::default_log()?;
    let started = Instant::now();

    let session_config = SessionConfig::from_env()?;
    let origin = config::linkedin_origin();
    let out_dir = out.unwrap_or_else(config::output_dir);
    std::fs::create_dir_all(&out_dir)?;

    let strategy: Box<dyn SelectorStrategy> = if llm_selector {
        match ApiKeys::from_env().openai {
            Some(key) => Box::new(LlmSelector::new(key)),
            None => {
                warn!("--llm-selector set but OPENAI_API_KEY is missing; using fallback list");
                Box::new(FallbackOnly)
            }
        }
    } else {
        Box::new(FallbackOnly)
    };

    // Provision the remote browser session.
    let step_started = Instant::now();
    let client = SessionClient::new(&session_config);
    let session = client.create_session(&session_config).await?;
    audit.log_step(
        &run_id,
        "session",
        Some(&session.id),
        step_started.elapsed().as_millis() as u64,
        "ok",
    )?;

    if !output::is_quiet() && !output::is_json() {
        output::print_header(&s);
        eprintln!("  Session:  {}", session.id);
        eprintln!(
            "  Watch:    {}",
            s.dim(&SessionClient::inspector_url(&session.id))
        );
        eprintln!();
    }

    let driver: Box<dyn PageDriver> = Box::new(CdpDriver::connect(&session.connect_url).await?);

    // Drive the tab; the session is closed no matter how the pipeline ends.
    let step_started = Instant::now();
    let pipeline =
        run_pipeline(driver.as_ref(), strategy.as_ref(), post_index, &origin, &out_dir).await;
    let pipeline_ms = step_started.elapsed().as_millis() as u64;

    if let Err(err) = driver.close().await {
        warn!(error = %err, "failed to close browser session");
    }

    let records = match pipeline {
        Ok(records) => {
            audit.log_step(&run_id, "extract", None, pipeline_ms, "ok")?;
            records
        }
        Err(err) => {
            audit.log_step(&run_id, "extract", None, pipeline_ms, "failed")?;
            return Err(err);
        }
    };

    if records.is_empty() {
        // Degraded, not failed: "no reactors" and "markup drifted" look alike.
        warn!("extraction produced no records");
    }

    let unix_ts = chrono::Utc::now().timestamp();
    let (data_path, summary_path) = write_reports(&records, &out_dir, unix_ts)?;
    audit.log_step(
        &run_id,
        "report",
        data_path.to_str(),
        started.elapsed().as_millis() as u64,
        "ok",
    )?;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "session": session.id,
            "reactors": records.len(),
            "data": data_path,
            "summary": summary_path,
            "duration_ms": started.elapsed().as_millis(),
        }));
        return Ok(());
    }

    print_outcome(&s, &records, &data_path, &summary_path);
    Ok(())
}

/// Notifications to records. Runs entirely against the driver trait.
async fn run_pipeline(
    driver: &dyn PageDriver,
    strategy: &dyn SelectorStrategy,
    post_index: usize,
    origin: &str,
    out_dir: &std::path::Path,
) -> Result<Vec<ReactorRecord>> {
    open_recent_post(driver, strategy, post_index, origin).await?;
    info!(url = %driver.current_url().await?, "post opened");

    let Some(modal_html) = expand_reactions(driver).await? else {
        bail!("could not expand the reaction list on the post");
    };

    // Keep a visual record of what the modal looked like for this run.
    let shot = out_dir.join(format!(
        "reactions_modal_{}.png",
        chrono::Utc::now().timestamp()
    ));
    if let Err(err) = driver.screenshot(&shot).await {
        warn!(error = %err, "modal screenshot failed");
    }

    Ok(extract_reactors(&modal_html, origin))
}

fn print_outcome(
    s: &Styled,
    records: &[ReactorRecord],
    data_path: &std::path::Path,
    summary_path: &std::path::Path,
) {
    if output::is_quiet() {
        return;
    }

    if records.is_empty() {
        eprintln!(
            "  {} extraction finished with no reactor profiles",
            s.warn_sym()
        );
    } else {
        eprintln!(
            "  {} extracted {} reactor profiles",
            s.ok_sym(),
            s.bold(&records.len().to_string())
        );
        if output::is_verbose() {
            for record in records {
                eprintln!(
                    "    {} {} ({})",
                    s.dim("-"),
                    record.name,
                    record.company.as_deref().unwrap_or("N/A")
                );
            }
        }
    }
    eprintln!();
    eprintln!("  Data:     {}", data_path.display());
    eprintln!("  Summary:  {}", summary_path.display());
}
