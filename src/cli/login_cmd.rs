//! `reach login` — establish or refresh the authenticated browser context.
//!
//! Creates a persistent context when none is configured, logs in through
//! the login form, and waits for the user to approve any device
//! verification. Cookies persist into the context, so later `extract` runs
//! skip the login entirely.

use crate::acquisition::auth::{login, LoginOutcome};
use crate::acquisition::cdp::CdpDriver;
use crate::acquisition::driver::PageDriver;
use crate::acquisition::session::SessionClient;
use crate::cli::output::{self, Styled};
use crate::config::{LinkedInCredentials, SessionConfig};
use crate::pacing;
use anyhow::Result;
use tracing::warn;

/// Run the login command.
pub async fn run() -> Result<()> {
    let s = Styled::new();
    let mut session_config = SessionConfig::from_env()?;
    let credentials = LinkedInCredentials::from_env()?;

    let client = SessionClient::new(&session_config);

    // A persistent context is what makes the login worth doing.
    let created_context = if session_config.context_id.is_none() {
        let id = client.create_context(&session_config.project_id).await?;
        session_config.context_id = Some(id.clone());
        Some(id)
    } else {
        None
    };

    let session = client.create_session(&session_config).await?;
    if !output::is_quiet() && !output::is_json() {
        output::print_header(&s);
        eprintln!("  Session:  {}", session.id);
        eprintln!(
            "  Watch:    {}",
            s.dim(&SessionClient::inspector_url(&session.id))
        );
        eprintln!();
        eprintln!("  Logging in as {}...", credentials.username);
        eprintln!("  If prompted, approve the sign-in on your device.");
        eprintln!();
    }

    let driver: Box<dyn PageDriver> = Box::new(CdpDriver::connect(&session.connect_url).await?);
    let outcome = login(driver.as_ref(), &credentials.username, &credentials.password).await;

    // Give the context a moment to persist cookies before disconnecting.
    pacing::sleep_settle_delay().await;
    if let Err(err) = driver.close().await {
        warn!(error = %err, "failed to close browser session");
    }

    let outcome = outcome?;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "session": session.id,
            "context": session_config.context_id,
            "authenticated": outcome == LoginOutcome::Authenticated,
        }));
        return Ok(());
    }

    match outcome {
        LoginOutcome::Authenticated => {
            eprintln!("  {} authenticated; context saved", s.ok_sym());
        }
        LoginOutcome::VerificationPending => {
            eprintln!(
                "  {} verification not confirmed; re-run after approving the sign-in",
                s.warn_sym()
            );
        }
    }

    if let Some(context_id) = created_context {
        eprintln!();
        eprintln!("  Add to your .env to reuse this login:");
        eprintln!("  {}", s.bold(&format!("BROWSERBASE_CONTEXT_ID={context_id}")));
    }

    Ok(())
}
