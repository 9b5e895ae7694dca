//! Contact enrichment and outreach drafting.
//!
//! Takes extracted reactor records, looks up an email address for each, and
//! creates a personalized draft per contact. A failure for one contact is
//! counted and skipped; the campaign never aborts mid-list.

pub mod compose;
pub mod draft;
pub mod enrich;

use crate::extraction::reactors::ReactorRecord;
use crate::outreach::compose::{compose_email, PostContext};
use crate::outreach::draft::DraftSink;
use crate::outreach::enrich::EnrichmentClient;
use crate::pacing;
use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

/// Tally of one campaign run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CampaignOutcome {
    /// Records fed into the campaign.
    pub total: usize,
    /// Contacts an email address was found for.
    pub enriched: usize,
    /// Drafts created.
    pub drafted: usize,
    /// Draft creation failures.
    pub failed: usize,
}

/// Enrich each record, compose a personalized email, and hand it to `sink`.
///
/// Contacts without an email are skipped; sink failures are logged and
/// counted. Consecutive drafts are paced apart.
pub async fn run_campaign(
    records: &[ReactorRecord],
    enricher: &EnrichmentClient,
    sink: &dyn DraftSink,
    context: &PostContext,
) -> Result<CampaignOutcome> {
    let mut outcome = CampaignOutcome {
        total: records.len(),
        ..CampaignOutcome::default()
    };

    for record in records {
        let Some(contact) = enricher.match_person(record).await else {
            continue;
        };
        let Some(email) = contact.email else {
            info!(name = %record.name, "no email found; skipping");
            continue;
        };
        outcome.enriched += 1;

        let content = compose_email(record, context);
        match sink.create_draft(&email, &content.subject, &content.body).await {
            Ok(()) => {
                info!(name = %record.name, email = %email, "draft created");
                outcome.drafted += 1;
            }
            Err(err) => {
                warn!(name = %record.name, error = %err, "draft creation failed");
                outcome.failed += 1;
            }
        }

        pacing::sleep_action_delay().await;
    }

    Ok(outcome)
}
