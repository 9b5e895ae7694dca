//! Binary entry point for the `reach` CLI.

use clap::{Parser, Subcommand};
use reach_runtime::cli::{doctor, extract_cmd, login_cmd, outreach_cmd};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reach", version, about = "LinkedIn reaction outreach runtime")]
struct Cli {
    /// Emit machine-readable JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Suppress status output
    #[arg(long, global = true)]
    quiet: bool,

    /// Extra per-record output
    #[arg(long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract reactor profiles from a recent post's reaction list
    Extract {
        /// Which recent post to open, 1 = most recent
        #[arg(default_value_t = 1)]
        post_index: usize,

        /// Ask the configured LLM to propose the post selector
        #[arg(long)]
        llm_selector: bool,

        /// Directory for report artifacts (default: REACH_OUTPUT_DIR or .)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Log in to LinkedIn and persist the authenticated context
    Login,
    /// Enrich a saved extraction and create outreach drafts
    Outreach {
        /// A reactions_data_*.json file from a previous extract run
        data_file: PathBuf,

        /// Write drafts to a local outbox instead of the mailbox
        #[arg(long)]
        dry_run: bool,
    },
    /// Check configuration and environment readiness
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Global flags travel as env toggles so library output helpers see them.
    if cli.json {
        std::env::set_var("REACH_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("REACH_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("REACH_VERBOSE", "1");
    }
    if cli.no_color {
        std::env::set_var("REACH_NO_COLOR", "1");
    }

    init_tracing();

    match cli.command {
        Commands::Extract {
            post_index,
            llm_selector,
            out,
        } => extract_cmd::run(post_index.max(1), llm_selector, out).await,
        Commands::Login => login_cmd::run().await,
        Commands::Outreach { data_file, dry_run } => outreach_cmd::run(data_file, dry_run).await,
        Commands::Doctor => doctor::run().await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("reach_runtime=info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var("REACH_LOG_JSON").is_ok() {
        builder.json().init();
    } else {
        builder.init();
    }
}
