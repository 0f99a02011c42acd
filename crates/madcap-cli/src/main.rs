//! # madcap-cli
//!
//! Binary entry point for the Madcap campaign pipeline.
//!
//! This crate provides:
//! - CLI argument parsing using `clap`
//! - Service URL and auth resolution
//! - A non-interactive driver for the full four-stage pipeline

mod render;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use madcap_core::{ServiceConfig, WorkflowSession};
use madcap_gateway::{HttpGateway, StaticIdentity};
use madcap_proto::{CampaignBrief, CampaignLabel, IdentityProvider};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "madcap",
    version,
    about = "Staged marketing campaign pipeline client"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline for one brief: campaigns, visuals, script, video.
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Company name
    #[arg(long)]
    company: String,

    /// Company website domain
    #[arg(long)]
    domain: String,

    /// Campaign goals and target audience
    #[arg(long)]
    goals: String,

    /// Which campaign proposal to carry forward
    #[arg(long, value_enum, default_value_t = CampaignChoice::A)]
    campaign: CampaignChoice,

    /// Which visual concept to carry forward (1 or 2)
    #[arg(long, default_value_t = 1)]
    concept: u8,

    /// Agent service base URL (overrides env and config file)
    #[arg(long, env = "MADCAP_SERVICE_URL")]
    service_url: Option<String>,

    /// Path to a YAML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum CampaignChoice {
    A,
    B,
}

impl From<CampaignChoice> for CampaignLabel {
    fn from(choice: CampaignChoice) -> Self {
        match choice {
            CampaignChoice::A => CampaignLabel::A,
            CampaignChoice::B => CampaignLabel::B,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args).await,
    }
}

async fn run(args: RunArgs) -> Result<()> {
    let config = ServiceConfig::resolve(args.service_url.clone(), args.config.as_deref())
        .context("resolving service configuration")?;
    let service_url = config.url_or_host_default("localhost");
    info!(%service_url, "using agent service");

    let mut gateway = HttpGateway::with_base_url(service_url)?;
    if let Some(identity) = StaticIdentity::from_env() {
        let user = identity.sign_in().await?;
        info!(user = %user.greeting_name(), "authenticated");
        gateway = gateway.with_auth(identity.session().clone());
    }

    let mut session = WorkflowSession::new(gateway);
    let brief = CampaignBrief::new(args.company, args.domain, args.goals);

    session.submit_brief(brief).await?;
    render::print_notices(&session.drain_notices());
    for option in session.campaigns() {
        println!("{}", render::campaign_card(option));
    }
    for concept in session.inline_concepts() {
        println!("{}", render::concept_card(concept));
    }
    if let Some(section) = session.inline_video() {
        println!("{}", render::inline_video_card(section));
    }
    if session.campaigns().is_empty() {
        bail!("the service response contained no campaign proposals");
    }

    session.select_campaign(args.campaign.into()).await?;
    render::print_notices(&session.drain_notices());
    for concept in session.concepts() {
        println!("{}", render::concept_card(concept));
    }

    let outcome = session.select_visual_concept(args.concept).await?;
    render::print_notices(&session.drain_notices());
    if let Some(result) = session.video_result() {
        println!("{}", render::video_panel(session.script(), result));
    }
    info!(?outcome, "pipeline resolved");

    Ok(())
}
