//! PostPilot command-line driver.
//!
//! Loads configuration, initializes logging, wires the record stores and
//! provider clients, and dispatches one pipeline operation per invocation.

mod cli;
mod logging;
mod stores;

use clap::Parser;
use cli::{Cli, Commands};
use postpilot_pipeline::{PipelineConfig, PipelineFacade};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

/// Exit code used when the LinkedIn account must be reconnected.
const EXIT_RECONNECT: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match PipelineConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init(config.logging());

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(pipeline_err) = e.downcast_ref::<postpilot_error::PostpilotError>()
                && pipeline_err.is_credential_expired()
            {
                error!(error = %pipeline_err, "LinkedIn credentials rejected");
                eprintln!("Your LinkedIn session has expired. Please reconnect your account.");
                return ExitCode::from(EXIT_RECONNECT);
            }
            error!(error = %e, "Command failed");
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: PipelineConfig) -> anyhow::Result<()> {
    info!(environment = %config.environment(), "Starting PostPilot");

    let (generations, distributions) = stores::open(&config)?;
    let client = reqwest::Client::new();
    let generator = Arc::new(postpilot_models::OpenAiClient::with_client(
        client.clone(),
        config.generation().api_base_url().as_str(),
        *config.generation().max_tokens(),
        *config.generation().temperature(),
    ));
    let facade = PipelineFacade::new(&config, generator, generations, distributions, client);
    let user = cli.user.to_user()?;

    match cli.command {
        Commands::Generate { topic } => cli::handle_generate(&facade, &user, &topic).await,
        Commands::Publish {
            text,
            generation_id,
        } => cli::handle_publish(&facade, &user, generation_id, &text).await,
        Commands::Delete {
            generation_id,
            post_id,
        } => cli::handle_delete(&facade, &user, generation_id, post_id.as_deref()).await,
        Commands::List {
            limit,
            distributions,
        } => cli::handle_list(&facade, &user, limit, distributions).await,
        Commands::Show { id } => cli::handle_show(&facade, &user, id).await,
    }
}
