mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use trasua_api::{AddressClient, TransportConfig};
use trasua_core::AddressPipeline;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never touch the network
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "trasua", &mut std::io::stdout());
            Ok(())
        }

        // Label parsing is offline but honors the configured locale
        Command::Parse { label } => {
            let (_, pipeline_config) = config::resolve(&cli.global, &config::load_config()?)?;
            commands::parse::handle(&label, pipeline_config.locale, &cli.global)
        }

        // Everything else talks to the division and places services
        cmd => {
            let (client, pipeline) = build_pipeline(&cli.global)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &client, &pipeline, &cli.global).await;
            pipeline.shutdown();
            result
        }
    }
}

/// Build the HTTP client and address pipeline from config, profile, and CLI overrides.
fn build_pipeline(
    global: &cli::GlobalOpts,
) -> Result<(Arc<AddressClient>, AddressPipeline<AddressClient>), CliError> {
    let cfg = config::load_config()?;
    let (endpoints, pipeline_config) = config::resolve(global, &cfg)?;

    tracing::debug!(
        profile = %config::active_profile_name(global, &cfg),
        divisions = %endpoints.divisions_url,
        places = %endpoints.places_url,
        "resolved endpoints"
    );

    let client = Arc::new(AddressClient::new(
        endpoints.divisions_url.as_str(),
        endpoints.places_url.as_str(),
        &TransportConfig::with_timeout(endpoints.timeout),
    )?);
    let pipeline = AddressPipeline::from_shared(Arc::clone(&client), pipeline_config);
    Ok((client, pipeline))
}
