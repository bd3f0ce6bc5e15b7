//! healthd - Terrace platform health service
//!
//! `healthd serve` exposes the HTTP health surface; `healthd check`
//! runs the same checks once and prints a console report.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use terrace_health::clients::{OidcIdentityClient, RestDatabaseClient};
use terrace_health::health::{render_report, render_validation};
use terrace_health::utils::logging::init_logging;
use terrace_health::{
    OverallStatus, ProcessEnv, ServiceConfig, ServiceContext, run_health_check, validate,
};

#[derive(Parser)]
#[command(name = "healthd", version, about = "Terrace platform health service")]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, env = "TERRACE_HEALTH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP health service (default)
    Serve,
    /// Run all checks once and print a report
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Local .env files are a development convenience; absence is fine
    dotenvy::dotenv().ok();
    init_logging("info");

    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cli.config.as_deref()).await,
        Command::Check => check(cli.config.as_deref()).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(config_path: Option<&std::path::Path>) -> anyhow::Result<ExitCode> {
    let config = ServiceConfig::load(config_path).await?;
    terrace_health::server::run_server(config).await?;
    Ok(ExitCode::SUCCESS)
}

async fn check(config_path: Option<&std::path::Path>) -> anyhow::Result<ExitCode> {
    let config = ServiceConfig::load(config_path).await?;

    let env = ProcessEnv;
    let identity = OidcIdentityClient::from_source(&env, &config.probes);
    let database = RestDatabaseClient::from_source(&env, &config.probes);
    let strictness = config.strictness();
    let context = ServiceContext::new(config, Arc::new(identity), Arc::new(database));

    let validation = validate(&env, strictness);
    print!("{}", render_validation(&validation));

    let aggregate = run_health_check(&context).await;
    print!("{}", render_report(&aggregate));

    Ok(if aggregate.overall_status == OverallStatus::Unhealthy {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
