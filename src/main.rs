//! Entry point: parse CLI and dispatch to sync commands.

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use sleeper_sync::{
    cli::{roster_request, Commands, SleeperSync},
    commands::{players_sync, roster_sync, run_scheduler, SchedulerOutcome, SyncContext},
    deploy::{DeployParams, StackPlan},
};
use tracing_subscriber::EnvFilter;

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let app = SleeperSync::parse();

    match app.command {
        Commands::PlayersSync { out } => {
            let ctx = SyncContext::from_env().await?;
            let report = players_sync(&ctx, out.as_deref()).await?;
            print_json(&report)?;
        }

        Commands::RosterSync {
            username,
            user_id,
            season,
            league_id,
            league_name,
            out,
        } => {
            let ctx = SyncContext::from_env().await?;
            let request = roster_request(username, user_id, season, league_id, league_name);
            let snapshot = roster_sync(&ctx, &request).await?;
            print_json(&snapshot)?;
            if let Some(path) = out {
                let body = serde_json::to_string_pretty(&snapshot)?;
                std::fs::write(&path, body)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("[ok] wrote {}", path.display());
            }
        }

        Commands::Scheduler => {
            let ctx = SyncContext::from_env().await?;
            match run_scheduler(&ctx).await {
                SchedulerOutcome::Completed(report) => print_json(&report)?,
                SchedulerOutcome::MissingTargets(missing) => {
                    print_json(&missing)?;
                    anyhow::bail!(missing.error);
                }
            }
        }

        Commands::Template { context, out } => {
            let params = DeployParams::from_context(&context)?;
            let template = StackPlan::build(params).to_template();
            let body = serde_json::to_string_pretty(&template)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, body)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("[ok] wrote {}", path.display());
                }
                None => println!("{body}"),
            }
        }
    }

    Ok(())
}
