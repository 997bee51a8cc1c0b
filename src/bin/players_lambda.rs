//! Daily players refresh function.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use sleeper_sync::{
    commands::SyncContext,
    handlers::{players_lambda_handler, LambdaResponse},
};
use tracing_subscriber::EnvFilter;

async fn handle_request(ctx: &SyncContext, event: LambdaEvent<Value>) -> Result<LambdaResponse, Error> {
    Ok(players_lambda_handler(ctx, event.payload).await?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .without_time()
        .init();

    let ctx = SyncContext::from_env().await?;
    run(service_fn(|event| handle_request(&ctx, event))).await
}
