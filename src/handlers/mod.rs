//! Function entry points shared by the three function binaries.
//!
//! Handlers return `{"statusCode": .., "body": "<json>"}`; the body is the
//! JSON-encoded result of the underlying sync operation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    commands::{
        players_sync, roster_sync, run_scheduler, RosterRequest, SchedulerOutcome, SyncContext,
    },
    error::SyncError,
    Result,
};


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LambdaResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl LambdaResponse {
    fn json(status_code: u16, payload: &impl Serialize) -> Result<Self> {
        Ok(Self {
            status_code,
            body: serde_json::to_string(payload)?,
        })
    }

    /// Parse the body back into JSON.
    pub fn body_json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Event for the players function.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayersEvent {
    #[serde(default)]
    pub out: Option<PathBuf>,
}

/// Unwrap API-Gateway-style events whose payload sits in `body`, either as a
/// JSON string or an object. Direct invocations pass through untouched.
pub fn normalize_event(event: Value) -> Result<Value> {
    let object = match event {
        Value::Null => return Ok(json!({})),
        Value::Object(object) => object,
        _ => {
            return Err(SyncError::InvalidEvent {
                message: "payload must be a JSON object".to_string(),
            })
        }
    };

    match object.get("body") {
        None => Ok(Value::Object(object)),
        Some(Value::Null) => Ok(json!({})),
        Some(Value::Object(body)) => Ok(Value::Object(body.clone())),
        Some(Value::String(text)) => serde_json::from_str(text).map_err(|e| SyncError::InvalidEvent {
            message: format!("malformed JSON body: {e}"),
        }),
        Some(_) => Err(SyncError::InvalidEvent {
            message: "body must be a JSON object".to_string(),
        }),
    }
}

fn parse_event<T: for<'de> Deserialize<'de>>(event: Value) -> Result<T> {
    serde_json::from_value(normalize_event(event)?).map_err(|e| SyncError::InvalidEvent {
        message: e.to_string(),
    })
}

pub async fn players_lambda_handler(ctx: &SyncContext, event: Value) -> Result<LambdaResponse> {
    let event: PlayersEvent = parse_event(event)?;
    let report = players_sync(ctx, event.out.as_deref()).await?;
    LambdaResponse::json(200, &report)
}

pub async fn roster_lambda_handler(ctx: &SyncContext, event: Value) -> Result<LambdaResponse> {
    let request: RosterRequest = parse_event(event)?;
    let snapshot = roster_sync(ctx, &request).await?;
    LambdaResponse::json(200, &snapshot)
}

/// The event is ignored; targets come from the bucket.
pub async fn roster_scheduler_handler(ctx: &SyncContext, _event: Value) -> Result<LambdaResponse> {
    match run_scheduler(ctx).await {
        SchedulerOutcome::MissingTargets(missing) => LambdaResponse::json(400, &missing),
        SchedulerOutcome::Completed(report) => LambdaResponse::json(200, &report),
    }
}
