//! Deployment template for the bucket, functions, roles and schedules.
//!
//! - `params`: deploy-time context values
//! - `template`: typed stack plan and its CloudFormation rendering

pub mod params;
pub mod template;


pub use params::DeployParams;
pub use template::{BucketSpec, FunctionSpec, ScheduleSpec, StackPlan};
