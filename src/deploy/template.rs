use serde_json::{json, Map, Value};

use crate::{
    config::{
        PLAYERS_CACHE_PATH_ENV_VAR, PLAYERS_PREFIX_ENV_VAR, ROSTER_PREFIX_ENV_VAR,
        ROSTER_TARGETS_KEY_ENV_VAR, S3_BUCKET_ENV_VAR, USE_S3_PLAYERS_ENV_VAR,
    },
    deploy::DeployParams,
};

pub const BUCKET_ID: &str = "DataBucket";
pub const FUNCTION_ROLE_ID: &str = "SyncFunctionRole";
pub const SCHEDULER_ROLE_ID: &str = "SchedulerInvokeRole";

pub const PLAYERS_FUNCTION_ID: &str = "PlayersFunction";
pub const ROSTER_FUNCTION_ID: &str = "RosterFunction";
pub const SCHEDULER_FUNCTION_ID: &str = "RosterSchedulerFunction";

pub const PLAYERS_SCHEDULE_ID: &str = "PlayersDailySchedule";
pub const ROSTER_SCHEDULE_ID: &str = "RosterRefreshSchedule";
pub const SCHEDULER_SCHEDULE_ID: &str = "RosterSchedulerHourlySchedule";

pub const PLAYERS_CRON: &str = "cron(0 6 * * ? *)";
pub const PLAYERS_TIMEZONE: &str = "America/New_York";
pub const SCHEDULER_RATE: &str = "rate(1 hour)";

const NONCURRENT_EXPIRATION_DAYS: u32 = 90;
const FUNCTION_CACHE_PATH: &str = "/tmp/players_nfl.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSpec {
    pub versioned: bool,
    pub noncurrent_expiration_days: u32,
    pub retain_on_delete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpec {
    pub logical_id: &'static str,
    pub handler: &'static str,
    /// Name of the binary bundled as the function's code.
    pub binary: &'static str,
    pub memory_mb: u32,
    pub timeout_secs: u32,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSpec {
    pub logical_id: &'static str,
    pub expression: String,
    pub timezone: Option<&'static str>,
    pub target: &'static str,
    pub input: Option<Value>,
    pub description: String,
}

/// Typed view of everything the stack declares.
#[derive(Debug, Clone, PartialEq)]
pub struct StackPlan {
    pub params: DeployParams,
    pub bucket: BucketSpec,
    pub functions: Vec<FunctionSpec>,
    pub schedules: Vec<ScheduleSpec>,
}

/// `rate(1 minute)` / `rate(N minutes)`; the scheduler rejects `1 minutes`.
pub fn rate_expression(minutes: u32) -> String {
    if minutes == 1 {
        "rate(1 minute)".to_string()
    } else {
        format!("rate({minutes} minutes)")
    }
}

impl StackPlan {
    pub fn build(params: DeployParams) -> Self {
        let functions = vec![
            FunctionSpec {
                logical_id: PLAYERS_FUNCTION_ID,
                handler: "players_lambda_handler",
                binary: "players_lambda",
                memory_mb: 1024,
                timeout_secs: 300,
                description: "Daily Sleeper players refresh",
            },
            FunctionSpec {
                logical_id: ROSTER_FUNCTION_ID,
                handler: "roster_lambda_handler",
                binary: "roster_lambda",
                memory_mb: 512,
                timeout_secs: 120,
                description: "Roster snapshot for one user and league",
            },
            FunctionSpec {
                logical_id: SCHEDULER_FUNCTION_ID,
                handler: "roster_scheduler_handler",
                binary: "roster_scheduler_lambda",
                memory_mb: 512,
                timeout_secs: 900,
                description: "Roster snapshots for every configured target",
            },
        ];

        let mut schedules = vec![ScheduleSpec {
            logical_id: PLAYERS_SCHEDULE_ID,
            expression: PLAYERS_CRON.to_string(),
            timezone: Some(PLAYERS_TIMEZONE),
            target: PLAYERS_FUNCTION_ID,
            input: None,
            description: "Refresh the players map daily".to_string(),
        }];

        if let Some(username) = params.username.as_deref().filter(|u| !u.trim().is_empty()) {
            let mut input = json!({
                "username": username,
                "season": params.season,
            });
            if let Some(league_id) = &params.league_id {
                input["league_id"] = json!(league_id);
            }
            schedules.push(ScheduleSpec {
                logical_id: ROSTER_SCHEDULE_ID,
                expression: rate_expression(params.refresh_minutes),
                timezone: None,
                target: ROSTER_FUNCTION_ID,
                input: Some(input),
                description: format!(
                    "Refresh rosters for {username} every {} minute(s)",
                    params.refresh_minutes
                ),
            });
        }

        schedules.push(ScheduleSpec {
            logical_id: SCHEDULER_SCHEDULE_ID,
            expression: SCHEDULER_RATE.to_string(),
            timezone: None,
            target: SCHEDULER_FUNCTION_ID,
            input: None,
            description: "Fan out roster syncs across the targets list".to_string(),
        });

        Self {
            params,
            bucket: BucketSpec {
                versioned: true,
                noncurrent_expiration_days: NONCURRENT_EXPIRATION_DAYS,
                retain_on_delete: true,
            },
            functions,
            schedules,
        }
    }

    pub fn function(&self, logical_id: &str) -> Option<&FunctionSpec> {
        self.functions.iter().find(|f| f.logical_id == logical_id)
    }

    pub fn schedule(&self, logical_id: &str) -> Option<&ScheduleSpec> {
        self.schedules.iter().find(|s| s.logical_id == logical_id)
    }

    /// Environment shared by all three functions.
    pub fn function_environment(&self) -> Value {
        json!({
            S3_BUCKET_ENV_VAR: { "Ref": BUCKET_ID },
            PLAYERS_PREFIX_ENV_VAR: self.params.players_prefix,
            ROSTER_PREFIX_ENV_VAR: self.params.rosters_prefix,
            ROSTER_TARGETS_KEY_ENV_VAR: self.params.targets_key,
            USE_S3_PLAYERS_ENV_VAR: "1",
            PLAYERS_CACHE_PATH_ENV_VAR: FUNCTION_CACHE_PATH,
        })
    }

    /// Render as a CloudFormation template.
    pub fn to_template(&self) -> Value {
        let mut resources = Map::new();
        resources.insert(BUCKET_ID.to_string(), self.bucket_resource());
        resources.insert(FUNCTION_ROLE_ID.to_string(), self.function_role_resource());
        for function in &self.functions {
            resources.insert(function.logical_id.to_string(), self.function_resource(function));
        }
        resources.insert(SCHEDULER_ROLE_ID.to_string(), self.scheduler_role_resource());
        for schedule in &self.schedules {
            resources.insert(schedule.logical_id.to_string(), schedule_resource(schedule));
        }

        json!({
            "AWSTemplateFormatVersion": "2010-09-09",
            "Description": "Sleeper players and roster snapshots",
            "Parameters": {
                "ArtifactBucket": {
                    "Type": "String",
                    "Description": "Bucket holding the function code bundles"
                },
                "ArtifactPrefix": {
                    "Type": "String",
                    "Default": "sleeper-sync",
                    "Description": "Key prefix of the function code bundles"
                }
            },
            "Resources": resources,
            "Outputs": self.outputs(),
        })
    }

    fn bucket_resource(&self) -> Value {
        let policy = if self.bucket.retain_on_delete { "Retain" } else { "Delete" };
        let versioning = if self.bucket.versioned { "Enabled" } else { "Suspended" };
        json!({
            "Type": "AWS::S3::Bucket",
            "DeletionPolicy": policy,
            "UpdateReplacePolicy": policy,
            "Properties": {
                "VersioningConfiguration": { "Status": versioning },
                "BucketEncryption": {
                    "ServerSideEncryptionConfiguration": [
                        { "ServerSideEncryptionByDefault": { "SSEAlgorithm": "AES256" } }
                    ]
                },
                "PublicAccessBlockConfiguration": {
                    "BlockPublicAcls": true,
                    "BlockPublicPolicy": true,
                    "IgnorePublicAcls": true,
                    "RestrictPublicBuckets": true
                },
                "LifecycleConfiguration": {
                    "Rules": [{
                        "Id": "ExpireNoncurrentVersions",
                        "Status": "Enabled",
                        "NoncurrentVersionExpiration": {
                            "NoncurrentDays": self.bucket.noncurrent_expiration_days
                        }
                    }]
                }
            }
        })
    }

    fn function_role_resource(&self) -> Value {
        json!({
            "Type": "AWS::IAM::Role",
            "Properties": {
                "AssumeRolePolicyDocument": assume_role_policy("lambda.amazonaws.com"),
                "ManagedPolicyArns": [
                    { "Fn::Sub": "arn:${AWS::Partition}:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole" }
                ],
                "Policies": [{
                    "PolicyName": "BucketReadWrite",
                    "PolicyDocument": {
                        "Version": "2012-10-17",
                        "Statement": [
                            {
                                "Effect": "Allow",
                                "Action": ["s3:GetObject", "s3:PutObject"],
                                "Resource": { "Fn::Sub": format!("${{{BUCKET_ID}.Arn}}/*") }
                            },
                            {
                                "Effect": "Allow",
                                "Action": ["s3:ListBucket"],
                                "Resource": { "Fn::GetAtt": [BUCKET_ID, "Arn"] }
                            }
                        ]
                    }
                }]
            }
        })
    }

    fn function_resource(&self, function: &FunctionSpec) -> Value {
        json!({
            "Type": "AWS::Lambda::Function",
            "Properties": {
                "Description": function.description,
                "Runtime": "provided.al2023",
                "Architectures": ["arm64"],
                "Handler": function.handler,
                "MemorySize": function.memory_mb,
                "Timeout": function.timeout_secs,
                "Role": { "Fn::GetAtt": [FUNCTION_ROLE_ID, "Arn"] },
                "Code": {
                    "S3Bucket": { "Ref": "ArtifactBucket" },
                    "S3Key": { "Fn::Sub": format!("${{ArtifactPrefix}}/{}.zip", function.binary) }
                },
                "Environment": { "Variables": self.function_environment() }
            }
        })
    }

    fn scheduler_role_resource(&self) -> Value {
        let targets: Vec<Value> = self
            .functions
            .iter()
            .map(|f| json!({ "Fn::GetAtt": [f.logical_id, "Arn"] }))
            .collect();
        json!({
            "Type": "AWS::IAM::Role",
            "Properties": {
                "AssumeRolePolicyDocument": assume_role_policy("scheduler.amazonaws.com"),
                "Policies": [{
                    "PolicyName": "InvokeSyncFunctions",
                    "PolicyDocument": {
                        "Version": "2012-10-17",
                        "Statement": [{
                            "Effect": "Allow",
                            "Action": ["lambda:InvokeFunction"],
                            "Resource": targets
                        }]
                    }
                }]
            }
        })
    }

    fn outputs(&self) -> Value {
        let mut outputs = json!({
            "BucketName": { "Value": { "Ref": BUCKET_ID } },
            "TargetsKey": { "Value": self.params.targets_key },
        });
        for function in &self.functions {
            outputs[format!("{}Name", function.logical_id)] =
                json!({ "Value": { "Ref": function.logical_id } });
        }
        outputs
    }
}

fn assume_role_policy(service: &str) -> Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": service },
            "Action": "sts:AssumeRole"
        }]
    })
}

fn schedule_resource(schedule: &ScheduleSpec) -> Value {
    let mut target = json!({
        "Arn": { "Fn::GetAtt": [schedule.target, "Arn"] },
        "RoleArn": { "Fn::GetAtt": [SCHEDULER_ROLE_ID, "Arn"] },
    });
    if let Some(input) = &schedule.input {
        target["Input"] = Value::String(input.to_string());
    }

    let mut properties = json!({
        "Description": schedule.description,
        "ScheduleExpression": schedule.expression,
        "FlexibleTimeWindow": { "Mode": "OFF" },
        "State": "ENABLED",
        "Target": target,
    });
    if let Some(timezone) = schedule.timezone {
        properties["ScheduleExpressionTimezone"] = json!(timezone);
    }

    json!({
        "Type": "AWS::Scheduler::Schedule",
        "Properties": properties,
    })
}
