pub const AWS_PROFILE_ENV_VAR: &str = "AWS_PROFILE";
pub const AWS_REGION_ENV_VAR: &str = "AWS_REGION";
pub const LOG_GROUP_ENV_VAR: &str = "LOG_GROUP";
pub const LOG_STREAM_ENV_VAR: &str = "LOG_STREAM";
pub const LOG_LEVEL_ENV_VAR: &str = "RUNLOG_LOG";
pub const LOG_DIR_ENV_VAR: &str = "RUNLOG_LOG_DIR";
pub const SENTRY_DSN_ENV_VAR: &str = "RUNLOG_SENTRY_DSN";

pub const DEFAULT_AWS_PROFILE: &str = "default";
pub const DEFAULT_AWS_REGION: &str = "us-east-1";
pub const DEFAULT_LOG_GROUP: &str = "ansible";
pub const DEFAULT_LOG_STREAM: &str = "provision";
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const LOG_FILE_NAME: &str = "runlog.log";

/// Source attached to every tag mutation made by the tags module.
pub const TAG_SOURCE: &str = "ansible";
pub const DEFAULT_DATADOG_API_HOST: &str = "https://api.datadoghq.com";
