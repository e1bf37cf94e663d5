pub mod cloudwatch;
pub mod config;

pub use cloudwatch::CloudWatchLogsClient;
pub use config::{resolve_available_aws_config, AwsConfig};
