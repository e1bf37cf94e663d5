use anyhow::{Context, Result};
use config::{Config as RConfig, File, FileFormat};
use runlog_aws::AwsConfig;
use runlog_common::constants::{
    AWS_PROFILE_ENV_VAR, AWS_REGION_ENV_VAR, DEFAULT_AWS_PROFILE, DEFAULT_AWS_REGION,
    DEFAULT_BATCH_SIZE, DEFAULT_LOG_GROUP, DEFAULT_LOG_LEVEL, DEFAULT_LOG_STREAM,
    LOG_DIR_ENV_VAR, LOG_GROUP_ENV_VAR, LOG_LEVEL_ENV_VAR, LOG_STREAM_ENV_VAR,
    SENTRY_DSN_ENV_VAR,
};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Config {
    pub aws_profile: String,
    #[serde(default)]
    pub aws_role_arn: Option<String>,
    pub aws_region: String,

    pub log_group: String,
    pub log_stream: String,
    pub batch_size: usize,

    pub log_level: String,
    #[serde(default)]
    pub log_dir: Option<String>,
    #[serde(default)]
    pub sentry_dsn: Option<String>,
}

impl Config {
    /// Credential source for the sink; an explicit role wins over the profile.
    pub fn aws_init_type(&self) -> AwsConfig {
        match &self.aws_role_arn {
            Some(arn) => AwsConfig::RoleArn(arn.clone()),
            None => AwsConfig::Profile(self.aws_profile.clone()),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load_default_config() -> Result<Config> {
        Self::load_config(None)
    }

    /// Defaults, then the optional TOML file, then environment overrides.
    pub fn load_config(path: Option<&str>) -> Result<Config> {
        let mut builder = RConfig::builder();

        // set defaults
        builder = builder
            .set_default("aws_profile", DEFAULT_AWS_PROFILE)?
            .set_default("aws_region", DEFAULT_AWS_REGION)?
            .set_default("log_group", DEFAULT_LOG_GROUP)?
            .set_default("log_stream", DEFAULT_LOG_STREAM)?
            .set_default("batch_size", DEFAULT_BATCH_SIZE as u64)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?;

        if let Some(path) = path {
            builder = builder.add_source(File::new(path, FileFormat::Toml).required(true));
        }

        // set overrides
        builder = builder
            .set_override_option("aws_profile", env_var(AWS_PROFILE_ENV_VAR))?
            .set_override_option("aws_region", env_var(AWS_REGION_ENV_VAR))?
            .set_override_option("log_group", env_var(LOG_GROUP_ENV_VAR))?
            .set_override_option("log_stream", env_var(LOG_STREAM_ENV_VAR))?
            .set_override_option("log_level", env_var(LOG_LEVEL_ENV_VAR))?
            .set_override_option("log_dir", env_var(LOG_DIR_ENV_VAR))?
            .set_override_option("sentry_dsn", env_var(SENTRY_DSN_ENV_VAR))?;

        let config: Config = builder
            .build()?
            .try_deserialize()
            .context("failed to parse config file")?;

        if config.batch_size == 0 {
            anyhow::bail!("batch_size must be at least 1");
        }

        Ok(config)
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
