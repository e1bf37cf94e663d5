use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use serde::{Deserialize, Serialize};
use std::fmt;

const ASSUME_ROLE_SESSION_NAME: &str = "runlog-session";

/// How the AWS credentials for the log sink are obtained.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AwsConfig {
    Profile(String),
    RoleArn(String),
    Env,
}

impl fmt::Display for AwsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AwsConfig::Profile(profile) => write!(f, "profile:{}", profile),
            AwsConfig::RoleArn(role) => write!(f, "role_arn:{}", role),
            AwsConfig::Env => write!(f, "env"),
        }
    }
}

//AWS SDK may fallback to IMDS if running inside EC2.
pub async fn get_initialized_aws_conf(
    initialization_conf: AwsConfig,
    region: impl Into<String>,
) -> Option<SdkConfig> {
    let config_loader = aws_config::defaults(BehaviorVersion::latest());
    let loader = match initialization_conf {
        AwsConfig::Profile(profile) => {
            tracing::debug!("Trying to load AWS config using profile '{}'", profile);
            config_loader.profile_name(profile)
        }
        AwsConfig::RoleArn(arn) => {
            tracing::debug!("Trying to assume role '{}'", &arn);
            let assumed_role_provider = aws_config::sts::AssumeRoleProvider::builder(&arn)
                .session_name(ASSUME_ROLE_SESSION_NAME)
                .build()
                .await;

            let assumed_credentials_provider =
                match assumed_role_provider.provide_credentials().await {
                    Ok(creds) => creds,
                    Err(err) => {
                        tracing::warn!("Failed to assume role '{}': {:?}", arn, err);
                        return None;
                    }
                };

            config_loader.credentials_provider(assumed_credentials_provider)
        }
        AwsConfig::Env => {
            tracing::debug!("Trying to load AWS config from environment");
            aws_config::from_env()
        }
    };

    let config = loader.region(Region::new(region.into())).load().await;
    let credentials_provider = config.credentials_provider()?;

    match credentials_provider.provide_credentials().await {
        Ok(_) => {
            tracing::debug!("Successfully retrieved AWS credentials");
            Some(config)
        }
        Err(err) => {
            tracing::warn!("Failed to get AWS credentials: {:?}", err);
            None
        }
    }
}

/// Tries the requested credential source first, then the default environment chain.
pub async fn resolve_available_aws_config(conf: AwsConfig, region: &str) -> Option<SdkConfig> {
    if conf != AwsConfig::Env {
        let label = conf.to_string();
        let requested = get_initialized_aws_conf(conf, region).await;
        if requested.is_some() {
            tracing::info!("Resolved AWS credentials using {}", label);
            return requested;
        }
        tracing::warn!("Failed to resolve credentials using {}", label);
    }

    let env_conf = get_initialized_aws_conf(AwsConfig::Env, region).await;
    if env_conf.is_some() {
        tracing::info!("Resolved AWS credentials using environment.");
        return env_conf;
    }

    tracing::warn!("Could not resolve AWS credentials from profile or environment.");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_credential_source() {
        assert_eq!(
            AwsConfig::Profile("default".into()).to_string(),
            "profile:default"
        );
        assert_eq!(
            AwsConfig::RoleArn("arn:aws:iam::1:role/x".into()).to_string(),
            "role_arn:arn:aws:iam::1:role/x"
        );
        assert_eq!(AwsConfig::Env.to_string(), "env");
    }

    #[test]
    fn deserializes_from_lowercase_tags() {
        let conf: AwsConfig = serde_json::from_str(r#"{"profile":"ops"}"#).unwrap();
        assert_eq!(conf, AwsConfig::Profile("ops".into()));

        let conf: AwsConfig = serde_json::from_str(r#""env""#).unwrap();
        assert_eq!(conf, AwsConfig::Env);
    }
}
