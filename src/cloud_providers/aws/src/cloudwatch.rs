use anyhow::{Context, Result};
use aws_config::SdkConfig;
use aws_sdk_cloudwatchlogs::types::InputLogEvent;

/// Bytes `PutLogEvents` adds to every event when checking its size limits.
pub const EVENT_OVERHEAD_BYTES: usize = 26;
/// Largest accepted event, overhead included.
pub const MAX_EVENT_BYTES: usize = 256 * 1024;
/// Largest accepted message once the per-event overhead is accounted for.
pub const MAX_MESSAGE_BYTES: usize = MAX_EVENT_BYTES - EVENT_OVERHEAD_BYTES;
/// Largest accepted batch, summed over events including their overhead.
pub const MAX_BATCH_BYTES: usize = 1024 * 1024;

/// A single message ready for `PutLogEvents`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub timestamp_ms: i64,
    pub message: String,
}

impl LogEvent {
    /// Size counted against the service limits.
    pub fn size(&self) -> usize {
        self.message.len() + EVENT_OVERHEAD_BYTES
    }
}

pub struct CloudWatchLogsClient {
    pub client: aws_sdk_cloudwatchlogs::Client,
}

impl CloudWatchLogsClient {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_cloudwatchlogs::Client::new(config),
        }
    }

    pub async fn ensure_log_group(&self, log_group: &str) -> Result<()> {
        match self
            .client
            .create_log_group()
            .log_group_name(log_group)
            .send()
            .await
        {
            Ok(_) => {
                tracing::info!("Created log group '{}'", log_group);
                Ok(())
            }
            Err(err) => {
                if let Some(service_error) = err.as_service_error() {
                    if service_error.is_resource_already_exists_exception() {
                        tracing::debug!("Log group '{}' already exists", log_group);
                        return Ok(());
                    }
                }
                Err(anyhow::anyhow!(
                    "Failed to create log group '{}': {:?}",
                    log_group,
                    err
                ))
            }
        }
    }

    pub async fn ensure_log_stream(&self, log_group: &str, log_stream: &str) -> Result<()> {
        match self
            .client
            .create_log_stream()
            .log_group_name(log_group)
            .log_stream_name(log_stream)
            .send()
            .await
        {
            Ok(_) => {
                tracing::info!("Created log stream '{}/{}'", log_group, log_stream);
                Ok(())
            }
            Err(err) => {
                if let Some(service_error) = err.as_service_error() {
                    if service_error.is_resource_already_exists_exception() {
                        tracing::debug!("Log stream '{}/{}' already exists", log_group, log_stream);
                        return Ok(());
                    }
                }
                Err(anyhow::anyhow!(
                    "Failed to create log stream '{}/{}': {:?}",
                    log_group,
                    log_stream,
                    err
                ))
            }
        }
    }

    /// Sends one batch. CloudWatch requires the batch to be in chronological order.
    pub async fn put_log_events(
        &self,
        log_group: &str,
        log_stream: &str,
        events: &[LogEvent],
    ) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        let mut input = events
            .iter()
            .map(|event| {
                InputLogEvent::builder()
                    .timestamp(event.timestamp_ms)
                    .message(event.message.clone())
                    .build()
                    .context("Failed to build log event")
            })
            .collect::<Result<Vec<_>>>()?;
        input.sort_by_key(|event| event.timestamp());

        let response = self
            .client
            .put_log_events()
            .log_group_name(log_group)
            .log_stream_name(log_stream)
            .set_log_events(Some(input))
            .send()
            .await
            .map_err(|err| anyhow::anyhow!("PutLogEvents failed: {:?}", err))?;

        if let Some(rejected) = response.rejected_log_events_info() {
            tracing::warn!("CloudWatch rejected part of the batch: {:?}", rejected);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_includes_service_overhead() {
        let event = LogEvent {
            timestamp_ms: 0,
            message: "héllo".into(),
        };
        assert_eq!(event.size(), 6 + EVENT_OVERHEAD_BYTES);
        assert_eq!(MAX_MESSAGE_BYTES + EVENT_OVERHEAD_BYTES, MAX_EVENT_BYTES);
    }
}
