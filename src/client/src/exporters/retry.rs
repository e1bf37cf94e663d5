use super::cloudwatch::LogBatchWriter;
use anyhow::Result;
use runlog_aws::cloudwatch::LogEvent;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

pub(crate) const MAX_RETRIES: usize = 3;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Send one batch, retrying with a fixed delay. The error of the last attempt is returned.
pub(crate) async fn send_batch_with_retry<W: LogBatchWriter>(
    writer: &W,
    log_group: &str,
    log_stream: &str,
    events: &[LogEvent],
) -> Result<()> {
    if events.is_empty() {
        debug!("No events to send, skipping network call");
        return Ok(());
    }

    for attempt in 1..=MAX_RETRIES {
        let start_time = Instant::now();

        match writer.put_batch(log_group, log_stream, events).await {
            Ok(()) => {
                debug!(
                    "Sent {} events to {}/{} on attempt {}, elapsed: {:?}",
                    events.len(),
                    log_group,
                    log_stream,
                    attempt,
                    start_time.elapsed()
                );
                return Ok(());
            }
            Err(e) if attempt < MAX_RETRIES => {
                warn!(
                    "Attempt {} failed (retrying): {}, elapsed: {:?}",
                    attempt,
                    e,
                    start_time.elapsed()
                );
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(e) => {
                error!(
                    "Attempt {} failed: {}, elapsed: {:?}",
                    attempt,
                    e,
                    start_time.elapsed()
                );
                return Err(e);
            }
        }
    }

    unreachable!("Loop should always return")
}
