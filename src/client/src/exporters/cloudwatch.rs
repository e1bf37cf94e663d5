use super::log_sink::{format_log_line, LogSink};
use super::retry::send_batch_with_retry;
use anyhow::Result;
use runlog_aws::cloudwatch::{CloudWatchLogsClient, LogEvent, MAX_BATCH_BYTES, MAX_MESSAGE_BYTES};
use runlog_common::record::{EventRecord, Severity};
use std::future::Future;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// The remote half of the CloudWatch sink, split out so the batching worker can be
/// exercised without AWS.
pub trait LogBatchWriter: Send + Sync + 'static {
    fn provision(&self, log_group: &str, log_stream: &str)
        -> impl Future<Output = Result<()>> + Send;

    fn put_batch(
        &self,
        log_group: &str,
        log_stream: &str,
        events: &[LogEvent],
    ) -> impl Future<Output = Result<()>> + Send;
}

impl LogBatchWriter for CloudWatchLogsClient {
    async fn provision(&self, log_group: &str, log_stream: &str) -> Result<()> {
        self.ensure_log_group(log_group).await?;
        self.ensure_log_stream(log_group, log_stream).await
    }

    async fn put_batch(&self, log_group: &str, log_stream: &str, events: &[LogEvent]) -> Result<()> {
        self.put_log_events(log_group, log_stream, events).await
    }
}

/// Sink that queues records in memory and ships them from a background task.
///
/// Must be created inside a tokio runtime. Call [`CloudWatchSink::shutdown`] before
/// the runtime stops, otherwise queued events are lost.
pub struct CloudWatchSink {
    tx: UnboundedSender<LogEvent>,
    worker: JoinHandle<()>,
}

impl CloudWatchSink {
    pub fn spawn<W: LogBatchWriter>(
        writer: W,
        log_group: impl Into<String>,
        log_stream: impl Into<String>,
        batch_size: usize,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = BatchWorker {
            writer,
            log_group: log_group.into(),
            log_stream: log_stream.into(),
            batch_size: batch_size.max(1),
            rx,
        };

        Self {
            tx,
            worker: tokio::spawn(worker.run()),
        }
    }

    /// Closes the queue and waits until every queued event has been attempted.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(err) = self.worker.await {
            error!("CloudWatch worker terminated abnormally: {}", err);
        }
    }
}

impl LogSink for CloudWatchSink {
    fn write(&self, record: &EventRecord, severity: Severity) {
        let message = match format_log_line(record, severity) {
            Ok(message) => message,
            Err(err) => {
                error!("Dropping record that could not be encoded: {}", err);
                return;
            }
        };

        let event = LogEvent {
            timestamp_ms: record.created_at.timestamp_millis(),
            message: truncate_message(message),
        };
        if self.tx.send(event).is_err() {
            debug!("CloudWatch worker is gone, record dropped");
        }
    }
}

/// Cuts a message down to what a single CloudWatch event can hold, on a char boundary.
fn truncate_message(mut message: String) -> String {
    if message.len() <= MAX_MESSAGE_BYTES {
        return message;
    }

    let mut end = MAX_MESSAGE_BYTES;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    warn!(
        "Truncating {} byte log message to {} bytes",
        message.len(),
        end
    );
    message.truncate(end);
    message
}

/// Splits events into consecutive runs whose summed size stays within `max_bytes`.
fn split_by_size(events: &[LogEvent], max_bytes: usize) -> Vec<&[LogEvent]> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut size = 0;

    for (index, event) in events.iter().enumerate() {
        let event_size = event.size();
        if index > start && size + event_size > max_bytes {
            chunks.push(&events[start..index]);
            start = index;
            size = 0;
        }
        size += event_size;
    }
    if start < events.len() {
        chunks.push(&events[start..]);
    }
    chunks
}

struct BatchWorker<W> {
    writer: W,
    log_group: String,
    log_stream: String,
    batch_size: usize,
    rx: UnboundedReceiver<LogEvent>,
}

impl<W: LogBatchWriter> BatchWorker<W> {
    async fn run(mut self) {
        let mut provisioned = false;
        let mut buff: Vec<LogEvent> = Vec::with_capacity(self.batch_size);

        while self.rx.recv_many(&mut buff, self.batch_size).await > 0 {
            if !provisioned {
                match self.writer.provision(&self.log_group, &self.log_stream).await {
                    Ok(()) => provisioned = true,
                    Err(err) => error!(
                        "Could not prepare {}/{}: {:?}",
                        self.log_group, self.log_stream, err
                    ),
                }
            }

            for chunk in split_by_size(&buff, MAX_BATCH_BYTES) {
                if let Err(err) =
                    send_batch_with_retry(&self.writer, &self.log_group, &self.log_stream, chunk)
                        .await
                {
                    error!("Dropping {} events after retries: {:?}", chunk.len(), err);
                }
            }
            buff.clear();
        }

        info!("CloudWatch worker for {}/{} stopped", self.log_group, self.log_stream);
    }
}
