pub mod cloudwatch;
pub mod log_sink;
mod retry;
pub mod stdout;

pub use cloudwatch::{CloudWatchSink, LogBatchWriter};
pub use log_sink::{format_log_line, LogSink, LogSinkEnum};
pub use stdout::StdoutSink;
