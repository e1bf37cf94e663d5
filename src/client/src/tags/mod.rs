//! Keeps a host's tag set in a remote inventory service in line with a desired set.

pub mod datadog;
mod error;
pub mod sync;

pub use datadog::{DatadogClient, TagApi};
pub use error::{TagSyncError, TagSyncResult};
pub use sync::{ensure_absent, ensure_present, host_exists, SyncOutcome};
