use super::datadog::TagApi;
use super::error::{TagSyncError, TagSyncResult};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    pub changed: bool,
    pub msg: Option<Value>,
}

impl SyncOutcome {
    fn unchanged() -> Self {
        Self {
            changed: false,
            msg: None,
        }
    }
}

/// Whether the inventory knows `host`.
pub async fn host_exists<A: TagApi>(api: &A, host: &str) -> TagSyncResult<bool> {
    Ok(!api.search_hosts(host).await?.is_empty())
}

/// Makes the host's tags equal to `desired` (compared as sets).
///
/// Unknown hosts are left alone.
pub async fn ensure_present<A: TagApi>(
    api: &A,
    host: &str,
    desired: &[String],
    source: &str,
) -> TagSyncResult<SyncOutcome> {
    if !host_exists(api, host).await? {
        info!("Host '{}' not found, nothing to tag", host);
        return Ok(SyncOutcome::unchanged());
    }

    let current: BTreeSet<String> = api.get_tags(host).await?.into_iter().collect();
    let wanted: BTreeSet<String> = desired.iter().cloned().collect();
    if current == wanted {
        return Ok(SyncOutcome::unchanged());
    }

    let echo = api.create_tags(host, desired, source).await?;
    if echo.get("host").and_then(Value::as_str) != Some(host) {
        return Err(TagSyncError::EchoMismatch { echoed: echo });
    }

    info!("Updated tags on '{}'", host);
    Ok(SyncOutcome {
        changed: true,
        msg: Some(echo),
    })
}

/// Removes every tag from the host.
pub async fn ensure_absent<A: TagApi>(
    api: &A,
    host: &str,
    source: &str,
) -> TagSyncResult<SyncOutcome> {
    if !host_exists(api, host).await? {
        info!("Host '{}' not found, nothing to remove", host);
        return Ok(SyncOutcome::unchanged());
    }

    if api.get_tags(host).await?.is_empty() {
        return Ok(SyncOutcome::unchanged());
    }

    api.delete_tags(host, source).await?;
    info!("Removed all tags from '{}'", host);
    Ok(SyncOutcome {
        changed: true,
        msg: None,
    })
}
