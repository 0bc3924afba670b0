//! Snapshot selection
//!
//! Picks the most recent stored snapshot for a domain out of the pool of
//! timestamp-named artifact keys in a bucket.

use std::cmp::Reverse;

use tracing::debug;

use crate::error::Result;
use crate::key;
use crate::traits::ObjectStore;

/// Fetch the content of the most recent snapshot stored for `domain`.
///
/// Candidates are keys matching `"<prefix>-<domain>"` at a domain
/// boundary: the key either ends there or continues with a `-` (the
/// timestamp separator). A plain substring-prefix match would let
/// `example.com` claim `example.com.evil` artifacts.
///
/// Candidates are ordered by their decoded timestamps; keys whose
/// timestamp fails to decode sort as oldest (timestamp 0) but stay in the
/// pool. Ties break on the key string so selection is deterministic.
///
/// Returns the empty string when no candidate exists; callers must treat
/// that as "no prior backup", not as an empty zone. Store failures
/// propagate wrapped with bucket/key context.
pub async fn most_recent_snapshot(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
    domain: &str,
) -> Result<String> {
    let zone_prefix = format!("{prefix}-{domain}");

    let mut candidates: Vec<String> = store
        .list(bucket)
        .await?
        .into_iter()
        .filter(|k| {
            k.strip_prefix(zone_prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('-'))
        })
        .collect();

    if candidates.is_empty() {
        debug!(domain, bucket, "no prior snapshot found");
        return Ok(String::new());
    }

    candidates.sort_by_key(|k| (Reverse(key::decode(k)), Reverse(k.clone())));
    let newest = &candidates[0];
    debug!(domain, key = %newest, "selected most recent snapshot");

    let bytes = store.get(bucket, newest).await?;
    // Snapshots are text; undecodable bytes degrade lossily rather than
    // failing the run.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
