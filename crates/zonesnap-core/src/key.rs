//! Artifact key codec
//!
//! A snapshot is stored under a key of the form
//! `"<prefix>-<domain>-<epoch-seconds>"`. The embedded timestamp is the
//! sole retention-ordering signal: the selector picks the candidate with
//! the highest decoded timestamp.
//!
//! Decoding never fails. A key with no trailing numeric suffix decodes to
//! timestamp 0, which makes it the oldest possible candidate rather than
//! excluding it from selection. A malformed key must never crash a run,
//! only lose retention priority.

/// Default key prefix. Kept stable so artifacts written by earlier
/// deployments remain selectable.
pub const DEFAULT_KEY_PREFIX: &str = "r53";

/// Encode an artifact key for a zone snapshot taken at `epoch_seconds`.
///
/// The epoch is truncated to `i32`, matching the width used by keys
/// already in the wild. Keys written after January 2038 will wrap; widening
/// the encoding would break ordering against existing artifacts, so the
/// truncation is kept.
pub fn encode(prefix: &str, domain: &str, epoch_seconds: i64) -> String {
    format!("{}-{}-{}", prefix, domain, epoch_seconds as i32)
}

/// Decode the creation timestamp embedded in an artifact key.
///
/// Scans for the last `-` in the key and parses everything after it.
/// Returns 0 when there is no dash, the dash is the final character, or
/// the suffix is not an integer.
pub fn decode(key: &str) -> i64 {
    let Some(index) = key.rfind('-') else {
        return 0;
    };
    if index == key.len() - 1 {
        return 0;
    }
    key[index + 1..].parse::<i64>().unwrap_or(0)
}
