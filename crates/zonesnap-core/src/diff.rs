//! Change detection between two zone snapshots
//!
//! Two policies exist behind one tagged enum. The structural policy parses
//! both snapshots into canonical record sets and compares those, so it is
//! immune to reformatting and can itemize added records. The raw-text
//! policy compares blob bytes exactly: cheaper (no parser), but strictly
//! less precise. Any whitespace or line-order change is a false positive,
//! and no itemized additions are available.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::zone;

/// Which change-detection policy a comparison uses.
///
/// `Structural` is the default for new installations; `RawText` is kept as
/// a minimal-dependency fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangePolicy {
    /// Parsed record-set comparison with itemized additions
    #[default]
    Structural,
    /// Exact byte comparison of snapshot blobs
    RawText,
}

/// The outcome of comparing a previous snapshot against the current one.
///
/// Constructed fresh per comparison and consumed immediately by the
/// notifier; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeReport {
    /// Whether a meaningful change occurred
    pub changed: bool,
    /// Canonical renderings present in the current snapshot but absent from
    /// the previous one, in canonical order. Always empty under `RawText`.
    pub added: Vec<String>,
}

/// Compare two snapshots under the given policy.
///
/// An empty `previous` blob means "no history": both policies report a
/// change whenever `current` has content. Under the structural policy that
/// falls out naturally (the empty canonical set compares unequal to any
/// non-empty one); the raw-text policy special-cases it.
pub fn detect(policy: ChangePolicy, previous: &str, current: &str) -> ChangeReport {
    match policy {
        ChangePolicy::Structural => detect_structural(previous, current),
        ChangePolicy::RawText => detect_raw(previous, current),
    }
}

fn detect_structural(previous: &str, current: &str) -> ChangeReport {
    let prev = zone::parse(previous);
    let curr = zone::parse(current);

    let prev_renderings = prev.renderings();
    let curr_renderings = curr.renderings();

    // Same length and same rendering at every rank: set equality, given the
    // deterministic descending sort.
    let changed = prev_renderings.len() != curr_renderings.len()
        || prev_renderings
            .iter()
            .zip(curr_renderings.iter())
            .any(|(p, c)| p != c);

    let existing: HashSet<&str> = prev_renderings.iter().map(String::as_str).collect();
    let added = curr_renderings
        .into_iter()
        .filter(|r| !existing.contains(r.as_str()))
        .collect();

    ChangeReport { changed, added }
}

fn detect_raw(previous: &str, current: &str) -> ChangeReport {
    ChangeReport {
        changed: previous.is_empty() || previous != current,
        added: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONE: &str = "a.example. 300 IN A 1.2.3.4\nb.example. 300 IN A 5.6.7.8\n";

    #[test]
    fn identical_snapshots_are_unchanged_structurally() {
        for z in ["", "a.example. 300 IN A 1.2.3.4", ZONE] {
            let report = detect(ChangePolicy::Structural, z, z);
            assert!(!report.changed, "unexpected change for {z:?}");
            assert!(report.added.is_empty());
        }
    }

    #[test]
    fn empty_previous_is_a_change_under_both_policies() {
        for policy in [ChangePolicy::Structural, ChangePolicy::RawText] {
            let report = detect(policy, "", "a.example. 300 IN A 1.2.3.4");
            assert!(report.changed, "{policy:?} missed first-run change");
        }
    }

    #[test]
    fn added_record_is_itemized_with_canonical_rendering() {
        let prev = "a.example. 300 IN A 1.2.3.4";
        let report = detect(ChangePolicy::Structural, prev, ZONE);
        assert!(report.changed);
        assert_eq!(report.added, vec!["b.example. 300 IN A 5.6.7.8"]);
    }

    #[test]
    fn removal_only_changes_without_additions() {
        let report = detect(ChangePolicy::Structural, ZONE, "a.example. 300 IN A 1.2.3.4");
        assert!(report.changed);
        assert!(report.added.is_empty());
    }

    #[test]
    fn nonempty_added_implies_changed() {
        let report = detect(ChangePolicy::Structural, "", ZONE);
        assert!(!report.added.is_empty());
        assert!(report.changed);
    }

    #[test]
    fn reformatting_fools_raw_but_not_structural() {
        let reordered = "b.example.\t300\tIN\tA\t5.6.7.8\n\na.example. 300 IN A 1.2.3.4 ; comment\n";
        assert!(!detect(ChangePolicy::Structural, ZONE, reordered).changed);
        assert!(detect(ChangePolicy::RawText, ZONE, reordered).changed);
    }

    #[test]
    fn raw_policy_never_itemizes() {
        let report = detect(ChangePolicy::RawText, "old", "new");
        assert!(report.changed);
        assert!(report.added.is_empty());
    }

    #[test]
    fn raw_policy_unchanged_on_identical_nonempty_blobs() {
        assert!(!detect(ChangePolicy::RawText, ZONE, ZONE).changed);
    }
}
