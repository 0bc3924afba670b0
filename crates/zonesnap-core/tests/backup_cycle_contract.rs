//! Contract test: backup cycle effects
//!
//! Verifies the write-and-notify contract of one backup cycle:
//! - First run (no history) persists an artifact and notifies
//! - An unchanged zone produces no write and no notification
//! - A changed zone produces exactly one write and one notification whose
//!   body itemizes the added records
//! - Zone filtering selects by name or by id
//! - A store put failure propagates with bucket/key context

mod common;

use common::*;
use zonesnap_core::{BackupEngine, MemoryNotifier, MemoryObjectStore};
use zonesnap_core::traits::ObjectStore;

const ZONE_V1: &str = "a.example. 300 IN A 1.2.3.4\n";
const ZONE_V2: &str = "a.example. 300 IN A 1.2.3.4\nb.example. 300 IN A 5.6.7.8\n";

#[tokio::test]
async fn first_run_writes_backup_and_notifies() {
    let store = MemoryObjectStore::new();
    let notifier = MemoryNotifier::new();
    let zones = ScriptedZoneSource::new().with_zone("example.", "Z1", ZONE_V1);

    let (engine, _events) = BackupEngine::new(
        Box::new(store.clone()),
        Box::new(zones),
        Box::new(notifier.clone()),
        minimal_config("example."),
    )
    .expect("engine construction succeeds");

    engine.run_cycle().await.expect("cycle succeeds");

    let keys = store.list("backups").await.unwrap();
    assert_eq!(keys.len(), 1, "first run must persist one artifact");
    assert!(keys[0].starts_with("r53-example.-"), "key: {}", keys[0]);
    assert_eq!(store.get("backups", &keys[0]).await.unwrap(), ZONE_V1.as_bytes());

    let sent = notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "oncall@example.com");
    assert_eq!(sent[0].sender, "backup@example.com");
    assert!(sent[0].subject.contains("example."));
    assert!(sent[0].body.contains("a.example. 300 IN A 1.2.3.4"));
}

#[tokio::test]
async fn unchanged_zone_writes_nothing_and_stays_quiet() {
    let store = MemoryObjectStore::new();
    let notifier = MemoryNotifier::new();
    let zones = ScriptedZoneSource::new().with_zone("example.", "Z1", ZONE_V1);

    // Seed history identical to the current export.
    store
        .put("backups", "r53-example.-100", ZONE_V1.as_bytes())
        .await
        .unwrap();

    let (engine, _events) = BackupEngine::new(
        Box::new(store.clone()),
        Box::new(zones),
        Box::new(notifier.clone()),
        minimal_config("example."),
    )
    .unwrap();

    engine.run_cycle().await.unwrap();

    assert_eq!(
        store.list("backups").await.unwrap().len(),
        1,
        "no new artifact for an unchanged zone"
    );
    assert!(notifier.sent().await.is_empty(), "no notification either");
}

#[tokio::test]
async fn changed_zone_notification_itemizes_added_records() {
    let store = MemoryObjectStore::new();
    let notifier = MemoryNotifier::new();
    let zones = ScriptedZoneSource::new().with_zone("example.", "Z1", ZONE_V2);

    store
        .put("backups", "r53-example.-100", ZONE_V1.as_bytes())
        .await
        .unwrap();

    let (engine, _events) = BackupEngine::new(
        Box::new(store.clone()),
        Box::new(zones),
        Box::new(notifier.clone()),
        minimal_config("example."),
    )
    .unwrap();

    engine.run_cycle().await.unwrap();

    assert_eq!(store.list("backups").await.unwrap().len(), 2);

    let sent = notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert!(
        sent[0].body.ends_with("b.example. 300 IN A 5.6.7.8"),
        "body must itemize exactly the added record, got: {}",
        sent[0].body
    );
    assert!(
        !sent[0].body.contains("a.example."),
        "unchanged records must not be itemized"
    );
}

#[tokio::test]
async fn selection_uses_newest_previous_snapshot() {
    let store = MemoryObjectStore::new();
    let notifier = MemoryNotifier::new();
    let zones = ScriptedZoneSource::new().with_zone("example.", "Z1", ZONE_V2);

    // Older artifact differs, newest matches the current export: the cycle
    // must compare against the newest and conclude "no change".
    store
        .put("backups", "r53-example.-100", ZONE_V1.as_bytes())
        .await
        .unwrap();
    store
        .put("backups", "r53-example.-300", ZONE_V2.as_bytes())
        .await
        .unwrap();

    let (engine, _events) = BackupEngine::new(
        Box::new(store.clone()),
        Box::new(zones),
        Box::new(notifier.clone()),
        minimal_config("example."),
    )
    .unwrap();

    engine.run_cycle().await.unwrap();

    assert_eq!(store.list("backups").await.unwrap().len(), 2);
    assert!(notifier.sent().await.is_empty());
}

#[tokio::test]
async fn zones_not_matching_the_filter_are_untouched() {
    let store = MemoryObjectStore::new();
    let notifier = MemoryNotifier::new();
    let zones = ScriptedZoneSource::new()
        .with_zone("example.", "Z1", ZONE_V1)
        .with_zone("other.", "Z2", ZONE_V1);
    let counters = ScriptedZoneSource::sharing_counters_with(&zones);

    let (engine, _events) = BackupEngine::new(
        Box::new(store.clone()),
        Box::new(ScriptedZoneSource::sharing_counters_with(&zones)),
        Box::new(notifier.clone()),
        minimal_config("example."),
    )
    .unwrap();

    engine.run_cycle().await.unwrap();

    // Only the matching zone was exported and backed up.
    assert_eq!(counters.export_call_count(), 1);
    let keys = store.list("backups").await.unwrap();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("r53-example.-"), "key: {}", keys[0]);
}

#[tokio::test]
async fn filter_by_id_matches_without_name() {
    let store = MemoryObjectStore::new();
    let notifier = MemoryNotifier::new();
    let zones = ScriptedZoneSource::new()
        .with_zone("example.", "Z1", ZONE_V1)
        .with_zone("other.", "Z2", ZONE_V1);

    let mut config = minimal_config("ignored");
    config.zone.name = None;
    config.zone.id = Some("Z2".to_string());

    let (engine, _events) = BackupEngine::new(
        Box::new(store.clone()),
        Box::new(zones),
        Box::new(notifier.clone()),
        config,
    )
    .unwrap();

    engine.run_cycle().await.unwrap();

    let keys = store.list("backups").await.unwrap();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("r53-other.-"), "key: {}", keys[0]);
}

#[tokio::test]
async fn put_failure_propagates_with_context_and_no_notification() {
    let failing = PutFailingStore::new(MemoryObjectStore::new());
    let attempts = failing.attempts_handle();
    let notifier = MemoryNotifier::new();
    let zones = ScriptedZoneSource::new().with_zone("example.", "Z1", ZONE_V1);

    let (engine, _events) = BackupEngine::new(
        Box::new(failing),
        Box::new(zones),
        Box::new(notifier.clone()),
        minimal_config("example."),
    )
    .unwrap();

    let err = engine.run_cycle().await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("backups"), "error must name the bucket: {msg}");
    assert!(msg.contains("r53-example.-"), "error must name the key: {msg}");
    assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert!(
        notifier.sent().await.is_empty(),
        "no notification when the write failed"
    );
}
