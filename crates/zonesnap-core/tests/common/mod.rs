//! Test doubles and common utilities for engine contract tests
//!
//! These doubles verify the engine's collaborator contracts without any
//! real storage, DNS provider, or delivery transport.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use zonesnap_core::config::{
    BackupConfig, EngineConfig, NotificationConfig, StoreConfig, ZoneFilter,
};
use zonesnap_core::diff::ChangePolicy;
use zonesnap_core::error::{Error, Result};
use zonesnap_core::traits::{ObjectStore, ZoneInfo, ZoneSource};

/// A zone source serving fixed zones with scripted export text
pub struct ScriptedZoneSource {
    zones: Vec<ZoneInfo>,
    exports: HashMap<String, String>,
    export_call_count: Arc<AtomicUsize>,
}

impl ScriptedZoneSource {
    pub fn new() -> Self {
        Self {
            zones: Vec::new(),
            exports: HashMap::new(),
            export_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add a zone with the text its export will produce
    pub fn with_zone(mut self, name: &str, id: &str, export: &str) -> Self {
        self.zones.push(ZoneInfo::new(name, id));
        self.exports.insert(name.to_string(), export.to_string());
        self
    }

    /// Number of times export_zone() was called
    pub fn export_call_count(&self) -> usize {
        self.export_call_count.load(Ordering::SeqCst)
    }

    /// Create a ScriptedZoneSource that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            zones: other.zones.clone(),
            exports: other.exports.clone(),
            export_call_count: Arc::clone(&other.export_call_count),
        }
    }
}

#[async_trait]
impl ZoneSource for ScriptedZoneSource {
    async fn list_zones(&self) -> Result<Vec<ZoneInfo>> {
        Ok(self.zones.clone())
    }

    async fn export_zone(&self, zone: &ZoneInfo) -> Result<String> {
        self.export_call_count.fetch_add(1, Ordering::SeqCst);
        self.exports
            .get(&zone.name)
            .cloned()
            .ok_or_else(|| Error::zone_source(format!("no scripted export for {}", zone.name)))
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// An object store wrapper that fails every put, for error-path tests
pub struct PutFailingStore<S> {
    inner: S,
    put_attempts: Arc<AtomicUsize>,
}

impl<S> PutFailingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            put_attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn put_attempts(&self) -> usize {
        self.put_attempts.load(Ordering::SeqCst)
    }

    pub fn attempts_handle(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.put_attempts)
    }
}

#[async_trait]
impl<S: ObjectStore> ObjectStore for PutFailingStore<S> {
    async fn list(&self, bucket: &str) -> Result<Vec<String>> {
        self.inner.list(bucket).await
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.inner.get(bucket, key).await
    }

    async fn put(&self, bucket: &str, key: &str, _body: &[u8]) -> Result<()> {
        self.put_attempts.fetch_add(1, Ordering::SeqCst);
        Err(Error::store_key(bucket, key, "injected put failure"))
    }
}

/// Helper to create a minimal BackupConfig for testing
pub fn minimal_config(zone_name: &str) -> BackupConfig {
    BackupConfig {
        region: "test-region".to_string(),
        store: StoreConfig {
            bucket: "backups".to_string(),
            region: None,
        },
        zone: ZoneFilter {
            name: Some(zone_name.to_string()),
            id: None,
        },
        notification: Some(NotificationConfig {
            sender: "backup@example.com".to_string(),
            receiver: "oncall@example.com".to_string(),
        }),
        policy: ChangePolicy::Structural,
        engine: EngineConfig::default(),
    }
}
