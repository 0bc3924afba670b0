//! Core backup engine
//!
//! The BackupEngine is responsible for one backup cycle:
//! - Listing zones from the ZoneSource and applying the configured filter
//! - Fetching the previous snapshot via the selector
//! - Exporting the current zone text
//! - Deciding via the change detector whether to persist and notify
//!
//! ## Flow (per matching zone, strictly sequential)
//!
//! ```text
//! ┌────────────┐   previous    ┌──────────────┐   current   ┌────────────┐
//! │ObjectStore │──snapshot────▶│ BackupEngine │◀───export───│ ZoneSource │
//! └────────────┘               └──────────────┘             └────────────┘
//!                                     │ changed?
//!                         ┌───────────┴───────────┐
//!                         ▼                       ▼
//!                  put(new artifact)        log + skip
//!                         │
//!                         ▼
//!                  Notifier::send
//! ```
//!
//! There is no concurrent fan-out across zones: concurrent writers could
//! race on the same artifact key prefix and corrupt retention ordering.
//! Write and notify are attempted together for a zone; a notification
//! failure is still reported even though the write is not rolled back.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::BackupConfig;
use crate::diff::{self, ChangePolicy};
use crate::error::{Error, Result};
use crate::traits::{Notifier, ObjectStore, ZoneInfo, ZoneSource};
use crate::{key, select};

/// Events emitted by the BackupEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A cycle started
    CycleStarted {
        zones_listed: usize,
        zones_matched: usize,
    },

    /// A zone's current snapshot differed and was persisted
    BackupWritten {
        zone: String,
        key: String,
        added_records: usize,
    },

    /// A zone was unchanged; nothing persisted
    NoChange { zone: String },

    /// A change notification was delivered
    NotificationSent { zone: String, recipient: String },

    /// A cycle finished without a fatal error
    CycleCompleted { backups_written: usize },
}

/// Core backup engine
///
/// One instance runs one zone-filter configuration against one store. The
/// engine is stateless across cycles: everything it knows about history is
/// re-read from the store at the start of each cycle.
///
/// ## Lifecycle
///
/// 1. Create with [`BackupEngine::new()`] (validates the configuration)
/// 2. Invoke [`BackupEngine::run_cycle()`] per trigger (cron, scheduler)
/// 3. Consume the event receiver for monitoring, or drop it
pub struct BackupEngine {
    /// Artifact storage
    store: Box<dyn ObjectStore>,

    /// Zone directory + exporter
    zones: Box<dyn ZoneSource>,

    /// Change notification delivery
    notifier: Box<dyn Notifier>,

    /// Validated configuration
    config: BackupConfig,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl BackupEngine {
    /// Create a new backup engine
    ///
    /// Validates the configuration before anything else; a configuration
    /// error is fatal and happens before any I/O.
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields
    /// engine events.
    pub fn new(
        store: Box<dyn ObjectStore>,
        zones: Box<dyn ZoneSource>,
        notifier: Box<dyn Notifier>,
        config: BackupConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.engine.event_channel_capacity);

        let engine = Self {
            store,
            zones,
            notifier,
            config,
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Run one backup cycle
    ///
    /// Processes every zone matching the configured filter, strictly
    /// sequentially. The first collaborator failure aborts the cycle and
    /// propagates; zones already processed keep their effects.
    pub async fn run_cycle(&self) -> Result<()> {
        let zones = self
            .zones
            .list_zones()
            .await
            .map_err(|e| Error::zone_source(format!("listing zones failed: {e}")))?;

        let matched: Vec<ZoneInfo> = zones
            .iter()
            .filter(|z| self.config.zone.matches(z))
            .cloned()
            .collect();

        self.emit_event(EngineEvent::CycleStarted {
            zones_listed: zones.len(),
            zones_matched: matched.len(),
        });

        if matched.is_empty() {
            warn!(
                source = self.zones.source_name(),
                "no zones matched the configured filter"
            );
        }

        let mut backups_written = 0;
        for zone in &matched {
            if self.backup_zone(zone).await? {
                backups_written += 1;
            }
        }

        self.emit_event(EngineEvent::CycleCompleted { backups_written });
        Ok(())
    }

    /// Back up one zone; returns whether an artifact was written
    async fn backup_zone(&self, zone: &ZoneInfo) -> Result<bool> {
        let bucket = &self.config.store.bucket;
        let prefix = &self.config.engine.key_prefix;

        let previous = select::most_recent_snapshot(
            self.store.as_ref(),
            bucket,
            prefix,
            &zone.name,
        )
        .await?;

        let current = self.zones.export_zone(zone).await.map_err(|e| {
            Error::zone_source(format!("exporting zone {} failed: {e}", zone.name))
        })?;

        let report = diff::detect(self.config.policy, &previous, &current);
        if !report.changed {
            info!(zone = %zone.name, "no changes detected, skipping backup");
            self.emit_event(EngineEvent::NoChange {
                zone: zone.name.clone(),
            });
            return Ok(false);
        }

        let artifact_key = key::encode(prefix, &zone.name, chrono::Utc::now().timestamp());
        self.store
            .put(bucket, &artifact_key, current.as_bytes())
            .await
            .map_err(|e| {
                Error::store_key(
                    bucket.as_str(),
                    artifact_key.as_str(),
                    format!("backup upload failed: {e}"),
                )
            })?;

        info!(
            zone = %zone.name,
            key = %artifact_key,
            added = report.added.len(),
            "backup written"
        );
        self.emit_event(EngineEvent::BackupWritten {
            zone: zone.name.clone(),
            key: artifact_key,
            added_records: report.added.len(),
        });

        // The write stands even if notification fails; the error is still
        // reported to the caller.
        if let Some(notification) = &self.config.notification {
            let subject = format!("Zone backup for {}", zone.name);
            let body = match self.config.policy {
                ChangePolicy::Structural => format!(
                    "The following records changed since the last backup:\n{}",
                    report.added.join("\n")
                ),
                ChangePolicy::RawText => current.clone(),
            };

            self.notifier
                .send(&notification.receiver, &notification.sender, &subject, &body)
                .await
                .map_err(|e| {
                    Error::notify(
                        notification.receiver.as_str(),
                        format!("notification for zone {} failed: {e}", zone.name),
                    )
                })?;

            debug!(zone = %zone.name, recipient = %notification.receiver, "notification sent");
            self.emit_event(EngineEvent::NotificationSent {
                zone: zone.name.clone(),
                recipient: notification.receiver.clone(),
            });
        }

        Ok(true)
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        if self.event_tx.try_send(event).is_err() {
            // Channel full or receiver dropped; events are advisory only.
            warn!("Event channel full, dropping engine event");
        }
    }
}
