//! Configuration types for the zone snapshot engine
//!
//! Configuration is an explicit value object handed to the engine and
//! validated once at the boundary, before any I/O. Loading (environment
//! variables, files) is the caller's concern; see `zonesnapd`.

use serde::{Deserialize, Serialize};

use crate::diff::ChangePolicy;
use crate::key::DEFAULT_KEY_PREFIX;
use crate::traits::ZoneInfo;

/// Main backup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Provider region the run operates in
    pub region: String,

    /// Where snapshot artifacts are stored
    pub store: StoreConfig,

    /// Which zone(s) this run backs up
    pub zone: ZoneFilter,

    /// Change notification addresses. `None` disables notifications;
    /// when present, both addresses must be set (both-or-neither).
    #[serde(default)]
    pub notification: Option<NotificationConfig>,

    /// Change-detection policy
    #[serde(default)]
    pub policy: ChangePolicy,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl BackupConfig {
    /// Validate the configuration
    ///
    /// Fatal on failure: the engine refuses to construct, so a bad
    /// configuration never reaches any collaborator I/O.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.region.is_empty() {
            return Err(crate::Error::config("region must not be empty"));
        }
        self.store.validate()?;
        self.zone.validate()?;
        if let Some(notification) = &self.notification {
            notification.validate()?;
        }
        Ok(())
    }
}

/// Artifact store location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Bucket artifacts are written to
    pub bucket: String,

    /// Bucket region; falls back to the run's region when unset
    #[serde(default)]
    pub region: Option<String>,
}

impl StoreConfig {
    /// Validate the store location
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.bucket.is_empty() {
            return Err(crate::Error::config("store bucket must not be empty"));
        }
        Ok(())
    }
}

/// Zone selection filter: by name, by id, or either
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneFilter {
    /// Zone name to match (trailing root dot ignored)
    #[serde(default)]
    pub name: Option<String>,

    /// Provider-specific zone id to match exactly
    #[serde(default)]
    pub id: Option<String>,
}

impl ZoneFilter {
    /// Validate the filter
    pub fn validate(&self) -> Result<(), crate::Error> {
        let has_name = self.name.as_deref().is_some_and(|n| !n.is_empty());
        let has_id = self.id.as_deref().is_some_and(|i| !i.is_empty());
        if !has_name && !has_id {
            return Err(crate::Error::config(
                "either a zone name or a zone id must be configured",
            ));
        }
        Ok(())
    }

    /// Whether a zone matches this filter
    ///
    /// Names compare with a single trailing root dot stripped from both
    /// sides, since providers differ on whether zone names are absolute.
    /// Ids compare exactly.
    pub fn matches(&self, zone: &ZoneInfo) -> bool {
        let name_match = self
            .name
            .as_deref()
            .is_some_and(|n| !n.is_empty() && trim_root_dot(n) == trim_root_dot(&zone.name));
        let id_match = self
            .id
            .as_deref()
            .is_some_and(|i| !i.is_empty() && i == zone.id);
        name_match || id_match
    }
}

fn trim_root_dot(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Change notification addresses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Originating address
    pub sender: String,

    /// Destination address
    pub receiver: String,
}

impl NotificationConfig {
    /// Validate the addresses
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.sender.is_empty() || self.receiver.is_empty() {
            return Err(crate::Error::config(
                "notification requires both sender and receiver addresses",
            ));
        }
        Ok(())
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Prefix for artifact keys
    ///
    /// Changing this orphans previously stored artifacts: the selector
    /// will no longer see them.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Capacity of the internal event channel
    ///
    /// When full, new events are dropped (with a warning log).
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

fn default_event_channel_capacity() -> usize {
    256
}
