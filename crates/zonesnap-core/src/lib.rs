// # zonesnap-core
//
// Core library for the zone snapshot diff and retention engine.
//
// ## Architecture Overview
//
// This library snapshots a DNS zone's textual record set, compares it
// against the most recent stored snapshot, and reports what changed:
// - **ObjectStore**: Trait for listing/fetching/storing snapshot blobs
// - **ZoneSource**: Trait for enumerating zones and exporting their records
// - **Notifier**: Trait for delivering change notifications
// - **BackupEngine**: Orchestrates select → export → diff → persist → notify
//
// The engine itself is stateless across runs: retention ordering lives
// entirely in the timestamps embedded in stored artifact keys.
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Diff/retention logic is separate from
//    storage, DNS provider, and delivery implementations
// 2. **Degrade, don't crash**: Malformed artifact keys sort as oldest and
//    malformed zone lines are skipped; neither aborts a run
// 3. **No internal retries**: Collaborator failures propagate with context;
//    the caller decides whether to re-run the cycle

pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod key;
pub mod notify;
pub mod select;
pub mod store;
pub mod traits;
pub mod zone;

// Re-export core types for convenience
pub use config::{BackupConfig, EngineConfig, NotificationConfig, StoreConfig, ZoneFilter};
pub use diff::{ChangePolicy, ChangeReport};
pub use engine::{BackupEngine, EngineEvent};
pub use error::{Error, Result};
pub use notify::{LogNotifier, MemoryNotifier};
pub use select::most_recent_snapshot;
pub use store::{FsObjectStore, MemoryObjectStore};
pub use traits::{Notifier, ObjectStore, ZoneInfo, ZoneSource};
pub use zone::{CanonicalRecordSet, Record};
