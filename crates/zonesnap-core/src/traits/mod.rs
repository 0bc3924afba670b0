//! Collaborator traits for the zone snapshot engine
//!
//! This module defines the abstract interfaces the engine consumes.
//!
//! - [`ObjectStore`]: List, fetch, and store snapshot blobs under keys
//! - [`ZoneSource`]: Enumerate zones and export their record sets as text
//! - [`Notifier`]: Deliver change notifications

pub mod notifier;
pub mod object_store;
pub mod zone_source;

pub use notifier::Notifier;
pub use object_store::ObjectStore;
pub use zone_source::{ZoneInfo, ZoneSource};
