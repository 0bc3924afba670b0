// # Zone Source Trait
//
// Defines the interface for the DNS-provider collaborator: the zone
// directory (which zones exist) and the zone exporter (a zone's current
// record set as master-file text).
//
// ## Implementations
//
// - Filesystem: `zonesnap-zone-fs` crate (a directory of `*.zone` files)
// - Future: Route53, Cloudflare, any provider with a zone-export API
//
// ## Contract
//
// Exported text must follow standard zone-file grammar so that
// `zonesnap_core::zone::parse` can canonicalize it. Implementations are
// single-shot and stateless: no retries, no caching. A failed export is
// returned as an error and the engine surfaces it.

use async_trait::async_trait;

/// One zone as reported by the provider's directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneInfo {
    /// Zone name (e.g. "example.com."; provider conventions vary on the
    /// trailing dot and the configured filter tolerates both)
    pub name: String,
    /// Provider-specific zone identifier
    pub id: String,
}

impl ZoneInfo {
    /// Create a new zone descriptor
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// Trait for zone directory + export implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait ZoneSource: Send + Sync {
    /// List the zones this source knows about
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<ZoneInfo>)`: All zones, in no particular order
    /// - `Err(Error)`: Provider error
    async fn list_zones(&self) -> Result<Vec<ZoneInfo>, crate::Error>;

    /// Export a zone's current record set as zone-file text
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The textual record definition
    /// - `Err(Error)`: Provider error
    async fn export_zone(&self, zone: &ZoneInfo) -> Result<String, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
