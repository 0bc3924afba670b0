// # Filesystem Zone Source
//
// This crate provides a ZoneSource implementation backed by a local
// directory of zone files.
//
// ## Layout
//
// Each `<name>.zone` file in the directory is one zone: the zone name is
// the file stem, the zone id is the file name, and exporting the zone
// reads the file's contents. A directory of exports dropped there by a
// provider CLI (or by hand) becomes a snapshot-able zone directory.
//
// ## Constraints
//
// Like any ZoneSource, this implementation is single-shot and stateless:
// no caching, no retries, no watching for file changes. Each call reads
// the directory or file as it currently is, and errors propagate to the
// engine untouched.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use zonesnap_core::traits::{ZoneInfo, ZoneSource};
use zonesnap_core::{Error, Result};

/// File extension that marks a zone file
const ZONE_FILE_EXTENSION: &str = "zone";

/// Zone source reading zones from a directory of `*.zone` files
#[derive(Debug, Clone)]
pub struct FsZoneSource {
    dir: PathBuf,
}

impl FsZoneSource {
    /// Create a zone source over `dir`
    ///
    /// The directory must exist; an empty directory is a valid source with
    /// zero zones.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(Error::config(format!(
                "zone directory does not exist: {}",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }
}

#[async_trait]
impl ZoneSource for FsZoneSource {
    async fn list_zones(&self) -> Result<Vec<ZoneInfo>> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| Error::zone_source(format!("reading {}: {e}", self.dir.display())))?;

        let mut zones = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::zone_source(format!("reading {}: {e}", self.dir.display())))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ZONE_FILE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            zones.push(ZoneInfo::new(stem, file_name));
        }

        debug!(dir = %self.dir.display(), count = zones.len(), "listed zones");
        Ok(zones)
    }

    async fn export_zone(&self, zone: &ZoneInfo) -> Result<String> {
        // The id is the file name recorded at listing time.
        let path = self.dir.join(&zone.id);
        fs::read_to_string(&path)
            .await
            .map_err(|e| Error::zone_source(format!("reading zone file {}: {e}", path.display())))
    }

    fn source_name(&self) -> &'static str {
        "fs"
    }
}
