// # zonesnapd - Zone Snapshot Daemon
//
// Thin integration layer: reads configuration from environment variables,
// initializes tracing and the runtime, wires the collaborators, and runs
// one backup cycle. All diff/retention logic lives in zonesnap-core.
//
// One invocation is one cycle; scheduling (cron, systemd timer, a cloud
// trigger) is external.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Run
// - `ZONESNAP_REGION`: Provider region for the run (required)
// - `ZONESNAP_POLICY`: Change policy, `structural` (default) or `raw`
// - `ZONESNAP_LOG_LEVEL`: trace|debug|info|warn|error (default: info)
//
// ### Artifact store
// - `ZONESNAP_BUCKET`: Bucket artifacts are written to (required)
// - `ZONESNAP_BUCKET_REGION`: Bucket region (default: ZONESNAP_REGION)
// - `ZONESNAP_STORE_ROOT`: Root directory of the filesystem object store
//   (default: ./zonesnap-store)
// - `ZONESNAP_KEY_PREFIX`: Artifact key prefix (default: r53)
//
// ### Zone selection
// - `ZONESNAP_ZONE_NAME`: Zone name to back up
// - `ZONESNAP_ZONE_ID`: Zone id to back up
//   (at least one of the two is required)
// - `ZONESNAP_ZONE_DIR`: Directory of *.zone files serving as the zone
//   source (default: ./zones)
//
// ### Notification
// - `ZONESNAP_EMAIL_SENDER`, `ZONESNAP_EMAIL_RECEIVER`: both set enables
//   notifications, both unset disables them; setting exactly one is a
//   configuration error
//
// ## Example
//
// ```bash
// export ZONESNAP_REGION=eu-west-1
// export ZONESNAP_BUCKET=zone-backups
// export ZONESNAP_ZONE_NAME=example.com
// export ZONESNAP_ZONE_DIR=/var/lib/zonesnap/zones
// export ZONESNAP_STORE_ROOT=/var/lib/zonesnap/store
//
// zonesnapd
// ```

use std::env;
use std::process::ExitCode;

use anyhow::Result;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;
use zonesnap_core::config::{
    BackupConfig, EngineConfig, NotificationConfig, StoreConfig, ZoneFilter,
};
use zonesnap_core::diff::ChangePolicy;
use zonesnap_core::{BackupEngine, FsObjectStore, LogNotifier};
use zonesnap_zone_fs::FsZoneSource;

/// Exit codes for different termination scenarios
///
/// - 0: Clean run (backups written or nothing to do)
/// - 1: Configuration error
/// - 2: Runtime error (collaborator failure mid-cycle)
#[derive(Debug, Clone, Copy)]
enum SnapExitCode {
    CleanRun = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<SnapExitCode> for ExitCode {
    fn from(code: SnapExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    region: String,
    bucket: String,
    bucket_region: Option<String>,
    zone_name: Option<String>,
    zone_id: Option<String>,
    email_sender: Option<String>,
    email_receiver: Option<String>,
    policy: String,
    key_prefix: Option<String>,
    store_root: String,
    zone_dir: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self {
            region: env::var("ZONESNAP_REGION").unwrap_or_default(),
            bucket: env::var("ZONESNAP_BUCKET").unwrap_or_default(),
            bucket_region: env::var("ZONESNAP_BUCKET_REGION").ok(),
            zone_name: env::var("ZONESNAP_ZONE_NAME").ok(),
            zone_id: env::var("ZONESNAP_ZONE_ID").ok(),
            email_sender: env::var("ZONESNAP_EMAIL_SENDER").ok(),
            email_receiver: env::var("ZONESNAP_EMAIL_RECEIVER").ok(),
            policy: env::var("ZONESNAP_POLICY").unwrap_or_else(|_| "structural".to_string()),
            key_prefix: env::var("ZONESNAP_KEY_PREFIX").ok(),
            store_root: env::var("ZONESNAP_STORE_ROOT")
                .unwrap_or_else(|_| "./zonesnap-store".to_string()),
            zone_dir: env::var("ZONESNAP_ZONE_DIR").unwrap_or_else(|_| "./zones".to_string()),
            log_level: env::var("ZONESNAP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Validate and convert into the engine's configuration value object
    ///
    /// All validation happens here, before any I/O. Field-level rules are
    /// re-checked by `BackupConfig::validate()` in the engine constructor;
    /// the checks unique to this boundary are the both-or-neither email
    /// rule and the policy/log-level enumerations.
    fn into_backup_config(self) -> Result<BackupConfig> {
        if self.region.is_empty() {
            anyhow::bail!(
                "ZONESNAP_REGION is required. Set it via: export ZONESNAP_REGION=eu-west-1"
            );
        }
        if self.bucket.is_empty() {
            anyhow::bail!(
                "ZONESNAP_BUCKET is required. Set it via: export ZONESNAP_BUCKET=zone-backups"
            );
        }

        let has_name = self.zone_name.as_deref().is_some_and(|v| !v.is_empty());
        let has_id = self.zone_id.as_deref().is_some_and(|v| !v.is_empty());
        if !has_name && !has_id {
            anyhow::bail!(
                "Either ZONESNAP_ZONE_NAME or ZONESNAP_ZONE_ID must be set to select a zone"
            );
        }

        let notification = match (self.email_sender, self.email_receiver) {
            (Some(sender), Some(receiver)) if !sender.is_empty() && !receiver.is_empty() => {
                Some(NotificationConfig { sender, receiver })
            }
            (None, None) => None,
            _ => anyhow::bail!(
                "ZONESNAP_EMAIL_SENDER and ZONESNAP_EMAIL_RECEIVER must be set together \
                (both present and non-empty) or not at all"
            ),
        };

        let policy = match self.policy.to_lowercase().as_str() {
            "structural" => ChangePolicy::Structural,
            "raw" | "raw_text" => ChangePolicy::RawText,
            other => anyhow::bail!(
                "ZONESNAP_POLICY '{}' is not valid. Valid policies: structural, raw",
                other
            ),
        };

        let mut engine = EngineConfig::default();
        if let Some(prefix) = self.key_prefix.filter(|p| !p.is_empty()) {
            engine.key_prefix = prefix;
        }

        Ok(BackupConfig {
            region: self.region,
            store: StoreConfig {
                bucket: self.bucket,
                region: self.bucket_region.filter(|r| !r.is_empty()),
            },
            zone: ZoneFilter {
                name: self.zone_name.filter(|v| !v.is_empty()),
                id: self.zone_id.filter(|v| !v.is_empty()),
            },
            notification,
            policy,
            engine,
        })
    }
}

fn main() -> ExitCode {
    let config = Config::from_env();

    // Initialize tracing before anything that might log
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SnapExitCode::ConfigError.into();
    }

    let store_root = config.store_root.clone();
    let zone_dir = config.zone_dir.clone();

    // Validate configuration (fatal before any I/O)
    let backup_config = match config.into_backup_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Configuration error: {}", e);
            return SnapExitCode::ConfigError.into();
        }
    };

    info!("Starting zonesnapd");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SnapExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run_cycle(backup_config, &store_root, &zone_dir).await {
            Ok(()) => {
                info!("Cycle complete");
                SnapExitCode::CleanRun
            }
            Err(e) => {
                error!("Cycle failed: {}", e);
                SnapExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Wire the collaborators and run one backup cycle
async fn run_cycle(config: BackupConfig, store_root: &str, zone_dir: &str) -> Result<()> {
    let store = FsObjectStore::new(store_root).await?;
    let zones = FsZoneSource::new(zone_dir)?;
    let notifier = LogNotifier::new();

    info!(
        store_root,
        zone_dir,
        bucket = %config.store.bucket,
        policy = ?config.policy,
        "collaborators wired"
    );

    let (engine, _events) = BackupEngine::new(
        Box::new(store),
        Box::new(zones),
        Box::new(notifier),
        config,
    )?;

    engine.run_cycle().await?;
    Ok(())
}
