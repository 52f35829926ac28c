use once_cell::sync::Lazy;
use std::time::Duration;

use crate::storage::{S3Addressing, StorageSettings};

/// Address the HTTP server should bind to. Defaults to `0.0.0.0`.
pub static BIND_ADDRESS: Lazy<String> =
    Lazy::new(|| std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string()));

/// Port the HTTP server should listen on. Defaults to `3000`.
pub static BIND_PORT: Lazy<u16> = Lazy::new(|| {
    std::env::var("BIND_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3000)
});

/// Upper bound on a single outbound call to the object store.
pub static S3_REQUEST_TIMEOUT: Lazy<Duration> = Lazy::new(|| {
    let secs = std::env::var("S3_REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(10);
    Duration::from_secs(secs)
});

/// When enabled, the signer confirms each candidate key exists with a presigned `HEAD`
/// before handing out a URL. Defaults to `true`.
pub static S3_VERIFY_OBJECTS: Lazy<bool> =
    Lazy::new(|| read_bool_env("S3_VERIFY_OBJECTS").unwrap_or(true));

/// Region used by the legacy single-key route when `AWS_REGION` is unset.
pub const LEGACY_DEFAULT_REGION: &str = "ap-south-1";

fn read_optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn read_bool_env(key: &str) -> Option<bool> {
    read_optional_env(key).map(|value| {
        let normalized = value.to_ascii_lowercase();
        matches!(normalized.as_str(), "1" | "true" | "yes")
    })
}

/// Snapshot of the storage-related environment. Read on every request so that a
/// redeployed secret is picked up without a restart.
pub fn storage_settings_from_env() -> StorageSettings {
    StorageSettings {
        bucket_name: read_optional_env("AWS_S3_BUCKET_NAME")
            .or_else(|| read_optional_env("S3_BUCKET_NAME")),
        region: read_optional_env("AWS_REGION"),
        access_key_id: read_optional_env("AWS_ACCESS_KEY_ID"),
        secret_access_key: read_optional_env("AWS_SECRET_ACCESS_KEY"),
        session_token: read_optional_env("AWS_SESSION_TOKEN"),
    }
}

/// Where request handlers get storage settings from.
#[derive(Debug, Clone)]
pub enum SettingsSource {
    /// Re-read the process environment on every call.
    Environment,
    /// A fixed snapshot, used by tests and embedders.
    Fixed(StorageSettings),
}

impl SettingsSource {
    pub fn load(&self) -> StorageSettings {
        match self {
            SettingsSource::Environment => storage_settings_from_env(),
            SettingsSource::Fixed(settings) => settings.clone(),
        }
    }
}

/// Endpoint addressing for the S3 signer. A custom `S3_ENDPOINT` switches to path-style
/// addressing unless `S3_FORCE_PATH_STYLE` says otherwise.
pub fn s3_addressing_from_env() -> anyhow::Result<S3Addressing> {
    let Some(raw) = read_optional_env("S3_ENDPOINT") else {
        return Ok(S3Addressing::default());
    };
    let endpoint = url::Url::parse(&raw)
        .map_err(|err| anyhow::anyhow!("invalid S3_ENDPOINT '{raw}': {err}"))?;
    let path_style = read_bool_env("S3_FORCE_PATH_STYLE").unwrap_or(true);
    Ok(S3Addressing {
        endpoint: Some(endpoint),
        path_style,
    })
}
