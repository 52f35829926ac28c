use std::time::Duration;
use tracing::{error, info, warn};

use crate::error::{KycUrlError, ResolveError};
use crate::storage::{ObjectSigner, SigningError, StorageSettings};

/// Lifetime of every URL handed out by the resolver.
pub const SIGNED_URL_EXPIRY: Duration = Duration::from_secs(3600);

/// Folders tried, in order, after the key as given.
pub const KEY_PREFIXES: [&str; 2] = ["kyc/", "uploads/"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrlResult {
    pub url: String,
    pub expires_in_seconds: u64,
    /// The candidate spelling that resolved.
    pub key: String,
}

#[derive(Debug)]
pub struct ResolutionFailure {
    pub attempted_keys: Vec<String>,
    pub last_error: Option<SigningError>,
}

/// Ordered, de-duplicated spellings of `raw_key`. The key as given always comes first.
pub fn key_candidates(raw_key: &str) -> Vec<String> {
    let mut candidates = vec![raw_key.to_string()];
    for prefix in KEY_PREFIXES {
        let candidate = if raw_key.starts_with(prefix) {
            raw_key.to_string()
        } else {
            format!("{prefix}{raw_key}")
        };
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

pub async fn resolve_signed_url(
    signer: &dyn ObjectSigner,
    settings: &StorageSettings,
    raw_key: Option<&str>,
) -> Result<SignedUrlResult, ResolveError> {
    let raw_key = raw_key
        .filter(|key| !key.is_empty())
        .ok_or(ResolveError::InvalidRequest)?;
    let credentials = settings.credentials()?;

    let candidates = key_candidates(raw_key);
    let mut last_error = None;
    for candidate in &candidates {
        match signer
            .presign_get(&credentials, candidate, SIGNED_URL_EXPIRY)
            .await
        {
            Ok(url) => {
                info!(key = %candidate, "generated signed URL");
                return Ok(SignedUrlResult {
                    url,
                    expires_in_seconds: SIGNED_URL_EXPIRY.as_secs(),
                    key: candidate.clone(),
                });
            }
            Err(err) => {
                warn!(key = %candidate, error = %err, "failed to generate signed URL");
                last_error = Some(err);
            }
        }
    }

    error!(
        tried_keys = ?candidates,
        last_error = ?last_error.as_ref().map(ToString::to_string),
        "all key variations failed"
    );
    Err(ResolveError::NotFound(ResolutionFailure {
        attempted_keys: candidates,
        last_error,
    }))
}

/// Single attempt on the key exactly as given, used by the older KYC viewer route. The
/// object is not checked for existence.
pub async fn presign_exact_key(
    signer: &dyn ObjectSigner,
    settings: &StorageSettings,
    key: Option<&str>,
) -> Result<String, KycUrlError> {
    let key = key
        .filter(|key| !key.is_empty())
        .ok_or(KycUrlError::MissingKey)?;
    let credentials = settings.credentials()?;
    let url = signer
        .presign_get_unverified(&credentials, key, SIGNED_URL_EXPIRY)
        .await?;
    info!(%key, "generated signed URL without key fallback");
    Ok(url)
}
