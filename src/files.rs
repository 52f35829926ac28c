use axum::{
    extract::{Extension, RawQuery},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::config::{SettingsSource, LEGACY_DEFAULT_REGION};
use crate::error::{KycUrlError, ResolveError};
use crate::resolver::{presign_exact_key, resolve_signed_url};
use crate::storage::ObjectSigner;

/// First `key` parameter of the query string. Later repeats are ignored.
pub fn first_key(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(name, _)| name == "key")
        .map(|(_, value)| value.into_owned())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlResponse {
    pub success: bool,
    pub url: String,
    pub expires_in: u64,
}

#[derive(Debug, Serialize)]
pub struct KycUrlResponse {
    pub url: String,
}

/// Presigned URL for a document key, trying known folder prefixes when the key as given
/// does not resolve.
pub async fn signed_url(
    Extension(signer): Extension<Arc<dyn ObjectSigner>>,
    Extension(settings): Extension<SettingsSource>,
    RawQuery(query): RawQuery,
) -> Result<Json<SignedUrlResponse>, ResolveError> {
    let settings = settings.load();
    let key = first_key(query.as_deref());
    let resolved = resolve_signed_url(signer.as_ref(), &settings, key.as_deref()).await?;
    Ok(Json(SignedUrlResponse {
        success: true,
        url: resolved.url,
        expires_in: resolved.expires_in_seconds,
    }))
}

pub async fn kyc_url(
    Extension(signer): Extension<Arc<dyn ObjectSigner>>,
    Extension(settings): Extension<SettingsSource>,
    RawQuery(query): RawQuery,
) -> Result<Json<KycUrlResponse>, KycUrlError> {
    let settings = settings.load().with_default_region(LEGACY_DEFAULT_REGION);
    let key = first_key(query.as_deref());
    let url = presign_exact_key(signer.as_ref(), &settings, key.as_deref()).await?;
    Ok(Json(KycUrlResponse { url }))
}

pub async fn method_not_allowed() -> ResolveError {
    ResolveError::MethodNotAllowed
}
