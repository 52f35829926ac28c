use axum::{routing::get, Extension, Router};
use std::sync::Arc;

use crate::config::SettingsSource;
use crate::files;
use crate::storage::ObjectSigner;

pub const SIGNED_URL_PATH: &str = "/api/files/signed-url";
pub const KYC_URL_PATH: &str = "/api/kyc-url";

pub fn api_routes() -> Router {
    Router::new()
        .route(
            SIGNED_URL_PATH,
            get(files::signed_url).fallback(files::method_not_allowed),
        )
        .route(
            KYC_URL_PATH,
            get(files::kyc_url).fallback(files::method_not_allowed),
        )
}

/// API routes with the signer and settings source attached.
pub fn document_routes(signer: Arc<dyn ObjectSigner>, settings: SettingsSource) -> Router {
    api_routes()
        .layer(Extension(signer))
        .layer(Extension(settings))
}
