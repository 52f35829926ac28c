pub mod config;
pub mod error;
pub mod files;
pub mod resolver;
pub mod routes;
pub mod storage;

pub use config::SettingsSource;
pub use error::{KycUrlError, ResolveError};
pub use resolver::{key_candidates, resolve_signed_url, SignedUrlResult, SIGNED_URL_EXPIRY};
pub use routes::document_routes;
pub use storage::{ObjectSigner, S3Signer, SigningError, StorageCredentials, StorageSettings};
