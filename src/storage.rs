use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub mod presign;
pub mod s3;

pub use s3::S3Signer;

/// Validated credentials for a single signing operation.
#[derive(Clone, PartialEq, Eq)]
pub struct StorageCredentials {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for StorageCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageCredentials")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("bucket_name", &self.bucket_name)
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Raw storage configuration as found in the process environment. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageSettings {
    pub bucket_name: Option<String>,
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("S3 bucket configuration is missing")]
    MissingBucket,
    #[error("AWS credentials are missing")]
    MissingCredentials { missing: Vec<&'static str> },
}

impl StorageSettings {
    /// Fill in the region when the environment does not provide one.
    pub fn with_default_region(mut self, region: &str) -> Self {
        if self.region.is_none() {
            self.region = Some(region.to_string());
        }
        self
    }

    /// Validate that everything needed for signing is present. The bucket is checked
    /// before the credential triple.
    pub fn credentials(&self) -> Result<StorageCredentials, ConfigurationError> {
        let bucket_name = present(&self.bucket_name).ok_or(ConfigurationError::MissingBucket)?;

        let region = present(&self.region);
        let access_key_id = present(&self.access_key_id);
        let secret_access_key = present(&self.secret_access_key);
        match (region, access_key_id, secret_access_key) {
            (Some(region), Some(access_key_id), Some(secret_access_key)) => {
                Ok(StorageCredentials {
                    region,
                    access_key_id,
                    secret_access_key,
                    bucket_name,
                    session_token: present(&self.session_token),
                })
            }
            (region, access_key_id, secret_access_key) => {
                let mut missing = Vec::new();
                if region.is_none() {
                    missing.push("AWS_REGION");
                }
                if access_key_id.is_none() {
                    missing.push("AWS_ACCESS_KEY_ID");
                }
                if secret_access_key.is_none() {
                    missing.push("AWS_SECRET_ACCESS_KEY");
                }
                Err(ConfigurationError::MissingCredentials { missing })
            }
        }
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("object `{key}` does not exist")]
    ObjectMissing { key: String },
    #[error("access denied for object `{key}`")]
    AccessDenied { key: String },
    #[error("object store answered {status} for `{key}`")]
    UnexpectedStatus { key: String, status: u16 },
    #[error("invalid object URL: {0}")]
    InvalidUrl(String),
    #[error("object store request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Produces a presigned `GET` URL for a single object key.
///
/// Implementations must fail when the key cannot be served, so callers can move on to
/// the next candidate spelling.
#[async_trait]
pub trait ObjectSigner: Send + Sync {
    async fn presign_get(
        &self,
        credentials: &StorageCredentials,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, SigningError>;

    /// Sign without confirming the object can be served.
    async fn presign_get_unverified(
        &self,
        credentials: &StorageCredentials,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, SigningError> {
        self.presign_get(credentials, key, expires_in).await
    }
}

/// How object URLs are addressed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct S3Addressing {
    /// Custom endpoint such as a MinIO deployment. `None` means AWS.
    pub endpoint: Option<url::Url>,
    /// `{endpoint}/{bucket}/{key}` instead of `{bucket}.{host}/{key}`.
    pub path_style: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_settings() -> StorageSettings {
        StorageSettings {
            bucket_name: Some("kyc-docs".into()),
            region: Some("ap-south-1".into()),
            access_key_id: Some("AKIDEXAMPLE".into()),
            secret_access_key: Some("secret".into()),
            session_token: None,
        }
    }

    #[test]
    fn complete_settings_validate() {
        let credentials = full_settings().credentials().unwrap();
        assert_eq!(credentials.bucket_name, "kyc-docs");
        assert_eq!(credentials.region, "ap-south-1");
        assert!(credentials.session_token.is_none());
    }

    #[test]
    fn missing_bucket_is_reported_first() {
        let settings = StorageSettings {
            bucket_name: None,
            region: None,
            ..full_settings()
        };
        assert_eq!(
            settings.credentials().unwrap_err(),
            ConfigurationError::MissingBucket
        );
    }

    #[test]
    fn missing_credentials_are_listed() {
        let settings = StorageSettings {
            access_key_id: Some("  ".into()),
            secret_access_key: None,
            ..full_settings()
        };
        assert_eq!(
            settings.credentials().unwrap_err(),
            ConfigurationError::MissingCredentials {
                missing: vec!["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY"]
            }
        );
    }

    #[test]
    fn default_region_only_fills_gaps() {
        let settings = StorageSettings {
            region: None,
            ..full_settings()
        }
        .with_default_region("us-east-1");
        assert_eq!(settings.region.as_deref(), Some("us-east-1"));

        let settings = full_settings().with_default_region("us-east-1");
        assert_eq!(settings.region.as_deref(), Some("ap-south-1"));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let credentials = full_settings().credentials().unwrap();
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("secret\""));
        assert!(rendered.contains("<redacted>"));
    }
}
