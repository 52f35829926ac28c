use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use std::time::Duration;

use super::presign::{presign_url, PresignRequest};
use super::{ObjectSigner, S3Addressing, SigningError, StorageCredentials};

/// Presigns S3 object URLs and, unless disabled, confirms the object is readable first.
pub struct S3Signer {
    client: reqwest::Client,
    addressing: S3Addressing,
    verify_objects: bool,
}

impl S3Signer {
    pub fn new(addressing: S3Addressing, verify_objects: bool, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build object store client")?;
        Ok(Self {
            client,
            addressing,
            verify_objects,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(
            crate::config::s3_addressing_from_env()?,
            *crate::config::S3_VERIFY_OBJECTS,
            *crate::config::S3_REQUEST_TIMEOUT,
        )
    }

    async fn ensure_readable(
        &self,
        credentials: &StorageCredentials,
        key: &str,
        expires_in: Duration,
    ) -> Result<(), SigningError> {
        let head_url = presign_url(
            &self.addressing,
            &PresignRequest {
                method: "HEAD",
                credentials,
                key,
                expires_in,
                signed_at: Utc::now(),
            },
        )?;
        let response = self.client.head(head_url).send().await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(SigningError::ObjectMissing {
                key: key.to_string(),
            }),
            StatusCode::FORBIDDEN => Err(SigningError::AccessDenied {
                key: key.to_string(),
            }),
            status => Err(SigningError::UnexpectedStatus {
                key: key.to_string(),
                status: status.as_u16(),
            }),
        }
    }
}

#[async_trait]
impl ObjectSigner for S3Signer {
    async fn presign_get(
        &self,
        credentials: &StorageCredentials,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, SigningError> {
        if self.verify_objects {
            self.ensure_readable(credentials, key, expires_in).await?;
        }
        self.presign_get_unverified(credentials, key, expires_in)
            .await
    }

    async fn presign_get_unverified(
        &self,
        credentials: &StorageCredentials,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, SigningError> {
        presign_url(
            &self.addressing,
            &PresignRequest {
                method: "GET",
                credentials,
                key,
                expires_in,
                signed_at: Utc::now(),
            },
        )
    }
}
