use async_trait::async_trait;
use aws_sdk_kms::error::DisplayErrorContext;
use aws_sdk_kms::primitives::Blob;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::{error, info, instrument};

use crate::error::{RaceResultsError, Result};

/// Turns ciphertext into plaintext. KMS in production.
#[async_trait]
pub trait Decryptor: Send + Sync {
    async fn decrypt(&self, ciphertext: Vec<u8>) -> Result<String>;
}

/// AWS KMS backed decryptor.
#[derive(Debug, Clone)]
pub struct KmsDecryptor {
    client: aws_sdk_kms::Client,
}

impl KmsDecryptor {
    /// Build a KMS client from the Lambda's ambient AWS configuration.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self { client: aws_sdk_kms::Client::new(&config) }
    }
}

#[async_trait]
impl Decryptor for KmsDecryptor {
    async fn decrypt(&self, ciphertext: Vec<u8>) -> Result<String> {
        let output = self
            .client
            .decrypt()
            .ciphertext_blob(Blob::new(ciphertext))
            .send()
            .await
            .map_err(|e| {
                let msg = DisplayErrorContext(&e).to_string();
                error!(error = %msg, "KMS decrypt call failed");
                RaceResultsError::Decrypt(msg)
            })?;
        let plaintext = output
            .plaintext()
            .ok_or_else(|| RaceResultsError::Decrypt("KMS returned no plaintext".to_string()))?;
        String::from_utf8(plaintext.as_ref().to_vec()).map_err(|e| {
            RaceResultsError::Configuration(format!("Decrypted secret is not UTF-8: {}", e))
        })
    }
}

/// Resolve an optional base64 KMS ciphertext to its plaintext.
///
/// Absent or empty input is `None` and never reaches the decryptor. Any failure past
/// that point is an error: a broken secret is not the same as no secret.
#[instrument(level = "info", skip(decryptor, secret), fields(present = secret.is_some_and(|s| !s.is_empty())))]
pub async fn resolve_secret(decryptor: &dyn Decryptor, secret: Option<&str>) -> Result<Option<String>> {
    let encoded = match secret.map(str::trim).filter(|s| !s.is_empty()) {
        Some(encoded) => encoded,
        None => return Ok(None),
    };
    let ciphertext = STANDARD.decode(encoded).map_err(|e| {
        RaceResultsError::Configuration(format!("Encrypted secret is not valid base64: {}", e))
    })?;
    let plaintext = decryptor.decrypt(ciphertext).await?;
    info!("Resolved encrypted secret");
    Ok(Some(plaintext))
}
