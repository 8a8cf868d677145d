//! Image host client for avatar and product photo storage.
//!
//! Clients submit images as base64 data URLs; this client forwards them to
//! the external image host and stores only the returned reference
//! (`public_id` plus serving URL) in the database.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ImageHostConfig;
use crate::models::ImageRef;

/// Upload/delete requests fail rather than hang.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when interacting with the image host.
#[derive(Debug, Error)]
pub enum MediaError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Upload response from the image host.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

/// Client for the external image hosting service.
#[derive(Clone)]
pub struct ImageHostClient {
    client: reqwest::Client,
    base_url: String,
}

impl ImageHostClient {
    /// Create a new image host client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ImageHostConfig) -> Result<Self, MediaError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| MediaError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Upload a base64 data URL image into a folder on the host.
    ///
    /// # Errors
    ///
    /// Returns error if the upload fails or the response cannot be parsed.
    pub async fn upload(&self, data_url: &str, folder: &str) -> Result<ImageRef, MediaError> {
        let url = format!("{}/upload", self.base_url);

        let body = serde_json::json!({
            "file": data_url,
            "folder": folder,
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MediaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Parse(e.to_string()))?;

        Ok(ImageRef {
            public_id: uploaded.public_id,
            url: uploaded.secure_url,
        })
    }

    /// Delete an image from the host by its public ID.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    pub async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        let url = format!("{}/destroy", self.base_url);

        let body = serde_json::json!({
            "public_id": public_id,
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MediaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
