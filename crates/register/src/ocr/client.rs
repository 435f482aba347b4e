//! HTTP client for the menu OCR service.

use std::path::Path;
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;

use crate::config::OcrConfig;

use super::error::OcrError;
use super::types::ScannedMenuItem;

/// Upload endpoint, relative to the configured base URL.
pub const UPLOAD_PATH: &str = "ocr/upload-image/";

const IMAGE_PART: &str = "image";
const IMAGE_FILE_NAME: &str = "image.jpg";
const IMAGE_MIME: &str = "image/jpeg";

/// Menu OCR client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct OcrClient {
    inner: Arc<OcrClientInner>,
}

struct OcrClientInner {
    client: reqwest::Client,
    upload_url: Url,
    api_key: Option<SecretString>,
}

impl OcrClient {
    /// Create a new OCR client.
    ///
    /// # Errors
    ///
    /// Returns `OcrError::InvalidUrl` if the upload URL cannot be derived from
    /// the base URL, or `OcrError::Http` if the HTTP client cannot be built.
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        let upload_url = config.base_url.join(UPLOAD_PATH)?;

        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(OcrClientInner {
                client,
                upload_url,
                api_key: config.api_key.clone(),
            }),
        })
    }

    /// Endpoint images are posted to.
    #[must_use]
    pub fn upload_url(&self) -> &Url {
        &self.inner.upload_url
    }

    /// Upload JPEG bytes and return the recognised dishes.
    ///
    /// # Errors
    ///
    /// Returns `OcrError::Http` on transport failure, `OcrError::Api` on a
    /// non-success status, and `OcrError::Parse` if the body is not a list of
    /// menu items.
    #[instrument(skip(self, image), fields(bytes = image.len(), url = %self.inner.upload_url))]
    pub async fn scan_image(&self, image: Vec<u8>) -> Result<Vec<ScannedMenuItem>, OcrError> {
        let part = Part::bytes(image)
            .file_name(IMAGE_FILE_NAME)
            .mime_str(IMAGE_MIME)?;
        let form = Form::new().part(IMAGE_PART, part);

        let mut request = self
            .inner
            .client
            .post(self.inner.upload_url.clone())
            .multipart(form);
        if let Some(key) = &self.inner.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await?;
        let items = Self::handle_response(response).await?;
        debug!(count = items.len(), "OCR scan complete");
        Ok(items)
    }

    /// Read an image file and upload it.
    ///
    /// # Errors
    ///
    /// Returns `OcrError::Io` if the file cannot be read, otherwise as
    /// [`OcrClient::scan_image`].
    pub async fn scan_file(&self, path: &Path) -> Result<Vec<ScannedMenuItem>, OcrError> {
        let image = tokio::fs::read(path).await?;
        self.scan_image(image).await
    }

    async fn handle_response(
        response: reqwest::Response,
    ) -> Result<Vec<ScannedMenuItem>, OcrError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body
            };
            return Err(OcrError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| OcrError::Parse(format!("Failed to parse response: {e}")))
    }
}
