use std::path::PathBuf;
use std::time::Duration;

use crate::config::UploadConfig;
use crate::error::{AtelierError, Result};

/// Output of the camera capture pipeline, which lives outside this crate.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub byte_size: u64,
}

/// Uploads captured JPEG photos to the configured backend endpoint.
pub struct ImageUploader {
    client: reqwest::Client,
    endpoint: String,
}

impl ImageUploader {
    pub fn from_config(config: &UploadConfig) -> Result<Self> {
        let endpoint = config.endpoint.as_deref().ok_or_else(|| {
            AtelierError::Config(
                "upload.endpoint is not configured; set it in config.toml".to_string(),
            )
        })?;

        // The request timeout doubles as the abort guard for uploads left
        // dangling by a dismissed screen.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Multipart form POST of the JPEG under the `file` part. A non-2xx
    /// response is a failure carrying whatever text the server returned.
    pub async fn upload(&self, image: &CapturedImage) -> Result<()> {
        tracing::debug!(
            "uploading {} ({}x{}, {} bytes)",
            image.path.display(),
            image.width,
            image.height,
            image.byte_size
        );

        let bytes = tokio::fs::read(&image.path)
            .await
            .map_err(|e| AtelierError::Upload(format!("failed to read capture file: {e}")))?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("photo.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| AtelierError::Upload(format!("invalid upload part: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AtelierError::Upload(format!("upload request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AtelierError::Upload(format!(
                "upload failed {status}: {text}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_requires_endpoint() {
        let config = UploadConfig {
            endpoint: None,
            timeout_secs: 30,
        };
        assert!(matches!(
            ImageUploader::from_config(&config),
            Err(AtelierError::Config(_))
        ));
    }

    #[test]
    fn from_config_keeps_endpoint_verbatim() {
        let config = UploadConfig {
            endpoint: Some("https://api.example.com/upload".into()),
            timeout_secs: 5,
        };
        let uploader = ImageUploader::from_config(&config).unwrap();
        assert_eq!(uploader.endpoint(), "https://api.example.com/upload");
    }

    #[tokio::test]
    async fn upload_fails_cleanly_on_missing_file() {
        let config = UploadConfig {
            endpoint: Some("https://api.example.com/upload".into()),
            timeout_secs: 5,
        };
        let uploader = ImageUploader::from_config(&config).unwrap();
        let image = CapturedImage {
            path: PathBuf::from("/definitely/not/here.jpg"),
            width: 100,
            height: 100,
            byte_size: 0,
        };
        let err = uploader.upload(&image).await.unwrap_err();
        assert!(matches!(err, AtelierError::Upload(_)));
    }
}
