//! Tesseract CLI provider.

use super::{OcrError, TextRecognizer, UploadedImage};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct TesseractConfig {
    pub binary: String,
    pub lang: String,
    pub timeout: Duration,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            lang: "kor+eng".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Clone)]
pub struct TesseractProvider {
    config: TesseractConfig,
}

impl TesseractProvider {
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }

    async fn run(&self, input: &Path) -> Result<String, OcrError> {
        let input = input.to_string_lossy();
        let args = [input.as_ref(), "stdout", "-l", self.config.lang.as_str()];

        let mut cmd = Command::new(&self.config.binary);
        cmd.args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(
            program = %self.config.binary,
            args = ?args,
            timeout_secs = %self.config.timeout.as_secs(),
            "Executing tesseract"
        );

        let output = tokio::time::timeout(self.config.timeout, cmd.output())
            .await
            .map_err(|_| OcrError::Timeout(self.config.timeout.as_secs()))?
            .map_err(|e| OcrError::Engine(format!("Failed to run {}: {}", self.config.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(stderr = %stderr, "Tesseract failed");
            return Err(OcrError::Engine(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl TextRecognizer for TesseractProvider {
    #[tracing::instrument(skip(self, image), fields(filename = %image.filename, size = image.bytes.len()))]
    async fn recognize_text(&self, image: &UploadedImage) -> Result<String, OcrError> {
        let path = std::env::temp_dir().join(format!("ocr-{}", Uuid::new_v4()));
        tokio::fs::write(&path, &image.bytes).await?;

        let result = self.run(&path).await;

        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove temp file");
        }

        result
    }

    fn provider_name(&self) -> &'static str {
        "tesseract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_an_engine_error() {
        let provider = TesseractProvider::new(TesseractConfig {
            binary: "/nonexistent/tesseract-binary".to_string(),
            ..TesseractConfig::default()
        });
        let image = UploadedImage {
            bytes: vec![1, 2, 3],
            filename: "label.png".to_string(),
            content_type: "image/png".to_string(),
        };

        let err = provider.recognize_text(&image).await.unwrap_err();
        assert!(matches!(err, OcrError::Engine(_)));
    }
}
