//! Image probing for multimodal chat uploads.

use image::ImageFormat;
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageProbeError {
    #[error("cannot identify image file: {0}")]
    UnknownFormat(String),

    #[error("failed to read image dimensions: {0}")]
    Decode(String),
}

/// Format and pixel dimensions of an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    /// Upper-case format name, e.g. `PNG`, `JPEG`.
    pub fn format_name(&self) -> String {
        format!("{:?}", self.format).to_uppercase()
    }

    pub fn mime_type(&self) -> &'static str {
        match self.format {
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Tiff => "image/tiff",
            _ => "image/jpeg",
        }
    }

    /// Note appended to the stored user message.
    pub fn describe(&self) -> String {
        format!(
            "\n[업로드된 이미지 정보: 크기 ({}, {}), 포맷 {}]\n",
            self.width,
            self.height,
            self.format_name()
        )
    }
}

/// Identify the image format from its magic bytes and read its dimensions
/// without decoding pixel data.
pub fn probe(bytes: &[u8]) -> Result<ImageInfo, ImageProbeError> {
    let reader = image::io::Reader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImageProbeError::UnknownFormat(e.to_string()))?;

    let format = reader
        .format()
        .ok_or_else(|| ImageProbeError::UnknownFormat("unrecognised signature".to_string()))?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ImageProbeError::Decode(e.to_string()))?;

    Ok(ImageInfo {
        format,
        width,
        height,
    })
}
