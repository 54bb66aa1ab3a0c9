use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use image::ImageFormat;
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::food::nutrition::PhotoAnalysisResult;
use crate::providers::traits::{GenerativeProvider, ProviderError};

#[derive(Error, Debug)]
pub enum PhotoAnalysisError {
    #[error("No photo captured")]
    NoPhoto,
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("Failed to read photo: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid base64 image data: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("Could not analyze the dish: {0}")]
    Provider(#[from] ProviderError),
}

/// Media type from the image's magic bytes, falling back to the file extension.
pub fn sniff_media_type(bytes: &[u8], path: Option<&Path>) -> Option<&'static str> {
    let guessed = image::guess_format(bytes).ok().and_then(|format| match format {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Bmp => Some("image/bmp"),
        _ => None,
    });
    if guessed.is_some() {
        return guessed;
    }

    let extension = path?.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    pub bytes: Vec<u8>,
    pub media_type: String,
    pub captured_at: DateTime<Utc>,
}

impl CapturedPhoto {
    pub fn new(bytes: Vec<u8>, media_type: &str) -> Result<Self, PhotoAnalysisError> {
        let media_type = media_type.trim().to_lowercase();
        if !media_type.starts_with("image/") {
            return Err(PhotoAnalysisError::UnsupportedMediaType(media_type));
        }
        if bytes.is_empty() {
            return Err(PhotoAnalysisError::NoPhoto);
        }
        Ok(Self {
            bytes,
            media_type,
            captured_at: Utc::now(),
        })
    }

    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PhotoAnalysisError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let media_type = sniff_media_type(&bytes, Some(path))
            .ok_or_else(|| PhotoAnalysisError::UnsupportedMediaType(path.display().to_string()))?;
        Self::new(bytes, media_type)
    }

    pub fn from_base64(media_type: &str, data: &str) -> Result<Self, PhotoAnalysisError> {
        let bytes = STANDARD.decode(data.trim())?;
        Self::new(bytes, media_type)
    }
}

/// Sends one photo to the provider. Independent of the enrichment quota flag.
pub async fn analyze_photo(
    provider: &dyn GenerativeProvider,
    photo: &CapturedPhoto,
) -> Result<PhotoAnalysisResult, PhotoAnalysisError> {
    match provider.analyze_photo(&photo.bytes, &photo.media_type).await {
        Ok(result) => {
            info!("Analyzed photo as {}", result.dish_name);
            Ok(result)
        }
        Err(e) => {
            warn!("Error analyzing photo: {}", e);
            Err(e.into())
        }
    }
}

/// The captured photo and its most recent analysis.
pub struct PhotoSession {
    provider: Arc<dyn GenerativeProvider>,
    captured: Option<CapturedPhoto>,
    result: Option<PhotoAnalysisResult>,
}

impl PhotoSession {
    pub fn new(provider: Arc<dyn GenerativeProvider>) -> Self {
        Self {
            provider,
            captured: None,
            result: None,
        }
    }

    /// Replaces the current photo and drops any earlier result.
    pub fn capture(&mut self, photo: CapturedPhoto) {
        self.captured = Some(photo);
        self.result = None;
    }

    pub fn clear(&mut self) {
        self.captured = None;
        self.result = None;
    }

    pub fn captured(&self) -> Option<&CapturedPhoto> {
        self.captured.as_ref()
    }

    pub fn result(&self) -> Option<&PhotoAnalysisResult> {
        self.result.as_ref()
    }

    pub async fn submit(&mut self) -> Result<&PhotoAnalysisResult, PhotoAnalysisError> {
        let photo = self.captured.as_ref().ok_or(PhotoAnalysisError::NoPhoto)?;
        let result = analyze_photo(self.provider.as_ref(), photo).await?;
        Ok(self.result.insert(result))
    }
}
