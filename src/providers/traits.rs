use async_trait::async_trait;
use thiserror::Error;

use crate::cache::image::ImageReference;
use crate::food::nutrition::{NutritionEstimate, PhotoAnalysisResult};
use crate::food::recipes::Recipe;
use crate::providers::utils::is_quota_indicator;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Provider quota exceeded: {0}")]
    QuotaExceeded(String),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("API request failed: Status {status}, Body: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid response format: {0}")]
    MalformedResponse(String),
    #[error("Provider returned no content")]
    EmptyResponse,
    #[error("API key not configured")]
    MissingApiKey,
}

impl ProviderError {
    /// Builds a transport-level error, promoting it to `QuotaExceeded` when
    /// the description carries a rate-limit indicator.
    pub fn from_description(description: impl Into<String>) -> Self {
        let description = description.into();
        if is_quota_indicator(&description) {
            ProviderError::QuotaExceeded(description)
        } else {
            ProviderError::Request(description)
        }
    }

    pub fn from_status(status: u16, body: String) -> Self {
        if status == 429 || is_quota_indicator(&body) {
            ProviderError::QuotaExceeded(format!("Status {}: {}", status, body))
        } else {
            ProviderError::Status { status, body }
        }
    }

    pub fn is_quota(&self) -> bool {
        matches!(self, ProviderError::QuotaExceeded(_))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NutritionRequest<'a> {
    pub title: &'a str,
    pub ingredients: &'a [String],
    pub steps: Option<&'a [String]>,
}

impl<'a> From<&'a Recipe> for NutritionRequest<'a> {
    fn from(recipe: &'a Recipe) -> Self {
        Self {
            title: &recipe.title,
            ingredients: &recipe.ingredients,
            steps: Some(&recipe.steps),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ImageRequest<'a> {
    pub title: &'a str,
    pub category_label: &'a str,
    pub ingredients: &'a [String],
}

impl<'a> From<&'a Recipe> for ImageRequest<'a> {
    fn from(recipe: &'a Recipe) -> Self {
        Self {
            title: &recipe.title,
            category_label: recipe.category_label(),
            ingredients: &recipe.ingredients,
        }
    }
}

/// Hosted generative model used for estimates, images and photo analysis.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    async fn estimate_nutrition(
        &self,
        request: NutritionRequest<'_>,
    ) -> Result<NutritionEstimate, ProviderError>;

    async fn generate_image(&self, request: ImageRequest<'_>) -> Result<ImageReference, ProviderError>;

    async fn analyze_photo(
        &self,
        image: &[u8],
        media_type: &str,
    ) -> Result<PhotoAnalysisResult, ProviderError>;

    fn model_info(&self) -> String;
}
