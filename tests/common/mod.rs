#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use recipe_enricher::cache::ImageReference;
use recipe_enricher::database::MemoryStore;
use recipe_enricher::food::nutrition::{HealthLabel, NutritionEstimate, PhotoAnalysisResult};
use recipe_enricher::food::recipes::{Recipe, RecipeStore};
use recipe_enricher::providers::traits::{GenerativeProvider, ImageRequest, NutritionRequest, ProviderError};
use recipe_enricher::{AppContext, EnrichmentConfig};

pub fn recipe(id: &str) -> Recipe {
    Recipe {
        id: id.to_string(),
        category: "lunch".to_string(),
        title: title(id),
        ingredients: vec!["rice".to_string(), "chicken".to_string()],
        steps: vec!["Cook.".to_string()],
        image_file: format!("{}.jpg", id),
        source_page: 1,
    }
}

pub fn title(id: &str) -> String {
    format!("Recipe {}", id)
}

pub fn store_of(ids: &[&str]) -> RecipeStore {
    RecipeStore::new(ids.iter().map(|id| recipe(id)).collect()).unwrap()
}

pub fn estimate(calories: f64) -> NutritionEstimate {
    NutritionEstimate {
        calories_kcal: Some(calories),
        protein_g: Some(30.0),
        carbs_g: Some(45.0),
        fat_g: Some(12.0),
        health_score_0_10: 7.0,
        health_label: HealthLabel::Favorable,
        notes_short: "Balanced plate".to_string(),
    }
}

struct Failure {
    error: ProviderError,
    remaining: usize,
}

/// Fake provider that records every call by recipe title.
#[derive(Default)]
pub struct ScriptedProvider {
    latency: Duration,
    nutrition_failures: Mutex<HashMap<String, Failure>>,
    image_failures: Mutex<HashMap<String, Failure>>,
    photo: Mutex<Option<Result<PhotoAnalysisResult, ProviderError>>>,
    pub nutrition_calls: Mutex<Vec<String>>,
    pub image_calls: Mutex<Vec<String>>,
    pub photo_calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn fail_nutrition(self, id: &str, error: ProviderError, times: usize) -> Self {
        self.nutrition_failures
            .lock()
            .insert(title(id), Failure { error, remaining: times });
        self
    }

    pub fn fail_image(self, id: &str, error: ProviderError) -> Self {
        self.image_failures
            .lock()
            .insert(title(id), Failure { error, remaining: usize::MAX });
        self
    }

    pub fn with_photo(self, result: Result<PhotoAnalysisResult, ProviderError>) -> Self {
        *self.photo.lock() = Some(result);
        self
    }

    pub fn nutrition_calls(&self) -> Vec<String> {
        self.nutrition_calls.lock().clone()
    }

    pub fn image_calls(&self) -> Vec<String> {
        self.image_calls.lock().clone()
    }

    async fn delay(&self) {
        if self.latency.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn scripted_failure(failures: &Mutex<HashMap<String, Failure>>, title: &str) -> Option<ProviderError> {
        let mut failures = failures.lock();
        let failure = failures.get_mut(title)?;
        if failure.remaining == 0 {
            return None;
        }
        failure.remaining -= 1;
        Some(failure.error.clone())
    }
}

#[async_trait]
impl GenerativeProvider for ScriptedProvider {
    async fn estimate_nutrition(
        &self,
        request: NutritionRequest<'_>,
    ) -> Result<NutritionEstimate, ProviderError> {
        self.nutrition_calls.lock().push(request.title.to_string());
        self.delay().await;
        match Self::scripted_failure(&self.nutrition_failures, request.title) {
            Some(error) => Err(error),
            None => Ok(estimate(100.0 * request.ingredients.len() as f64)),
        }
    }

    async fn generate_image(&self, request: ImageRequest<'_>) -> Result<ImageReference, ProviderError> {
        self.image_calls.lock().push(request.title.to_string());
        self.delay().await;
        match Self::scripted_failure(&self.image_failures, request.title) {
            Some(error) => Err(error),
            None => Ok(ImageReference::from_base64("image/png", "iVBORw0KGgo=")),
        }
    }

    async fn analyze_photo(
        &self,
        _image: &[u8],
        media_type: &str,
    ) -> Result<PhotoAnalysisResult, ProviderError> {
        self.photo_calls.lock().push(media_type.to_string());
        self.delay().await;
        self.photo
            .lock()
            .clone()
            .unwrap_or(Err(ProviderError::EmptyResponse))
    }

    fn model_info(&self) -> String {
        "scripted".to_string()
    }
}

pub async fn context(
    ids: &[&str],
    provider: Arc<ScriptedProvider>,
    store: MemoryStore,
) -> AppContext {
    context_with_config(ids, provider, store, EnrichmentConfig::without_delays()).await
}

pub async fn context_with_config(
    ids: &[&str],
    provider: Arc<ScriptedProvider>,
    store: MemoryStore,
    config: EnrichmentConfig,
) -> AppContext {
    AppContext::new(store_of(ids), Arc::new(store), provider, config).await
}
