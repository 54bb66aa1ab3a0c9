use std::sync::Arc;

use crate::cache::{ImageCache, NutritionCache};
use crate::database::KeyValueStore;
use crate::enrichment::{EnrichmentConfig, EnrichmentSession, Enricher};
use crate::food::recipes::RecipeStore;
use crate::providers::traits::GenerativeProvider;

/// Shared handles for the CLI, the API and the enrichment worker.
#[derive(Clone)]
pub struct AppContext {
    pub recipes: Arc<RecipeStore>,
    pub nutrition: Arc<NutritionCache>,
    pub images: Arc<ImageCache>,
    pub provider: Arc<dyn GenerativeProvider>,
    pub enricher: Arc<Enricher>,
}

impl AppContext {
    pub async fn new(
        recipes: RecipeStore,
        store: Arc<dyn KeyValueStore>,
        provider: Arc<dyn GenerativeProvider>,
        config: EnrichmentConfig,
    ) -> Self {
        let recipes = Arc::new(recipes);
        let nutrition = Arc::new(NutritionCache::restore(store).await);
        let images = Arc::new(ImageCache::new());
        let enricher = Arc::new(Enricher::new(
            Arc::clone(&recipes),
            Arc::clone(&provider),
            Arc::clone(&nutrition),
            Arc::clone(&images),
            Arc::new(EnrichmentSession::new()),
            config,
        ));

        Self {
            recipes,
            nutrition,
            images,
            provider,
            enricher,
        }
    }

    pub fn quota_exceeded(&self) -> bool {
        self.enricher.session().quota_exceeded()
    }
}
