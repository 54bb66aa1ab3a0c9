use log::{debug, info, warn};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use super::inflight::InFlight;
use super::session::EnrichmentSession;
use crate::cache::{ImageCache, NutritionCache};
use crate::food::recipes::RecipeStore;
use crate::providers::traits::{GenerativeProvider, ImageRequest, NutritionRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentConfig {
    pub nutrition_delay_min: Duration,
    pub nutrition_delay_max: Duration,
    pub image_delay: Duration,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            nutrition_delay_min: Duration::from_millis(1500),
            nutrition_delay_max: Duration::from_millis(2500),
            image_delay: Duration::from_millis(500),
        }
    }
}

impl EnrichmentConfig {
    pub fn without_delays() -> Self {
        Self {
            nutrition_delay_min: Duration::ZERO,
            nutrition_delay_max: Duration::ZERO,
            image_delay: Duration::ZERO,
        }
    }

    fn nutrition_delay(&self) -> Duration {
        if self.nutrition_delay_max <= self.nutrition_delay_min {
            return self.nutrition_delay_min;
        }
        let min = self.nutrition_delay_min.as_millis() as u64;
        let max = self.nutrition_delay_max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub nutrition_attempted: usize,
    pub nutrition_added: usize,
    pub nutrition_failed: usize,
    pub images_attempted: usize,
    pub images_added: usize,
    pub images_failed: usize,
    pub quota_tripped: bool,
    pub cancelled: bool,
}

impl PassReport {
    /// Whether this pass altered anything a follow-up pass depends on.
    pub fn changed(&self) -> bool {
        self.nutrition_added > 0 || self.images_added > 0 || self.quota_tripped
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichmentStatus {
    pub quota_exceeded: bool,
    pub recipes: usize,
    pub nutrition_cached: usize,
    pub images_cached: usize,
    pub nutrition_pending: usize,
    pub images_pending: usize,
    pub in_flight: usize,
}

enum Flow {
    Continue,
    Abort,
}

/// Background filler for the nutrition and image caches.
///
/// Recipes are processed one at a time in store order; nutrition always runs
/// before images within a pass.
pub struct Enricher {
    recipes: Arc<RecipeStore>,
    provider: Arc<dyn GenerativeProvider>,
    nutrition: Arc<NutritionCache>,
    images: Arc<ImageCache>,
    session: Arc<EnrichmentSession>,
    config: EnrichmentConfig,
    nutrition_in_flight: InFlight,
    image_in_flight: InFlight,
    wake: Notify,
}

impl Enricher {
    pub fn new(
        recipes: Arc<RecipeStore>,
        provider: Arc<dyn GenerativeProvider>,
        nutrition: Arc<NutritionCache>,
        images: Arc<ImageCache>,
        session: Arc<EnrichmentSession>,
        config: EnrichmentConfig,
    ) -> Self {
        Self {
            recipes,
            provider,
            nutrition,
            images,
            session,
            config,
            nutrition_in_flight: InFlight::new(),
            image_in_flight: InFlight::new(),
            wake: Notify::new(),
        }
    }

    pub fn session(&self) -> &Arc<EnrichmentSession> {
        &self.session
    }

    /// One nutrition pass followed by one image pass.
    pub async fn run_pass(&self) -> PassReport {
        let mut report = PassReport::default();

        if !self.session.quota_exceeded() {
            if let Flow::Abort = self.nutrition_pass(&mut report).await {
                return report;
            }
        }

        self.image_pass(&mut report).await;
        report
    }

    async fn nutrition_pass(&self, report: &mut PassReport) -> Flow {
        for recipe in self.recipes.all() {
            if self.session.is_cancelled() {
                report.cancelled = true;
                return Flow::Abort;
            }
            if self.session.quota_exceeded() {
                // Tripped by a concurrent pass; images may still proceed.
                return Flow::Continue;
            }
            if self.nutrition.contains(&recipe.id) {
                continue;
            }
            let Some(guard) = self.nutrition_in_flight.try_acquire(&recipe.id) else {
                continue;
            };

            report.nutrition_attempted += 1;
            let mut flow = Flow::Continue;

            match self.provider.estimate_nutrition(NutritionRequest::from(recipe)).await {
                Ok(_) if self.session.is_cancelled() => {
                    debug!("Discarding nutrition for {} after shutdown", recipe.id);
                }
                Ok(estimate) => {
                    if let Err(e) = self.nutrition.set(&recipe.id, estimate).await {
                        warn!("Nutrition for {} cached in memory only: {}", recipe.id, e);
                    }
                    info!("Estimated nutrition for {} ({})", recipe.id, recipe.title);
                    report.nutrition_added += 1;
                }
                Err(e) if e.is_quota() => {
                    if self.session.mark_quota_exceeded() {
                        warn!("Provider quota exhausted at {}; nutrition enrichment halted: {}", recipe.id, e);
                    }
                    report.quota_tripped = true;
                    flow = Flow::Abort;
                }
                Err(e) => {
                    warn!("Error estimating nutrition for {}: {}", recipe.title, e);
                    report.nutrition_failed += 1;
                }
            }

            self.pause(self.config.nutrition_delay()).await;
            drop(guard);

            if let Flow::Abort = flow {
                return flow;
            }
        }
        Flow::Continue
    }

    async fn image_pass(&self, report: &mut PassReport) {
        for recipe in self.recipes.all() {
            if self.session.is_cancelled() {
                report.cancelled = true;
                return;
            }
            if self.images.contains(&recipe.id) {
                continue;
            }
            let Some(guard) = self.image_in_flight.try_acquire(&recipe.id) else {
                continue;
            };

            report.images_attempted += 1;
            match self.provider.generate_image(ImageRequest::from(recipe)).await {
                Ok(_) if self.session.is_cancelled() => {
                    debug!("Discarding image for {} after shutdown", recipe.id);
                }
                Ok(image) => {
                    self.images.set(&recipe.id, image);
                    info!("Generated image for {} ({})", recipe.id, recipe.title);
                    report.images_added += 1;
                }
                Err(e) => {
                    warn!("Error generating image for {}: {}", recipe.title, e);
                    report.images_failed += 1;
                }
            }

            self.pause(self.config.image_delay).await;
            drop(guard);
        }
    }

    /// Sleeps unless shutdown arrives first.
    async fn pause(&self, delay: Duration) {
        if delay.is_zero() {
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = self.session.cancelled() => {}
        }
    }

    pub fn has_pending(&self) -> bool {
        let quota = self.session.quota_exceeded();
        self.recipes
            .all()
            .iter()
            .any(|r| !self.images.contains(&r.id) || (!quota && !self.nutrition.contains(&r.id)))
    }

    pub fn status(&self) -> EnrichmentStatus {
        let quota_exceeded = self.session.quota_exceeded();
        let recipes = self.recipes.all();
        let nutrition_pending = if quota_exceeded {
            0
        } else {
            recipes.iter().filter(|r| !self.nutrition.contains(&r.id)).count()
        };
        EnrichmentStatus {
            quota_exceeded,
            recipes: recipes.len(),
            nutrition_cached: self.nutrition.len(),
            images_cached: self.images.len(),
            nutrition_pending,
            images_pending: recipes.iter().filter(|r| !self.images.contains(&r.id)).count(),
            in_flight: self.nutrition_in_flight.len() + self.image_in_flight.len(),
        }
    }

    /// Asks the worker for another pass. Not lost if the worker is busy.
    pub fn trigger(&self) {
        self.wake.notify_one();
    }

    pub fn shutdown(&self) {
        self.session.cancel();
    }

    /// Worker loop: passes run back to back while they make progress, then
    /// the worker sleeps until triggered or shut down.
    pub async fn run(&self) {
        info!("Enrichment worker started for {} recipes", self.recipes.len());
        loop {
            if self.session.is_cancelled() {
                break;
            }

            let report = self.run_pass().await;
            debug!("Enrichment pass finished: {:?}", report);

            if report.cancelled {
                break;
            }
            if report.changed() && self.has_pending() {
                continue;
            }

            tokio::select! {
                _ = self.wake.notified() => {}
                _ = self.session.cancelled() => break,
            }
        }
        info!("Enrichment worker stopped");
    }

    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }
}
