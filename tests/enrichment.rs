mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use common::{context, title, ScriptedProvider};
use recipe_enricher::database::MemoryStore;
use recipe_enricher::food::analysis::{CapturedPhoto, PhotoSession};
use recipe_enricher::food::display::photo_report;
use recipe_enricher::food::nutrition::{HealthLabel, PhotoAnalysisResult};
use recipe_enricher::{EnrichmentConfig, ProviderError};

fn titles(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| title(id)).collect()
}

fn quota_error() -> ProviderError {
    ProviderError::from_description("429 Too Many Requests: quota exceeded")
}

async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn test_pass_fills_both_caches_in_store_order() {
    let provider = Arc::new(ScriptedProvider::new());
    let ctx = context(&["r1", "r2", "r3"], provider.clone(), MemoryStore::new()).await;

    let report = ctx.enricher.run_pass().await;

    assert_eq!(provider.nutrition_calls(), titles(&["r1", "r2", "r3"]));
    assert_eq!(provider.image_calls(), titles(&["r1", "r2", "r3"]));
    assert_eq!(report.nutrition_added, 3);
    assert_eq!(report.images_added, 3);
    assert_eq!(ctx.nutrition.len(), 3);
    assert_eq!(ctx.images.len(), 3);
    assert!(!ctx.enricher.has_pending());
}

#[tokio::test]
async fn test_cached_recipes_are_skipped() {
    let provider = Arc::new(ScriptedProvider::new());
    let ctx = context(&["r1", "r2"], provider.clone(), MemoryStore::new()).await;
    ctx.nutrition.set("r1", common::estimate(250.0)).await.unwrap();

    ctx.enricher.run_pass().await;

    assert_eq!(provider.nutrition_calls(), titles(&["r2"]));
    assert_eq!(ctx.nutrition.get("r1").unwrap().calories_kcal, Some(250.0));
}

#[tokio::test]
async fn test_quota_failure_stops_the_pass() {
    let provider = Arc::new(ScriptedProvider::new().fail_nutrition("r2", quota_error(), usize::MAX));
    let ctx = context(&["r1", "r2", "r3", "r4"], provider.clone(), MemoryStore::new()).await;

    let report = ctx.enricher.run_pass().await;

    assert!(report.quota_tripped);
    assert!(ctx.quota_exceeded());
    assert_eq!(provider.nutrition_calls(), titles(&["r1", "r2"]));
    assert!(provider.image_calls().is_empty());
    assert_eq!(ctx.nutrition.len(), 1);
}

#[tokio::test]
async fn test_no_nutrition_requests_after_quota() {
    let provider = Arc::new(ScriptedProvider::new().fail_nutrition("r1", quota_error(), 1));
    let ctx = context(&["r1", "r2", "r3"], provider.clone(), MemoryStore::new()).await;

    ctx.enricher.run_pass().await;
    assert!(ctx.quota_exceeded());

    // Even though the scripted failure is used up, the breaker stays open.
    let second = ctx.enricher.run_pass().await;
    ctx.enricher.run_pass().await;

    assert_eq!(provider.nutrition_calls(), titles(&["r1"]));
    assert_eq!(second.nutrition_attempted, 0);
    assert_eq!(second.images_added, 3);
    assert!(ctx.nutrition.is_empty());
    assert!(ctx.quota_exceeded());
    assert!(!ctx.enricher.has_pending());
}

#[tokio::test]
async fn test_transient_failure_skips_one_recipe() {
    let provider = Arc::new(
        ScriptedProvider::new().fail_nutrition("r2", ProviderError::Request("connection reset".to_string()), 1),
    );
    let ctx = context(&["r1", "r2", "r3"], provider.clone(), MemoryStore::new()).await;

    let report = ctx.enricher.run_pass().await;

    assert_eq!(provider.nutrition_calls(), titles(&["r1", "r2", "r3"]));
    assert_eq!(report.nutrition_failed, 1);
    assert!(!report.quota_tripped);
    assert!(!ctx.quota_exceeded());
    assert!(ctx.nutrition.get("r2").is_none());
    assert_eq!(ctx.images.len(), 3);

    // The next pass picks the skipped recipe up again.
    ctx.enricher.run_pass().await;
    assert!(ctx.nutrition.get("r2").is_some());
}

#[tokio::test]
async fn test_malformed_response_treated_as_transient() {
    let provider = Arc::new(ScriptedProvider::new().fail_nutrition(
        "r1",
        ProviderError::MalformedResponse("expected value at line 1".to_string()),
        usize::MAX,
    ));
    let ctx = context(&["r1", "r2"], provider.clone(), MemoryStore::new()).await;

    let report = ctx.enricher.run_pass().await;

    assert_eq!(report.nutrition_failed, 1);
    assert_eq!(report.nutrition_added, 1);
    assert!(!ctx.quota_exceeded());
}

#[tokio::test]
async fn test_image_failures_never_trip_quota() {
    let provider = Arc::new(ScriptedProvider::new().fail_image("r1", quota_error()));
    let ctx = context(&["r1", "r2"], provider.clone(), MemoryStore::new()).await;

    let report = ctx.enricher.run_pass().await;

    assert_eq!(report.images_failed, 1);
    assert_eq!(provider.image_calls(), titles(&["r1", "r2"]));
    assert!(ctx.images.get("r2").is_some());
    assert!(!ctx.quota_exceeded());
}

#[tokio::test]
async fn test_concurrent_passes_request_each_id_once() {
    let provider = Arc::new(ScriptedProvider::new().with_latency(Duration::from_millis(5)));
    let ids = ["r1", "r2", "r3", "r4", "r5"];
    let ctx = context(&ids, provider.clone(), MemoryStore::new()).await;

    let (a, b) = tokio::join!(ctx.enricher.run_pass(), ctx.enricher.run_pass());

    for calls in [provider.nutrition_calls(), provider.image_calls()] {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for call in calls {
            *counts.entry(call).or_default() += 1;
        }
        assert_eq!(counts.len(), ids.len());
        assert!(counts.values().all(|c| *c == 1), "duplicate request: {:?}", counts);
    }
    assert_eq!(a.nutrition_added + b.nutrition_added, ids.len());
    assert_eq!(ctx.nutrition.len(), ids.len());
}

#[tokio::test(start_paused = true)]
async fn test_in_flight_marker_held_through_delay() {
    let config = EnrichmentConfig {
        nutrition_delay_min: Duration::from_millis(1000),
        nutrition_delay_max: Duration::from_millis(1000),
        image_delay: Duration::ZERO,
    };
    let provider = Arc::new(
        ScriptedProvider::new().fail_nutrition("r1", ProviderError::Request("reset".to_string()), 1),
    );
    let ctx = common::context_with_config(&["r1", "r2"], provider.clone(), MemoryStore::new(), config).await;

    let first = tokio::spawn({
        let enricher = ctx.enricher.clone();
        async move { enricher.run_pass().await }
    });
    // r1 has failed and the first pass is now waiting out its delay.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(provider.nutrition_calls(), titles(&["r1"]));
    assert!(ctx.nutrition.get("r1").is_none());
    assert_eq!(ctx.enricher.status().in_flight, 1);

    let second = tokio::spawn({
        let enricher = ctx.enricher.clone();
        async move { enricher.run_pass().await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(provider.nutrition_calls(), titles(&["r1", "r2"]));
    assert_eq!(ctx.enricher.status().in_flight, 2);

    let first = first.await.unwrap();
    let second = second.await.unwrap();

    assert_eq!(provider.nutrition_calls(), titles(&["r1", "r2"]));
    assert_eq!(first.nutrition_attempted, 1);
    assert_eq!(first.nutrition_failed, 1);
    assert_eq!(second.nutrition_attempted, 1);
    assert_eq!(second.nutrition_added, 1);
    assert_eq!(ctx.enricher.status().in_flight, 0);
}

#[tokio::test]
async fn test_worker_retries_until_caches_full() {
    let provider = Arc::new(
        ScriptedProvider::new().fail_nutrition("r2", ProviderError::Request("timeout".to_string()), 1),
    );
    let ctx = context(&["r1", "r2", "r3"], provider.clone(), MemoryStore::new()).await;

    let worker = ctx.enricher.clone().spawn();
    let enricher = ctx.enricher.clone();
    wait_until(|| !enricher.has_pending()).await;

    ctx.enricher.shutdown();
    worker.await.unwrap();

    assert_eq!(ctx.nutrition.len(), 3);
    assert_eq!(ctx.images.len(), 3);
    assert_eq!(provider.nutrition_calls().iter().filter(|t| **t == title("r2")).count(), 2);
}

#[tokio::test]
async fn test_worker_respects_quota_across_triggers() {
    let provider = Arc::new(ScriptedProvider::new().fail_nutrition("r1", quota_error(), usize::MAX));
    let ctx = context(&["r1", "r2"], provider.clone(), MemoryStore::new()).await;

    let worker = ctx.enricher.clone().spawn();
    let images = ctx.images.clone();
    wait_until(|| images.len() == 2).await;

    ctx.enricher.trigger();
    tokio::time::sleep(Duration::from_millis(20)).await;
    ctx.enricher.shutdown();
    worker.await.unwrap();

    assert!(ctx.quota_exceeded());
    assert_eq!(provider.nutrition_calls(), titles(&["r1"]));
    assert_eq!(ctx.enricher.status().nutrition_pending, 0);
}

#[tokio::test]
async fn test_shutdown_discards_in_flight_results() {
    let provider = Arc::new(ScriptedProvider::new().with_latency(Duration::from_millis(50)));
    let ctx = context(&["r1", "r2"], provider.clone(), MemoryStore::new()).await;

    let worker = ctx.enricher.clone().spawn();
    tokio::time::sleep(Duration::from_millis(10)).await;
    ctx.enricher.shutdown();
    worker.await.unwrap();

    assert_eq!(provider.nutrition_calls(), titles(&["r1"]));
    assert!(ctx.nutrition.is_empty());
    assert!(provider.image_calls().is_empty());
}

#[tokio::test]
async fn test_restart_keeps_nutrition_but_not_images() {
    let store = MemoryStore::new();
    let provider = Arc::new(ScriptedProvider::new());
    let ctx = context(&["r1", "r2"], provider.clone(), store.clone()).await;
    ctx.enricher.run_pass().await;
    assert_eq!(ctx.images.len(), 2);

    let restarted = context(&["r1", "r2"], Arc::new(ScriptedProvider::new()), store).await;

    assert_eq!(restarted.nutrition.snapshot(), ctx.nutrition.snapshot());
    assert!(restarted.images.is_empty());
    assert_eq!(restarted.enricher.status().images_pending, 2);
    assert_eq!(restarted.enricher.status().nutrition_pending, 0);
}

#[tokio::test]
async fn test_photo_analysis_unaffected_by_quota() {
    let not_food = PhotoAnalysisResult {
        dish_name: "Houseplant".to_string(),
        portion_guess: "n/a".to_string(),
        calories_kcal: None,
        protein_g: None,
        carbs_g: None,
        fat_g: None,
        health_score_0_10: -2.0,
        health_label: HealthLabel::Unfavorable,
        rationale: "This is not food".to_string(),
        tips: vec!["Photograph the plate from above".to_string()],
    };
    let provider = Arc::new(
        ScriptedProvider::new()
            .fail_nutrition("r1", quota_error(), usize::MAX)
            .with_photo(Ok(not_food)),
    );
    let ctx = context(&["r1"], provider.clone(), MemoryStore::new()).await;
    ctx.enricher.run_pass().await;
    assert!(ctx.quota_exceeded());

    let mut session = PhotoSession::new(ctx.provider.clone());
    session.capture(CapturedPhoto::from_base64("image/png", "iVBORw0KGgo=").unwrap());
    let result = session.submit().await.unwrap();

    let report = photo_report(result);
    assert!(report.contains("Calories: —"));
    assert!(report.contains("0/10"));
    assert_eq!(*provider.photo_calls.lock(), vec!["image/png".to_string()]);

    session.capture(CapturedPhoto::from_base64("image/jpeg", "/9j/4AAQ").unwrap());
    assert!(session.result().is_none());
}

#[tokio::test]
async fn test_photo_failure_surfaces_error() {
    let provider = Arc::new(ScriptedProvider::new().with_photo(Err(ProviderError::EmptyResponse)));
    let ctx = context(&["r1"], provider, MemoryStore::new()).await;

    let mut session = PhotoSession::new(ctx.provider.clone());
    assert!(session.submit().await.is_err());

    session.capture(CapturedPhoto::from_base64("image/png", "iVBORw0KGgo=").unwrap());
    assert!(session.submit().await.is_err());
    assert!(session.result().is_none());
    assert!(!ctx.quota_exceeded());
}
