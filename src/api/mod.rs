use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use validator::Validate;

use crate::context::AppContext;
use crate::enrichment::EnrichmentStatus;
use crate::food::analysis::{analyze_photo, CapturedPhoto};
use crate::food::nutrition::{NutritionEstimate, PhotoAnalysisResult};
use crate::food::recipes::Recipe;

#[derive(Deserialize)]
pub struct RecipeQuery {
    category: Option<String>,
    q: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct PhotoRequest {
    #[validate(length(min = 7, max = 64))]
    media_type: String,
    #[validate(length(min = 1))]
    data_base64: String,
}

#[derive(Serialize)]
pub struct RecipeView {
    #[serde(flatten)]
    recipe: Recipe,
    category_label: String,
    nutrition: Option<NutritionEstimate>,
    health_score: Option<u8>,
    image: Option<String>,
}

#[derive(Serialize)]
pub struct PhotoResponse {
    #[serde(flatten)]
    result: PhotoAnalysisResult,
    health_score: u8,
}

#[derive(Serialize)]
struct ApiResponse {
    status: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse { status: message.into() })).into_response()
}

fn recipe_view(ctx: &AppContext, recipe: &Recipe) -> RecipeView {
    let nutrition = ctx.nutrition.get(&recipe.id);
    RecipeView {
        category_label: recipe.category_label().to_string(),
        health_score: nutrition.as_ref().map(|n| n.health_score()),
        nutrition,
        image: ctx.images.get(&recipe.id).map(|i| i.as_uri().to_string()),
        recipe: recipe.clone(),
    }
}

/// Create and configure the API router
pub fn create_api(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(status_handler))
        .route("/recipes", get(list_recipes))
        .route("/recipes/:id", get(get_recipe))
        .route("/photo/analyze", post(analyze_photo_handler))
        .layer(cors)
        .with_state(ctx)
}

async fn health_check() -> Response {
    Json(ApiResponse {
        status: "Server is running and healthy".to_string(),
    })
    .into_response()
}

async fn status_handler(State(ctx): State<AppContext>) -> Json<EnrichmentStatus> {
    Json(ctx.enricher.status())
}

async fn list_recipes(State(ctx): State<AppContext>, Query(query): Query<RecipeQuery>) -> Response {
    let text = query.q.unwrap_or_default();
    let recipes: Vec<&Recipe> = match query.category.as_deref() {
        Some(category) => ctx.recipes.filter(category, &text),
        None => ctx.recipes.search(&text),
    };
    let views: Vec<RecipeView> = recipes.into_iter().map(|r| recipe_view(&ctx, r)).collect();
    Json(views).into_response()
}

async fn get_recipe(State(ctx): State<AppContext>, Path(id): Path<String>) -> Response {
    match ctx.recipes.get(&id) {
        Some(recipe) => Json(recipe_view(&ctx, recipe)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("Recipe not found: {}", id)),
    }
}

async fn analyze_photo_handler(State(ctx): State<AppContext>, Json(request): Json<PhotoRequest>) -> Response {
    if let Err(e) = request.validate() {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }

    let photo = match CapturedPhoto::from_base64(&request.media_type, &request.data_base64) {
        Ok(photo) => photo,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match analyze_photo(ctx.provider.as_ref(), &photo).await {
        Ok(result) => Json(PhotoResponse {
            health_score: result.health_score(),
            result,
        })
        .into_response(),
        Err(e) => error_response(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}
