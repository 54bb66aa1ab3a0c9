pub mod analysis;
pub mod config;
pub mod display;
pub mod meals;
pub mod nutrition;
pub mod recipes;

pub use nutrition::{clamp_health_score, HealthLabel, NutritionEstimate, PhotoAnalysisResult};
pub use recipes::{Recipe, RecipeError, RecipeStore};
