pub mod image;
pub mod nutrition;

pub use image::{ImageCache, ImageReference};
pub use nutrition::{CacheError, NutritionCache, NUTRITION_STORAGE_KEY};
