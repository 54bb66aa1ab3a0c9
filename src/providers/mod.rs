pub mod gemini;
pub mod traits;
pub mod utils;

pub use traits::{GenerativeProvider, ImageRequest, NutritionRequest, ProviderError};
