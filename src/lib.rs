pub mod api;
pub mod cache;
pub mod commands;
pub mod config;
pub mod context;
pub mod database;
pub mod enrichment;
pub mod food;
pub mod providers;

// Re-export commonly used items
pub use context::AppContext;
pub use enrichment::{Enricher, EnrichmentConfig, PassReport};
pub use providers::traits::{GenerativeProvider, ProviderError};
