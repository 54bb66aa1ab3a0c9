pub mod inflight;
pub mod session;
pub mod worker;

pub use inflight::{InFlight, InFlightGuard};
pub use session::EnrichmentSession;
pub use worker::{EnrichmentConfig, EnrichmentStatus, Enricher, PassReport};
