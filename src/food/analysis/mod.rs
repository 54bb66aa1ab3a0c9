pub mod photo;

pub use photo::{analyze_photo, CapturedPhoto, PhotoAnalysisError, PhotoSession};
