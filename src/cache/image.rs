use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Generated image carried as a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageReference(String);

impl ImageReference {
    pub fn from_base64(mime_type: &str, data: &str) -> Self {
        Self(format!("data:{};base64,{}", mime_type, data))
    }

    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_uri(&self) -> &str {
        &self.0
    }

    pub fn media_type(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split(|c| c == ';' || c == ',').next())
            .filter(|m| !m.is_empty())
            .unwrap_or("application/octet-stream")
    }

    /// Length of the encoded payload after the comma.
    pub fn len(&self) -> usize {
        self.0.split_once(',').map(|(_, data)| data.len()).unwrap_or(self.0.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Recipe id → generated image. Memory-only; starts empty every process.
#[derive(Default)]
pub struct ImageCache {
    entries: RwLock<HashMap<String, ImageReference>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<ImageReference> {
        self.entries.read().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().contains_key(id)
    }

    pub fn set(&self, id: &str, image: ImageReference) {
        self.entries.write().insert(id.to_string(), image);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
