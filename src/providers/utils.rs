use serde::de::DeserializeOwned;

use crate::providers::traits::ProviderError;

const QUOTA_INDICATORS: &[&str] = &["429", "quota", "resource_exhausted", "rate limit"];

/// True when a failure description looks like provider rate/usage exhaustion.
pub fn is_quota_indicator(description: &str) -> bool {
    let lower = description.to_lowercase();
    QUOTA_INDICATORS.iter().any(|needle| lower.contains(needle))
}

/// Strips a surrounding Markdown code fence, which some models add even in
/// JSON mode.
pub fn strip_json_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub fn parse_json_payload<T: DeserializeOwned>(text: &str) -> Result<T, ProviderError> {
    let payload = strip_json_fence(text);
    if payload.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    serde_json::from_str(payload).map_err(|e| ProviderError::MalformedResponse(e.to_string()))
}
