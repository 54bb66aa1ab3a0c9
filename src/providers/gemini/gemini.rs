use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde_json::{json, Value};

use super::prompts;
use crate::cache::image::ImageReference;
use crate::config::ProviderConfig;
use crate::food::nutrition::{NutritionEstimate, PhotoAnalysisResult};
use crate::providers::traits::{GenerativeProvider, ImageRequest, NutritionRequest, ProviderError};
use crate::providers::utils::parse_json_payload;

#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    config: ProviderConfig,
}

impl GeminiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let api_key = config.api_key.clone().ok_or(ProviderError::MissingApiKey)?;
        Ok(Self {
            api_key,
            client: Client::new(),
            config,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            model
        )
    }

    async fn generate_content(&self, model: &str, body: Value) -> Result<Value, ProviderError> {
        let response = self
            .client
            .post(self.endpoint(model))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_description(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        if let Some(error) = response_json.get("error") {
            return Err(ProviderError::from_description(error.to_string()));
        }

        Ok(response_json)
    }

    async fn generate_json<T: serde::de::DeserializeOwned>(
        &self,
        parts: Value,
        schema: Value,
    ) -> Result<T, ProviderError> {
        let body = json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "responseMimeType": "application/json",
                "responseSchema": schema
            }
        });
        let response = self.generate_content(&self.config.text_model, body).await?;
        let text = extract_text(&response).ok_or(ProviderError::EmptyResponse)?;
        parse_json_payload(&text)
    }
}

/// Concatenated text parts of the first candidate.
pub fn extract_text(response: &Value) -> Option<String> {
    let parts = response["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// First inline image part of the first candidate as a data URI reference.
pub fn extract_inline_image(response: &Value) -> Option<ImageReference> {
    let parts = response["candidates"][0]["content"]["parts"].as_array()?;
    parts.iter().find_map(|part| {
        let inline = part.get("inlineData").or_else(|| part.get("inline_data"))?;
        let mime_type = inline
            .get("mimeType")
            .or_else(|| inline.get("mime_type"))
            .and_then(Value::as_str)?;
        let data = inline.get("data").and_then(Value::as_str)?;
        Some(ImageReference::from_base64(mime_type, data))
    })
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    async fn estimate_nutrition(
        &self,
        request: NutritionRequest<'_>,
    ) -> Result<NutritionEstimate, ProviderError> {
        let parts = json!([{ "text": prompts::nutrition_prompt(&request) }]);
        self.generate_json(parts, prompts::nutrition_schema()).await
    }

    async fn generate_image(&self, request: ImageRequest<'_>) -> Result<ImageReference, ProviderError> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompts::image_prompt(&request) }]
            }],
            "generationConfig": {
                "responseModalities": ["IMAGE"],
                "imageConfig": { "aspectRatio": "1:1" }
            }
        });
        let response = self.generate_content(&self.config.image_model, body).await?;
        extract_inline_image(&response).ok_or(ProviderError::EmptyResponse)
    }

    async fn analyze_photo(
        &self,
        image: &[u8],
        media_type: &str,
    ) -> Result<PhotoAnalysisResult, ProviderError> {
        let parts = json!([
            { "inlineData": { "mimeType": media_type, "data": STANDARD.encode(image) } },
            { "text": prompts::PHOTO_PROMPT }
        ]);
        self.generate_json(parts, prompts::photo_schema()).await
    }

    fn model_info(&self) -> String {
        format!("{} / {}", self.config.text_model, self.config.image_model)
    }
}
