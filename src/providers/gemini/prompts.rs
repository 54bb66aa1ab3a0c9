use serde_json::{json, Value};

use crate::providers::traits::{ImageRequest, NutritionRequest};

const HEALTH_LABELS: [&str; 3] = ["favorable", "neutral", "unfavorable"];

pub fn nutrition_prompt(request: &NutritionRequest<'_>) -> String {
    let steps = request
        .steps
        .filter(|s| !s.is_empty())
        .map(|s| format!("Steps: {}\n", s.join(" ")))
        .unwrap_or_default();

    format!(
        "Analyze this recipe and estimate its nutritional value for ONE serving.\n\
         Title: {}\n\
         Ingredients: {}\n\
         {}\n\
         Return a VALID JSON object. Estimate conservatively.\n\
         Schema:\n\
         {{\n  \"calories_kcal\": number|null,\n  \"protein_g\": number|null,\n  \"carbs_g\": number|null,\n  \"fat_g\": number|null,\n  \"health_score_0_10\": number,\n  \"health_label\": \"favorable\"|\"neutral\"|\"unfavorable\",\n  \"notes_short\": string\n}}",
        request.title,
        request.ingredients.join(", "),
        steps
    )
}

pub fn nutrition_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "calories_kcal": { "type": "NUMBER", "nullable": true },
            "protein_g": { "type": "NUMBER", "nullable": true },
            "carbs_g": { "type": "NUMBER", "nullable": true },
            "fat_g": { "type": "NUMBER", "nullable": true },
            "health_score_0_10": { "type": "NUMBER" },
            "health_label": { "type": "STRING", "enum": HEALTH_LABELS },
            "notes_short": { "type": "STRING" }
        },
        "required": [
            "calories_kcal", "protein_g", "carbs_g", "fat_g",
            "health_score_0_10", "health_label", "notes_short"
        ]
    })
}

pub fn image_prompt(request: &ImageRequest<'_>) -> String {
    format!(
        "Photorealistic food photo of a single finished dish.\n\n\
         Dish: {}\n\
         Category: {}\n\
         Key ingredients: {}\n\n\
         Style and plating:\n\
         - realistic food photography, NOT an illustration\n\
         - soft natural light\n\
         - looks like a modern healthy cafe\n\
         - neat, minimal plating\n\
         - neutral or light background (wood or stone)\n\
         - camera angle 30-45 degrees or a slight top-down\n\
         - focus on texture and appetite appeal\n\
         - natural, unsaturated colours\n\n\
         Constraints:\n\
         - no people, hands or faces\n\
         - no text, logos or watermarks\n\
         - no extra props\n\
         - one dish in frame\n\n\
         Technical:\n\
         - square image (1:1)\n\
         - high detail, sharp focus\n\
         - one consistent style across the whole menu",
        request.title,
        request.category_label,
        request.ingredients.join(", ")
    )
}

pub const PHOTO_PROMPT: &str = "Analyze this image of food. Estimate calories, portion size and healthiness.\n\
Be CAREFUL with estimates. No medical claims. Account for uncertainty.\n\
If the photo does not show food, set calories_kcal to null.\n\
Health scale: 0-3 unfavorable, 4-6 neutral, 7-10 favorable.\n\
Answer with a VALID JSON object.";

pub fn photo_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "dish_name": { "type": "STRING" },
            "portion_guess": { "type": "STRING" },
            "calories_kcal": { "type": "NUMBER", "nullable": true },
            "protein_g": { "type": "NUMBER", "nullable": true },
            "carbs_g": { "type": "NUMBER", "nullable": true },
            "fat_g": { "type": "NUMBER", "nullable": true },
            "health_score_0_10": { "type": "NUMBER" },
            "health_label": { "type": "STRING", "enum": HEALTH_LABELS },
            "why_short": { "type": "STRING" },
            "tips": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": [
            "dish_name", "portion_guess", "health_score_0_10",
            "health_label", "why_short", "tips"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nutrition_prompt_omits_empty_steps() {
        let ingredients = vec!["eggs".to_string(), "spinach".to_string()];
        let request = NutritionRequest {
            title: "Omelette",
            ingredients: &ingredients,
            steps: None,
        };
        let prompt = nutrition_prompt(&request);
        assert!(prompt.contains("Title: Omelette"));
        assert!(prompt.contains("Ingredients: eggs, spinach"));
        assert!(!prompt.contains("Steps:"));
    }
}
