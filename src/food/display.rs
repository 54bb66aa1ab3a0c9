//! Plain-text rendering of recipes, estimates and photo results.
//!
//! Everything here returns `String` so the CLI and tests share one rendering
//! path. Colour is applied by the caller.

use crate::cache::image::ImageReference;
use crate::food::nutrition::{clamp_health_score, NutritionEstimate, PhotoAnalysisResult};
use crate::food::recipes::Recipe;

pub const MISSING_VALUE: &str = "—";
pub const QUOTA_BANNER: &str = "⚠️ AI quota exhausted, try again later";
pub const PENDING_ESTIMATE: &str = "Estimating...";

pub fn format_macro(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.0} {}", v, unit),
        _ => MISSING_VALUE.to_string(),
    }
}

pub fn format_calories(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.0}", v),
        _ => MISSING_VALUE.to_string(),
    }
}

pub fn format_score(raw: f64) -> String {
    format!("{}/10", clamp_health_score(raw))
}

/// Ten-cell bar, one cell per score point.
pub fn score_bar(raw: f64) -> String {
    let filled = clamp_health_score(raw) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

pub fn recipe_card(recipe: &Recipe, nutrition: Option<&NutritionEstimate>, has_image: bool) -> String {
    let photo = if has_image { "📷" } else { "  " };
    let summary = match nutrition {
        Some(n) => format!(
            "≈ {} kcal | health {}",
            format_calories(n.calories_kcal),
            format_score(n.health_score_0_10)
        ),
        None => PENDING_ESTIMATE.to_string(),
    };
    format!("{} [{}] {} ({})", photo, recipe.id, recipe.title, summary)
}

pub fn recipe_detail(
    recipe: &Recipe,
    nutrition: Option<&NutritionEstimate>,
    image: Option<&ImageReference>,
) -> String {
    let mut out = format!("{}\n{} · page {}\n", recipe.title, recipe.category_label(), recipe.source_page);

    match image {
        Some(image) => out.push_str(&format!("Image: {} ({} bytes encoded)\n", image.media_type(), image.len())),
        None => out.push_str(&format!("Image: {}\n", recipe.image_file)),
    }

    out.push_str("\nNutrition per serving:\n");
    match nutrition {
        Some(n) => {
            out.push_str(&format!("  Calories: {} kcal\n", format_calories(n.calories_kcal)));
            out.push_str(&format!("  Protein:  {}\n", format_macro(n.protein_g, "g")));
            out.push_str(&format!("  Carbs:    {}\n", format_macro(n.carbs_g, "g")));
            out.push_str(&format!("  Fat:      {}\n", format_macro(n.fat_g, "g")));
            out.push_str(&format!(
                "  Health:   {} {} ({})\n",
                score_bar(n.health_score_0_10),
                format_score(n.health_score_0_10),
                n.health_label
            ));
            if !n.notes_short.is_empty() {
                out.push_str(&format!("  {}\n", n.notes_short));
            }
        }
        None => out.push_str(&format!("  {}\n", PENDING_ESTIMATE)),
    }

    out.push_str("\nIngredients:\n");
    for ingredient in &recipe.ingredients {
        out.push_str(&format!("  • {}\n", ingredient));
    }

    out.push_str("\nSteps:\n");
    for (i, step) in recipe.steps.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, step));
    }
    out
}

pub fn photo_report(result: &PhotoAnalysisResult) -> String {
    let mut out = format!("{} ({})\n", result.dish_name, result.portion_guess);
    out.push_str(&format!("Calories: {}\n", format_calories(result.calories_kcal)));
    out.push_str(&format!(
        "Protein {} | Carbs {} | Fat {}\n",
        format_macro(result.protein_g, "g"),
        format_macro(result.carbs_g, "g"),
        format_macro(result.fat_g, "g")
    ));
    out.push_str(&format!(
        "Health ({}): {} {}\n",
        result.health_label,
        score_bar(result.health_score_0_10),
        format_score(result.health_score_0_10)
    ));
    out.push_str(&format!("{}\n", result.rationale));
    if !result.tips.is_empty() {
        out.push_str("Tips:\n");
        for tip in &result.tips {
            out.push_str(&format!("  • {}\n", tip));
        }
    }
    out
}
