use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse verdict the provider attaches to an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLabel {
    #[serde(alias = "корисна")]
    Favorable,
    #[serde(alias = "нейтральна")]
    Neutral,
    #[serde(alias = "небажана")]
    Unfavorable,
}

impl HealthLabel {
    /// 0-3 unfavorable, 4-6 neutral, 7-10 favorable.
    pub fn from_score(raw: f64) -> Self {
        match clamp_health_score(raw) {
            0..=3 => HealthLabel::Unfavorable,
            4..=6 => HealthLabel::Neutral,
            _ => HealthLabel::Favorable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthLabel::Favorable => "favorable",
            HealthLabel::Neutral => "neutral",
            HealthLabel::Unfavorable => "unfavorable",
        }
    }
}

impl fmt::Display for HealthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-serving nutrition for one recipe, as estimated by the provider.
///
/// `health_score_0_10` is stored raw. The provider does not reliably respect
/// the range, so anything shown to a user goes through [`clamp_health_score`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionEstimate {
    pub calories_kcal: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub health_score_0_10: f64,
    pub health_label: HealthLabel,
    #[serde(default)]
    pub notes_short: String,
}

impl NutritionEstimate {
    pub fn health_score(&self) -> u8 {
        clamp_health_score(self.health_score_0_10)
    }
}

/// Result of analysing one user-submitted meal photo.
///
/// A `None` for `calories_kcal` means the photo is not food or the amount
/// could not be judged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoAnalysisResult {
    pub dish_name: String,
    pub portion_guess: String,
    #[serde(default)]
    pub calories_kcal: Option<f64>,
    #[serde(default)]
    pub protein_g: Option<f64>,
    #[serde(default)]
    pub carbs_g: Option<f64>,
    #[serde(default)]
    pub fat_g: Option<f64>,
    pub health_score_0_10: f64,
    pub health_label: HealthLabel,
    #[serde(alias = "why_short")]
    pub rationale: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

impl PhotoAnalysisResult {
    pub fn health_score(&self) -> u8 {
        clamp_health_score(self.health_score_0_10)
    }

    pub fn is_food(&self) -> bool {
        self.calories_kcal.is_some()
    }
}

/// Rounds a raw provider score into the displayable 0..=10 range.
pub fn clamp_health_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 10.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_health_score() {
        let rendered: Vec<u8> = [-5.0, 0.0, 7.0, 10.0, 15.0]
            .iter()
            .map(|raw| clamp_health_score(*raw))
            .collect();
        assert_eq!(rendered, vec![0, 0, 7, 10, 10]);
        assert_eq!(clamp_health_score(6.6), 7);
        assert_eq!(clamp_health_score(f64::NAN), 0);
    }

    #[test]
    fn test_label_from_score() {
        assert_eq!(HealthLabel::from_score(2.0), HealthLabel::Unfavorable);
        assert_eq!(HealthLabel::from_score(5.0), HealthLabel::Neutral);
        assert_eq!(HealthLabel::from_score(8.0), HealthLabel::Favorable);
        assert_eq!(HealthLabel::from_score(42.0), HealthLabel::Favorable);
    }

    #[test]
    fn test_estimate_accepts_provider_labels() {
        let raw = r#"{
            "calories_kcal": 420,
            "protein_g": null,
            "carbs_g": 51.5,
            "fat_g": 12,
            "health_score_0_10": 7,
            "health_label": "корисна",
            "notes_short": "Balanced"
        }"#;
        let estimate: NutritionEstimate = serde_json::from_str(raw).unwrap();
        assert_eq!(estimate.health_label, HealthLabel::Favorable);
        assert_eq!(estimate.protein_g, None);
        assert_eq!(estimate.calories_kcal, Some(420.0));

        let encoded = serde_json::to_value(&estimate).unwrap();
        assert_eq!(encoded["health_label"], "favorable");
    }

    #[test]
    fn test_photo_result_not_food() {
        let raw = r#"{
            "dish_name": "Keyboard",
            "portion_guess": "n/a",
            "calories_kcal": null,
            "health_score_0_10": 0,
            "health_label": "небажана",
            "why_short": "Not a meal",
            "tips": []
        }"#;
        let result: PhotoAnalysisResult = serde_json::from_str(raw).unwrap();
        assert!(!result.is_food());
        assert_eq!(result.rationale, "Not a meal");
        assert_eq!(result.fat_g, None);
    }
}
