use crate::config::ConfigError;
use crate::food::meals::DailyGoals;

#[derive(Debug, Clone, Default)]
pub struct FoodConfig {
    pub daily_goals: DailyGoals,
}

impl FoodConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = DailyGoals::default();
        Ok(Self {
            daily_goals: DailyGoals {
                calories: goal_from_env("DAILY_CALORIES_GOAL", defaults.calories)?,
                protein: goal_from_env("DAILY_PROTEIN_GOAL", defaults.protein)?,
                carbs: goal_from_env("DAILY_CARBS_GOAL", defaults.carbs)?,
                fat: goal_from_env("DAILY_FAT_GOAL", defaults.fat)?,
            },
        })
    }
}

fn goal_from_env(var: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var: var.to_string(),
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}
