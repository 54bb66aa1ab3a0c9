use serde::{Deserialize, Serialize};

use crate::food::nutrition::{NutritionEstimate, PhotoAnalysisResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyGoals {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

impl Default for DailyGoals {
    fn default() -> Self {
        Self {
            calories: 2200,
            protein: 150,
            carbs: 250,
            fat: 70,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: u32,
    pub name: String,
    pub time: String,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
    pub emoji: String,
}

/// Macros for a meal before it gets an id and time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MealEntry {
    pub name: String,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
    pub emoji: Option<String>,
}

impl MealEntry {
    pub fn from_estimate(name: &str, estimate: &NutritionEstimate) -> Self {
        Self {
            name: name.to_string(),
            calories: grams(estimate.calories_kcal),
            protein: grams(estimate.protein_g),
            carbs: grams(estimate.carbs_g),
            fat: grams(estimate.fat_g),
            emoji: None,
        }
    }

    pub fn from_photo(result: &PhotoAnalysisResult) -> Self {
        Self {
            name: result.dish_name.clone(),
            calories: grams(result.calories_kcal),
            protein: grams(result.protein_g),
            carbs: grams(result.carbs_g),
            fat: grams(result.fat_g),
            emoji: Some("📸".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

/// Today's manually logged meals. Memory-only.
#[derive(Debug, Clone, Default)]
pub struct MealLog {
    goals: DailyGoals,
    meals: Vec<Meal>,
    next_id: u32,
}

impl MealLog {
    pub fn new(goals: DailyGoals) -> Self {
        Self {
            goals,
            meals: Vec::new(),
            next_id: 1,
        }
    }

    pub fn goals(&self) -> DailyGoals {
        self.goals
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn add(&mut self, entry: MealEntry) -> &Meal {
        let time = chrono::Local::now().format("%H:%M").to_string();
        self.add_at(entry, time)
    }

    pub fn add_at(&mut self, entry: MealEntry, time: String) -> &Meal {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.meals.push(Meal {
            id,
            name: entry.name,
            time,
            calories: entry.calories,
            protein: entry.protein,
            carbs: entry.carbs,
            fat: entry.fat,
            emoji: entry.emoji.unwrap_or_else(|| "🍴".to_string()),
        });
        &self.meals[self.meals.len() - 1]
    }

    pub fn remove(&mut self, id: u32) -> Option<Meal> {
        let index = self.meals.iter().position(|m| m.id == id)?;
        Some(self.meals.remove(index))
    }

    pub fn totals(&self) -> Totals {
        self.meals.iter().fold(Totals::default(), |acc, m| Totals {
            calories: acc.calories.saturating_add(m.calories),
            protein: acc.protein.saturating_add(m.protein),
            carbs: acc.carbs.saturating_add(m.carbs),
            fat: acc.fat.saturating_add(m.fat),
        })
    }

    pub fn remaining_calories(&self) -> u32 {
        self.goals.calories.saturating_sub(self.totals().calories)
    }
}

/// Share of `goal` reached, capped at 100.
pub fn progress_percent(current: u32, goal: u32) -> u32 {
    if goal == 0 {
        return 100;
    }
    ((current as u64 * 100) / goal as u64).min(100) as u32
}

fn grams(value: Option<f64>) -> u32 {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v.round() as u32)
        .unwrap_or(0)
}
