use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

const BUNDLED_RECIPES: &str = include_str!("../../data/recipes.json");

/// Display labels for the dataset's category keys, in tab order.
pub const CATEGORY_LABELS: &[(&str, &str)] = &[
    ("breakfast", "Breakfasts"),
    ("lunch", "Lunches"),
    ("dinner", "Dinners"),
    ("snack", "Snacks"),
];

#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Failed to read recipe dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse recipe dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate recipe id: {0}")]
    DuplicateId(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub category: String,
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub image_file: String,
    pub source_page: u32,
}

impl Recipe {
    pub fn category_label(&self) -> &str {
        category_label(&self.category)
    }
}

pub fn category_label(category: &str) -> &str {
    CATEGORY_LABELS
        .iter()
        .find(|(key, _)| *key == category)
        .map(|(_, label)| *label)
        .unwrap_or(category)
}

/// Immutable, ordered recipe list loaded once at startup.
#[derive(Debug, Clone)]
pub struct RecipeStore {
    recipes: Vec<Recipe>,
}

impl RecipeStore {
    pub fn bundled() -> Result<Self, RecipeError> {
        Self::from_json(BUNDLED_RECIPES)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RecipeError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, RecipeError> {
        let recipes: Vec<Recipe> = serde_json::from_str(raw)?;
        Self::new(recipes)
    }

    pub fn new(recipes: Vec<Recipe>) -> Result<Self, RecipeError> {
        let mut seen = HashSet::new();
        for recipe in &recipes {
            if !seen.insert(recipe.id.as_str()) {
                return Err(RecipeError::DuplicateId(recipe.id.clone()));
            }
        }
        Ok(Self { recipes })
    }

    pub fn all(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Recipes in `category` whose title contains `query`, ignoring case.
    pub fn filter(&self, category: &str, query: &str) -> Vec<&Recipe> {
        let query = query.trim().to_lowercase();
        self.recipes
            .iter()
            .filter(|r| r.category == category)
            .filter(|r| query.is_empty() || r.title.to_lowercase().contains(&query))
            .collect()
    }

    /// Title search across every category.
    pub fn search(&self, query: &str) -> Vec<&Recipe> {
        let query = query.trim().to_lowercase();
        self.recipes
            .iter()
            .filter(|r| r.title.to_lowercase().contains(&query))
            .collect()
    }
}
