use colored::Colorize;

use crate::context::AppContext;
use crate::food::display::{recipe_card, recipe_detail};
use crate::food::recipes::{category_label, CATEGORY_LABELS};

pub fn list(ctx: &AppContext, active_category: &mut String, category: &str) -> Result<(), String> {
    if !category.is_empty() {
        let category = category.to_lowercase();
        if !CATEGORY_LABELS.iter().any(|(key, _)| *key == category) {
            let known: Vec<&str> = CATEGORY_LABELS.iter().map(|(key, _)| *key).collect();
            return Err(format!("Unknown category: {}. Available: {}", category, known.join(", ")));
        }
        *active_category = category;
    }

    let tabs: Vec<String> = CATEGORY_LABELS
        .iter()
        .map(|(key, label)| {
            if *key == active_category.as_str() {
                format!("[{}]", label).cyan().bold().to_string()
            } else {
                label.to_string()
            }
        })
        .collect();
    println!("{}", tabs.join("  "));

    print_cards(ctx, &ctx.recipes.filter(active_category, ""));
    Ok(())
}

pub fn search(ctx: &AppContext, active_category: &str, query: &str) -> Result<(), String> {
    if query.is_empty() {
        return Err("Please provide text to search for.".to_string());
    }
    let found = ctx.recipes.filter(active_category, query);
    if found.is_empty() {
        println!("No recipes in {} match '{}'", category_label(active_category), query);
        return Ok(());
    }
    print_cards(ctx, &found);
    Ok(())
}

pub fn show(ctx: &AppContext, id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("Please specify a recipe id, e.g. show b01".to_string());
    }
    let recipe = ctx
        .recipes
        .get(id)
        .ok_or_else(|| format!("Recipe not found: {}", id))?;

    let nutrition = ctx.nutrition.get(&recipe.id);
    let image = ctx.images.get(&recipe.id);
    println!("{}", recipe_detail(recipe, nutrition.as_ref(), image.as_ref()));
    Ok(())
}

pub fn status(ctx: &AppContext) {
    let status = ctx.enricher.status();
    println!("\n🔄 Enrichment status:");
    println!("  Recipes:          {}", status.recipes);
    println!(
        "  Nutrition cached: {} ({} pending)",
        status.nutrition_cached.to_string().cyan(),
        status.nutrition_pending
    );
    println!(
        "  Images cached:    {} ({} pending)",
        status.images_cached.to_string().cyan(),
        status.images_pending
    );
    println!("  In flight:        {}", status.in_flight);
    let quota = if status.quota_exceeded {
        "exhausted".red()
    } else {
        "ok".green()
    };
    println!("  AI quota:         {}", quota);
    println!();
}

pub fn enrich(ctx: &AppContext) {
    ctx.enricher.trigger();
    println!("Background enrichment pass requested.");
}

fn print_cards(ctx: &AppContext, recipes: &[&crate::food::recipes::Recipe]) {
    for recipe in recipes {
        let nutrition = ctx.nutrition.get(&recipe.id);
        let card = recipe_card(recipe, nutrition.as_ref(), ctx.images.contains(&recipe.id));
        println!("{}", card);
    }
}
