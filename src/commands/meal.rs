use colored::Colorize;

use crate::context::AppContext;
use crate::food::analysis::PhotoSession;
use crate::food::meals::{progress_percent, MealEntry, MealLog};

pub fn handle_command(
    log: &mut MealLog,
    ctx: &AppContext,
    photo: &PhotoSession,
    args: &str,
) -> Result<(), String> {
    let (sub, rest) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
    let rest = rest.trim();

    let entry = match sub {
        "add" => parse_manual_entry(rest)?,
        "log" => {
            let recipe = ctx
                .recipes
                .get(rest)
                .ok_or_else(|| format!("Recipe not found: {}", rest))?;
            let estimate = ctx
                .nutrition
                .get(&recipe.id)
                .ok_or_else(|| format!("No nutrition estimate yet for {}", recipe.title))?;
            MealEntry::from_estimate(&recipe.title, &estimate)
        }
        "photo" => {
            let result = photo
                .result()
                .ok_or_else(|| "No analyzed photo to log.".to_string())?;
            if !result.is_food() {
                return Err("The last photo does not look like food.".to_string());
            }
            MealEntry::from_photo(result)
        }
        "remove" => {
            let id: u32 = rest
                .parse()
                .map_err(|_| format!("Invalid meal number: {}", rest))?;
            let removed = log.remove(id).ok_or_else(|| format!("No meal #{}", id))?;
            println!("Removed {}", removed.name);
            return Ok(());
        }
        _ => return Err("Usage: meal add|log|photo|remove ...".to_string()),
    };

    let meal = log.add(entry);
    println!(
        "{} #{} {} at {}: {} kcal",
        meal.emoji, meal.id, meal.name, meal.time, meal.calories
    );
    Ok(())
}

/// `<name words...> <kcal> [protein carbs fat]`
pub fn parse_manual_entry(args: &str) -> Result<MealEntry, String> {
    let tokens: Vec<&str> = args.split_whitespace().collect();
    let split = tokens
        .iter()
        .position(|t| t.parse::<u32>().is_ok())
        .ok_or_else(|| "Usage: meal add <name> <kcal> [protein carbs fat]".to_string())?;

    if split == 0 {
        return Err("Please give the meal a name.".to_string());
    }
    let numbers = &tokens[split..];
    if numbers.len() > 4 {
        return Err("Expected at most 4 numbers: kcal protein carbs fat".to_string());
    }
    let values = numbers
        .iter()
        .map(|t| t.parse::<u32>().map_err(|_| format!("Invalid number: {}", t)))
        .collect::<Result<Vec<u32>, String>>()?;

    Ok(MealEntry {
        name: tokens[..split].join(" "),
        calories: values[0],
        protein: values.get(1).copied().unwrap_or(0),
        carbs: values.get(2).copied().unwrap_or(0),
        fat: values.get(3).copied().unwrap_or(0),
        emoji: None,
    })
}

pub fn print_today(log: &MealLog) {
    let goals = log.goals();
    let totals = log.totals();

    println!("\n🍽️ Today:");
    if log.meals().is_empty() {
        println!("  No meals logged yet.");
    }
    for meal in log.meals() {
        println!(
            "  #{} {} {} {:>5} · {} kcal",
            meal.id, meal.emoji, meal.name, meal.time, meal.calories
        );
    }

    println!(
        "\n  Calories: {}/{} kcal ({} left)",
        totals.calories.to_string().cyan(),
        goals.calories,
        log.remaining_calories()
    );
    for (label, current, goal) in [
        ("Protein", totals.protein, goals.protein),
        ("Carbs", totals.carbs, goals.carbs),
        ("Fat", totals.fat, goals.fat),
    ] {
        println!(
            "  {:<8} {:>4}/{:<4} g {:>3}%",
            label,
            current,
            goal,
            progress_percent(current, goal)
        );
    }
    println!();
}
