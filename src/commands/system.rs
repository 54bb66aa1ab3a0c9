pub fn print_help() {
    println!("\n📖 Recipe Book:");
    println!("  list [category]   - List recipes (breakfast, lunch, dinner, snack)");
    println!("  search <text>     - Search titles in the current category");
    println!("  show <id>         - Recipe details with AI nutrition");
    println!();

    println!("📸 Photo Commands:");
    println!("  photo <path>      - Analyze a meal photo");
    println!("  photo clear       - Forget the current photo and result");
    println!();

    println!("🍽️ Meal Log:");
    println!("  meal add <name> <kcal> [protein carbs fat]");
    println!("  meal log <id>     - Log a recipe using its AI estimate");
    println!("  meal photo        - Log the last analyzed photo");
    println!("  meal remove <n>   - Remove a logged meal");
    println!("  today             - Totals against daily goals");
    println!();

    println!("⚙️ System Commands:");
    println!("  status  - Background enrichment progress");
    println!("  enrich  - Ask the background worker for another pass");
    println!("  help    - Show this help menu");
    println!("  exit    - Exit the program");
    println!();
}
