use colored::Colorize;

use crate::context::AppContext;
use crate::food::analysis::PhotoSession;
use crate::food::display::QUOTA_BANNER;
use crate::food::meals::{DailyGoals, MealLog};

pub mod food_cmd;
pub mod meal;
pub mod photo;
mod system;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    Exit,
}

pub struct CommandHandler {
    ctx: AppContext,
    active_category: String,
    photo: PhotoSession,
    meals: MealLog,
    quota_banner_shown: bool,
}

impl CommandHandler {
    pub fn new(ctx: AppContext, goals: DailyGoals) -> Self {
        let photo = PhotoSession::new(ctx.provider.clone());
        Self {
            ctx,
            active_category: "breakfast".to_string(),
            photo,
            meals: MealLog::new(goals),
            quota_banner_shown: false,
        }
    }

    pub async fn handle_command(&mut self, input: &str) -> Result<CommandResult, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(CommandResult::Continue);
        }

        let (command, rest) = match input.split_once(char::is_whitespace) {
            Some((command, rest)) => (command.to_lowercase(), rest.trim()),
            None => (input.to_lowercase(), ""),
        };

        self.show_quota_banner(&command);

        match command.as_str() {
            "help" => system::print_help(),
            "exit" | "quit" => {
                println!("👋 Goodbye!");
                return Ok(CommandResult::Exit);
            }
            "list" | "ls" => food_cmd::list(&self.ctx, &mut self.active_category, rest)?,
            "search" => food_cmd::search(&self.ctx, &self.active_category, rest)?,
            "show" => food_cmd::show(&self.ctx, rest)?,
            "status" => food_cmd::status(&self.ctx),
            "enrich" => food_cmd::enrich(&self.ctx),
            "photo" => photo::handle_command(&mut self.photo, rest).await?,
            "meal" => meal::handle_command(&mut self.meals, &self.ctx, &self.photo, rest)?,
            "today" => meal::print_today(&self.meals),
            _ => return Err(format!("Unknown command: {}. Type 'help' for available commands.", command)),
        }
        Ok(CommandResult::Continue)
    }

    fn show_quota_banner(&mut self, command: &str) {
        if quota_banner_due(self.ctx.quota_exceeded(), self.quota_banner_shown, command) {
            println!("{}", QUOTA_BANNER.yellow().bold());
            self.quota_banner_shown = true;
        }
    }
}

/// The banner goes up on the first command after quota runs out and stays on
/// every recipe view while the flag is set.
fn quota_banner_due(quota_exceeded: bool, shown_before: bool, command: &str) -> bool {
    quota_exceeded && (!shown_before || matches!(command, "list" | "ls" | "search" | "show"))
}
