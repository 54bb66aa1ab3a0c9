use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use log::info;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use recipe_enricher::api;
use recipe_enricher::commands::{CommandHandler, CommandResult};
use recipe_enricher::config::AppConfig;
use recipe_enricher::database::{Database, KeyValueStore, MemoryStore};
use recipe_enricher::food::recipes::RecipeStore;
use recipe_enricher::providers::gemini::GeminiProvider;
use recipe_enricher::providers::traits::GenerativeProvider;
use recipe_enricher::AppContext;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    api_key: Option<String>,

    /// SQLite file holding the nutrition cache
    #[arg(long)]
    db: Option<PathBuf>,

    /// JSON recipe dataset to use instead of the bundled one
    #[arg(long)]
    recipes: Option<PathBuf>,

    /// Keep the nutrition cache in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Do not start the background enrichment worker
    #[arg(long)]
    no_enrich: bool,

    #[arg(long)]
    api: bool,

    #[arg(long, default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    colored::control::set_override(true);
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(key) = &args.api_key {
        config.provider.api_key = Some(key.clone());
    }
    if let Some(path) = &args.recipes {
        config.recipes_path = Some(path.clone());
    }
    if let Some(path) = &args.db {
        config.database_path = path.clone();
    }

    let recipes = match &config.recipes_path {
        Some(path) => RecipeStore::from_path(path)
            .with_context(|| format!("Failed to load recipes from {}", path.display()))?,
        None => RecipeStore::bundled()?,
    };
    info!("Loaded {} recipes", recipes.len());

    let store: Arc<dyn KeyValueStore> = if args.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(
            Database::new(&config.database_path)
                .await
                .with_context(|| format!("Failed to open {}", config.database_path.display()))?,
        )
    };

    config
        .provider
        .require_api_key()
        .context("Provide an API key via --api-key")?;
    let provider: Arc<dyn GenerativeProvider> = Arc::new(GeminiProvider::new(config.provider.clone())?);
    info!("Using Gemini models {}", provider.model_info());

    let ctx = AppContext::new(recipes, store, provider, config.enrichment.clone()).await;

    let worker = if args.no_enrich {
        None
    } else {
        Some(ctx.enricher.clone().spawn())
    };

    let outcome = if args.api {
        run_api_server(ctx.clone(), args.port).await
    } else {
        let handler = CommandHandler::new(ctx.clone(), config.food.daily_goals);
        run_cli_mode(handler).await
    };

    ctx.enricher.shutdown();
    if let Some(worker) = worker {
        let _ = worker.await;
    }
    outcome
}

async fn run_cli_mode(mut handler: CommandHandler) -> Result<()> {
    println!("{}", "🥥 Recipe Enricher".bold());
    handler.handle_command("help").await.map_err(anyhow::Error::msg)?;

    let mut rl = Editor::<(), DefaultHistory>::new()?;

    loop {
        match rl.readline("👤 ") {
            Ok(line) => {
                let input = line.trim();
                let _ = rl.add_history_entry(input);

                match handler.handle_command(input).await {
                    Ok(CommandResult::Exit) => break,
                    Ok(CommandResult::Continue) => {}
                    Err(e) => println!("{}", e.red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

async fn run_api_server(ctx: AppContext, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = api::create_api(ctx.clone());

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    println!("Server successfully bound to {}", addr);

    let token = ctx.enricher.session().token();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = token.cancelled() => {}
            }
        })
        .await
        .context("Server error")?;

    Ok(())
}
