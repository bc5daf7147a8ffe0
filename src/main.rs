use anyhow::{Context, Result};
use menyplan::cli::{parse_args, read_recipes_file, Command, GenerateArgs};
use menyplan::config::PlannerConfig;
use menyplan::{server, MealPlanner, Recipe, ShoppingList};
use std::env;
use std::sync::Arc;

fn init_logger() {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(log::LevelFilter::Info)
        .filter_module(
            "menyplan",
            if env::var(pretty_env_logger::env_logger::DEFAULT_FILTER_ENV).unwrap_or_default()
                == "debug"
            {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Info
            },
        )
        .init();
}

fn print_recipes(recipes: &[Recipe], as_text: bool) -> Result<()> {
    if as_text {
        for recipe in recipes {
            println!("{}", recipe.share_text());
            if let Some(url) = &recipe.image_url {
                println!("Bild: {}", url);
            }
            println!();
        }
    } else {
        println!("{}", serde_json::to_string_pretty(recipes)?);
    }
    Ok(())
}

fn print_shopping_list(list: &ShoppingList, as_text: bool) -> Result<()> {
    if as_text {
        println!("{}", list.share_text());
    } else {
        println!("{}", serde_json::to_string_pretty(list)?);
    }
    Ok(())
}

async fn run_generate(planner: &MealPlanner, args: &GenerateArgs) -> Result<()> {
    let filters = args.filters();
    let recipes = planner
        .submit_filters(&filters)
        .await
        .context("Recipe generation failed")?;

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&recipes)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write recipes to '{}'", path.display()))?;
        log::info!("Recipes saved to {}", path.display());
    }

    print_recipes(&recipes, args.text)?;
    let list = planner.build_shopping_list(&recipes).await;
    print_shopping_list(&list, args.text)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logger();

    let cli = parse_args();
    let mut config = PlannerConfig::from_env();
    cli.options.apply(&mut config);
    let planner = MealPlanner::from_config(config, cli.options.offline_categories);

    match cli.command {
        Command::Generate(args) => run_generate(&planner, &args).await,
        Command::ShoppingList { recipes_file, text } => {
            let recipes = read_recipes_file(&recipes_file).await?;
            let list = planner.build_shopping_list(&recipes).await;
            print_shopping_list(&list, text)
        }
        Command::Serve { addr } => server::serve(Arc::new(planner), addr)
            .await
            .with_context(|| format!("HTTP server on {} failed", addr)),
    }
}
