use clap::{Parser, ValueEnum};
use log::{debug, error};
use recipe_generator::render::render;
use recipe_generator::{session_from_config, AppConfig, FormVariant, RecipeResult, SubmitOutcome};
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    Plain,
    Country,
    Preferences,
}

impl From<VariantArg> for FormVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Plain => FormVariant::IngredientsOnly,
            VariantArg::Country => FormVariant::WithCountry,
            VariantArg::Preferences => FormVariant::WithPreferences,
        }
    }
}

/// Generate a recipe from a list of ingredients
#[derive(Debug, Parser)]
#[command(name = "recipe-generator", version, about)]
struct Cli {
    /// Ingredients separated by commas (e.g. "chicken, rice, broccoli")
    ingredients: String,

    /// Country whose cooking style to use
    #[arg(long)]
    country: Option<String>,

    /// Dietary preference (defaults to the first one offered)
    #[arg(long)]
    diet: Option<String>,

    /// Cuisine (defaults to the first one offered)
    #[arg(long)]
    cuisine: Option<String>,

    /// Which request shape to send; overrides the configured variant
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,

    /// Base URL of the recipe service
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds (0 disables it)
    #[arg(long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(variant) = cli.variant {
        config.variant = variant.into();
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout = timeout;
    }
    debug!("{:?}", config);

    let session = match session_from_config(&config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if config.variant == FormVariant::WithPreferences {
        session.initialize().await;
    }
    session.set_ingredients(cli.ingredients);
    session.set_country(cli.country);
    if let Some(diet) = cli.diet {
        session.set_diet(diet);
    }
    if let Some(cuisine) = cli.cuisine {
        session.set_cuisine(cuisine);
    }

    match session.submit().await {
        Ok(SubmitOutcome::Applied(result)) => {
            println!("{}", render(&session.view()));
            if matches!(result, RecipeResult::Failure(_)) {
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Ok(SubmitOutcome::Discarded) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(2)
        }
    }
}
