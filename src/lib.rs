pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod options;
pub mod render;
pub mod session;

pub use client::{HttpRecipeService, RecipeService};
pub use config::AppConfig;
pub use error::{ServiceError, ValidationError};
pub use model::{FormState, FormVariant, OptionsCatalog, ParsedRecipe, RecipeRequest, RecipeResult};
pub use normalize::{normalize_response, RecipePayload};
pub use session::{Session, SubmitOutcome, ViewState};

/// Build a session talking HTTP to the service described by `config`
pub fn session_from_config(config: &AppConfig) -> Result<Session, ServiceError> {
    let service = HttpRecipeService::new(config)?;
    Ok(Session::new(Box::new(service), config.variant))
}

/// Generate a recipe for a list of ingredients with default settings
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recipe = recipe_generator::generate_recipe("chicken, rice, broccoli").await?;
/// println!("{}", recipe.instructions_block());
/// # Ok(())
/// # }
/// ```
pub async fn generate_recipe(ingredients: &str) -> Result<ParsedRecipe, Box<dyn std::error::Error>> {
    let config = AppConfig::default();
    let form = FormState {
        ingredients_text: ingredients.to_string(),
        ..FormState::default()
    };
    let request = session::build_request(&form, FormVariant::IngredientsOnly)?;
    let service = HttpRecipeService::new(&config)?;
    Ok(service.generate(&request).await?)
}
