//! Plain-text rendering of a [`ViewState`].
//!
//! Recipe text from the server is always emitted as text, never interpreted
//! as markup.

use crate::model::RecipeResult;
use crate::session::ViewState;

/// Shown before the first submission
pub const EMPTY_RESULT_TEXT: &str = "Your recipe will appear here.";
/// Shown while a request is outstanding
pub const LOADING_TEXT: &str = "Generating...";

/// Label for the generate button
pub fn trigger_label(loading: bool) -> &'static str {
    if loading {
        LOADING_TEXT
    } else {
        "Generate Recipe"
    }
}

/// Render the warning banner and the result area
pub fn render(view: &ViewState) -> String {
    let mut output = String::new();

    if let Some(warning) = &view.warning {
        output.push_str(&format!("Warning: {}\n\n", warning));
    }

    match &view.result {
        RecipeResult::Empty => output.push_str(EMPTY_RESULT_TEXT),
        RecipeResult::Loading => output.push_str(LOADING_TEXT),
        RecipeResult::Failure(message) => output.push_str(&format!("Error: {}", message)),
        RecipeResult::Success(recipe) => {
            output.push_str("Ingredients:\n");
            output.push_str(&recipe.ingredients_block());
            output.push_str("\n\nInstructions:\n");
            output.push_str(&recipe.instructions_block());
        }
    }

    output
}
