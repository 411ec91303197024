use serde::{Deserialize, Serialize};

/// Shown in place of an empty ingredients list
pub const NO_INGREDIENTS_PLACEHOLDER: &str = "No ingredients found.";

/// Shown in place of an empty or missing instructions list
pub const NO_INSTRUCTIONS_PLACEHOLDER: &str = "No instructions provided.";

/// Which form fields are offered, and therefore which body is posted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormVariant {
    /// Ingredients only
    #[default]
    IngredientsOnly,
    /// Ingredients plus a required country
    WithCountry,
    /// Ingredients plus dietary preference and a required cuisine
    WithPreferences,
}

/// Values the user has typed or selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Free text, comma-separated
    pub ingredients_text: String,
    /// Country selector; only the country variant requires it
    pub selected_country: Option<String>,
    /// Dietary preference, pre-filled from the options catalog
    pub selected_diet: String,
    /// Cuisine, pre-filled from the options catalog
    pub selected_cuisine: String,
}

/// Selectable dietary preferences and cuisines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsCatalog {
    /// Offered in this order; the first is the default selection
    pub dietary_preferences: Vec<String>,
    /// Offered in this order; the first is the default selection
    pub cuisines: Vec<String>,
}

impl OptionsCatalog {
    /// Static catalog used when the options endpoint is unavailable
    pub fn fallback() -> Self {
        OptionsCatalog {
            dietary_preferences: [
                "None",
                "Vegetarian",
                "Vegan",
                "Gluten-Free",
                "Dairy-Free",
                "Keto",
                "Paleo",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            cuisines: [
                "Any",
                "Italian",
                "Mexican",
                "Chinese",
                "Indian",
                "Japanese",
                "Thai",
                "French",
                "Mediterranean",
                "American",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// A recipe split into its two sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRecipe {
    /// One cleaned line per ingredient
    pub ingredients: Vec<String>,
    /// Steps in order
    pub instructions: Vec<String>,
}

impl ParsedRecipe {
    /// Ingredients joined one per line, or the placeholder when there are none
    pub fn ingredients_block(&self) -> String {
        block_or(&self.ingredients, NO_INGREDIENTS_PLACEHOLDER)
    }

    /// Instructions joined one per line, or the placeholder when there are none
    pub fn instructions_block(&self) -> String {
        block_or(&self.instructions, NO_INSTRUCTIONS_PLACEHOLDER)
    }
}

fn block_or(lines: &[String], placeholder: &str) -> String {
    if lines.is_empty() {
        placeholder.to_string()
    } else {
        lines.join("\n")
    }
}

/// What the view currently shows. Exactly one variant holds at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RecipeResult {
    #[default]
    Empty,
    Loading,
    Success(ParsedRecipe),
    Failure(String),
}

impl RecipeResult {
    /// True while a request is outstanding
    pub fn is_loading(&self) -> bool {
        matches!(self, RecipeResult::Loading)
    }
}

/// JSON body posted to the recipe endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    /// Trimmed ingredients text
    pub ingredients: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blocks_fall_back_to_placeholders() {
        let recipe = ParsedRecipe::default();
        assert_eq!(recipe.ingredients_block(), NO_INGREDIENTS_PLACEHOLDER);
        assert_eq!(recipe.instructions_block(), NO_INSTRUCTIONS_PLACEHOLDER);
    }

    #[test]
    fn test_blocks_join_lines() {
        let recipe = ParsedRecipe {
            ingredients: vec!["2 eggs".to_string(), "1 cup flour".to_string()],
            instructions: vec!["Mix".to_string()],
        };
        assert_eq!(recipe.ingredients_block(), "2 eggs\n1 cup flour");
        assert_eq!(recipe.instructions_block(), "Mix");
    }

    #[test]
    fn test_request_omits_absent_fields() {
        let request = RecipeRequest {
            ingredients: "chicken, rice".to_string(),
            country: None,
            dietary_preference: Some("Vegan".to_string()),
            cuisine: Some("Thai".to_string()),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "ingredients": "chicken, rice",
                "dietaryPreference": "Vegan",
                "cuisine": "Thai"
            })
        );
    }

    #[test]
    fn test_catalog_uses_camel_case_wire_names() {
        let catalog: OptionsCatalog = serde_json::from_value(json!({
            "dietaryPreferences": ["Vegan"],
            "cuisines": ["Thai", "Greek"]
        }))
        .unwrap();
        assert_eq!(catalog.dietary_preferences, vec!["Vegan"]);
        assert_eq!(catalog.cuisines, vec!["Thai", "Greek"]);
    }

    #[test]
    fn test_fallback_catalog_is_not_empty() {
        let catalog = OptionsCatalog::fallback();
        assert_eq!(catalog.dietary_preferences[0], "None");
        assert_eq!(catalog.cuisines[0], "Any");
    }
}
