//! Turns a recipe service response body into a [`ParsedRecipe`].
//!
//! The service answers in one of two shapes:
//!
//! ```text
//! { "recipe": "Ingredients:\n...\nInstructions:\n..." }
//! { "recipe": { "ingredients": [...], "instructions": [...] } }
//! ```
//!
//! Anything else degrades to an empty recipe, which renders as placeholders.

use crate::model::ParsedRecipe;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static SECTION_DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)instructions:|steps:").expect("valid delimiter regex"));

static INGREDIENTS_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^ingredients:").expect("valid label regex"));

// One bullet run (•, *, -) or one "1." / "1)" number. A bare number is not a
// marker, so quantities like "2 eggs" survive.
static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[•*\-]+|\d+[.)])").expect("valid marker regex"));

/// The two payload shapes a recipe response can take
#[derive(Debug, Clone, PartialEq)]
pub enum RecipePayload {
    /// A single block of text with labelled sections
    PlainText(String),
    /// Separate arrays; `None` when the field is absent or not an array
    Structured {
        ingredients: Option<Vec<Value>>,
        instructions: Option<Vec<Value>>,
    },
}

impl RecipePayload {
    /// Pick the shape by looking at the `recipe` field of a response body
    pub fn from_body(body: &Value) -> Self {
        match &body["recipe"] {
            Value::String(text) => RecipePayload::PlainText(text.clone()),
            Value::Object(fields) => RecipePayload::Structured {
                ingredients: fields.get("ingredients").and_then(Value::as_array).cloned(),
                instructions: fields.get("instructions").and_then(Value::as_array).cloned(),
            },
            other => {
                warn!("Response has no usable recipe field: {}", other);
                RecipePayload::Structured {
                    ingredients: None,
                    instructions: None,
                }
            }
        }
    }

    /// Extract the ingredient and instruction lists
    pub fn normalize(&self) -> ParsedRecipe {
        match self {
            RecipePayload::PlainText(text) => split_plain_text(text),
            RecipePayload::Structured {
                ingredients,
                instructions,
            } => ParsedRecipe {
                ingredients: clean_entries(ingredients.as_deref().unwrap_or(&[])),
                instructions: clean_entries(instructions.as_deref().unwrap_or(&[])),
            },
        }
    }
}

/// Normalize a full response body
pub fn normalize_response(body: &Value) -> ParsedRecipe {
    RecipePayload::from_body(body).normalize()
}

/// Split a text recipe on the first "Instructions:" or "Steps:" label
pub fn split_plain_text(text: &str) -> ParsedRecipe {
    let (head, tail) = match SECTION_DELIMITER.find(text) {
        Some(m) => (&text[..m.start()], Some(&text[m.end()..])),
        None => {
            debug!("No instructions delimiter in recipe text");
            (text, None)
        }
    };

    let head = INGREDIENTS_LABEL.replace(head.trim(), "");

    ParsedRecipe {
        ingredients: block_lines(head.trim()),
        instructions: tail.map(|t| block_lines(t.trim())).unwrap_or_default(),
    }
}

/// Strip a leading bullet or step number and surrounding whitespace
pub fn strip_list_marker(entry: &str) -> &str {
    let mut rest = entry;
    while let Some(m) = LIST_MARKER.find(rest) {
        let after = &rest[m.end()..];
        // "1.5 cups" is a decimal, not step one
        if m.as_str().ends_with(['.', ')']) && after.starts_with(|c: char| c.is_ascii_digit()) {
            break;
        }
        rest = after;
    }
    rest.trim()
}

fn clean_entries(entries: &[Value]) -> Vec<String> {
    entries
        .iter()
        .filter_map(Value::as_str)
        .map(strip_list_marker)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

fn block_lines(block: &str) -> Vec<String> {
    if block.is_empty() {
        return Vec::new();
    }
    block.lines().map(|line| line.trim_end().to_string()).collect()
}
