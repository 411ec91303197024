use thiserror::Error;

/// Message shown when the server rejects a request without saying why
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate recipe.";

/// Message shown when the recipe service could not be reached at all
pub const CONNECTIVITY_FAILURE_MESSAGE: &str = "Unable to connect to the server.";

/// Form input rejected before any request is sent
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Ingredients field is empty or whitespace only
    #[error("Please enter some ingredients.")]
    BlankIngredients,

    /// Country selector is present but nothing is selected
    #[error("Please select a country.")]
    BlankCountry,

    /// Cuisine selector is present but nothing is selected
    #[error("Please select a cuisine.")]
    BlankCuisine,
}

/// Errors that can occur while talking to the recipe service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The service answered with a non-success status
    #[error("Server returned {status}: {}", .message.as_deref().unwrap_or(GENERIC_FAILURE_MESSAGE))]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// The request never produced a readable response
    #[error("Request failed: {0}")]
    Connectivity(#[from] reqwest::Error),

    /// Failed to build the HTTP client
    #[error("Client error: {0}")]
    Client(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ServiceError {
    /// Text to display for this failure
    ///
    /// Server-provided messages are shown as-is. Transport errors collapse to
    /// a fixed message so raw error text never reaches the view.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            ServiceError::Server { .. } => GENERIC_FAILURE_MESSAGE.to_string(),
            ServiceError::Connectivity(_) => CONNECTIVITY_FAILURE_MESSAGE.to_string(),
            ServiceError::Client(_) | ServiceError::Config(_) => {
                CONNECTIVITY_FAILURE_MESSAGE.to_string()
            }
        }
    }
}
