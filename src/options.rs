use crate::client::RecipeService;
use crate::model::OptionsCatalog;
use log::{info, warn};

/// Warning shown when the options endpoint could not be used
pub const OPTIONS_FALLBACK_WARNING: &str =
    "Could not load dietary preferences and cuisines. Using default options.";

/// Outcome of the startup options load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsLoad {
    pub catalog: OptionsCatalog,
    /// Non-blocking warning to show when the fallback catalog is in use
    pub warning: Option<String>,
}

impl OptionsLoad {
    /// First dietary preference, used as the initial selection
    pub fn initial_diet(&self) -> Option<&str> {
        self.catalog.dietary_preferences.first().map(String::as_str)
    }

    /// First cuisine, used as the initial selection
    pub fn initial_cuisine(&self) -> Option<&str> {
        self.catalog.cuisines.first().map(String::as_str)
    }
}

/// Fetch the options catalog, falling back to the static set on any failure
///
/// There is no retry: a failure here is final for the session.
pub async fn load_options(service: &dyn RecipeService) -> OptionsLoad {
    match service.fetch_options().await {
        Ok(catalog) => {
            info!(
                "Options loaded: {} dietary preferences, {} cuisines",
                catalog.dietary_preferences.len(),
                catalog.cuisines.len()
            );
            OptionsLoad {
                catalog,
                warning: None,
            }
        }
        Err(e) => {
            warn!("Failed to load options, using defaults: {}", e);
            OptionsLoad {
                catalog: OptionsCatalog::fallback(),
                warning: Some(OPTIONS_FALLBACK_WARNING.to_string()),
            }
        }
    }
}
