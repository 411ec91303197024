use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::model::{OptionsCatalog, ParsedRecipe, RecipeRequest};
use crate::normalize::normalize_response;
use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

/// Remote collaborator that supplies options and generates recipes
#[async_trait]
pub trait RecipeService: Send + Sync {
    /// Fetch the selectable dietary preferences and cuisines
    async fn fetch_options(&self) -> Result<OptionsCatalog, ServiceError>;

    /// Generate a recipe and normalize the response
    async fn generate(&self, request: &RecipeRequest) -> Result<ParsedRecipe, ServiceError>;
}

/// [`RecipeService`] backed by a JSON-over-HTTP API
pub struct HttpRecipeService {
    client: Client,
    base_url: String,
    recipe_path: String,
    options_path: String,
}

impl HttpRecipeService {
    /// Create a service from configuration
    ///
    /// A `timeout` of 0 disables the request timeout.
    pub fn new(config: &AppConfig) -> Result<Self, ServiceError> {
        let mut builder =
            Client::builder().user_agent(concat!("recipe-generator/", env!("CARGO_PKG_VERSION")));
        if config.timeout > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout));
        } else {
            warn!("Request timeout disabled");
        }
        let client = builder
            .build()
            .map_err(|e| ServiceError::Client(e.to_string()))?;

        Ok(HttpRecipeService {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            recipe_path: config.recipe_path.clone(),
            options_path: config.options_path.clone(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ServiceError> {
        let config = AppConfig {
            base_url: base_url.into(),
            ..AppConfig::default()
        };
        Self::new(&config)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl RecipeService for HttpRecipeService {
    async fn fetch_options(&self) -> Result<OptionsCatalog, ServiceError> {
        let url = self.url(&self.options_path);
        debug!("Fetching options from {}", url);

        let response = self.client.get(&url).send().await?;
        let response = ensure_success(response).await?;
        let catalog: OptionsCatalog = response.json().await?;

        debug!(
            "Loaded {} dietary preferences and {} cuisines",
            catalog.dietary_preferences.len(),
            catalog.cuisines.len()
        );
        Ok(catalog)
    }

    async fn generate(&self, request: &RecipeRequest) -> Result<ParsedRecipe, ServiceError> {
        let url = self.url(&self.recipe_path);
        debug!("Posting recipe request to {}: {:?}", url, request);

        let response = match self.client.post(&url).json(request).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Recipe request failed: {}", e);
                return Err(e.into());
            }
        };
        let response = ensure_success(response).await?;

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                error!("Recipe response was not valid JSON: {}", e);
                return Err(e.into());
            }
        };
        debug!("{:?}", body);

        Ok(normalize_response(&body))
    }
}

/// Turn a non-success response into [`ServiceError::Server`]
///
/// The `error` field of a JSON body is used as the message when present.
async fn ensure_success(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body["error"].as_str().map(String::from));

    error!(
        "Recipe service returned {}: {}",
        status,
        message.as_deref().unwrap_or("<no message>")
    );
    Err(ServiceError::Server {
        status: status.as_u16(),
        message,
    })
}
