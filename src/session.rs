//! View-state model for a single recipe form session.
//!
//! A [`Session`] owns the form, the options catalog and the current
//! [`RecipeResult`]. Submissions are numbered; only the response to the most
//! recent one is applied, so a late reply to an earlier request can never
//! overwrite a newer result.

use crate::client::RecipeService;
use crate::error::ValidationError;
use crate::model::{FormState, FormVariant, OptionsCatalog, RecipeRequest, RecipeResult};
use crate::options::load_options;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Snapshot of everything the view needs to draw
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Current form contents
    pub form: FormState,
    /// `None` until the options load has finished
    pub catalog: Option<OptionsCatalog>,
    /// Non-blocking warning banner
    pub warning: Option<String>,
    /// What the result area shows
    pub result: RecipeResult,
    /// The generate trigger is disabled while a request is in flight
    pub trigger_enabled: bool,
}

/// What happened to a submission that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The response was applied and is now the current result
    Applied(RecipeResult),
    /// A newer submission or a cancel superseded this one
    Discarded,
}

struct Inner {
    view: ViewState,
    latest_request: u64,
}

/// One form session: form, options, and the current result
pub struct Session {
    service: Box<dyn RecipeService>,
    variant: FormVariant,
    options_requested: AtomicBool,
    inner: Mutex<Inner>,
}

impl Session {
    /// Create a session with an empty form and the trigger enabled
    pub fn new(service: Box<dyn RecipeService>, variant: FormVariant) -> Self {
        Session {
            service,
            variant,
            options_requested: AtomicBool::new(false),
            inner: Mutex::new(Inner {
                view: ViewState {
                    trigger_enabled: true,
                    ..ViewState::default()
                },
                latest_request: 0,
            }),
        }
    }

    /// Form variant this session was created with
    pub fn variant(&self) -> FormVariant {
        self.variant
    }

    /// Load the options catalog. Only the first call does anything.
    pub async fn initialize(&self) {
        if self.options_requested.swap(true, Ordering::SeqCst) {
            debug!("Options already requested for this session");
            return;
        }

        let load = load_options(self.service.as_ref()).await;

        let mut inner = self.lock();
        let form = &mut inner.view.form;
        if form.selected_diet.is_empty() {
            if let Some(diet) = load.initial_diet() {
                form.selected_diet = diet.to_string();
            }
        }
        if form.selected_cuisine.is_empty() {
            if let Some(cuisine) = load.initial_cuisine() {
                form.selected_cuisine = cuisine.to_string();
            }
        }
        inner.view.warning = load.warning;
        inner.view.catalog = Some(load.catalog);
    }

    /// Replace the ingredients text
    pub fn set_ingredients(&self, text: impl Into<String>) {
        self.lock().view.form.ingredients_text = text.into();
    }

    /// Select a country, or clear the selection
    pub fn set_country(&self, country: Option<String>) {
        self.lock().view.form.selected_country = country;
    }

    /// Select a dietary preference
    pub fn set_diet(&self, diet: impl Into<String>) {
        self.lock().view.form.selected_diet = diet.into();
    }

    /// Select a cuisine
    pub fn set_cuisine(&self, cuisine: impl Into<String>) {
        self.lock().view.form.selected_cuisine = cuisine.into();
    }

    /// Snapshot of the whole view state
    pub fn view(&self) -> ViewState {
        self.lock().view.clone()
    }

    /// Current recipe result
    pub fn result(&self) -> RecipeResult {
        self.lock().view.result.clone()
    }

    /// Whether the generate trigger accepts a click
    pub fn trigger_enabled(&self) -> bool {
        self.lock().view.trigger_enabled
    }

    /// Validate the form and request a recipe
    ///
    /// Invalid input is rejected before any request is made and leaves the
    /// current result untouched.
    pub async fn submit(&self) -> Result<SubmitOutcome, ValidationError> {
        let request = build_request(&self.lock().view.form, self.variant)?;

        let seq = self.begin();
        let _release = TriggerRelease { session: self, seq };

        info!("Requesting recipe #{} for: {}", seq, request.ingredients);
        let result = match self.service.generate(&request).await {
            Ok(recipe) => RecipeResult::Success(recipe),
            Err(e) => {
                debug!("Recipe request #{} failed: {}", seq, e);
                RecipeResult::Failure(e.user_message())
            }
        };

        Ok(self.finish(seq, result))
    }

    /// Abandon any in-flight request and return to the empty state
    pub fn cancel(&self) {
        let mut inner = self.lock();
        inner.latest_request += 1;
        inner.view.trigger_enabled = true;
        if inner.view.result.is_loading() {
            inner.view.result = RecipeResult::Empty;
        }
        info!("Cancelled pending recipe requests");
    }

    fn begin(&self) -> u64 {
        let mut inner = self.lock();
        inner.latest_request += 1;
        inner.view.result = RecipeResult::Loading;
        inner.view.trigger_enabled = false;
        inner.latest_request
    }

    fn finish(&self, seq: u64, result: RecipeResult) -> SubmitOutcome {
        let mut inner = self.lock();
        if seq != inner.latest_request {
            debug!(
                "Discarding stale response #{} (latest is #{})",
                seq, inner.latest_request
            );
            return SubmitOutcome::Discarded;
        }
        inner.view.result = result.clone();
        SubmitOutcome::Applied(result)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Re-enables the trigger when a submission ends, however it ends
struct TriggerRelease<'a> {
    session: &'a Session,
    seq: u64,
}

impl Drop for TriggerRelease<'_> {
    fn drop(&mut self) {
        let mut inner = self.session.lock();
        if inner.latest_request != self.seq {
            return;
        }
        inner.view.trigger_enabled = true;
        // Dropped before a response arrived
        if inner.view.result.is_loading() {
            inner.view.result = RecipeResult::Empty;
        }
    }
}

/// Check required fields and build the body for the given form variant
pub fn build_request(
    form: &FormState,
    variant: FormVariant,
) -> Result<RecipeRequest, ValidationError> {
    let ingredients = form.ingredients_text.trim();
    if ingredients.is_empty() {
        return Err(ValidationError::BlankIngredients);
    }

    let mut request = RecipeRequest {
        ingredients: ingredients.to_string(),
        country: None,
        dietary_preference: None,
        cuisine: None,
    };

    match variant {
        FormVariant::IngredientsOnly => {}
        FormVariant::WithCountry => {
            let country = form
                .selected_country
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .ok_or(ValidationError::BlankCountry)?;
            request.country = Some(country.to_string());
        }
        FormVariant::WithPreferences => {
            let cuisine = form.selected_cuisine.trim();
            if cuisine.is_empty() {
                return Err(ValidationError::BlankCuisine);
            }
            request.cuisine = Some(cuisine.to_string());
            request.dietary_preference = Some(form.selected_diet.trim().to_string());
        }
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ServiceError, CONNECTIVITY_FAILURE_MESSAGE};
    use crate::model::ParsedRecipe;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    type Reply = Result<ParsedRecipe, ServiceError>;

    /// Service whose replies are released by the test, one channel per call
    struct ScriptedService {
        options: Option<OptionsCatalog>,
        option_calls: Arc<AtomicUsize>,
        generate_calls: Arc<AtomicUsize>,
        replies: std::sync::Mutex<Vec<Option<oneshot::Receiver<Reply>>>>,
    }

    impl ScriptedService {
        fn new(replies: Vec<oneshot::Receiver<Reply>>) -> Self {
            ScriptedService {
                options: None,
                option_calls: Arc::new(AtomicUsize::new(0)),
                generate_calls: Arc::new(AtomicUsize::new(0)),
                replies: std::sync::Mutex::new(replies.into_iter().map(Some).collect()),
            }
        }
    }

    #[async_trait]
    impl RecipeService for ScriptedService {
        async fn fetch_options(&self) -> Result<OptionsCatalog, ServiceError> {
            self.option_calls.fetch_add(1, Ordering::SeqCst);
            self.options
                .clone()
                .ok_or_else(|| ServiceError::Client("options unavailable".to_string()))
        }

        async fn generate(&self, _request: &RecipeRequest) -> Result<ParsedRecipe, ServiceError> {
            let index = self.generate_calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.replies.lock().unwrap()[index]
                .take()
                .expect("reply already taken");
            reply.await.expect("reply sender dropped")
        }
    }

    fn recipe(step: &str) -> ParsedRecipe {
        ParsedRecipe {
            ingredients: vec!["eggs".to_string()],
            instructions: vec![step.to_string()],
        }
    }

    #[test]
    fn test_build_request_rejects_blank_ingredients() {
        for text in ["", "   ", "\n\t "] {
            let form = FormState {
                ingredients_text: text.to_string(),
                ..FormState::default()
            };
            for variant in [
                FormVariant::IngredientsOnly,
                FormVariant::WithCountry,
                FormVariant::WithPreferences,
            ] {
                assert_eq!(
                    build_request(&form, variant),
                    Err(ValidationError::BlankIngredients)
                );
            }
        }
    }

    #[test]
    fn test_build_request_per_variant() {
        let form = FormState {
            ingredients_text: "  chicken, rice ".to_string(),
            selected_country: Some(" Japan ".to_string()),
            selected_diet: "Vegan".to_string(),
            selected_cuisine: "Thai".to_string(),
        };

        let plain = build_request(&form, FormVariant::IngredientsOnly).unwrap();
        assert_eq!(plain.ingredients, "chicken, rice");
        assert_eq!(plain.country, None);
        assert_eq!(plain.cuisine, None);

        let country = build_request(&form, FormVariant::WithCountry).unwrap();
        assert_eq!(country.country.as_deref(), Some("Japan"));
        assert_eq!(country.dietary_preference, None);

        let prefs = build_request(&form, FormVariant::WithPreferences).unwrap();
        assert_eq!(prefs.country, None);
        assert_eq!(prefs.dietary_preference.as_deref(), Some("Vegan"));
        assert_eq!(prefs.cuisine.as_deref(), Some("Thai"));
    }

    #[test]
    fn test_build_request_requires_selectors() {
        let form = FormState {
            ingredients_text: "eggs".to_string(),
            selected_country: Some("  ".to_string()),
            ..FormState::default()
        };
        assert_eq!(
            build_request(&form, FormVariant::WithCountry),
            Err(ValidationError::BlankCountry)
        );
        assert_eq!(
            build_request(&form, FormVariant::WithPreferences),
            Err(ValidationError::BlankCuisine)
        );
    }

    #[tokio::test]
    async fn test_blank_submit_makes_no_call() {
        let service = ScriptedService::new(Vec::new());
        let calls = service.generate_calls.clone();
        let session = Session::new(Box::new(service), FormVariant::IngredientsOnly);
        session.set_ingredients("   ");

        let result = session.submit().await;

        assert_eq!(result, Err(ValidationError::BlankIngredients));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.result(), RecipeResult::Empty);
        assert!(session.trigger_enabled());
    }

    #[tokio::test]
    async fn test_submit_success_releases_trigger() {
        let (tx, rx) = oneshot::channel();
        let session = Session::new(
            Box::new(ScriptedService::new(vec![rx])),
            FormVariant::IngredientsOnly,
        );
        session.set_ingredients("eggs");
        tx.send(Ok(recipe("Scramble"))).unwrap();

        let outcome = session.submit().await.unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Applied(RecipeResult::Success(recipe("Scramble")))
        );
        assert!(session.trigger_enabled());
    }

    #[tokio::test]
    async fn test_submit_failure_releases_trigger() {
        let (tx, rx) = oneshot::channel();
        let session = Session::new(
            Box::new(ScriptedService::new(vec![rx])),
            FormVariant::IngredientsOnly,
        );
        session.set_ingredients("eggs");
        tx.send(Err(ServiceError::Client("boom".to_string()))).unwrap();

        session.submit().await.unwrap();

        assert_eq!(
            session.result(),
            RecipeResult::Failure(CONNECTIVITY_FAILURE_MESSAGE.to_string())
        );
        assert!(session.trigger_enabled());
    }

    #[tokio::test]
    async fn test_loading_disables_trigger_until_reply() {
        let (tx, rx) = oneshot::channel();
        let session = Session::new(
            Box::new(ScriptedService::new(vec![rx])),
            FormVariant::IngredientsOnly,
        );
        session.set_ingredients("eggs");

        let observe = async {
            tokio::task::yield_now().await;
            let view = session.view();
            tx.send(Ok(recipe("Boil"))).unwrap();
            view
        };
        let (outcome, during) = tokio::join!(session.submit(), observe);

        assert_eq!(during.result, RecipeResult::Loading);
        assert!(!during.trigger_enabled);
        assert!(matches!(outcome, Ok(SubmitOutcome::Applied(_))));
        assert!(session.trigger_enabled());
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        let session = Session::new(
            Box::new(ScriptedService::new(vec![rx1, rx2])),
            FormVariant::IngredientsOnly,
        );
        session.set_ingredients("eggs");

        let replies = async {
            tokio::task::yield_now().await;
            tx2.send(Ok(recipe("newer"))).unwrap();
            tokio::task::yield_now().await;
            tx1.send(Ok(recipe("older"))).unwrap();
        };
        let (first, second, ()) = tokio::join!(session.submit(), session.submit(), replies);

        assert_eq!(first, Ok(SubmitOutcome::Discarded));
        assert_eq!(
            second,
            Ok(SubmitOutcome::Applied(RecipeResult::Success(recipe("newer"))))
        );
        assert_eq!(session.result(), RecipeResult::Success(recipe("newer")));
        assert!(session.trigger_enabled());
    }

    #[tokio::test]
    async fn test_dropped_submit_returns_to_interactive() {
        let (_tx, rx) = oneshot::channel();
        let session = Session::new(
            Box::new(ScriptedService::new(vec![rx])),
            FormVariant::IngredientsOnly,
        );
        session.set_ingredients("eggs");

        tokio::select! {
            biased;
            _ = session.submit() => panic!("submit should still be pending"),
            _ = async {} => {}
        }

        assert_eq!(session.result(), RecipeResult::Empty);
        assert!(session.trigger_enabled());
    }

    #[tokio::test]
    async fn test_cancel_discards_in_flight_response() {
        let (tx, rx) = oneshot::channel();
        let session = Session::new(
            Box::new(ScriptedService::new(vec![rx])),
            FormVariant::IngredientsOnly,
        );
        session.set_ingredients("eggs");

        let cancel = async {
            tokio::task::yield_now().await;
            session.cancel();
            assert!(session.trigger_enabled());
            tx.send(Ok(recipe("late"))).unwrap();
        };
        let (outcome, ()) = tokio::join!(session.submit(), cancel);

        assert_eq!(outcome, Ok(SubmitOutcome::Discarded));
        assert_eq!(session.result(), RecipeResult::Empty);
    }

    #[tokio::test]
    async fn test_initialize_runs_once_and_selects_first_entries() {
        let mut service = ScriptedService::new(Vec::new());
        service.options = Some(OptionsCatalog {
            dietary_preferences: vec!["Keto".to_string(), "Vegan".to_string()],
            cuisines: vec!["Greek".to_string()],
        });
        let calls = service.option_calls.clone();
        let session = Session::new(Box::new(service), FormVariant::WithPreferences);

        session.initialize().await;
        session.initialize().await;

        let view = session.view();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(view.form.selected_diet, "Keto");
        assert_eq!(view.form.selected_cuisine, "Greek");
        assert!(view.warning.is_none());
    }

    #[tokio::test]
    async fn test_initialize_failure_uses_fallback() {
        let session = Session::new(
            Box::new(ScriptedService::new(Vec::new())),
            FormVariant::WithPreferences,
        );

        session.initialize().await;

        let view = session.view();
        assert_eq!(view.catalog, Some(OptionsCatalog::fallback()));
        assert!(view.warning.is_some());
        assert_eq!(view.form.selected_diet, "None");
        assert_eq!(view.form.selected_cuisine, "Any");
    }
}
