//! Request dispatcher: screening, routing and the hand-off to an agent.
//!
//! ```text
//! GenerateRequest ─► input present? ─► validator ─► RoutingStrategy ─► agent ─► artifact
//!                         │                │               │              │
//!                         └────────────────┴───────────────┴──────────────┴─► GenerateResponse::error
//! ```
//!
//! [`Dispatcher::route_request`] never fails: every error becomes an error
//! response. [`Dispatcher::dispatch`] keeps the typed error for callers that
//! need its [`ErrorKind`](crate::ErrorKind), such as the HTTP layer.

use crate::agents::{FeatureTestAgent, GherkinAgent, SeleniumScriptAgent, SharedModel};
use crate::artifact::{ArtifactKind, ArtifactStore, GeneratedArtifact};
use crate::config::{ForgeConfig, ModelProfiles, UiFramework};
use crate::error::ErrorContext;
use crate::model::ChatModelClient;
use crate::routing::{RoutingStrategy, TestCategory};
use crate::types::{GenerateRequest, GenerateResponse};
use crate::validation::RequestValidator;
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

pub const MISSING_INPUT: &str = "No requirement or text provided";
pub const NOT_MEANINGFUL: &str = "Please provide a meaningful request related to testing. Your input appears to be random text or too short.";

pub struct Dispatcher {
    model: SharedModel,
    models: ModelProfiles,
    store: ArtifactStore,
    validator: RequestValidator,
    strategy: RoutingStrategy,
    gherkin: GherkinAgent,
    selenium: SeleniumScriptAgent,
}

impl Dispatcher {
    /// Wire the agents around `model`. Routing starts out explicit.
    pub fn new(config: &ForgeConfig, model: SharedModel) -> Self {
        let store = ArtifactStore::new(config.output.clone());
        Self {
            gherkin: GherkinAgent::new(model.clone(), config.models.gherkin.clone(), store.clone()),
            selenium: SeleniumScriptAgent::new(
                model.clone(),
                config.models.selenium.clone(),
                store.clone(),
            ),
            model,
            models: config.models.clone(),
            store,
            validator: RequestValidator::new(),
            strategy: RoutingStrategy::default(),
        }
    }

    /// Dispatcher backed by the chat-completions client.
    pub fn from_config(config: &ForgeConfig) -> Result<Self> {
        let client = ChatModelClient::new(config)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn with_strategy(mut self, strategy: RoutingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn gherkin(&self) -> &GherkinAgent {
        &self.gherkin
    }

    pub fn selenium(&self) -> &SeleniumScriptAgent {
        &self.selenium
    }

    /// Feature-test agent for `framework`, sharing this dispatcher's model and store.
    pub fn feature_tests(&self, framework: UiFramework) -> FeatureTestAgent {
        FeatureTestAgent::new(
            self.model.clone(),
            self.models.feature_tests.clone(),
            self.store.clone(),
            framework,
        )
    }

    /// Handle a request end to end; failures come back as error responses.
    pub async fn route_request(&self, request: &GenerateRequest) -> GenerateResponse {
        match self.dispatch(request).await {
            Ok(artifact) => GenerateResponse::success(&artifact, success_message(&artifact.kind)),
            Err(e) => GenerateResponse::from(&e),
        }
    }

    /// Handle a request end to end, keeping the typed error.
    pub async fn dispatch(&self, request: &GenerateRequest) -> Result<GeneratedArtifact> {
        let span = info_span!(
            "dispatch",
            request_id = %Uuid::new_v4(),
            agent_type = %request.agent_type,
            strategy = self.strategy.name(),
            model = self.model.name(),
        );
        async {
            let result = self.try_dispatch(request).await;
            match &result {
                Ok(artifact) => info!(filename = %artifact.filename, "request completed"),
                Err(e) => warn!(kind = e.kind().name(), error = %e, "request failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Input presence and validator checks. Returns the text to generate from.
    pub fn screen<'r>(&self, request: &'r GenerateRequest) -> Result<&'r str> {
        let text = request.input_text().ok_or_else(|| {
            Error::validation_with_context(
                MISSING_INPUT,
                ErrorContext::new().with_field_path("requirement"),
            )
        })?;
        let verdict = self.validator.assess(Some(text));
        if !verdict.is_accepted() {
            return Err(Error::validation_with_context(
                NOT_MEANINGFUL,
                ErrorContext::new()
                    .with_field_path("requirement")
                    .with_details(verdict.reason()),
            ));
        }
        Ok(text)
    }

    async fn try_dispatch(&self, request: &GenerateRequest) -> Result<GeneratedArtifact> {
        let text = self.screen(request)?;
        let category = self.strategy.select(request)?;
        info!(category = %category, "request routed");

        match (self.strategy, category) {
            (RoutingStrategy::Content(framework), category) => {
                self.feature_tests(framework)
                    .generate_test_file(&request.to_feature(), category)
                    .await
            }
            (RoutingStrategy::Explicit, TestCategory::Gherkin) => {
                self.gherkin
                    .generate(text, request.feature_name(), request.iterations())
                    .await
            }
            (RoutingStrategy::Explicit, _) => {
                self.selenium
                    .generate(text, request.test_name(), request.language())
                    .await
            }
        }
    }
}

pub fn success_message(kind: &ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Feature => "Feature file generated successfully",
        ArtifactKind::Script => "Selenium test script generated successfully",
        ArtifactKind::FeatureTest(_) => "Test file generated successfully",
    }
}
