use super::SharedModel;
use crate::artifact::{is_safe_file_name, ArtifactStore, GeneratedArtifact};
use crate::config::ModelSettings;
use crate::model::Prompt;
use crate::prompts::{evaluate_and_improve, gherkin_draft, GHERKIN_INSTRUCTIONS};
use crate::types::{MAX_ITERATIONS, MIN_ITERATIONS};
use crate::utils::{clean_reply, sanitize_name};
use crate::{Error, Result};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

const FEATURE_SUFFIX: &str = ".feature";

/// Drafts a feature file, then has the model critique and rewrite it a fixed
/// number of times.
pub struct GherkinAgent {
    model: SharedModel,
    settings: ModelSettings,
    store: ArtifactStore,
}

impl GherkinAgent {
    pub fn new(model: SharedModel, settings: ModelSettings, store: ArtifactStore) -> Self {
        Self {
            model,
            settings,
            store,
        }
    }

    /// Initial draft plus `iterations` refinement rounds, `1 + iterations` model
    /// calls in total. Nothing is written.
    pub async fn refine(&self, requirement: &str, iterations: u32) -> Result<String> {
        let rounds = iterations.clamp(MIN_ITERATIONS, MAX_ITERATIONS);
        let prompt = Prompt::new(
            GHERKIN_INSTRUCTIONS,
            gherkin_draft(requirement),
            self.settings.clone(),
        );
        let mut content = self.ask(&prompt).await?;
        debug!(chars = content.len(), "initial gherkin draft");

        for round in 1..=rounds {
            content = self
                .ask(&prompt.follow_up(evaluate_and_improve(&content)))
                .await?;
            debug!(round, chars = content.len(), "gherkin draft refined");
        }
        Ok(content)
    }

    /// Refine and write `features/<name>.feature`.
    pub async fn generate(
        &self,
        requirement: &str,
        feature_name: Option<&str>,
        iterations: u32,
    ) -> Result<GeneratedArtifact> {
        let stem = feature_stem(feature_name);
        let content = self.refine(requirement, iterations).await?;
        let artifact = self.store.write_feature(&stem, &content)?;
        info!(filename = %artifact.filename, "feature file generated");
        Ok(artifact)
    }

    async fn ask(&self, prompt: &Prompt) -> Result<String> {
        let reply = clean_reply(&self.model.generate(prompt).await?, "gherkin");
        if reply.is_empty() {
            return Err(Error::upstream("Model returned an empty feature file"));
        }
        Ok(reply)
    }
}

/// File stem for a feature file.
///
/// Missing names become `feature_<unix-millis>`; a trailing `.feature` is
/// dropped so it is not doubled; anything that is not a bare file name is
/// sanitized.
pub fn feature_stem(name: Option<&str>) -> String {
    let raw = name.map(str::trim).unwrap_or_default();
    let raw = raw.strip_suffix(FEATURE_SUFFIX).unwrap_or(raw);
    if raw.is_empty() {
        return timestamped_stem();
    }
    if is_safe_file_name(raw) {
        return raw.to_string();
    }
    match sanitize_name(raw) {
        s if s.is_empty() => timestamped_stem(),
        s => s,
    }
}

fn timestamped_stem() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("feature_{}", millis)
}
