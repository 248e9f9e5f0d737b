use super::SharedModel;
use crate::artifact::{ArtifactStore, GeneratedArtifact};
use crate::config::ModelSettings;
use crate::model::Prompt;
use crate::prompts::{selenium_script, SELENIUM_INSTRUCTIONS};
use crate::utils::{extract_fenced_block, sanitize_name, strip_think_blocks};
use crate::{Error, Result};
use tracing::info;

const DEFAULT_TEST_NAME: &str = "test_default";
const TEST_PREFIX: &str = "test_";
const SUPPORTED_LANGUAGE: &str = "python";

/// Single-shot Selenium script generation.
pub struct SeleniumScriptAgent {
    model: SharedModel,
    settings: ModelSettings,
    store: ArtifactStore,
}

impl SeleniumScriptAgent {
    pub fn new(model: SharedModel, settings: ModelSettings, store: ArtifactStore) -> Self {
        Self {
            model,
            settings,
            store,
        }
    }

    pub async fn generate(
        &self,
        requirement: &str,
        test_name: Option<&str>,
        language: Option<&str>,
    ) -> Result<GeneratedArtifact> {
        let language = language.map(str::trim).unwrap_or(SUPPORTED_LANGUAGE);
        if !language.eq_ignore_ascii_case(SUPPORTED_LANGUAGE) {
            return Err(Error::UnsupportedLanguage(language.to_string()));
        }
        let filename = script_file_name(test_name);

        let prompt = Prompt::new(
            SELENIUM_INSTRUCTIONS,
            selenium_script(requirement),
            self.settings.clone(),
        );
        let reply = strip_think_blocks(&self.model.generate(&prompt).await?);
        let code = extract_fenced_block(&reply, SUPPORTED_LANGUAGE)
            .map(|block| block.trim().to_string())
            .unwrap_or_else(|| reply.trim().to_string());
        if code.is_empty() {
            return Err(Error::upstream("Model returned an empty script"));
        }

        let artifact = self.store.write_script(&filename, &code)?;
        info!(filename = %artifact.filename, "selenium script generated");
        Ok(artifact)
    }
}

/// `test_<sanitized test name>.py`, `test_default.py` when no usable name is
/// given. A name that already carries the `test_` prefix keeps a single one.
pub fn script_file_name(test_name: Option<&str>) -> String {
    let raw = test_name.map(str::trim).unwrap_or_default();
    let raw = raw.strip_suffix(".py").unwrap_or(raw);
    match sanitize_name(raw) {
        s if s.is_empty() => format!("{}.py", DEFAULT_TEST_NAME),
        s if s.starts_with(TEST_PREFIX) => format!("{}.py", s),
        s => format!("{}{}.py", TEST_PREFIX, s),
    }
}
