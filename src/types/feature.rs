//! Parsed Gherkin feature file.
//!
//! Only the shape the script generators need is kept: the feature name, the
//! free-text description above the first scenario and, per scenario, its name
//! plus `Given`/`When`/`Then`/`And` steps. Backgrounds, tags, comments, tables
//! and doc strings are dropped.
//!
//! Plain prose with no Gherkin keywords parses into a feature whose
//! description is the whole text, which is how free-text requests reach the
//! script generators.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

const STEP_KEYWORDS: [&str; 4] = ["Given", "When", "Then", "And"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureData {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub scenarios: Vec<Scenario>,
}

impl FeatureData {
    /// Parse feature text. `default_name` is used unless a `Feature:` line names it.
    pub fn parse(content: &str, default_name: impl Into<String>) -> Self {
        let mut feature = FeatureData {
            name: default_name.into(),
            ..Self::default()
        };
        let mut current: Option<Scenario> = None;
        let mut in_background = false;
        let mut description: Vec<&str> = Vec::new();

        for line in content.lines().map(str::trim) {
            if let Some(rest) = line.strip_prefix("Feature:") {
                feature.name = rest.trim().to_string();
            } else if line.starts_with("Background:") {
                in_background = true;
            } else if let Some(rest) = line.strip_prefix("Scenario:") {
                if let Some(done) = current.take() {
                    feature.scenarios.push(done);
                }
                current = Some(Scenario {
                    name: rest.trim().to_string(),
                    steps: Vec::new(),
                });
            } else if let Some(scenario) = current.as_mut() {
                if STEP_KEYWORDS.iter().any(|k| line.starts_with(k)) {
                    scenario.steps.push(line.to_string());
                }
            } else if !in_background
                && !line.is_empty()
                && !line.starts_with('#')
                && !line.starts_with('@')
            {
                description.push(line);
            }
        }

        if let Some(done) = current {
            feature.scenarios.push(done);
        }
        feature.description = description.join("\n");
        feature
    }

    /// Read and parse a `.feature` file; the file stem is the fallback name.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::parse(&content, stem))
    }

    /// Pretty JSON form; used both as classifier input and inside prompts.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn step_count(&self) -> usize {
        self.scenarios.iter().map(|s| s.steps.len()).sum()
    }
}
