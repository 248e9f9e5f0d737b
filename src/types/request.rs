//! Incoming generation request

use super::FeatureData;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_ITERATIONS: u32 = 2;
pub const MIN_ITERATIONS: u32 = 1;
pub const MAX_ITERATIONS: u32 = 3;
pub const DEFAULT_FEATURE_NAME: &str = "generated";

/// Declared generation mode of a request.
///
/// Matched case-insensitively; anything else is a routing error naming the
/// rejected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    /// Gherkin feature file with iterative self-critique.
    TestGenerator,
    /// Stand-alone Selenium script from a free-text requirement.
    SeleniumGenerator,
}

impl AgentType {
    pub const ALL: [AgentType; 2] = [AgentType::TestGenerator, AgentType::SeleniumGenerator];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::TestGenerator => "test_generator",
            AgentType::SeleniumGenerator => "selenium_generator",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        AgentType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or(Error::UnknownAgentType(wanted))
    }
}

/// One generation job. Field names follow the JSON wire format (camelCase).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub agent_type: String,
    #[serde(default)]
    pub requirement: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub feature_name: Option<String>,
    #[serde(default)]
    pub test_name: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub iterations: Option<i64>,
}

impl GenerateRequest {
    pub fn new(agent_type: impl Into<String>, requirement: impl Into<String>) -> Self {
        Self {
            agent_type: agent_type.into(),
            requirement: Some(requirement.into()),
            ..Self::default()
        }
    }

    pub fn with_feature_name(mut self, name: impl Into<String>) -> Self {
        self.feature_name = Some(name.into());
        self
    }

    pub fn with_test_name(mut self, name: impl Into<String>) -> Self {
        self.test_name = Some(name.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_iterations(mut self, iterations: i64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// The text to validate and generate from: `requirement`, else `text`.
    pub fn input_text(&self) -> Option<&str> {
        non_empty(&self.requirement).or_else(|| non_empty(&self.text))
    }

    pub fn agent_type(&self) -> Result<AgentType> {
        self.agent_type.parse()
    }

    /// Refinement rounds, defaulting to 2 and clamped to [1, 3].
    pub fn iterations(&self) -> u32 {
        clamp_iterations(self.iterations.unwrap_or(DEFAULT_ITERATIONS as i64))
    }

    pub fn feature_name(&self) -> Option<&str> {
        non_empty(&self.feature_name).map(str::trim)
    }

    pub fn test_name(&self) -> Option<&str> {
        non_empty(&self.test_name).map(str::trim)
    }

    pub fn language(&self) -> Option<&str> {
        non_empty(&self.language).map(str::trim)
    }

    /// The input text read as a feature, for content routing. Named by a
    /// `Feature:` line, else `featureName`, else `testName`, else `generated`.
    pub fn to_feature(&self) -> FeatureData {
        let name = self
            .feature_name()
            .or_else(|| self.test_name())
            .unwrap_or(DEFAULT_FEATURE_NAME);
        FeatureData::parse(self.input_text().unwrap_or_default(), name)
    }
}

pub fn clamp_iterations(raw: i64) -> u32 {
    raw.clamp(MIN_ITERATIONS as i64, MAX_ITERATIONS as i64) as u32
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
