//! Generation-path selection.
//!
//! Two independent policies pick one [`TestCategory`] per request:
//!
//! - [`RoutingStrategy::Explicit`] trusts the declared `agentType` and fails on
//!   anything it does not know.
//! - [`RoutingStrategy::Content`] ignores the declared type and looks for
//!   database, then API vocabulary in the request read as a feature
//!   ([`GenerateRequest::to_feature`]), falling back to the configured UI
//!   framework. The same serialized feature is what the script prompt embeds.
//!
//! This module is pure logic: no I/O, no model calls.

use crate::config::UiFramework;
use crate::types::{AgentType, GenerateRequest};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DATABASE_KEYWORDS: &[&str] = &[
    "database",
    "sql",
    "crud",
    "schema",
    "table",
    "query",
    "stored procedure",
    "transaction",
    "rollback",
];

pub const API_KEYWORDS: &[&str] = &[
    "api",
    "endpoint",
    "http",
    "rest",
    "request",
    "response",
    "json",
    "header",
    "status code",
];

/// Ordered content rules; earlier entries win.
pub const CONTENT_RULES: &[(TestCategory, &[&str])] = &[
    (TestCategory::Database, DATABASE_KEYWORDS),
    (TestCategory::Api, API_KEYWORDS),
];

/// Closed set of generation paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestCategory {
    #[serde(rename = "database")]
    Database,
    #[serde(rename = "api")]
    Api,
    #[serde(rename = "ui-playwright")]
    UiPlaywright,
    #[serde(rename = "ui-selenium")]
    UiSelenium,
    #[serde(rename = "gherkin")]
    Gherkin,
}

impl TestCategory {
    pub fn tag(&self) -> &'static str {
        match self {
            TestCategory::Database => "database",
            TestCategory::Api => "api",
            TestCategory::UiPlaywright => "ui-playwright",
            TestCategory::UiSelenium => "ui-selenium",
            TestCategory::Gherkin => "gherkin",
        }
    }

    /// UI path for a framework.
    pub fn ui(framework: UiFramework) -> Self {
        match framework {
            UiFramework::Selenium => TestCategory::UiSelenium,
            UiFramework::Playwright => TestCategory::UiPlaywright,
        }
    }
}

impl fmt::Display for TestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// First rule whose keyword set has a member contained in `content_lower`.
///
/// `content_lower` must already be lowercased.
pub fn first_match<'r, 'k, I, K>(content_lower: &str, rules: I) -> Option<TestCategory>
where
    I: IntoIterator<Item = &'r (TestCategory, K)>,
    K: AsRef<[&'k str]> + 'r,
{
    rules
        .into_iter()
        .find(|(_, keywords)| {
            keywords
                .as_ref()
                .iter()
                .any(|k| content_lower.contains(*k))
        })
        .map(|(category, _)| *category)
}

/// Content-based routing with the built-in rules.
pub fn classify_content(content: &str, framework: UiFramework) -> TestCategory {
    first_match(&content.to_lowercase(), CONTENT_RULES).unwrap_or(TestCategory::ui(framework))
}

/// Explicit routing: declared agent type to path.
pub fn route_agent_type(agent_type: &str) -> Result<TestCategory> {
    Ok(match agent_type.parse::<AgentType>()? {
        AgentType::TestGenerator => TestCategory::Gherkin,
        AgentType::SeleniumGenerator => TestCategory::UiSelenium,
    })
}

/// Named routing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutingStrategy {
    /// Route on the declared `agentType`.
    #[default]
    Explicit,
    /// Route on request content; UI requests go to the given framework.
    Content(UiFramework),
}

impl RoutingStrategy {
    pub fn select(&self, request: &GenerateRequest) -> Result<TestCategory> {
        match self {
            RoutingStrategy::Explicit => route_agent_type(&request.agent_type),
            RoutingStrategy::Content(framework) => Ok(classify_content(
                &request.to_feature().to_pretty_json()?,
                *framework,
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RoutingStrategy::Explicit => "explicit",
            RoutingStrategy::Content(_) => "content",
        }
    }
}
