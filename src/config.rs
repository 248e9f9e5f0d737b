//! Runtime configuration.
//!
//! Configuration is resolved once, at startup, and handed to each component by
//! value or reference. Nothing below the binary reads the process environment
//! on its own; [`ForgeConfig::load`] is the one place that does.
//!
//! Sources, lowest to highest priority:
//!
//! 1. built-in defaults
//! 2. a YAML file (`--config <path>` or `BDD_FORGE_CONFIG`)
//! 3. environment variables
//!
//! | Variable | Field |
//! |----------|-------|
//! | `GROQ_API_KEY` | `api_key` |
//! | `BDD_FORGE_BASE_URL` | `base_url` |
//! | `BDD_FORGE_OUTPUT_DIR` | `output.root` |
//! | `BDD_FORGE_FRAMEWORK` | `framework` |
//! | `BDD_FORGE_REQUEST_TIMEOUT_SECS` | `request_timeout_secs` |
//! | `BDD_FORGE_HTTP_TIMEOUT_SECS` | `http_timeout_secs` |
//! | `BDD_FORGE_PROXY_URL` | `proxy_url` |

use crate::error::ErrorContext;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const KEYRING_SERVICE: &str = "bdd-forge";
pub const KEYRING_USER: &str = "groq";

/// UI automation framework used when content routing falls through to a UI path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UiFramework {
    #[default]
    Selenium,
    Playwright,
}

impl UiFramework {
    pub fn as_str(&self) -> &'static str {
        match self {
            UiFramework::Selenium => "selenium",
            UiFramework::Playwright => "playwright",
        }
    }

    /// Title-cased name, as used in prompts.
    pub fn title(&self) -> &'static str {
        match self {
            UiFramework::Selenium => "Selenium",
            UiFramework::Playwright => "Playwright",
        }
    }
}

impl fmt::Display for UiFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UiFramework {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "selenium" => Ok(UiFramework::Selenium),
            "playwright" => Ok(UiFramework::Playwright),
            other => Err(Error::configuration_with_context(
                "Framework must be either 'playwright' or 'selenium'",
                ErrorContext::new()
                    .with_field_path("framework")
                    .with_details(other.to_string()),
            )),
        }
    }
}

/// Sampling parameters for one generation path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
}

impl ModelSettings {
    pub fn gherkin() -> Self {
        Self {
            model: "deepseek-r1-distill-llama-70b".to_string(),
            temperature: 0.6,
            max_tokens: 1024,
            top_p: 0.95,
        }
    }

    pub fn selenium() -> Self {
        Self {
            model: "mixtral-8x7b-32768".to_string(),
            temperature: 0.7,
            max_tokens: 4000,
            top_p: 0.95,
        }
    }

    pub fn feature_tests() -> Self {
        Self {
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.7,
            max_tokens: 4000,
            top_p: 0.95,
        }
    }
}

/// Per-path model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelProfiles {
    pub gherkin: ModelSettings,
    pub selenium: ModelSettings,
    pub feature_tests: ModelSettings,
}

impl Default for ModelProfiles {
    fn default() -> Self {
        Self {
            gherkin: ModelSettings::gherkin(),
            selenium: ModelSettings::selenium(),
            feature_tests: ModelSettings::feature_tests(),
        }
    }
}

/// Where artifacts are written. Relative directories resolve against `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub features_dir: PathBuf,
    pub scripts_dir: PathBuf,
    pub generated_tests_dir: PathBuf,
    pub uploads_dir: PathBuf,
}

impl OutputLayout {
    /// Default layout rooted at `root`.
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    fn resolve(&self, dir: &Path) -> PathBuf {
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.root.join(dir)
        }
    }

    pub fn features(&self) -> PathBuf {
        self.resolve(&self.features_dir)
    }

    pub fn scripts(&self) -> PathBuf {
        self.resolve(&self.scripts_dir)
    }

    /// `generated_tests/<framework>`
    pub fn generated_tests(&self, framework: UiFramework) -> PathBuf {
        self.resolve(&self.generated_tests_dir).join(framework.as_str())
    }

    pub fn uploads(&self) -> PathBuf {
        self.resolve(&self.uploads_dir)
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            features_dir: PathBuf::from("features"),
            scripts_dir: PathBuf::from("test_scripts"),
            generated_tests_dir: PathBuf::from("generated_tests"),
            uploads_dir: PathBuf::from("uploads"),
        }
    }
}

/// Top-level configuration shared by the CLI and the HTTP server.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub proxy_url: Option<String>,
    /// Per-call HTTP timeout for the model client.
    pub http_timeout_secs: u64,
    /// Budget for one whole HTTP-facing generation request.
    pub request_timeout_secs: u64,
    pub framework: UiFramework,
    pub output: OutputLayout,
    pub models: ModelProfiles,
}

impl fmt::Debug for ForgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForgeConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("proxy_url", &self.proxy_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("framework", &self.framework)
            .field("output", &self.output)
            .field("models", &self.models)
            .finish()
    }
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            proxy_url: None,
            http_timeout_secs: 60,
            request_timeout_secs: 30,
            framework: UiFramework::default(),
            output: OutputLayout::default(),
            models: ModelProfiles::default(),
        }
    }
}

impl ForgeConfig {
    /// Parse a YAML document; missing keys fall back to defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            Error::configuration_with_context(
                "Invalid configuration file",
                ErrorContext::new().with_details(e.to_string()),
            )
        })
    }

    /// Load a YAML configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("Cannot read configuration file {}", path.display()),
                ErrorContext::new().with_details(e.to_string()),
            )
        })?;
        Self::from_yaml_str(&content)
    }

    /// Resolve the full configuration: defaults, then the optional file, then env.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = path
            .map(Path::to_path_buf)
            .or_else(|| env::var("BDD_FORGE_CONFIG").ok().map(PathBuf::from));

        let mut config = match file {
            Some(p) => Self::from_yaml_file(p)?,
            None => Self::default(),
        };
        config.apply_env()?;
        if config.api_key.is_none() {
            config.api_key = keyring_api_key();
        }
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(key) = non_empty_var("GROQ_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = non_empty_var("BDD_FORGE_BASE_URL") {
            self.base_url = url;
        }
        if let Some(proxy) = non_empty_var("BDD_FORGE_PROXY_URL") {
            self.proxy_url = Some(proxy);
        }
        if let Some(root) = non_empty_var("BDD_FORGE_OUTPUT_DIR") {
            self.output.root = PathBuf::from(root);
        }
        if let Some(framework) = non_empty_var("BDD_FORGE_FRAMEWORK") {
            self.framework = framework.parse()?;
        }
        if let Some(secs) = parse_var::<u64>("BDD_FORGE_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = secs;
        }
        if let Some(secs) = parse_var::<u64>("BDD_FORGE_HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = secs;
        }
        Ok(())
    }

    /// Check values that would otherwise fail late, at first use.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                "base_url is not a valid URL",
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(e.to_string()),
            )
        })?;
        if self.request_timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "request_timeout_secs must be positive",
                ErrorContext::new().with_field_path("request_timeout_secs"),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    non_empty_var(name).and_then(|s| s.parse::<T>().ok())
}

fn keyring_api_key() -> Option<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER).ok()?;
    entry.get_password().ok()
}
