use crate::model::TransportError;
use std::time::Duration;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "request.featureName", "config.base_url")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "dispatcher", "gherkin_agent")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Coarse failure categories, used to pick an HTTP status and for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input too short, too random, or empty.
    Validation,
    /// Unrecognized agent type or unsupported language.
    Routing,
    /// The model call failed or returned nothing usable.
    Upstream,
    /// File extraction or file write failed.
    Io,
    /// Processing exceeded the allotted budget.
    Timeout,
    /// Missing or malformed configuration.
    Configuration,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Routing => "routing",
            Self::Upstream => "upstream",
            Self::Io => "io",
            Self::Timeout => "timeout",
            Self::Configuration => "configuration",
        }
    }
}

/// Unified error type for test-artifact generation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{message}")]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Unknown agent type: {0}. Use \"test_generator\" or \"selenium_generator\".")]
    UnknownAgentType(String),

    #[error("Currently only Python is supported for Selenium scripts (got {0})")]
    UnsupportedLanguage(String),

    #[error("Model error: {message}{}", format_context(.context))]
    Upstream {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("{message}")]
    Extraction {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Taking too long to generate (limit {}s). Please try with a simpler request or fewer scenarios.", .0.as_secs())]
    Timeout(Duration),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Error::Upstream {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn upstream_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Upstream {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Map this error onto the coarse failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } => ErrorKind::Validation,
            Error::UnknownAgentType(_) | Error::UnsupportedLanguage(_) => ErrorKind::Routing,
            Error::Upstream { .. } | Error::Transport(_) | Error::Serialization(_) => {
                ErrorKind::Upstream
            }
            Error::Extraction { .. } | Error::Io(_) => ErrorKind::Io,
            Error::Timeout(_) => ErrorKind::Timeout,
            Error::Configuration { .. } => ErrorKind::Configuration,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Validation { context, .. }
            | Error::Upstream { context, .. }
            | Error::Extraction { context, .. }
            | Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}
