//! Structured result of a generation request

use crate::artifact::GeneratedArtifact;
use crate::Error;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// `{status, content, message, filename?}` as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub content: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl GenerateResponse {
    pub fn success(artifact: &GeneratedArtifact, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            content: artifact.content.clone(),
            message: message.into(),
            filename: Some(artifact.filename.clone()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            content: String::new(),
            message: message.into(),
            filename: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

impl From<&Error> for GenerateResponse {
    fn from(err: &Error) -> Self {
        GenerateResponse::error(err.to_string())
    }
}
