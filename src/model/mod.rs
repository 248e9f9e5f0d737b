//! # Model Module
//!
//! Everything that talks to a language model goes through [`TextModel`], a
//! single-capability interface: turn a [`Prompt`] into text.
//!
//! | Implementation | Use |
//! |----------------|-----|
//! | [`ChatModelClient`] | OpenAI-compatible `/chat/completions` over HTTP (Groq by default) |
//! | [`ScriptedModel`] | Canned replies with call counting, for tests and dry runs |

mod chat;
mod scripted;

pub use chat::{ChatModelClient, TransportError};
pub use scripted::ScriptedModel;

use crate::config::ModelSettings;
use crate::types::Message;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// One model invocation: system instructions, the user text, and sampling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub instructions: String,
    pub text: String,
    pub settings: ModelSettings,
}

impl Prompt {
    pub fn new(
        instructions: impl Into<String>,
        text: impl Into<String>,
        settings: ModelSettings,
    ) -> Self {
        Self {
            instructions: instructions.into(),
            text: text.into(),
            settings,
        }
    }

    /// Same instructions and settings, different user text.
    pub fn follow_up(&self, text: impl Into<String>) -> Self {
        Self {
            instructions: self.instructions.clone(),
            text: text.into(),
            settings: self.settings.clone(),
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(2);
        if !self.instructions.trim().is_empty() {
            messages.push(Message::system(self.instructions.clone()));
        }
        messages.push(Message::user(self.text.clone()));
        messages
    }
}

/// Text generation capability.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Generate a reply for `prompt`. Empty replies are an upstream error.
    async fn generate(&self, prompt: &Prompt) -> Result<String>;

    /// Short label for logs.
    fn name(&self) -> &str {
        "model"
    }
}

#[async_trait]
impl<T: TextModel + ?Sized> TextModel for Arc<T> {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        (**self).generate(prompt).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
