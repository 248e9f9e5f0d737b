//! # bdd-forge
//!
//! Turns plain-language test requirements into BDD artifacts with a language
//! model: Gherkin feature files, Selenium scripts, and pytest files for
//! database, API and UI (Selenium or Playwright) testing.
//!
//! ## Overview
//!
//! A request is screened by a heuristic validator, routed to one generation
//! path, turned into a prompt, sent to the model and written to disk as the
//! final step. The Gherkin path additionally asks the model to critique and
//! rewrite its own draft a fixed number of times.
//!
//! ## Routing
//!
//! - **Explicit**: the declared `agentType` (`test_generator`,
//!   `selenium_generator`) picks the path. Unknown types are an error.
//! - **Content**: database vocabulary wins, then API vocabulary, else the
//!   configured UI framework.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bdd_forge::{Dispatcher, ForgeConfig, GenerateRequest};
//!
//! #[tokio::main]
//! async fn main() -> bdd_forge::Result<()> {
//!     let config = ForgeConfig::load(None)?;
//!     let dispatcher = Dispatcher::from_config(&config)?;
//!
//!     let request = GenerateRequest::new(
//!         "test_generator",
//!         "User can log in with valid credentials and sees a welcome page",
//!     )
//!     .with_feature_name("login");
//!
//!     let response = dispatcher.route_request(&request).await;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`validation`] | Heuristic request validator |
//! | [`routing`] | Explicit and content-based path selection |
//! | [`model`] | `TextModel` interface, chat-completions client, scripted stub |
//! | [`prompts`] | Per-path instructions and prompt templates |
//! | [`agents`] | Gherkin, Selenium and feature-test generators |
//! | [`artifact`] | Output layout and artifact persistence |
//! | [`dispatcher`] | Screening plus routing plus error capture |
//! | [`extract`] | Text extraction from uploaded documents |
//! | [`server`] | HTTP API |
//! | [`config`] | Layered configuration |
//! | [`types`] | Requests, responses, parsed features, chat messages |

pub mod agents;
pub mod artifact;
pub mod config;
pub mod dispatcher;
pub mod extract;
pub mod model;
pub mod prompts;
pub mod routing;
pub mod server;
pub mod types;
pub mod utils;
pub mod validation;

pub use config::{ForgeConfig, UiFramework};
pub use dispatcher::Dispatcher;
pub use model::{Prompt, TextModel};
pub use routing::{RoutingStrategy, TestCategory};
pub use types::{AgentType, GenerateRequest, GenerateResponse, Message, MessageRole};
pub use validation::{RequestValidator, Verdict};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, ErrorKind};
