//! # Types Module
//!
//! Data shapes that flow through generation: the incoming request, the
//! structured response, the parsed feature file consumed by the script
//! generators, and the chat message sent to the model.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`GenerateRequest`] | One generation job, as received over HTTP or built by the CLI |
//! | [`AgentType`] | Declared generation mode of a request |
//! | [`GenerateResponse`] | `{status, content, message, filename?}` result |
//! | [`FeatureData`] | Parsed `.feature` file (name, description, scenarios) |
//! | [`Message`] | Chat message with a role and text content |
//!
//! ## Example
//!
//! ```rust
//! use bdd_forge::types::{AgentType, GenerateRequest};
//!
//! let request = GenerateRequest::new("test_generator", "User logs in with valid credentials")
//!     .with_feature_name("login")
//!     .with_iterations(7);
//!
//! assert_eq!(request.iterations(), 3);
//! assert_eq!(request.agent_type().unwrap(), AgentType::TestGenerator);
//! ```

pub mod feature;
pub mod message;
pub mod request;
pub mod response;

pub use feature::{FeatureData, Scenario};
pub use message::{Message, MessageRole};
pub use request::{
    clamp_iterations, AgentType, GenerateRequest, DEFAULT_ITERATIONS, MAX_ITERATIONS,
    MIN_ITERATIONS,
};
pub use response::{GenerateResponse, ResponseStatus};
