//! # Generation Agents
//!
//! One agent per generation path. Each agent builds its path-specific
//! [`Prompt`](crate::model::Prompt), calls the shared [`TextModel`], cleans the
//! reply and hands it to the [`ArtifactStore`](crate::artifact::ArtifactStore).
//! Writing the artifact is always the last step, so an agent that fails
//! leaves nothing on disk.
//!
//! | Agent | Path | Output |
//! |-------|------|--------|
//! | [`GherkinAgent`] | `test_generator` | `features/<name>.feature` |
//! | [`SeleniumScriptAgent`] | `selenium_generator` | `test_scripts/test_<name>.py` |
//! | [`FeatureTestAgent`] | content routing | `generated_tests/<framework>/test_<name>.py` |

pub mod gherkin;
pub mod selenium;

pub use feature_tests::{BatchReport, FeatureTestAgent, FileOutcome};
pub use gherkin::{feature_stem, GherkinAgent};
pub use selenium::{script_file_name, SeleniumScriptAgent};

use crate::model::TextModel;
use std::sync::Arc;

/// Model handle shared by every agent of a dispatcher.
pub type SharedModel = Arc<dyn TextModel>;
