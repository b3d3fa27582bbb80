//! Generation orchestration and the pipeline facade for PostPilot.
//!
//! [`GenerationOrchestrator`] runs one generation attempt and records it.
//! [`PipelineFacade`] is the entry point request handlers call: it validates
//! input, checks network credentials, and delegates to the orchestrator, the
//! publisher, and the withdrawer.

#![warn(missing_docs)]

mod settings;
mod facade;
mod orchestrator;

pub use settings::{
    Environment, GenerationSettings, GenerationSettingsBuilder, ListSettings, LogFormat,
    LoggingSettings, PipelineConfig, PipelineConfigBuilder, StorageSettings,
};
pub use facade::{MAX_POST_CHARS, MAX_TOPIC_CHARS, MIN_TOPIC_CHARS, PipelineFacade};
pub use orchestrator::{GenerationOrchestrator, GenerationOutcome, PREVIEW_CHARS, preview};
