//! markwise-providers — AI tutor integrations.
//!
//! Implements the `TutorProvider` trait for Gemini and OpenAI-compatible
//! backends, plus the graceful-fallback wrapper that keeps provider failures
//! away from end users. The grading engine in `markwise-core` has no
//! dependency on anything here; only the surfaces that actually talk to a
//! model do.

pub mod class;
pub mod config;
pub mod error;
pub mod fallback;
pub mod gemini;
pub mod mock;
pub mod openai;
pub mod tutor;

pub use config::{create_provider, load_config, MarkwiseConfig, ProviderConfig};
pub use error::ProviderError;
pub use fallback::GracefulTutor;
pub use tutor::TutorProvider;
