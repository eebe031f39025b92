//! Language generation backend.
//!
//! - [`TextGenerator`] is the seam the composer calls through
//! - [`OpenAiGenerator`] implements it against the chat completions API

pub mod openai;
pub mod provider;

pub use openai::OpenAiGenerator;
pub use provider::{GenerationRequest, TextGenerator};
