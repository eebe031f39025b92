//! Generation backend trait and request type.

use async_trait::async_trait;

use crate::error::GenerationError;

/// One generation call: an instruction plus sampling limits.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// System instruction (tone and vocabulary rules).
    pub system: String,
    /// User prompt describing the message to write.
    pub prompt: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Temperature for sampling (0.0 to 2.0)
    pub temperature: f32,
}

/// Trait for text generation backends.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Get the backend name (e.g., "openai").
    fn name(&self) -> &'static str;

    /// Generate text for a request. The returned text is trimmed and non-empty.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}
