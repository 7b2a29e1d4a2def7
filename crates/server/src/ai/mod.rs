//! Generative text providers

pub mod gemini;
pub mod groq;

use async_trait::async_trait;
use medsupply_core::ProviderError;

pub use gemini::GeminiClient;
pub use groq::GroqClient;

/// Per-call generation switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Let the provider retrieve web context on its own, if it can
    pub grounding: bool,
    /// Ask the provider to answer with JSON only
    pub json_mode: bool,
}

impl GenerateOptions {
    pub fn json() -> Self {
        Self {
            grounding: false,
            json_mode: true,
        }
    }

    pub fn grounded_json() -> Self {
        Self {
            grounding: true,
            json_mode: true,
        }
    }
}

/// A backend that turns a prompt into raw text (expected to contain JSON).
///
/// Implementations never panic or propagate transport errors past this
/// boundary: every failure comes back as a [`ProviderError`].
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name, also used in provenance tags ("Verified via gemini")
    fn name(&self) -> &'static str;

    /// Whether a credential is configured
    fn is_configured(&self) -> bool;

    async fn generate(&self, prompt: &str, options: GenerateOptions)
    -> Result<String, ProviderError>;
}
