//! External estimation provider
//!
//! The model is an opaque collaborator: it gets the image plus the prompt
//! bundle and answers with text. Validation of that text happens in the
//! orchestrator, never in the provider.

use crate::error::Result;
use async_trait::async_trait;
use jacket_ai_common::{ImagePayload, Language, PromptBundle};

/// One multimodal call
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationRequest {
    pub image: ImagePayload,
    pub prompt: PromptBundle,
    pub language: Language,
}

#[async_trait]
pub trait EstimationProvider: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Run the call and return the raw response text (may be empty)
    async fn generate(&self, request: &EstimationRequest) -> Result<String>;
}
