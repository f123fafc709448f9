// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use async_trait::async_trait;

pub mod ollama;

use crate::config::{AiSettings, Provider};
use crate::error::Result;

/// One completed model reply. Token counts are whatever the server reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Generation>;

    /// Reachability and model availability check
    async fn verify(&self) -> Result<()>;

    fn name(&self) -> &str;
}

pub fn create_provider(settings: &AiSettings) -> Result<Box<dyn LlmProvider>> {
    settings.validate()?;
    match settings.provider {
        // Both speak the same generate protocol; `local` only changes the label
        Provider::Ollama | Provider::Local => {
            Ok(Box::new(ollama::OllamaProvider::new(settings)?))
        }
    }
}
