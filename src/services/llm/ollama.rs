// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Generation, LlmProvider};
use crate::config::AiSettings;
use crate::error::{Error, Result};

pub struct OllamaProvider {
    client: Client,
    name: String,
    host: String,
    generate_url: String,
    tags_url: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    timeout_secs: u64,
    api_key: Option<SecretString>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    prompt_eval_count: Option<u64>,
    eval_count: Option<u64>,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Deserialize)]
struct ModelInfo {
    name: String,
}

impl OllamaProvider {
    pub fn new(settings: &AiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        let api_key = settings
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.is_empty())
            .map(SecretString::from);

        Ok(Self {
            client,
            name: settings.provider.to_string(),
            host: settings.base_url.trim_end_matches('/').to_string(),
            generate_url: settings.endpoint("api/generate"),
            tags_url: settings.endpoint("api/tags"),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            timeout_secs: settings.timeout_secs,
            api_key,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key.expose_secret()),
            None => request,
        }
    }

    fn provider_error(&self, message: impl Into<String>) -> Error {
        Error::Provider {
            provider: self.name.clone(),
            message: message.into(),
        }
    }

    fn send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            self.provider_error(format!(
                "{} did not answer within {}s",
                self.host, self.timeout_secs
            ))
        } else if e.is_connect() {
            self.provider_error(format!("cannot connect to {}: {e}", self.host))
        } else {
            self.provider_error(e.to_string())
        }
    }

    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(self.provider_error(format!("HTTP {}: {}", status, body.trim())))
    }

    fn has_model(&self, models: &[ModelInfo]) -> bool {
        let wanted = self.model.as_str();
        models.iter().any(|m| {
            m.name == wanted
                || (!wanted.contains(':') && m.name == format!("{wanted}:latest"))
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(&self, prompt: &str) -> Result<Generation> {
        let url = &self.generate_url;
        debug!(url = %url, model = %self.model, prompt_chars = prompt.len(), "sending generate request");

        let request = self.client.post(url).json(&GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            },
        });

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        let response = self.check_status(response).await?;

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| self.provider_error(format!("unreadable response: {e}")))?;

        Ok(Generation {
            text: body.response.trim().to_string(),
            prompt_tokens: body.prompt_eval_count,
            completion_tokens: body.eval_count,
        })
    }

    async fn verify(&self) -> Result<()> {
        let response = self
            .authorize(self.client.get(&self.tags_url))
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        let response = self.check_status(response).await?;

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| self.provider_error(format!("unreadable model list: {e}")))?;

        if !self.has_model(&tags.models) {
            return Err(self.provider_error(format!(
                "model '{}' is not available on {}. Pull it with: ollama pull {}",
                self.model, self.host, self.model
            )));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
