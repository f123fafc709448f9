// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Typed view of the merged configuration. Every field has a default, so the
/// serialized `Settings::default()` doubles as the built-in base layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub git: GitSettings,

    #[serde(default)]
    pub commit: CommitSettings,

    #[serde(default)]
    pub ai: AiSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            ui: UiSettings::default(),
            git: GitSettings::default(),
            commit: CommitSettings::default(),
            ai: AiSettings::default(),
        }
    }
}

fn default_version() -> String {
    "1.0".into()
}

fn default_true() -> bool {
    true
}

// ─── ui ───

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default)]
    pub colors: ColorSettings,

    /// Show debug logs without passing --verbose
    #[serde(default)]
    pub verbose: bool,
}

/// Named terminal colors (`green`, `bright_green`, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorSettings {
    #[serde(default = "default_success_color")]
    pub success: String,
    #[serde(default = "default_error_color")]
    pub error: String,
    #[serde(default = "default_warning_color")]
    pub warning: String,
    #[serde(default = "default_info_color")]
    pub info: String,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            success: default_success_color(),
            error: default_error_color(),
            warning: default_warning_color(),
            info: default_info_color(),
        }
    }
}

fn default_success_color() -> String {
    "green".into()
}
fn default_error_color() -> String {
    "red".into()
}
fn default_warning_color() -> String {
    "yellow".into()
}
fn default_info_color() -> String {
    "cyan".into()
}

// ─── git ───

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitSettings {
    /// Stage everything before committing when nothing is staged
    #[serde(default = "default_true")]
    pub auto_stage: bool,

    #[serde(default = "default_main_branch")]
    pub main_branch: String,

    #[serde(default = "default_develop_branch")]
    pub develop_branch: String,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            auto_stage: true,
            main_branch: default_main_branch(),
            develop_branch: default_develop_branch(),
        }
    }
}

fn default_main_branch() -> String {
    "main".into()
}
fn default_develop_branch() -> String {
    "develop".into()
}

// ─── commit ───

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommitFormat {
    /// `type(scope): description`
    #[default]
    Conventional,
    /// Description only
    Simple,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitSettings {
    #[serde(default)]
    pub format: CommitFormat,
}

// ─── ai ───

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Ollama,
    /// Any other server speaking the Ollama generate protocol
    Local,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::Local => write!(f, "local"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub provider: Provider,

    #[serde(default = "default_model")]
    pub model: String,

    /// Server root; requests go to `{base_url}/api/generate`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the environment variable holding the API key, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// LLM temperature (0.0-2.0, default 0.3)
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds (default 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Diff budget for the prompt (~4 chars per token)
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,

    /// Usage ledger path, relative to the repository root
    #[serde(default = "default_usage_file")]
    pub usage_file: String,

    #[serde(default = "default_true")]
    pub tracking_enabled: bool,

    /// USD; generation is refused once the ledger total reaches it
    #[serde(default = "default_cost_limit")]
    pub cost_limit: f64,

    #[serde(default = "default_cost_per_token")]
    pub cost_per_token: f64,

    #[serde(default)]
    pub analysis: AnalysisSettings,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: Provider::default(),
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            max_prompt_chars: default_max_prompt_chars(),
            usage_file: default_usage_file(),
            tracking_enabled: true,
            cost_limit: default_cost_limit(),
            cost_per_token: default_cost_per_token(),
            analysis: AnalysisSettings::default(),
        }
    }
}

fn default_model() -> String {
    "qwen3:4b".into()
}
fn default_base_url() -> String {
    "http://localhost:11434".into()
}
fn default_temperature() -> f64 {
    0.3
}
fn default_max_tokens() -> u32 {
    256
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_prompt_chars() -> usize {
    24_000
}
fn default_usage_file() -> String {
    ".gggit/ai-usage.yaml".into()
}
fn default_cost_limit() -> f64 {
    5.0
}
fn default_cost_per_token() -> f64 {
    0.0001
}

/// Complexity gate. Inactive unless `enforce` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default)]
    pub enforce: bool,

    #[serde(default = "default_max_files")]
    pub max_files: usize,

    #[serde(default = "default_max_diff_lines")]
    pub max_diff_lines: usize,

    /// Bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            enforce: false,
            max_files: default_max_files(),
            max_diff_lines: default_max_diff_lines(),
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_max_files() -> usize {
    10
}
fn default_max_diff_lines() -> usize {
    200
}
fn default_max_file_size() -> u64 {
    5000
}

impl AiSettings {
    /// Range checks the schema cannot express on its own
    pub fn validate(&self) -> Result<()> {
        if !(1..=3600).contains(&self.timeout_secs) {
            return Err(Error::Config(format!(
                "ai.timeout_secs must be 1–3600, got {}",
                self.timeout_secs
            )));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "ai.temperature must be 0.0–2.0, got {}",
                self.temperature
            )));
        }

        if !(1_000..=200_000).contains(&self.max_prompt_chars) {
            return Err(Error::Config(format!(
                "ai.max_prompt_chars must be 1000–200000, got {}",
                self.max_prompt_chars
            )));
        }

        let url = url::Url::parse(&self.base_url).map_err(|e| {
            Error::Config(format!("ai.base_url '{}' is not a URL: {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "ai.base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        Ok(())
    }

    /// `{base_url}/api/generate` without doubled slashes
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}
