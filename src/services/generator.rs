// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::fmt::Write;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::AiSettings;
use crate::domain::{CommitType, FileCategory};
use crate::error::{Error, Result};
use crate::services::llm::{self, LlmProvider};
use crate::services::sanitizer::MessageSanitizer;
use crate::services::usage::AiUsageTracker;

/// Drafts commit descriptions with the configured model and books the cost.
pub struct AiMessageGenerator {
    provider: Box<dyn LlmProvider>,
    tracker: AiUsageTracker,
    max_prompt_chars: usize,
    cost_per_token: f64,
}

impl AiMessageGenerator {
    pub fn new(
        provider: Box<dyn LlmProvider>,
        tracker: AiUsageTracker,
        settings: &AiSettings,
    ) -> Self {
        Self {
            provider,
            tracker,
            max_prompt_chars: settings.max_prompt_chars,
            cost_per_token: settings.cost_per_token,
        }
    }

    /// Provider and ledger from configuration. Fails with `AiNotConfigured`
    /// unless [`is_configured`] holds.
    pub fn from_settings(settings: &AiSettings, repo_root: &Path) -> Result<Self> {
        if !is_configured(settings) {
            return Err(Error::AiNotConfigured);
        }
        let provider = llm::create_provider(settings)?;
        let tracker = AiUsageTracker::from_settings(repo_root, settings);
        Ok(Self::new(provider, tracker, settings))
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    pub fn tracker(&self) -> &AiUsageTracker {
        &self.tracker
    }

    pub fn build_prompt(&self, commit_type: CommitType, files: &[String], diff: &str) -> String {
        let mut prompt = String::with_capacity(diff.len().min(self.max_prompt_chars) + 1024);

        let _ = writeln!(
            prompt,
            "Write a one-line git commit description for {} ({}).",
            commit_type.describe(),
            commit_type
        );
        prompt.push_str(
            "Rules:\n\
             - imperative mood, lowercase, no trailing period\n\
             - at most 72 characters\n\
             - no type prefix, no quotes, no markdown\n\
             - reply with the description only\n\n",
        );

        prompt.push_str("Files changed:\n");
        for file in files {
            let _ = writeln!(prompt, "- {file}");
        }

        let (diff, truncated) = truncate_at(diff, self.max_prompt_chars);
        prompt.push_str("\nDiff:\n");
        prompt.push_str(diff);
        if truncated {
            prompt.push_str("\n... (diff truncated)");
        }
        prompt
    }

    /// Ask the model for a description. Refuses once the ledger reached the
    /// cost limit; a ledger write failure is logged and does not lose the
    /// reply.
    pub async fn generate_message(
        &self,
        commit_type: CommitType,
        files: &[String],
        diff: &str,
        command: &str,
    ) -> Result<String> {
        if self.tracker.is_cost_limit_exceeded() {
            return Err(Error::CostLimitExceeded {
                spent: self.tracker.usage_stats().totals.cost,
                limit: self.tracker.cost_limit(),
            });
        }

        let prompt = self.build_prompt(commit_type, files, diff);
        let generation = self.provider.generate(&prompt).await?;
        let description = MessageSanitizer::clean(&generation.text);

        let tokens = match (generation.prompt_tokens, generation.completion_tokens) {
            (None, None) => estimate_tokens(&prompt) + estimate_tokens(&generation.text),
            (p, c) => p.unwrap_or(0) + c.unwrap_or(0),
        };
        let cost = tokens as f64 * self.cost_per_token;
        if let Err(e) = self.tracker.increment_usage(command, tokens, cost) {
            warn!("could not record AI usage: {e}");
        }

        debug!(provider = self.provider.name(), tokens, %description, "message generated");
        Ok(description)
    }
}

/// AI is switched on and, when a key variable is named, that variable is set
pub fn is_configured(settings: &AiSettings) -> bool {
    settings.enabled
        && settings
            .api_key_env
            .as_deref()
            .is_none_or(|var| std::env::var_os(var).is_some())
}

/// Best guess at a commit type from the touched paths
pub fn infer_commit_type(files: &[String], has_new_files: bool) -> CommitType {
    if files.is_empty() {
        return CommitType::Chore;
    }

    let categories: Vec<FileCategory> = files
        .iter()
        .map(|f| FileCategory::from_path(Path::new(f)))
        .collect();
    let all = |wanted: &[FileCategory]| categories.iter().all(|c| wanted.contains(c));

    if all(&[FileCategory::Docs]) {
        CommitType::Docs
    } else if all(&[FileCategory::Test]) {
        CommitType::Test
    } else if all(&[FileCategory::Ci]) {
        CommitType::Ci
    } else if all(&[FileCategory::Build, FileCategory::Ci]) {
        CommitType::Build
    } else if all(&[FileCategory::Config]) {
        CommitType::Chore
    } else if has_new_files {
        CommitType::Feat
    } else {
        CommitType::Chore
    }
}

/// Roughly four characters per token
fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(4)
}

fn truncate_at(text: &str, max: usize) -> (&str, bool) {
    if text.len() <= max {
        return (text, false);
    }
    let end = (0..=max).rev().find(|i| text.is_char_boundary(*i)).unwrap_or(0);
    (&text[..end], true)
}
