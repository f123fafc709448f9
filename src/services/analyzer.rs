// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use tracing::debug;

use crate::config::AnalysisSettings;
use crate::domain::ComplexityAnalysis;
use crate::error::Result;
use crate::services::git::GitService;

/// Decides whether a change set is small enough to hand to the model.
pub struct ComplexityAnalyzer {
    limits: AnalysisSettings,
}

impl ComplexityAnalyzer {
    pub fn new(limits: AnalysisSettings) -> Self {
        Self { limits }
    }

    /// Measure the staged change set, or the working tree when nothing is
    /// staged
    pub async fn analyze(&self, git: &GitService) -> Result<ComplexityAnalysis> {
        let (files, has_staged) = git.files_to_analyze().await?;
        let diff_lines = git.diff_line_count(&[], has_staged).await?;
        let max_file_size = files.iter().map(|f| git.file_size(f)).max().unwrap_or(0);

        let analysis = ComplexityAnalysis {
            file_count: files.len(),
            diff_lines,
            max_file_size,
            files,
            has_staged,
        };
        debug!(
            files = analysis.file_count,
            lines = analysis.diff_lines,
            max_size = analysis.max_file_size,
            "change set analyzed"
        );
        Ok(analysis)
    }

    /// Always true unless `ai.analysis.enforce` is set
    pub fn should_use_ai(&self, analysis: &ComplexityAnalysis) -> bool {
        !self.limits.enforce || self.exceeded(analysis).is_empty()
    }

    /// Limits the change set goes over, as human-readable lines
    pub fn exceeded(&self, analysis: &ComplexityAnalysis) -> Vec<String> {
        let mut reasons = Vec::new();
        if analysis.file_count > self.limits.max_files {
            reasons.push(format!(
                "{} files changed (limit {})",
                analysis.file_count, self.limits.max_files
            ));
        }
        if analysis.diff_lines > self.limits.max_diff_lines {
            reasons.push(format!(
                "{} diff lines (limit {})",
                analysis.diff_lines, self.limits.max_diff_lines
            ));
        }
        if analysis.max_file_size > self.limits.max_file_size {
            reasons.push(format!(
                "largest file is {} bytes (limit {})",
                analysis.max_file_size, self.limits.max_file_size
            ));
        }
        reasons
    }

    pub fn fallback_message(&self, analysis: &ComplexityAnalysis) -> String {
        let mut out = String::from("Change set too large for AI message generation:");
        for reason in self.exceeded(analysis) {
            out.push_str("\n  - ");
            out.push_str(&reason);
        }
        out.push_str("\nStage smaller groups of files with gga, or pass a message explicitly.");
        out
    }

    /// "3 files, 42 lines (staged)"
    pub fn summary(&self, analysis: &ComplexityAnalysis) -> String {
        format!(
            "{} file{}, {} line{} ({})",
            analysis.file_count,
            if analysis.file_count == 1 { "" } else { "s" },
            analysis.diff_lines,
            if analysis.diff_lines == 1 { "" } else { "s" },
            if analysis.has_staged { "staged" } else { "unstaged" }
        )
    }
}
