// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Break,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Build,
    Ci,
    Chore,
    Revert,
}

impl CommitType {
    pub const ALL: &[&str] = &[
        "feat", "fix", "break", "docs", "style", "refactor", "perf", "test", "build", "ci",
        "chore", "revert",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feat => "feat",
            Self::Fix => "fix",
            Self::Break => "break",
            Self::Docs => "docs",
            Self::Style => "style",
            Self::Refactor => "refactor",
            Self::Perf => "perf",
            Self::Test => "test",
            Self::Build => "build",
            Self::Ci => "ci",
            Self::Chore => "chore",
            Self::Revert => "revert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "feat" => Some(Self::Feat),
            "fix" => Some(Self::Fix),
            "break" => Some(Self::Break),
            "docs" => Some(Self::Docs),
            "style" => Some(Self::Style),
            "refactor" => Some(Self::Refactor),
            "perf" => Some(Self::Perf),
            "test" => Some(Self::Test),
            "build" => Some(Self::Build),
            "ci" => Some(Self::Ci),
            "chore" => Some(Self::Chore),
            "revert" => Some(Self::Revert),
            _ => None,
        }
    }

    /// Human description used in prompts and help text
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Feat => "a new feature",
            Self::Fix => "a bug fix",
            Self::Break => "a breaking change",
            Self::Docs => "documentation only changes",
            Self::Style => "formatting or style changes that do not affect behavior",
            Self::Refactor => "a code change that neither fixes a bug nor adds a feature",
            Self::Perf => "a performance improvement",
            Self::Test => "adding or correcting tests",
            Self::Build => "changes to the build system or dependencies",
            Self::Ci => "changes to CI configuration",
            Self::Chore => "maintenance that does not touch source or tests",
            Self::Revert => "reverting a previous commit",
        }
    }

    /// `type(scope): description`, or `type: description` without a scope
    pub fn format_message(&self, description: &str, scope: Option<&str>) -> String {
        match scope {
            Some(scope) if !scope.is_empty() => {
                format!("{}({}): {}", self.as_str(), scope, description)
            }
            _ => format!("{}: {}", self.as_str(), description),
        }
    }
}

impl std::fmt::Display for CommitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A commit about to be created, in the shape checked by the `commit` schema.
#[derive(Debug, Clone, Serialize)]
pub struct CommitDraft {
    #[serde(rename = "type")]
    pub commit_type: CommitType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub description: String,
}

impl CommitDraft {
    pub fn new(commit_type: CommitType, scope: Option<String>, description: &str) -> Self {
        Self {
            commit_type,
            scope,
            description: description.trim().to_string(),
        }
    }

    pub fn message(&self) -> String {
        self.commit_type
            .format_message(&self.description, self.scope.as_deref())
    }
}
