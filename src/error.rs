// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

// miette's Diagnostic derive generates code that triggers this false positive
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("git is not available on this system")]
    #[diagnostic(
        code(gggit::git::not_available),
        help("Install git and make sure it is on your PATH")
    )]
    GitNotAvailable,

    #[error("Not a git repository")]
    #[diagnostic(
        code(gggit::git::not_repo),
        help("Run this command inside a git repository")
    )]
    NotAGitRepo,

    #[error("`git {command}` failed: {message}")]
    #[diagnostic(code(gggit::git::command))]
    GitCommand { command: String, message: String },

    #[error("Nothing staged to commit")]
    #[diagnostic(
        code(gggit::git::nothing_staged),
        help("Stage files with: gga <files>")
    )]
    NothingToCommit,

    #[error("{0}")]
    #[diagnostic(code(gggit::validation))]
    Validation(String),

    #[error("{schema} schema violation at {path}: {message}")]
    #[diagnostic(code(gggit::config::schema))]
    Schema {
        schema: String,
        path: String,
        message: String,
    },

    #[error("Unknown schema '{0}'. Known schemas: config, commit, module")]
    #[diagnostic(code(gggit::config::unknown_schema))]
    UnknownSchema(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(gggit::config::error))]
    Config(String),

    #[error("Invalid configuration level '{0}'")]
    #[diagnostic(
        code(gggit::config::level),
        help("Use one of: repo, module, user, default")
    )]
    InvalidLevel(String),

    #[error("AI is not configured")]
    #[diagnostic(
        code(gggit::ai::not_configured),
        help("Enable it with: ggconfig set ai.enabled true")
    )]
    AiNotConfigured,

    #[error("AI cost limit reached (${spent:.2} of ${limit:.2})")]
    #[diagnostic(
        code(gggit::ai::cost_limit),
        help("Reset the ledger with `ggai usage reset` or raise ai.cost_limit")
    )]
    CostLimitExceeded { spent: f64, limit: f64 },

    #[error("Provider '{provider}' error: {message}")]
    #[diagnostic(code(gggit::provider::error))]
    Provider { provider: String, message: String },

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        Error::Dialog(e.to_string())
    }
}

impl From<figment::Error> for Error {
    fn from(e: figment::Error) -> Self {
        Error::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
