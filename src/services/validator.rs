// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

//! Argument checks shared by the command layer.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

pub const MAX_MESSAGE_LEN: usize = 72;

static SCOPE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("static regex"));

/// Non-blank and at most 72 characters
pub fn validate_commit_message(message: &str) -> Result<()> {
    let message = message.trim();
    if message.is_empty() {
        return Err(Error::Validation("Commit message cannot be empty".into()));
    }

    let len = message.chars().count();
    if len > MAX_MESSAGE_LEN {
        return Err(Error::Validation(format!(
            "Commit message is {len} characters; the limit is {MAX_MESSAGE_LEN}"
        )));
    }
    Ok(())
}

/// Lowercase letters, digits and hyphens
pub fn validate_scope(scope: &str) -> Result<()> {
    if SCOPE_REGEX.is_match(scope) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "Invalid scope '{scope}': use lowercase letters, digits and hyphens"
        )))
    }
}

/// Subset of `git check-ref-format` rules for a branch name
pub fn validate_branch_name(name: &str) -> Result<()> {
    let reject = |why: &str| Err(Error::Validation(format!("Invalid branch name '{name}': {why}")));

    if name.is_empty() {
        return Err(Error::Validation("Branch name cannot be empty".into()));
    }
    if name == "@" {
        return reject("'@' alone is reserved");
    }
    if let Some(seq) = ["..", "@{", "//"].iter().find(|seq| name.contains(**seq)) {
        return reject(&format!("contains '{seq}'"));
    }
    if let Some(c) = name
        .chars()
        .find(|c| c.is_control() || matches!(c, ' ' | '~' | '^' | ':' | '?' | '*' | '[' | '\\'))
    {
        return reject(&format!("contains {c:?}"));
    }
    if name.starts_with(['.', '-', '/']) {
        return reject("cannot start with '.', '-' or '/'");
    }
    if name.ends_with(['/', '.']) || name.ends_with(".lock") {
        return reject("cannot end with '/', '.' or '.lock'");
    }
    Ok(())
}

pub fn validate_file_path(path: &str) -> Result<()> {
    if Path::new(path).exists() {
        Ok(())
    } else {
        Err(Error::Validation(format!("File not found: {path}")))
    }
}
