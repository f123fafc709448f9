// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::domain::CommitType;
use crate::services::validator::MAX_MESSAGE_LEN;

/// Used when nothing usable survives cleaning
pub const FALLBACK_DESCRIPTION: &str = "update files";

static THINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("static regex"));

static FENCE_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*```[\w+-]*\s*$").expect("static regex"));

static EMPHASIS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\n]+)\*").expect("static regex"));

/// `__text__`; a lone word inside is a dunder identifier, not emphasis
static STRONG_UNDERSCORE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([^_\n]+?)__").expect("static regex"));

static LINE_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:#{1,6}\s+|>\s*|[-*+]\s+|\d+[.)]\s+)").expect("static regex")
});

static PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let types = CommitType::ALL.join("|");
    Regex::new(&format!(r"(?i)^(?:{types})(?:\([^)]*\))?!?\s*:\s*")).expect("static regex")
});

static PREAMBLE_PATTERNS: &[&str] = &[
    "here's the commit message",
    "here is the commit message",
    "here's a commit message",
    "here is a commit message",
    "suggested commit message",
    "suggested commit",
    "commit message",
];

pub struct MessageSanitizer;

impl MessageSanitizer {
    /// Reduce a model reply to a single commit description: markdown and
    /// preambles removed, no conventional prefix, no trailing period, at most
    /// 72 characters.
    pub fn clean(raw: &str) -> String {
        let text = THINK_REGEX.replace_all(raw, "");
        let text = FENCE_MARKER_REGEX.replace_all(&text, "");
        let text = text.replace("**", "").replace('`', "");
        let text = STRONG_UNDERSCORE_REGEX.replace_all(&text, |caps: &Captures<'_>| {
            let inner = &caps[1];
            if inner.chars().all(char::is_alphanumeric) {
                caps[0].to_string()
            } else {
                inner.to_string()
            }
        });
        let text = EMPHASIS_REGEX.replace_all(&text, "$1");

        let line = text
            .lines()
            .map(Self::clean_line)
            .find(|l| !l.is_empty())
            .unwrap_or_default();

        let line = PREFIX_REGEX.replace(&line, "");
        let line = line.trim().trim_end_matches('.').trim_end();
        let line = Self::truncate(line);

        if line.is_empty() {
            FALLBACK_DESCRIPTION.to_string()
        } else {
            line
        }
    }

    fn clean_line(line: &str) -> String {
        let mut line = LINE_MARKER_REGEX.replace(line, "").trim().to_string();

        let lower = line.to_lowercase();
        let rest = PREAMBLE_PATTERNS
            .iter()
            .find(|p| lower.starts_with(**p))
            .and_then(|p| line.get(p.len()..))
            .map(str::trim_start)
            .filter(|rest| rest.is_empty() || rest.starts_with(':'))
            .map(|rest| rest.trim_start_matches(':').trim().to_string());
        if let Some(rest) = rest {
            line = rest;
        }
        if lower.starts_with("here") && line.ends_with(':') {
            return String::new();
        }

        Self::strip_quotes(&line).trim().to_string()
    }

    fn strip_quotes(line: &str) -> &str {
        for quote in ['"', '\'', '“'] {
            let close = if quote == '“' { '”' } else { quote };
            if let Some(inner) = line
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(close))
            {
                return inner;
            }
        }
        line
    }

    /// Cap at 72 characters, preferring a word boundary
    fn truncate(line: &str) -> String {
        if line.chars().count() <= MAX_MESSAGE_LEN {
            return line.to_string();
        }

        let cut: String = line.chars().take(MAX_MESSAGE_LEN).collect();
        let next_is_space = line
            .chars()
            .nth(MAX_MESSAGE_LEN)
            .is_some_and(char::is_whitespace);
        if next_is_space {
            return cut.trim_end().to_string();
        }

        match cut.rfind(' ') {
            Some(pos) if pos >= MAX_MESSAGE_LEN / 2 => cut[..pos].trim_end().to_string(),
            _ => cut.trim_end().to_string(),
        }
    }
}
