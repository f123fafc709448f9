// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

/// Turn free-form input such as `"New Feature"` into a branch name
/// (`"new-feature"`): lowercase, whitespace runs collapsed to one hyphen.
pub fn branch_name_from_input(input: &str) -> String {
    input
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Local and remote branch listing
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BranchList {
    pub local: Vec<String>,
    pub remote: Vec<String>,
}
