// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

pub mod analyzer;
pub mod generator;
pub mod git;
pub mod llm;
pub mod sanitizer;
pub mod usage;
pub mod validator;
