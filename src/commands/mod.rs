// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

pub mod ai;
pub mod basic;
pub mod branch;
pub mod commit;
pub mod config;
pub mod merge;
