// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

#![no_main]

use gggit::services::git::count_changes;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let (additions, deletions) = count_changes(data);
    assert!(additions + deletions <= data.lines().count());
});
