// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

#![no_main]

use gggit::domain::branch_name_from_input;
use gggit::services::validator::validate_branch_name;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let name = branch_name_from_input(data);
    assert!(!name.chars().any(char::is_whitespace));
    // any verdict is fine, it just must not panic
    let _ = validate_branch_name(&name);
});
