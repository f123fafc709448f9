// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

#![no_main]

use gggit::services::sanitizer::MessageSanitizer;
use gggit::services::validator::MAX_MESSAGE_LEN;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let cleaned = MessageSanitizer::clean(data);
    assert!(!cleaned.is_empty());
    assert!(cleaned.chars().count() <= MAX_MESSAGE_LEN);
});
