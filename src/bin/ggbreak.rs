// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

fn main() -> std::process::ExitCode {
    gggit::launch(gggit::Tool::Ggbreak)
}
