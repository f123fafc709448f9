// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::ffi::OsString;
use std::process::ExitCode;

use clap::Parser;

use gggit::Tool;
use gggit::cli::Cli;

fn main() -> ExitCode {
    let argv: Vec<OsString> = std::env::args_os().collect();

    // Installed as a symlink named after a tool (`ggfeat -> gggit`)
    if let Some(tool) = argv
        .first()
        .and_then(|arg0| arg0.to_str())
        .and_then(Tool::from_name)
    {
        return gggit::launch_with(tool, argv);
    }

    let cli = Cli::parse_from(&argv);
    let Some(tool) = Tool::from_name(&cli.tool) else {
        eprintln!("gggit: unknown tool '{}'", cli.tool);
        eprintln!(
            "Available: {}",
            Tool::ALL.map(|t| t.name()).join(" ")
        );
        return ExitCode::from(2);
    };

    let mut tool_argv = vec![OsString::from(tool.name())];
    tool_argv.extend(cli.args);
    gggit::launch_with(tool, tool_argv)
}
