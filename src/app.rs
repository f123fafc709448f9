// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::ffi::OsString;
use std::process::ExitCode;

use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, prelude::*, reload};

use crate::cli::{Invocation, Tool};
use crate::commands;
use crate::config::{ConfigPaths, ConfigStore, Settings};
use crate::error::{Error, Result};
use crate::output::{Output, Palette};
use crate::services::git::GitService;

/// Everything a command needs, built once per invocation and passed down
/// explicitly.
pub struct App {
    pub tool: Tool,
    pub store: ConfigStore,
    pub settings: Settings,
    pub out: Output,
}

impl App {
    pub fn new(tool: Tool, store: ConfigStore) -> Result<Self> {
        let settings = match store.settings() {
            Ok(settings) => settings,
            // ggconfig must stay usable to repair whatever broke extraction
            Err(e) if tool == Tool::Ggconfig => {
                warn!("configuration unreadable, using defaults: {e}");
                Settings::default()
            }
            Err(e) => return Err(e),
        };
        let out = Output::new(Palette::from_settings(&settings.ui.colors));
        Ok(Self {
            tool,
            store,
            settings,
            out,
        })
    }

    /// Repository at the working directory
    pub async fn git(&self) -> Result<GitService> {
        GitService::discover().await
    }

    pub async fn run(&mut self, invocation: Invocation) -> Result<()> {
        debug!(tool = %self.tool, "running");
        match invocation {
            Invocation::Commit(commit_type, args) => {
                commands::commit::run(self, commit_type, &args).await
            }
            Invocation::Add(args) => commands::basic::add(self, &args).await,
            Invocation::Status(args) => commands::basic::status(self, &args).await,
            Invocation::Log(args) => commands::basic::log(self, &args).await,
            Invocation::Diff(args) => commands::basic::diff(self, &args).await,
            Invocation::Pull(args) => commands::basic::pull(self, &args).await,
            Invocation::Push(args) => commands::basic::push(self, &args).await,
            Invocation::Reset(args) => commands::basic::reset(self, &args).await,
            Invocation::Unstage(args) => commands::basic::unstage(self, &args).await,
            Invocation::Version(_) => commands::basic::version(self).await,
            Invocation::Main(_) => {
                let branch = self.settings.git.main_branch.clone();
                commands::branch::switch_to(self, &branch).await
            }
            Invocation::Develop(_) => {
                let branch = self.settings.git.develop_branch.clone();
                commands::branch::switch_to(self, &branch).await
            }
            Invocation::Branch(args) => commands::branch::run(self, &args).await,
            Invocation::Merge(args) => commands::merge::run(self, &args).await,
            Invocation::Ai(args) => commands::ai::run(self, &args).await,
            Invocation::Config(args) => commands::config::run(self, &args),
        }
    }
}

// ─── Entry point ───

/// Run `tool` with the process arguments
pub fn launch(tool: Tool) -> ExitCode {
    launch_with(tool, std::env::args_os())
}

/// Run `tool` with an explicit argv (program name first)
pub fn launch_with<I>(tool: Tool, argv: I) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
{
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    let invocation = match tool.parse_from(argv) {
        Ok(invocation) => invocation,
        Err(e) => e.exit(),
    };

    let reload_handle = init_tracing(invocation.verbose());

    match execute(tool, invocation, reload_handle) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Cancelled) => {
            eprintln!("Aborted.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::FAILURE
        }
    }
}

type FilterHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

fn init_tracing(verbose: bool) -> Option<FilterHandle> {
    let filter = if verbose {
        EnvFilter::new("gggit=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gggit=warn"))
    };
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::env::var("NO_COLOR").is_err())
                .without_time(),
        )
        .try_init()
        .ok()
        .map(|()| handle)
}

fn execute(tool: Tool, invocation: Invocation, reload_handle: Option<FilterHandle>) -> Result<()> {
    // ggconfig must be able to reset a layer that no longer parses
    let store = if tool == Tool::Ggconfig {
        ConfigStore::load_lenient(ConfigPaths::discover()?)?
    } else {
        ConfigStore::discover()?
    };
    let mut app = App::new(tool, store)?;

    // ui.verbose only becomes known once the configuration is loaded
    if app.settings.ui.verbose
        && !invocation.verbose()
        && let Some(handle) = reload_handle
    {
        handle.reload(EnvFilter::new("gggit=debug")).ok();
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(app.run(invocation))
}
