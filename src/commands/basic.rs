// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

//! Thin wrappers that map one tool onto one git operation.

use dialoguer::Confirm;

use crate::app::App;
use crate::cli::{AddArgs, DiffArgs, PassthroughArgs, RemoteArgs, ResetArgs, UnstageArgs};
use crate::error::{Error, Result};
use crate::output::is_interactive;
use crate::services::git::GitService;

/// `gga`: named files, or everything when none are given
pub async fn add(app: &App, args: &AddArgs) -> Result<()> {
    let git = app.git().await?;
    if args.all || args.files.is_empty() {
        git.stage_all().await?;
        app.out.success("All changes staged");
    } else {
        git.stage_files(&args.files).await?;
        app.out
            .success(&format!("Staged {} file(s)", args.files.len()));
    }
    Ok(())
}

pub async fn status(app: &App, args: &PassthroughArgs) -> Result<()> {
    app.git().await?.status(&args.args).await
}

pub async fn log(app: &App, args: &PassthroughArgs) -> Result<()> {
    app.git().await?.log(&args.args).await
}

pub async fn diff(app: &App, args: &DiffArgs) -> Result<()> {
    app.git().await?.diff(&args.files, args.staged).await
}

pub async fn pull(app: &App, args: &RemoteArgs) -> Result<()> {
    let git = app.git().await?;
    git.pull(args.remote.as_deref(), args.branch.as_deref())
        .await?;
    app.out.success("Pull complete");
    Ok(())
}

pub async fn push(app: &App, args: &RemoteArgs) -> Result<()> {
    let git = app.git().await?;
    git.push(args.remote.as_deref(), args.branch.as_deref())
        .await?;
    app.out.success("Push complete");
    Ok(())
}

/// `ggreset`: asks first on a terminal, demands `--yes` elsewhere
pub async fn reset(app: &App, args: &ResetArgs) -> Result<()> {
    let git = app.git().await?;

    if !args.yes {
        if !is_interactive() {
            return Err(Error::Validation(
                "Refusing to discard changes without --yes outside a terminal".into(),
            ));
        }
        app.out
            .warning("This discards every uncommitted change in the working tree.");
        let confirmed = Confirm::new()
            .with_prompt("Run git reset --hard HEAD?")
            .default(false)
            .interact()?;
        if !confirmed {
            return Err(Error::Cancelled);
        }
    }

    git.reset_hard().await?;
    app.out.success("Working tree reset to HEAD");
    Ok(())
}

pub async fn unstage(app: &App, args: &UnstageArgs) -> Result<()> {
    let git = app.git().await?;
    git.unstage_files(&args.files).await?;
    if args.files.is_empty() {
        app.out.success("All files unstaged");
    } else {
        app.out
            .success(&format!("Unstaged {} file(s)", args.files.len()));
    }
    Ok(())
}

/// `ggv`: works outside a repository too
pub async fn version(_app: &App) -> Result<()> {
    println!("gggit {}", env!("CARGO_PKG_VERSION"));
    println!("git {}", GitService::version().await?);
    Ok(())
}
