// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use console::style;
use dialoguer::{Input, Select};

use crate::app::App;
use crate::cli::BranchArgs;
use crate::domain::branch_name_from_input;
use crate::error::{Error, Result};
use crate::output::is_interactive;
use crate::services::git::GitService;
use crate::services::validator::validate_branch_name;

pub async fn run(app: &App, args: &BranchArgs) -> Result<()> {
    let git = app.git().await?;
    let name = branch_name_from_input(&args.name.join(" "));

    if args.list {
        return list(&git).await;
    }
    if name.is_empty() {
        if is_interactive() {
            return menu(app, &git, args.from.as_deref()).await;
        }
        return list(&git).await;
    }

    checkout_or_create(app, &git, &name, args.from.as_deref()).await
}

/// `ggmain` / `ggdevelop`
pub async fn switch_to(app: &App, branch: &str) -> Result<()> {
    let git = app.git().await?;
    if !git.branch_exists(branch).await? {
        return Err(Error::Validation(format!(
            "Branch '{branch}' does not exist"
        )));
    }
    git.switch_branch(branch).await?;
    app.out.success(&format!("Switched to branch '{branch}'"));
    Ok(())
}

/// Switch to `name`, creating it from `start` (or HEAD) when missing
async fn checkout_or_create(
    app: &App,
    git: &GitService,
    name: &str,
    start: Option<&str>,
) -> Result<()> {
    validate_branch_name(name)?;

    if git.branch_exists(name).await? {
        git.switch_branch(name).await?;
        app.out.success(&format!("Switched to branch '{name}'"));
        return Ok(());
    }

    git.create_branch(name, start).await?;
    git.switch_branch(name).await?;
    app.out
        .success(&format!("Created and switched to branch '{name}'"));
    Ok(())
}

async fn list(git: &GitService) -> Result<()> {
    let current = git.current_branch().await?;
    let branches = git.branch_list().await?;

    for branch in &branches.local {
        if *branch == current {
            println!("* {}", style(branch).green().bold());
        } else {
            println!("  {branch}");
        }
    }
    for branch in &branches.remote {
        println!("  {}", style(branch).dim());
    }
    Ok(())
}

async fn menu(app: &App, git: &GitService, start: Option<&str>) -> Result<()> {
    let choice = Select::new()
        .with_prompt("Branches")
        .items(&["List branches", "Create a branch", "Switch branch"])
        .default(0)
        .interact_opt()?;

    match choice {
        Some(0) => list(git).await,
        Some(1) => {
            let raw: String = Input::new().with_prompt("Branch name").interact_text()?;
            let name = branch_name_from_input(&raw);
            checkout_or_create(app, git, &name, start).await
        }
        Some(2) => {
            let candidates = git.mergeable_branches().await?;
            if candidates.is_empty() {
                app.out.info("No other local branches");
                return Ok(());
            }
            let Some(idx) = Select::new()
                .with_prompt("Switch to")
                .items(&candidates)
                .default(0)
                .interact_opt()?
            else {
                return Err(Error::Cancelled);
            };
            let name = &candidates[idx];
            git.switch_branch(name).await?;
            app.out.success(&format!("Switched to branch '{name}'"));
            Ok(())
        }
        _ => Err(Error::Cancelled),
    }
}
