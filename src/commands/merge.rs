// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use dialoguer::Select;

use crate::app::App;
use crate::cli::MergeArgs;
use crate::error::{Error, Result};
use crate::output::is_interactive;

pub async fn run(app: &App, args: &MergeArgs) -> Result<()> {
    let git = app.git().await?;

    if args.abort {
        git.merge_abort().await?;
        app.out.success("Merge aborted");
        return Ok(());
    }
    if args.continue_merge {
        git.merge_continue().await?;
        app.out.success("Merge completed");
        return Ok(());
    }

    let branch = match &args.branch {
        Some(branch) => branch.clone(),
        None => {
            let candidates = git.mergeable_branches().await?;
            if candidates.is_empty() {
                return Err(Error::Validation("No other branches to merge".into()));
            }
            if !is_interactive() {
                return Err(Error::Validation(
                    "Branch name required when not running in a terminal".into(),
                ));
            }
            let idx = Select::new()
                .with_prompt("Merge which branch?")
                .items(&candidates)
                .default(0)
                .interact_opt()?
                .ok_or(Error::Cancelled)?;
            candidates[idx].clone()
        }
    };

    let current = git.current_branch().await?;
    if branch == current {
        return Err(Error::Validation(format!(
            "Cannot merge '{branch}' into itself"
        )));
    }

    app.out
        .status(&format!("Merging '{branch}' into '{current}'"));
    git.merge_branch(&branch).await?;
    app.out.success(&format!("Merged '{branch}' into '{current}'"));
    Ok(())
}
