// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use dialoguer::Confirm;
use tracing::debug;

use crate::app::App;
use crate::cli::CommitArgs;
use crate::commands::ai;
use crate::config::{CommitFormat, schema};
use crate::domain::{CommitDraft, CommitType};
use crate::error::{Error, Result};
use crate::output::is_interactive;
use crate::services::generator;
use crate::services::git::GitService;
use crate::services::validator::{validate_commit_message, validate_scope};

/// `ggfeat`, `ggfix`, ...: compose a conventional commit and create it
pub async fn run(app: &App, commit_type: CommitType, args: &CommitArgs) -> Result<()> {
    let git = app.git().await?;

    let scope = normalize_scope(args.scope.as_deref())?;
    let manual = args.message.join(" ");
    let manual = manual.trim();

    let (description, from_ai) = if !manual.is_empty() {
        validate_commit_message(manual)?;
        (manual.to_string(), false)
    } else if args.ai || generator::is_configured(&app.settings.ai) {
        let (description, _) =
            ai::draft_description(app, &git, Some(commit_type), app.tool.name()).await?;
        (description, true)
    } else {
        return Err(Error::Validation(format!(
            "Message is required. Usage: {} \"description\" (or enable AI with: ggconfig set ai.enabled true)",
            app.tool
        )));
    };

    let draft = CommitDraft::new(commit_type, scope, &description);
    check_draft(&draft)?;
    let message = compose(app, &draft);

    if args.dry_run {
        println!("{message}");
        return Ok(());
    }

    if from_ai && !args.yes && is_interactive() {
        confirm(app, &message)?;
    }

    commit_with_auto_stage(app, &git, &message, args.amend).await
}

/// Empty scopes are dropped; anything else must be a valid scope
pub(crate) fn normalize_scope(scope: Option<&str>) -> Result<Option<String>> {
    match scope.map(str::trim).filter(|s| !s.is_empty()) {
        Some(scope) => {
            validate_scope(scope)?;
            Ok(Some(scope.to_string()))
        }
        None => Ok(None),
    }
}

pub(crate) fn check_draft(draft: &CommitDraft) -> Result<()> {
    let doc = serde_json::to_value(draft)
        .map_err(|e| Error::Validation(format!("cannot encode commit: {e}")))?;
    schema::validate(&doc, "commit")
}

/// Message text in the configured `commit.format`
pub(crate) fn compose(app: &App, draft: &CommitDraft) -> String {
    match app.settings.commit.format {
        CommitFormat::Conventional => draft.message(),
        CommitFormat::Simple => draft.description.clone(),
    }
}

pub(crate) fn confirm(app: &App, message: &str) -> Result<()> {
    eprintln!();
    app.out.highlight(message);
    eprintln!();

    let confirmed = Confirm::new()
        .with_prompt("Create commit with this message?")
        .default(true)
        .interact()?;

    if confirmed {
        Ok(())
    } else {
        Err(Error::Cancelled)
    }
}

/// Stage everything first when nothing is staged and `git.auto_stage` is on
pub(crate) async fn commit_with_auto_stage(
    app: &App,
    git: &GitService,
    message: &str,
    amend: bool,
) -> Result<()> {
    if !amend && app.settings.git.auto_stage && !git.has_staged_changes().await? {
        app.out.status("Nothing staged, staging all changes");
        git.stage_all().await?;
    }

    git.commit(message, amend).await?;
    debug!(message, amend, "commit created");

    if amend {
        app.out.success(&format!("Amended: {message}"));
    } else {
        app.out.success(&format!("Committed: {message}"));
    }
    Ok(())
}
