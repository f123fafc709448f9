// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::signal;
use tracing::debug;

use crate::app::App;
use crate::cli::{AiArgs, AiCommand, UsageAction};
use crate::commands::commit::{check_draft, commit_with_auto_stage, compose, confirm, normalize_scope};
use crate::config::repo_root;
use crate::domain::{CommitDraft, CommitType};
use crate::error::{Error, Result};
use crate::output::is_interactive;
use crate::services::analyzer::ComplexityAnalyzer;
use crate::services::generator::{self, AiMessageGenerator, infer_commit_type};
use crate::services::git::GitService;
use crate::services::llm;
use crate::services::usage::AiUsageTracker;

pub async fn run(app: &App, args: &AiArgs) -> Result<()> {
    match &args.command {
        None => generate(app, args).await,
        Some(AiCommand::Usage { action: None }) => usage(app),
        Some(AiCommand::Usage {
            action: Some(UsageAction::Reset),
        }) => usage_reset(app).await,
        Some(AiCommand::Test) => test(app).await,
    }
}

/// Analyze the pending change set and ask the model for a description.
/// Returns the description and the commit type it was written for.
pub async fn draft_description(
    app: &App,
    git: &GitService,
    commit_type: Option<CommitType>,
    command: &str,
) -> Result<(String, CommitType)> {
    let ai = &app.settings.ai;
    if !generator::is_configured(ai) {
        return Err(Error::AiNotConfigured);
    }

    let analyzer = ComplexityAnalyzer::new(ai.analysis.clone());
    let analysis = analyzer.analyze(git).await?;
    if analysis.is_empty() {
        return Err(Error::NothingToCommit);
    }
    if !analyzer.should_use_ai(&analysis) {
        return Err(Error::Validation(analyzer.fallback_message(&analysis)));
    }
    app.out
        .status(&format!("Analyzing {}", analyzer.summary(&analysis)));

    let commit_type = match commit_type {
        Some(t) => t,
        None => {
            let added = git.has_new_files(analysis.has_staged).await?;
            infer_commit_type(&analysis.files, added)
        }
    };

    let generator = AiMessageGenerator::from_settings(ai, git.work_dir())?;
    keep_ledger_untracked(git, generator.tracker()).await?;
    let diff = git.diff_content(&[], analysis.has_staged).await?;

    let description = with_spinner(
        format!("Asking {} ({})...", generator.provider().name(), ai.model),
        generator.generate_message(commit_type, &analysis.files, &diff, command),
    )
    .await?;

    debug!(%commit_type, %description, "AI draft ready");
    Ok((description, commit_type))
}

async fn generate(app: &App, args: &AiArgs) -> Result<()> {
    let git = app.git().await?;
    let scope = normalize_scope(args.scope.as_deref())?;

    let (description, commit_type) =
        draft_description(app, &git, args.commit_type, app.tool.name()).await?;

    let draft = CommitDraft::new(commit_type, scope, &description);
    check_draft(&draft)?;
    let message = compose(app, &draft);

    if !args.commit {
        println!("{message}");
        return Ok(());
    }

    if !args.yes && is_interactive() {
        confirm(app, &message)?;
    }
    commit_with_auto_stage(app, &git, &message, false).await
}

fn tracker(app: &App) -> Result<AiUsageTracker> {
    let root: PathBuf = repo_root(&std::env::current_dir()?);
    Ok(AiUsageTracker::from_settings(&root, &app.settings.ai))
}

/// A ledger inside the work tree must never end up in a commit
async fn keep_ledger_untracked(git: &GitService, tracker: &AiUsageTracker) -> Result<()> {
    if !tracker.is_tracking_enabled() {
        return Ok(());
    }
    match tracker.path().strip_prefix(git.work_dir()) {
        Ok(relative) => git.exclude_locally(relative).await,
        Err(_) => Ok(()),
    }
}

fn usage(app: &App) -> Result<()> {
    let tracker = tracker(app)?;
    if !tracker.is_tracking_enabled() {
        app.out.warning("AI usage tracking is disabled (ai.tracking_enabled)");
        return Ok(());
    }

    let stats = tracker.usage_stats();
    println!("AI usage since {}", stats.period.start_date);
    println!("├── Requests: {}", stats.totals.requests);
    println!("├── Tokens:   {}", stats.totals.tokens);
    println!(
        "└── Cost:     ${:.2} / ${:.2}",
        stats.totals.cost,
        tracker.cost_limit()
    );

    let remaining = tracker.remaining_budget();
    if remaining < tracker.cost_limit() {
        app.out
            .info(&format!("Remaining budget: ${remaining:.2}"));
    }
    if tracker.is_cost_limit_exceeded() {
        app.out
            .warning("Cost limit reached. Reset with: ggai usage reset");
    }
    Ok(())
}

async fn usage_reset(app: &App) -> Result<()> {
    let tracker = tracker(app)?;
    if !tracker.is_tracking_enabled() {
        app.out.warning("AI usage tracking is disabled (ai.tracking_enabled)");
        return Ok(());
    }
    if let Ok(git) = app.git().await {
        keep_ledger_untracked(&git, &tracker).await?;
    }

    tracker.reset_usage()?;
    app.out.success(&format!(
        "Usage counters reset, new period starts {}",
        tracker.usage_stats().period.start_date
    ));
    Ok(())
}

async fn test(app: &App) -> Result<()> {
    let ai = &app.settings.ai;
    println!("Provider: {}", ai.provider);
    println!("Model:    {}", ai.model);
    println!("URL:      {}", ai.base_url);

    if !ai.enabled {
        return Err(Error::AiNotConfigured);
    }
    if let Some(var) = ai.api_key_env.as_deref()
        && std::env::var_os(var).is_none()
    {
        return Err(Error::Config(format!(
            "ai.api_key_env names {var}, but it is not set"
        )));
    }

    let provider = llm::create_provider(ai)?;
    with_spinner(
        format!("Contacting {}...", ai.base_url),
        provider.verify(),
    )
    .await?;

    app.out.success(&format!(
        "{} is reachable and model '{}' is available",
        provider.name(),
        ai.model
    ));
    Ok(())
}

/// Spinner on stderr while `work` runs; Ctrl+C abandons it
async fn with_spinner<T>(message: String, work: impl Future<Output = Result<T>>) -> Result<T> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = tokio::select! {
        result = work => result,
        _ = signal::ctrl_c() => Err(Error::Cancelled),
    };

    spinner.finish_and_clear();
    result
}
