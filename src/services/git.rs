// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::domain::BranchList;
use crate::error::{Error, Result};

/// Read-only queries
const QUERY_TIMEOUT: Duration = Duration::from_secs(10);
/// Anything that writes to the repository
const MUTATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin async wrapper over the `git` executable. Nothing is cached: every
/// call asks git again.
#[derive(Debug, Clone)]
pub struct GitService {
    /// Where commands run; user-supplied paths are relative to it
    cwd: PathBuf,
    /// Repository top level; paths printed by git are relative to it
    work_dir: PathBuf,
}

impl GitService {
    pub async fn discover() -> Result<Self> {
        Self::open(std::env::current_dir()?).await
    }

    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let cwd = dir.into();
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(&cwd)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(spawn_error)?;

        if !output.status.success() {
            return Err(Error::NotAGitRepo);
        }

        let work_dir = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
        debug!(work_dir = %work_dir.display(), "repository found");
        Ok(Self { cwd, work_dir })
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// `git --version` without the `git version ` prefix
    pub async fn version() -> Result<String> {
        let mut cmd = Command::new("git");
        cmd.arg("--version").stdin(Stdio::null());

        let output = tokio::time::timeout(QUERY_TIMEOUT, cmd.output())
            .await
            .map_err(|_| Error::GitNotAvailable)?
            .map_err(spawn_error)?;

        if !output.status.success() {
            return Err(Error::GitNotAvailable);
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        Ok(raw
            .trim()
            .trim_start_matches("git version ")
            .to_string())
    }

    // ─── Queries ───

    /// Current branch name, `HEAD` when detached
    pub async fn current_branch(&self) -> Result<String> {
        let name = self.query(["branch", "--show-current"]).await?;
        let name = name.trim();
        Ok(if name.is_empty() { "HEAD" } else { name }.to_string())
    }

    pub async fn staged_files(&self) -> Result<Vec<String>> {
        let out = self
            .query(["diff", "--cached", "--name-only", "--no-renames"])
            .await?;
        Ok(lines(&out))
    }

    /// Modified tracked files followed by untracked ones
    pub async fn unstaged_files(&self) -> Result<Vec<String>> {
        let mut files = lines(&self.query(["diff", "--name-only", "--no-renames"]).await?);
        for file in lines(
            &self
                .query(["ls-files", "--others", "--exclude-standard", "--full-name"])
                .await?,
        ) {
            if !files.contains(&file) {
                files.push(file);
            }
        }
        Ok(files)
    }

    pub async fn has_staged_changes(&self) -> Result<bool> {
        Ok(!self.staged_files().await?.is_empty())
    }

    pub async fn branches(&self) -> Result<Vec<String>> {
        let out = self
            .query(["branch", "--format=%(refname:short)"])
            .await?;
        Ok(lines(&out))
    }

    /// Remote-tracking branches without the `origin/HEAD` pointers
    pub async fn remote_branches(&self) -> Result<Vec<String>> {
        let out = self
            .query(["branch", "-r", "--format=%(refname:short)"])
            .await?;
        Ok(lines(&out)
            .into_iter()
            .filter(|b| b.contains('/') && !b.ends_with("/HEAD") && !b.contains(" -> "))
            .collect())
    }

    pub async fn branch_list(&self) -> Result<BranchList> {
        Ok(BranchList {
            local: self.branches().await?,
            remote: self.remote_branches().await?,
        })
    }

    pub async fn branch_exists(&self, name: &str) -> Result<bool> {
        Ok(self.branches().await?.iter().any(|b| b == name))
    }

    /// Local branches other than the current one
    pub async fn mergeable_branches(&self) -> Result<Vec<String>> {
        let current = self.current_branch().await?;
        Ok(self
            .branches()
            .await?
            .into_iter()
            .filter(|b| *b != current)
            .collect())
    }

    pub async fn diff_content(&self, files: &[String], staged: bool) -> Result<String> {
        self.query(diff_args(files, staged)).await
    }

    /// Added plus removed lines, file headers excluded
    pub async fn diff_line_count(&self, files: &[String], staged: bool) -> Result<usize> {
        let diff = self.diff_content(files, staged).await?;
        let (additions, deletions) = count_changes(&diff);
        Ok(additions + deletions)
    }

    /// Size in bytes of a file named relative to the repository root; 0 when
    /// it no longer exists
    pub fn file_size(&self, path: &str) -> u64 {
        std::fs::metadata(self.work_dir.join(path))
            .map(|m| m.len())
            .unwrap_or(0)
    }

    /// Staged files when there are any, otherwise the unstaged ones. The flag
    /// tells which set was returned.
    pub async fn files_to_analyze(&self) -> Result<(Vec<String>, bool)> {
        let staged = self.staged_files().await?;
        if !staged.is_empty() {
            return Ok((staged, true));
        }
        Ok((self.unstaged_files().await?, false))
    }

    /// Whether the change set adds files: staged additions, or untracked
    /// files when looking at the working tree
    pub async fn has_new_files(&self, staged: bool) -> Result<bool> {
        let out = if staged {
            self.query(["diff", "--cached", "--name-only", "--diff-filter=A"])
                .await?
        } else {
            self.query(["ls-files", "--others", "--exclude-standard"])
                .await?
        };
        Ok(!out.trim().is_empty())
    }

    // ─── Mutations ───

    /// Ignore `path` (relative to the top level) through `info/exclude`, so
    /// `git add --all` never picks it up. The exclude file itself is never
    /// committed.
    pub async fn exclude_locally(&self, path: &Path) -> Result<()> {
        let pattern = format!("/{}", path.to_string_lossy().replace('\\', "/"));
        let exclude = self.query(["rev-parse", "--git-path", "info/exclude"]).await?;
        let exclude = self.cwd.join(exclude.trim());

        let mut contents = match std::fs::read_to_string(&exclude) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        if contents.lines().any(|line| line.trim() == pattern) {
            return Ok(());
        }

        if !contents.is_empty() && !contents.ends_with('\n') {
            contents.push('\n');
        }
        contents.push_str(&pattern);
        contents.push('\n');

        if let Some(parent) = exclude.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&exclude, contents)?;
        debug!(%pattern, file = %exclude.display(), "path excluded locally");
        Ok(())
    }

    pub async fn stage_all(&self) -> Result<()> {
        self.mutate(["add", "--all"]).await.map(drop)
    }

    /// Stage the given paths; every one of them must exist
    pub async fn stage_files(&self, files: &[String]) -> Result<()> {
        if files.is_empty() {
            return Err(Error::Validation("No files given to stage".into()));
        }
        if let Some(missing) = files.iter().find(|f| !self.cwd.join(f).exists()) {
            return Err(Error::Validation(format!("File not found: {missing}")));
        }

        let mut args: Vec<OsString> = vec!["add".into(), "--".into()];
        args.extend(files.iter().map(OsString::from));
        self.mutate(args).await.map(drop)
    }

    /// Unstage the given paths, or everything when none are given
    pub async fn unstage_files(&self, files: &[String]) -> Result<()> {
        let mut args: Vec<OsString> = vec!["reset".into(), "-q".into()];
        if !files.is_empty() {
            args.push("--".into());
            args.extend(files.iter().map(OsString::from));
        }
        self.mutate(args).await.map(drop)
    }

    pub async fn commit(&self, message: &str, amend: bool) -> Result<()> {
        if !amend && !self.has_staged_changes().await? {
            return Err(Error::NothingToCommit);
        }

        let mut args: Vec<OsString> = vec!["commit".into(), "-m".into(), message.into()];
        if amend {
            args.push("--amend".into());
        }
        self.mutate(args).await.map(drop)
    }

    pub async fn create_branch(&self, name: &str, start_point: Option<&str>) -> Result<()> {
        let mut args: Vec<OsString> = vec!["branch".into(), name.into()];
        if let Some(start) = start_point {
            args.push(start.into());
        }
        self.mutate(args).await.map(drop)
    }

    pub async fn switch_branch(&self, name: &str) -> Result<()> {
        self.mutate(["switch", "--quiet", name]).await.map(drop)
    }

    pub async fn merge_branch(&self, name: &str) -> Result<()> {
        self.mutate(["merge", "--no-ff", "--no-edit", name])
            .await
            .map(drop)
    }

    pub async fn merge_abort(&self) -> Result<()> {
        self.mutate(["merge", "--abort"]).await.map(drop)
    }

    pub async fn merge_continue(&self) -> Result<()> {
        self.mutate(["-c", "core.editor=true", "merge", "--continue"])
            .await
            .map(drop)
    }

    pub async fn reset_hard(&self) -> Result<()> {
        self.mutate(["reset", "--hard", "HEAD"]).await.map(drop)
    }

    // ─── Passthrough (inherits the terminal, no timeout) ───

    pub async fn status(&self, args: &[String]) -> Result<()> {
        let mut full: Vec<OsString> = vec!["status".into()];
        full.extend(args.iter().map(OsString::from));
        self.passthrough(full).await
    }

    pub async fn log(&self, args: &[String]) -> Result<()> {
        let mut full: Vec<OsString> = ["log", "--oneline", "--graph", "--all", "--decorate"]
            .into_iter()
            .map(OsString::from)
            .collect();
        full.extend(args.iter().map(OsString::from));
        self.passthrough(full).await
    }

    pub async fn diff(&self, files: &[String], staged: bool) -> Result<()> {
        self.passthrough(diff_args(files, staged)).await
    }

    pub async fn pull(&self, remote: Option<&str>, branch: Option<&str>) -> Result<()> {
        self.passthrough(remote_args("pull", remote, branch)).await
    }

    pub async fn push(&self, remote: Option<&str>, branch: Option<&str>) -> Result<()> {
        self.passthrough(remote_args("push", remote, branch)).await
    }

    // ─── Plumbing ───

    async fn query<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.run(args, QUERY_TIMEOUT).await
    }

    async fn mutate<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.run(args, MUTATION_TIMEOUT).await
    }

    async fn run<I, S>(&self, args: I, limit: Duration) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let command = display_args(&args);

        let mut cmd = Command::new("git");
        cmd.args(&args)
            .current_dir(&self.cwd)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(limit, cmd.output())
            .await
            .map_err(|_| Error::GitCommand {
                command: command.clone(),
                message: format!("timed out after {}s", limit.as_secs()),
            })?
            .map_err(spawn_error)?;

        debug!(command = %command, status = %output.status, "git command finished");

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            if message.contains("not a git repository") {
                return Err(Error::NotAGitRepo);
            }
            return Err(Error::GitCommand { command, message });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn passthrough(&self, args: Vec<OsString>) -> Result<()> {
        let command = display_args(&args);
        let status = Command::new("git")
            .args(&args)
            .current_dir(&self.cwd)
            .status()
            .await
            .map_err(spawn_error)?;

        debug!(command = %command, %status, "git passthrough finished");

        if status.success() {
            Ok(())
        } else {
            Err(Error::GitCommand {
                command,
                message: format!("exited with {status}"),
            })
        }
    }
}

fn spawn_error(e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        Error::GitNotAvailable
    } else {
        Error::Io(e)
    }
}

fn display_args(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

fn lines(out: &str) -> Vec<String> {
    out.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

fn diff_args(files: &[String], staged: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["diff".into(), "--no-ext-diff".into()];
    if staged {
        args.push("--cached".into());
    }
    if !files.is_empty() {
        args.push("--".into());
        args.extend(files.iter().map(OsString::from));
    }
    args
}

fn remote_args(verb: &str, remote: Option<&str>, branch: Option<&str>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![verb.into()];
    if let Some(remote) = remote {
        args.push(remote.into());
        if let Some(branch) = branch {
            args.push(branch.into());
        }
    }
    args
}

/// `(additions, deletions)` in a unified diff
pub fn count_changes(diff: &str) -> (usize, usize) {
    let mut additions = 0;
    let mut deletions = 0;

    for line in diff.lines() {
        if line.starts_with('+') && !line.starts_with("+++") {
            additions += 1;
        } else if line.starts_with('-') && !line.starts_with("---") {
            deletions += 1;
        }
    }

    (additions, deletions)
}
