// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::ffi::OsString;
use std::path::Path;

use clap::{Args, CommandFactory, FromArgMatches, Parser, Subcommand};

use crate::config::ConfigLevel;
use crate::domain::CommitType;

// ─── Tools ───

/// Every `gg*` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Gga,
    Ggs,
    Ggl,
    Ggdif,
    Ggb,
    Ggmerge,
    Ggfeat,
    Ggfix,
    Ggbreak,
    Ggdocs,
    Ggstyle,
    Ggchore,
    Ggbuild,
    Ggci,
    Ggperf,
    Ggtest,
    Ggrefactor,
    Ggai,
    Ggconfig,
    Ggpl,
    Ggpp,
    Ggreset,
    Ggunstage,
    Ggv,
    Ggmain,
    Ggdevelop,
}

impl Tool {
    pub const ALL: [Tool; 26] = [
        Self::Gga,
        Self::Ggs,
        Self::Ggl,
        Self::Ggdif,
        Self::Ggb,
        Self::Ggmerge,
        Self::Ggfeat,
        Self::Ggfix,
        Self::Ggbreak,
        Self::Ggdocs,
        Self::Ggstyle,
        Self::Ggchore,
        Self::Ggbuild,
        Self::Ggci,
        Self::Ggperf,
        Self::Ggtest,
        Self::Ggrefactor,
        Self::Ggai,
        Self::Ggconfig,
        Self::Ggpl,
        Self::Ggpp,
        Self::Ggreset,
        Self::Ggunstage,
        Self::Ggv,
        Self::Ggmain,
        Self::Ggdevelop,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gga => "gga",
            Self::Ggs => "ggs",
            Self::Ggl => "ggl",
            Self::Ggdif => "ggdif",
            Self::Ggb => "ggb",
            Self::Ggmerge => "ggmerge",
            Self::Ggfeat => "ggfeat",
            Self::Ggfix => "ggfix",
            Self::Ggbreak => "ggbreak",
            Self::Ggdocs => "ggdocs",
            Self::Ggstyle => "ggstyle",
            Self::Ggchore => "ggchore",
            Self::Ggbuild => "ggbuild",
            Self::Ggci => "ggci",
            Self::Ggperf => "ggperf",
            Self::Ggtest => "ggtest",
            Self::Ggrefactor => "ggrefactor",
            Self::Ggai => "ggai",
            Self::Ggconfig => "ggconfig",
            Self::Ggpl => "ggpl",
            Self::Ggpp => "ggpp",
            Self::Ggreset => "ggreset",
            Self::Ggunstage => "ggunstage",
            Self::Ggv => "ggv",
            Self::Ggmain => "ggmain",
            Self::Ggdevelop => "ggdevelop",
        }
    }

    /// Accepts `ggfeat`, `feat`, or a path such as `/usr/bin/ggfeat.exe`
    pub fn from_name(name: &str) -> Option<Self> {
        let base = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name)
            .to_lowercase();
        let full = if base.starts_with("gg") {
            base
        } else {
            format!("gg{base}")
        };
        Self::ALL.into_iter().find(|t| t.name() == full)
    }

    pub fn about(&self) -> &'static str {
        match self {
            Self::Gga => "Stage files, or every change when none are given",
            Self::Ggs => "Show the working tree status",
            Self::Ggl => "Show the commit graph of all branches",
            Self::Ggdif => "Show changes in the working tree or the index",
            Self::Ggb => "List, create or switch branches",
            Self::Ggmerge => "Merge a branch into the current one",
            Self::Ggfeat => "Commit a new feature (feat)",
            Self::Ggfix => "Commit a bug fix (fix)",
            Self::Ggbreak => "Commit a breaking change (break)",
            Self::Ggdocs => "Commit documentation changes (docs)",
            Self::Ggstyle => "Commit formatting changes (style)",
            Self::Ggchore => "Commit maintenance work (chore)",
            Self::Ggbuild => "Commit build system changes (build)",
            Self::Ggci => "Commit CI configuration changes (ci)",
            Self::Ggperf => "Commit a performance improvement (perf)",
            Self::Ggtest => "Commit test changes (test)",
            Self::Ggrefactor => "Commit a refactor (refactor)",
            Self::Ggai => "Generate commit messages with AI and inspect usage",
            Self::Ggconfig => "Read and edit gggit configuration",
            Self::Ggpl => "Pull from a remote",
            Self::Ggpp => "Push to a remote",
            Self::Ggreset => "Discard all local changes (reset --hard HEAD)",
            Self::Ggunstage => "Unstage files, or everything when none are given",
            Self::Ggv => "Show gggit and git versions",
            Self::Ggmain => "Switch to the main branch",
            Self::Ggdevelop => "Switch to the develop branch",
        }
    }

    /// Conventional commit type for the commit tools
    pub fn commit_type(&self) -> Option<CommitType> {
        match self {
            Self::Ggfeat => Some(CommitType::Feat),
            Self::Ggfix => Some(CommitType::Fix),
            Self::Ggbreak => Some(CommitType::Break),
            Self::Ggdocs => Some(CommitType::Docs),
            Self::Ggstyle => Some(CommitType::Style),
            Self::Ggchore => Some(CommitType::Chore),
            Self::Ggbuild => Some(CommitType::Build),
            Self::Ggci => Some(CommitType::Ci),
            Self::Ggperf => Some(CommitType::Perf),
            Self::Ggtest => Some(CommitType::Test),
            Self::Ggrefactor => Some(CommitType::Refactor),
            _ => None,
        }
    }

    /// Parse a full argv (program name first) into this tool's arguments
    pub fn parse_from<I, T>(self, argv: I) -> Result<Invocation, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();

        if let Some(commit_type) = self.commit_type() {
            return Ok(Invocation::Commit(commit_type, self.parse_args(argv)?));
        }

        Ok(match self {
            Self::Gga => Invocation::Add(self.parse_args(argv)?),
            Self::Ggs => Invocation::Status(self.parse_args(argv)?),
            Self::Ggl => Invocation::Log(self.parse_args(argv)?),
            Self::Ggdif => Invocation::Diff(self.parse_args(argv)?),
            Self::Ggb => Invocation::Branch(self.parse_args(argv)?),
            Self::Ggmerge => Invocation::Merge(self.parse_args(argv)?),
            Self::Ggai => Invocation::Ai(self.parse_args(argv)?),
            Self::Ggconfig => Invocation::Config(self.parse_args(argv)?),
            Self::Ggpl => Invocation::Pull(self.parse_args(argv)?),
            Self::Ggpp => Invocation::Push(self.parse_args(argv)?),
            Self::Ggreset => Invocation::Reset(self.parse_args(argv)?),
            Self::Ggunstage => Invocation::Unstage(self.parse_args(argv)?),
            Self::Ggv => Invocation::Version(self.parse_args(argv)?),
            Self::Ggmain => Invocation::Main(self.parse_args(argv)?),
            Self::Ggdevelop => Invocation::Develop(self.parse_args(argv)?),
            _ => unreachable!("commit tools handled above"),
        })
    }

    fn parse_args<A: CommandFactory + FromArgMatches>(
        self,
        argv: Vec<OsString>,
    ) -> Result<A, clap::Error> {
        let matches = A::command()
            .name(self.name())
            .bin_name(self.name())
            .about(self.about())
            .version(env!("CARGO_PKG_VERSION"))
            .try_get_matches_from(argv)?;
        A::from_arg_matches(&matches)
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parsed arguments of one tool run
#[derive(Debug)]
pub enum Invocation {
    Add(AddArgs),
    Status(PassthroughArgs),
    Log(PassthroughArgs),
    Diff(DiffArgs),
    Branch(BranchArgs),
    Merge(MergeArgs),
    Commit(CommitType, CommitArgs),
    Ai(AiArgs),
    Config(ConfigArgs),
    Pull(RemoteArgs),
    Push(RemoteArgs),
    Reset(ResetArgs),
    Unstage(UnstageArgs),
    Version(PlainArgs),
    Main(PlainArgs),
    Develop(PlainArgs),
}

impl Invocation {
    pub fn verbose(&self) -> bool {
        match self {
            Self::Add(a) => a.common.verbose,
            Self::Status(a) | Self::Log(a) => a.common.verbose,
            Self::Diff(a) => a.common.verbose,
            Self::Branch(a) => a.common.verbose,
            Self::Merge(a) => a.common.verbose,
            Self::Commit(_, a) => a.common.verbose,
            Self::Ai(a) => a.common.verbose,
            Self::Config(a) => a.common.verbose,
            Self::Pull(a) | Self::Push(a) => a.common.verbose,
            Self::Reset(a) => a.common.verbose,
            Self::Unstage(a) => a.common.verbose,
            Self::Version(a) | Self::Main(a) | Self::Develop(a) => a.common.verbose,
        }
    }
}

// ─── Arguments ───

#[derive(Args, Debug, Clone, Default)]
pub struct Common {
    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
pub struct PlainArgs {
    #[command(flatten)]
    pub common: Common,
}

#[derive(Parser, Debug)]
pub struct CommitArgs {
    /// Commit description; words are joined with spaces
    #[arg(conflicts_with = "ai")]
    pub message: Vec<String>,

    /// Conventional commit scope, e.g. `auth`
    #[arg(short, long)]
    pub scope: Option<String>,

    /// Amend the previous commit
    #[arg(short, long)]
    pub amend: bool,

    /// Generate the description with AI
    #[arg(long)]
    pub ai: bool,

    /// Print the message only, don't commit
    #[arg(long)]
    pub dry_run: bool,

    /// Commit AI messages without asking
    #[arg(short = 'y', long)]
    pub yes: bool,

    #[command(flatten)]
    pub common: Common,
}

#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Files to stage
    pub files: Vec<String>,

    /// Stage every change, including untracked files
    #[arg(short, long)]
    pub all: bool,

    #[command(flatten)]
    pub common: Common,
}

#[derive(Parser, Debug)]
pub struct PassthroughArgs {
    /// Extra arguments handed to git unchanged
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    #[command(flatten)]
    pub common: Common,
}

#[derive(Parser, Debug)]
pub struct DiffArgs {
    /// Limit the diff to these paths
    pub files: Vec<String>,

    /// Show staged changes
    #[arg(short, long)]
    pub staged: bool,

    #[command(flatten)]
    pub common: Common,
}

#[derive(Parser, Debug)]
pub struct BranchArgs {
    /// Branch name; words are joined with hyphens (`New Feature` → `new-feature`)
    pub name: Vec<String>,

    /// List local and remote branches
    #[arg(short, long, conflicts_with = "name")]
    pub list: bool,

    /// Start point for a new branch
    #[arg(long, value_name = "START")]
    pub from: Option<String>,

    #[command(flatten)]
    pub common: Common,
}

#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// Branch to merge; chosen interactively when omitted
    pub branch: Option<String>,

    /// Abort the merge in progress
    #[arg(short, long, conflicts_with_all = ["branch", "continue_merge"])]
    pub abort: bool,

    /// Conclude the merge in progress after resolving conflicts
    #[arg(short = 'c', long = "continue", conflicts_with = "branch")]
    pub continue_merge: bool,

    #[command(flatten)]
    pub common: Common,
}

#[derive(Parser, Debug)]
pub struct RemoteArgs {
    pub remote: Option<String>,

    /// Requires a remote
    #[arg(requires = "remote")]
    pub branch: Option<String>,

    #[command(flatten)]
    pub common: Common,
}

#[derive(Parser, Debug)]
pub struct ResetArgs {
    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    #[command(flatten)]
    pub common: Common,
}

#[derive(Parser, Debug)]
pub struct UnstageArgs {
    /// Files to unstage; everything when omitted
    pub files: Vec<String>,

    #[command(flatten)]
    pub common: Common,
}

#[derive(Parser, Debug)]
#[command(args_conflicts_with_subcommands = true)]
pub struct AiArgs {
    #[command(subcommand)]
    pub command: Option<AiCommand>,

    /// Commit type; inferred from the changed files when omitted
    #[arg(long = "type", value_name = "TYPE", value_parser = parse_commit_type)]
    pub commit_type: Option<CommitType>,

    /// Conventional commit scope
    #[arg(short, long)]
    pub scope: Option<String>,

    /// Commit with the generated message
    #[arg(long)]
    pub commit: bool,

    /// Commit without asking
    #[arg(short = 'y', long)]
    pub yes: bool,

    #[command(flatten)]
    pub common: Common,
}

#[derive(Subcommand, Debug)]
pub enum AiCommand {
    /// Show AI usage and cost
    Usage {
        #[command(subcommand)]
        action: Option<UsageAction>,
    },
    /// Check configuration, endpoint reachability and model availability
    Test,
}

#[derive(Subcommand, Debug)]
pub enum UsageAction {
    /// Start a new usage period
    Reset,
}

fn parse_commit_type(s: &str) -> Result<CommitType, String> {
    CommitType::parse(&s.to_lowercase())
        .ok_or_else(|| format!("expected one of: {}", CommitType::ALL.join(", ")))
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,

    #[command(flatten)]
    pub common: Common,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print a value from the merged configuration, or from one level
    Get {
        key: String,
        #[arg(short, long, value_enum)]
        level: Option<ConfigLevel>,
    },
    /// Write a value; parsed as YAML (`true`, `5`, `main`)
    Set {
        key: String,
        value: String,
        #[arg(short, long, value_enum, default_value_t = ConfigLevel::User)]
        level: ConfigLevel,
    },
    /// Print every key and value
    List {
        #[arg(short, long, value_enum)]
        level: Option<ConfigLevel>,
    },
    /// Remove a key from a level, or clear the level
    Reset {
        key: Option<String>,
        #[arg(short, long, value_enum, default_value_t = ConfigLevel::User)]
        level: ConfigLevel,
    },
    /// Check the configuration against its schema
    Validate,
}

// ─── Multiplexer ───

/// `gggit <tool> [ARGS]...`
#[derive(Parser, Debug)]
#[command(name = "gggit", version)]
#[command(about = "Conventional commits, branches and AI commit messages on top of git", long_about = None)]
#[command(after_help = "Tools: gga ggs ggl ggdif ggb ggmerge ggfeat ggfix ggbreak ggdocs ggstyle ggchore ggbuild ggci ggperf ggtest ggrefactor ggai ggconfig ggpl ggpp ggreset ggunstage ggv ggmain ggdevelop")]
pub struct Cli {
    /// Tool to run, with or without the `gg` prefix (`feat`, `ggfeat`)
    pub tool: String,

    /// Arguments for the tool
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<OsString>,
}
