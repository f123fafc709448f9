// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::path::{Path, PathBuf};
use std::process::Command;

use gggit::config::{ConfigPaths, ConfigStore};
use gggit::domain::ComplexityAnalysis;
use tempfile::TempDir;

/// Throwaway repository with a local identity, on branch `main`.
#[allow(dead_code)]
pub struct TempRepo {
    dir: TempDir,
}

#[allow(dead_code)]
impl TempRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Self { dir };
        repo.git(&["init", "-q"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo
    }

    /// Repository with one commit on `main`
    pub fn with_initial_commit() -> Self {
        let repo = Self::new();
        repo.write("README.md", "# test\n");
        repo.git(&["add", "README.md"]);
        repo.git(&["commit", "-q", "-m", "initial commit"]);
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run git in the repository, panicking on failure; returns trimmed stdout
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.dir.path())
            .output()
            .expect("git runs");
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, contents).expect("write file");
        path
    }

    pub fn head_subject(&self) -> String {
        self.git(&["log", "-1", "--format=%s"])
    }

    pub fn current_branch(&self) -> String {
        self.git(&["branch", "--show-current"])
    }
}

/// Repository root and home directory for configuration tests.
#[allow(dead_code)]
pub struct ConfigSandbox {
    pub repo: TempDir,
    pub home: TempDir,
}

#[allow(dead_code)]
impl ConfigSandbox {
    pub fn new() -> Self {
        Self {
            repo: tempfile::tempdir().expect("tempdir"),
            home: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn paths(&self) -> ConfigPaths {
        ConfigPaths::new(self.repo.path(), self.home.path())
    }

    pub fn store(&self) -> ConfigStore {
        ConfigStore::load(self.paths()).expect("config loads")
    }

    /// Write raw YAML to a layer file
    pub fn write(&self, path: &Path, yaml: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, yaml).expect("write layer");
    }

    pub fn write_module(&self, name: &str, yaml: &str) {
        self.write(&self.paths().modules_dir.join(name), yaml);
    }
}

/// Analysis result without touching git
#[allow(dead_code)]
pub fn make_analysis(file_count: usize, diff_lines: usize, max_file_size: u64) -> ComplexityAnalysis {
    ComplexityAnalysis {
        file_count,
        diff_lines,
        max_file_size,
        files: (0..file_count).map(|i| format!("src/file_{i}.rs")).collect(),
        has_staged: true,
    }
}
