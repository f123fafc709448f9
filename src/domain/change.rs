// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Source,
    Test,
    Config,
    Docs,
    Build,
    Ci,
    Other,
}

impl FileCategory {
    pub fn from_path(path: &Path) -> Self {
        let path_str = path.to_string_lossy();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        // CI before everything else: workflows are YAML but not config
        if path.starts_with(".github/workflows")
            || path_str.contains("/.github/workflows/")
            || matches!(name, ".gitlab-ci.yml" | ".travis.yml" | "Jenkinsfile")
            || path.starts_with(".circleci/")
        {
            return Self::Ci;
        }

        if name.contains("_test.")
            || name.contains(".test.")
            || name.contains("_spec.")
            || name.starts_with("test_")
            || path.starts_with("tests/")
            || path_str.contains("/tests/")
            || path_str.contains("/test/")
        {
            return Self::Test;
        }

        if path.starts_with("docs/")
            || path_str.contains("/docs/")
            || matches!(ext, "md" | "rst" | "txt")
        {
            return Self::Docs;
        }

        if matches!(
            name,
            "Dockerfile"
                | "docker-compose.yml"
                | "Makefile"
                | "justfile"
                | ".dockerignore"
                | "build.rs"
                | "setup.py"
                | "Cargo.toml"
                | "Cargo.lock"
                | "package.json"
                | "package-lock.json"
                | "pyproject.toml"
                | "go.mod"
                | "go.sum"
        ) || ext == "dockerfile"
        {
            return Self::Build;
        }

        if matches!(name, ".gitignore" | ".editorconfig" | ".env.example")
            || matches!(ext, "yaml" | "yml" | "toml" | "json" | "ini" | "cfg")
        {
            return Self::Config;
        }

        match ext {
            "rs" | "ts" | "js" | "py" | "go" | "tsx" | "jsx" | "java" | "kt" | "c" | "cpp"
            | "h" | "hpp" | "rb" | "cs" | "sh" => Self::Source,
            _ => Self::Other,
        }
    }
}

/// Size of the pending change set, computed fresh for every AI request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplexityAnalysis {
    pub file_count: usize,
    pub diff_lines: usize,
    pub max_file_size: u64,
    pub files: Vec<String>,
    pub has_staged: bool,
}

impl ComplexityAnalysis {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
