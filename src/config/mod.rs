// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! Layered YAML configuration.
//!
//! Priority, lowest to highest: built-in defaults, `default`, `user`, module
//! files (sorted by file name), `repo`, then `GGGIT_*` environment variables.
//! Environment overrides are never written back to disk.

pub mod schema;
mod settings;

pub use settings::*;

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value as YamlValue};
use tracing::{debug, warn};

use crate::error::{Error, Result};

static KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*$").expect("static regex")
});

const ENV_PREFIX: &str = "GGGIT_";
const MODULE_WRITE_FILE: &str = "default.yaml";

// ─── Levels ───

/// One of the four persisted layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ConfigLevel {
    Repo,
    Module,
    User,
    Default,
}

impl ConfigLevel {
    /// Highest priority first
    pub const PRIORITY: [ConfigLevel; 4] = [Self::Repo, Self::Module, Self::User, Self::Default];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repo => "repo",
            Self::Module => "module",
            Self::User => "user",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for ConfigLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "repo" => Ok(Self::Repo),
            "module" => Ok(Self::Module),
            "user" => Ok(Self::User),
            "default" => Ok(Self::Default),
            other => Err(Error::InvalidLevel(other.to_string())),
        }
    }
}

// ─── Paths ───

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub repo: PathBuf,
    pub modules_dir: PathBuf,
    pub user: PathBuf,
    pub default: PathBuf,
}

impl ConfigPaths {
    /// Layout rooted at a repository and a home directory:
    /// `<repo>/.gggit/repo-config.yaml` and `<home>/.gggit/{modules/,user-config.yaml,default-config.yaml}`
    pub fn new(repo_root: &Path, home: &Path) -> Self {
        let home_dir = home.join(".gggit");
        Self {
            repo: repo_root.join(".gggit").join("repo-config.yaml"),
            modules_dir: home_dir.join("modules"),
            user: home_dir.join("user-config.yaml"),
            default: home_dir.join("default-config.yaml"),
        }
    }

    /// Paths for the current working directory and the user's home
    pub fn discover() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let home = directories::BaseDirs::new()
            .map(|b| b.home_dir().to_path_buf())
            .ok_or_else(|| Error::Config("could not determine home directory".into()))?;
        Ok(Self::new(&repo_root(&cwd), &home))
    }

    /// File that receives module-level writes
    pub fn module_file(&self) -> PathBuf {
        self.modules_dir.join(MODULE_WRITE_FILE)
    }

    fn file_for(&self, level: ConfigLevel) -> PathBuf {
        match level {
            ConfigLevel::Repo => self.repo.clone(),
            ConfigLevel::Module => self.module_file(),
            ConfigLevel::User => self.user.clone(),
            ConfigLevel::Default => self.default.clone(),
        }
    }
}

/// Nearest ancestor holding `.git`, or `start` itself
pub fn repo_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .unwrap_or(start)
        .to_path_buf()
}

// ─── Store ───

/// A flattened `dot.key = value` pair
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Default)]
struct Layers {
    repo: Mapping,
    modules: Vec<(PathBuf, Mapping)>,
    user: Mapping,
    default: Mapping,
    /// Files that failed to parse and were read as empty
    unreadable: Vec<PathBuf>,
}

impl Layers {
    /// With `lenient`, a file that is not valid YAML counts as an empty layer
    fn read(paths: &ConfigPaths, lenient: bool) -> Result<Self> {
        let mut unreadable = Vec::new();
        let mut layer = |path: &Path| -> Result<Mapping> {
            match read_layer(path) {
                Err(Error::Config(message)) if lenient => {
                    warn!("ignoring unreadable layer: {message}");
                    unreadable.push(path.to_path_buf());
                    Ok(Mapping::new())
                }
                other => other,
            }
        };

        let repo = layer(&paths.repo)?;
        let modules = read_modules(&paths.modules_dir, &mut layer)?;
        let user = layer(&paths.user)?;
        let default = layer(&paths.default)?;

        Ok(Self {
            repo,
            modules,
            user,
            default,
            unreadable,
        })
    }

    /// Mapping that a write at `level` edits, creating the module file entry
    /// on first use
    fn target_mut(&mut self, level: ConfigLevel, paths: &ConfigPaths) -> &mut Mapping {
        match level {
            ConfigLevel::Repo => &mut self.repo,
            ConfigLevel::User => &mut self.user,
            ConfigLevel::Default => &mut self.default,
            ConfigLevel::Module => {
                let file = paths.module_file();
                let idx = match self.modules.iter().position(|(p, _)| *p == file) {
                    Some(idx) => idx,
                    None => {
                        self.modules.push((file.clone(), Mapping::new()));
                        sort_modules(&mut self.modules);
                        self.modules
                            .iter()
                            .position(|(p, _)| *p == file)
                            .unwrap_or(self.modules.len() - 1)
                    }
                };
                &mut self.modules[idx].1
            }
        }
    }

    fn level_figment(&self, level: ConfigLevel) -> Figment {
        match level {
            ConfigLevel::Repo => Figment::from(Serialized::defaults(&self.repo)),
            ConfigLevel::User => Figment::from(Serialized::defaults(&self.user)),
            ConfigLevel::Default => Figment::from(Serialized::defaults(&self.default)),
            ConfigLevel::Module => self
                .modules
                .iter()
                .fold(Figment::new(), |fig, (_, m)| fig.merge(Serialized::defaults(m))),
        }
    }

    fn figment(&self) -> Figment {
        let mut fig = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Serialized::defaults(&self.default))
            .merge(Serialized::defaults(&self.user));
        for (_, module) in &self.modules {
            fig = fig.merge(Serialized::defaults(module));
        }
        fig.merge(Serialized::defaults(&self.repo))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

/// The merged configuration plus the four layers it came from
#[derive(Debug, Clone)]
pub struct ConfigStore {
    paths: ConfigPaths,
    layers: Layers,
    figment: Figment,
}

impl ConfigStore {
    /// Read every layer. A file that is not valid YAML is an error; schema
    /// problems are only logged.
    pub fn load(paths: ConfigPaths) -> Result<Self> {
        Self::open(paths, false)
    }

    /// Like [`load`](Self::load), but unparsable files are read as empty
    /// layers so `ggconfig` can still repair them. Such a layer refuses
    /// edits until it is reset as a whole.
    pub fn load_lenient(paths: ConfigPaths) -> Result<Self> {
        Self::open(paths, true)
    }

    fn open(paths: ConfigPaths, lenient: bool) -> Result<Self> {
        let layers = Layers::read(&paths, lenient)?;
        let figment = layers.figment();
        let store = Self {
            paths,
            layers,
            figment,
        };

        for (path, module) in &store.layers.modules {
            if let Err(e) = yaml_to_json(module).and_then(|doc| schema::validate(&doc, "module")) {
                warn!(file = %path.display(), "module file rejected by schema: {e}");
            }
        }
        if let Err(e) = store.validate() {
            warn!("configuration rejected by schema: {e}");
        }

        debug!(
            repo = %store.paths.repo.display(),
            modules = store.layers.modules.len(),
            "config loaded"
        );
        Ok(store)
    }

    /// Convenience for `load(ConfigPaths::discover()?)`
    pub fn discover() -> Result<Self> {
        Self::load(ConfigPaths::discover()?)
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    /// Module files in merge order
    pub fn module_files(&self) -> Vec<&Path> {
        self.layers.modules.iter().map(|(p, _)| p.as_path()).collect()
    }

    /// Dot-path lookup in the merged view
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.figment
            .find_value(key)
            .ok()?
            .deserialize::<serde_json::Value>()
            .ok()
    }

    /// Typed lookup falling back to `default` when missing or mistyped
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.figment
            .find_value(key)
            .ok()
            .and_then(|v| v.deserialize::<T>().ok())
            .unwrap_or(default)
    }

    /// Lookup within a single layer
    pub fn get_at(&self, key: &str, level: ConfigLevel) -> Option<serde_json::Value> {
        self.layers
            .level_figment(level)
            .find_value(key)
            .ok()?
            .deserialize::<serde_json::Value>()
            .ok()
    }

    /// Highest-priority persisted layer that defines `key`
    pub fn level_of(&self, key: &str) -> Option<ConfigLevel> {
        ConfigLevel::PRIORITY
            .into_iter()
            .find(|level| self.layers.level_figment(*level).find_value(key).is_ok())
    }

    /// Whole merged document
    pub fn merged(&self) -> Result<serde_json::Value> {
        Ok(self.figment.extract::<serde_json::Value>()?)
    }

    pub fn settings(&self) -> Result<Settings> {
        Ok(self.figment.extract::<Settings>()?)
    }

    /// Flattened entries of the merged view or of one layer, sorted by key
    pub fn list(&self, level: Option<ConfigLevel>) -> Result<Vec<ConfigEntry>> {
        let doc = match level {
            Some(level) => self.layers.level_figment(level).extract::<serde_json::Value>()?,
            None => self.merged()?,
        };
        let mut entries = Vec::new();
        flatten(&doc, "", &mut entries);
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    /// Validate the merged view against `config` and every module file
    /// against `module`
    pub fn validate(&self) -> Result<()> {
        schema::validate(&self.merged()?, "config")?;
        for (_, module) in &self.layers.modules {
            schema::validate(&yaml_to_json(module)?, "module")?;
        }
        Ok(())
    }

    /// Write `key = value` into one layer. The candidate merged view must
    /// pass the `config` schema before anything touches the disk.
    pub fn set(&mut self, key: &str, value: YamlValue, level: ConfigLevel) -> Result<()> {
        check_key(key)?;
        self.check_readable(level)?;

        let mut candidate = self.layers.clone();
        set_path(candidate.target_mut(level, &self.paths), key, value)?;
        self.commit(candidate, level)?;

        debug!(key, %level, "config value set");
        Ok(())
    }

    /// Remove `key` from one layer. Returns false when it was not there.
    pub fn unset(&mut self, key: &str, level: ConfigLevel) -> Result<bool> {
        check_key(key)?;
        self.check_readable(level)?;

        let mut candidate = self.layers.clone();
        if !remove_path(candidate.target_mut(level, &self.paths), key) {
            return Ok(false);
        }
        self.commit(candidate, level)?;

        debug!(key, %level, "config value removed");
        Ok(true)
    }

    /// Clear one key, or the whole layer when `key` is `None`. At module level
    /// only the module write file is cleared. Returns false when `key` was not
    /// set at that level.
    pub fn reset(&mut self, level: ConfigLevel, key: Option<&str>) -> Result<bool> {
        if let Some(key) = key {
            return self.unset(key, level);
        }

        let mut candidate = self.layers.clone();
        candidate.target_mut(level, &self.paths).clear();
        self.commit(candidate, level)?;

        debug!(%level, "config layer reset");
        Ok(true)
    }

    /// Files read as empty because they did not parse
    pub fn unreadable_files(&self) -> &[PathBuf] {
        &self.layers.unreadable
    }

    /// Key edits would silently drop whatever an unparsable file held
    fn check_readable(&self, level: ConfigLevel) -> Result<()> {
        let path = self.paths.file_for(level);
        if self.layers.unreadable.contains(&path) {
            return Err(Error::Config(format!(
                "{} is not valid YAML; fix it by hand or clear it with: ggconfig reset --level {level}",
                path.display()
            )));
        }
        Ok(())
    }

    fn commit(&mut self, mut candidate: Layers, level: ConfigLevel) -> Result<()> {
        let figment = candidate.figment();
        schema::validate(&figment.extract::<serde_json::Value>()?, "config")?;

        let path = self.paths.file_for(level);
        let mapping = match level {
            ConfigLevel::Repo => &candidate.repo,
            ConfigLevel::User => &candidate.user,
            ConfigLevel::Default => &candidate.default,
            ConfigLevel::Module => candidate
                .modules
                .iter()
                .find(|(p, _)| *p == path)
                .map(|(_, m)| m)
                .ok_or_else(|| Error::Config("module write file missing".into()))?,
        };
        if level == ConfigLevel::Module {
            schema::validate(&yaml_to_json(mapping)?, "module")?;
        }

        write_atomic(&path, &serde_yaml::to_string(mapping)?)?;

        candidate.unreadable.retain(|p| *p != path);
        self.layers = candidate;
        self.figment = figment;
        Ok(())
    }
}

// ─── Values and paths ───

/// [`parse_value`], except that keys the `config` schema types as strings
/// keep their text: `version 2.0` and `git.main_branch 2024` stay strings.
pub fn parse_value_for(key: &str, raw: &str) -> YamlValue {
    match parse_value(raw) {
        YamlValue::Bool(_) | YamlValue::Number(_) if schema::expects_string("config", key) => {
            YamlValue::String(raw.to_string())
        }
        value => value,
    }
}

/// Interpret a command-line value as a YAML scalar: `true` is a bool, `5` an
/// integer, `main` a string. Anything that is not a scalar or list stays a
/// plain string.
pub fn parse_value(raw: &str) -> YamlValue {
    if raw.trim().is_empty() {
        return YamlValue::String(raw.to_string());
    }
    match serde_yaml::from_str::<YamlValue>(raw) {
        Ok(value @ (YamlValue::Bool(_) | YamlValue::Number(_) | YamlValue::String(_))) => value,
        Ok(value @ YamlValue::Sequence(_)) => value,
        Ok(YamlValue::Null) if raw.trim() == "null" || raw.trim() == "~" => YamlValue::Null,
        _ => YamlValue::String(raw.to_string()),
    }
}

fn check_key(key: &str) -> Result<()> {
    if KEY_REGEX.is_match(key) {
        Ok(())
    } else {
        Err(Error::Config(format!("invalid key '{key}' (expected dot.separated.words)")))
    }
}

fn set_path(root: &mut Mapping, key: &str, value: YamlValue) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((last, parents)) = parts.split_last() else {
        return Err(Error::Config("empty key".into()));
    };

    let mut node = root;
    for (depth, part) in parents.iter().enumerate() {
        let entry = node
            .entry(YamlValue::String((*part).to_string()))
            .or_insert_with(|| YamlValue::Mapping(Mapping::new()));
        node = match entry {
            YamlValue::Mapping(m) => m,
            _ => {
                return Err(Error::Config(format!(
                    "cannot set '{key}': '{}' is a value, not a section",
                    parts[..=depth].join(".")
                )));
            }
        };
    }
    node.insert(YamlValue::String((*last).to_string()), value);
    Ok(())
}

/// Remove a leaf and prune sections left empty
fn remove_path(node: &mut Mapping, key: &str) -> bool {
    let (head, rest) = match key.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (key, None),
    };
    let head_key = YamlValue::String(head.to_string());

    match rest {
        None => node.remove(&head_key).is_some(),
        Some(rest) => {
            let Some(YamlValue::Mapping(child)) = node.get_mut(&head_key) else {
                return false;
            };
            let removed = remove_path(child, rest);
            if removed && child.is_empty() {
                node.remove(&head_key);
            }
            removed
        }
    }
}

fn flatten(value: &serde_json::Value, prefix: &str, out: &mut Vec<ConfigEntry>) {
    match value {
        serde_json::Value::Object(map) if !map.is_empty() => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten(v, &key, out);
            }
        }
        serde_json::Value::Object(_) => {}
        other => out.push(ConfigEntry {
            key: prefix.to_string(),
            value: other.clone(),
        }),
    }
}

fn yaml_to_json(mapping: &Mapping) -> Result<serde_json::Value> {
    serde_json::to_value(mapping)
        .map_err(|e| Error::Config(format!("layer cannot be represented as JSON: {e}")))
}

// ─── Files ───

fn read_layer(path: &Path) -> Result<Mapping> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Mapping::new()),
        Err(e) => return Err(e.into()),
    };
    if raw.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let value = serde_yaml::from_str::<YamlValue>(&raw)
        .map_err(|e| Error::Config(format!("{} is not valid YAML: {e}", path.display())))?;
    match value {
        YamlValue::Null => Ok(Mapping::new()),
        YamlValue::Mapping(m) => Ok(m),
        _ => Err(Error::Config(format!(
            "{} must contain a YAML mapping",
            path.display()
        ))),
    }
}

fn read_modules(
    dir: &Path,
    read: &mut impl FnMut(&Path) -> Result<Mapping>,
) -> Result<Vec<(PathBuf, Mapping)>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut modules = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| matches!(e, "yaml" | "yml"));
        if is_yaml && path.is_file() {
            let mapping = read(&path)?;
            modules.push((path, mapping));
        }
    }
    sort_modules(&mut modules);
    Ok(modules)
}

fn sort_modules(modules: &mut [(PathBuf, Mapping)]) {
    modules.sort_by(|(a, _), (b, _)| a.file_name().cmp(&b.file_name()));
}

/// Replace `path` via a sibling temp file so readers never see a partial write
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
