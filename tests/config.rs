// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

mod helpers;

use gggit::Error;
use gggit::config::{
    CommitFormat, ConfigLevel, ConfigStore, Provider, parse_value, parse_value_for, schema,
};
use helpers::ConfigSandbox;
use serde_json::json;
use serde_yaml::Value as YamlValue;

// ─── Built-in defaults ───────────────────────────────────────────────────────

#[test]
fn empty_sandbox_yields_builtin_defaults() {
    let sandbox = ConfigSandbox::new();
    let store = sandbox.store();
    let settings = store.settings().unwrap();

    assert_eq!(settings.version, "1.0");
    assert!(settings.git.auto_stage);
    assert_eq!(settings.git.main_branch, "main");
    assert_eq!(settings.git.develop_branch, "develop");
    assert_eq!(settings.commit.format, CommitFormat::Conventional);
    assert!(!settings.ai.enabled);
    assert_eq!(settings.ai.provider, Provider::Ollama);
    assert_eq!(settings.ai.model, "qwen3:4b");
    assert_eq!(settings.ai.base_url, "http://localhost:11434");
    assert!((settings.ai.cost_limit - 5.0).abs() < 1e-9);
    assert_eq!(settings.ui.colors.success, "green");

    assert_eq!(store.get("version"), Some(json!("1.0")));
    assert!(store.validate().is_ok());
}

#[test]
fn missing_key_is_none_and_get_or_falls_back() {
    let sandbox = ConfigSandbox::new();
    let store = sandbox.store();
    assert_eq!(store.get("nope.not.here"), None);
    assert_eq!(store.level_of("nope.not.here"), None);
    assert_eq!(store.get_or("nope.not.here", 7_u32), 7);
    assert_eq!(store.get_or("git.main_branch", String::new()), "main");
}

// ─── Layer merging ───────────────────────────────────────────────────────────

#[test]
fn user_layer_deep_merges_over_default_layer() {
    let sandbox = ConfigSandbox::new();
    let paths = sandbox.paths();
    sandbox.write(&paths.default, "custom:\n  a: 1\n  b: 2\n");
    sandbox.write(&paths.user, "custom:\n  a: 3\n");

    let store = sandbox.store();
    assert_eq!(store.get("custom"), Some(json!({ "a": 3, "b": 2 })));
    assert_eq!(store.level_of("custom.a"), Some(ConfigLevel::User));
    assert_eq!(store.level_of("custom.b"), Some(ConfigLevel::Default));
}

#[test]
fn repo_beats_module_beats_user_beats_default() {
    let sandbox = ConfigSandbox::new();
    let paths = sandbox.paths();
    sandbox.write(&paths.default, "git:\n  main_branch: from-default\n");
    sandbox.write(&paths.user, "git:\n  main_branch: from-user\n");
    sandbox.write_module("team.yaml", "git:\n  main_branch: from-module\n");

    let store = sandbox.store();
    assert_eq!(store.get("git.main_branch"), Some(json!("from-module")));
    assert_eq!(store.level_of("git.main_branch"), Some(ConfigLevel::Module));

    sandbox.write(&paths.repo, "git:\n  main_branch: from-repo\n");
    let store = sandbox.store();
    assert_eq!(store.get("git.main_branch"), Some(json!("from-repo")));
    assert_eq!(store.level_of("git.main_branch"), Some(ConfigLevel::Repo));
    assert_eq!(
        store.get_at("git.main_branch", ConfigLevel::User),
        Some(json!("from-user"))
    );
    assert_eq!(store.settings().unwrap().git.main_branch, "from-repo");
}

#[test]
fn module_files_merge_in_filename_order() {
    let sandbox = ConfigSandbox::new();
    sandbox.write_module("b-second.yaml", "git:\n  develop_branch: beta\n");
    sandbox.write_module("a-first.yml", "git:\n  develop_branch: alpha\n");
    sandbox.write_module("notes.txt", "git:\n  develop_branch: ignored\n");

    let store = sandbox.store();
    let names: Vec<String> = store
        .module_files()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["a-first.yml", "b-second.yaml"]);
    assert_eq!(store.get("git.develop_branch"), Some(json!("beta")));
}

#[test]
fn environment_overrides_every_layer() {
    let sandbox = ConfigSandbox::new();
    sandbox.write(&sandbox.paths().repo, "custom:\n  from_env: repo\n");

    // SAFETY: the variable name is unique to this test
    unsafe { std::env::set_var("GGGIT_CUSTOM__FROM_ENV", "environment") };
    let store = sandbox.store();
    unsafe { std::env::remove_var("GGGIT_CUSTOM__FROM_ENV") };

    assert_eq!(store.get("custom.from_env"), Some(json!("environment")));
}

#[test]
fn blank_and_null_layers_are_empty() {
    let sandbox = ConfigSandbox::new();
    let paths = sandbox.paths();
    sandbox.write(&paths.user, "");
    sandbox.write(&paths.default, "~\n");

    let store = sandbox.store();
    assert!(store.list(Some(ConfigLevel::User)).unwrap().is_empty());
    assert!(store.list(Some(ConfigLevel::Default)).unwrap().is_empty());
}

#[test]
fn non_mapping_layer_is_an_error() {
    let sandbox = ConfigSandbox::new();
    sandbox.write(&sandbox.paths().user, "- just\n- a list\n");
    let err = gggit::ConfigStore::load(sandbox.paths()).unwrap_err();
    assert!(matches!(err, Error::Config(_)), "got {err:?}");
}

#[test]
fn schema_violation_on_disk_still_loads() {
    let sandbox = ConfigSandbox::new();
    sandbox.write(&sandbox.paths().user, "ai:\n  provider: openai\n");

    let store = sandbox.store();
    assert!(store.validate().is_err());
    assert!(store.settings().is_err());
}

// ─── Unparsable layers ───────────────────────────────────────────────────────

const BROKEN_YAML: &str = "ai:\n  enabled: [true\n";

#[test]
fn unparsable_layer_names_the_file() {
    let sandbox = ConfigSandbox::new();
    sandbox.write(&sandbox.paths().user, BROKEN_YAML);

    let err = ConfigStore::load(sandbox.paths()).unwrap_err();
    match err {
        Error::Config(message) => assert!(message.contains("user-config.yaml"), "{message}"),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn lenient_load_reads_broken_layer_as_empty() {
    let sandbox = ConfigSandbox::new();
    sandbox.write(&sandbox.paths().user, BROKEN_YAML);
    sandbox.write(&sandbox.paths().repo, "git:\n  main_branch: trunk\n");

    let store = ConfigStore::load_lenient(sandbox.paths()).unwrap();
    assert_eq!(store.unreadable_files(), [sandbox.paths().user]);
    assert_eq!(store.get("ai.enabled"), Some(json!(false)));
    assert_eq!(store.get("git.main_branch"), Some(json!("trunk")));
}

#[test]
fn broken_layer_refuses_key_edits_until_reset() {
    let sandbox = ConfigSandbox::new();
    sandbox.write(&sandbox.paths().user, BROKEN_YAML);
    let mut store = ConfigStore::load_lenient(sandbox.paths()).unwrap();

    let err = store
        .set("ui.verbose", parse_value("true"), ConfigLevel::User)
        .unwrap_err();
    assert!(matches!(&err, Error::Config(m) if m.contains("ggconfig reset")), "got {err:?}");
    // other levels stay editable
    store
        .set("ui.verbose", parse_value("true"), ConfigLevel::Repo)
        .unwrap();

    assert!(store.reset(ConfigLevel::User, None).unwrap());
    assert!(store.unreadable_files().is_empty());
    store
        .set("git.main_branch", parse_value("trunk"), ConfigLevel::User)
        .unwrap();

    let reloaded = sandbox.store();
    assert_eq!(reloaded.get_at("git.main_branch", ConfigLevel::User), Some(json!("trunk")));
}

// ─── Writes ──────────────────────────────────────────────────────────────────

#[test]
fn set_persists_and_survives_reload() {
    let sandbox = ConfigSandbox::new();
    let mut store = sandbox.store();

    store
        .set("ai.enabled", parse_value("true"), ConfigLevel::User)
        .unwrap();
    assert_eq!(store.get("ai.enabled"), Some(json!(true)));

    let raw = std::fs::read_to_string(&sandbox.paths().user).unwrap();
    assert!(raw.contains("enabled: true"), "user layer was:\n{raw}");

    let reloaded = sandbox.store();
    assert_eq!(reloaded.get_at("ai.enabled", ConfigLevel::User), Some(json!(true)));
    assert!(reloaded.settings().unwrap().ai.enabled);
}

#[test]
fn set_at_repo_level_writes_repo_file() {
    let sandbox = ConfigSandbox::new();
    let mut store = sandbox.store();

    store
        .set("git.main_branch", parse_value("trunk"), ConfigLevel::Repo)
        .unwrap();

    let repo_file = sandbox.repo.path().join(".gggit").join("repo-config.yaml");
    assert!(repo_file.exists());
    assert!(!sandbox.paths().user.exists());
    assert_eq!(store.level_of("git.main_branch"), Some(ConfigLevel::Repo));
}

#[test]
fn module_level_writes_go_to_default_module_file() {
    let sandbox = ConfigSandbox::new();
    let mut store = sandbox.store();

    store
        .set("commit.format", parse_value("simple"), ConfigLevel::Module)
        .unwrap();

    let file = sandbox.paths().module_file();
    assert_eq!(file.file_name().unwrap(), "default.yaml");
    assert!(file.exists());
    assert_eq!(store.settings().unwrap().commit.format, CommitFormat::Simple);
}

#[test]
fn invalid_value_is_rejected_and_nothing_is_written() {
    let sandbox = ConfigSandbox::new();
    let mut store = sandbox.store();

    let err = store
        .set("ai.provider", parse_value("openai"), ConfigLevel::User)
        .unwrap_err();
    match err {
        Error::Schema { schema, path, .. } => {
            assert_eq!(schema, "config");
            assert_eq!(path, "/ai/provider");
        }
        other => panic!("expected schema error, got {other:?}"),
    }

    assert!(!sandbox.paths().user.exists());
    assert_eq!(store.get("ai.provider"), Some(json!("ollama")));
}

#[test]
fn malformed_version_is_rejected() {
    let sandbox = ConfigSandbox::new();
    let mut store = sandbox.store();

    let err = store
        .set("version", parse_value("latest"), ConfigLevel::User)
        .unwrap_err();
    assert!(
        matches!(&err, Error::Schema { path, .. } if path == "/version"),
        "got {err:?}"
    );
}

#[test]
fn string_keys_keep_numeric_looking_text() {
    assert_eq!(parse_value_for("version", "2.0"), YamlValue::from("2.0"));
    assert_eq!(parse_value_for("git.main_branch", "2024"), YamlValue::from("2024"));
    assert_eq!(parse_value_for("ai.enabled", "true"), YamlValue::Bool(true));
    assert_eq!(parse_value_for("ai.max_tokens", "512"), YamlValue::from(512));

    let sandbox = ConfigSandbox::new();
    let mut store = sandbox.store();
    store
        .set("version", parse_value_for("version", "2.0"), ConfigLevel::User)
        .unwrap();
    store
        .set("git.main_branch", parse_value_for("git.main_branch", "2024"), ConfigLevel::User)
        .unwrap();
    assert_eq!(store.get("version"), Some(json!("2.0")));
    assert_eq!(store.settings().unwrap().git.main_branch, "2024");
}

#[test]
fn invalid_key_syntax_is_rejected() {
    let sandbox = ConfigSandbox::new();
    let mut store = sandbox.store();
    let err = store
        .set("ai..enabled", YamlValue::Bool(true), ConfigLevel::User)
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn unset_removes_key_and_reports_absence() {
    let sandbox = ConfigSandbox::new();
    let mut store = sandbox.store();

    store
        .set("git.develop_branch", parse_value("dev"), ConfigLevel::User)
        .unwrap();
    assert!(store.unset("git.develop_branch", ConfigLevel::User).unwrap());
    assert!(!store.unset("git.develop_branch", ConfigLevel::User).unwrap());
    assert_eq!(store.get("git.develop_branch"), Some(json!("develop")));
}

#[test]
fn reset_clears_whole_level() {
    let sandbox = ConfigSandbox::new();
    let mut store = sandbox.store();

    store.set("ui.verbose", parse_value("true"), ConfigLevel::User).unwrap();
    store
        .set("git.main_branch", parse_value("trunk"), ConfigLevel::User)
        .unwrap();
    store
        .set("git.main_branch", parse_value("master"), ConfigLevel::Repo)
        .unwrap();

    store.reset(ConfigLevel::User, None).unwrap();

    assert!(store.list(Some(ConfigLevel::User)).unwrap().is_empty());
    assert_eq!(store.get("ui.verbose"), Some(json!(false)));
    // other levels untouched
    assert_eq!(store.get("git.main_branch"), Some(json!("master")));
}

#[test]
fn reset_single_key() {
    let sandbox = ConfigSandbox::new();
    let mut store = sandbox.store();

    store.set("ui.verbose", parse_value("true"), ConfigLevel::User).unwrap();
    store
        .set("git.main_branch", parse_value("trunk"), ConfigLevel::User)
        .unwrap();
    assert!(store.reset(ConfigLevel::User, Some("ui.verbose")).unwrap());
    assert!(!store.reset(ConfigLevel::User, Some("ai.nonexistent")).unwrap());

    let keys: Vec<String> = store
        .list(Some(ConfigLevel::User))
        .unwrap()
        .into_iter()
        .map(|e| e.key)
        .collect();
    assert_eq!(keys, ["git.main_branch"]);
}

#[test]
fn list_is_flattened_and_sorted() {
    let sandbox = ConfigSandbox::new();
    sandbox.write(
        &sandbox.paths().user,
        "git:\n  main_branch: trunk\nai:\n  model: llama3\n  enabled: true\n",
    );
    let store = sandbox.store();

    let entries = store.list(Some(ConfigLevel::User)).unwrap();
    let rendered: Vec<String> = entries
        .iter()
        .map(|e| format!("{}={}", e.key, e.value))
        .collect();
    assert_eq!(
        rendered,
        ["ai.enabled=true", "ai.model=\"llama3\"", "git.main_branch=\"trunk\""]
    );

    let merged = store.list(None).unwrap();
    assert!(merged.iter().any(|e| e.key == "ai.analysis.max_files"));
    assert!(merged.windows(2).all(|w| w[0].key <= w[1].key));
}

// ─── Levels ──────────────────────────────────────────────────────────────────

#[test]
fn level_names_round_trip() {
    for level in ConfigLevel::PRIORITY {
        assert_eq!(level.as_str().parse::<ConfigLevel>().unwrap(), level);
    }
    assert_eq!(" USER ".parse::<ConfigLevel>().unwrap(), ConfigLevel::User);
    assert!(matches!(
        "global".parse::<ConfigLevel>(),
        Err(Error::InvalidLevel(_))
    ));
}

// ─── Schemas ─────────────────────────────────────────────────────────────────

#[test]
fn unknown_schema_name() {
    let err = schema::validate(&json!({}), "nope").unwrap_err();
    assert!(matches!(err, Error::UnknownSchema(name) if name == "nope"));
}

#[test]
fn commit_schema_accepts_well_formed_draft() {
    let draft = json!({ "type": "feat", "scope": "auth", "description": "add login" });
    assert!(schema::validate(&draft, "commit").is_ok());
}

#[test]
fn commit_schema_rejects_long_description() {
    let draft = json!({ "type": "fix", "description": "x".repeat(73) });
    let err = schema::validate(&draft, "commit").unwrap_err();
    assert!(matches!(&err, Error::Schema { path, .. } if path == "/description"));
}

#[test]
fn commit_schema_rejects_bad_scope_and_type() {
    let draft = json!({ "type": "feat", "scope": "Bad Scope", "description": "x" });
    assert!(matches!(
        schema::validate(&draft, "commit"),
        Err(Error::Schema { path, .. }) if path == "/scope"
    ));

    let draft = json!({ "type": "feature", "description": "x" });
    assert!(matches!(
        schema::validate(&draft, "commit"),
        Err(Error::Schema { path, .. }) if path == "/type"
    ));
}

#[test]
fn module_schema_rejects_non_object_section() {
    let module = json!({ "module": { "name": "team" }, "ai": "on" });
    assert!(matches!(
        schema::validate(&module, "module"),
        Err(Error::Schema { path, .. }) if path == "/ai"
    ));
}
