// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! Provider and generator tests against a mocked Ollama server.

use gggit::Error;
use gggit::config::{AiSettings, Provider};
use gggit::domain::CommitType;
use gggit::services::generator::{AiMessageGenerator, infer_commit_type, is_configured};
use gggit::services::llm::ollama::OllamaProvider;
use gggit::services::llm::{LlmProvider, create_provider};
use gggit::services::usage::AiUsageTracker;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ─── Test helpers ────────────────────────────────────────────────────────────

fn settings_for(server: &MockServer) -> AiSettings {
    AiSettings {
        enabled: true,
        base_url: server.uri(),
        timeout_secs: 5,
        ..AiSettings::default()
    }
}

fn generate_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "model": "qwen3:4b",
        "response": text,
        "done": true,
        "prompt_eval_count": 120,
        "eval_count": 8
    }))
}

fn generator_with(settings: &AiSettings, dir: &TempDir, limit: f64) -> AiMessageGenerator {
    let provider = OllamaProvider::new(settings).unwrap();
    let tracker = AiUsageTracker::new(dir.path().join("ai-usage.yaml"), limit, true);
    AiMessageGenerator::new(Box::new(provider), tracker, settings)
}

fn files(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ─── Generate ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn generate_returns_text_and_token_counts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "qwen3:4b",
            "stream": false,
            "options": { "max_tokens": 256 }
        })))
        .respond_with(generate_reply("  add login endpoint \n"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(&settings_for(&server)).unwrap();
    let generation = provider.generate("prompt").await.unwrap();

    assert_eq!(generation.text, "add login endpoint");
    assert_eq!(generation.prompt_tokens, Some(120));
    assert_eq!(generation.completion_tokens, Some(8));
    assert_eq!(provider.name(), "ollama");
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(generate_reply("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let settings = AiSettings {
        base_url: format!("{}/", server.uri()),
        ..settings_for(&server)
    };
    assert_eq!(settings.endpoint("api/tags"), format!("{}/api/tags", server.uri()));
    let provider = OllamaProvider::new(&settings).unwrap();
    assert_eq!(provider.generate("p").await.unwrap().text, "ok");
}

#[tokio::test]
async fn api_key_is_sent_as_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(header("authorization", "Bearer s3cret-token"))
        .respond_with(generate_reply("ok"))
        .expect(1)
        .mount(&server)
        .await;

    // SAFETY: the variable name is unique to this test
    unsafe { std::env::set_var("GGGIT_INTEGRATION_BEARER_KEY", "s3cret-token") };
    let settings = AiSettings {
        api_key_env: Some("GGGIT_INTEGRATION_BEARER_KEY".into()),
        ..settings_for(&server)
    };
    let provider = OllamaProvider::new(&settings).unwrap();
    unsafe { std::env::remove_var("GGGIT_INTEGRATION_BEARER_KEY") };

    assert!(provider.generate("p").await.is_ok());
}

#[tokio::test]
async fn server_error_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(&settings_for(&server)).unwrap();
    let err = provider.generate("p").await.unwrap_err();
    match err {
        Error::Provider { provider, message } => {
            assert_eq!(provider, "ollama");
            assert!(message.contains("500"), "{message}");
            assert!(message.contains("model crashed"), "{message}");
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(&settings_for(&server)).unwrap();
    let err = provider.generate("p").await.unwrap_err();
    assert!(matches!(err, Error::Provider { .. }), "got {err:?}");
}

#[tokio::test]
async fn unreachable_server_names_the_host() {
    let settings = AiSettings {
        enabled: true,
        base_url: "http://127.0.0.1:1".into(),
        timeout_secs: 5,
        ..AiSettings::default()
    };
    let provider = OllamaProvider::new(&settings).unwrap();
    let err = provider.generate("p").await.unwrap_err();
    assert!(err.to_string().contains("127.0.0.1:1"), "{err}");
}

// ─── Verify ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn verify_finds_configured_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{ "name": "llama3:latest" }, { "name": "qwen3:4b" }]
        })))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(&settings_for(&server)).unwrap();
    assert!(provider.verify().await.is_ok());

    let untagged = AiSettings {
        model: "llama3".into(),
        ..settings_for(&server)
    };
    assert!(OllamaProvider::new(&untagged).unwrap().verify().await.is_ok());
}

#[tokio::test]
async fn verify_reports_missing_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{ "name": "llama3:latest" }]
        })))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new(&settings_for(&server)).unwrap();
    let err = provider.verify().await.unwrap_err();
    assert!(err.to_string().contains("qwen3:4b"), "{err}");
}

// ─── Provider factory ────────────────────────────────────────────────────────

#[test]
fn factory_rejects_invalid_settings() {
    let bad_url = AiSettings {
        base_url: "ftp://example.com".into(),
        ..AiSettings::default()
    };
    assert!(create_provider(&bad_url).is_err());

    let bad_temp = AiSettings {
        temperature: 3.5,
        ..AiSettings::default()
    };
    assert!(create_provider(&bad_temp).is_err());

    let bad_timeout = AiSettings {
        timeout_secs: 0,
        ..AiSettings::default()
    };
    assert!(create_provider(&bad_timeout).is_err());
}

#[test]
fn factory_labels_local_provider() {
    let local = AiSettings {
        provider: Provider::Local,
        ..AiSettings::default()
    };
    let provider = create_provider(&local).unwrap();
    assert_eq!(provider.name(), "local");
}

// ─── Generator pipeline ──────────────────────────────────────────────────────

#[tokio::test]
async fn generator_cleans_reply_and_records_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(generate_reply("```\nfeat(api): add login endpoint.\n```"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = settings_for(&server);
    let generator = generator_with(&settings, &dir, 5.0);

    let description = generator
        .generate_message(
            CommitType::Feat,
            &files(&["src/api.rs"]),
            "+fn login() {}\n",
            "ggfeat",
        )
        .await
        .unwrap();
    assert_eq!(description, "add login endpoint");

    let stats = generator.tracker().usage_stats();
    assert_eq!(stats.totals.requests, 1);
    assert_eq!(stats.totals.tokens, 128);
    assert!((stats.totals.cost - 0.0128).abs() < 1e-9);
    let today = stats.daily_usage.values().next().unwrap();
    assert_eq!(today.commands.get("ggfeat"), Some(&1));
}

#[tokio::test]
async fn generator_estimates_tokens_when_server_does_not_count() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "tidy imports",
            "done": true
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = settings_for(&server);
    let generator = generator_with(&settings, &dir, 5.0);

    generator
        .generate_message(CommitType::Chore, &files(&["a.rs"]), "-use x;\n", "ggai")
        .await
        .unwrap();

    let tokens = generator.tracker().usage_stats().totals.tokens;
    let prompt = generator.build_prompt(CommitType::Chore, &files(&["a.rs"]), "-use x;\n");
    let expected = (prompt.chars().count() as u64).div_ceil(4) + "tidy imports".len().div_ceil(4) as u64;
    assert_eq!(tokens, expected);
}

#[tokio::test]
async fn generator_refuses_once_limit_is_reached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(generate_reply("never asked"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = settings_for(&server);
    let generator = generator_with(&settings, &dir, 0.01);
    generator
        .tracker()
        .increment_usage("ggfeat", 1000, 0.02)
        .unwrap();

    let err = generator
        .generate_message(CommitType::Feat, &files(&["a.rs"]), "+x\n", "ggfeat")
        .await
        .unwrap_err();
    match err {
        Error::CostLimitExceeded { spent, limit } => {
            assert!((spent - 0.02).abs() < 1e-9);
            assert!((limit - 0.01).abs() < 1e-9);
        }
        other => panic!("expected cost limit error, got {other:?}"),
    }
}

#[tokio::test]
async fn provider_failure_records_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = settings_for(&server);
    let generator = generator_with(&settings, &dir, 5.0);

    assert!(
        generator
            .generate_message(CommitType::Fix, &files(&["a.rs"]), "+x\n", "ggfix")
            .await
            .is_err()
    );
    assert_eq!(generator.tracker().usage_stats().totals.requests, 0);
}

// ─── Prompt ──────────────────────────────────────────────────────────────────

#[test]
fn prompt_names_type_files_and_diff() {
    let dir = tempfile::tempdir().unwrap();
    let settings = AiSettings::default();
    let generator = AiMessageGenerator::new(
        create_provider(&settings).unwrap(),
        AiUsageTracker::new(dir.path().join("u.yaml"), 5.0, true),
        &settings,
    );

    let prompt = generator.build_prompt(
        CommitType::Fix,
        &files(&["src/git.rs", "src/cli.rs"]),
        "-old\n+new\n",
    );
    assert!(prompt.contains("a bug fix (fix)"));
    assert!(prompt.contains("- src/git.rs\n- src/cli.rs\n"));
    assert!(prompt.contains("-old\n+new\n"));
    assert!(!prompt.contains("(diff truncated)"));
}

#[test]
fn prompt_truncates_large_diffs() {
    let dir = tempfile::tempdir().unwrap();
    let settings = AiSettings {
        max_prompt_chars: 1000,
        ..AiSettings::default()
    };
    let generator = AiMessageGenerator::new(
        create_provider(&settings).unwrap(),
        AiUsageTracker::new(dir.path().join("u.yaml"), 5.0, true),
        &settings,
    );

    let diff = "+é line of added text\n".repeat(500);
    let prompt = generator.build_prompt(CommitType::Feat, &files(&["big.rs"]), &diff);
    assert!(prompt.ends_with("... (diff truncated)"));
    assert!(prompt.len() < 2000);
}

// ─── Configuration checks ────────────────────────────────────────────────────

#[test]
fn configured_requires_enabled_and_key_variable() {
    assert!(!is_configured(&AiSettings::default()));

    let enabled = AiSettings {
        enabled: true,
        ..AiSettings::default()
    };
    assert!(is_configured(&enabled));

    let missing_key = AiSettings {
        api_key_env: Some("GGGIT_TEST_VARIABLE_THAT_IS_NEVER_SET".into()),
        ..enabled.clone()
    };
    assert!(!is_configured(&missing_key));

    let path_key = AiSettings {
        api_key_env: Some("PATH".into()),
        ..enabled
    };
    assert!(is_configured(&path_key));
}

#[test]
fn generator_needs_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let result = AiMessageGenerator::from_settings(&AiSettings::default(), dir.path());
    assert!(matches!(result, Err(Error::AiNotConfigured)));
}

#[test]
fn commit_type_inference() {
    assert_eq!(infer_commit_type(&[], false), CommitType::Chore);
    assert_eq!(
        infer_commit_type(&files(&["README.md", "docs/guide.md"]), true),
        CommitType::Docs
    );
    assert_eq!(
        infer_commit_type(&files(&["tests/cli.rs"]), false),
        CommitType::Test
    );
    assert_eq!(
        infer_commit_type(&files(&[".github/workflows/ci.yml"]), false),
        CommitType::Ci
    );
    assert_eq!(
        infer_commit_type(&files(&["Cargo.toml", ".github/workflows/ci.yml"]), false),
        CommitType::Build
    );
    assert_eq!(
        infer_commit_type(&files(&["src/new_module.rs"]), true),
        CommitType::Feat
    );
    assert_eq!(
        infer_commit_type(&files(&["src/lib.rs"]), false),
        CommitType::Chore
    );
}
