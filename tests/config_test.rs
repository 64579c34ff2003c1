//! File-backed configuration source tests.

use std::fs;

use tempfile::TempDir;

use ai_router::{ConfigSource, FileConfigSource};

fn source_with(contents: &str) -> (TempDir, FileConfigSource) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, contents).expect("write config");
    (dir, FileConfigSource::new(path))
}

#[test]
fn loads_snapshot_from_file() {
    let (_dir, source) = source_with(
        r#"{
            "provider": "mistral",
            "model": "mistral-large",
            "apiKeys": { "mistral": "sk-mistral-test" }
        }"#,
    );

    let snapshot = source.load();
    assert_eq!(snapshot.provider, "mistral");
    assert_eq!(snapshot.model, "mistral-large");
    assert_eq!(snapshot.api_keys.mistral, "sk-mistral-test");
}

#[test]
fn reload_picks_up_file_changes() {
    let (_dir, source) = source_with(r#"{"provider": "ollama", "model": "codellama"}"#);
    assert_eq!(source.load().provider, "ollama");

    fs::write(source.path(), r#"{"provider": "openai", "model": "gpt-4o"}"#).expect("rewrite");
    let snapshot = source.load();
    assert_eq!(snapshot.provider, "openai");
    assert_eq!(snapshot.model, "gpt-4o");
}

#[test]
fn absent_file_falls_back_to_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let source = FileConfigSource::new(dir.path().join("does-not-exist.json"));

    let snapshot = source.load();
    assert!(!snapshot.provider.is_empty());
    assert!(!snapshot.model.is_empty());
}

#[test]
fn unparsable_file_falls_back_to_defaults() {
    let (_dir, source) = source_with("{ this is not json");

    // Never fails the request; degrades to the built-in defaults.
    let snapshot = source.load();
    assert!(!snapshot.provider.is_empty());
    assert!(!snapshot.model.is_empty());
}

#[test]
fn unknown_provider_string_is_preserved_for_downstream_rejection() {
    let (_dir, source) = source_with(r#"{"provider": "skynet", "model": "t-800"}"#);
    // The source does not validate; the registry rejects at dispatch time.
    assert_eq!(source.load().provider, "skynet");
}
