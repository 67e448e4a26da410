use super::{load_settings_with, Settings};

use std::{collections::HashMap, fs};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn missing_file_and_env_yield_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (settings, file_error) =
        load_settings_with(&dir.path().join("roster.toml"), env_from(&[]));
    assert_eq!(settings, Settings::default());
    assert!(file_error.is_none());
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("roster.toml");
    fs::write(
        &path,
        "api_base_url = \"http://localhost:4000\"\nlog_filter = \"debug\"\n",
    )
    .expect("write config");

    let (settings, file_error) = load_settings_with(&path, env_from(&[]));

    assert!(file_error.is_none());
    assert_eq!(settings.api_base_url, "http://localhost:4000");
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn environment_overrides_file_and_prefixed_key_wins() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("roster.toml");
    fs::write(&path, "api_base_url = \"http://from-file\"\n").expect("write config");

    let (settings, _) = load_settings_with(
        &path,
        env_from(&[
            ("API_BASE_URL", "http://plain-env"),
            ("APP__API_BASE_URL", "http://prefixed-env"),
            ("APP__LOG_FILTER", "client_core=debug"),
        ]),
    );

    assert_eq!(settings.api_base_url, "http://prefixed-env");
    assert_eq!(settings.log_filter, "client_core=debug");
}

#[test]
fn unreadable_file_is_reported_and_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("roster.toml");
    fs::write(&path, "this is = = not toml").expect("write config");

    let (settings, file_error) =
        load_settings_with(&path, env_from(&[("API_BASE_URL", "http://env")]));

    let err = file_error.expect("parse error is returned");
    assert_eq!(err.path, path);
    assert!(
        err.to_string().starts_with("ignoring unreadable config file"),
        "unexpected error: {err}"
    );
    assert_eq!(settings.api_base_url, "http://env");
    assert_eq!(settings.log_filter, "info");
}
