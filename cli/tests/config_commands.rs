#![allow(clippy::unwrap_used)]

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_config_uses_env_and_redacts_token() {
    let env = TestEnv::new("http://localhost:4010/api");

    env.command()
        .env("NOTEHUB_TOKEN", "very-secret")
        .arg("config")
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""api_url": "http://localhost:4010/api""#)
                .and(predicate::str::contains(r#""per_page": 12"#))
                .and(predicate::str::contains("very-secret").not()),
        )
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_profile_values_apply_below_flags() {
    let env = TestEnv::new("http://from-env/api");
    let profile = env.config_home.path().join("custom.toml");
    std::fs::write(
        &profile,
        "api_url = \"http://from-profile/api\"\nper_page = 5\ndebounce_ms = 200\n",
    )
    .unwrap();

    env.command()
        .args(["--profile-path", profile.to_str().unwrap(), "config"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""api_url": "http://from-env/api""#)
                .and(predicate::str::contains(r#""per_page": 5"#))
                .and(predicate::str::contains(r#""debounce_ms": 200"#))
                .and(predicate::str::contains(r#""profile_exists": true"#)),
        );
}

#[test]
fn test_profile_use_creates_and_switches() {
    let env = TestEnv::new("http://localhost:4010/api");

    env.command()
        .args(["profile", "use", "work"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Created new profile: work")
                .and(predicate::str::contains("Switched to profile: work")),
        );

    let config_dir = env.config_home.path().join("notehub");
    assert!(config_dir.join("profiles").join("work.toml").exists());
    assert_eq!(
        std::fs::read_to_string(config_dir.join("current")).unwrap(),
        "work"
    );

    env.command()
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* work").and(predicate::str::contains("  default")));

    env.command()
        .args(["profile", "current"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current profile: work"));
}

#[test]
fn test_completions() {
    let env = TestEnv::new("http://localhost:4010/api");

    env.command()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("notehub"));
}
