//! Tests for the `jarvault` binary

use super::common::{mount_index, mount_jar, read, TestEnv};
use assert_fs::prelude::*;
use jarvault::config::Config;
use predicates::prelude::*;
use std::fs;
use wiremock::MockServer;

#[test]
fn test_help_lists_commands() {
    let env = TestEnv::new();
    env.jarvault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("outdated"))
        .stdout(predicate::str::contains("conflicts"));
}

#[test]
fn test_invalid_spec_fails_with_help() {
    let env = TestEnv::new();
    env.jarvault()
        .args(["add", ":gson"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid dependency spec"))
        .stderr(predicate::str::contains("help:"));
}

#[test]
fn test_list_empty_project() {
    let env = TestEnv::new();
    env.jarvault()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No dependencies installed"));
}

#[test]
fn test_list_infers_from_lib_dir() {
    let env = TestEnv::new();
    fs::create_dir_all(env.lib()).unwrap();
    fs::write(env.lib().join("commons-lang3-3.14.0.jar"), b"").unwrap();

    env.jarvault()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("commons-lang3 3.14.0"));
}

#[test]
fn test_conflicts_command() {
    let env = TestEnv::new();
    fs::create_dir_all(env.lib()).unwrap();
    fs::write(env.lib().join("foo-1.0.0.jar"), b"").unwrap();
    fs::write(env.lib().join("foo-2.0.0.jar"), b"").unwrap();

    env.jarvault()
        .arg("conflicts")
        .assert()
        .success()
        .stdout(predicate::str::contains("foo: 1.0.0, 2.0.0"));
}

#[test]
fn test_cache_info_and_clean() {
    let env = TestEnv::new();
    env.write_config(&Config {
        cache_dir: Some(env.cache_dir().to_string_lossy().to_string()),
        ..Default::default()
    });

    env.jarvault()
        .args(["cache", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Artifacts: 0"));

    env.jarvault()
        .args(["cache", "clean"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 0 cached artifacts"));
}

#[test]
fn test_lock_reports_changed_files() {
    let env = TestEnv::new();
    fs::create_dir_all(env.lib()).unwrap();
    fs::write(env.lib().join("foo-1.0.0.jar"), b"first build").unwrap();

    env.jarvault()
        .arg("lock")
        .assert()
        .success()
        .stdout(predicate::str::contains("Locked 1 dependencies"))
        .stdout(predicate::str::contains("changed since the last lock").not());

    fs::write(env.lib().join("foo-1.0.0.jar"), b"second build").unwrap();
    env.jarvault()
        .arg("lock")
        .assert()
        .success()
        .stdout(predicate::str::contains("foo 1.0.0 changed since the last lock"));
}

#[test]
fn test_import_missing_file_fails() {
    let env = TestEnv::new();
    env.jarvault()
        .args(["import", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Manifest error"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_add_list_lock_export_remove() {
    let server = MockServer::start().await;
    mount_index(&server, "com.google.code.gson", "gson", "2.10.1").await;
    mount_jar(&server, "com.google.code.gson", "gson", "2.10.1", b"gson").await;

    let env = TestEnv::new();
    let mut config = env.config_for(&server);
    config.verify_checksums = false;
    env.write_config(&config);

    env.jarvault()
        .args(["add", "gson"])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.google.code.gson:gson:2.10.1"));
    assert!(env.lib().join("gson-2.10.1.jar").exists());

    env.jarvault()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("com.google.code.gson:gson 2.10.1"));

    env.jarvault().arg("lock").assert().success();
    let lock: serde_json::Value =
        serde_json::from_str(&read(&env.project.join("jarvault.lock.json"))).unwrap();
    assert_eq!(lock["dependencies"][0]["artifactId"], "gson");
    assert!(lock["dependencies"][0]["checksum"]
        .as_str()
        .unwrap()
        .starts_with("blake3:"));

    env.jarvault()
        .args(["export", "deps.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 dependencies"));
    assert!(env.project.join("deps.json").exists());

    env.jarvault()
        .args(["remove", "gson"])
        .assert()
        .success();
    assert!(!env.lib().join("gson-2.10.1.jar").exists());

    env.jarvault()
        .args(["import", "deps.json", "--no-overwrite"])
        .assert()
        .success();
    assert!(env.lib().join("gson-2.10.1.jar").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_resolve_and_outdated() {
    let server = MockServer::start().await;
    mount_index(&server, "com.google.code.gson", "gson", "2.10.1").await;
    mount_jar(&server, "com.google.code.gson", "gson", "2.8.9", b"gson").await;

    let env = TestEnv::new();
    let mut config = env.config_for(&server);
    config.verify_checksums = false;
    env.write_config(&config);

    env.jarvault()
        .args(["resolve", "gson"])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.google.code.gson:gson:2.10.1"))
        .stdout(predicate::str::contains("/maven2/com/google/code/gson/gson/2.10.1/gson-2.10.1.jar"));

    env.jarvault()
        .args(["add", "com.google.code.gson:gson:2.8.9"])
        .assert()
        .success();

    env.jarvault()
        .arg("outdated")
        .assert()
        .success()
        .stdout(predicate::str::contains("gson: 2.8.9 → 2.10.1"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_fetch_to_destination() {
    let server = MockServer::start().await;
    mount_index(&server, "org.slf4j", "slf4j-api", "2.0.9").await;
    mount_jar(&server, "org.slf4j", "slf4j-api", "2.0.9", b"slf4j").await;

    let env = TestEnv::new();
    let mut config = env.config_for(&server);
    config.verify_checksums = false;
    env.write_config(&config);

    env.jarvault()
        .args(["fetch", "org.slf4j:slf4j-api:2.0.9", "--dest", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("downloaded"));

    assert_eq!(read(&env.project.join("out").join("slf4j-api-2.0.9.jar")), "slf4j");
    assert!(!env.project.join("jarvault.json").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_import_from_another_project() {
    let server = MockServer::start().await;
    mount_index(&server, "org.slf4j", "slf4j-api", "2.0.9").await;
    mount_jar(&server, "org.slf4j", "slf4j-api", "2.0.9", b"slf4j").await;

    let shared = assert_fs::TempDir::new().unwrap();
    let export = shared.child("deps.json");
    export
        .write_str(
            r#"{
              "project": "upstream",
              "exported": "2024-01-01T00:00:00Z",
              "dependencies": [
                {"groupId": "org.slf4j", "artifactId": "slf4j-api", "version": "2.0.9", "name": "slf4j-api"}
              ]
            }"#,
        )
        .unwrap();

    let env = TestEnv::new();
    let mut config = env.config_for(&server);
    config.verify_checksums = false;
    env.write_config(&config);

    env.jarvault()
        .arg("import")
        .arg(export.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("org.slf4j:slf4j-api:2.0.9"));

    assert!(predicate::path::is_file().eval(&env.lib().join("slf4j-api-2.0.9.jar")));
    export.assert(predicate::path::exists());
    shared.close().unwrap();
}
