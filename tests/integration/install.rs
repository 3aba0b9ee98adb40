//! Installing, caching and downloading through the real HTTP stack

use super::common::{artifact_path, mount_index, mount_jar, read, TestEnv};
use jarvault::cancel::Cancellation;
use jarvault::core::JarvaultError;
use jarvault::package::Warning;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_add_dependency_with_full_coordinate() {
    let server = MockServer::start().await;
    mount_index(&server, "com.google.code.gson", "gson", "2.10.1").await;
    mount_jar(&server, "com.google.code.gson", "gson", "2.8.9", b"gson 2.8.9").await;

    let env = TestEnv::new();
    let installer = env.installer(env.config_for(&server));

    let outcome = installer
        .add_dependency("com.google.code.gson:gson:2.8.9", &Cancellation::none())
        .await
        .unwrap();
    assert!(outcome.warnings.is_empty());

    let entries = installer.manifest().list().value;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].group_id, "com.google.code.gson");
    assert_eq!(entries[0].artifact_id, "gson");
    assert_eq!(entries[0].version, "2.8.9");
    assert_eq!(read(&env.lib().join("gson-2.8.9.jar")), "gson 2.8.9");

    let manifest: serde_json::Value =
        serde_json::from_str(&read(&env.project.join("jarvault.json"))).unwrap();
    assert_eq!(manifest["dependencies"][0]["path"], "lib/gson-2.8.9.jar");
}

#[tokio::test]
async fn test_bare_artifact_resolves_to_latest() {
    let server = MockServer::start().await;
    mount_index(&server, "com.google.code.gson", "gson", "2.10.1").await;
    mount_jar(&server, "com.google.code.gson", "gson", "2.10.1", b"gson latest").await;

    let env = TestEnv::new();
    let installer = env.installer(env.config_for(&server));

    let entry = installer
        .add_dependency("gson", &Cancellation::none())
        .await
        .unwrap()
        .value;
    assert_eq!(entry.version, "2.10.1");
    assert_eq!(entry.group_id, "com.google.code.gson");
}

#[tokio::test]
async fn test_second_project_is_served_from_cache() {
    let server = MockServer::start().await;
    mount_index(&server, "org.slf4j", "slf4j-api", "2.0.9").await;
    Mock::given(method("GET"))
        .and(path(artifact_path("org.slf4j", "slf4j-api", "2.0.9", "jar")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"slf4j".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let first = TestEnv::new();
    let config = first.config_for(&server);
    first
        .installer(config.clone())
        .add_dependency("org.slf4j:slf4j-api:2.0.9", &Cancellation::none())
        .await
        .unwrap();

    // Same cache directory, different project.
    let second = TestEnv::new();
    second
        .installer(config)
        .add_dependency("org.slf4j:slf4j-api:2.0.9", &Cancellation::none())
        .await
        .unwrap();

    assert_eq!(read(&second.lib().join("slf4j-api-2.0.9.jar")), "slf4j");
}

#[tokio::test]
async fn test_unreachable_repository_exhausts_retries() {
    let server = MockServer::start().await;
    mount_index(&server, "g", "a", "1.0").await;

    let env = TestEnv::new();
    let mut config = env.config_for(&server);
    // Nothing listens on port 1.
    config.repository_url = "http://127.0.0.1:1/maven2".to_string();

    let err = env
        .installer(config)
        .add_dependency("g:a:1.0", &Cancellation::none())
        .await
        .unwrap_err();

    match err {
        JarvaultError::Download {
            ref url,
            attempts,
            ref cause,
        } => {
            assert_eq!(attempts, 3);
            assert!(url.ends_with("/g/a/1.0/a-1.0.jar"));
            assert!(err.to_string().contains(cause.as_str()));
        }
        other => panic!("expected a download error, got {}", other),
    }
    assert!(!env.lib().join("a-1.0.jar").exists());
    assert!(!env.project.join("jarvault.json").exists());
}

#[tokio::test]
async fn test_checksum_mismatch_is_reported_not_fatal() {
    let server = MockServer::start().await;
    mount_index(&server, "g", "a", "1.0").await;
    mount_jar(&server, "g", "a", "1.0", b"bytes").await;
    Mock::given(method("GET"))
        .and(path(format!("{}.sha1", artifact_path("g", "a", "1.0", "jar"))))
        .respond_with(ResponseTemplate::new(200).set_body_string("da39a3ee5e6b4b0d3255bfef95601890afd80709"))
        .mount(&server)
        .await;

    let env = TestEnv::new();
    let outcome = env
        .installer(env.config_for(&server))
        .add_dependency("g:a:1.0", &Cancellation::none())
        .await
        .unwrap();

    assert_eq!(outcome.warnings.len(), 1);
    assert!(matches!(outcome.warnings[0], Warning::ChecksumMismatch { .. }));
    assert!(env.lib().join("a-1.0.jar").exists());
}

#[tokio::test]
async fn test_transitive_install_records_successes() {
    let server = MockServer::start().await;
    mount_index(&server, "org.main", "app", "2.0").await;
    mount_index(&server, "org.dep", "helper", "1.5").await;
    mount_jar(&server, "org.main", "app", "2.0", b"app").await;
    mount_jar(&server, "org.dep", "helper", "1.5", b"helper").await;
    Mock::given(method("GET"))
        .and(path(artifact_path("org.main", "app", "2.0", "pom")))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<project><dependencies>
                <dependency><groupId>org.dep</groupId><artifactId>helper</artifactId><version>1.5</version></dependency>
                <dependency><groupId>org.dep</groupId><artifactId>missing</artifactId><version>1.0</version></dependency>
            </dependencies></project>"#,
        ))
        .mount(&server)
        .await;

    let env = TestEnv::new();
    let mut config = env.config_for(&server);
    config.max_retries = 1;
    let report = env
        .installer(config)
        .add_with_transitives("org.main:app:2.0", &Cancellation::none())
        .await
        .unwrap();

    assert_eq!(report.installed.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].0.contains("missing"));
    assert!(env.lib().join("app-2.0.jar").exists());
    assert!(env.lib().join("helper-1.5.jar").exists());
}

#[tokio::test]
async fn test_deadline_stops_install() {
    let server = MockServer::start().await;
    mount_index(&server, "g", "slow", "1.0").await;
    Mock::given(method("GET"))
        .and(path(artifact_path("g", "slow", "1.0", "jar")))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(10)))
        .mount(&server)
        .await;

    let env = TestEnv::new();
    let cancel = Cancellation::none().with_timeout(std::time::Duration::from_millis(300));
    let err = env
        .installer(env.config_for(&server))
        .add_dependency("g:slow:1.0", &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, JarvaultError::DeadlineExceeded));
    assert!(!env.lib().join("slow-1.0.jar").exists());
}
