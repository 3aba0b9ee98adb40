//! Update checks and bulk updates against the mock index

use super::common::{mount_index, mount_jar, TestEnv};
use jarvault::cancel::Cancellation;
use jarvault::core::Coordinate;
use jarvault::package::{ManifestEntry, UpdateChecker};
use jarvault::resolver::Resolver;
use jarvault::index::{Repository, SearchAPI};
use std::sync::Arc;
use wiremock::MockServer;

fn checker(env: &TestEnv, server: &MockServer) -> UpdateChecker {
    let config = env.config_for(server);
    UpdateChecker::new(Resolver::new(
        Arc::new(SearchAPI::new(&config).unwrap()),
        Repository::new(&config.repository_url),
    ))
}

fn installed(group: &str, artifact: &str, version: &str) -> ManifestEntry {
    let coordinate = Coordinate::new(Some(group), artifact, version);
    ManifestEntry::new(&coordinate, &format!("lib/{}", coordinate.file_name("jar")))
}

#[tokio::test]
async fn test_up_to_date_and_outdated() {
    let server = MockServer::start().await;
    mount_index(&server, "g", "current", "1.0.0").await;
    mount_index(&server, "g", "stale", "1.2.0").await;
    let env = TestEnv::new();

    let report = checker(&env, &server)
        .check_updates(
            &[installed("g", "current", "1.0.0"), installed("g", "stale", "1.0.0")],
            &Cancellation::none(),
        )
        .await
        .unwrap();

    assert!(report.failures.is_empty());
    assert!(!report.updates[0].update_available);
    assert!(report.updates[1].update_available);
    assert_eq!(report.updates[1].latest, "1.2.0");
}

#[tokio::test]
async fn test_update_all_moves_to_latest() {
    let server = MockServer::start().await;
    mount_index(&server, "g", "a", "1.2.0").await;
    mount_jar(&server, "g", "a", "1.0.0", b"old").await;
    mount_jar(&server, "g", "a", "1.2.0", b"new").await;

    let env = TestEnv::new();
    let installer = env.installer(env.config_for(&server));
    let cancel = Cancellation::none();
    installer.add_dependency("g:a:1.0.0", &cancel).await.unwrap();

    let report = installer.update_all(&cancel).await.unwrap();
    assert!(report.all_succeeded());
    assert_eq!(report.installed[0].version, "1.2.0");
    assert!(!env.lib().join("a-1.0.0.jar").exists());
    assert!(env.lib().join("a-1.2.0.jar").exists());
}
