//! Common utilities for integration tests

use assert_cmd::Command;
use jarvault::config::Config;
use jarvault::di::ServiceContainer;
use jarvault::index::SearchAPI;
use jarvault::package::{Installer, PomParser};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Isolated project, cache and config directories
pub struct TestEnv {
    pub temp: TempDir,
    pub project: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("project");
        fs::create_dir_all(&project).unwrap();
        Self { temp, project }
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.temp.path().join("cache")
    }

    pub fn config_home(&self) -> PathBuf {
        self.temp.path().join("config")
    }

    /// Config pointing every remote at `server`
    pub fn config_for(&self, server: &MockServer) -> Config {
        Config {
            repository_url: format!("{}/maven2", server.uri()),
            search_url: format!("{}/solrsearch/select", server.uri()),
            cache_dir: Some(self.cache_dir().to_string_lossy().to_string()),
            retry_base_delay_ms: 1,
            request_timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Write `config` where the binary will look for it
    pub fn write_config(&self, config: &Config) {
        config
            .save_to(&self.config_home().join("jarvault").join("config.yaml"))
            .unwrap();
    }

    /// Installer over the real HTTP stack
    pub fn installer(&self, config: Config) -> Installer {
        let index = Arc::new(SearchAPI::new(&config).unwrap());
        let container = ServiceContainer::with_providers(config, index, Arc::new(PomParser)).unwrap();
        Installer::new(container, &self.project).unwrap()
    }

    pub fn lib(&self) -> PathBuf {
        self.project.join("lib")
    }

    /// The binary, isolated from the user's real config and cache
    pub fn jarvault(&self) -> Command {
        let mut cmd = Command::cargo_bin("jarvault").unwrap();
        cmd.current_dir(&self.project)
            .env("HOME", self.temp.path())
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("XDG_CACHE_HOME", self.cache_dir())
            .env_remove("RUST_LOG");
        cmd
    }
}

/// Answer index queries for `group:artifact` with `latest`
pub async fn mount_index(server: &MockServer, group: &str, artifact: &str, latest: &str) {
    let doc = serde_json::json!({
        "g": group, "a": artifact, "latestVersion": latest, "p": "jar"
    });
    for q in [
        format!("g:\"{}\" AND a:\"{}\"", group, artifact),
        format!("a:\"{}\"", artifact),
    ] {
        Mock::given(method("GET"))
            .and(path("/solrsearch/select"))
            .and(query_param("q", q.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": {"numFound": 1, "docs": [doc.clone()]}
            })))
            .mount(server)
            .await;
    }
}

/// Maven2 path of an artifact file under the mock repository
pub fn artifact_path(group: &str, artifact: &str, version: &str, extension: &str) -> String {
    format!(
        "/maven2/{}/{}/{}/{}-{}.{}",
        group.replace('.', "/"),
        artifact,
        version,
        artifact,
        version,
        extension
    )
}

/// Serve a JAR body (and no checksum sidecar)
pub async fn mount_jar(server: &MockServer, group: &str, artifact: &str, version: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(artifact_path(group, artifact, version, "jar")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
