use crate::cancel::Cancellation;
use crate::config::Config;
use crate::core::{Coordinate, JarvaultError, JarvaultResult};
use crate::di::PackageIndex;
use crate::index::IndexRecord;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::debug;

/// A query for the package index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexQuery {
    /// Field query on artifact id, narrowed by group id when known
    Fields {
        group_id: Option<String>,
        artifact_id: String,
    },
    /// Free text, passed through untouched
    Text(String),
}

impl IndexQuery {
    /// Query for the artifact a coordinate names
    pub fn for_coordinate(coordinate: &Coordinate) -> Self {
        IndexQuery::Fields {
            group_id: coordinate.group_id.clone().filter(|g| !g.is_empty()),
            artifact_id: coordinate.artifact_id.clone(),
        }
    }
}

impl fmt::Display for IndexQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexQuery::Fields {
                group_id: Some(group),
                artifact_id,
            } => write!(f, "g:\"{}\" AND a:\"{}\"", group, artifact_id),
            IndexQuery::Fields {
                group_id: None,
                artifact_id,
            } => write!(f, "a:\"{}\"", artifact_id),
            IndexQuery::Text(text) => write!(f, "{}", text),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchDocs,
}

#[derive(Debug, Deserialize)]
struct SearchDocs {
    #[serde(default)]
    docs: Vec<IndexRecord>,
}

/// Client for the Solr-style package index search endpoint
pub struct SearchAPI {
    client: Client,
    search_url: String,
    rows: u32,
}

impl SearchAPI {
    /// Create a client from the configured endpoint, row count and timeout
    pub fn new(config: &Config) -> JarvaultResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("jarvault/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            search_url: config.search_url.clone(),
            rows: config.search_rows,
        })
    }

    /// Run a query and return candidates in index order
    pub async fn search(
        &self,
        query: &IndexQuery,
        cancel: &Cancellation,
    ) -> JarvaultResult<Vec<IndexRecord>> {
        let q = query.to_string();
        debug!(query = %q, url = %self.search_url, "querying package index");

        cancel
            .run(async {
                let rows = self.rows.to_string();
                let response = self
                    .client
                    .get(&self.search_url)
                    .query(&[("q", q.as_str()), ("rows", rows.as_str()), ("wt", "json")])
                    .send()
                    .await?;

                if !response.status().is_success() {
                    return Err(JarvaultError::Package(format!(
                        "Package index returned HTTP {} for query {}",
                        response.status(),
                        q
                    )));
                }

                let body: SearchResponse = response.json().await?;
                Ok(body.response.docs)
            })
            .await
    }
}

// Implement PackageIndex trait
#[async_trait]
impl PackageIndex for SearchAPI {
    async fn search(
        &self,
        query: &IndexQuery,
        cancel: &Cancellation,
    ) -> JarvaultResult<Vec<IndexRecord>> {
        SearchAPI::search(self, query, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(server: &MockServer) -> SearchAPI {
        let config = Config {
            search_url: format!("{}/solrsearch/select", server.uri()),
            search_rows: 5,
            ..Default::default()
        };
        SearchAPI::new(&config).unwrap()
    }

    #[test]
    fn test_query_strings() {
        let full = IndexQuery::for_coordinate(&Coordinate::new(
            Some("com.google.code.gson"),
            "gson",
            "latest",
        ));
        assert_eq!(full.to_string(), r#"g:"com.google.code.gson" AND a:"gson""#);

        let bare = IndexQuery::for_coordinate(&Coordinate::latest(None, "gson"));
        assert_eq!(bare.to_string(), r#"a:"gson""#);

        assert_eq!(IndexQuery::Text("json parser".to_string()).to_string(), "json parser");
    }

    #[tokio::test]
    async fn test_search_parses_docs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/solrsearch/select"))
            .and(query_param("q", r#"a:"gson""#))
            .and(query_param("rows", "5"))
            .and(query_param("wt", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "responseHeader": {"status": 0},
                "response": {
                    "numFound": 2,
                    "docs": [
                        {"id": "com.google.code.gson:gson", "g": "com.google.code.gson", "a": "gson", "latestVersion": "2.10.1", "p": "jar"},
                        {"id": "org.immutables:gson", "g": "org.immutables", "a": "gson", "latestVersion": "2.9.0"}
                    ]
                }
            })))
            .mount(&server)
            .await;

        let api = api_for(&server);
        let docs = api
            .search(&IndexQuery::Text(r#"a:"gson""#.to_string()), &Cancellation::none())
            .await
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].group_id, "com.google.code.gson");
        assert_eq!(docs[0].latest_version, "2.10.1");
        assert_eq!(docs[1].packaging, "jar");
    }

    #[tokio::test]
    async fn test_search_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let api = api_for(&server);
        let result = api
            .search(&IndexQuery::Text("gson".to_string()), &Cancellation::none())
            .await;
        assert!(matches!(result, Err(JarvaultError::Package(_))));
    }
}
