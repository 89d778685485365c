//! StoreClient: loads graph snapshots from a file or an http(s) URL.
//!
//! Transport settings (TLS verification, request timeout) come from the
//! [`StoreConfig`] passed to [`StoreClient::new`] and live only in the client
//! built from it.

use crate::error::{Result, StoreError};
use crate::memory::MemoryGraph;
use crate::snapshot::GraphSnapshot;
use ontofacet_core::config::StoreConfig;
use std::path::PathBuf;

/// Where a snapshot is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotSource {
    File(PathBuf),
    Url(String),
}

impl SnapshotSource {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            SnapshotSource::Url(raw.to_string())
        } else {
            SnapshotSource::File(PathBuf::from(raw))
        }
    }
}

impl std::fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotSource::File(path) => write!(f, "{}", path.display()),
            SnapshotSource::Url(url) => f.write_str(url),
        }
    }
}

pub struct StoreClient {
    http: reqwest::Client,
    snapshot: Option<SnapshotSource>,
}

impl StoreClient {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        if !config.verify_tls {
            tracing::warn!("store client: TLS certificate verification disabled");
        }
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(config.query_timeout())
            .build()
            .map_err(StoreError::Client)?;

        Ok(Self {
            http,
            snapshot: config.snapshot.as_deref().map(SnapshotSource::parse),
        })
    }

    /// The snapshot named in the configuration, if any.
    pub fn configured_source(&self) -> Option<&SnapshotSource> {
        self.snapshot.as_ref()
    }

    /// Load and index the configured snapshot.
    pub async fn connect(&self) -> Result<MemoryGraph> {
        let source = self.snapshot.as_ref().ok_or(StoreError::NoSnapshot)?;
        self.load(source).await
    }

    pub async fn load(&self, source: &SnapshotSource) -> Result<MemoryGraph> {
        let bytes = self.read(source).await?;
        let snapshot = GraphSnapshot::from_json(&bytes)?;
        tracing::info!(
            source = %source,
            bytes = bytes.len(),
            terms = snapshot.terms.len(),
            records = snapshot.records.len(),
            "store client: snapshot loaded"
        );
        MemoryGraph::from_snapshot(snapshot)
    }

    async fn read(&self, source: &SnapshotSource) -> Result<Vec<u8>> {
        match source {
            SnapshotSource::File(path) => tokio::fs::read(path).await.map_err(|source| {
                StoreError::Io { path: path.clone(), source }
            }),
            SnapshotSource::Url(url) => {
                let http_err = |source| StoreError::Http { url: url.clone(), source };
                let response = self
                    .http
                    .get(url)
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(http_err)?;
                let body = response.bytes().await.map_err(http_err)?;
                Ok(body.to_vec())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sources_are_classified_by_scheme() {
        assert_eq!(
            SnapshotSource::parse("https://example.org/g.json"),
            SnapshotSource::Url("https://example.org/g.json".into())
        );
        assert_eq!(
            SnapshotSource::parse("./graph.json"),
            SnapshotSource::File(PathBuf::from("./graph.json"))
        );
    }

    #[test]
    fn client_builds_without_tls_verification() {
        let config = StoreConfig { verify_tls: false, ..StoreConfig::default() };
        let client = StoreClient::new(&config).unwrap();
        assert!(client.configured_source().is_none());
    }

    #[tokio::test]
    async fn connect_without_snapshot_fails() {
        let client = StoreClient::new(&StoreConfig::default()).unwrap();
        assert!(matches!(client.connect().await, Err(StoreError::NoSnapshot)));
    }

    #[tokio::test]
    async fn loads_snapshot_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        std::fs::write(
            &path,
            r#"{"terms": [{"id": "T1", "name": "hepatocyte"}],
                "records": [{"id": "R1", "title": "Liver", "celltypes": ["T1"]}]}"#,
        )
        .unwrap();

        let config = StoreConfig {
            snapshot: Some(path.display().to_string()),
            ..StoreConfig::default()
        };
        let graph = StoreClient::new(&config).unwrap().connect().await.unwrap();
        assert_eq!(graph.term_count(), 1);
        assert_eq!(graph.term("T1").unwrap().links, vec!["R1".to_string()]);
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let client = StoreClient::new(&StoreConfig::default()).unwrap();
        let source = SnapshotSource::File(PathBuf::from("/nonexistent/graph.json"));
        let err = client.load(&source).await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/graph.json"), "{err}");
    }
}
