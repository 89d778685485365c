//! Configuration types for ontofacet.
//!
//! [`Config::load`] reads `~/.config/ontofacet/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::load_from`] reads an
//! explicit file on top of the same defaults. [`Config::defaults`] returns the
//! defaults without touching the filesystem (useful in tests).

use crate::types::{FacetCategory, Operation};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[store]
# Graph snapshot: a file path or an http(s) URL.
# snapshot = "/var/lib/ontofacet/graph.json"
verify_tls       = true
max_sessions     = 8
query_timeout_ms = 30000

[search]
short_circuit_empty = true
default_operation   = "OR"

[vocabularies]
celltypes = ["Cell Ontology"]
diseases  = ["Human Disease Ontology", "Mondo Disease Ontology"]
tissues   = ["UBERON"]
organism  = ["Experimental Factor Ontology"]
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/ontofacet/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub vocabularies: VocabulariesConfig,
}

/// `[store]` section of `config.toml`.
///
/// Everything the store client needs is passed in here at construction;
/// nothing is read from process-wide state at query time.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub snapshot: Option<String>,
    /// Verify TLS certificates when fetching a remote snapshot.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    /// Maximum number of store queries in flight at once.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

fn default_verify_tls() -> bool { true }
fn default_max_sessions() -> usize { 8 }
fn default_query_timeout_ms() -> u64 { 30_000 }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            snapshot: None,
            verify_tls: default_verify_tls(),
            max_sessions: default_max_sessions(),
            query_timeout_ms: default_query_timeout_ms(),
        }
    }
}

impl StoreConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

/// `[search]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Cancel pending branches once the finished ones share no record.
    #[serde(default = "default_short_circuit_empty")]
    pub short_circuit_empty: bool,
    /// Operation used when a request does not name one. Accepted in any
    /// case, like the tokens in a request.
    #[serde(default, deserialize_with = "operation_token")]
    pub default_operation: Operation,
}

fn operation_token<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Operation, D::Error> {
    let token = String::deserialize(deserializer)?;
    Operation::parse("search.default_operation", &token).map_err(serde::de::Error::custom)
}

fn default_short_circuit_empty() -> bool { true }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            short_circuit_empty: default_short_circuit_empty(),
            default_operation: Operation::default(),
        }
    }
}

/// `[vocabularies]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct VocabulariesConfig {
    #[serde(default = "default_celltypes")]
    pub celltypes: Vec<String>,
    #[serde(default = "default_diseases")]
    pub diseases: Vec<String>,
    #[serde(default = "default_tissues")]
    pub tissues: Vec<String>,
    #[serde(default = "default_organism")]
    pub organism: Vec<String>,
}

fn vocabularies_of(category: FacetCategory) -> Vec<String> {
    category.default_vocabularies().iter().map(|s| s.to_string()).collect()
}

fn default_celltypes() -> Vec<String> { vocabularies_of(FacetCategory::CellTypes) }
fn default_diseases() -> Vec<String> { vocabularies_of(FacetCategory::Diseases) }
fn default_tissues() -> Vec<String> { vocabularies_of(FacetCategory::Tissues) }
fn default_organism() -> Vec<String> { vocabularies_of(FacetCategory::Organism) }

impl Default for VocabulariesConfig {
    fn default() -> Self {
        Self {
            celltypes: default_celltypes(),
            diseases: default_diseases(),
            tissues: default_tissues(),
            organism: default_organism(),
        }
    }
}

impl VocabulariesConfig {
    pub fn for_category(&self, category: FacetCategory) -> &[String] {
        match category {
            FacetCategory::CellTypes => &self.celltypes,
            FacetCategory::Diseases => &self.diseases,
            FacetCategory::Tissues => &self.tissues,
            FacetCategory::Organism => &self.organism,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/ontofacet/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load `path` layered on top of the built-in defaults. The file must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("ontofacet")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
