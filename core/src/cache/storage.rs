use super::CacheError;
use super::types::LinkGraph;
use crate::graph::ArtistGraph;
use crate::graph_id::is_graph_id;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

/// One JSON node-link record per graph id under `cache_dir`.
///
/// Records are written to a temporary file and renamed into place, so a
/// reader sees either the previous state or a complete record. Loading never
/// fails: a missing, expired or unreadable record is a miss.
#[derive(Debug, Clone)]
pub struct GraphCache {
    cache_dir: PathBuf,
    ttl: Option<Duration>,
}

impl GraphCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            ttl: None,
        }
    }

    /// Records older than `ttl` (by modification time) load as a miss.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn record_path(&self, graph_id: &str) -> PathBuf {
        self.cache_dir.join(format!("{graph_id}.json"))
    }

    pub fn save(&self, graph_id: &str, graph: &ArtistGraph) -> Result<PathBuf, CacheError> {
        if !is_graph_id(graph_id) {
            return Err(CacheError::InvalidGraphId(graph_id.to_string()));
        }

        fs::create_dir_all(&self.cache_dir)?;
        let serialized = serde_json::to_vec(&LinkGraph::from(graph))?;

        let record_path = self.record_path(graph_id);
        let temp_path = self
            .cache_dir
            .join(format!("{graph_id}.json.{}.tmp", std::process::id()));
        fs::write(&temp_path, serialized)?;
        if let Err(e) = fs::rename(&temp_path, &record_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        info!(
            graph_id,
            artists = graph.node_count(),
            connections = graph.edge_count(),
            "Saved graph record"
        );
        Ok(record_path)
    }

    pub fn load(&self, graph_id: &str) -> Option<ArtistGraph> {
        if !is_graph_id(graph_id) {
            debug!(graph_id, "Not a graph id, treating as cache miss");
            return None;
        }

        let record_path = self.record_path(graph_id);
        if !record_path.exists() {
            debug!(graph_id, "No cached graph record");
            return None;
        }

        if self.is_expired(&record_path) {
            info!(graph_id, "Cached graph record expired");
            return None;
        }

        let file_contents = match fs::read(&record_path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(graph_id, error = %e, "Failed to read graph record (will rebuild)");
                return None;
            }
        };

        let record = match serde_json::from_slice::<LinkGraph>(&file_contents) {
            Ok(record) => record,
            Err(e) => {
                warn!(graph_id, error = %e, "Failed to parse graph record (will rebuild)");
                return None;
            }
        };

        match ArtistGraph::try_from(record) {
            Ok(graph) => Some(graph),
            Err(e) => {
                warn!(graph_id, error = %e, "Invalid graph record (will rebuild)");
                None
            }
        }
    }

    /// Deletes expired records. Without a ttl nothing ever expires.
    pub fn prune_expired(&self) -> Result<usize, CacheError> {
        if self.ttl.is_none() || !self.cache_dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            let is_record = path.extension().is_some_and(|ext| ext == "json")
                && path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .is_some_and(is_graph_id);

            if is_record && self.is_expired(&path) {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }

        if removed > 0 {
            info!(removed, "Pruned expired graph records");
        }
        Ok(removed)
    }

    fn is_expired(&self, record_path: &Path) -> bool {
        let Some(ttl) = self.ttl else {
            return false;
        };
        fs::metadata(record_path)
            .and_then(|metadata| metadata.modified())
            .ok()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok())
            .is_some_and(|age| age > ttl)
    }
}
