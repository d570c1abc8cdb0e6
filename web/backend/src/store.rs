use artistgraph_core::graph::centrality::betweenness_all;
use artistgraph_core::{
    ArtistGraph, ArtistSource, BuildConfig, CacheError, CooccurrenceCounter, GraphCache,
    GraphIdError, QueryEngine, SourceError, graph_id, playlist_id,
};
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tokio::task::JoinError;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    MalformedPlaylist(#[from] GraphIdError),
    #[error("fetching playlist artists failed: {0}")]
    Source(#[from] SourceError),
    #[error("graph cache failure: {0}")]
    Cache(#[from] CacheError),
    #[error("background task failed: {0}")]
    Join(#[from] JoinError),
}

/// An immutable graph together with lazily computed whole-graph metrics.
pub struct GraphSnapshot {
    pub graph_id: Option<String>,
    pub graph: ArtistGraph,
    betweenness: OnceLock<Vec<f64>>,
}

impl GraphSnapshot {
    pub fn new(graph_id: Option<String>, graph: ArtistGraph) -> Self {
        Self {
            graph_id,
            graph,
            betweenness: OnceLock::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(None, ArtistGraph::new())
    }

    pub fn engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.graph)
    }

    /// Like [`engine`](Self::engine), for centrality queries. Betweenness
    /// is computed for the whole graph at most once per snapshot, on the
    /// blocking pool.
    pub async fn metrics_engine(self: &Arc<Self>) -> Result<QueryEngine<'_>, JoinError> {
        if !self.has_metrics() {
            let snapshot = Arc::clone(self);
            tokio::task::spawn_blocking(move || {
                snapshot
                    .betweenness
                    .get_or_init(|| betweenness_all(&snapshot.graph));
            })
            .await?;
        }
        let scores = self.betweenness.get_or_init(|| betweenness_all(&self.graph));
        Ok(self.engine().with_betweenness(scores))
    }

    pub fn has_metrics(&self) -> bool {
        self.betweenness.get().is_some()
    }
}

pub struct BuildOutcome {
    pub graph_id: String,
    pub cache_hit: bool,
    /// The snapshot this build published.
    pub snapshot: Arc<GraphSnapshot>,
}

/// Owns the current graph and serialises builds per playlist set.
///
/// Readers take an `Arc` of the current snapshot and never wait on a
/// build. A build works on its own fresh graph and swaps it in whole, so
/// no reader ever sees a half-built graph.
pub struct GraphStore {
    cache: GraphCache,
    config: BuildConfig,
    current: RwLock<Arc<GraphSnapshot>>,
    build_locks: BuildLocks,
}

impl GraphStore {
    pub fn new(cache: GraphCache, config: BuildConfig) -> Self {
        Self {
            cache,
            config,
            current: RwLock::new(Arc::new(GraphSnapshot::empty())),
            build_locks: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn cache(&self) -> &GraphCache {
        &self.cache
    }

    pub async fn current(&self) -> Arc<GraphSnapshot> {
        self.current.read().await.clone()
    }

    /// Makes the graph for `playlists` current, loading it from the cache
    /// when an identical playlist set was built before.
    ///
    /// Concurrent builds of the same set share one computation. A failed
    /// build leaves both the cache and the current graph untouched.
    pub async fn build<S: ArtistSource>(
        &self,
        playlists: &[Value],
        source: &S,
    ) -> Result<BuildOutcome, BuildError> {
        let graph_id = graph_id(playlists)?;
        // Declared first so it drops last, after the lock handle below.
        // Runs even when the build future is dropped mid-way.
        let _release = BuildLockRelease {
            locks: &self.build_locks,
            graph_id: &graph_id,
        };
        let build_lock = self.build_lock(&graph_id);
        let _guard = build_lock.lock().await;
        self.load_or_build(&graph_id, playlists, source).await
    }

    async fn load_or_build<S: ArtistSource>(
        &self,
        graph_id: &str,
        playlists: &[Value],
        source: &S,
    ) -> Result<BuildOutcome, BuildError> {
        let cache = self.cache.clone();
        let id = graph_id.to_string();
        if let Some(graph) = tokio::task::spawn_blocking(move || cache.load(&id)).await? {
            info!(
                "Cache hit for graph {graph_id}: {} artists, {} connections",
                graph.node_count(),
                graph.edge_count()
            );
            return Ok(BuildOutcome {
                graph_id: graph_id.to_string(),
                cache_hit: true,
                snapshot: self.publish(graph_id, graph).await,
            });
        }

        let start = Instant::now();
        let mut counter = CooccurrenceCounter::new(self.config.clone());
        for descriptor in playlists {
            // graph_id has already checked every descriptor for an id
            let Some(id) = playlist_id(descriptor) else {
                continue;
            };
            let artists = source.playlist_artists(id).await.inspect_err(|e| {
                warn!("Build of graph {graph_id} aborted at playlist {id}: {e}");
            })?;
            counter.record_playlist(id, artists);
        }
        let graph = counter.finish();
        info!(
            "Built graph {graph_id} from {} playlists in {:.2}s: {} artists, {} connections",
            playlists.len(),
            start.elapsed().as_secs_f64(),
            graph.node_count(),
            graph.edge_count()
        );

        let cache = self.cache.clone();
        let id = graph_id.to_string();
        let graph = tokio::task::spawn_blocking(move || cache.save(&id, &graph).map(|_| graph))
            .await??;

        Ok(BuildOutcome {
            graph_id: graph_id.to_string(),
            cache_hit: false,
            snapshot: self.publish(graph_id, graph).await,
        })
    }

    async fn publish(&self, graph_id: &str, graph: ArtistGraph) -> Arc<GraphSnapshot> {
        let snapshot = Arc::new(GraphSnapshot::new(Some(graph_id.to_string()), graph));
        *self.current.write().await = snapshot.clone();
        snapshot
    }

    fn build_lock(&self, graph_id: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.build_locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(graph_id.to_string()).or_default().clone()
    }

    /// Playlist sets with a build running or waiting.
    pub fn builds_in_flight(&self) -> usize {
        self.build_locks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

type BuildLocks = Mutex<FxHashMap<String, Arc<AsyncMutex<()>>>>;

/// Forgets the build lock of a graph id once no build holds it.
struct BuildLockRelease<'a> {
    locks: &'a BuildLocks,
    graph_id: &'a str,
}

impl Drop for BuildLockRelease<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if locks
            .get(self.graph_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(self.graph_id);
        }
    }
}
