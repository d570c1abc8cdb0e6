use crate::config::AppConfig;
use crate::spotify::SpotifyClient;
use crate::store::GraphStore;
use artistgraph_core::{BuildConfig, GraphCache};
use tracing::info;

pub struct AppState {
    pub store: GraphStore,
    pub spotify: SpotifyClient,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let cache = GraphCache::new(config.cache_dir.clone()).with_ttl(config.cache_ttl);
        cache.prune_expired()?;
        info!("Graph cache directory: {}", cache.cache_dir().display());

        let spotify = SpotifyClient::new(&config.spotify)?;
        Ok(Self::from_parts(GraphStore::new(cache, BuildConfig::default()), spotify))
    }

    pub fn from_parts(store: GraphStore, spotify: SpotifyClient) -> Self {
        Self { store, spotify }
    }
}
