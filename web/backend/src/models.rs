use artistgraph_core::LinkGraph;
use artistgraph_core::query::{ArtistOverview, ConnectionGenres, ExtendedConnections, Influence, PopularArtist};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub use crate::spotify::Category;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Deserialize)]
pub struct BuildGraphRequest {
    pub playlists: Vec<Value>,
}

#[derive(Serialize, Deserialize)]
pub struct BuildGraphResponse {
    pub graph_id: String,
    pub cache_hit: bool,
    pub graph: LinkGraph,
}

#[derive(Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub graph_id: Option<String>,
    pub total_artists: usize,
    pub total_connections: usize,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

#[derive(Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<String>,
    pub count: usize,
}

#[derive(Deserialize)]
pub struct PathQuery {
    pub from: String,
    pub to: String,
}

#[derive(Serialize, Deserialize)]
pub struct SearchStats {
    pub artists_visited: usize,
    pub duration_ms: u64,
}

#[derive(Serialize, Deserialize)]
pub struct PathResponse {
    pub path: Vec<String>,
    pub artist_count: usize,
    pub step_count: usize,
    pub search_stats: SearchStats,
}

#[derive(Deserialize)]
pub struct PopularQuery {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    4
}

#[derive(Serialize, Deserialize)]
pub struct PopularResponse {
    pub artists: Vec<PopularArtist>,
}

#[derive(Serialize, Deserialize)]
pub struct ArtistResponse {
    #[serde(flatten)]
    pub overview: ArtistOverview,
}

#[derive(Serialize, Deserialize)]
pub struct ConnectionsResponse {
    pub artist: String,
    #[serde(flatten)]
    pub connections: ConnectionGenres,
}

#[derive(Serialize, Deserialize)]
pub struct ExtendedConnectionsResponse {
    pub artist: String,
    #[serde(flatten)]
    pub connections: ExtendedConnections,
}

#[derive(Serialize, Deserialize)]
pub struct InfluenceResponse {
    pub artist: String,
    #[serde(flatten)]
    pub influence: Influence,
}

#[derive(Serialize, Deserialize)]
pub struct SharedPlaylistsResponse {
    pub artist: String,
    pub shared_playlists: BTreeMap<String, Vec<String>>,
}
