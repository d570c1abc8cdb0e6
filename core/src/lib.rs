pub mod aggregation;
pub mod cache;
pub mod graph;
pub mod graph_id;
pub mod pathfinding;
pub mod query;
pub mod search;
pub mod source;

// Re-export commonly used items
pub use aggregation::{ArtistPair, BuildConfig, CooccurrenceCounter};
pub use cache::{CacheError, GraphCache, LinkGraph};
pub use graph::{ArtistDetails, ArtistGraph, ArtistNode, Attributes, Connection};
pub use graph_id::{GraphIdError, graph_id, playlist_id};
pub use pathfinding::bfs_find_path;
pub use query::QueryEngine;
pub use source::{ArtistProfile, ArtistSource, PlaylistArtists, SourceError};
