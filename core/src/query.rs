use crate::graph::centrality::{betweenness_all, degree_centrality};
use crate::graph::{ArtistDetails, ArtistGraph};
use crate::pathfinding::bfs_find_path;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Influence {
    pub degree_centrality: f64,
    pub betweenness_centrality: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistOverview {
    pub details: ArtistDetails,
    pub connections: Vec<String>,
    pub influence: Influence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionGenres {
    pub connections: Vec<String>,
    pub genres: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedConnections {
    pub first_degree: Vec<String>,
    pub extended: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularArtist {
    pub name: String,
    pub total_weight: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSearch {
    pub path: Option<Vec<String>>,
    pub artists_visited: usize,
    pub duration_ms: u64,
}

/// Read-only view over one graph.
///
/// Unknown artists never produce an error: lookups that describe a single
/// artist return `None`, listings come back empty and metrics are 0.
pub struct QueryEngine<'a> {
    graph: &'a ArtistGraph,
    betweenness: Option<&'a [f64]>,
}

impl<'a> QueryEngine<'a> {
    pub fn new(graph: &'a ArtistGraph) -> Self {
        Self {
            graph,
            betweenness: None,
        }
    }

    /// Reuse betweenness scores already computed for this graph
    /// (see [`betweenness_all`]) instead of recomputing them per query.
    pub fn with_betweenness(mut self, scores: &'a [f64]) -> Self {
        if scores.len() == self.graph.node_count() {
            self.betweenness = Some(scores);
        }
        self
    }

    pub fn graph(&self) -> &'a ArtistGraph {
        self.graph
    }

    pub fn artist_details(&self, name: &str) -> Option<ArtistDetails> {
        self.graph.get_artist_details(name)
    }

    /// Details, neighbours and influence in one lookup.
    pub fn artist_overview(&self, name: &str) -> Option<ArtistOverview> {
        let details = self.artist_details(name)?;
        Some(ArtistOverview {
            details,
            connections: self.connections(name),
            influence: self.influence(name),
        })
    }

    pub fn connections(&self, name: &str) -> Vec<String> {
        self.graph.get_connections(name)
    }

    pub fn connections_with_genres(&self, name: &str) -> ConnectionGenres {
        let connections = self.connections(name);
        let genres = self.graph.get_genres_for_artists(&connections);
        ConnectionGenres {
            connections,
            genres,
        }
    }

    /// First-degree neighbours, and each of their own neighbour lists.
    pub fn extended_connections(&self, name: &str) -> ExtendedConnections {
        let first_degree = self.connections(name);
        let extended = first_degree
            .iter()
            .map(|neighbor| (neighbor.clone(), self.connections(neighbor)))
            .collect();

        ExtendedConnections {
            first_degree,
            extended,
        }
    }

    pub fn shared_playlists(&self, name: &str) -> BTreeMap<String, Vec<String>> {
        self.graph.get_artist_shared_tracks(name)
    }

    pub fn popular_artists(&self, top_n: usize) -> Vec<PopularArtist> {
        self.graph
            .recommend_popular_artists(top_n)
            .into_iter()
            .map(|(name, total_weight)| PopularArtist { name, total_weight })
            .collect()
    }

    pub fn influence(&self, name: &str) -> Influence {
        Influence {
            degree_centrality: degree_centrality(self.graph, name),
            betweenness_centrality: self.betweenness_of(name),
        }
    }

    pub fn shortest_path(&self, from: &str, to: &str) -> PathSearch {
        let (path, artists_visited, elapsed) = bfs_find_path(self.graph, from, to);
        PathSearch {
            path,
            artists_visited,
            duration_ms: (elapsed * 1000.0) as u64,
        }
    }

    fn betweenness_of(&self, name: &str) -> f64 {
        let Some(idx) = self.graph.index_of(name) else {
            return 0.0;
        };
        match self.betweenness {
            Some(scores) => scores[idx],
            None => betweenness_all(self.graph)[idx],
        }
    }
}
