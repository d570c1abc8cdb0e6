pub mod centrality;

use crate::pathfinding::bfs_find_path;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Free-form artist attributes (`genres`, `popularity`, `name`, ...).
pub type Attributes = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct ArtistNode {
    pub name: String,
    pub attributes: Attributes,
}

impl ArtistNode {
    /// Genres stored under the `genres` attribute; empty when unset or not a list.
    pub fn genres(&self) -> Vec<String> {
        self.attributes
            .get("genres")
            .and_then(Value::as_array)
            .map(|genres| {
                genres
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Edge payload: how many playlists the pair shares, and which ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connection {
    pub weight: u64,
    pub playlists: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDetails {
    pub artist_name: String,
    pub shared_playlists: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistDetails {
    pub name: String,
    pub genres: Vec<String>,
    pub connections: Vec<ConnectionDetails>,
    pub playlists: Vec<String>,
}

/// Undirected, simple, self-loop-free artist graph keyed by artist name.
///
/// Nodes and adjacency lists keep insertion order so that every listing and
/// every serialized record comes out the same way for the same input.
#[derive(Debug, Clone, Default)]
pub struct ArtistGraph {
    nodes: Vec<ArtistNode>,
    index: FxHashMap<String, usize>,
    adjacency: Vec<Vec<usize>>,
    edges: FxHashMap<(usize, usize), Connection>,
}

fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

impl ArtistGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.adjacency.clear();
        self.edges.clear();
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Inserts the artist, or merges `attributes` into the existing ones.
    /// Supplied keys overwrite, other existing keys are left untouched.
    pub fn add_artist(&mut self, name: &str, attributes: Attributes) -> usize {
        if let Some(&idx) = self.index.get(name) {
            self.nodes[idx].attributes.extend(attributes);
            return idx;
        }

        let idx = self.nodes.len();
        self.nodes.push(ArtistNode {
            name: name.to_string(),
            attributes,
        });
        self.adjacency.push(Vec::new());
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Creates the edge `a - b` with `shared_count` as weight, or adds
    /// `shared_count` to the weight of an existing edge. Shared playlist ids
    /// are unioned into the edge.
    ///
    /// Returns `false` without touching the graph when either artist is not a
    /// node or when `a == b`.
    pub fn add_connection(
        &mut self,
        a: &str,
        b: &str,
        shared_count: u64,
        playlists: &[String],
    ) -> bool {
        let (Some(&ia), Some(&ib)) = (self.index.get(a), self.index.get(b)) else {
            return false;
        };
        if ia == ib {
            return false;
        }

        let key = edge_key(ia, ib);
        if !self.edges.contains_key(&key) {
            self.adjacency[ia].push(ib);
            self.adjacency[ib].push(ia);
        }

        let connection = self.edges.entry(key).or_default();
        connection.weight += shared_count;
        for playlist in playlists {
            if !connection.playlists.contains(playlist) {
                connection.playlists.push(playlist.clone());
            }
        }
        true
    }

    pub fn artists(&self) -> impl Iterator<Item = &ArtistNode> {
        self.nodes.iter()
    }

    /// All artist names in insertion order.
    pub fn get_artists(&self) -> Vec<String> {
        self.nodes.iter().map(|node| node.name.clone()).collect()
    }

    pub fn artist(&self, name: &str) -> Option<&ArtistNode> {
        self.index.get(name).map(|&idx| &self.nodes[idx])
    }

    /// Neighbours of `name`; empty when the artist is unknown.
    pub fn get_connections(&self, name: &str) -> Vec<String> {
        match self.index.get(name) {
            Some(&idx) => self.adjacency[idx]
                .iter()
                .map(|&neighbor| self.nodes[neighbor].name.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn connection(&self, a: &str, b: &str) -> Option<&Connection> {
        let (&ia, &ib) = (self.index.get(a)?, self.index.get(b)?);
        self.edges.get(&edge_key(ia, ib))
    }

    /// Every edge once, as `(a, b, connection)` with `a` inserted before `b`.
    pub fn connections(&self) -> impl Iterator<Item = (&str, &str, &Connection)> {
        self.adjacency.iter().enumerate().flat_map(move |(ia, neighbors)| {
            neighbors
                .iter()
                .filter(move |&&ib| ia < ib)
                .map(move |&ib| {
                    (
                        self.nodes[ia].name.as_str(),
                        self.nodes[ib].name.as_str(),
                        &self.edges[&(ia, ib)],
                    )
                })
        })
    }

    pub fn get_artist_details(&self, name: &str) -> Option<ArtistDetails> {
        let &idx = self.index.get(name)?;
        let node = &self.nodes[idx];

        let mut playlists: Vec<String> = Vec::new();
        let connections = self.adjacency[idx]
            .iter()
            .map(|&neighbor| {
                let shared = &self.edges[&edge_key(idx, neighbor)].playlists;
                for playlist in shared {
                    if !playlists.contains(playlist) {
                        playlists.push(playlist.clone());
                    }
                }
                ConnectionDetails {
                    artist_name: self.nodes[neighbor].name.clone(),
                    shared_playlists: shared.clone(),
                }
            })
            .collect();

        Some(ArtistDetails {
            name: node.name.clone(),
            genres: node.genres(),
            connections,
            playlists,
        })
    }

    /// Genre list per requested name; unknown artists map to an empty list.
    pub fn get_genres_for_artists<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> BTreeMap<String, Vec<String>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let genres = self.artist(name).map(ArtistNode::genres).unwrap_or_default();
                (name.to_string(), genres)
            })
            .collect()
    }

    /// Shared playlist ids per neighbour; empty when the artist is unknown.
    pub fn get_artist_shared_tracks(&self, name: &str) -> BTreeMap<String, Vec<String>> {
        let Some(&idx) = self.index.get(name) else {
            return BTreeMap::new();
        };
        self.adjacency[idx]
            .iter()
            .map(|&neighbor| {
                (
                    self.nodes[neighbor].name.clone(),
                    self.edges[&edge_key(idx, neighbor)].playlists.clone(),
                )
            })
            .collect()
    }

    /// Sum of incident edge weights.
    pub fn total_weight(&self, name: &str) -> u64 {
        self.index
            .get(name)
            .map(|&idx| self.total_weight_at(idx))
            .unwrap_or(0)
    }

    fn total_weight_at(&self, idx: usize) -> u64 {
        self.adjacency[idx]
            .iter()
            .map(|&neighbor| self.edges[&edge_key(idx, neighbor)].weight)
            .sum()
    }

    /// Top `top_n` artists by total connection weight, heaviest first; ties
    /// are broken by name.
    pub fn recommend_popular_artists(&self, top_n: usize) -> Vec<(String, u64)> {
        let mut ranked: Vec<(String, u64)> = (0..self.nodes.len())
            .map(|idx| (self.nodes[idx].name.clone(), self.total_weight_at(idx)))
            .collect();

        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(top_n);
        ranked
    }

    /// Fewest-hop path from `a` to `b`, endpoints included. Edge weights are
    /// ignored. `None` when either artist is unknown or they are disconnected.
    pub fn find_shortest_path(&self, a: &str, b: &str) -> Option<Vec<String>> {
        bfs_find_path(self, a, b).0
    }

    pub fn degree_centrality(&self, name: &str) -> f64 {
        centrality::degree_centrality(self, name)
    }

    pub fn betweenness_centrality(&self, name: &str) -> f64 {
        centrality::betweenness_centrality(self, name)
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn name_at(&self, idx: usize) -> &str {
        &self.nodes[idx].name
    }

    pub(crate) fn neighbors_at(&self, idx: usize) -> &[usize] {
        &self.adjacency[idx]
    }
}
