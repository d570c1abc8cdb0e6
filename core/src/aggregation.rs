use crate::graph::ArtistGraph;
use crate::source::PlaylistArtists;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// A pair becomes an edge only when it shares at least this many playlists.
    pub min_shared_playlists: u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            min_shared_playlists: 2,
        }
    }
}

/// Unordered pair of distinct artist names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtistPair(String, String);

impl ArtistPair {
    pub fn new(a: &str, b: &str) -> Option<Self> {
        match a.cmp(b) {
            std::cmp::Ordering::Less => Some(Self(a.to_string(), b.to_string())),
            std::cmp::Ordering::Greater => Some(Self(b.to_string(), a.to_string())),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn artists(&self) -> (&str, &str) {
        (&self.0, &self.1)
    }
}

#[derive(Debug, Clone, Default)]
struct PairTally {
    count: u64,
    playlists: Vec<String>,
}

/// Accumulates one batch of playlists into an [`ArtistGraph`].
///
/// Every artist seen becomes a node (attributes overwrite-merged in playlist
/// order). Pair counts are held back until [`finish`](Self::finish), where
/// only pairs meeting the threshold are turned into edges.
pub struct CooccurrenceCounter {
    config: BuildConfig,
    graph: ArtistGraph,
    pairs: FxHashMap<ArtistPair, PairTally>,
    playlists_seen: usize,
}

impl CooccurrenceCounter {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            graph: ArtistGraph::new(),
            pairs: FxHashMap::default(),
            playlists_seen: 0,
        }
    }

    pub fn record_playlist(&mut self, playlist_id: &str, artists: PlaylistArtists) {
        self.playlists_seen += 1;

        let mut seen = FxHashSet::default();
        let names: Vec<&str> = artists.names().filter(|name| seen.insert(*name)).collect();

        for (i, first) in names.iter().enumerate() {
            for second in &names[i + 1..] {
                let Some(pair) = ArtistPair::new(first, second) else {
                    continue;
                };
                let tally = self.pairs.entry(pair).or_default();
                tally.count += 1;
                if !tally.playlists.iter().any(|id| id == playlist_id) {
                    tally.playlists.push(playlist_id.to_string());
                }
            }
        }

        for (name, attributes) in artists.iter() {
            self.graph.add_artist(name, attributes.clone());
        }
    }

    /// Number of distinct pairs seen so far, thresholded or not.
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn playlists_seen(&self) -> usize {
        self.playlists_seen
    }

    pub fn finish(self) -> ArtistGraph {
        let Self {
            config,
            mut graph,
            pairs,
            ..
        } = self;

        let mut qualifying: Vec<(ArtistPair, PairTally)> = pairs
            .into_iter()
            .filter(|(_, tally)| tally.count >= config.min_shared_playlists)
            .collect();
        qualifying.sort_by(|a, b| a.0.cmp(&b.0));

        for (pair, tally) in qualifying {
            let (a, b) = pair.artists();
            graph.add_connection(a, b, tally.count, &tally.playlists);
        }
        graph
    }
}
