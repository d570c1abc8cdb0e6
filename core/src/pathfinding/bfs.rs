use crate::graph::ArtistGraph;
use rustc_hash::{FxHashMap, FxHashSet};
use std::{collections::VecDeque, time::Instant};

/// `(path, artists_visited, elapsed_seconds)`
pub type PathResult = (Option<Vec<String>>, usize, f64);

struct BfsState {
    queue: VecDeque<usize>,
    visited: FxHashSet<usize>,
    parent_map: FxHashMap<usize, usize>,
}

impl BfsState {
    fn new(start: usize) -> Self {
        let mut queue = VecDeque::new();
        let mut visited = FxHashSet::default();

        queue.push_back(start);
        visited.insert(start);

        Self {
            queue,
            visited,
            parent_map: FxHashMap::default(),
        }
    }

    fn visit_neighbor(&mut self, neighbor: usize, current: usize) {
        if self.visited.insert(neighbor) {
            self.parent_map.insert(neighbor, current);
            self.queue.push_back(neighbor);
        }
    }
}

/// Fewest-hop path between two artists by name.
pub fn bfs_find_path(graph: &ArtistGraph, from: &str, to: &str) -> PathResult {
    let search_timer = Instant::now();

    let (Some(start), Some(target)) = (graph.index_of(from), graph.index_of(to)) else {
        return (None, 0, search_timer.elapsed().as_secs_f64());
    };

    let mut bfs_state = BfsState::new(start);

    while let Some(current_artist) = bfs_state.queue.pop_front() {
        if current_artist == target {
            let path = reconstruct_path(graph, &bfs_state.parent_map, start, target);
            let elapsed_time = search_timer.elapsed().as_secs_f64();
            return (Some(path), bfs_state.visited.len(), elapsed_time);
        }

        for &neighbor_artist in graph.neighbors_at(current_artist) {
            bfs_state.visit_neighbor(neighbor_artist, current_artist);
        }
    }

    let elapsed_time = search_timer.elapsed().as_secs_f64();
    (None, bfs_state.visited.len(), elapsed_time)
}

fn reconstruct_path(
    graph: &ArtistGraph,
    parent_map: &FxHashMap<usize, usize>,
    start: usize,
    target: usize,
) -> Vec<String> {
    let mut path = Vec::new();
    let mut current_node = target;

    while current_node != start {
        path.push(graph.name_at(current_node).to_string());
        current_node = parent_map[&current_node];
    }

    path.push(graph.name_at(start).to_string());
    path.reverse();
    path
}
