//! Whole-graph centrality measures. Both are recomputed from the current
//! graph on every call; callers that need many lookups on one graph should
//! take [`betweenness_all`] once and index into it.

use super::ArtistGraph;
use std::collections::VecDeque;

/// `degree / (n - 1)`. A lone artist scores 1.0, an unknown one 0.0.
pub fn degree_centrality(graph: &ArtistGraph, name: &str) -> f64 {
    let Some(idx) = graph.index_of(name) else {
        return 0.0;
    };
    let node_count = graph.node_count();
    if node_count <= 1 {
        return 1.0;
    }
    graph.neighbors_at(idx).len() as f64 / (node_count - 1) as f64
}

pub fn betweenness_centrality(graph: &ArtistGraph, name: &str) -> f64 {
    match graph.index_of(name) {
        Some(idx) => betweenness_all(graph)[idx],
        None => 0.0,
    }
}

/// Normalized betweenness for every artist, indexed in insertion order.
///
/// Brandes' accumulation over unweighted shortest paths. Each unordered pair
/// is reached from both endpoints, so the sum is scaled by
/// `1 / ((n - 1)(n - 2))` rather than `2 / ((n - 1)(n - 2))`.
pub fn betweenness_all(graph: &ArtistGraph) -> Vec<f64> {
    let node_count = graph.node_count();
    let mut scores = vec![0.0; node_count];

    let mut stack: Vec<usize> = Vec::with_capacity(node_count);
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut path_counts = vec![0.0_f64; node_count];
    let mut distances = vec![-1_i64; node_count];
    let mut dependencies = vec![0.0_f64; node_count];
    let mut queue = VecDeque::new();

    for source in 0..node_count {
        stack.clear();
        for preds in &mut predecessors {
            preds.clear();
        }
        path_counts.fill(0.0);
        distances.fill(-1);
        dependencies.fill(0.0);

        path_counts[source] = 1.0;
        distances[source] = 0;
        queue.push_back(source);

        while let Some(current) = queue.pop_front() {
            stack.push(current);
            for &neighbor in graph.neighbors_at(current) {
                if distances[neighbor] < 0 {
                    distances[neighbor] = distances[current] + 1;
                    queue.push_back(neighbor);
                }
                if distances[neighbor] == distances[current] + 1 {
                    path_counts[neighbor] += path_counts[current];
                    predecessors[neighbor].push(current);
                }
            }
        }

        while let Some(node) = stack.pop() {
            for &pred in &predecessors[node] {
                dependencies[pred] +=
                    path_counts[pred] / path_counts[node] * (1.0 + dependencies[node]);
            }
            if node != source {
                scores[node] += dependencies[node];
            }
        }
    }

    if node_count > 2 {
        let scale = 1.0 / ((node_count - 1) * (node_count - 2)) as f64;
        for score in &mut scores {
            *score *= scale;
        }
    }
    scores
}
