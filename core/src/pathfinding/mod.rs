pub mod bfs;

pub use bfs::{PathResult, bfs_find_path};
