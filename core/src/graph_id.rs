//! Content-addressed graph ids.
//!
//! The id of a build is the SHA-256 of the whole playlist batch, serialized
//! as compact JSON with object keys sorted at every level. Identical batches
//! always map to the same id; batches that merely overlap never do.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphIdError {
    #[error("playlist descriptor #{index} has no string `id`")]
    MissingPlaylistId { index: usize },
}

/// Hex SHA-256 of the canonical form of `playlists`.
pub fn graph_id(playlists: &[Value]) -> Result<String, GraphIdError> {
    for (index, descriptor) in playlists.iter().enumerate() {
        if playlist_id(descriptor).is_none() {
            return Err(GraphIdError::MissingPlaylistId { index });
        }
    }

    let canonical = Value::Array(playlists.iter().map(canonicalize).collect());
    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string().as_bytes());
    let digest = hasher.finalize();

    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    Ok(hex)
}

/// The `id` field of a playlist descriptor.
pub fn playlist_id(descriptor: &Value) -> Option<&str> {
    descriptor.get("id").and_then(Value::as_str)
}

/// 64 lowercase hex characters, as produced by [`graph_id`].
pub fn is_graph_id(candidate: &str) -> bool {
    candidate.len() == 64
        && candidate
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

// Rebuilt with keys inserted in sorted order so the output is sorted whether
// or not serde_json keeps insertion order.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
