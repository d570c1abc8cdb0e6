use crate::graph::Attributes;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Catalog attributes recorded for every artist on a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistProfile {
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: u32,
}

impl ArtistProfile {
    pub fn into_attributes(self) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert("name".to_string(), self.name.into());
        attributes.insert("genres".to_string(), self.genres.into());
        attributes.insert("popularity".to_string(), self.popularity.into());
        attributes
    }
}

/// Artists appearing on one playlist, keyed by name, in first-seen order.
/// Inserting a name twice keeps its position and replaces its attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistArtists {
    entries: Vec<(String, Attributes)>,
    positions: FxHashMap<String, usize>,
}

impl PlaylistArtists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, attributes: Attributes) {
        let name = name.into();
        match self.positions.get(&name) {
            Some(&position) => self.entries[position].1 = attributes,
            None => {
                self.positions.insert(name.clone(), self.entries.len());
                self.entries.push((name, attributes));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attributes)> {
        self.entries.iter().map(|(name, attributes)| (name.as_str(), attributes))
    }
}

impl FromIterator<ArtistProfile> for PlaylistArtists {
    fn from_iter<I: IntoIterator<Item = ArtistProfile>>(iter: I) -> Self {
        let mut artists = Self::new();
        for profile in iter {
            let name = profile.name.clone();
            artists.insert(name, profile.into_attributes());
        }
        artists
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// Rate limited, timed out or otherwise worth retrying.
    #[error("transient data source failure: {message}")]
    Transient {
        message: String,
        retry_after: Option<Duration>,
    },
    /// Retrying will not help; the batch must be abandoned.
    #[error("data source failure: {0}")]
    Fatal(String),
}

impl SourceError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// Supplies the artists of a playlist. Implementations own their retry
/// policy; an error returned here aborts the whole build.
pub trait ArtistSource: Send + Sync {
    fn playlist_artists(
        &self,
        playlist_id: &str,
    ) -> impl Future<Output = Result<PlaylistArtists, SourceError>> + Send;
}
