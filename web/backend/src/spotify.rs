use crate::config::SpotifyConfig;
use crate::retry::RetryPolicy;
use artistgraph_core::{ArtistProfile, ArtistSource, PlaylistArtists, SourceError};
use futures::stream::{self, StreamExt, TryStreamExt};
use moka::future::Cache;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode};
use rustc_hash::FxHashSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

const ARTIST_LOOKUP_CONCURRENCY: usize = 8;

#[derive(Debug, Deserialize)]
struct TracksPage {
    #[serde(default)]
    items: Vec<TrackItem>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    track: Option<Track>,
}

#[derive(Debug, Deserialize)]
struct Track {
    #[serde(default)]
    artists: Vec<TrackArtist>,
}

#[derive(Debug, Deserialize)]
struct TrackArtist {
    id: Option<String>,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    name: String,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    popularity: u32,
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    categories: Paging<Category>,
}

#[derive(Debug, Deserialize)]
struct CategoryPlaylistsResponse {
    playlists: Paging<Option<Value>>,
}

#[derive(Debug, Deserialize)]
struct Paging<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Spotify Web API client acting as the playlist artist source.
pub struct SpotifyClient {
    client: Client,
    api_base: String,
    access_token: String,
    retry: RetryPolicy,
    category_playlist_limit: u32,
    artist_cache: Cache<String, ArtistProfile>,
}

impl SpotifyClient {
    pub fn new(config: &SpotifyConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        let artist_cache = Cache::builder()
            .max_capacity(50_000)
            .time_to_live(Duration::from_secs(24 * 60 * 60))
            .build();

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            retry: RetryPolicy::with_max_attempts(config.max_retries),
            category_playlist_limit: config.category_playlist_limit,
            artist_cache,
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn categories(&self) -> Result<Vec<Category>, SourceError> {
        let url = format!("{}/browse/categories", self.api_base);
        let response: CategoriesResponse = self.get_json(&url).await?;
        Ok(response.categories.items)
    }

    /// Playlist descriptors of a category, exactly as the catalog returns
    /// them. Missing entries are dropped.
    pub async fn category_playlists(&self, category_id: &str) -> Result<Vec<Value>, SourceError> {
        let url = format!(
            "{}/browse/categories/{}/playlists?limit={}",
            self.api_base,
            urlencoding::encode(category_id),
            self.category_playlist_limit
        );
        let response: CategoryPlaylistsResponse = self.get_json(&url).await?;
        Ok(response.playlists.items.into_iter().flatten().collect())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        self.find_json(url)
            .await?
            .ok_or_else(|| SourceError::Fatal(format!("{url} does not exist")))
    }

    /// Like [`get_json`](Self::get_json), but a resource the catalog does
    /// not know (404 or 400) comes back as `None`.
    async fn find_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, SourceError> {
        self.retry.run(url, || self.request_once(url)).await
    }

    async fn request_once<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, SourceError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| SourceError::transient(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(SourceError::Transient {
                message: format!("rate limited by {url}"),
                retry_after,
            });
        }
        if status.is_server_error() {
            return Err(SourceError::transient(format!("{url} returned {status}")));
        }
        if matches!(status, StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST) {
            return Ok(None);
        }
        // 401 and 403 included: a rejected token aborts the build.
        if !status.is_success() {
            return Err(SourceError::Fatal(format!("{url} returned {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::transient(format!("reading {url} failed: {e}")))?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| SourceError::Fatal(format!("unexpected response from {url}: {e}")))
    }

    /// An artist the catalog does not know is skipped rather than failing
    /// the playlist. Any other failure aborts it.
    async fn artist_profile(&self, artist_id: &str) -> Result<Option<ArtistProfile>, SourceError> {
        if let Some(profile) = self.artist_cache.get(artist_id).await {
            return Ok(Some(profile));
        }

        let url = format!("{}/artists/{}", self.api_base, urlencoding::encode(artist_id));
        let Some(artist) = self.find_json::<SpotifyArtist>(&url).await? else {
            warn!("Skipping artist {artist_id}: not in the catalog");
            return Ok(None);
        };

        let profile = ArtistProfile {
            name: artist.name,
            genres: artist.genres,
            popularity: artist.popularity,
        };
        self.artist_cache
            .insert(artist_id.to_string(), profile.clone())
            .await;
        Ok(Some(profile))
    }

    async fn fetch_playlist_artists(&self, playlist_id: &str) -> Result<PlaylistArtists, SourceError> {
        let mut next_url = Some(format!(
            "{}/playlists/{}/tracks",
            self.api_base,
            urlencoding::encode(playlist_id)
        ));
        let mut seen = FxHashSet::default();
        let mut track_artists = Vec::new();

        while let Some(url) = next_url.take() {
            let page: TracksPage = self.get_json(&url).await?;
            for artist in page
                .items
                .into_iter()
                .filter_map(|item| item.track)
                .flat_map(|track| track.artists)
            {
                if let Some(id) = artist.id {
                    if seen.insert(id.clone()) {
                        track_artists.push((id, artist.name));
                    }
                }
            }
            next_url = page.next;
        }

        let ids: Vec<String> = track_artists.iter().map(|(id, _)| id.clone()).collect();
        let profiles: Vec<Option<ArtistProfile>> = stream::iter(ids)
            .map(|id| async move { self.artist_profile(&id).await })
            .buffered(ARTIST_LOOKUP_CONCURRENCY)
            .try_collect()
            .await?;

        let mut artists = PlaylistArtists::new();
        for ((_, name), profile) in track_artists.iter().zip(profiles) {
            if let Some(profile) = profile {
                artists.insert(name.as_str(), profile.into_attributes());
            }
        }
        debug!("Playlist {playlist_id}: {} artists", artists.len());
        Ok(artists)
    }
}

impl ArtistSource for SpotifyClient {
    fn playlist_artists(
        &self,
        playlist_id: &str,
    ) -> impl Future<Output = Result<PlaylistArtists, SourceError>> + Send {
        self.fetch_playlist_artists(playlist_id)
    }
}
