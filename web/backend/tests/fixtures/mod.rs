#![allow(dead_code)]

use artistgraph_core::{
    ArtistProfile, ArtistSource, BuildConfig, GraphCache, PlaylistArtists, SourceError,
};
use artistgraph_web::config::SpotifyConfig;
use artistgraph_web::create_router;
use artistgraph_web::retry::RetryPolicy;
use artistgraph_web::spotify::SpotifyClient;
use artistgraph_web::state::AppState;
use artistgraph_web::store::GraphStore;
use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::{Path, Query, State},
    http::{Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Catalog artists: (id, name, genres, popularity).
pub const ARTISTS: [(&str, &str, &[&str], u32); 4] = [
    ("slowdive", "Slowdive", &["shoegaze", "dream pop"], 61),
    ("ride", "Ride", &["shoegaze"], 52),
    ("lush", "Lush", &["dream pop"], 40),
    ("cocteau", "Cocteau Twins", &["ethereal wave"], 58),
];

/// Playlists by id, as artist ids in track order.
///
/// p1..p3 give Slowdive-Ride and Slowdive-Lush two shared playlists each
/// and Ride-Lush only one. p4 puts Cocteau Twins next to Ride once.
pub const PLAYLISTS: [(&str, &[&str]); 4] = [
    ("p1", &["slowdive", "ride", "lush"]),
    ("p2", &["slowdive", "ride"]),
    ("p3", &["slowdive", "lush"]),
    ("p4", &["ride", "cocteau"]),
];

pub fn descriptors(ids: &[&str]) -> Vec<Value> {
    ids.iter()
        .map(|id| json!({"id": id, "name": format!("Playlist {id}")}))
        .collect()
}

/// Playlists only the mock catalog serves, as (artist id, name) in track
/// order. `ghost` is unknown to the catalog and looking up `revoked`
/// answers 401.
const CATALOG_ONLY_PLAYLISTS: [(&str, &[(&str, &str)]); 2] = [
    ("p5", &[("slowdive", "Slowdive"), ("ghost", "Ghost Artist"), ("ride", "Ride")]),
    ("expired", &[("lush", "Lush"), ("revoked", "Revoked Artist")]),
];

fn catalog_tracks(id: &str) -> Option<Vec<(&'static str, &'static str)>> {
    if let Some(artist_ids) = catalog_playlist(id) {
        return Some(
            artist_ids
                .iter()
                .filter_map(|artist_id| catalog_artist(artist_id))
                .map(|(artist_id, name, ..)| (artist_id, name))
                .collect(),
        );
    }
    CATALOG_ONLY_PLAYLISTS
        .iter()
        .find(|(playlist_id, _)| *playlist_id == id)
        .map(|(_, tracks)| tracks.to_vec())
}

fn catalog_artist(id: &str) -> Option<(&'static str, &'static str, &'static [&'static str], u32)> {
    ARTISTS.iter().copied().find(|(artist_id, ..)| *artist_id == id)
}

fn catalog_playlist(id: &str) -> Option<&'static [&'static str]> {
    PLAYLISTS
        .iter()
        .find(|(playlist_id, _)| *playlist_id == id)
        .map(|(_, artists)| *artists)
}

/// In-memory artist source that counts calls and can fail one playlist.
pub struct FakeSource {
    calls: AtomicUsize,
    fail_on: Option<String>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on: None,
        }
    }

    pub fn failing_on(playlist_id: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on: Some(playlist_id.to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ArtistSource for FakeSource {
    fn playlist_artists(
        &self,
        playlist_id: &str,
    ) -> impl Future<Output = Result<PlaylistArtists, SourceError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result: Result<PlaylistArtists, SourceError> = if self.fail_on.as_deref() == Some(playlist_id) {
            Err(SourceError::Fatal(format!("playlist {playlist_id} is unavailable")))
        } else {
            Ok(catalog_playlist(playlist_id)
                .unwrap_or_default()
                .iter()
                .filter_map(|id| catalog_artist(id))
                .map(|(_, name, genres, popularity)| ArtistProfile {
                    name: name.to_string(),
                    genres: genres.iter().map(|g| g.to_string()).collect(),
                    popularity,
                })
                .collect())
        };
        std::future::ready(result)
    }
}

#[derive(Clone)]
struct CatalogState {
    base_url: String,
    track_requests: Arc<AtomicUsize>,
    cocteau_requests: Arc<AtomicUsize>,
}

/// A local stand-in for the Spotify Web API.
///
/// Playlist tracks come one per page. The first page also carries a
/// removed track and a local file without an artist id. `broken` always
/// answers 500, and the first lookup of Cocteau Twins is rate limited.
pub struct MockCatalog {
    pub base_url: String,
    track_requests: Arc<AtomicUsize>,
}

impl MockCatalog {
    pub fn track_requests(&self) -> usize {
        self.track_requests.load(Ordering::SeqCst)
    }
}

pub async fn spawn_mock_catalog() -> MockCatalog {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let state = CatalogState {
        base_url: base_url.clone(),
        track_requests: Arc::new(AtomicUsize::new(0)),
        cocteau_requests: Arc::new(AtomicUsize::new(0)),
    };
    let track_requests = state.track_requests.clone();

    let app = Router::new()
        .route("/playlists/:id/tracks", get(playlist_tracks))
        .route("/artists/:id", get(artist))
        .route("/browse/categories", get(categories))
        .route("/browse/categories/:id/playlists", get(category_playlists))
        .with_state(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockCatalog {
        base_url,
        track_requests,
    }
}

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default)]
    offset: usize,
}

async fn playlist_tracks(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Response {
    state.track_requests.fetch_add(1, Ordering::SeqCst);
    if id == "broken" {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let Some(tracks) = catalog_tracks(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let mut items = Vec::new();
    if page.offset == 0 {
        items.push(json!({"track": null}));
        items.push(json!({"track": {"artists": [{"id": null, "name": "Local Recording"}]}}));
    }
    if let Some((artist_id, name)) = tracks.get(page.offset) {
        items.push(json!({"track": {"artists": [{"id": artist_id, "name": name}]}}));
    }
    let next = (page.offset + 1 < tracks.len()).then(|| {
        format!(
            "{}/playlists/{}/tracks?offset={}",
            state.base_url,
            id,
            page.offset + 1
        )
    });

    Json(json!({"items": items, "next": next})).into_response()
}

async fn artist(State(state): State<CatalogState>, Path(id): Path<String>) -> Response {
    if id == "revoked" {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id == "cocteau" && state.cocteau_requests.fetch_add(1, Ordering::SeqCst) == 0 {
        return (StatusCode::TOO_MANY_REQUESTS, [(header::RETRY_AFTER, "0")]).into_response();
    }
    match catalog_artist(&id) {
        Some((_, name, genres, popularity)) => {
            Json(json!({"id": id, "name": name, "genres": genres, "popularity": popularity}))
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn categories() -> Json<Value> {
    Json(json!({
        "categories": {
            "items": [
                {"id": "shoegaze", "name": "Shoegaze", "icons": []},
                {"id": "dreampop", "name": "Dream Pop", "icons": []}
            ]
        }
    }))
}

async fn category_playlists(Path(id): Path<String>) -> Response {
    if id != "shoegaze" {
        return StatusCode::NOT_FOUND.into_response();
    }
    let mut items: Vec<Value> = descriptors(&["p1", "p2", "p3"]);
    items.insert(1, Value::Null);
    Json(json!({"playlists": {"items": items}})).into_response()
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(10),
    }
}

pub fn spotify_config(api_base: &str) -> SpotifyConfig {
    SpotifyConfig {
        api_base: api_base.to_string(),
        access_token: "test-token".to_string(),
        max_retries: 3,
        category_playlist_limit: 5,
        request_timeout: Duration::from_secs(5),
    }
}

pub fn spotify_client(catalog: &MockCatalog) -> SpotifyClient {
    SpotifyClient::new(&spotify_config(&catalog.base_url))
        .unwrap()
        .with_retry_policy(fast_retry())
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub catalog: MockCatalog,
    pub cache_dir: TempDir,
}

impl TestApp {
    pub fn cached_records(&self) -> usize {
        std::fs::read_dir(self.cache_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub async fn create_test_app() -> TestApp {
    let catalog = spawn_mock_catalog().await;
    let cache_dir = TempDir::new().unwrap();
    let store = GraphStore::new(GraphCache::new(cache_dir.path()), BuildConfig::default());
    let state = Arc::new(AppState::from_parts(store, spotify_client(&catalog)));

    TestApp {
        router: create_router(state.clone()),
        state,
        catalog,
        cache_dir,
    }
}

pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}
