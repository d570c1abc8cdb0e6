use crate::error::ApiError;
use crate::models::{
    ArtistResponse, BuildGraphRequest, BuildGraphResponse, CategoriesResponse,
    ConnectionsResponse, ExtendedConnectionsResponse, HealthResponse, InfluenceResponse,
    PathQuery, PathResponse, PopularQuery, PopularResponse, SearchQuery, SearchResponse,
    SearchStats, SharedPlaylistsResponse, StatsResponse,
};
use crate::state::AppState;
use crate::store::BuildOutcome;
use artistgraph_core::LinkGraph;
use artistgraph_core::search::search_artists as search_graph;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

type ApiResult<T> = Result<Json<T>, ApiError>;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Artistgraph API is running".to_string(),
    })
}

pub async fn build_graph(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BuildGraphRequest>,
) -> ApiResult<BuildGraphResponse> {
    build_and_export(&state, &request.playlists).await
}

pub async fn list_categories(State(state): State<Arc<AppState>>) -> ApiResult<CategoriesResponse> {
    let categories = state.spotify.categories().await?;
    Ok(Json(CategoriesResponse { categories }))
}

pub async fn build_category_graph(
    State(state): State<Arc<AppState>>,
    Path(category_id): Path<String>,
) -> ApiResult<BuildGraphResponse> {
    let playlists = state.spotify.category_playlists(&category_id).await?;
    info!("Category {category_id}: {} playlists", playlists.len());
    build_and_export(&state, &playlists).await
}

async fn build_and_export(state: &AppState, playlists: &[Value]) -> ApiResult<BuildGraphResponse> {
    let BuildOutcome {
        graph_id,
        cache_hit,
        snapshot,
    } = state.store.build(playlists, &state.spotify).await?;

    Ok(Json(BuildGraphResponse {
        graph_id,
        cache_hit,
        graph: LinkGraph::from(&snapshot.graph),
    }))
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let snapshot = state.store.current().await;
    Json(StatsResponse {
        graph_id: snapshot.graph_id.clone(),
        total_artists: snapshot.graph.node_count(),
        total_connections: snapshot.graph.edge_count(),
    })
}

pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let query = params.q.trim();
    let snapshot = state.store.current().await;
    let results = search_graph(&snapshot.graph, query, params.limit);
    let count = results.len();

    Json(SearchResponse {
        query: query.to_string(),
        results,
        count,
    })
}

pub async fn get_artist(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<ArtistResponse> {
    let snapshot = state.store.current().await;
    let overview = snapshot
        .metrics_engine()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .artist_overview(&name)
        .ok_or_else(|| ApiError::NotFound(format!("artist {name:?} is not in the graph")))?;
    Ok(Json(ArtistResponse { overview }))
}

pub async fn get_connections(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Json<ConnectionsResponse> {
    let snapshot = state.store.current().await;
    let connections = snapshot.engine().connections_with_genres(&name);
    Json(ConnectionsResponse {
        artist: name,
        connections,
    })
}

pub async fn get_extended_connections(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Json<ExtendedConnectionsResponse> {
    let snapshot = state.store.current().await;
    let connections = snapshot.engine().extended_connections(&name);
    Json(ExtendedConnectionsResponse {
        artist: name,
        connections,
    })
}

pub async fn get_influence(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<InfluenceResponse> {
    let snapshot = state.store.current().await;
    let influence = snapshot
        .metrics_engine()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .influence(&name);
    Ok(Json(InfluenceResponse {
        artist: name,
        influence,
    }))
}

pub async fn get_shared_playlists(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Json<SharedPlaylistsResponse> {
    let snapshot = state.store.current().await;
    let shared_playlists = snapshot.engine().shared_playlists(&name);
    Json(SharedPlaylistsResponse {
        artist: name,
        shared_playlists,
    })
}

pub async fn find_path(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PathQuery>,
) -> ApiResult<PathResponse> {
    let snapshot = state.store.current().await;
    let search = snapshot.engine().shortest_path(&params.from, &params.to);

    let path = search.path.ok_or_else(|| {
        ApiError::NotFound(format!(
            "no path between {:?} and {:?}",
            params.from, params.to
        ))
    })?;

    let artist_count = path.len();
    Ok(Json(PathResponse {
        path,
        artist_count,
        step_count: artist_count.saturating_sub(1),
        search_stats: SearchStats {
            artists_visited: search.artists_visited,
            duration_ms: search.duration_ms,
        },
    }))
}

pub async fn recommend_popular(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PopularQuery>,
) -> Json<PopularResponse> {
    let snapshot = state.store.current().await;
    Json(PopularResponse {
        artists: snapshot.engine().popular_artists(params.top_n),
    })
}
