mod fixtures;

use axum::http::StatusCode;
use fixtures::{create_test_app, descriptors, get_json, post_json};
use serde_json::{Value, json};

fn sorted_names(value: &Value) -> Vec<String> {
    let mut names: Vec<String> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|name| name.as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}

async fn build_shoegaze_graph(app: &fixtures::TestApp) -> Value {
    let (status, body) = post_json(
        &app.router,
        "/api/graphs",
        json!({"playlists": descriptors(&["p1", "p2", "p3"])}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

#[tokio::test]
async fn health_check_responds() {
    let app = create_test_app().await;
    let (status, body) = get_json(&app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn build_returns_node_link_graph() {
    let app = create_test_app().await;
    let body = build_shoegaze_graph(&app).await;

    let graph_id = body["graph_id"].as_str().unwrap();
    assert_eq!(graph_id.len(), 64);
    assert_eq!(body["cache_hit"], false);
    assert_eq!(body["graph"]["directed"], false);
    assert_eq!(body["graph"]["multigraph"], false);
    assert_eq!(body["graph"]["nodes"].as_array().unwrap().len(), 3);

    let links = body["graph"]["links"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert!(links.iter().all(|link| link["weight"] == 2));

    let slowdive = body["graph"]["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|node| node["id"] == "Slowdive")
        .unwrap();
    assert_eq!(slowdive["genres"], json!(["shoegaze", "dream pop"]));
    assert_eq!(slowdive["popularity"], 61);

    let (_, stats) = get_json(&app.router, "/api/stats").await;
    assert_eq!(stats["graph_id"], graph_id);
    assert_eq!(stats["total_artists"], 3);
    assert_eq!(stats["total_connections"], 2);
    assert_eq!(app.cached_records(), 1);
}

#[tokio::test]
async fn identical_batch_is_served_from_cache() {
    let app = create_test_app().await;
    let first = build_shoegaze_graph(&app).await;
    let requests_after_first = app.catalog.track_requests();
    assert!(requests_after_first >= 3);

    let second = build_shoegaze_graph(&app).await;

    assert_eq!(second["cache_hit"], true);
    assert_eq!(second["graph_id"], first["graph_id"]);
    assert_eq!(second["graph"], first["graph"]);
    assert_eq!(app.catalog.track_requests(), requests_after_first);
}

#[tokio::test]
async fn malformed_descriptor_is_a_bad_request() {
    let app = create_test_app().await;
    let (status, body) = post_json(
        &app.router,
        "/api/graphs",
        json!({"playlists": [{"id": "p1"}, {"name": "no id"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("#1"));
    assert_eq!(app.catalog.track_requests(), 0);
}

#[tokio::test]
async fn failed_build_is_not_cached_and_keeps_current_graph() {
    let app = create_test_app().await;
    let built = build_shoegaze_graph(&app).await;

    let (status, body) = post_json(
        &app.router,
        "/api/graphs",
        json!({"playlists": descriptors(&["p1", "broken"])}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());
    assert_eq!(app.cached_records(), 1);

    let (_, stats) = get_json(&app.router, "/api/stats").await;
    assert_eq!(stats["graph_id"], built["graph_id"]);
}

#[tokio::test]
async fn artist_overview_and_not_found() {
    let app = create_test_app().await;
    build_shoegaze_graph(&app).await;

    let (status, body) = get_json(&app.router, "/api/artists/Slowdive").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"]["name"], "Slowdive");
    assert_eq!(body["details"]["genres"], json!(["shoegaze", "dream pop"]));
    assert_eq!(sorted_names(&body["connections"]), vec!["Lush", "Ride"]);
    assert_eq!(
        sorted_names(&body["details"]["playlists"]),
        vec!["p1", "p2", "p3"]
    );
    assert_eq!(body["influence"]["degree_centrality"], 1.0);
    assert_eq!(body["influence"]["betweenness_centrality"], 1.0);

    let (status, body) = get_json(&app.router, "/api/artists/Nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Nobody"));
}

#[tokio::test]
async fn unknown_artists_are_isolated_not_errors() {
    let app = create_test_app().await;
    build_shoegaze_graph(&app).await;

    let (status, body) = get_json(&app.router, "/api/artists/Nobody/connections").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connections"], json!([]));

    let (status, body) = get_json(&app.router, "/api/artists/Nobody/influence").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["degree_centrality"], 0.0);
    assert_eq!(body["betweenness_centrality"], 0.0);

    let (status, body) = get_json(&app.router, "/api/artists/Nobody/shared-playlists").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shared_playlists"], json!({}));
}

#[tokio::test]
async fn neighbour_queries() {
    let app = create_test_app().await;
    build_shoegaze_graph(&app).await;

    let (_, body) = get_json(&app.router, "/api/artists/Ride/connections").await;
    assert_eq!(body["connections"], json!(["Slowdive"]));
    assert_eq!(body["genres"]["Slowdive"], json!(["shoegaze", "dream pop"]));

    let (_, body) = get_json(&app.router, "/api/artists/Ride/extended-connections").await;
    assert_eq!(body["first_degree"], json!(["Slowdive"]));
    assert_eq!(sorted_names(&body["extended"]["Slowdive"]), vec!["Lush", "Ride"]);

    let (_, body) = get_json(&app.router, "/api/artists/Slowdive/shared-playlists").await;
    assert_eq!(
        body["shared_playlists"],
        json!({"Lush": ["p1", "p3"], "Ride": ["p1", "p2"]})
    );
}

#[tokio::test]
async fn path_goes_through_the_hub() {
    let app = create_test_app().await;
    build_shoegaze_graph(&app).await;

    let (status, body) = get_json(&app.router, "/api/path?from=Ride&to=Lush").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], json!(["Ride", "Slowdive", "Lush"]));
    assert_eq!(body["artist_count"], 3);
    assert_eq!(body["step_count"], 2);

    let (status, _) = get_json(&app.router, "/api/path?from=Ride&to=Nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn isolated_artist_has_no_path() {
    let app = create_test_app().await;
    let (status, body) = post_json(
        &app.router,
        "/api/graphs",
        json!({"playlists": descriptors(&["p1", "p2", "p3", "p4"])}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = get_json(&app.router, "/api/artists/Cocteau%20Twins").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connections"], json!([]));

    let (status, _) = get_json(&app.router, "/api/path?from=Slowdive&to=Cocteau%20Twins").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn popular_artists_are_ranked_by_connection_strength() {
    let app = create_test_app().await;
    build_shoegaze_graph(&app).await;

    let (_, body) = get_json(&app.router, "/api/recommend/popular").await;
    assert_eq!(
        body["artists"],
        json!([
            {"name": "Slowdive", "total_weight": 4},
            {"name": "Lush", "total_weight": 2},
            {"name": "Ride", "total_weight": 2}
        ])
    );

    let (_, body) = get_json(&app.router, "/api/recommend/popular?top_n=1").await;
    assert_eq!(body["artists"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn search_matches_current_graph() {
    let app = create_test_app().await;

    let (_, body) = get_json(&app.router, "/api/artists/search?q=slow").await;
    assert_eq!(body["count"], 0);

    build_shoegaze_graph(&app).await;

    let (_, body) = get_json(&app.router, "/api/artists/search?q=SLOW").await;
    assert_eq!(body["results"], json!(["Slowdive"]));
    assert_eq!(body["count"], 1);

    let (_, body) = get_json(&app.router, "/api/artists/search?q=%20%20").await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn category_routes() {
    let app = create_test_app().await;

    let (status, body) = get_json(&app.router, "/api/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"][0], json!({"id": "shoegaze", "name": "Shoegaze"}));

    let (status, body) = post_json(&app.router, "/api/categories/shoegaze/graph", json!({})).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["cache_hit"], false);
    assert_eq!(body["graph"]["links"].as_array().unwrap().len(), 2);

    // Same descriptors posted directly resolve to the same cached graph.
    let direct = build_shoegaze_graph(&app).await;
    assert_eq!(direct["graph_id"], body["graph_id"]);
    assert_eq!(direct["cache_hit"], true);

    let (status, _) = post_json(&app.router, "/api/categories/polka/graph", json!({})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
