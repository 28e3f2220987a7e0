//! End-to-end handler tests over an in-process router.
//!
//! The network is a 3-node chain plus a far-away disconnected stub, built
//! from segments exactly as the server does at startup.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use wf_core::MetricPoint;
use wf_spatial::{build_graph, RoadSegment, WeightMode};

use wf_server::api::{router, AppState};

/// Chain 0 -(100 m)- 1 -(150 m)- 2 at 60 km/h, plus an unreachable island.
fn test_state() -> AppState {
    let main_road = RoadSegment::new(vec![
        MetricPoint::new(0.0, 0.0),
        MetricPoint::new(100.0, 0.0),
        MetricPoint::new(250.0, 0.0),
    ])
    .speed_kmh(60.0);
    let island = RoadSegment::new(vec![
        MetricPoint::new(500_000.0, 0.0),
        MetricPoint::new(500_100.0, 0.0),
    ]);

    let segments = [main_road, island];
    AppState::new(
        build_graph(&segments, WeightMode::Distance),
        build_graph(&segments, WeightMode::Time),
    )
}

/// `lat,lng` query value for a metric position.
fn latlng(x: f64, y: f64) -> String {
    let geo = MetricPoint::new(x, y).to_geo();
    format!("{},{}", geo.lat, geo.lon)
}

async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router(test_state())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn index_reports_endpoints() {
    let (status, body) = get_json("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["endpoints"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn shortest_route_found() {
    let uri = format!("/route/shortest?src={}&dst={}", latlng(0.0, 0.0), latlng(250.0, 0.0));
    let (status, body) = get_json(&uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], true);
    assert_eq!(body["distance_m"], 250.0);
    assert_eq!(body["steps"], 2);
    assert_eq!(body["nodes"], 3);
    assert_eq!(body["path"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn fastest_route_reports_minutes() {
    let uri = format!("/route/fastest?src={}&dst={}", latlng(0.0, 0.0), latlng(250.0, 0.0));
    let (status, body) = get_json(&uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], true);
    // 250 m at 60 km/h = 0.25 min.
    assert_eq!(body["travel_time_min"], 0.25);
    assert_eq!(body["travel_time_formatted"], "0 min 15 sec");
}

#[tokio::test]
async fn fewest_steps_route() {
    let uri = format!(
        "/route/fewest-steps?src={}&dst={}",
        latlng(0.0, 0.0),
        latlng(250.0, 0.0)
    );
    let (status, body) = get_json(&uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["algorithm"], "BFS");
    assert_eq!(body["steps"], 2);
}

#[tokio::test]
async fn all_paths_on_a_chain_is_one_path() {
    let uri = format!("/route/all?src={}&dst={}", latlng(0.0, 0.0), latlng(250.0, 0.0));
    let (status, body) = get_json(&uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["paths"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unreachable_destination_is_found_false() {
    let uri = format!(
        "/route/shortest?src={}&dst={}",
        latlng(0.0, 0.0),
        latlng(500_000.0, 0.0)
    );
    let (status, body) = get_json(&uri).await;

    // "No route" is a normal outcome, not an HTTP error.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], false);
}

#[tokio::test]
async fn malformed_coordinates_are_rejected() {
    let (status, body) = get_json("/route/shortest?src=abc&dst=0,0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("coordinate"));
}

#[tokio::test]
async fn missing_parameters_are_rejected() {
    let response = router(test_state())
        .oneshot(
            Request::builder()
                .uri("/route/shortest?src=0,0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn out_of_range_bounds_are_rejected() {
    let base = format!("/route/all?src={}&dst={}", latlng(0.0, 0.0), latlng(250.0, 0.0));

    let (status, _) = get_json(&format!("{base}&max_paths=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(&format!("{base}&max_depth=1000")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
