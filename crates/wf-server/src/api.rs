//! HTTP API: four routing endpoints plus a service-info root.
//!
//! This is the boundary layer: it parses `lat,lng` query strings, projects
//! them into the graph's metric plane, snaps to nodes, runs the requested
//! algorithm, and converts the resulting node ids back to geographic
//! coordinates.  "No route" is a normal `found: false` response; only
//! malformed input (400) and an empty graph (503) are rejections.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use wf_core::{GeoPoint, NodeId};
use wf_spatial::{all_paths, fewest_steps, shortest_path, PathLimits, RoadGraph};

// ── Bounds on /route/all parameters ───────────────────────────────────────────

const DEFAULT_MAX_PATHS: usize = 10;
const DEFAULT_MAX_DEPTH: usize = 40;
const MAX_PATHS_CAP: usize = 50;
const MAX_DEPTH_CAP: usize = 100;

// ── State ─────────────────────────────────────────────────────────────────────

/// Shared immutable state: the two graph instances, one per weight mode.
#[derive(Clone)]
pub struct AppState {
    pub graph_distance: Arc<RoadGraph>,
    pub graph_time: Arc<RoadGraph>,
}

impl AppState {
    pub fn new(graph_distance: RoadGraph, graph_time: RoadGraph) -> Self {
        Self {
            graph_distance: Arc::new(graph_distance),
            graph_time: Arc::new(graph_time),
        }
    }
}

/// Assemble the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/route/shortest", get(route_shortest))
        .route("/route/fastest", get(route_fastest))
        .route("/route/fewest-steps", get(route_fewest_steps))
        .route("/route/all", get(route_all))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Rejections ────────────────────────────────────────────────────────────────

enum ApiError {
    BadRequest(String),
    GraphUnavailable,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::GraphUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "road graph is empty".to_string())
            }
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

// ── Requests ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct EndpointsQuery {
    src: String,
    dst: String,
}

#[derive(Deserialize)]
struct AllPathsQuery {
    src: String,
    dst: String,
    max_paths: Option<usize>,
    max_depth: Option<usize>,
}

/// Parse a `lat,lng` pair into a rejection on failure.
fn parse_latlng(raw: &str) -> Result<GeoPoint, ApiError> {
    raw.parse()
        .map_err(|e: wf_core::CoreError| ApiError::BadRequest(e.to_string()))
}

/// Validate a `/route/all` bound against its cap.
fn check_bound(value: usize, cap: usize, name: &str) -> Result<usize, ApiError> {
    if (1..=cap).contains(&value) {
        Ok(value)
    } else {
        Err(ApiError::BadRequest(format!("{name} must be between 1 and {cap}")))
    }
}

/// Snap a geographic coordinate to the nearest graph node.
fn snap(graph: &RoadGraph, point: GeoPoint) -> Result<NodeId, ApiError> {
    graph
        .snap_to_node(point.to_metric())
        .ok_or(ApiError::GraphUnavailable)
}

// ── Responses ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct IndexResponse {
    name: &'static str,
    status: &'static str,
    endpoints: [&'static str; 4],
}

#[derive(Serialize)]
struct NotFoundResponse {
    algorithm: &'static str,
    found: bool,
    message: &'static str,
}

#[derive(Serialize)]
struct ShortestResponse {
    algorithm: &'static str,
    found: bool,
    path: Vec<[f64; 2]>,
    distance_m: f64,
    distance_km: f64,
    steps: usize,
    nodes: usize,
}

#[derive(Serialize)]
struct FastestResponse {
    algorithm: &'static str,
    found: bool,
    path: Vec<[f64; 2]>,
    travel_time_min: f64,
    travel_time_formatted: String,
    steps: usize,
    nodes: usize,
}

#[derive(Serialize)]
struct FewestStepsResponse {
    algorithm: &'static str,
    found: bool,
    path: Vec<[f64; 2]>,
    steps: usize,
    nodes: usize,
}

#[derive(Serialize)]
struct AllPathsResponse {
    algorithm: &'static str,
    found: bool,
    paths: Vec<Vec<[f64; 2]>>,
    count: usize,
}

/// Convert a node path back to `[lat, lng]` pairs.
fn path_coords(graph: &RoadGraph, nodes: &[NodeId]) -> Vec<[f64; 2]> {
    nodes
        .iter()
        .map(|&n| {
            let geo = graph.position(n).to_geo();
            [geo.lat, geo.lon]
        })
        .collect()
}

fn not_found(algorithm: &'static str, message: &'static str) -> Response {
    Json(NotFoundResponse { algorithm, found: false, message }).into_response()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        name: "wayfinder route service",
        status: "running",
        endpoints: [
            "/route/shortest (Dijkstra - distance)",
            "/route/fastest (Dijkstra - travel time)",
            "/route/fewest-steps (BFS)",
            "/route/all (DFS)",
        ],
    })
}

async fn route_shortest(
    State(state): State<AppState>,
    Query(query): Query<EndpointsQuery>,
) -> Result<Response, ApiError> {
    let graph = &state.graph_distance;
    let start = snap(graph, parse_latlng(&query.src)?)?;
    let goal = snap(graph, parse_latlng(&query.dst)?)?;

    let route = shortest_path(graph, start, goal);
    if !route.found() {
        return Ok(not_found("Dijkstra (Shortest)", "No path found between these points."));
    }

    Ok(Json(ShortestResponse {
        algorithm: "Dijkstra (Shortest)",
        found: true,
        path: path_coords(graph, &route.nodes),
        distance_m: round2(route.cost),
        distance_km: round2(route.cost / 1000.0),
        steps: route.steps(),
        nodes: route.nodes.len(),
    })
    .into_response())
}

async fn route_fastest(
    State(state): State<AppState>,
    Query(query): Query<EndpointsQuery>,
) -> Result<Response, ApiError> {
    let graph = &state.graph_time;
    let start = snap(graph, parse_latlng(&query.src)?)?;
    let goal = snap(graph, parse_latlng(&query.dst)?)?;

    let route = shortest_path(graph, start, goal);
    if !route.found() {
        return Ok(not_found("Dijkstra (Fastest)", "No path found between these points."));
    }

    let minutes = route.cost;
    Ok(Json(FastestResponse {
        algorithm: "Dijkstra (Fastest)",
        found: true,
        path: path_coords(graph, &route.nodes),
        travel_time_min: round2(minutes),
        travel_time_formatted: format!(
            "{} min {} sec",
            minutes as u64,
            (minutes.fract() * 60.0) as u64
        ),
        steps: route.steps(),
        nodes: route.nodes.len(),
    })
    .into_response())
}

async fn route_fewest_steps(
    State(state): State<AppState>,
    Query(query): Query<EndpointsQuery>,
) -> Result<Response, ApiError> {
    let graph = &state.graph_distance;
    let start = snap(graph, parse_latlng(&query.src)?)?;
    let goal = snap(graph, parse_latlng(&query.dst)?)?;

    let path = fewest_steps(graph, start, goal);
    if path.is_empty() {
        return Ok(not_found("BFS", "No path found between these points."));
    }

    Ok(Json(FewestStepsResponse {
        algorithm: "BFS",
        found: true,
        steps: path.len() - 1,
        nodes: path.len(),
        path: path_coords(graph, &path),
    })
    .into_response())
}

async fn route_all(
    State(state): State<AppState>,
    Query(query): Query<AllPathsQuery>,
) -> Result<Response, ApiError> {
    let graph = &state.graph_distance;
    let start = snap(graph, parse_latlng(&query.src)?)?;
    let goal = snap(graph, parse_latlng(&query.dst)?)?;

    let limits = PathLimits {
        max_paths: check_bound(
            query.max_paths.unwrap_or(DEFAULT_MAX_PATHS),
            MAX_PATHS_CAP,
            "max_paths",
        )?,
        max_depth: check_bound(
            query.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            MAX_DEPTH_CAP,
            "max_depth",
        )?,
    };

    let paths = all_paths(graph, start, goal, limits);
    if paths.is_empty() {
        return Ok(not_found("DFS", "No paths found between these points."));
    }

    Ok(Json(AllPathsResponse {
        algorithm: "DFS",
        found: true,
        count: paths.len(),
        paths: paths.iter().map(|p| path_coords(graph, p)).collect(),
    })
    .into_response())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
