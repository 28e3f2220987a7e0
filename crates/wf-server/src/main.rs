//! wayfinder HTTP routing service.
//!
//! Loads preprocessed road geometry, builds the two graph instances
//! (distance- and time-weighted) once at startup, and serves point-to-point
//! routing queries until shut down.  The graphs are immutable after the
//! build, so request handlers share them without locking.
//!
//! Run with:
//!   cargo run -p wf-server --release -- --roads data/roads_clean.geojson

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wf_spatial::{build_graph, load_segments, WeightMode};

use wf_server::api::{self, AppState};

#[derive(Parser)]
#[command(name = "wf-server", about = "Point-to-point road routing service")]
struct Args {
    /// Path to the preprocessed roads GeoJSON (metric CRS, `is_oneway` and
    /// `speed_kmh` properties).
    #[arg(long)]
    roads: PathBuf,

    /// Bind address.
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Listen port.
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let segments = load_segments(&args.roads)
        .with_context(|| format!("loading road segments from {}", args.roads.display()))?;
    info!(segments = segments.len(), "road segments loaded");

    let t0 = Instant::now();
    let graph_distance = build_graph(&segments, WeightMode::Distance);
    let graph_time = build_graph(&segments, WeightMode::Time);
    info!(
        nodes = graph_distance.node_count(),
        edges = graph_distance.edge_count(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "both graph instances built"
    );

    let app = api::router(AppState::new(graph_distance, graph_time));

    let addr = format!("{}:{}", args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
