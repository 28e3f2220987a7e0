//! `wf-spatial` — road graph construction, snapping, and pathfinding.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`segment`] | `RoadSegment` (polyline + one-way flag + speed)           |
//! | [`network`] | `RoadGraph` (CSR + R-tree), `RoadGraphBuilder`, `WeightMode` |
//! | [`routing`] | `fewest_steps` (BFS), `all_paths` (DFS), `shortest_path` (Dijkstra) |
//! | [`geojson`] | GeoJSON segment loading                                   |
//! | [`osm`]     | OSM PBF extraction (feature = `"osm"` only)               |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `osm`   | Enables OSM PBF extraction via the `osmpbf` crate.           |
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod geojson;
pub mod network;
pub mod routing;
pub mod segment;

#[cfg(feature = "osm")]
pub mod osm;


pub use error::{SpatialError, SpatialResult};
pub use geojson::{load_segments, parse_segments};
pub use network::{build_graph, DEFAULT_SPEED_KMH, RoadGraph, RoadGraphBuilder, WeightMode};
pub use routing::{all_paths, fewest_steps, shortest_path, PathLimits, Route};
pub use segment::RoadSegment;
