//! Road graph store and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Edge arrays (`edge_to`, `edge_weight`) are sorted by source node with a
//! stable sort and indexed by `EdgeId`, so within one node the edges keep
//! their insertion order.  Traversal order — and therefore tie-breaking
//! between equal-cost routes — is deterministic for a fixed segment ordering.
//!
//! # Node identity
//!
//! Segment endpoints are deduplicated on a 1 m integer grid: two positions
//! whose coordinates round to the same integer pair become the same node.
//! The node keeps the first-seen exact position as its canonical one.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps a metric `(x, y)` query to the nearest
//! `NodeId`.  Equidistant candidates resolve to the lowest id.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;
use tracing::info;

use wf_core::{EdgeId, MetricPoint, NodeId};

use crate::segment::RoadSegment;

/// Fallback speed for segments with missing or non-positive speed limits.
pub const DEFAULT_SPEED_KMH: f64 = 30.0;

// ── Weight mode ───────────────────────────────────────────────────────────────

/// How segment length is converted into edge weight during construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeightMode {
    /// Euclidean length in metres.
    Distance,
    /// Travel time in minutes at the segment's speed limit.
    Time,
}

impl WeightMode {
    /// Edge weight for a piece of road `distance_m` long.
    fn edge_weight(self, distance_m: f64, speed_kmh: f64) -> f64 {
        match self {
            WeightMode::Distance => distance_m,
            WeightMode::Time => {
                let speed = if speed_kmh > 0.0 { speed_kmh } else { DEFAULT_SPEED_KMH };
                (distance_m / 1000.0) / speed * 60.0
            }
        }
    }
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D metric point with the
/// associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Directed road graph in CSR format plus a spatial index for node snapping.
///
/// Immutable once built: construct via [`RoadGraphBuilder`] (or
/// [`build_graph`]), then share freely across threads — every query method
/// takes `&self` and mutates nothing.
///
/// The edge arrays are `pub` for direct indexed access on hot paths.
pub struct RoadGraph {
    mode: WeightMode,

    /// Canonical position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<MetricPoint>,

    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Weight of each edge, in the unit selected by the graph's
    /// [`WeightMode`] (metres or minutes).  Always non-negative and finite.
    pub edge_weight: Vec<f64>,

    spatial_idx: RTree<NodeEntry>,
}

impl RoadGraph {
    /// The weight semantics this graph was built with.
    pub fn mode(&self) -> WeightMode {
        self.mode
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Canonical position of `node`.
    #[inline]
    pub fn position(&self, node: NodeId) -> MetricPoint {
        self.node_pos[node.index()]
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node` (number of outgoing edges).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// The adjacency list of `node`: `(neighbor, weight)` pairs in stored
    /// (insertion) order.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.out_edges(node)
            .map(|e| (self.edge_to[e.index()], self.edge_weight[e.index()]))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the node nearest to `pos` by straight-line
    /// distance, ties broken by lowest id.
    ///
    /// Returns `None` only if the graph has no nodes.
    pub fn snap_to_node(&self, pos: MetricPoint) -> Option<NodeId> {
        let mut candidates = self
            .spatial_idx
            .nearest_neighbor_iter_with_distance_2(&[pos.x, pos.y]);
        let (first, best_d2) = candidates.next()?;
        let mut nearest = first.id;
        for (entry, d2) in candidates {
            if d2 > best_d2 {
                break;
            }
            nearest = nearest.min(entry.id);
        }
        Some(nearest)
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// The normal feed is [`add_segment`](Self::add_segment), which interns
/// endpoints on the deduplication grid and derives edge weights from the
/// builder's [`WeightMode`].  The lower-level
/// [`add_directed_edge`](Self::add_directed_edge) / [`add_road`](Self::add_road)
/// accept explicit weights for synthetic networks.
///
/// `build()` stable-sorts edges by source node, constructs the CSR arrays,
/// and bulk-loads the R-tree.
///
/// # Example
///
/// ```
/// use wf_core::MetricPoint;
/// use wf_spatial::{RoadGraphBuilder, RoadSegment, WeightMode};
///
/// let mut b = RoadGraphBuilder::new(WeightMode::Distance);
/// b.add_segment(&RoadSegment::new(vec![
///     MetricPoint::new(0.0, 0.0),
///     MetricPoint::new(300.0, 400.0),
/// ]));
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// assert_eq!(graph.edge_weight[0], 500.0);
/// ```
pub struct RoadGraphBuilder {
    mode: WeightMode,
    nodes: Vec<MetricPoint>,
    grid: FxHashMap<(i64, i64), NodeId>,
    raw_edges: Vec<RawEdge>,
    skipped_segments: usize,
}

struct RawEdge {
    from: NodeId,
    to: NodeId,
    weight: f64,
}

impl RoadGraphBuilder {
    pub fn new(mode: WeightMode) -> Self {
        Self {
            mode,
            nodes: Vec::new(),
            grid: FxHashMap::default(),
            raw_edges: Vec::new(),
            skipped_segments: 0,
        }
    }

    /// Pre-allocate for the expected number of nodes and edges to reduce
    /// reallocations when bulk-loading.
    pub fn with_capacity(mode: WeightMode, nodes: usize, edges: usize) -> Self {
        Self {
            mode,
            nodes: Vec::with_capacity(nodes),
            grid: FxHashMap::with_capacity_and_hasher(nodes, Default::default()),
            raw_edges: Vec::with_capacity(edges),
            skipped_segments: 0,
        }
    }

    /// Intern `pos` on the deduplication grid and return its `NodeId`.
    ///
    /// The first position seen in a grid cell becomes the node's canonical
    /// position; later positions in the same cell map to the existing id.
    pub fn add_node(&mut self, pos: MetricPoint) -> NodeId {
        *self.grid.entry(pos.grid_key()).or_insert_with(|| {
            let id = NodeId(self.nodes.len() as u32);
            self.nodes.push(pos);
            id
        })
    }

    /// Add a **directed** edge with an explicit weight.
    ///
    /// Self-loops are dropped: a segment piece that degenerates to a single
    /// node contributes nothing.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, weight: f64) {
        if from != to {
            self.raw_edges.push(RawEdge { from, to, weight });
        }
    }

    /// Convenience: add edges in **both directions** for an undirected road.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, weight: f64) {
        self.add_directed_edge(a, b, weight);
        self.add_directed_edge(b, a, weight);
    }

    /// Decompose `segment` into per-vertex-pair edges.
    ///
    /// Segments with fewer than 2 points are skipped, as are pieces whose
    /// endpoints collapse to one node or whose weight is not finite.  Bad
    /// input never fails the build.
    pub fn add_segment(&mut self, segment: &RoadSegment) {
        if segment.points.len() < 2 {
            self.skipped_segments += 1;
            return;
        }

        for pair in segment.points.windows(2) {
            let a = self.add_node(pair[0]);
            let b = self.add_node(pair[1]);
            if a == b {
                continue;
            }

            let weight = self
                .mode
                .edge_weight(pair[0].distance(pair[1]), segment.speed_kmh);
            if !weight.is_finite() {
                continue;
            }

            self.add_directed_edge(a, b, weight);
            if !segment.oneway {
                self.add_directed_edge(b, a, weight);
            }
        }
    }

    /// Look up the canonical position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> MetricPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.raw_edges.len()
    }

    /// Consume the builder and produce a [`RoadGraph`].
    ///
    /// Time complexity: O(E log E) for the edge sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build(self) -> RoadGraph {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable sort: edges of the same source node keep insertion order,
        // which fixes the traversal (and tie-break) order downstream.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_to: Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_weight: Vec<f64> = raw.iter().map(|e| e.weight).collect();

        // CSR row pointer.
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Bulk-load the R-tree for O(N log N) construction.
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry { point: [pos.x, pos.y], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        info!(
            nodes = node_count,
            edges = edge_count,
            skipped = self.skipped_segments,
            mode = ?self.mode,
            "road graph built"
        );

        RoadGraph {
            mode: self.mode,
            node_pos: self.nodes,
            node_out_start,
            edge_to,
            edge_weight,
            spatial_idx,
        }
    }
}

// ── Free functions ────────────────────────────────────────────────────────────

/// Build a [`RoadGraph`] from road segments under the given weight mode.
pub fn build_graph(segments: &[RoadSegment], mode: WeightMode) -> RoadGraph {
    let mut builder = RoadGraphBuilder::new(mode);
    for segment in segments {
        builder.add_segment(segment);
    }
    builder.build()
}
