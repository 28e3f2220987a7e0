//! The three pathfinding algorithms: fewest hops (BFS), bounded simple-path
//! enumeration (DFS), and weighted shortest path (Dijkstra).
//!
//! All three take `&RoadGraph` plus node ids the caller obtained from
//! [`RoadGraph::snap_to_node`](crate::RoadGraph::snap_to_node) and keep every
//! bit of working state on their own stack, so any number of queries may run
//! concurrently over one shared graph.
//!
//! "No route" is a value, not an error: BFS returns an empty path, DFS an
//! empty collection, Dijkstra an empty path with infinite cost.  Ties between
//! equal-cost or equal-hop routes resolve by adjacency-list order, which is
//! deterministic for a fixed segment ordering.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use wf_core::NodeId;

use crate::network::RoadGraph;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a weighted routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Node ids from start to goal.  Empty when no route exists; a single
    /// node when start == goal.
    pub nodes: Vec<NodeId>,
    /// Total weight in the graph's unit (metres or minutes).  Zero for the
    /// trivial route, infinite when no route exists.
    pub cost: f64,
}

impl Route {
    fn not_found() -> Self {
        Self { nodes: Vec::new(), cost: f64::INFINITY }
    }

    /// `false` when the query found no route.
    pub fn found(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Number of edges traversed.
    pub fn steps(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

// ── Fewest hops (BFS) ─────────────────────────────────────────────────────────

/// Breadth-first search: the path with the minimum number of edges.
///
/// Terminates as soon as `goal` is discovered.  Returns an empty `Vec` when
/// `goal` is unreachable.
pub fn fewest_steps(graph: &RoadGraph, start: NodeId, goal: NodeId) -> Vec<NodeId> {
    if start == goal {
        return vec![start];
    }

    // prev[v] = discovery parent; INVALID marks undiscovered, the start node
    // is its own parent.
    let mut prev = vec![NodeId::INVALID; graph.node_count()];
    prev[start.index()] = start;

    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some(node) = queue.pop_front() {
        for (neighbor, _) in graph.neighbors(node) {
            if prev[neighbor.index()] != NodeId::INVALID {
                continue;
            }
            prev[neighbor.index()] = node;
            if neighbor == goal {
                return walk_back(&prev, goal);
            }
            queue.push_back(neighbor);
        }
    }

    Vec::new()
}

/// Reconstruct a path by walking parent pointers from `goal` back to the
/// node that is its own parent, then reversing.
fn walk_back(prev: &[NodeId], goal: NodeId) -> Vec<NodeId> {
    let mut path = vec![goal];
    let mut node = goal;
    while prev[node.index()] != node {
        node = prev[node.index()];
        path.push(node);
    }
    path.reverse();
    path
}

// ── Bounded enumeration (DFS) ─────────────────────────────────────────────────

/// Bounds for [`all_paths`].
#[derive(Copy, Clone, Debug)]
pub struct PathLimits {
    /// Stop after collecting this many paths.
    pub max_paths: usize,
    /// Never descend past this many edges.
    pub max_depth: usize,
}

impl Default for PathLimits {
    fn default() -> Self {
        Self { max_paths: 10, max_depth: 30 }
    }
}

/// Depth-first enumeration of simple paths from `start` to `goal`, in
/// adjacency-list order, subject to [`PathLimits`].
///
/// The visited set is local to the current path: a node blocked on one
/// branch becomes available again on sibling branches after backtracking.
/// Returns an empty collection when no path satisfies the bounds.
pub fn all_paths(
    graph: &RoadGraph,
    start: NodeId,
    goal: NodeId,
    limits: PathLimits,
) -> Vec<Vec<NodeId>> {
    let mut found = Vec::new();
    let mut visited = vec![false; graph.node_count()];
    let mut prefix = Vec::new();
    enumerate(graph, start, goal, 0, limits, &mut visited, &mut prefix, &mut found);
    found
}

#[allow(clippy::too_many_arguments)]
fn enumerate(
    graph: &RoadGraph,
    node: NodeId,
    goal: NodeId,
    depth: usize,
    limits: PathLimits,
    visited: &mut [bool],
    prefix: &mut Vec<NodeId>,
    found: &mut Vec<Vec<NodeId>>,
) {
    if found.len() >= limits.max_paths || depth > limits.max_depth {
        return;
    }

    prefix.push(node);
    visited[node.index()] = true;

    if node == goal {
        found.push(prefix.clone());
    } else {
        for (neighbor, _) in graph.neighbors(node) {
            if !visited[neighbor.index()] {
                enumerate(graph, neighbor, goal, depth + 1, limits, visited, prefix, found);
            }
        }
    }

    visited[node.index()] = false;
    prefix.pop();
}

// ── Weighted shortest path (Dijkstra) ─────────────────────────────────────────

/// Heap entry ordered as a min-heap on cost, node id as the deterministic
/// tie-break.
struct QueueEntry {
    cost: f64,
    node: NodeId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so std's max-heap pops the cheapest entry first.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra's algorithm: the minimum-weight route from `start` to `goal`.
///
/// Requires non-negative edge weights, which graph construction guarantees.
/// Exits as soon as the goal is popped from the queue rather than settling
/// the whole graph.  Unreachable goals yield an empty route with infinite
/// cost.
pub fn shortest_path(graph: &RoadGraph, start: NodeId, goal: NodeId) -> Route {
    if start == goal {
        return Route { nodes: vec![start], cost: 0.0 };
    }

    let n = graph.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev = vec![NodeId::INVALID; n];
    dist[start.index()] = 0.0;
    prev[start.index()] = start;

    let mut heap = BinaryHeap::new();
    heap.push(QueueEntry { cost: 0.0, node: start });

    while let Some(QueueEntry { cost, node }) = heap.pop() {
        if node == goal {
            return Route { nodes: walk_back(&prev, goal), cost };
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            let next_cost = cost + graph.edge_weight[edge.index()];

            if next_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = next_cost;
                prev[neighbor.index()] = node;
                heap.push(QueueEntry { cost: next_cost, node: neighbor });
            }
        }
    }

    Route::not_found()
}
