//! Directed graphs with shortest path search and topological sorting.
//!
//! ```
//! use trellis::graph::Graph;
//!
//! let mut g = Graph::new();
//! let home = g.add_node("home");
//! let shop = g.add_node("shop");
//! let work = g.add_node("work");
//! g.add_edge(home, shop, 4);
//! g.add_edge(home, work, 10);
//! g.add_edge(shop, work, 3);
//!
//! let paths = g.dijkstra(home);
//! assert_eq!(paths.distance(work), Some(7));
//! assert_eq!(paths.path_to(work), Some(vec![home, shop, work]));
//! assert_eq!(g.topological_sort().unwrap(), [home, shop, work]);
//! ```

use std::{
    cmp::Reverse,
    collections::BinaryHeap,
    fmt,
    ops::Add,
};

/// Identifies a node in a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the index of this node, counting from 0 in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Returned by [`Graph::topological_sort`] when the graph is not acyclic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("graph contains a cycle through node {node}")]
pub struct CycleError {
    /// A node that is part of a cycle.
    pub node: NodeId,
}

/// A directed graph with node payloads of type `N` and edge weights of type `W`.
#[derive(Debug, Clone)]
pub struct Graph<N, W> {
    nodes: Vec<N>,
    edges: Vec<Vec<(NodeId, W)>>,
    edge_count: usize,
}

impl<N, W> Graph<N, W> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            edge_count: 0,
        }
    }

    pub fn add_node(&mut self, payload: N) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(payload);
        self.edges.push(Vec::new());
        id
    }

    /// Adds a directed edge from `from` to `to`.
    ///
    /// Parallel edges and self-loops are allowed.
    ///
    /// # Panics
    ///
    /// Panics if either node does not belong to this graph.
    #[track_caller]
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: W) {
        assert!(
            from.0 < self.nodes.len() && to.0 < self.nodes.len(),
            "edge {from} -> {to} refers to a node that is not in the graph (node count: {})",
            self.nodes.len()
        );
        self.edges[from.0].push((to, weight));
        self.edge_count += 1;
    }

    pub fn node(&self, id: NodeId) -> Option<&N> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(id.0)
    }

    /// Returns an iterator over the outgoing edges of `id` and their weights.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &W)> + '_ {
        self.edges
            .get(id.0)
            .into_iter()
            .flatten()
            .map(|(to, w)| (*to, w))
    }

    /// Returns an iterator over all node IDs, in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Orders the nodes so that every edge points from an earlier to a later node.
    ///
    /// When several nodes could come next, the one added first is picked, so the result is
    /// deterministic.
    pub fn topological_sort(&self) -> Result<Vec<NodeId>, CycleError> {
        let mut in_degree = vec![0usize; self.nodes.len()];
        for (to, _) in self.edges.iter().flatten() {
            in_degree[to.0] += 1;
        }

        let mut ready = self
            .node_ids()
            .filter(|id| in_degree[id.0] == 0)
            .map(Reverse)
            .collect::<BinaryHeap<_>>();
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(Reverse(id)) = ready.pop() {
            order.push(id);
            for (to, _) in &self.edges[id.0] {
                in_degree[to.0] -= 1;
                if in_degree[to.0] == 0 {
                    ready.push(Reverse(*to));
                }
            }
        }

        if order.len() == self.nodes.len() {
            Ok(order)
        } else {
            Err(CycleError {
                node: self.find_cycle(&in_degree),
            })
        }
    }

    /// Finds a node on a cycle, given the in-degrees left over by an incomplete topological sort.
    fn find_cycle(&self, in_degree: &[usize]) -> NodeId {
        // Every node with a remaining in-degree has a predecessor that also has one. Walking
        // backwards along those must eventually revisit a node, which then lies on a cycle.
        let mut pred = vec![None; self.nodes.len()];
        for from in self.node_ids().filter(|id| in_degree[id.0] > 0) {
            for (to, _) in &self.edges[from.0] {
                pred[to.0].get_or_insert(from);
            }
        }

        let mut visited = vec![false; self.nodes.len()];
        let mut cur = in_degree.iter().position(|&d| d > 0).unwrap_or(0);
        while !visited[cur] {
            visited[cur] = true;
            match pred[cur] {
                Some(NodeId(p)) => cur = p,
                None => break,
            }
        }
        NodeId(cur)
    }
}

impl<N, W> Graph<N, W>
where
    W: Copy + Ord + Add<Output = W> + Default,
{
    /// Computes the shortest paths from `start` to every reachable node.
    ///
    /// Edge weights must not be negative. `W::default()` is used as the zero distance. For
    /// floating-point weights, use [`TotalF32`][crate::num::TotalF32] or
    /// [`TotalF64`][crate::num::TotalF64].
    pub fn dijkstra(&self, start: NodeId) -> ShortestPaths<W> {
        let mut paths = ShortestPaths {
            start,
            distances: vec![None; self.nodes.len()],
            previous: vec![None; self.nodes.len()],
        };
        if start.0 >= self.nodes.len() {
            return paths;
        }

        let mut queue = BinaryHeap::new();
        paths.distances[start.0] = Some(W::default());
        queue.push(Reverse((W::default(), start)));

        while let Some(Reverse((dist, node))) = queue.pop() {
            if paths.distances[node.0].map_or(false, |best| dist > best) {
                // Stale entry: a shorter path was found after this one was queued.
                continue;
            }

            for (to, &weight) in self.neighbors(node) {
                let candidate = dist + weight;
                if paths.distances[to.0].map_or(true, |best| candidate < best) {
                    paths.distances[to.0] = Some(candidate);
                    paths.previous[to.0] = Some(node);
                    queue.push(Reverse((candidate, to)));
                }
            }
        }

        log::trace!(
            "dijkstra from {start}: {} of {} nodes reachable",
            paths.distances.iter().flatten().count(),
            self.nodes.len()
        );
        paths
    }
}

impl<N, W> Default for Graph<N, W> {
    fn default() -> Self {
        Self::new()
    }
}

/// The result of [`Graph::dijkstra`].
#[derive(Debug, Clone)]
pub struct ShortestPaths<W> {
    start: NodeId,
    distances: Vec<Option<W>>,
    previous: Vec<Option<NodeId>>,
}

impl<W: Copy> ShortestPaths<W> {
    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Returns the length of the shortest path to `node`, or `None` if it is unreachable.
    pub fn distance(&self, node: NodeId) -> Option<W> {
        self.distances.get(node.0).copied().flatten()
    }

    /// Returns the nodes on the shortest path from the start node to `node`, including both.
    pub fn path_to(&self, node: NodeId) -> Option<Vec<NodeId>> {
        self.distance(node)?;

        let mut path = vec![node];
        let mut cur = node;
        while let Some(prev) = self.previous[cur.0] {
            path.push(prev);
            cur = prev;
        }
        path.reverse();
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use crate::num::TotalF32;

    use super::*;

    fn chain(n: usize) -> (Graph<usize, u32>, Vec<NodeId>) {
        let mut g = Graph::new();
        let ids = (0..n).map(|i| g.add_node(i)).collect::<Vec<_>>();
        for w in ids.windows(2) {
            g.add_edge(w[0], w[1], 1);
        }
        (g, ids)
    }

    #[test]
    fn basics() {
        let (mut g, ids) = chain(3);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.node(ids[2]), Some(&2));
        *g.node_mut(ids[2]).unwrap() = 20;
        assert_eq!(g.node(ids[2]), Some(&20));
        assert_eq!(g.neighbors(ids[0]).collect::<Vec<_>>(), [(ids[1], &1)]);
        assert_eq!(g.neighbors(ids[2]).count(), 0);
        assert_eq!(g.node(NodeId(7)), None);
        assert_eq!(ids[1].to_string(), "#1");
    }

    #[test]
    #[should_panic(expected = "not in the graph")]
    fn foreign_node() {
        let (mut g, _) = chain(2);
        g.add_edge(NodeId(0), NodeId(2), 1);
    }

    #[test]
    fn shortest_paths() {
        let mut g = Graph::new();
        let [a, b, c, d, e] = ["a", "b", "c", "d", "e"].map(|n| g.add_node(n));
        g.add_edge(a, b, 7);
        g.add_edge(a, c, 9);
        g.add_edge(a, d, 14);
        g.add_edge(b, c, 10);
        g.add_edge(c, d, 2);
        g.add_edge(d, a, 1);
        g.add_edge(e, a, 1);

        let paths = g.dijkstra(a);
        assert_eq!(paths.start(), a);
        assert_eq!(paths.distance(a), Some(0));
        assert_eq!(paths.distance(b), Some(7));
        assert_eq!(paths.distance(d), Some(11));
        assert_eq!(paths.path_to(d), Some(vec![a, c, d]));
        assert_eq!(paths.path_to(a), Some(vec![a]));
        assert_eq!(paths.distance(e), None);
        assert_eq!(paths.path_to(e), None);
    }

    #[test]
    fn float_weights() {
        let mut g = Graph::new();
        let [a, b, c] = [(); 3].map(|_| g.add_node(()));
        g.add_edge(a, b, TotalF32(0.5));
        g.add_edge(b, c, TotalF32(0.25));
        g.add_edge(a, c, TotalF32(1.0));

        let paths = g.dijkstra(a);
        assert_eq!(paths.distance(c), Some(TotalF32(0.75)));
        assert_eq!(paths.path_to(c), Some(vec![a, b, c]));
    }

    #[test]
    fn topological_order() {
        let mut g = Graph::<&str, ()>::new();
        let [shirt, tie, jacket, belt, pants, shoes] =
            ["shirt", "tie", "jacket", "belt", "pants", "shoes"].map(|n| g.add_node(n));
        g.add_edge(shirt, tie, ());
        g.add_edge(tie, jacket, ());
        g.add_edge(shirt, belt, ());
        g.add_edge(belt, jacket, ());
        g.add_edge(pants, belt, ());
        g.add_edge(pants, shoes, ());

        let order = g.topological_sort().unwrap();
        assert_eq!(order, [shirt, tie, pants, belt, jacket, shoes]);
        assert_eq!(Graph::<(), ()>::new().topological_sort(), Ok(vec![]));
    }

    #[test]
    fn cycles() {
        let (mut g, ids) = chain(5);
        g.add_edge(ids[3], ids[1], 1);
        let err = g.topological_sort().unwrap_err();
        assert!(ids[1..4].contains(&err.node), "{err}");

        let mut g = Graph::new();
        let a = g.add_node(());
        let b = g.add_node(());
        g.add_edge(a, b, ());
        g.add_edge(b, b, ());
        assert_eq!(g.topological_sort(), Err(CycleError { node: b }));
        assert_eq!(
            CycleError { node: b }.to_string(),
            "graph contains a cycle through node #1"
        );
    }
}
