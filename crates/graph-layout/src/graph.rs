//! Explicit adjacency model used by the layout pipeline.
//!
//! External node identifiers are mapped to dense indices in ascending
//! order at ingestion, and all derived lists are kept sorted by dense
//! index. Every traversal walks indices in that canonical order, so the
//! pipeline is reproducible regardless of the order nodes and edges
//! arrive in.

/// Degree classification of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeClass {
    /// No incident edges.
    Isolated,
    /// Exactly one incident edge.
    Leaf,
    /// More than one incident edge.
    Hub,
}

/// A directed simple graph over dense node indices.
///
/// Duplicate edges are collapsed at construction. A self loop shows up
/// once in both the predecessor and the successor list of its node.
#[derive(Debug, Clone)]
pub(crate) struct DenseGraph<N> {
    /// External identifiers, ascending. The dense index of a node is
    /// its position in this list.
    pub ids: Vec<N>,
    /// Predecessor indices per node, sorted and deduplicated.
    pub preds: Vec<Vec<usize>>,
    /// Successor indices per node, sorted and deduplicated.
    pub succs: Vec<Vec<usize>>,
}

impl<N: Copy + Ord> DenseGraph<N> {
    pub fn new(nodes: &[N], edges: &[(N, N)]) -> Self {
        let mut ids: Vec<N> = nodes.to_vec();
        ids.extend(edges.iter().flat_map(|&(tail, head)| [tail, head]));
        ids.sort_unstable();
        ids.dedup();

        let mut preds = vec![Vec::new(); ids.len()];
        let mut succs = vec![Vec::new(); ids.len()];
        for &(tail, head) in edges {
            let t = ids.binary_search(&tail).unwrap();
            let h = ids.binary_search(&head).unwrap();
            succs[t].push(h);
            preds[h].push(t);
        }
        for list in preds.iter_mut().chain(succs.iter_mut()) {
            list.sort_unstable();
            list.dedup();
        }

        Self { ids, preds, succs }
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn degree(&self, node: usize) -> usize {
        self.preds[node].len() + self.succs[node].len()
    }

    /// Split the graph into its weakly connected components, each with
    /// its own dense index space. Components come out ordered by their
    /// smallest node identifier.
    pub fn weakly_connected_components(&self) -> Vec<DenseGraph<N>> {
        let mut components = Vec::new();
        let mut visited = vec![false; self.node_count()];

        for start in 0..self.node_count() {
            if visited[start] {
                continue;
            }
            let mut members = vec![start];
            let mut queue = vec![start];
            visited[start] = true;
            while let Some(cur) = queue.pop() {
                for &neighbor in self.preds[cur].iter().chain(self.succs[cur].iter()) {
                    if !visited[neighbor] {
                        visited[neighbor] = true;
                        members.push(neighbor);
                        queue.push(neighbor);
                    }
                }
            }
            members.sort_unstable();

            // All edges of a member stay within the component, so the
            // remap below cannot fail. Sorted lists stay sorted because
            // the index mapping is monotonic.
            let local = |node: usize| members.binary_search(&node).unwrap();
            components.push(DenseGraph {
                ids: members.iter().map(|&m| self.ids[m]).collect(),
                preds: members
                    .iter()
                    .map(|&m| self.preds[m].iter().map(|&p| local(p)).collect())
                    .collect(),
                succs: members
                    .iter()
                    .map(|&m| self.succs[m].iter().map(|&s| local(s)).collect())
                    .collect(),
            });
        }

        components
    }

    /// Classify every node by total degree and split each node's
    /// neighbourhood by the neighbour's own classification.
    pub fn classify(&self) -> Classification {
        let n = self.node_count();
        let class: Vec<NodeClass> = (0..n)
            .map(|v| match self.degree(v) {
                0 => NodeClass::Isolated,
                1 => NodeClass::Leaf,
                _ => NodeClass::Hub,
            })
            .collect();

        let mut hub_neighbors = vec![Vec::new(); n];
        let mut leaf_neighbors = vec![Vec::new(); n];
        for v in 0..n {
            let mut neighbors: Vec<usize> = self.preds[v]
                .iter()
                .chain(self.succs[v].iter())
                .copied()
                .collect();
            neighbors.sort_unstable();
            neighbors.dedup();
            for neighbor in neighbors {
                if class[neighbor] == NodeClass::Hub {
                    hub_neighbors[v].push(neighbor);
                } else {
                    leaf_neighbors[v].push(neighbor);
                }
            }
        }

        Classification {
            class,
            hub_neighbors,
            leaf_neighbors,
        }
    }
}

/// Nodes split by degree, with each node's neighbours split by the
/// neighbour's own degree. Leaf neighbours are re-attached after the
/// hub arrangement settles; hub neighbours drive the gap-fill pass.
#[derive(Debug)]
pub(crate) struct Classification {
    pub class: Vec<NodeClass>,
    pub hub_neighbors: Vec<Vec<usize>>,
    #[allow(dead_code)]
    pub leaf_neighbors: Vec<Vec<usize>>,
}

impl Classification {
    pub fn is_hub(&self, node: usize) -> bool {
        self.class[node] == NodeClass::Hub
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn duplicate_edges_collapse() {
        let g = DenseGraph::new(&[], &[(1, 2), (1, 2), (2, 3)]);
        assert_eq!(g.succs[0], vec![1]);
        assert_eq!(g.preds[1], vec![0]);
        assert_eq!(g.degree(1), 2);
    }

    #[test]
    fn ids_are_canonical() {
        let g = DenseGraph::new(&[7], &[(9, 3), (3, 5)]);
        assert_eq!(g.ids, vec![3, 5, 7, 9]);
        // edge 9 -> 3 lands on dense indices 3 -> 0
        assert_eq!(g.succs[3], vec![0]);
        assert_eq!(g.preds[0], vec![3]);
    }

    #[test]
    fn self_loop_is_one_entry_on_each_side() {
        let g = DenseGraph::new(&[], &[(1, 1), (1, 1)]);
        assert_eq!(g.preds[0], vec![0]);
        assert_eq!(g.succs[0], vec![0]);
        assert_eq!(g.degree(0), 2);
    }

    #[test]
    fn two_isolated_nodes_are_two_components() {
        let g = DenseGraph::new(&[1, 2], &[]);
        assert_eq!(g.weakly_connected_components().len(), 2);
    }

    #[test]
    fn components_split_nodes_and_edges() {
        let g = DenseGraph::new(&[], &[(0, 1), (1, 2), (3, 2), (4, 5), (4, 6)]);
        let parts = g.weakly_connected_components();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].ids, vec![0, 1, 2, 3]);
        assert_eq!(parts[1].ids, vec![4, 5, 6]);
        // 4 -> 5 and 4 -> 6 in local indices
        assert_eq!(parts[1].succs[0], vec![1, 2]);
        assert_eq!(parts[1].preds[1], vec![0]);
    }

    #[test]
    fn classification_splits_by_degree() {
        // 1 -> 3, 2 -> 3, 3 -> 4: node 3 is a hub, the rest are leaves.
        let g = DenseGraph::new(&[], &[(1, 3), (2, 3), (3, 4)]);
        let class = g.classify();
        assert_eq!(
            class.class,
            vec![
                NodeClass::Leaf,
                NodeClass::Leaf,
                NodeClass::Hub,
                NodeClass::Leaf
            ]
        );
        assert_eq!(class.hub_neighbors[0], vec![2]);
        assert_eq!(class.leaf_neighbors[2], vec![0, 1, 3]);
        assert!(class.hub_neighbors[2].is_empty());
    }

    #[test]
    fn degree_zero_is_isolated() {
        let g = DenseGraph::new(&[5], &[]);
        let class = g.classify();
        assert_eq!(class.class, vec![NodeClass::Isolated]);
    }
}
