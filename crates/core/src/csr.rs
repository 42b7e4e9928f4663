use crate::graph::TransactionGraph;

/// Successor lists in Compressed Sparse Row (CSR) format, derived from the
/// adjacency matrix of a [`TransactionGraph`].
///
/// CSR stores the outgoing edges of each account contiguously:
/// - `node_pointers[u]..node_pointers[u+1]` → edges from account `u`
/// - `edge_targets[i]` → target account of edge `i`
/// - `edge_weights[i]` → number of transactions behind edge `i`
///
/// Targets within a block are in ascending id order, which fixes the
/// traversal order of both cycle finders and keeps their output
/// deterministic. Scanning a CSR block costs O(out-degree) instead of the
/// O(N) cost of a full matrix row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessorIndex {
    pub num_nodes: usize,
    pub node_pointers: Vec<usize>,
    pub edge_targets: Vec<usize>,
    pub edge_weights: Vec<u32>,
}

impl SuccessorIndex {
    /// Builds the index with the two-pass counting technique: first count
    /// the edges of every row to size the blocks, then fill them in.
    pub fn from_graph(graph: &TransactionGraph) -> Self {
        let num_nodes = graph.num_accounts();
        let mut node_pointers = vec![0; num_nodes + 1];

        for u in 0..num_nodes {
            let degree = graph.row(u).iter().filter(|&&count| count > 0).count();
            node_pointers[u + 1] = node_pointers[u] + degree;
        }

        let m = node_pointers[num_nodes];
        let mut edge_targets = Vec::with_capacity(m);
        let mut edge_weights = Vec::with_capacity(m);

        for u in 0..num_nodes {
            for (v, &count) in graph.row(u).iter().enumerate() {
                if count > 0 {
                    edge_targets.push(v);
                    edge_weights.push(count);
                }
            }
        }

        Self {
            num_nodes,
            node_pointers,
            edge_targets,
            edge_weights,
        }
    }

    /// Successors of `u` in ascending id order; empty for out-of-range ids.
    pub fn successors(&self, u: usize) -> &[usize] {
        if u >= self.num_nodes {
            return &[];
        }
        &self.edge_targets[self.node_pointers[u]..self.node_pointers[u + 1]]
    }

    /// Edge multiplicities aligned with [`successors`](Self::successors).
    pub fn weights(&self, u: usize) -> &[u32] {
        if u >= self.num_nodes {
            return &[];
        }
        &self.edge_weights[self.node_pointers[u]..self.node_pointers[u + 1]]
    }

    pub fn out_degree(&self, u: usize) -> usize {
        self.successors(u).len()
    }

    pub fn num_edges(&self) -> usize {
        self.edge_targets.len()
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.successors(u).binary_search(&v).is_ok()
    }

    pub fn average_out_degree(&self) -> f64 {
        if self.num_nodes == 0 {
            return 0.0;
        }
        self.num_edges() as f64 / self.num_nodes as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(num_nodes: usize, edges: &[(usize, usize)]) -> TransactionGraph {
        let mut graph = TransactionGraph::new(num_nodes, edges.len());
        for &(from, to) in edges {
            graph.add_transaction(from, to, 1.0, 0);
        }
        graph
    }

    #[test]
    fn builds_correct_csr_for_small_graph() {
        let graph = graph_with(3, &[(2, 1), (0, 2), (0, 1)]); // Un-sorted edges
        let csr = graph.successor_index();

        assert_eq!(csr.node_pointers, vec![0, 2, 2, 3]);
        assert_eq!(csr.edge_targets, vec![1, 2, 1]);
        assert_eq!(csr.edge_weights, vec![1, 1, 1]);
        assert_eq!(csr.num_nodes, 3);
    }

    #[test]
    fn node_with_no_outgoing_edges() {
        let graph = graph_with(3, &[(0, 2)]);
        let csr = graph.successor_index();

        assert_eq!(csr.node_pointers, vec![0, 1, 1, 1]);
        assert_eq!(csr.edge_targets, vec![2]);
        assert!(csr.successors(1).is_empty());
    }

    #[test]
    fn single_node_graph() {
        let csr = graph_with(1, &[]).successor_index();

        assert_eq!(csr.num_nodes, 1);
        assert_eq!(csr.node_pointers, vec![0, 0]);
        assert!(csr.edge_targets.is_empty());
        assert_eq!(csr.average_out_degree(), 0.0);
    }

    #[test]
    fn parallel_transactions_collapse_into_weighted_edge() {
        let graph = graph_with(2, &[(0, 1), (0, 1), (0, 1), (1, 0)]);
        let csr = graph.successor_index();

        assert_eq!(csr.num_edges(), 2);
        assert_eq!(csr.successors(0), &[1]);
        assert_eq!(csr.weights(0), &[3]);
        assert_eq!(csr.weights(1), &[1]);
    }

    #[test]
    fn multiple_edges_from_same_node() {
        let graph = graph_with(4, &[(0, 3), (0, 1), (0, 2)]);
        let csr = graph.successor_index();

        assert_eq!(csr.node_pointers, vec![0, 3, 3, 3, 3]);
        assert_eq!(csr.successors(0), &[1, 2, 3]);
        assert_eq!(csr.out_degree(0), 3);
        assert!(csr.has_edge(0, 2));
        assert!(!csr.has_edge(2, 0));
    }

    #[test]
    fn out_of_range_lookups_are_empty() {
        let csr = graph_with(2, &[(0, 1)]).successor_index();

        assert!(csr.successors(5).is_empty());
        assert!(csr.weights(5).is_empty());
        assert!(!csr.has_edge(5, 0));
    }
}
