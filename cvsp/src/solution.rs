use hashbrown::{HashMap, HashSet};

use sepgraph::{NodeId, SepGraph};

/// Normalized result of a solve. The fixed-K formulations return the full
/// partition, the cover formulations only the separator itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Solution {
    Partition {
        separator: Vec<NodeId>,
        shores: Vec<Vec<NodeId>>,
    },
    Separator(Vec<NodeId>),
}

impl Solution {
    pub fn separator(&self) -> &[NodeId] {
        match self {
            Solution::Partition { separator, .. } => separator,
            Solution::Separator(separator) => separator,
        }
    }

    /// Number of separated nodes.
    pub fn cost(&self) -> usize {
        self.separator().len()
    }

    /// Checks the solution invariants against its graph: a partition must
    /// cover every node exactly once with shores within capacity and no edge
    /// across two shores; a bare separator must leave only components within
    /// capacity behind.
    pub fn validate(&self, graph: &SepGraph, capacity: u32) -> Result<(), String> {
        match self {
            Solution::Partition { separator, shores } => {
                let mut seen: HashSet<NodeId> = HashSet::new();
                for node in separator.iter().chain(shores.iter().flatten()) {
                    if !seen.insert(*node) {
                        return Err(format!("node {} assigned twice", graph.label(*node)));
                    }
                }
                if seen.len() != graph.node_count() {
                    return Err(format!(
                        "partition covers {} of {} nodes",
                        seen.len(),
                        graph.node_count()
                    ));
                }

                for shore in shores {
                    if shore.len() > capacity as usize {
                        return Err(format!(
                            "shore of {} nodes exceeds capacity {}",
                            shore.len(),
                            capacity
                        ));
                    }
                }

                let mut shore_of: HashMap<NodeId, usize> = HashMap::new();
                for (index, shore) in shores.iter().enumerate() {
                    for node in shore {
                        shore_of.insert(*node, index);
                    }
                }
                for (u, v) in graph.edges() {
                    if let (Some(i), Some(j)) = (shore_of.get(u), shore_of.get(v)) {
                        if i != j {
                            return Err(format!(
                                "edge ({}, {}) crosses shores",
                                graph.label(*u),
                                graph.label(*v)
                            ));
                        }
                    }
                }
                Ok(())
            }
            Solution::Separator(separator) => {
                let removed: HashSet<NodeId> = separator.iter().copied().collect();
                let keep: Vec<NodeId> = graph.nodes().filter(|v| !removed.contains(v)).collect();
                for component in graph.induced_components(&keep) {
                    if component.len() > capacity as usize {
                        return Err(format!(
                            "remaining component of {} nodes exceeds capacity {}",
                            component.len(),
                            capacity
                        ));
                    }
                }
                Ok(())
            }
        }
    }

    /// Labelled rendering for the CLI and the solution export file.
    pub fn to_display(&self, graph: &SepGraph) -> String {
        fn labels<'a>(graph: &'a SepGraph, nodes: &[NodeId]) -> Vec<&'a str> {
            nodes.iter().map(|v| graph.label(*v)).collect()
        }
        match self {
            Solution::Partition { separator, shores } => {
                let shores: Vec<Vec<&str>> =
                    shores.iter().map(|shore| labels(graph, shore)).collect();
                format!("{{'S': {:?}, 'V': {:?}}}", labels(graph, separator), shores)
            }
            Solution::Separator(separator) => format!("{:?}", labels(graph, separator)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path4() -> SepGraph {
        SepGraph::from_reader("4, 3, 0\na, b\nb, c\nc, d\n".as_bytes()).unwrap()
    }

    #[test]
    fn accepts_a_proper_partition() {
        let graph = path4();
        let solution = Solution::Partition {
            separator: vec![1],
            shores: vec![vec![0], vec![2, 3]],
        };
        assert!(solution.validate(&graph, 2).is_ok());
        assert_eq!(solution.cost(), 1);
    }

    #[test]
    fn rejects_cross_shore_edges_and_overflow() {
        let graph = path4();
        let crossing = Solution::Partition {
            separator: vec![3],
            shores: vec![vec![0, 1], vec![2]],
        };
        assert!(crossing.validate(&graph, 2).is_err());

        let overflowing = Solution::Partition {
            separator: vec![3],
            shores: vec![vec![0, 1, 2], vec![]],
        };
        assert!(overflowing.validate(&graph, 2).is_err());
    }

    #[test]
    fn rejects_incomplete_or_overlapping_partitions() {
        let graph = path4();
        let incomplete = Solution::Partition {
            separator: vec![1],
            shores: vec![vec![0], vec![2]],
        };
        assert!(incomplete.validate(&graph, 2).is_err());

        let overlapping = Solution::Partition {
            separator: vec![1],
            shores: vec![vec![0, 2], vec![2, 3]],
        };
        assert!(overlapping.validate(&graph, 2).is_err());
    }

    #[test]
    fn separator_validation_bounds_remaining_components() {
        let graph = path4();
        assert!(Solution::Separator(vec![1]).validate(&graph, 2).is_ok());
        assert!(Solution::Separator(vec![3]).validate(&graph, 2).is_err());
    }

    #[test]
    fn renders_with_labels() {
        let graph = path4();
        let solution = Solution::Partition {
            separator: vec![1],
            shores: vec![vec![0], vec![2, 3]],
        };
        assert_eq!(
            solution.to_display(&graph),
            r#"{'S': ["b"], 'V': [["a"], ["c", "d"]]}"#
        );
        assert_eq!(
            Solution::Separator(vec![0, 2]).to_display(&graph),
            r#"["a", "c"]"#
        );
    }
}
