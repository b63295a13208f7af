//! Formulation and constraint-generation engine for the Capacitated Vertex
//! Separator Problem: find a node set S whose removal splits the graph into
//! at most K shores of at most B nodes each, minimizing the separated nodes.

pub mod formulation;
pub mod generator;
pub mod packing;
pub mod solution;
pub mod subsets;

pub use crate::formulation::{Formulation, Library, SEPARATOR_EPSILON};
pub use crate::solution::Solution;

use std::fmt;
use std::time::Instant;

use milp::SolverError;
use sepgraph::SepGraph;

#[derive(Debug)]
pub enum CvspError {
    InvalidFormulation {
        library: Library,
        index: usize,
        available: usize,
    },
    BadParameter(String),
    Solver(SolverError),
}

impl fmt::Display for CvspError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CvspError::InvalidFormulation {
                library,
                index,
                available,
            } => write!(
                f,
                "the {} library has {} formulations, index {} is out of range",
                library, available, index
            ),
            CvspError::BadParameter(message) => f.write_str(message),
            CvspError::Solver(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CvspError {}

impl From<SolverError> for CvspError {
    fn from(e: SolverError) -> CvspError {
        CvspError::Solver(e)
    }
}

/// Solves the CVSP on the given graph with the chosen library and
/// formulation. `Ok(None)` means the underlying solve ended without a proven
/// optimum; the caller decides how to report that.
pub fn cvsp_solver(
    graph: &SepGraph,
    library: Library,
    formulation_index: usize,
    k_value: u32,
    b_value: u32,
    quiet: bool,
) -> Result<Option<Solution>, CvspError> {
    if k_value < 2 {
        return Err(CvspError::BadParameter(format!(
            "k must be at least 2, got {}",
            k_value
        )));
    }
    if b_value < 1 {
        return Err(CvspError::BadParameter(format!(
            "b must be at least 1, got {}",
            b_value
        )));
    }

    let available = library.formulations();
    let formulation =
        available
            .get(formulation_index)
            .copied()
            .ok_or(CvspError::InvalidFormulation {
                library,
                index: formulation_index,
                available: available.len(),
            })?;

    let solver = library.solver();
    let started = Instant::now();
    let solution = formulation.solve(graph, solver.as_ref(), k_value, b_value, quiet)?;

    if !quiet {
        println!("\nSolved in {:.3} seconds", started.elapsed().as_secs_f64());
    }

    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;
    use sepgraph::NodeId;

    /// Two path triples and one pair, all three hanging off both hub nodes
    /// v8 and v9. The only way to keep every remaining component within
    /// capacity 3 is to drop both hubs, which makes the optimum unique.
    fn graph1() -> SepGraph {
        SepGraph::from_reader(
            r"10, 12, 0
v0, v1
v1, v2
v3, v4
v4, v5
v6, v7
v8, v0
v8, v3
v8, v6
v9, v2
v9, v5
v9, v7
v8, v9"
                .as_bytes(),
        )
        .unwrap()
    }

    /// Two triangles joined by one edge.
    fn two_triangles() -> SepGraph {
        SepGraph::from_reader(
            r"6, 7, 0
a, b
a, c
b, c
c, d
d, e
d, f
e, f"
                .as_bytes(),
        )
        .unwrap()
    }

    fn path(n: usize) -> SepGraph {
        let labels: Vec<String> = (0..n).map(|i| format!("v{}", i)).collect();
        let edges: Vec<(NodeId, NodeId)> = (0..n - 1).map(|i| (i, i + 1)).collect();
        SepGraph::new(labels, false, edges).unwrap()
    }

    fn shore_sets(solution: &Solution) -> HashSet<Vec<NodeId>> {
        match solution {
            Solution::Partition { shores, .. } => shores
                .iter()
                .filter(|shore| !shore.is_empty())
                .cloned()
                .collect(),
            Solution::Separator(_) => panic!("expected a partition"),
        }
    }

    #[test]
    fn direct_formulation_separates_the_hubs() {
        let graph = graph1();
        let solution = cvsp_solver(&graph, Library::Highs, 0, 3, 3, true)
            .unwrap()
            .expect("graph1 is solvable");

        solution.validate(&graph, 3).unwrap();
        assert_eq!(solution.separator(), &[8, 9]);
        let expected: HashSet<Vec<NodeId>> =
            vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7]].into_iter().collect();
        assert_eq!(shore_sets(&solution), expected);
    }

    #[test]
    fn direct_formulation_on_z3_agrees() {
        let graph = graph1();
        let solution = cvsp_solver(&graph, Library::Z3, 0, 3, 3, true)
            .unwrap()
            .expect("graph1 is solvable");
        solution.validate(&graph, 3).unwrap();
        assert_eq!(solution.separator(), &[8, 9]);
    }

    #[test]
    fn alternative_adjacency_encodings_agree() {
        let graph = two_triangles();
        let mut costs = Vec::new();
        for index in 0..3 {
            let solution = cvsp_solver(&graph, Library::Z3, index, 2, 3, true)
                .unwrap()
                .expect("two triangles are solvable");
            solution.validate(&graph, 3).unwrap();
            costs.push(solution.cost());
        }
        assert_eq!(costs, vec![1, 1, 1]);
    }

    #[test]
    fn clique_formulation_matches_direct() {
        let graph = two_triangles();
        let direct = cvsp_solver(&graph, Library::Highs, 0, 2, 3, true)
            .unwrap()
            .expect("solvable");
        let clique = cvsp_solver(&graph, Library::Highs, 1, 2, 3, true)
            .unwrap()
            .expect("solvable");
        clique.validate(&graph, 3).unwrap();
        assert_eq!(clique.cost(), direct.cost());
    }

    #[test]
    fn subset_cover_lazy_separates_the_hubs() {
        let graph = graph1();
        let solution = cvsp_solver(&graph, Library::Z3, 5, 3, 3, true)
            .unwrap()
            .expect("graph1 is solvable");
        solution.validate(&graph, 3).unwrap();
        assert_eq!(solution, Solution::Separator(vec![8, 9]));
    }

    #[test]
    fn component_cover_lazy_separates_the_hubs() {
        let graph = graph1();
        let solution = cvsp_solver(&graph, Library::Z3, 7, 3, 3, true)
            .unwrap()
            .expect("graph1 is solvable");
        solution.validate(&graph, 3).unwrap();
        assert_eq!(solution, Solution::Separator(vec![8, 9]));
    }

    #[test]
    fn component_cover_eager_separates_the_hubs() {
        let graph = graph1();
        let solution = cvsp_solver(&graph, Library::Highs, 3, 3, 3, true)
            .unwrap()
            .expect("graph1 is solvable");
        solution.validate(&graph, 3).unwrap();
        assert_eq!(solution, Solution::Separator(vec![8, 9]));
    }

    #[test]
    fn lazy_and_eager_subset_cover_reach_the_same_cost() {
        let graph = path(7);
        let eager = cvsp_solver(&graph, Library::Z3, 4, 2, 3, true)
            .unwrap()
            .expect("paths are solvable");
        let lazy = cvsp_solver(&graph, Library::Z3, 5, 2, 3, true)
            .unwrap()
            .expect("paths are solvable");
        let eager_highs = cvsp_solver(&graph, Library::Highs, 2, 2, 3, true)
            .unwrap()
            .expect("paths are solvable");

        eager.validate(&graph, 3).unwrap();
        lazy.validate(&graph, 3).unwrap();
        assert_eq!(eager.cost(), lazy.cost());
        assert_eq!(eager.cost(), eager_highs.cost());
    }

    #[test]
    fn growing_capacity_never_costs_more() {
        let graph = path(6);

        let subset_cover_costs: Vec<usize> = (1..=3)
            .map(|b| {
                cvsp_solver(&graph, Library::Highs, 2, 2, b, true)
                    .unwrap()
                    .expect("paths are solvable")
                    .cost()
            })
            .collect();
        assert_eq!(subset_cover_costs, vec![4, 2, 1]);

        let component_cover_costs: Vec<usize> = (1..=3)
            .map(|b| {
                cvsp_solver(&graph, Library::Highs, 3, 2, b, true)
                    .unwrap()
                    .expect("paths are solvable")
                    .cost()
            })
            .collect();
        assert_eq!(component_cover_costs, vec![3, 2, 1]);

        for costs in [&subset_cover_costs, &component_cover_costs] {
            assert!(costs.windows(2).all(|pair| pair[0] >= pair[1]));
        }
    }

    #[test]
    fn out_of_range_formulations_fail_fast() {
        let graph = two_triangles();
        match cvsp_solver(&graph, Library::Highs, 4, 2, 3, true) {
            Err(CvspError::InvalidFormulation {
                index: 4,
                available: 4,
                ..
            }) => (),
            other => panic!("expected invalid formulation, got {:?}", other.map(|_| ())),
        }
        assert!(matches!(
            cvsp_solver(&graph, Library::Z3, 8, 2, 3, true),
            Err(CvspError::InvalidFormulation { available: 8, .. })
        ));
    }

    #[test]
    fn degenerate_parameters_fail_fast() {
        let graph = two_triangles();
        assert!(matches!(
            cvsp_solver(&graph, Library::Highs, 0, 1, 3, true),
            Err(CvspError::BadParameter(_))
        ));
        assert!(matches!(
            cvsp_solver(&graph, Library::Highs, 0, 2, 0, true),
            Err(CvspError::BadParameter(_))
        ));
    }

    #[test]
    fn capacity_one_keeps_only_isolated_nodes() {
        // With b = 1 every kept node must end up alone, so on a three node
        // path the middle node goes.
        let graph = path(3);
        let solution = cvsp_solver(&graph, Library::Highs, 2, 2, 1, true)
            .unwrap()
            .expect("paths are solvable");
        solution.validate(&graph, 1).unwrap();
        assert_eq!(solution, Solution::Separator(vec![1]));
    }
}
