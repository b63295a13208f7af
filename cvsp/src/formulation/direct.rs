use itertools::Itertools;

use milp::{Assignment, Constraint, LinExpr, MilpSolver, Model, Var};
use sepgraph::SepGraph;

use super::{report_model, report_no_solution};
use crate::{CvspError, Solution};

/// How the no-cross-shore-edges rule is written down. All three are
/// equivalent encodings of the same rule and exist for comparison.
#[derive(Clone, Copy, Debug)]
pub(super) enum Adjacency {
    /// Per shore i and edge (w, v): xi[i][w] + sum over j != i of xi[j][v] <= 1.
    Summed,
    /// Per ordered shore pair i != j and edge: xi[i][w] + xi[j][v] <= 1.
    Pairs,
    /// Per non-empty shore index subset L and edge:
    /// sum over i in L of xi[i][w] + sum over j not in L of xi[j][v] <= 1.
    IndexSubsets,
}

pub(super) fn solve(
    graph: &SepGraph,
    solver: &dyn MilpSolver,
    k_value: u32,
    b_value: u32,
    adjacency: Adjacency,
    quiet: bool,
) -> Result<Option<Solution>, CvspError> {
    let k = k_value as usize;
    let mut model = Model::new();
    let xi = shore_grid(&mut model, graph, k);

    model.maximize(LinExpr::sum(xi.iter().flatten().copied()));

    // A node sits in at most one shore; in none means it is separated.
    for v in graph.nodes() {
        model.add(Constraint::le(
            LinExpr::sum((0..k).map(|i| xi[i][v])),
            1.0,
        ));
    }

    match adjacency {
        Adjacency::Summed => {
            for i in 0..k {
                for &(w, v) in graph.edges() {
                    let mut row = LinExpr::new();
                    row.push(xi[i][w], 1.0);
                    for j in (0..k).filter(|j| *j != i) {
                        row.push(xi[j][v], 1.0);
                    }
                    model.add(Constraint::le(row, 1.0));
                }
            }
        }
        Adjacency::Pairs => {
            for i in 0..k {
                for j in 0..k {
                    if i == j {
                        continue;
                    }
                    for &(w, v) in graph.edges() {
                        model.add(Constraint::le(
                            LinExpr::sum(vec![xi[i][w], xi[j][v]]),
                            1.0,
                        ));
                    }
                }
            }
        }
        Adjacency::IndexSubsets => {
            for chosen in (1..=k).flat_map(|size| (0..k).combinations(size)) {
                for &(w, v) in graph.edges() {
                    let mut row = LinExpr::new();
                    for i in &chosen {
                        row.push(xi[*i][w], 1.0);
                    }
                    for j in (0..k).filter(|j| !chosen.contains(j)) {
                        row.push(xi[j][v], 1.0);
                    }
                    model.add(Constraint::le(row, 1.0));
                }
            }
        }
    }

    for i in 0..k {
        model.add(Constraint::le(
            LinExpr::sum(graph.nodes().map(|v| xi[i][v])),
            f64::from(b_value),
        ));
    }

    report_model(&model, quiet);

    match solver.solve(&model).map_err(CvspError::Solver)? {
        Some(assignment) => Ok(Some(extract_partition(graph, &assignment, &xi))),
        None => {
            report_no_solution(quiet);
            Ok(None)
        }
    }
}

/// One binary per (shore, node) pair, named after the node labels so solver
/// logs stay readable.
pub(super) fn shore_grid(model: &mut Model, graph: &SepGraph, k: usize) -> Vec<Vec<Var>> {
    (0..k)
        .map(|i| {
            graph
                .nodes()
                .map(|v| model.binary(format!("xi_{}_{}", i, graph.label(v))))
                .collect()
        })
        .collect()
}

pub(super) fn extract_partition(
    graph: &SepGraph,
    assignment: &Assignment,
    xi: &[Vec<Var>],
) -> Solution {
    let mut separator = Vec::new();
    let mut shores = vec![Vec::new(); xi.len()];
    for v in graph.nodes() {
        match (0..xi.len()).find(|i| assignment.is_one(xi[*i][v])) {
            Some(i) => shores[i].push(v),
            None => separator.push(v),
        }
    }
    Solution::Partition { separator, shores }
}
