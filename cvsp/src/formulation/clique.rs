use milp::{Constraint, LinExpr, MilpSolver, Model, Var};
use sepgraph::SepGraph;

use super::direct::{extract_partition, shore_grid};
use super::{report_model, report_no_solution};
use crate::{CvspError, Solution};

/// Clique-based encoding: a shore may only hold a node if it also claims
/// every maximal clique the node belongs to, and each clique is claimed by
/// at most one shore. That replaces the per-edge adjacency rows, which pays
/// off on dense graphs where cliques are few and fat.
pub(super) fn solve(
    graph: &SepGraph,
    solver: &dyn MilpSolver,
    k_value: u32,
    b_value: u32,
    quiet: bool,
) -> Result<Option<Solution>, CvspError> {
    let k = k_value as usize;
    let cliques = graph.maximal_cliques();

    let mut model = Model::new();
    let xi = shore_grid(&mut model, graph, k);
    let psi: Vec<Vec<Var>> = (0..k)
        .map(|i| {
            (0..cliques.len())
                .map(|q| model.binary(format!("psi_{}_{}", i, q)))
                .collect()
        })
        .collect();

    model.maximize(LinExpr::sum(xi.iter().flatten().copied()));

    for v in graph.nodes() {
        model.add(Constraint::le(
            LinExpr::sum((0..k).map(|i| xi[i][v])),
            1.0,
        ));
    }

    // At most one shore claims a clique.
    for q in 0..cliques.len() {
        model.add(Constraint::le(
            LinExpr::sum((0..k).map(|i| psi[i][q])),
            1.0,
        ));
    }

    // A node only enters shore i if shore i owns the node's cliques.
    for i in 0..k {
        for (q, clique) in cliques.iter().enumerate() {
            for &v in clique {
                let mut row = LinExpr::new();
                row.push(xi[i][v], 1.0);
                row.push(psi[i][q], -1.0);
                model.add(Constraint::le(row, 0.0));
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
