use milp::{
    Assignment, CallbackResult, Constraint, LazyCallback, LinExpr, MilpSolver, Model, Var,
};
use sepgraph::{NodeId, SepGraph};

use super::{report_model, report_no_solution};
use crate::{packing, subsets, CvspError, Solution};

/// Incumbent values below this read as "kept out of the separator". The
/// backends hand back exact integer values here, so any threshold strictly
/// between 0 and 1 behaves the same; 0.1 leaves room for backends with
/// floating-point reads.
pub const SEPARATOR_EPSILON: f64 = 0.1;

/// Which condition turns a candidate subset into a cover cut.
#[derive(Clone, Copy, Debug)]
pub(super) enum Rule {
    /// The subset's components need more than K capacity bins.
    Packing,
    /// A component of the subset outgrows the capacity on its own. Ignores
    /// K and bounds component sizes only.
    ComponentSize,
}

/// Separator variables and objective shared by both cover formulations:
/// one binary per node meaning "goes into S", minimizing their sum.
fn separator_model(graph: &SepGraph) -> (Model, Vec<Var>) {
    let mut model = Model::new();
    let x: Vec<Var> = graph.nodes().map(|v| model.binary(graph.label(v))).collect();
    model.minimize(LinExpr::sum(x.iter().copied()));
    (model, x)
}

pub(super) fn solve_eager(
    graph: &SepGraph,
    solver: &dyn MilpSolver,
    rule: Rule,
    k_value: u32,
    b_value: u32,
    quiet: bool,
) -> Result<Option<Solution>, CvspError> {
    let (mut model, x) = separator_model(graph);

    for w in subsets::proper_subsets(graph.node_count()) {
        match rule {
            Rule::Packing => {
                if let Some(cut) = packing_cut(graph, solver, &x, &w, k_value, b_value) {
                    model.add(cut);
                }
            }
            Rule::ComponentSize => {
                for component in graph.induced_components(&w) {
                    if component.len() == b_value as usize + 1 {
                        model.add(component_cut(&x, &component));
                    }
                }
            }
        }
    }

    report_model(&model, quiet);

    match solver.solve(&model).map_err(CvspError::Solver)? {
        Some(assignment) => Ok(Some(extract_separator(graph, &assignment, &x))),
        None => {
            report_no_solution(quiet);
            Ok(None)
        }
    }
}

pub(super) fn solve_lazy(
    graph: &SepGraph,
    solver: &dyn MilpSolver,
    rule: Rule,
    k_value: u32,
    b_value: u32,
    quiet: bool,
) -> Result<Option<Solution>, CvspError> {
    let (mut model, x) = separator_model(graph);
    report_model(&model, quiet);

    let mut callback = CoverSeparation {
        graph,
        solver,
        x: &x,
        rule,
        k_value,
        b_value,
    };

    match solver
        .solve_lazy(&mut model, &mut callback)
        .map_err(CvspError::Solver)?
    {
        Some(assignment) => Ok(Some(extract_separator(graph, &assignment, &x))),
        None => {
            report_no_solution(quiet);
            Ok(None)
        }
    }
}

/// Separates one incumbent: the candidate subset is the incumbent's
/// complement, and the active rule decides which cuts it violates.
struct CoverSeparation<'a> {
    graph: &'a SepGraph,
    solver: &'a dyn MilpSolver,
    x: &'a [Var],
    rule: Rule,
    k_value: u32,
    b_value: u32,
}

impl<'a> LazyCallback for CoverSeparation<'a> {
    fn on_incumbent(&mut self, incumbent: &Assignment) -> CallbackResult {
        let w: Vec<NodeId> = self
            .graph
            .nodes()
            .filter(|v| incumbent.value(self.x[*v]) < SEPARATOR_EPSILON)
            .collect();

        let cuts: Vec<Constraint> = match self.rule {
            Rule::Packing => {
                packing_cut(self.graph, self.solver, self.x, &w, self.k_value, self.b_value)
                    .into_iter()
                    .collect()
            }
            Rule::ComponentSize => self
                .graph
                .induced_components(&w)
                .into_iter()
                .filter(|component| component.len() > self.b_value as usize)
                .map(|component| component_cut(self.x, &component))
                .collect(),
        };

        if cuts.is_empty() {
            CallbackResult::accept()
        } else {
            CallbackResult::reject(cuts)
        }
    }
}

/// The cover cut for w when its components cannot be packed into K capacity
/// bins: at least one node of w has to be separated. An oversized component
/// or a failed oracle run counts as unpackable.
fn packing_cut(
    graph: &SepGraph,
    solver: &dyn MilpSolver,
    x: &[Var],
    w: &[NodeId],
    k_value: u32,
    b_value: u32,
) -> Option<Constraint> {
    let components = graph.induced_components(w);

    let bins = if components.iter().any(|c| c.len() > b_value as usize) {
        None
    } else {
        let weights: Vec<u32> = components.iter().map(|c| c.len() as u32).collect();
        packing::min_bins(solver, &weights, b_value)
    };

    match bins {
        Some(bins) if bins <= k_value => None,
        _ => Some(Constraint::ge(
            LinExpr::sum(w.iter().map(|v| x[*v])),
            1.0,
        )),
    }
}

fn component_cut(x: &[Var], component: &[NodeId]) -> Constraint {
    Constraint::ge(LinExpr::sum(component.iter().map(|v| x[*v])), 1.0)
}

fn extract_separator(graph: &SepGraph, assignment: &Assignment, x: &[Var]) -> Solution {
    Solution::Separator(
        graph
            .nodes()
            .filter(|v| assignment.is_one(x[*v]))
            .collect(),
    )
}
