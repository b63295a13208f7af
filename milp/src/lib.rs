//! Thin registration/solve facade over the external optimizers.
//!
//! A `Model` holds binary variables, a linear objective and linear
//! constraints. `MilpSolver` implementations translate it to a concrete
//! backend and hand the optimum back as an `Assignment`. Backends that can
//! re-optimize incrementally also drive the lazy constraint protocol through
//! `LazyCallback`.

pub mod solver;

pub use crate::solver::{HighsSolver, Z3Solver};

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Var(usize);

impl Var {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct LinExpr {
    terms: Vec<(Var, f64)>,
}

impl LinExpr {
    pub fn new() -> LinExpr {
        LinExpr { terms: Vec::new() }
    }

    /// Unit-coefficient sum of the given variables.
    pub fn sum<I: IntoIterator<Item = Var>>(vars: I) -> LinExpr {
        LinExpr {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
        }
    }

    pub fn weighted<I: IntoIterator<Item = (Var, f64)>>(terms: I) -> LinExpr {
        LinExpr {
            terms: terms.into_iter().collect(),
        }
    }

    pub fn push(&mut self, var: Var, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    pub fn terms(&self) -> &[(Var, f64)] {
        &self.terms
    }

    pub fn value_in(&self, assignment: &Assignment) -> f64 {
        self.terms
            .iter()
            .map(|(var, coefficient)| coefficient * assignment.value(*var))
            .sum()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cmp {
    Le,
    Ge,
    Eq,
}

#[derive(Clone, Debug)]
pub struct Constraint {
    pub expr: LinExpr,
    pub cmp: Cmp,
    pub rhs: f64,
}

impl Constraint {
    pub fn le(expr: LinExpr, rhs: f64) -> Constraint {
        Constraint { expr, cmp: Cmp::Le, rhs }
    }

    pub fn ge(expr: LinExpr, rhs: f64) -> Constraint {
        Constraint { expr, cmp: Cmp::Ge, rhs }
    }

    pub fn eq(expr: LinExpr, rhs: f64) -> Constraint {
        Constraint { expr, cmp: Cmp::Eq, rhs }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sense {
    Maximize,
    Minimize,
}

/// A pure binary program. Variables are dense handles in creation order,
/// which is what keeps backend columns aligned with them.
#[derive(Clone, Debug)]
pub struct Model {
    names: Vec<String>,
    objective: LinExpr,
    sense: Sense,
    constraints: Vec<Constraint>,
}

impl Model {
    pub fn new() -> Model {
        Model {
            names: Vec::new(),
            objective: LinExpr::new(),
            sense: Sense::Minimize,
            constraints: Vec::new(),
        }
    }

    pub fn binary<S: Into<String>>(&mut self, name: S) -> Var {
        let var = Var(self.names.len());
        self.names.push(name.into());
        var
    }

    pub fn maximize(&mut self, objective: LinExpr) {
        self.objective = objective;
        self.sense = Sense::Maximize;
    }

    pub fn minimize(&mut self, objective: LinExpr) {
        self.objective = objective;
        self.sense = Sense::Minimize;
    }

    pub fn add(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn num_variables(&self) -> usize {
        self.names.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn variables(&self) -> impl Iterator<Item = Var> {
        (0..self.names.len()).map(Var)
    }

    pub fn name(&self, var: Var) -> &str {
        &self.names[var.0]
    }

    pub fn objective(&self) -> &LinExpr {
        &self.objective
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

impl Default for Model {
    fn default() -> Model {
        Model::new()
    }
}

/// Variable values of a solved model.
#[derive(Clone, Debug)]
pub struct Assignment {
    values: Vec<f64>,
}

impl Assignment {
    pub(crate) fn new(values: Vec<f64>) -> Assignment {
        Assignment { values }
    }

    pub fn value(&self, var: Var) -> f64 {
        self.values[var.0]
    }

    /// Rounded read of a binary variable.
    pub fn is_one(&self, var: Var) -> bool {
        self.values[var.0] > 0.5
    }
}

#[derive(Debug)]
pub enum SolverError {
    Unsupported {
        solver: &'static str,
        what: &'static str,
    },
    Backend(String),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolverError::Unsupported { solver, what } => {
                write!(f, "the {} backend does not support {}", solver, what)
            }
            SolverError::Backend(message) => write!(f, "solver backend error: {}", message),
        }
    }
}

impl std::error::Error for SolverError {}

/// What an incumbent inspection decided: either accept the incumbent as
/// final, or reject it and inject the returned rows before the search
/// continues. Rejection must come with at least one cut.
pub struct CallbackResult {
    pub cuts: Vec<Constraint>,
    pub accept: bool,
}

impl CallbackResult {
    pub fn accept() -> CallbackResult {
        CallbackResult { cuts: Vec::new(), accept: true }
    }

    pub fn reject(cuts: Vec<Constraint>) -> CallbackResult {
        CallbackResult { cuts, accept: false }
    }
}

/// Incumbent inspection hook for lazy constraint generation. Runs
/// synchronously on the solving thread.
pub trait LazyCallback {
    fn on_incumbent(&mut self, incumbent: &Assignment) -> CallbackResult;
}

pub trait MilpSolver {
    fn name(&self) -> &'static str;

    /// Solves to proven optimality. `None` means the backend ended without
    /// an optimal solution (infeasible, unbounded or given up).
    fn solve(&self, model: &Model) -> Result<Option<Assignment>, SolverError>;

    /// Solves with lazy constraint generation: every integer optimum of the
    /// current system is offered to `callback`, whose cuts are injected into
    /// the live search and appended to `model`. Backends without incremental
    /// re-optimization refuse.
    fn solve_lazy(
        &self,
        _model: &mut Model,
        _callback: &mut dyn LazyCallback,
    ) -> Result<Option<Assignment>, SolverError> {
        Err(SolverError::Unsupported {
            solver: self.name(),
            what: "lazy constraint generation",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packing_toy() -> (Model, Vec<Var>) {
        // maximize x0 + x1 + x2  s.t.  x0 + x1 <= 1, x1 + x2 <= 1
        let mut model = Model::new();
        let vars: Vec<Var> = (0..3).map(|i| model.binary(format!("x{}", i))).collect();
        model.maximize(LinExpr::sum(vars.iter().copied()));
        model.add(Constraint::le(LinExpr::sum(vec![vars[0], vars[1]]), 1.0));
        model.add(Constraint::le(LinExpr::sum(vec![vars[1], vars[2]]), 1.0));
        (model, vars)
    }

    fn infeasible_toy() -> Model {
        let mut model = Model::new();
        let x = model.binary("x");
        model.minimize(LinExpr::sum(vec![x]));
        model.add(Constraint::ge(LinExpr::sum(vec![x]), 1.0));
        model.add(Constraint::le(LinExpr::sum(vec![x]), 0.0));
        model
    }

    fn check_backend(solver: &dyn MilpSolver) {
        let (model, vars) = packing_toy();
        let assignment = solver.solve(&model).unwrap().expect("toy model is feasible");
        assert!(assignment.is_one(vars[0]));
        assert!(!assignment.is_one(vars[1]));
        assert!(assignment.is_one(vars[2]));

        assert!(solver.solve(&infeasible_toy()).unwrap().is_none());
    }

    #[test]
    fn highs_solves_binary_programs() {
        check_backend(&HighsSolver);
    }

    #[test]
    fn z3_solves_binary_programs() {
        check_backend(&Z3Solver);
    }

    struct CapAtTwo {
        vars: Vec<Var>,
        rounds: usize,
    }

    impl LazyCallback for CapAtTwo {
        fn on_incumbent(&mut self, incumbent: &Assignment) -> CallbackResult {
            self.rounds += 1;
            let chosen: Vec<Var> = self
                .vars
                .iter()
                .copied()
                .filter(|v| incumbent.is_one(*v))
                .collect();
            if chosen.len() > 2 {
                CallbackResult::reject(vec![Constraint::le(LinExpr::sum(chosen), 2.0)])
            } else {
                CallbackResult::accept()
            }
        }
    }

    #[test]
    fn z3_lazy_loop_reoptimizes_after_cuts() {
        let mut model = Model::new();
        let vars: Vec<Var> = (0..4).map(|i| model.binary(format!("x{}", i))).collect();
        model.maximize(LinExpr::sum(vars.iter().copied()));

        let mut callback = CapAtTwo { vars: vars.clone(), rounds: 0 };
        let assignment = Z3Solver
            .solve_lazy(&mut model, &mut callback)
            .unwrap()
            .expect("cut model stays feasible");

        let chosen = vars.iter().filter(|v| assignment.is_one(**v)).count();
        assert_eq!(chosen, 2);
        assert!(callback.rounds >= 2);
        // The injected rows must survive on the model itself.
        assert!(model.num_constraints() >= 1);
    }

    #[test]
    fn highs_refuses_lazy_solves() {
        let mut model = Model::new();
        let x = model.binary("x");
        model.maximize(LinExpr::sum(vec![x]));
        let mut callback = CapAtTwo { vars: vec![x], rounds: 0 };
        match HighsSolver.solve_lazy(&mut model, &mut callback) {
            Err(SolverError::Unsupported { solver: "highs", .. }) => (),
            other => panic!("expected unsupported, got {:?}", other.map(|_| ())),
        }
    }
}
