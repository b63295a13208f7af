mod clique;
mod cover;
mod direct;

pub use self::cover::SEPARATOR_EPSILON;

use std::fmt;
use std::str::FromStr;

use milp::{HighsSolver, MilpSolver, Model, Z3Solver};
use sepgraph::SepGraph;

use crate::{CvspError, Solution};

/// Which backend family serves the solve. HiGHS builds everything up front;
/// Z3 re-optimizes incrementally and therefore also carries the alternative
/// and lazy encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Library {
    Highs,
    Z3,
}

impl Library {
    pub fn name(self) -> &'static str {
        match self {
            Library::Highs => "highs",
            Library::Z3 => "z3",
        }
    }

    pub fn solver(self) -> Box<dyn MilpSolver> {
        match self {
            Library::Highs => Box::new(HighsSolver),
            Library::Z3 => Box::new(Z3Solver),
        }
    }

    /// The formulations this library accepts, in index order.
    pub fn formulations(self) -> &'static [Formulation] {
        match self {
            Library::Highs => &[
                Formulation::Direct,
                Formulation::Clique,
                Formulation::SubsetCover,
                Formulation::ComponentCover,
            ],
            Library::Z3 => &[
                Formulation::Direct,
                Formulation::DirectPairs,
                Formulation::DirectSubsets,
                Formulation::Clique,
                Formulation::SubsetCover,
                Formulation::SubsetCoverLazy,
                Formulation::ComponentCover,
                Formulation::ComponentCoverLazy,
            ],
        }
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Library {
    type Err = String;

    fn from_str(s: &str) -> Result<Library, String> {
        match s {
            "highs" => Ok(Library::Highs),
            "z3" => Ok(Library::Z3),
            other => Err(format!(
                "unknown library '{}', expected 'highs' or 'z3'",
                other
            )),
        }
    }
}

/// The eight encodings of the problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Formulation {
    /// Shore assignment grid, adjacency rows with the summed form.
    Direct,
    /// Adjacency expanded to one row per ordered shore pair.
    DirectPairs,
    /// Adjacency over every subset of shore indices.
    DirectSubsets,
    /// Clique ownership variables instead of adjacency rows.
    Clique,
    /// Separator variables with packing cover cuts, full enumeration.
    SubsetCover,
    /// Separator variables with packing cover cuts separated per incumbent.
    SubsetCoverLazy,
    /// Separator variables with component size cuts, full enumeration.
    ComponentCover,
    /// Separator variables with component size cuts separated per incumbent.
    ComponentCoverLazy,
}

impl Formulation {
    pub fn solve(
        self,
        graph: &SepGraph,
        solver: &dyn MilpSolver,
        k_value: u32,
        b_value: u32,
        quiet: bool,
    ) -> Result<Option<Solution>, CvspError> {
        match self {
            Formulation::Direct => {
                direct::solve(graph, solver, k_value, b_value, direct::Adjacency::Summed, quiet)
            }
            Formulation::DirectPairs => {
                direct::solve(graph, solver, k_value, b_value, direct::Adjacency::Pairs, quiet)
            }
            Formulation::DirectSubsets => direct::solve(
                graph,
                solver,
                k_value,
                b_value,
                direct::Adjacency::IndexSubsets,
                quiet,
            ),
            Formulation::Clique => clique::solve(graph, solver, k_value, b_value, quiet),
            Formulation::SubsetCover => {
                cover::solve_eager(graph, solver, cover::Rule::Packing, k_value, b_value, quiet)
            }
            Formulation::SubsetCoverLazy => {
                cover::solve_lazy(graph, solver, cover::Rule::Packing, k_value, b_value, quiet)
            }
            Formulation::ComponentCover => cover::solve_eager(
                graph,
                solver,
                cover::Rule::ComponentSize,
                k_value,
                b_value,
                quiet,
            ),
            Formulation::ComponentCoverLazy => cover::solve_lazy(
                graph,
                solver,
                cover::Rule::ComponentSize,
                k_value,
                b_value,
                quiet,
            ),
        }
    }
}

fn report_model(model: &Model, quiet: bool) {
    if quiet {
        return;
    }
    println!("\nProblem definition:");
    println!("  Number of variables = {}", model.num_variables());
    println!("  Number of constraints = {}", model.num_constraints());
}

fn report_no_solution(quiet: bool) {
    if !quiet {
        println!("The problem does not have an optimal solution.");
    }
}
