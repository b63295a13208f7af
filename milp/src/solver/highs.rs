use highs::{HighsModelStatus, RowProblem, Sense as HighsSense};

use crate::{Assignment, Cmp, MilpSolver, Model, Sense, SolverError};

/// Backend on the HiGHS mixed-integer solver. Builds the whole problem up
/// front and solves once; no incremental interface, so no lazy support.
pub struct HighsSolver;

impl MilpSolver for HighsSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve(&self, model: &Model) -> Result<Option<Assignment>, SolverError> {
        let mut problem = RowProblem::default();

        let mut objective = vec![0.0; model.num_variables()];
        for (var, coefficient) in model.objective().terms() {
            objective[var.index()] += coefficient;
        }

        // Columns are added in variable order, so solution columns line up
        // with `Var` indices.
        let columns: Vec<highs::Col> = model
            .variables()
            .map(|var| problem.add_integer_column(objective[var.index()], 0.0..=1.0))
            .collect();

        for constraint in model.constraints() {
            let factors: Vec<(highs::Col, f64)> = constraint
                .expr
                .terms()
                .iter()
                .map(|(var, coefficient)| (columns[var.index()], *coefficient))
                .collect();
            match constraint.cmp {
                Cmp::Le => {
                    problem.add_row(..=constraint.rhs, factors);
                }
                Cmp::Ge => {
                    problem.add_row(constraint.rhs.., factors);
                }
                Cmp::Eq => {
                    problem.add_row(constraint.rhs..=constraint.rhs, factors);
                }
            }
        }

        let sense = match model.sense() {
            Sense::Maximize => HighsSense::Maximise,
            Sense::Minimize => HighsSense::Minimise,
        };
        let mut solver_model = problem.optimise(sense);
        solver_model.set_option("output_flag", false);

        let solved = solver_model.solve();
        if solved.status() != HighsModelStatus::Optimal {
            return Ok(None);
        }
        Ok(Some(Assignment::new(
            solved.get_solution().columns().to_vec(),
        )))
    }
}
