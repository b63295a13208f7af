use z3::ast::{Ast, Bool, Int};
use z3::{Config, Context, Optimize, SatResult};

use crate::{
    Assignment, Cmp, Constraint, LazyCallback, LinExpr, MilpSolver, Model, Sense, SolverError,
};

/// Backend on the Z3 optimizer. Binary variables become bounded integer
/// constants. Asserting new rows into a checked `Optimize` and checking
/// again re-optimizes incrementally, which is what carries the lazy
/// protocol.
pub struct Z3Solver;

impl MilpSolver for Z3Solver {
    fn name(&self) -> &'static str {
        "z3"
    }

    fn solve(&self, model: &Model) -> Result<Option<Assignment>, SolverError> {
        let config = Config::new();
        let context = Context::new(&config);
        let (optimize, vars) = encode(&context, model);

        match optimize.check(&[]) {
            SatResult::Sat => {
                let found = optimize
                    .get_model()
                    .ok_or_else(|| SolverError::Backend("sat result without a model".into()))?;
                Ok(Some(read_assignment(&found, &vars)?))
            }
            SatResult::Unsat | SatResult::Unknown => Ok(None),
        }
    }

    fn solve_lazy(
        &self,
        model: &mut Model,
        callback: &mut dyn LazyCallback,
    ) -> Result<Option<Assignment>, SolverError> {
        let config = Config::new();
        let context = Context::new(&config);
        let (optimize, vars) = encode(&context, model);

        loop {
            match optimize.check(&[]) {
                SatResult::Sat => {
                    let found = optimize.get_model().ok_or_else(|| {
                        SolverError::Backend("sat result without a model".into())
                    })?;
                    let incumbent = read_assignment(&found, &vars)?;

                    let result = callback.on_incumbent(&incumbent);
                    if result.accept {
                        return Ok(Some(incumbent));
                    }
                    if result.cuts.is_empty() {
                        return Err(SolverError::Backend(
                            "callback rejected an incumbent without new constraints".into(),
                        ));
                    }
                    for cut in result.cuts {
                        optimize.assert(&encode_constraint(&context, &vars, &cut));
                        model.add(cut);
                    }
                }
                SatResult::Unsat | SatResult::Unknown => return Ok(None),
            }
        }
    }
}

fn encode<'ctx>(context: &'ctx Context, model: &Model) -> (Optimize<'ctx>, Vec<Int<'ctx>>) {
    let optimize = Optimize::new(context);
    let zero = Int::from_i64(context, 0);
    let one = Int::from_i64(context, 1);

    let vars: Vec<Int> = model
        .variables()
        .map(|var| Int::new_const(context, model.name(var)))
        .collect();
    for var in &vars {
        optimize.assert(&var.ge(&zero));
        optimize.assert(&var.le(&one));
    }

    for constraint in model.constraints() {
        optimize.assert(&encode_constraint(context, &vars, constraint));
    }

    let objective = encode_expr(context, &vars, model.objective());
    match model.sense() {
        Sense::Maximize => optimize.maximize(&objective),
        Sense::Minimize => optimize.minimize(&objective),
    }

    (optimize, vars)
}

fn encode_expr<'ctx>(context: &'ctx Context, vars: &[Int<'ctx>], expr: &LinExpr) -> Int<'ctx> {
    let terms: Vec<Int> = expr
        .terms()
        .iter()
        .map(|(var, coefficient)| {
            let coefficient = coefficient.round() as i64;
            if coefficient == 1 {
                vars[var.index()].clone()
            } else {
                Int::mul(
                    context,
                    &[&Int::from_i64(context, coefficient), &vars[var.index()]],
                )
            }
        })
        .collect();
    if terms.is_empty() {
        return Int::from_i64(context, 0);
    }
    let refs: Vec<&Int> = terms.iter().collect();
    Int::add(context, &refs)
}

fn encode_constraint<'ctx>(
    context: &'ctx Context,
    vars: &[Int<'ctx>],
    constraint: &Constraint,
) -> Bool<'ctx> {
    let lhs = encode_expr(context, vars, &constraint.expr);
    let rhs = Int::from_i64(context, constraint.rhs.round() as i64);
    match constraint.cmp {
        Cmp::Le => lhs.le(&rhs),
        Cmp::Ge => lhs.ge(&rhs),
        Cmp::Eq => lhs._eq(&rhs),
    }
}

fn read_assignment<'ctx>(
    found: &z3::Model<'ctx>,
    vars: &[Int<'ctx>],
) -> Result<Assignment, SolverError> {
    let values = vars
        .iter()
        .map(|var| {
            found
                .eval(var, true)
                .and_then(|value| value.as_i64())
                .map(|value| value as f64)
                .ok_or_else(|| SolverError::Backend("unevaluated model variable".into()))
        })
        .collect::<Result<Vec<f64>, SolverError>>()?;
    Ok(Assignment::new(values))
}
