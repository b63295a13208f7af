use milp::{Constraint, LinExpr, MilpSolver, Model, Var};

/// Minimum number of capacity-sized bins that hold all items, each item
/// going whole into exactly one bin. Solved as a fresh assignment program on
/// the caller's backend, with one bin slot per item as the safe upper bound.
///
/// `None` stands for an infinite packing number: the sub-solve ended without
/// a proven optimum (an item wider than a bin, or a backend failure). The
/// cover formulations treat that conservatively and cut.
pub fn min_bins(solver: &dyn MilpSolver, weights: &[u32], capacity: u32) -> Option<u32> {
    if weights.is_empty() {
        return Some(0);
    }

    let n = weights.len();
    let mut model = Model::new();

    // packed[i][j] = 1 if item i goes into bin j.
    let packed: Vec<Vec<Var>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| model.binary(format!("x_{}_{}", i, j)))
                .collect()
        })
        .collect();

    // used[j] = 1 if bin j holds anything.
    let used: Vec<Var> = (0..n).map(|j| model.binary(format!("y_{}", j))).collect();

    for i in 0..n {
        model.add(Constraint::eq(LinExpr::sum(packed[i].iter().copied()), 1.0));
    }

    for j in 0..n {
        let mut load = LinExpr::weighted((0..n).map(|i| (packed[i][j], weights[i] as f64)));
        load.push(used[j], -(capacity as f64));
        model.add(Constraint::le(load, 0.0));
    }

    model.minimize(LinExpr::sum(used.iter().copied()));

    let assignment = solver.solve(&model).ok().flatten()?;

    let mut bins = 0;
    for j in 0..n {
        if assignment.is_one(used[j]) && (0..n).any(|i| assignment.is_one(packed[i][j])) {
            bins += 1;
        }
    }
    Some(bins)
}
