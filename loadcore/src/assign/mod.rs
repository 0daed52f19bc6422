//! Builds the Phase 1 assignment problem — which container instance
//! each box goes to — as a [`crate::model::Model`], then hands it to
//! [`crate::model::solver::solve`]. Construction here is pure: no I/O,
//! no randomness, no clock reads.

use indexmap::IndexMap;

use crate::model::{Constraint, LinearExpr, Model, VarId};
use crate::prelude::*;

/// Per-box forced container index, the channel the Repair Operator
/// rides on to keep untouched boxes where they already are.
pub type FixedAssignments = HashMap<usize, usize>;

#[derive(Debug, Clone, Copy)]
pub struct AssignWeights {
    pub lambda_group: Num,
    pub lambda_balance: Num,
}

impl Default for AssignWeights {
    fn default() -> Self {
        Self { lambda_group: 1, lambda_balance: 1 }
    }
}

pub struct AssignInput<'a> {
    pub items: &'a [Item],
    pub container: &'a ContainerSpec,
    pub j_bound: usize,
    pub fixed_assignments: &'a FixedAssignments,
    pub weights: AssignWeights,
}

/// Decision-variable handles, kept alongside the model so
/// `decode_assignment` can read the solver's verdict back out.
pub struct AssignVars {
    /// `x[i][j]`.
    pub x: Vec<Vec<VarId>>,
    /// `y[j]`.
    pub y: Vec<VarId>,
    #[allow(dead_code)]
    pub vol_used: Vec<VarId>,
    #[allow(dead_code)]
    pub group_span: IndexMap<i64, VarId>,
}

pub struct AssignModel {
    pub model: Model,
    pub vars: AssignVars,
}

/// A cheap sufficient-infeasibility test the orchestrator runs before
/// spending any solver time: if the items cannot fit `j_bound`
/// instances even with perfect bin-packing, no CP run will find a
/// feasible assignment either. This is the pre-screen §8's boundary
/// behaviors permit ("implementations MAY pre-screen this and fail
/// early").
pub fn capacity_precheck(items: &[Item], container: &ContainerSpec, j_bound: usize) -> Option<String> {
    let total_weight: Num = items.iter().map(|b| b.weight).sum();
    let total_volume: Num = items.iter().map(|b| b.volume()).sum();
    let cap_weight = container.weight_max * j_bound as Num;
    let cap_volume = container.volume() * j_bound as Num;
    if total_weight > cap_weight {
        return Some(format!(
            "total weight {total_weight} exceeds {j_bound} instances' combined capacity {cap_weight}"
        ));
    }
    if total_volume > cap_volume {
        return Some(format!(
            "total volume {total_volume} exceeds {j_bound} instances' combined capacity {cap_volume}"
        ));
    }
    None
}

/// Builds the Phase 1 model per the assignment variables, hard
/// constraints, objective and symmetry-breaking constraint.
pub fn build(input: &AssignInput) -> AssignModel {
    let AssignInput { items, container, j_bound, fixed_assignments, weights } = input;
    let j_bound = *j_bound;
    let n = items.len();
    let mut model = Model::new();

    let x: Vec<Vec<VarId>> = (0..n).map(|_| (0..j_bound).map(|_| model.new_bool()).collect()).collect();
    let y: Vec<VarId> = (0..j_bound).map(|_| model.new_bool()).collect();
    let vol_used: Vec<VarId> = (0..j_bound).map(|_| model.new_int(0, container.volume())).collect();

    let mut groups: IndexMap<i64, Vec<usize>> = IndexMap::new();
    for (i, item) in items.iter().enumerate() {
        if let Some(g) = item.group {
            groups.entry(g).or_default().push(i);
        }
    }
    let mut group_in: IndexMap<i64, Vec<VarId>> = IndexMap::new();
    let mut group_span: IndexMap<i64, VarId> = IndexMap::new();
    for &g in groups.keys() {
        let g_in: Vec<VarId> = (0..j_bound).map(|_| model.new_bool()).collect();
        let g_span = model.new_int(1, j_bound as Num);
        group_in.insert(g, g_in);
        group_span.insert(g, g_span);
    }

    // Assignment: each box goes to exactly one instance.
    for i in 0..n {
        model.add(Constraint::ExactlyOne(x[i].clone()));
    }
    for (&i, &j) in fixed_assignments.iter() {
        model.fix(x[i][j], 1);
    }

    // Capacity + usage coupling.
    for j in 0..j_bound {
        let weight_expr = LinearExpr {
            terms: (0..n)
                .map(|i| (items[i].weight, x[i][j]))
                .chain(std::iter::once((-container.weight_max, y[j])))
                .collect(),
            constant: 0,
        };
        model.add(Constraint::Le(weight_expr, 0));

        let vol_cap = container.volume();
        let vol_cap_expr = LinearExpr {
            terms: (0..n)
                .map(|i| (items[i].volume(), x[i][j]))
                .chain(std::iter::once((-vol_cap, y[j])))
                .collect(),
            constant: 0,
        };
        model.add(Constraint::Le(vol_cap_expr, 0));

        let vol_bookkeeping = LinearExpr {
            terms: (0..n)
                .map(|i| (items[i].volume(), x[i][j]))
                .chain(std::iter::once((-1, vol_used[j])))
                .collect(),
            constant: 0,
        };
        model.add(Constraint::Eq(vol_bookkeeping, 0));

        for i in 0..n {
            model.add(Constraint::Le(LinearExpr::single(1, x[i][j]).add_term(-1, y[j]), 0));
        }
    }

    // Group touch + span.
    for (&g, members) in groups.iter() {
        let g_in = &group_in[&g];
        let g_span = group_span[&g];
        for j in 0..j_bound {
            for &i in members {
                model.add(Constraint::Le(LinearExpr::single(1, x[i][j]).add_term(-1, g_in[j]), 0));
            }
        }
        let span_expr = LinearExpr {
            terms: g_in.iter().map(|&v| (1, v)).chain(std::iter::once((-1, g_span))).collect(),
            constant: 0,
        };
        model.add(Constraint::Eq(span_expr, 0));
    }

    // Symmetry breaking: instances are interchangeable, so order their
    // usage flags. Quality-of-implementation, not correctness.
    for j in 0..j_bound.saturating_sub(1) {
        model.add(Constraint::Ge(LinearExpr::single(1, y[j]).add_term(-1, y[j + 1]), 0));
    }

    // Volume-imbalance surrogate: sum of pairwise |vol_used[j]-vol_used[k]|
    // over *used* instances only (§4.1: "IMB ... is a symmetric pairwise
    // imbalance over used instances"), linearized via auxiliary
    // non-negative difference variables, each gated by `y[j] ∧ y[k]` so an
    // unused instance (vol_used pinned to 0 by the capacity constraints)
    // never contributes |vol_used[used]-0| against a used one — that would
    // penalize exactly the configurations that use fewer instances, fighting
    // the Σ_j y[j] term it's summed with (see SPEC_FULL.md §9 open-question
    // resolution).
    let vol_cap = container.volume();
    let mut imbalance_terms: Vec<(Num, VarId)> = Vec::new();
    for j in 0..j_bound {
        for k in (j + 1)..j_bound {
            let d = model.new_int(0, vol_cap);
            let diff_ge = Constraint::Ge(
                LinearExpr::single(1, d).add_term(-1, vol_used[j]).add_term(1, vol_used[k]),
                0,
            );
            let diff_le = Constraint::Ge(
                LinearExpr::single(1, d).add_term(1, vol_used[j]).add_term(-1, vol_used[k]),
                0,
            );
            model.add(Constraint::Implies(y[j], Box::new(Constraint::Implies(y[k], Box::new(diff_ge)))));
            model.add(Constraint::Implies(y[j], Box::new(Constraint::Implies(y[k], Box::new(diff_le)))));
            imbalance_terms.push((1, d));
        }
    }

    let mut objective = LinearExpr { terms: y.iter().map(|&v| (1, v)).collect(), constant: 0 };
    for &g_span in group_span.values() {
        objective.terms.push((weights.lambda_group, g_span));
        objective.constant -= weights.lambda_group;
    }
    for (coef, v) in imbalance_terms {
        objective.terms.push((coef * weights.lambda_balance, v));
    }
    model.objective = objective;
    model.minimize = true;

    AssignModel { model, vars: AssignVars { x, y, vol_used, group_span } }
}

/// Reads `x[i][j] = 1` back out of a solved model into a dense
/// box-index -> instance-index assignment, enumerating used instances
/// (`y[j] = 1`) in ascending `j` as §4.6 requires of the Repair
/// Operator's rebuild step.
pub fn decode_assignment(vars: &AssignVars, values: &[Num]) -> Vec<usize> {
    let n = vars.x.len();
    let mut out = vec![0usize; n];
    for (i, row) in vars.x.iter().enumerate() {
        let chosen = row.iter().position(|&v| values[v.0] != 0).unwrap_or(0);
        out[i] = chosen;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::solver;

    fn mk_item(id: i64, l: Num, w: Num, h: Num, weight: Num, rotation: RotationPolicy, group: Option<i64>) -> Item {
        Item { id, size: Size::new(l, w, h), weight, rotation, group }
    }

    #[test]
    fn single_box_fits_one_instance() {
        let container = ContainerSpec { l: 4, w: 4, h: 2, weight_max: 1000 };
        let items = vec![mk_item(1, 1, 1, 1, 10, RotationPolicy::Free, None)];
        let fixed = FixedAssignments::new();
        let input = AssignInput {
            items: &items,
            container: &container,
            j_bound: 1,
            fixed_assignments: &fixed,
            weights: AssignWeights::default(),
        };
        assert!(capacity_precheck(&items, &container, 1).is_none());
        let built = build(&input);
        let sol = solver::solve(&built.model, Duration::from_millis(200), None, 1, 2);
        assert!(sol.status.has_incumbent());
        let assignment = decode_assignment(&built.vars, &sol.values);
        assert_eq!(assignment, vec![0]);
    }

    #[test]
    fn precheck_flags_over_capacity() {
        let container = ContainerSpec { l: 10, w: 10, h: 1, weight_max: 20 };
        let items: Vec<Item> =
            (0..10).map(|i| mk_item(i, 5, 3, 1, 3, RotationPolicy::Free, None)).collect();
        let reason = capacity_precheck(&items, &container, 1);
        assert!(reason.is_some());
    }

    #[test]
    fn fixed_assignment_is_honored() {
        let container = ContainerSpec { l: 10, w: 10, h: 10, weight_max: 100 };
        let items = vec![
            mk_item(1, 1, 1, 1, 1, RotationPolicy::None, None),
            mk_item(2, 1, 1, 1, 1, RotationPolicy::None, None),
        ];
        let mut fixed = FixedAssignments::new();
        fixed.insert(0, 1);
        let input = AssignInput {
            items: &items,
            container: &container,
            j_bound: 2,
            fixed_assignments: &fixed,
            weights: AssignWeights::default(),
        };
        let built = build(&input);
        let sol = solver::solve(&built.model, Duration::from_millis(300), None, 7, 2);
        assert!(sol.status.has_incumbent());
        let assignment = decode_assignment(&built.vars, &sol.values);
        assert_eq!(assignment[0], 1);
    }
}
