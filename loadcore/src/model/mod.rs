//! A small generic integer-constraint model, the in-crate stand-in for
//! "a general integer/boolean CP solver capable of linear constraints,
//! half-reified implications, and a single scalar objective under a
//! wall-clock time limit." `AMB` (`crate::assign`) builds one of these
//! per run; `model::solver` is its `SD`.
//!
//! `PMB` (`crate::placement`) does not route through this generic
//! model — its decision variables are inherently geometric (positions,
//! orientation choices) and its hard constraints (non-overlap, support)
//! are cheaper and clearer to check directly against geometry than to
//! flatten into generic linear inequalities. It reports through the
//! same [`Status`] vocabulary so both phases look identical from the
//! outside.

pub mod solver;

use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

#[derive(Debug, Clone, Copy)]
pub struct Domain {
    pub lo: Num,
    pub hi: Num,
}

/// A linear combination of model variables plus a constant.
#[derive(Debug, Clone, Default)]
pub struct LinearExpr {
    pub terms: Vec<(Num, VarId)>,
    pub constant: Num,
}

impl LinearExpr {
    pub fn constant(k: Num) -> Self {
        Self { terms: vec![], constant: k }
    }

    pub fn single(coef: Num, v: VarId) -> Self {
        Self { terms: vec![(coef, v)], constant: 0 }
    }

    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        Self { terms: vars.into_iter().map(|v| (1, v)).collect(), constant: 0 }
    }

    pub fn add_term(mut self, coef: Num, v: VarId) -> Self {
        self.terms.push((coef, v));
        self
    }

    #[inline]
    pub fn eval(&self, values: &[Num]) -> Num {
        self.constant + self.terms.iter().map(|(c, v)| c * values[v.0]).sum::<Num>()
    }
}

/// Hard constraints the model can express. `Implies` is the
/// half-reified implication primitive §4.2 calls for (e.g. "orientation
/// k selected implies l_eff = p_k.l").
#[derive(Debug, Clone)]
pub enum Constraint {
    Le(LinearExpr, Num),
    Eq(LinearExpr, Num),
    Ge(LinearExpr, Num),
    /// `trigger` is a 0/1 variable; `inner` only needs to hold when it is 1.
    Implies(VarId, Box<Constraint>),
    /// Sugar for `Eq(sum(vars), 1)`, i.e. exactly one of `vars` is set.
    ExactlyOne(Vec<VarId>),
    /// At least one of `vars` is set (used for the six separation booleans
    /// and the on-floor/supports disjunction).
    AtLeastOne(Vec<VarId>),
}

impl Constraint {
    /// Non-negative distance from satisfied; zero iff satisfied. Used
    /// both to decide feasibility and as the local-search objective
    /// `solver::solve` hill-climbs against.
    fn violation(&self, values: &[Num]) -> Num {
        match self {
            Constraint::Le(e, k) => (e.eval(values) - k).max(0),
            Constraint::Ge(e, k) => (k - e.eval(values)).max(0),
            Constraint::Eq(e, k) => (e.eval(values) - k).abs(),
            Constraint::Implies(trigger, inner) => {
                if values[trigger.0] != 0 {
                    inner.violation(values)
                } else {
                    0
                }
            }
            Constraint::ExactlyOne(vars) => {
                let s: Num = vars.iter().map(|v| values[v.0]).sum();
                (s - 1).abs()
            }
            Constraint::AtLeastOne(vars) => {
                if vars.iter().any(|v| values[v.0] != 0) {
                    0
                } else {
                    1
                }
            }
        }
    }
}

/// A complete problem instance: variable domains, hard constraints and
/// one scalar objective. Building one of these is pure (no I/O, no
/// randomness) — only `solver::solve` touches time or an RNG.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub domains: Vec<Domain>,
    pub constraints: Vec<Constraint>,
    pub objective: LinearExpr,
    pub minimize: bool,
}

impl Model {
    pub fn new() -> Self {
        Self { minimize: true, ..Default::default() }
    }

    pub fn new_bool(&mut self) -> VarId {
        self.new_int(0, 1)
    }

    pub fn new_int(&mut self, lo: Num, hi: Num) -> VarId {
        debug_assert!(lo <= hi, "Bad domain requested.");
        self.domains.push(Domain { lo, hi });
        VarId(self.domains.len() - 1)
    }

    pub fn add(&mut self, c: Constraint) {
        self.constraints.push(c);
    }

    /// Pins a variable to an exact value, the mechanism
    /// `fixed_assignments` (see `crate::assign`) rides on.
    pub fn fix(&mut self, v: VarId, value: Num) {
        self.add(Constraint::Eq(LinearExpr::single(1, v), value));
    }

    pub fn total_violation(&self, values: &[Num]) -> Num {
        self.constraints.iter().map(|c| c.violation(values)).sum()
    }

    pub fn objective_value(&self, values: &[Num]) -> Num {
        self.objective.eval(values)
    }

    pub fn num_vars(&self) -> usize {
        self.domains.len()
    }
}

/// Mirrors a CP solver's outcome status, never its internal numeric
/// codes — every caller in this crate pattern-matches on this, per
/// `crate::prelude`'s design note on tagged sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Optimal,
    Feasible,
    Infeasible,
    Unknown,
    ModelInvalid,
}

impl Status {
    #[inline(always)]
    pub fn has_incumbent(&self) -> bool {
        matches!(self, Status::Optimal | Status::Feasible)
    }
}
