//! Consistency enforcement over the domain store: node consistency and AC-3.
//!
//! Node consistency is the unary pass (word length must equal slot length);
//! arc consistency is the classic AC-3 worklist algorithm over every ordered
//! pair of intersecting variables. Both only ever remove candidates, so both
//! terminate, and an emptied domain is proof that the puzzle has no solution.
//!
//! [`ac3`] starts from the full arc set; [`ac3_with_arcs`] accepts a
//! caller-supplied initial worklist so that a search layer can re-tighten a
//! subset of arcs incrementally.

use std::collections::VecDeque;
use std::rc::Rc;

use log::{debug, warn};

use crate::domains::DomainStore;
use crate::grid::{Grid, Variable};
use crate::solver::TimeBudget;

/// Outcome of an AC-3 run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Propagation {
    /// Worklist drained with every domain non-empty.
    Consistent,
    /// Some domain was emptied: the puzzle is proven unsatisfiable.
    Wipeout,
    /// The time budget ran out before the worklist drained.
    Expired,
}

/// Make every variable node-consistent: its domain keeps exactly the words
/// whose length matches the slot length.
///
/// Runs once, over all variables, before arc consistency. A single direct
/// length predicate per variable is all this takes.
pub fn enforce_node_consistency(grid: &Grid, domains: &mut DomainStore) {
    for var in grid.variables() {
        let required = var.length();
        let removed = domains.restrict(var, |w| w.len() == required);
        if removed && domains.is_wiped_out(var) {
            warn!("node consistency emptied the domain of {var} (no word of length {required})");
        }
    }
}

/// Make `x` arc-consistent with `y`: remove from `x`'s domain every word with
/// no supporting partner in `y`'s domain. Returns whether anything was
/// removed.
///
/// A word `wy` supports `wx` when the two are distinct and their letters
/// agree at the overlap offsets. With no overlap between `x` and `y` there is
/// nothing to revise.
pub fn revise(grid: &Grid, domains: &mut DomainStore, x: &Variable, y: &Variable) -> bool {
    let Some((a, b)) = grid.overlap(x, y) else {
        return false;
    };

    let unsupported: Vec<Rc<str>> = {
        let dy = domains.domain_of(y);
        domains
            .domain_of(x)
            .iter()
            .filter(|wx| !dy.iter().any(|wy| supports(wx, wy, a, b)))
            .map(Rc::clone)
            .collect()
    };

    for word in &unsupported {
        domains.remove(x, word);
    }
    if !unsupported.is_empty() {
        debug!("revise({x}, {y}) removed {} candidate(s)", unsupported.len());
    }
    !unsupported.is_empty()
}

/// Whether `wy` supports `wx` under overlap offsets `(a, b)`: the words are
/// distinct and the overlap letters agree. A word too short to reach its
/// offset supports nothing (it cannot fill the slot either way).
fn supports(wx: &str, wy: &str, a: usize, b: usize) -> bool {
    wx != wy
        && matches!(
            (wx.as_bytes().get(a), wy.as_bytes().get(b)),
            (Some(ca), Some(cb)) if ca == cb
        )
}

/// Enforce arc consistency over the full arc set: every ordered pair of
/// variables with a defined overlap, in both directions.
///
/// Returns `true` if every domain is still non-empty afterwards, `false` if
/// some domain was emptied (the puzzle is unsatisfiable).
pub fn ac3(grid: &Grid, domains: &mut DomainStore) -> bool {
    run_ac3(grid, domains, all_arcs(grid), &TimeBudget::unlimited()) != Propagation::Wipeout
}

/// Enforce arc consistency starting from a caller-supplied worklist instead
/// of the full arc set. Semantics are otherwise identical to [`ac3`].
pub fn ac3_with_arcs<I>(grid: &Grid, domains: &mut DomainStore, arcs: I) -> bool
where
    I: IntoIterator<Item = (Variable, Variable)>,
{
    let worklist: VecDeque<(Variable, Variable)> = arcs.into_iter().collect();
    run_ac3(grid, domains, worklist, &TimeBudget::unlimited()) != Propagation::Wipeout
}

/// Every ordered pair `(x, y)` with a defined overlap. Both directions are
/// present because `neighbors` is symmetric.
pub(crate) fn all_arcs(grid: &Grid) -> VecDeque<(Variable, Variable)> {
    grid.variables()
        .iter()
        .flat_map(|x| grid.neighbors(x).iter().map(move |y| (*x, *y)))
        .collect()
}

/// The AC-3 worklist loop.
///
/// Pops an arc `(x, y)`, revises `x` against `y`, and on any removal
/// re-enqueues `(z, x)` for every neighbor `z` of `x` other than `y`, since
/// shrinking `x` may have broken support for words in `z`. Terminates because
/// revisions only remove candidates and the worklist grows by a bounded
/// amount per removal event. The budget is checked once per popped arc.
pub(crate) fn run_ac3(
    grid: &Grid,
    domains: &mut DomainStore,
    mut arcs: VecDeque<(Variable, Variable)>,
    budget: &TimeBudget,
) -> Propagation {
    while let Some((x, y)) = arcs.pop_front() {
        if budget.expired() {
            return Propagation::Expired;
        }

        if revise(grid, domains, &x, &y) {
            if domains.is_wiped_out(&x) {
                warn!("arc consistency wiped out the domain of {x}");
                return Propagation::Wipeout;
            }
            for z in grid.neighbors(&x) {
                if z != &y {
                    arcs.push_back((*z, x));
                }
            }
        }
    }
    Propagation::Consistent
}
