//! A partial assignment of words to slot variables.
//!
//! `Assignment` maps each [`Variable`] to the single word chosen for it.
//! The search grows it with [`Assignment::assign`] and shrinks it with
//! [`Assignment::unassign`]; the two are exact inverses, which is what makes
//! mutate-and-undo backtracking safe. Words are `Rc<str>` handles from the
//! interner, so extension and lookup never copy string data.

use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::grid::{Grid, Variable};

/// Partial mapping from [`Variable`] to its chosen word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    chosen: HashMap<Variable, Rc<str>>,
}

impl Assignment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `var` to `word`.
    ///
    /// The variable must be currently unassigned; assigning over an existing
    /// binding would break the exact-undo contract of the search.
    pub(crate) fn assign(&mut self, var: Variable, word: Rc<str>) {
        let previous = self.chosen.insert(var, word);
        debug_assert!(
            previous.is_none(),
            "variable {var} was already assigned (assign/unassign must pair exactly)"
        );
    }

    /// Remove the binding for `var`, the exact inverse of [`Self::assign`].
    pub(crate) fn unassign(&mut self, var: &Variable) {
        let removed = self.chosen.remove(var);
        debug_assert!(
            removed.is_some(),
            "variable {var} was not assigned (assign/unassign must pair exactly)"
        );
    }

    /// The word chosen for `var`, if any.
    #[must_use]
    pub fn get(&self, var: &Variable) -> Option<&Rc<str>> {
        self.chosen.get(var)
    }

    #[must_use]
    pub fn contains(&self, var: &Variable) -> bool {
        self.chosen.contains_key(var)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    /// Iterate over `(variable, word)` pairs in unspecified order.
    ///
    /// Together with [`Variable::cells`] this is everything a rendering
    /// collaborator needs to rebuild the letter grid.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Rc<str>)> {
        self.chosen.iter()
    }

    /// Whether every variable of `grid` has a word.
    ///
    /// Word validity (length, membership in the vocabulary) is maintained by
    /// construction: the search only ever assigns words drawn from a
    /// variable's domain.
    #[must_use]
    pub fn is_complete(&self, grid: &Grid) -> bool {
        grid.variables().iter().all(|v| self.chosen.contains_key(v))
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // Sorted for stable log output.
        let mut pairs: Vec<(&Variable, &Rc<str>)> = self.chosen.iter().collect();
        pairs.sort_by_key(|(v, _)| **v);
        let rendered: Vec<String> = pairs.iter().map(|(v, w)| format!("{v}→{w}")).collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction;

    fn var(i: usize, j: usize, length: usize, direction: Direction) -> Variable {
        Variable::new(i, j, length, direction)
    }

    #[test]
    fn test_assign_and_get() {
        let mut a = Assignment::new();
        let v = var(0, 0, 3, Direction::Across);
        a.assign(v, Rc::from("cat"));

        assert_eq!(a.get(&v).map(|w| w.as_ref()), Some("cat"));
        assert!(a.contains(&v));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_unassign_is_exact_inverse() {
        let mut a = Assignment::new();
        let v = var(0, 0, 3, Direction::Across);

        let before = a.clone();
        a.assign(v, Rc::from("cat"));
        a.unassign(&v);

        assert_eq!(a, before);
        assert!(a.is_empty());
    }

    #[test]
    fn test_is_complete_tracks_grid_variables() {
        let grid = Grid::new(vec![
            vec![true, true, true],
            vec![true, false, false],
        ])
        .unwrap();
        // One across slot and one down slot.
        assert_eq!(grid.variables().len(), 2);

        let mut a = Assignment::new();
        assert!(!a.is_complete(&grid));

        a.assign(grid.variables()[0], Rc::from("cat"));
        assert!(!a.is_complete(&grid));

        a.assign(grid.variables()[1], Rc::from("co"));
        assert!(a.is_complete(&grid));
    }

    #[test]
    fn test_empty_assignment_is_complete_for_slotless_grid() {
        let grid = Grid::new(vec![vec![false, false]]).unwrap();
        assert!(grid.variables().is_empty());
        assert!(Assignment::new().is_complete(&grid));
    }

    #[test]
    fn test_display_is_sorted_and_stable() {
        let mut a = Assignment::new();
        a.assign(var(1, 0, 3, Direction::Across), Rc::from("dog"));
        a.assign(var(0, 0, 3, Direction::Across), Rc::from("cat"));

        assert_eq!(a.to_string(), "[(0, 0, across, 3)→cat, (1, 0, across, 3)→dog]");
    }
}
