//! The domain store: each variable's current candidate-word set.
//!
//! `DomainStore` is the single mutable structure threaded through consistency
//! enforcement and search. It is initialized with every variable mapped to
//! the entire vocabulary and only ever shrinks: the public surface offers
//! [`DomainStore::restrict`] and [`DomainStore::remove`], and no way to put a
//! candidate back. The store exclusively owns the sets; callers borrow
//! through it rather than holding domains elsewhere.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use log::debug;

use crate::grid::{Grid, Variable};
use crate::word_list::WordList;

/// Mutable mapping from each [`Variable`] to its candidate words.
#[derive(Debug, Clone)]
pub struct DomainStore {
    domains: HashMap<Variable, HashSet<Rc<str>>>,
}

impl DomainStore {
    /// Initialize every variable of `grid` with the entire vocabulary
    /// (pre-filtering happens later, in node consistency).
    #[must_use]
    pub fn new(grid: &Grid, words: &WordList) -> Self {
        let full: HashSet<Rc<str>> = words.words().iter().map(Rc::clone).collect();
        let domains = grid
            .variables()
            .iter()
            .map(|v| (*v, full.clone()))
            .collect();
        Self { domains }
    }

    /// The current candidate set for `var`.
    ///
    /// # Panics
    /// Panics if `var` is not a variable of the grid this store was built
    /// from. That indicates a bug in the caller, not bad user input.
    #[must_use]
    pub fn domain_of(&self, var: &Variable) -> &HashSet<Rc<str>> {
        self.domains
            .get(var)
            .unwrap_or_else(|| panic!("unknown variable {var} (domain store built from a different grid?)"))
    }

    /// Current domain size for `var`; the MRV heuristic reads this.
    #[must_use]
    pub fn size_of(&self, var: &Variable) -> usize {
        self.domain_of(var).len()
    }

    /// Whether `var`'s domain has been emptied. An empty domain proves the
    /// puzzle unsatisfiable.
    #[must_use]
    pub fn is_wiped_out(&self, var: &Variable) -> bool {
        self.domain_of(var).is_empty()
    }

    /// Remove every candidate of `var` failing `predicate`. Returns whether
    /// anything was removed.
    pub fn restrict<P>(&mut self, var: &Variable, predicate: P) -> bool
    where
        P: Fn(&str) -> bool,
    {
        let domain = self
            .domains
            .get_mut(var)
            .unwrap_or_else(|| panic!("unknown variable {var} (domain store built from a different grid?)"));

        let before = domain.len();
        domain.retain(|w| predicate(w.as_ref()));
        let removed = before - domain.len();

        debug_assert!(domain.len() <= before, "domains must only shrink");
        if removed > 0 {
            debug!("restricted domain of {var}: {before} -> {} candidates", domain.len());
        }
        removed > 0
    }

    /// Remove one specific candidate from `var`'s domain. Idempotent: removing
    /// a word that is already absent returns `false` and changes nothing.
    pub fn remove(&mut self, var: &Variable, word: &str) -> bool {
        let domain = self
            .domains
            .get_mut(var)
            .unwrap_or_else(|| panic!("unknown variable {var} (domain store built from a different grid?)"));
        domain.remove(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction;

    fn fixture() -> (Grid, DomainStore) {
        let grid = Grid::new(vec![vec![true, true, true]]).unwrap();
        let words = WordList::new(["cat", "dog", "bird"]);
        let store = DomainStore::new(&grid, &words);
        (grid, store)
    }

    #[test]
    fn test_initialized_with_entire_vocabulary() {
        let (grid, store) = fixture();
        let v = grid.variables()[0];

        assert_eq!(store.size_of(&v), 3);
        assert!(store.domain_of(&v).contains("bird"));
    }

    #[test]
    fn test_restrict_reports_removal() {
        let (grid, mut store) = fixture();
        let v = grid.variables()[0];

        assert!(store.restrict(&v, |w| w.len() == 3));
        assert_eq!(store.size_of(&v), 2);
        assert!(!store.domain_of(&v).contains("bird"));

        // Nothing left to remove: second call reports no change.
        assert!(!store.restrict(&v, |w| w.len() == 3));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (grid, mut store) = fixture();
        let v = grid.variables()[0];

        assert!(store.remove(&v, "cat"));
        assert!(!store.remove(&v, "cat"));
        assert_eq!(store.size_of(&v), 2);
    }

    #[test]
    fn test_wipeout_detection() {
        let (grid, mut store) = fixture();
        let v = grid.variables()[0];

        assert!(!store.is_wiped_out(&v));
        store.restrict(&v, |_| false);
        assert!(store.is_wiped_out(&v));
        assert_eq!(store.size_of(&v), 0);
    }

    #[test]
    fn test_domains_shrink_monotonically() {
        let (grid, mut store) = fixture();
        let v = grid.variables()[0];

        let mut last = store.size_of(&v);
        store.restrict(&v, |w| w.len() == 3);
        assert!(store.size_of(&v) <= last);

        last = store.size_of(&v);
        store.remove(&v, "dog");
        assert!(store.size_of(&v) <= last);
    }

    #[test]
    #[should_panic(expected = "unknown variable")]
    fn test_unknown_variable_panics() {
        let (_, store) = fixture();
        let stray = Variable::new(7, 7, 4, Direction::Down);
        store.domain_of(&stray);
    }
}
