//! String interning for vocabulary words.
//!
//! Every variable's domain starts as the full word list, so the same word
//! string appears in many candidate sets at once. We keep a cache of interned
//! strings and hand out `Rc<str>` pointers that share one allocation, making
//! domain clones and assignment extensions cheap in the search hot path.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

thread_local! {
    /// Thread-local intern cache.
    /// The solver is single-threaded, so thread_local avoids a global Mutex.
    static INTERNER: RefCell<HashMap<String, Rc<str>>> = RefCell::new(HashMap::new());
}

/// Intern a word, returning an `Rc<str>`.
///
/// Returns a cheap clone of the cached `Rc` when the word has been interned
/// before; otherwise allocates, caches, and returns a new handle.
pub(crate) fn intern(s: impl AsRef<str>) -> Rc<str> {
    let s = s.as_ref();

    INTERNER.with(|interner| {
        let mut cache = interner.borrow_mut();

        if let Some(existing) = cache.get(s) {
            return Rc::clone(existing);
        }

        let rc: Rc<str> = Rc::from(s);
        cache.insert(s.to_string(), Rc::clone(&rc));
        rc
    })
}

/// Clear the intern cache (useful for testing or memory management)
#[cfg(test)]
pub(crate) fn clear() {
    INTERNER.with(|interner| {
        interner.borrow_mut().clear();
    });
}
