// Library API for the crossword grid filler: a CSP pipeline of node
// consistency, AC-3 arc consistency, and heuristic backtracking search.
pub mod assignment;
pub mod consistency;
pub mod domains;
pub mod errors;
pub mod grid;
mod interner;
pub mod log;
pub mod solver;
pub mod word_list;
