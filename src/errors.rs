//! Error types for puzzle-model construction with error codes and helpful messages.
//!
//! # Error Codes
//!
//! Each error variant has a unique code (G001-G002) for documentation lookup:
//!
//! - G001: `EmptyStructure` (Grid structure has no cells)
//! - G002: `RaggedStructure` (Grid rows have inconsistent widths)
//!
//! Solver-level errors (`S0xx`) live in [`crate::solver::SolverError`].
//!
//! # Examples
//!
//! ```
//! use gridfill::errors::GridError;
//! use gridfill::grid::Grid;
//!
//! match Grid::new(vec![vec![true, true], vec![true]]) {
//!     Err(e) => {
//!         println!("Error: {}", e);
//!         println!("Code: {}", e.code());
//!         if let Some(help) = e.help() {
//!             println!("Help: {}", help);
//!         }
//!     }
//!     Ok(_) => println!("Success"),
//! }
//! ```

use std::io;

/// Custom error type for puzzle-model construction
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("grid structure is empty (no rows or no columns)")]
    EmptyStructure,

    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedStructure {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl From<GridError> for io::Error {
    fn from(ge: GridError) -> Self {
        // String version is the least fragile (no Send/Sync bounds issues)
        io::Error::new(io::ErrorKind::InvalidInput, ge.to_string())
    }
}

impl GridError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            GridError::EmptyStructure => "G001",
            GridError::RaggedStructure { .. } => "G002",
        }
    }

    /// Returns a helpful suggestion or example for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            GridError::EmptyStructure => {
                Some("Provide at least one row and one column of cells (true = open, false = blocked)")
            }
            GridError::RaggedStructure { .. } => {
                Some("Every row of the cell matrix must have the same number of columns")
            }
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Helper function to format error messages with code and optional help text
pub(crate) fn format_error_with_code_and_help(base_msg: &str, code: &str, help: Option<&str>) -> String {
    if let Some(help_text) = help {
        format!("{base_msg} ({code})\n{help_text}")
    } else {
        format!("{base_msg} ({code})")
    }
}
