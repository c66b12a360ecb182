//! Smart Calculator: an interactive integer calculator with variables.
//!
//! Each input line is one of a `/command`, a `name = value` assignment, or
//! an arithmetic expression.  Expressions go through variable substitution
//! and operator normalization before evaluation:
//!
//! ```rust
//! use smartcalc::Calculator;
//!
//! let mut calc = Calculator::new();
//! calc.exec_line("n = 5");
//! calc.exec_line("n ^ 2 / 3");
//! assert_eq!(calc.output, vec!["8", ""]);
//! ```

pub mod calc;
pub mod cli;
pub mod config;
pub mod error;
pub mod expr;
pub mod preprocess;
pub mod symbol;

// Re-exports for convenience.
pub use calc::Calculator;
pub use error::CalcError;
pub use symbol::SymbolTable;
