//! calcpro-engine - Calculation core for Calculator Pro+
//!
//! Evaluates display-layer arithmetic, applies scientific keypad functions and
//! formats every result through one shared policy.
//!
//! # Features
//!
//! - **Expression evaluation**: `+ - × ÷ ^ ( ) %`, constants `π` and `e`,
//!   exponent literals; a dedicated arithmetic parser, no general interpreter
//! - **Scientific functions**: trigonometric, logarithmic, rounding,
//!   factorial and more, with domain checking and a display label
//! - **Result formatting**: near-zero collapse, exponential notation for large
//!   magnitudes, 15 significant digits otherwise
//! - **History**: newest-first log capped at 100 entries, plain-text export
//! - **Session**: expression, reset flag, memory register, converters and
//!   statistics behind one state machine, with best-effort persistence and a
//!   keyboard mapping onto keypad actions
//!
//! # Example
//!
//! ```rust
//! use calcpro_engine::{Session, ScientificFunction};
//!
//! let mut session = Session::new();
//! for token in ["2", "+", "3", "×", "4"] {
//!     session.input(token);
//! }
//! assert_eq!(session.evaluate().unwrap().as_deref(), Some("14"));
//!
//! session.input("1");
//! session.input("6");
//! session.apply_function(ScientificFunction::Sqrt).unwrap();
//! assert_eq!(session.expression(), "4");
//! assert_eq!(session.history().len(), 2);
//!
//! // Pure entry points
//! assert_eq!(calcpro_engine::evaluate("2^10").unwrap(), "1024");
//! assert_eq!(calcpro_engine::format_result(0.1 + 0.2), "0.3");
//! ```
//!
//! # Scientific functions
//!
//! | Id | Domain | Label |
//! |----|--------|-------|
//! | `square`, `cube` | any | `(x)²`, `(x)³` |
//! | `sqrt` | x ≥ 0 | `√(x)` |
//! | `cbrt` | any | `∛(x)` |
//! | `factorial` | integer 0..=170 | `(x)!` |
//! | `asin`, `acos` | -1 ≤ x ≤ 1 | `sin⁻¹(x)`, `cos⁻¹(x)` |
//! | `log`, `ln`, `log2` | x > 0 | `log(x)`, `ln(x)`, `log₂(x)` |
//! | `reciprocal` | x ≠ 0 | `1/(x)` |
//! | `pi`, `e` | - | sets the expression to the constant |
//! | `pow` | - | appends `^` |

pub mod builtin_functions;
pub mod conversion;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod history;
pub mod session;
pub mod state;
pub mod statistics;

// Re-exports for convenience
pub use builtin_functions::{dispatch, Dispatch, FunctionResult, ScientificFunction};
pub use conversion::{Conversion, UnitCategory};
pub use error::{CalcError, ErrorKind, Result};
pub use evaluator::evaluate;
pub use format::format_result;
pub use history::{Category, History, HistoryEntry, HISTORY_CAPACITY};
pub use session::{Key, Session};
pub use state::{
    open_store, FileSessionStore, MemorySessionStore, NullSessionStore, Preferences,
    SessionStore, Snapshot,
};
pub use statistics::{Dataset, Summary};
