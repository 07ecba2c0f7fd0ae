//! Calyx is a small embeddable scripting runtime built around a
//! native-function bridge. Script code calls natively-implemented
//! functions through a single marshaling chokepoint that validates
//! arity and argument types before any native code runs; native
//! results cross back as ordinary script values.
//!
//! Two bridge functions come installed: `calculateLevenshteinInC`,
//! exposing the edit-distance engine in [`distance`], and the variadic
//! `print`, which accepts any values and never fails.

pub mod ast;
pub mod diagnostics;
pub mod distance;
pub mod environment;
pub mod host;
pub mod lexer;
pub mod marshal;
pub mod parser;
pub mod registry;
pub mod repl;
pub mod runtime;
pub mod value;

pub use diagnostics::{CalyxError, Diagnostic, DiagnosticKind, SourceSpan};
pub use host::{HostState, RunOutcome, ScriptHost};
pub use repl::Repl;
pub use runtime::Interpreter;
pub use value::{Arity, Value};
