/// Route module for the pattern DSL
///
/// Contains the two halves of pattern compilation:
/// - `pattern`: tokenizing a pattern string into terms (pure)
/// - `compiler`: turning terms into an anchored matcher and reading captures back

pub mod compiler;
pub mod pattern;

// Re-export commonly used types
pub use compiler::{matcher_source, CompiledRoute};
pub use pattern::{tokenize, Cardinality, Term, Variable, VariableKind};
