//! Diagnostic types for error reporting.

mod error;
mod span;

pub use error::{CompilerError, CorrelationError, CorrelationFailure};
pub use span::Span;
