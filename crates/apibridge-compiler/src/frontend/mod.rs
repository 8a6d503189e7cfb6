//! Language frontends for parsing source code into IR.
//!
//! Each frontend is responsible for:
//! 1. Parsing source files in its language
//! 2. Converting the AST to the common IR
//!
//! Services and clients usually live in separate directories, so every parse is told which
//! side of the translation it is reading.

pub mod csharp;

use std::path::Path;
use crate::diagnostic::CompilerError;
use crate::ir::ProjectIR;

/// Which side of the translation a source file declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRole {
    /// Service implementations (callee side).
    Service,
    /// Client contracts or proxies (caller side).
    Client,
}

/// Trait for language frontends.
pub trait Frontend {
    /// Returns the language name (e.g., "csharp").
    fn language(&self) -> &str;

    /// Returns file extensions this frontend handles (e.g., ["cs"]).
    fn extensions(&self) -> &[&str];

    /// Parses a single source file.
    fn parse_source(&mut self, source: &str, path: &Path, role: SourceRole) -> Result<ProjectIR, CompilerError>;

    /// Parses all source files in the given directory, in path order.
    fn parse_directory(&mut self, dir: &Path, role: SourceRole) -> Result<ProjectIR, CompilerError>;
}

/// Creates a frontend for the given language.
pub fn create_frontend(language: &str) -> Result<Box<dyn Frontend>, CompilerError> {
    match language {
        "csharp" | "cs" => Ok(Box::new(csharp::CSharpFrontend::new()?)),
        _ => Err(CompilerError::UnsupportedLanguage {
            language: language.to_string(),
        }),
    }
}
