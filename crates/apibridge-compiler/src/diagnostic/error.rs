//! Compiler error types.
#![allow(unused_assignments)]

use std::fmt;
use std::path::PathBuf;
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::ir::CorrelationKey;

/// Errors that can occur during compilation.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum CompilerError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to access '{}': {message}", path.display())]
    #[diagnostic(code(apibridge::io::access_failed))]
    IoError {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("Failed to initialize parser")]
    #[diagnostic(code(apibridge::parse::init_failed))]
    ParserInitFailed,

    #[error("Failed to parse file: {}", path.display())]
    #[diagnostic(code(apibridge::parse::parse_failed))]
    ParseFailed {
        path: PathBuf,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration file '{}': {message}", path.display())]
    #[diagnostic(
        code(apibridge::config::invalid),
        help("The configuration file must be a JSON object, e.g. {{ \"serviceDir\": \"wcf/services\" }}")
    )]
    InvalidConfig {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Structure Errors
    // =========================================================================
    #[error("No service classes found in '{}'", dir.display())]
    #[diagnostic(
        code(apibridge::structure::no_services),
        help("The service directory must contain *.cs files declaring a public service class")
    )]
    NoServices {
        dir: PathBuf,
    },

    #[error("Service '{service}' declares '{key}' more than once")]
    #[diagnostic(
        code(apibridge::structure::duplicate_signature),
        help("Two declarations with identical names and parameter lists cannot be told apart; remove one")
    )]
    DuplicateSignature {
        service: String,
        key: CorrelationKey,
    },

    // =========================================================================
    // Naming Errors
    // =========================================================================
    #[error("Overloads of '{procedure}' in '{service}' cannot be given distinct names: '{candidate}' for '{key}' is already taken")]
    #[diagnostic(
        code(apibridge::naming::ambiguous_overload),
        help("Overloads that only differ in parameter types need distinct parameter names; rename a parameter in one of them")
    )]
    AmbiguousOverload {
        service: String,
        procedure: String,
        key: CorrelationKey,
        candidate: String,
    },

    // =========================================================================
    // Frontend Errors
    // =========================================================================
    #[error("Unsupported language: {language}")]
    #[diagnostic(code(apibridge::frontend::unsupported_language))]
    UnsupportedLanguage {
        language: String,
    },
}

impl CompilerError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Why the name + arity fallback could not pick a callee procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CorrelationFailure {
    /// The callee declares nothing with the caller's name.
    NoProcedureNamed,
    /// Procedures with the name exist, but none with the caller's parameter count.
    ArityMismatch { available: Vec<usize> },
    /// More than one procedure shares the caller's name and parameter count.
    Ambiguous { candidates: Vec<CorrelationKey> },
}

impl fmt::Display for CorrelationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationFailure::NoProcedureNamed => {
                write!(f, "no procedure with that name")
            }
            CorrelationFailure::ArityMismatch { available } => {
                let counts: Vec<String> = available.iter().map(|c| c.to_string()).collect();
                write!(f, "no overload with that parameter count (available: {})", counts.join(", "))
            }
            CorrelationFailure::Ambiguous { candidates } => {
                let keys: Vec<String> = candidates.iter().map(|k| k.to_string()).collect();
                write!(f, "several overloads share name and parameter count: {}", keys.join("; "))
            }
        }
    }
}

/// A caller-side procedure with no unique callee-side counterpart.
///
/// Both matching rules have failed by the time this is produced: the exact signature was not
/// found, and the name + arity fallback failed for the recorded [`CorrelationFailure`].
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Serialize)]
#[error("Cannot correlate '{caller}' in '{service}': exact signature not found; {failure}")]
#[diagnostic(
    code(apibridge::correlate::no_match),
    help("Make the caller and service declarations agree on the procedure name and parameter list")
)]
pub struct CorrelationError {
    pub service: String,
    pub caller: CorrelationKey,
    pub failure: CorrelationFailure,
    /// `file:line` of the caller declaration, when known.
    pub location: Option<String>,
}
