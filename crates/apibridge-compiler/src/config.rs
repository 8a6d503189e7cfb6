//! Compiler configuration.

use std::path::{Path, PathBuf};
use serde::Deserialize;

use crate::diagnostic::CompilerError;

/// Types that bind from a query string when they are not `out` parameters.
pub const DEFAULT_SIMPLE_TYPES: &[&str] = &[
    "int",
    "string",
    "bool",
    "DateTime",
    "int?",
    "bool?",
    "DateTime?",
];

/// Procedures whose name starts with this prefix become GET routes when all parameters are simple.
pub const DEFAULT_READ_PREFIX: &str = "Get";

/// Configuration for the apibridge compiler.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CompilerConfig {
    /// Directory containing the WCF/ASMX service classes.
    pub service_dir: PathBuf,

    /// Directory containing the client contracts. Without it only controllers are generated.
    pub client_dir: Option<PathBuf>,

    /// Directory to write generated controllers.
    pub service_out_dir: PathBuf,

    /// Directory to write generated HTTP clients.
    pub client_out_dir: PathBuf,

    /// Source language (default: "csharp").
    pub language: String,

    /// Declared types treated as simple (query-string bound).
    pub simple_types: Vec<String>,

    /// Name prefix marking read-only procedures.
    pub read_prefix: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            service_dir: PathBuf::from("wcf/services"),
            client_dir: None,
            service_out_dir: PathBuf::from("generated/services"),
            client_out_dir: PathBuf::from("generated/clients"),
            language: "csharp".to_string(),
            simple_types: DEFAULT_SIMPLE_TYPES.iter().map(|t| t.to_string()).collect(),
            read_prefix: DEFAULT_READ_PREFIX.to_string(),
        }
    }
}

impl CompilerConfig {
    /// Loads a JSON configuration file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, CompilerError> {
        let content = std::fs::read_to_string(path).map_err(|e| CompilerError::io(path, e.to_string()))?;

        serde_json::from_str(&content).map_err(|e| CompilerError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, CompilerError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
