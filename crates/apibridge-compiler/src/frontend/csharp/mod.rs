//! C# frontend: WCF/ASMX service classes and their client contracts.

pub mod ast;
pub mod parser;
pub mod to_ir;

use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

use crate::diagnostic::CompilerError;
use crate::ir::ProjectIR;
use super::{Frontend, SourceRole};
use parser::CSharpParser;

/// C# frontend implementation.
pub struct CSharpFrontend {
    parser: CSharpParser,
}

impl CSharpFrontend {
    /// Creates a new C# frontend.
    pub fn new() -> Result<Self, CompilerError> {
        Ok(Self {
            parser: CSharpParser::new()?,
        })
    }
}

impl Frontend for CSharpFrontend {
    fn language(&self) -> &str {
        "csharp"
    }

    fn extensions(&self) -> &[&str] {
        &["cs"]
    }

    fn parse_source(&mut self, source: &str, path: &Path, role: SourceRole) -> Result<ProjectIR, CompilerError> {
        let parsed = self.parser.parse(source, path)?;
        if parsed.has_errors {
            warn!(path = %path.display(), "File contains syntax errors; declarations may be incomplete");
        }

        let mut project = ProjectIR::default();
        match role {
            SourceRole::Service => project.services.extend(to_ir::to_service(&parsed)),
            SourceRole::Client => project.clients.extend(to_ir::to_client(&parsed)),
        }
        Ok(project)
    }

    fn parse_directory(&mut self, dir: &Path, role: SourceRole) -> Result<ProjectIR, CompilerError> {
        if !dir.is_dir() {
            return Err(CompilerError::io(dir, "not a directory"));
        }

        let mut project = ProjectIR::default();

        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension() else {
                continue;
            };
            if !self.extensions().contains(&ext.to_string_lossy().as_ref()) {
                continue;
            }

            let source = std::fs::read_to_string(path).map_err(|e| CompilerError::io(path, e.to_string()))?;
            let parsed = self.parse_source(&source, path, role)?;
            project.services.extend(parsed.services);
            project.clients.extend(parsed.clients);
        }

        Ok(project)
    }
}
