//! C#-specific AST types.

use std::path::PathBuf;
use crate::diagnostic::Span;

/// A parsed C# file.
#[derive(Debug)]
pub struct ParsedFile {
    pub path: PathBuf,
    /// First namespace declared in the file, block or file-scoped.
    pub namespace: Option<String>,
    /// Using directives without the `using` keyword, e.g. `System.Collections.Generic`.
    pub usings: Vec<String>,
    /// Type declarations in document order, nested types after their parent.
    pub types: Vec<TypeDecl>,
    /// tree-sitter recovered from syntax errors somewhere in the file.
    pub has_errors: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
}

/// A class or interface declaration.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    pub is_public: bool,
    pub methods: Vec<MethodDecl>,
    pub span: Span,
}

/// A method declaration.
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    /// Declared `public`, or declared in an interface.
    pub is_public: bool,
    pub return_type: String,
    pub parameters: Vec<ParameterDecl>,
    pub span: Span,
}

/// A formal parameter.
#[derive(Debug, Clone)]
pub struct ParameterDecl {
    pub name: String,
    pub type_text: String,
    /// Parameter modifiers such as `out`, `ref`, `params`.
    pub modifiers: Vec<String>,
    pub default_value: Option<String>,
}

impl ParameterDecl {
    pub fn is_out(&self) -> bool {
        self.modifiers.iter().any(|m| m == "out")
    }
}
