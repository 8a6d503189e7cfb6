//! C# parser using tree-sitter.

use std::path::Path;
use tree_sitter::{Node, Parser};

use crate::diagnostic::{CompilerError, Span};
use super::ast::*;

const PARAMETER_MODIFIERS: &[&str] = &["out", "ref", "in", "params", "this"];

/// C# parser.
pub struct CSharpParser {
    parser: Parser,
}

impl CSharpParser {
    /// Creates a new C# parser.
    pub fn new() -> Result<Self, CompilerError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|_| CompilerError::ParserInitFailed)?;
        Ok(Self { parser })
    }

    /// Parses a C# source file.
    pub fn parse(&mut self, source: &str, path: &Path) -> Result<ParsedFile, CompilerError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| CompilerError::ParseFailed { path: path.to_path_buf() })?;

        let root = tree.root_node();
        let mut visitor = Visitor::new(source, path);
        visitor.visit(root);

        Ok(ParsedFile {
            path: path.to_path_buf(),
            namespace: visitor.namespace,
            usings: visitor.usings,
            types: visitor.types,
            has_errors: root.has_error(),
        })
    }
}

/// Collapses whitespace inside type text: `Dictionary< string ,int >` -> `Dictionary<string, int>`.
///
/// A single space survives only between two identifier characters, as in the tuple
/// `(int a, string b)`.
pub fn normalize_type(text: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut normalized = String::with_capacity(text.len());

    for token in text.split_whitespace() {
        let joins_words = matches!(
            (normalized.chars().last(), token.chars().next()),
            (Some(prev), Some(next)) if is_word(prev) && is_word(next)
        );
        if joins_words {
            normalized.push(' ');
        }
        normalized.push_str(token);
    }

    normalized.replace(',', ", ")
}

/// AST visitor that extracts declarations from tree-sitter nodes.
struct Visitor<'a> {
    source: &'a str,
    path: &'a Path,
    namespace: Option<String>,
    usings: Vec<String>,
    types: Vec<TypeDecl>,
}

impl<'a> Visitor<'a> {
    fn new(source: &'a str, path: &'a Path) -> Self {
        Self {
            source,
            path,
            namespace: None,
            usings: Vec::new(),
            types: Vec::new(),
        }
    }

    fn span(&self, node: Node) -> Span {
        Span::new(
            self.path.to_path_buf(),
            node.start_position().row,
            node.start_position().column,
            node.end_position().row,
            node.end_position().column,
        )
    }

    fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn visit(&mut self, node: Node) {
        match node.kind() {
            "using_directive" => self.visit_using(node),
            "namespace_declaration" | "file_scoped_namespace_declaration" => {
                if self.namespace.is_none() {
                    self.namespace = node
                        .child_by_field_name("name")
                        .map(|n| normalize_type(self.node_text(n)));
                }
                self.visit_children(node);
            }
            "class_declaration" => self.visit_type(node, TypeKind::Class),
            "interface_declaration" => self.visit_type(node, TypeKind::Interface),
            _ => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child);
        }
    }

    fn visit_using(&mut self, node: Node) {
        let text = self.node_text(node).trim().trim_end_matches(';').trim();
        let text = text.strip_prefix("global").map(str::trim_start).unwrap_or(text);
        if let Some(name) = text.strip_prefix("using") {
            let name = name.trim();
            if !name.is_empty() {
                self.usings.push(name.to_string());
            }
        }
    }

    fn has_modifier(&self, node: Node, modifier: &str) -> bool {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .any(|c| (c.kind() == "modifier" || c.kind() == modifier) && self.node_text(c) == modifier);
        found
    }

    fn visit_type(&mut self, node: Node, kind: TypeKind) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };

        let index = self.types.len();
        self.types.push(TypeDecl {
            name: self.node_text(name).to_string(),
            kind,
            is_public: self.has_modifier(node, "public"),
            methods: Vec::new(),
            span: self.span(node),
        });

        let Some(body) = node.child_by_field_name("body") else {
            return;
        };

        let mut methods = Vec::new();
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "method_declaration" => {
                    if let Some(method) = self.visit_method(member, kind) {
                        methods.push(method);
                    }
                }
                "class_declaration" => self.visit_type(member, TypeKind::Class),
                "interface_declaration" => self.visit_type(member, TypeKind::Interface),
                _ => {}
            }
        }
        self.types[index].methods = methods;
    }

    fn visit_method(&self, node: Node, owner: TypeKind) -> Option<MethodDecl> {
        let name = node.child_by_field_name("name")?;
        let return_type = node
            .child_by_field_name("returns")
            .or_else(|| node.child_by_field_name("type"))?;

        let parameters = match node.child_by_field_name("parameters") {
            Some(list) => self.visit_parameters(list),
            None => Vec::new(),
        };

        Some(MethodDecl {
            name: self.node_text(name).to_string(),
            is_public: owner == TypeKind::Interface || self.has_modifier(node, "public"),
            return_type: normalize_type(self.node_text(return_type)),
            parameters,
            span: self.span(node),
        })
    }

    fn visit_parameters(&self, node: Node) -> Vec<ParameterDecl> {
        let mut cursor = node.walk();
        let parameters = node
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "parameter")
            .filter_map(|c| self.visit_parameter(c))
            .collect();
        parameters
    }

    fn visit_parameter(&self, node: Node) -> Option<ParameterDecl> {
        let name = node.child_by_field_name("name")?;
        let type_node = node.child_by_field_name("type");

        let mut modifiers = Vec::new();
        let mut default_value = None;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.id() == name.id() || type_node.is_some_and(|t| t.id() == child.id()) {
                continue;
            }

            let text = self.node_text(child).trim();
            if child.kind() == "equals_value_clause" {
                let value = text.strip_prefix('=').unwrap_or(text).trim();
                default_value = Some(value.to_string());
            } else if PARAMETER_MODIFIERS.contains(&text) {
                modifiers.push(text.to_string());
            }
        }

        Some(ParameterDecl {
            name: self.node_text(name).to_string(),
            // Untyped parameters only occur in lambdas; keep the slot stable anyway.
            type_text: type_node.map(|t| normalize_type(self.node_text(t))).unwrap_or_default(),
            modifiers,
            default_value,
        })
    }
}
