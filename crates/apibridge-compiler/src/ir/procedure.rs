//! Procedure signatures and the keys used to correlate them.

use std::fmt;
use serde::Serialize;

use crate::diagnostic::Span;

/// A single declared parameter of a procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    /// Whitespace-normalised type text, e.g. `Dictionary<string, int>`.
    pub declared_type: String,
    /// Declared with `out`: the callee hands a value back through it.
    pub is_output: bool,
    /// Source text of the default value, without the `=`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            is_output: false,
            default_value: None,
        }
    }

    /// An `out` parameter.
    pub fn output(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            is_output: true,
            ..Self::new(name, declared_type)
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn has_default_value(&self) -> bool {
        self.default_value.is_some()
    }

    /// Canonical declaration text: `[out ]{type} {name}[ = {default}]`.
    pub fn render(&self) -> String {
        let mut text = String::new();
        if self.is_output {
            text.push_str("out ");
        }
        text.push_str(&self.declared_type);
        text.push(' ');
        text.push_str(&self.name);
        if let Some(default) = &self.default_value {
            text.push_str(" = ");
            text.push_str(default);
        }
        text
    }
}

/// A remote-callable procedure as declared on one side of the translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureSignature {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl ProcedureSignature {
    pub fn new(name: impl Into<String>, parameters: Vec<Parameter>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type: return_type.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_void(&self) -> bool {
        self.return_type == "void"
    }

    pub fn has_output_parameters(&self) -> bool {
        self.parameters.iter().any(|p| p.is_output)
    }

    /// Rendered parameter list without the surrounding parentheses.
    pub fn parameter_list_text(&self) -> String {
        self.parameters
            .iter()
            .map(Parameter::render)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn correlation_key(&self) -> CorrelationKey {
        CorrelationKey(format!("{}({})", self.name, self.parameter_list_text()))
    }

    /// Whether both declarations have the same name and parameter count.
    pub fn is_compatible_with(&self, other: &ProcedureSignature) -> bool {
        self.name == other.name && self.arity() == other.arity()
    }
}

/// `name(parameter list)`: identifies one declaration within a pool, overloads included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CorrelationKey(String);

impl CorrelationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
