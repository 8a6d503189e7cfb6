//! Simple/Complex classification of parameters.

use std::collections::HashSet;
use serde::Serialize;

use crate::config::DEFAULT_SIMPLE_TYPES;
use crate::ir::Parameter;

/// How a parameter travels once the call is reduced to a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParameterClass {
    /// Bound from the query string.
    Simple,
    /// Carried in the request body (or, for outputs, in the response).
    Complex,
}

/// Lexical classifier over an allow-list of simple type names.
#[derive(Debug, Clone)]
pub struct TypeClassifier {
    simple_types: HashSet<String>,
}

impl TypeClassifier {
    pub fn new<I, S>(simple_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            simple_types: simple_types.into_iter().map(Into::into).collect(),
        }
    }

    /// Output parameters are always Complex; anything not on the allow-list is Complex.
    pub fn classify(&self, parameter: &Parameter) -> ParameterClass {
        if !parameter.is_output && self.simple_types.contains(&parameter.declared_type) {
            ParameterClass::Simple
        } else {
            ParameterClass::Complex
        }
    }

    pub fn is_simple(&self, parameter: &Parameter) -> bool {
        self.classify(parameter) == ParameterClass::Simple
    }

    /// Complex parameters that are not outputs, in declaration order.
    pub fn complex_inputs<'p>(&self, parameters: &'p [Parameter]) -> Vec<&'p Parameter> {
        parameters
            .iter()
            .filter(|p| !p.is_output && !self.is_simple(p))
            .collect()
    }
}

impl Default for TypeClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SIMPLE_TYPES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list_members_are_simple() {
        let classifier = TypeClassifier::default();
        for ty in ["int", "string", "bool", "DateTime", "int?", "bool?", "DateTime?"] {
            assert_eq!(classifier.classify(&Parameter::new("p", ty)), ParameterClass::Simple, "{ty}");
        }
    }

    #[test]
    fn test_unknown_types_are_complex() {
        let classifier = TypeClassifier::default();
        assert_eq!(classifier.classify(&Parameter::new("order", "Order")), ParameterClass::Complex);
        assert_eq!(classifier.classify(&Parameter::new("ids", "List<int>")), ParameterClass::Complex);
        // Exact match only.
        assert_eq!(classifier.classify(&Parameter::new("n", "Int32")), ParameterClass::Complex);
    }

    #[test]
    fn test_output_parameters_are_always_complex() {
        let classifier = TypeClassifier::default();
        assert_eq!(classifier.classify(&Parameter::output("count", "int")), ParameterClass::Complex);
    }

    #[test]
    fn test_custom_allow_list() {
        let classifier = TypeClassifier::new(["Guid"]);
        assert!(classifier.is_simple(&Parameter::new("id", "Guid")));
        assert!(!classifier.is_simple(&Parameter::new("id", "int")));
    }

    #[test]
    fn test_complex_inputs_skip_outputs() {
        let classifier = TypeClassifier::default();
        let params = vec![
            Parameter::new("term", "string"),
            Parameter::new("filter", "Filter"),
            Parameter::output("total", "Summary"),
        ];
        let names: Vec<&str> = classifier.complex_inputs(&params).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["filter"]);
    }
}
