//! Shared C# text helpers for the emitters.

use std::path::Path;

use crate::shape::SyntheticAggregate;

/// One indentation level.
pub const INDENT: &str = "    ";

/// File header naming the source file. Contains no timestamp.
pub fn file_header(source: &Path) -> String {
    let source_name = source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| source.display().to_string());

    format!(
        r#"//------------------------------------------------------------------------------
// <auto-generated>
//     This code was generated by apibridge from {source_name}.
//     Changes to this file will be lost when the code is regenerated.
// </auto-generated>
//------------------------------------------------------------------------------
"#
    )
}

/// Renders `using` lines: `fixed` first, then `extra` minus anything matching `excluded`
/// (by prefix), without duplicates.
pub fn render_usings(fixed: &[&str], extra: &[String], excluded: &[&str]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    let candidates = fixed
        .iter()
        .copied()
        .chain(extra.iter().map(String::as_str))
        .filter(|u| !excluded.iter().any(|e| u.starts_with(*e)));

    for using in candidates {
        if !seen.contains(&using) {
            seen.push(using);
        }
    }

    seen.iter().map(|u| format!("using {u};\n")).collect()
}

/// `{ns}.{suffix}`, or `fallback` when the source declared no namespace.
pub fn target_namespace(namespace: Option<&str>, suffix: &str, fallback: &str) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{ns}.{suffix}"),
        _ => fallback.to_string(),
    }
}

/// A nested POCO class for a synthesized aggregate, indented two levels.
pub fn render_aggregate_class(aggregate: &SyntheticAggregate) -> String {
    let pad = INDENT.repeat(2);
    let mut code = format!("{pad}public class {}\n{pad}{{\n", aggregate.type_name);
    for field in &aggregate.fields {
        code.push_str(&format!("{pad}{INDENT}public {} {} {{ get; set; }}\n", field.field_type, field.name));
    }
    code.push_str(&format!("{pad}}}\n"));
    code
}

/// Names for locals an emitter introduces into a method body.
///
/// Every name handed out is distinct from the method's parameter names and from earlier
/// locals. A clash gets a numeric suffix: `response` becomes `response1`.
#[derive(Debug, Default)]
pub struct LocalNames {
    taken: Vec<String>,
}

impl LocalNames {
    pub fn new<I, S>(parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            taken: parameters.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fresh(&mut self, base: &str) -> String {
        let mut name = base.to_string();
        let mut suffix = 1;
        while self.taken.contains(&name) {
            name = format!("{base}{suffix}");
            suffix += 1;
        }
        self.taken.push(name.clone());
        name
    }
}

/// Whether a declared type is a string and must be URL-encoded in a query string.
pub fn is_string_type(declared_type: &str) -> bool {
    matches!(declared_type, "string" | "String" | "System.String")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::AggregateField;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_usings_skips_duplicates_and_exclusions() {
        let extra = vec![
            "System".to_string(),
            "System.ServiceModel".to_string(),
            "System.ServiceModel.Channels".to_string(),
            "Legacy.Models".to_string(),
        ];
        let code = render_usings(&["System", "System.Text"], &extra, &["System.ServiceModel"]);
        assert_eq!(code, "using System;\nusing System.Text;\nusing Legacy.Models;\n");
    }

    #[test]
    fn test_target_namespace_fallback() {
        assert_eq!(target_namespace(Some("Legacy"), "Services", "ApiServices"), "Legacy.Services");
        assert_eq!(target_namespace(None, "Services", "ApiServices"), "ApiServices");
    }

    #[test]
    fn test_render_aggregate_class() {
        let aggregate = SyntheticAggregate {
            type_name: "PlaceResponse".to_string(),
            fields: vec![
                AggregateField {
                    name: "Result".to_string(),
                    field_type: "bool".to_string(),
                },
                AggregateField {
                    name: "ConfirmationId".to_string(),
                    field_type: "int".to_string(),
                },
            ],
        };
        let code = render_aggregate_class(&aggregate);
        assert!(code.contains("        public class PlaceResponse\n"));
        assert!(code.contains("            public bool Result { get; set; }\n"));
        assert!(code.contains("            public int ConfirmationId { get; set; }\n"));
    }

    #[test]
    fn test_header_has_no_timestamp() {
        let header = file_header(Path::new("svc/OrderService.svc.cs"));
        assert!(header.contains("generated by apibridge from OrderService.svc.cs"));
        assert_eq!(header, file_header(Path::new("svc/OrderService.svc.cs")));
    }

    #[test]
    fn test_local_names_avoid_parameters() {
        let mut locals = LocalNames::new(["response", "response1", "content"]);
        assert_eq!(locals.fresh("response"), "response2");
        assert_eq!(locals.fresh("requestUri"), "requestUri");
        assert_eq!(locals.fresh("requestUri"), "requestUri1");
        assert_eq!(locals.fresh("content"), "content1");
    }
}
