//! Convert C# AST to language-agnostic IR.

use tracing::debug;

use crate::ir::{ClientIR, Parameter, ProcedureSignature, ServiceIR};
use super::ast::*;

/// Builds the service unit of a file: its first public class and that class's public methods.
pub fn to_service(file: &ParsedFile) -> Option<ServiceIR> {
    let class = file
        .types
        .iter()
        .find(|t| t.kind == TypeKind::Class && t.is_public)?;

    let is_asmx = file.path.to_string_lossy().ends_with(".asmx.cs");
    debug!(service = %class.name, is_asmx, path = %file.path.display(), "Found service class");

    Some(ServiceIR {
        name: class.name.clone(),
        namespace: file.namespace.clone(),
        usings: file.usings.clone(),
        is_asmx,
        procedures: public_procedures(class),
        source_path: file.path.clone(),
    })
}

/// Builds the client unit of a file: its first public class, otherwise its first interface.
pub fn to_client(file: &ParsedFile) -> Option<ClientIR> {
    let contract = file
        .types
        .iter()
        .find(|t| t.kind == TypeKind::Class && t.is_public)
        .or_else(|| file.types.iter().find(|t| t.kind == TypeKind::Interface))?;

    let interface_name = (contract.kind == TypeKind::Interface).then(|| contract.name.clone());
    let name = match &interface_name {
        Some(interface) => service_name_of(interface).to_string(),
        None => contract.name.clone(),
    };
    debug!(client = %name, contract = %contract.name, path = %file.path.display(), "Found client contract");

    Some(ClientIR {
        name,
        namespace: file.namespace.clone(),
        usings: file.usings.clone(),
        interface_name,
        procedures: public_procedures(contract),
        source_path: file.path.clone(),
    })
}

/// `IOrderService` -> `OrderService`. Names that do not follow the `I` + uppercase
/// convention are kept as they are.
pub fn service_name_of(interface: &str) -> &str {
    let mut chars = interface.chars();
    match (chars.next(), chars.next()) {
        (Some('I'), Some(second)) if second.is_uppercase() => &interface[1..],
        _ => interface,
    }
}

fn public_procedures(decl: &TypeDecl) -> Vec<ProcedureSignature> {
    decl.methods
        .iter()
        .filter(|m| m.is_public)
        .map(convert_method)
        .collect()
}

fn convert_method(method: &MethodDecl) -> ProcedureSignature {
    let parameters = method
        .parameters
        .iter()
        .map(|p| Parameter {
            name: p.name.clone(),
            declared_type: p.type_text.clone(),
            is_output: p.is_out(),
            default_value: p.default_value.clone(),
        })
        .collect();

    ProcedureSignature::new(method.name.clone(), parameters, method.return_type.clone()).with_span(method.span.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::csharp::parser::CSharpParser;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn parse(source: &str, path: &str) -> ParsedFile {
        CSharpParser::new().unwrap().parse(source, Path::new(path)).unwrap()
    }

    #[test]
    fn test_service_name_of() {
        assert_eq!(service_name_of("IOrderService"), "OrderService");
        assert_eq!(service_name_of("Inventory"), "Inventory");
        assert_eq!(service_name_of("I"), "I");
    }

    #[test]
    fn test_to_service_keeps_public_methods() {
        let file = parse(
            r#"
namespace Legacy
{
    internal class Helper { public void Ignored() { } }

    public class StockService
    {
        public int Count(string sku, out bool reserved) { reserved = false; return 0; }
        internal void Hidden() { }
    }
}
"#,
            "Stock/StockService.asmx.cs",
        );

        let service = to_service(&file).unwrap();
        assert_eq!(service.name, "StockService");
        assert!(service.is_asmx);
        assert_eq!(service.procedures.len(), 1);
        assert_eq!(
            service.procedures[0].correlation_key().as_str(),
            "Count(string sku, out bool reserved)"
        );
        assert!(service.procedures[0].span.is_some());
    }

    #[test]
    fn test_to_client_from_interface() {
        let file = parse(
            r#"
namespace Legacy.Proxies
{
    public interface IStockService
    {
        int Count(string code, out bool reserved);
    }
}
"#,
            "IStockService.cs",
        );

        let client = to_client(&file).unwrap();
        assert_eq!(client.name, "StockService");
        assert_eq!(client.interface_name.as_deref(), Some("IStockService"));
        assert_eq!(client.namespace.as_deref(), Some("Legacy.Proxies"));
        assert!(client.procedures[0].parameters[1].is_output);
    }

    #[test]
    fn test_to_client_prefers_public_class() {
        let file = parse(
            r#"
public interface IStockService { void Ping(); }
public class StockService : IStockService { public void Ping() { } }
"#,
            "StockService.cs",
        );

        let client = to_client(&file).unwrap();
        assert_eq!(client.name, "StockService");
        assert_eq!(client.interface_name, None);
    }

    #[test]
    fn test_file_without_types() {
        let file = parse("using System;", "Empty.cs");
        assert!(to_service(&file).is_none());
        assert!(to_client(&file).is_none());
    }
}
