//! Debug script to see what the parser produces.
//!
//! Usage: `debug_parse [FILE.cs]`. Without an argument a built-in sample is parsed.

use std::path::{Path, PathBuf};
use apibridge_compiler::frontend::csharp::parser::CSharpParser;
use apibridge_compiler::frontend::csharp::to_ir;

fn main() {
    let sample = r#"
using System.ServiceModel;

namespace Legacy.Orders
{
    public class OrderService : IOrderService
    {
        public Order GetOrder(int orderId) { return null; }
        public bool Place(Order order, out int confirmationId) { confirmationId = 0; return true; }
        public List<Order> Search(string term, Filter filter, SortOptions sort, int take = 10) { return null; }
    }
}
"#;

    let (source, path) = match std::env::args().nth(1) {
        Some(file) => (std::fs::read_to_string(&file).unwrap(), PathBuf::from(file)),
        None => (sample.to_string(), PathBuf::from("OrderService.svc.cs")),
    };

    let mut parser = CSharpParser::new().unwrap();
    let result = parser.parse(&source, Path::new(&path));

    match result {
        Ok(parsed) => {
            println!("Parsed file: {:?} (errors: {})", parsed.path, parsed.has_errors);
            println!("Namespace: {:?}", parsed.namespace);
            println!("Usings: {:?}", parsed.usings);
            println!("\nTypes:");
            for decl in &parsed.types {
                println!("  {:?} {} (public: {})", decl.kind, decl.name, decl.is_public);
                for method in &decl.methods {
                    println!("    {} {} public={}", method.return_type, method.name, method.is_public);
                    for param in &method.parameters {
                        println!(
                            "      {:?} {} {} default={:?}",
                            param.modifiers, param.type_text, param.name, param.default_value
                        );
                    }
                }
            }
            if let Some(service) = to_ir::to_service(&parsed) {
                println!("\nAs service '{}':", service.name);
                for procedure in &service.procedures {
                    println!("  {}", procedure.correlation_key());
                }
            }
        }
        Err(e) => {
            println!("Error: {:?}", e);
        }
    }
}
