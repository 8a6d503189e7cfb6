//! Structure validation for service pools.
//!
//! Correlation and overload naming key procedures by name and parameter list, so a pool
//! must not declare the same key twice.

use std::collections::HashSet;

use crate::diagnostic::CompilerError;
use crate::ir::ServiceIR;

/// Rejects a service that declares two procedures with the same correlation key.
pub fn validate_unique_signatures(service: &ServiceIR) -> Result<(), CompilerError> {
    let mut seen = HashSet::with_capacity(service.procedures.len());
    for procedure in &service.procedures {
        let key = procedure.correlation_key();
        if !seen.insert(key.clone()) {
            return Err(CompilerError::DuplicateSignature {
                service: service.name.clone(),
                key,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Parameter, ProcedureSignature};
    use std::path::PathBuf;

    fn service(procedures: Vec<ProcedureSignature>) -> ServiceIR {
        ServiceIR {
            name: "Svc".to_string(),
            namespace: None,
            usings: vec![],
            is_asmx: false,
            procedures,
            source_path: PathBuf::from("Svc.cs"),
        }
    }

    #[test]
    fn test_overloads_are_allowed() {
        let svc = service(vec![
            ProcedureSignature::new("Find", vec![Parameter::new("id", "int")], "Item"),
            ProcedureSignature::new("Find", vec![Parameter::new("id", "string")], "Item"),
        ]);
        assert!(validate_unique_signatures(&svc).is_ok());
    }

    #[test]
    fn test_duplicate_signature() {
        let svc = service(vec![
            ProcedureSignature::new("Find", vec![Parameter::new("id", "int")], "Item"),
            ProcedureSignature::new("Find", vec![Parameter::new("id", "int")], "Other"),
        ]);
        let err = validate_unique_signatures(&svc).unwrap_err();
        match err {
            CompilerError::DuplicateSignature { service, key } => {
                assert_eq!(service, "Svc");
                assert_eq!(key.as_str(), "Find(int id)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
