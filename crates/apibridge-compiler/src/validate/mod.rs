//! Validation of service IR before planning.

mod structure;

use crate::diagnostic::CompilerError;
use crate::ir::ServiceIR;

/// Validates one service. Failures are scoped to that service.
pub fn validate_service(service: &ServiceIR) -> Result<(), CompilerError> {
    structure::validate_unique_signatures(service)?;
    Ok(())
}
