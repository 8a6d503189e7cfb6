//! Matching caller-side declarations to callee-side implementations.

use std::collections::HashMap;

use crate::diagnostic::{CorrelationError, CorrelationFailure};
use crate::ir::{CorrelationKey, ProcedureSignature};

/// Indexed, read-only view of a callee pool.
#[derive(Debug)]
pub struct CorrelationPool<'a> {
    service: &'a str,
    by_key: HashMap<CorrelationKey, &'a ProcedureSignature>,
    by_name: HashMap<&'a str, Vec<&'a ProcedureSignature>>,
}

impl<'a> CorrelationPool<'a> {
    pub fn new(service: &'a str, procedures: &'a [ProcedureSignature]) -> Self {
        let mut by_key = HashMap::with_capacity(procedures.len());
        let mut by_name: HashMap<&str, Vec<&ProcedureSignature>> = HashMap::new();

        for procedure in procedures {
            by_key.entry(procedure.correlation_key()).or_insert(procedure);
            by_name.entry(procedure.name.as_str()).or_default().push(procedure);
        }

        Self {
            service,
            by_key,
            by_name,
        }
    }

    /// Finds the callee procedure for `caller`.
    ///
    /// An exact key match wins. Otherwise exactly one procedure with the same name and
    /// parameter count must exist; zero or several is a [`CorrelationError`].
    pub fn find_match(&self, caller: &ProcedureSignature) -> Result<&'a ProcedureSignature, CorrelationError> {
        let key = caller.correlation_key();
        if let Some(exact) = self.by_key.get(&key) {
            return Ok(*exact);
        }

        let named = match self.by_name.get(caller.name.as_str()) {
            Some(named) => named,
            None => return Err(self.error(caller, key, CorrelationFailure::NoProcedureNamed)),
        };

        let compatible: Vec<&'a ProcedureSignature> = named
            .iter()
            .copied()
            .filter(|candidate| candidate.is_compatible_with(caller))
            .collect();

        match compatible.as_slice() {
            [single] => Ok(*single),
            [] => {
                let mut available: Vec<usize> = named.iter().map(|p| p.arity()).collect();
                available.sort_unstable();
                available.dedup();
                Err(self.error(caller, key, CorrelationFailure::ArityMismatch { available }))
            }
            several => {
                let candidates = several.iter().map(|p| p.correlation_key()).collect();
                Err(self.error(caller, key, CorrelationFailure::Ambiguous { candidates }))
            }
        }
    }

    fn error(&self, caller: &ProcedureSignature, key: CorrelationKey, failure: CorrelationFailure) -> CorrelationError {
        CorrelationError {
            service: self.service.to_string(),
            caller: key,
            failure,
            location: caller.span.as_ref().map(|s| s.to_string()),
        }
    }
}
