//! Deterministic, collision-free names for overloaded procedures.
//!
//! The target convention routes by name, so every member of an overload group needs a name
//! of its own. Members are visited in ascending parameter count (ties in declaration order)
//! and each one is named by the first rule that applies:
//!
//! - **bare**: at most one parameter and the bare name is still free;
//! - **unique parameter**: the first parameter whose name occurs once in the group, `FooByB`;
//! - **rarest prefix**: parameters ordered by how often their name occurs in the group, the
//!   shortest free `FooByXY...` built from that order.
//!
//! Every name is reserved exactly once. Trying to reserve a taken name is an
//! [`CompilerError::AmbiguousOverload`], never a silent overwrite.

use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::diagnostic::CompilerError;
use crate::ir::{CorrelationKey, ProcedureSignature};
use super::naming::capitalize;

/// Final names for the members of overload groups, keyed by declaration.
#[derive(Debug, Clone, Default)]
pub struct FinalNameMap {
    names: HashMap<CorrelationKey, String>,
}

impl FinalNameMap {
    /// The name a procedure is exposed under. Procedures outside any overload group keep
    /// their own name.
    pub fn final_name<'a>(&'a self, signature: &'a ProcedureSignature) -> &'a str {
        self.get(&signature.correlation_key()).unwrap_or(&signature.name)
    }

    pub fn get(&self, key: &CorrelationKey) -> Option<&str> {
        self.names.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Naming state threaded through one overload group.
#[derive(Default)]
struct NamingState {
    reserved: HashSet<String>,
    assigned: Vec<(CorrelationKey, String)>,
}

impl NamingState {
    fn is_free(&self, name: &str) -> bool {
        !self.reserved.contains(name)
    }

    fn reserve(&mut self, name: String, group: &Group<'_>, key: &CorrelationKey) -> Result<(), CompilerError> {
        if !self.reserved.insert(name.clone()) {
            return Err(group.ambiguous(key, name));
        }
        Ok(())
    }

    fn assign(mut self, key: CorrelationKey, name: String, group: &Group<'_>) -> Result<Self, CompilerError> {
        self.reserve(name.clone(), group, &key)?;
        self.assigned.push((key, name));
        Ok(self)
    }
}

/// One overload group: every procedure in a pool sharing `name`.
struct Group<'a> {
    service: &'a str,
    name: &'a str,
    members: Vec<&'a ProcedureSignature>,
    /// Occurrences of each parameter name across the whole group.
    counts: HashMap<&'a str, usize>,
}

impl<'a> Group<'a> {
    fn new(service: &'a str, name: &'a str, mut members: Vec<&'a ProcedureSignature>) -> Self {
        // Stable: ties keep declaration order.
        members.sort_by_key(|m| m.arity());

        let mut counts = HashMap::new();
        for member in &members {
            for param in &member.parameters {
                *counts.entry(param.name.as_str()).or_insert(0) += 1;
            }
        }

        Self {
            service,
            name,
            members,
            counts,
        }
    }

    fn count(&self, param: &str) -> usize {
        self.counts.get(param).copied().unwrap_or(0)
    }

    fn by(&self, params: &[&str]) -> String {
        let suffix: String = params.iter().map(|p| capitalize(p)).collect();
        format!("{}By{}", self.name, suffix)
    }

    fn ambiguous(&self, key: &CorrelationKey, candidate: String) -> CompilerError {
        CompilerError::AmbiguousOverload {
            service: self.service.to_string(),
            procedure: self.name.to_string(),
            key: key.clone(),
            candidate,
        }
    }

    fn name_member(&self, mut state: NamingState, member: &ProcedureSignature) -> Result<NamingState, CompilerError> {
        let key = member.correlation_key();
        let params: Vec<&str> = member.parameters.iter().map(|p| p.name.as_str()).collect();

        if params.len() <= 1 && state.is_free(self.name) {
            if let Some(only) = params.first() {
                state.reserve(self.by(&[only]), self, &key)?;
            }
            return state.assign(key, self.name.to_string(), self);
        }

        if let Some(unique) = params.iter().find(|p| self.count(p) == 1) {
            return state.assign(key, self.by(&[unique]), self);
        }

        let mut rarest = params.clone();
        rarest.sort_by_key(|p| self.count(p));

        let mut candidate = self.name.to_string();
        for k in 1..=rarest.len() {
            candidate = self.by(&rarest[..k]);
            if state.is_free(&candidate) {
                return state.assign(key, candidate, self);
            }
        }

        Err(self.ambiguous(&key, candidate))
    }

    fn resolve(&self) -> Result<Vec<(CorrelationKey, String)>, CompilerError> {
        let state = self
            .members
            .iter()
            .try_fold(NamingState::default(), |state, member| self.name_member(state, member))?;
        Ok(state.assigned)
    }
}

/// Assigns final names to every overload group in `procedures`.
///
/// Fails with [`CompilerError::AmbiguousOverload`] when a group cannot be given distinct names,
/// e.g. `Foo(int a)` next to `Foo(string a)`.
pub fn build_name_map(service: &str, procedures: &[ProcedureSignature]) -> Result<FinalNameMap, CompilerError> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_name: HashMap<&str, Vec<&ProcedureSignature>> = HashMap::new();
    for procedure in procedures {
        let members = by_name.entry(procedure.name.as_str()).or_default();
        if members.is_empty() {
            order.push(procedure.name.as_str());
        }
        members.push(procedure);
    }

    let mut map = FinalNameMap::default();
    for name in order {
        let members = by_name.remove(name).unwrap_or_default();
        if members.len() < 2 {
            continue;
        }

        let group = Group::new(service, name, members);
        for (key, final_name) in group.resolve()? {
            debug!(service, procedure = %key, final_name = %final_name, "Named overload");
            map.names.insert(key, final_name);
        }
    }

    Ok(map)
}
