//! Language-agnostic intermediate representation.
//!
//! This IR is produced by language frontends and consumed by the call-shape planner and the
//! code generators. It describes the declaring types on both sides of the translation: the
//! service classes that implement procedures (callee side) and the client contracts that call
//! them (caller side).

mod procedure;

pub use procedure::{CorrelationKey, Parameter, ProcedureSignature};

use std::path::PathBuf;

/// A service class: the callee-side pool of procedures.
#[derive(Debug, Clone)]
pub struct ServiceIR {
    /// Class name, e.g. `OrderService`.
    pub name: String,
    pub namespace: Option<String>,
    /// Using directives of the source file, verbatim names (`System.Collections.Generic`).
    pub usings: Vec<String>,
    /// Declared in an `.asmx.cs` file rather than a WCF `.svc.cs`/`.cs` file.
    pub is_asmx: bool,
    /// Public methods, in declaration order.
    pub procedures: Vec<ProcedureSignature>,
    pub source_path: PathBuf,
}

/// A client contract: the caller-side pool of procedures.
#[derive(Debug, Clone)]
pub struct ClientIR {
    /// Name of the service this client calls, e.g. `OrderService` for `IOrderService`.
    pub name: String,
    pub namespace: Option<String>,
    pub usings: Vec<String>,
    /// Set when the contract was declared as an interface; generated clients implement it.
    pub interface_name: Option<String>,
    pub procedures: Vec<ProcedureSignature>,
    pub source_path: PathBuf,
}

/// Everything the frontends extracted from the input directories.
#[derive(Debug, Default)]
pub struct ProjectIR {
    pub services: Vec<ServiceIR>,
    pub clients: Vec<ClientIR>,
}

impl ProjectIR {
    /// The service a client calls, matched by name.
    pub fn service_for(&self, client: &ClientIR) -> Option<&ServiceIR> {
        self.services.iter().find(|s| s.name == client.name)
    }

    /// The client contract for a service, if one was parsed.
    pub fn client_for(&self, service: &ServiceIR) -> Option<&ClientIR> {
        self.clients.iter().find(|c| c.name == service.name)
    }

    pub fn procedure_count(&self) -> usize {
        self.services.iter().map(|s| s.procedures.len()).sum()
    }
}
