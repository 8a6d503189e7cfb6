//! C# code generation from planned call shapes.
//!
//! Both emitters read the same [`ServicePlan`]; neither re-derives names, routes or
//! aggregates on its own:
//! - Controllers (ASP.NET Web API actions wrapping the original service class)
//! - Clients (HttpClient wrappers keeping the caller's method signatures)

mod cs_syntax;
pub mod client;
pub mod controller;

use crate::ir::{ClientIR, ServiceIR};
use crate::shape::ServicePlan;

/// Generated C# code, split by destination directory.
#[derive(Debug, Default)]
pub struct GeneratedCode {
    /// Controller filename to content.
    pub controllers: Vec<(String, String)>,
    /// Client filename to content.
    pub clients: Vec<(String, String)>,
}

impl GeneratedCode {
    pub fn file_count(&self) -> usize {
        self.controllers.len() + self.clients.len()
    }
}

/// Generates the controller for `service` and, when given, the HTTP client for `client`.
pub fn generate(service: &ServiceIR, client: Option<&ClientIR>, plan: &ServicePlan) -> GeneratedCode {
    let mut generated = GeneratedCode::default();

    generated.controllers.push((
        controller::controller_file_name(service),
        controller::generate_controller(service, plan),
    ));

    if let Some(client) = client {
        generated
            .clients
            .push((client::client_file_name(client), client::generate_client(client, plan)));
    }

    generated
}
