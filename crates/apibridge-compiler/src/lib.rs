//! # apibridge Compiler
//!
//! This crate migrates WCF and ASMX services to ASP.NET Web API. Every service procedure,
//! however many inputs and `out` parameters it declares, is reduced to one request and one
//! response; a controller exposes the result and a generated HTTP client replaces the old
//! service proxy.
//!
//! ## Supported Languages
//!
//! - C# (default)
//!
//! ## Architecture
//!
//! ```text
//! Service + client sources (C#)
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Frontend   │  Language-specific parsing
//! │  (C# → AST)  │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │      IR      │  Services, client contracts, procedure signatures
//! │  (AST → IR)  │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Validate   │  Duplicate signature checks
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │    Shape     │  Classify, name overloads, correlate, synthesize aggregates
//! │ (IR → plan)  │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Codegen    │  Web API controllers + HTTP clients
//! │ (plan → C#)  │
//! └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use apibridge_compiler::{Compiler, CompilerConfig};
//!
//! let config = CompilerConfig {
//!     service_dir: "wcf/services".into(),
//!     client_dir: Some("wcf/clients".into()),
//!     ..CompilerConfig::default()
//! };
//!
//! let compiler = Compiler::new(config);
//! let result = compiler.compile()?;
//! ```

pub mod config;
pub mod frontend;
pub mod ir;
pub mod validate;
pub mod shape;
pub mod codegen;
pub mod diagnostic;

use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use config::CompilerConfig;
pub use diagnostic::{CompilerError, CorrelationError};

use frontend::SourceRole;
use ir::{ClientIR, ProjectIR, ServiceIR};
use shape::{PlanOptions, ServicePlan, TypeClassifier};

/// The main compiler struct that orchestrates the compilation pipeline.
pub struct Compiler {
    config: CompilerConfig,
}

/// A service that could not be planned. Other services are unaffected.
#[derive(Debug)]
pub struct ServiceFailure {
    pub service: String,
    pub error: CompilerError,
}

/// Plans for every service in the project, without generated code.
#[derive(Debug, Default)]
pub struct ProjectPlan {
    pub plans: Vec<ServicePlan>,
    pub failed_services: Vec<ServiceFailure>,
    /// Client contracts whose service was not found.
    pub unmatched_clients: Vec<String>,
}

/// One planned service together with the declarations it was planned from.
struct Planned<'p> {
    service: &'p ServiceIR,
    client: Option<&'p ClientIR>,
    plan: ServicePlan,
}

impl Compiler {
    /// Creates a new compiler with the given configuration.
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Compiles services and clients to Web API controllers and HTTP clients.
    ///
    /// This runs the full pipeline:
    /// 1. Create frontend for the configured language
    /// 2. Parse service and client sources into IR
    /// 3. Validate and plan each service
    /// 4. Generate controllers and clients for every planned service
    /// 5. Write output files
    pub fn compile(&self) -> Result<CompileResult, CompilerError> {
        let project = self.load_project()?;
        let (planned, failed_services) = self.plan_services(&project);

        let mut files = Vec::new();
        for entry in &planned {
            let generated = codegen::generate(entry.service, entry.client, &entry.plan);
            files.extend(write_output(&self.config.service_out_dir, &generated.controllers)?);
            files.extend(write_output(&self.config.client_out_dir, &generated.clients)?);
        }

        let plans: Vec<ServicePlan> = planned.into_iter().map(|p| p.plan).collect();
        Ok(CompileResult::new(plans, failed_services, unmatched_clients(&project), files))
    }

    /// Plans everything and reports problems without writing any files.
    pub fn check(&self) -> Result<CompileResult, CompilerError> {
        let plan = self.plan()?;
        Ok(CompileResult::new(plan.plans, plan.failed_services, plan.unmatched_clients, Vec::new()))
    }

    /// Plans every service without generating code.
    pub fn plan(&self) -> Result<ProjectPlan, CompilerError> {
        let project = self.load_project()?;
        let (planned, failed_services) = self.plan_services(&project);

        Ok(ProjectPlan {
            plans: planned.into_iter().map(|p| p.plan).collect(),
            failed_services,
            unmatched_clients: unmatched_clients(&project),
        })
    }

    fn load_project(&self) -> Result<ProjectIR, CompilerError> {
        let mut frontend = frontend::create_frontend(&self.config.language)?;

        let mut project = frontend.parse_directory(&self.config.service_dir, SourceRole::Service)?;
        if project.services.is_empty() {
            return Err(CompilerError::NoServices {
                dir: self.config.service_dir.clone(),
            });
        }

        if let Some(client_dir) = &self.config.client_dir {
            project.clients = frontend.parse_directory(client_dir, SourceRole::Client)?.clients;
        }

        info!(
            services = project.services.len(),
            clients = project.clients.len(),
            procedures = project.procedure_count(),
            "Parsed sources"
        );
        Ok(project)
    }

    fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            classifier: TypeClassifier::new(self.config.simple_types.iter().cloned()),
            read_prefix: self.config.read_prefix.clone(),
        }
    }

    fn plan_services<'p>(&self, project: &'p ProjectIR) -> (Vec<Planned<'p>>, Vec<ServiceFailure>) {
        let options = self.plan_options();
        let mut planned = Vec::new();
        let mut failed = Vec::new();

        for service in &project.services {
            let client = project.client_for(service);
            let outcome = validate::validate_service(service)
                .and_then(|()| shape::plan_service(service, client, &options));

            match outcome {
                Ok(plan) => {
                    info!(
                        service = %service.name,
                        procedures = plan.controller.len(),
                        correlated = plan.correlated(),
                        "Planned service"
                    );
                    planned.push(Planned { service, client, plan });
                }
                Err(error) => {
                    warn!(service = %service.name, %error, "Skipping service");
                    failed.push(ServiceFailure {
                        service: service.name.clone(),
                        error,
                    });
                }
            }
        }

        (planned, failed)
    }
}

fn unmatched_clients(project: &ProjectIR) -> Vec<String> {
    let unmatched: Vec<String> = project
        .clients
        .iter()
        .filter(|c| project.service_for(c).is_none())
        .map(|c| c.name.clone())
        .collect();

    for name in &unmatched {
        warn!(client = %name, "No service found for client contract");
    }
    unmatched
}

/// Writes generated files into `dir`, creating it if needed.
fn write_output(dir: &Path, files: &[(String, String)]) -> Result<Vec<PathBuf>, CompilerError> {
    if files.is_empty() {
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(dir).map_err(|e| CompilerError::io(dir, e.to_string()))?;

    let mut written = Vec::with_capacity(files.len());
    for (filename, content) in files {
        let path = dir.join(filename);
        std::fs::write(&path, content).map_err(|e| CompilerError::io(&path, e.to_string()))?;
        info!(path = %path.display(), "Wrote file");
        written.push(path);
    }

    Ok(written)
}

/// Result of a compilation run.
#[derive(Debug)]
pub struct CompileResult {
    /// Number of services planned successfully.
    pub services: usize,
    /// Number of controller actions across those services.
    pub procedures: usize,
    /// Number of client procedures routed to a controller action.
    pub client_procedures: usize,
    /// Files written, empty for [`Compiler::check`].
    pub files: Vec<PathBuf>,
    /// Client procedures that could not be correlated; generated as stubs.
    pub skipped: Vec<CorrelationError>,
    pub failed_services: Vec<ServiceFailure>,
    pub unmatched_clients: Vec<String>,
}

impl CompileResult {
    fn new(
        plans: Vec<ServicePlan>,
        failed_services: Vec<ServiceFailure>,
        unmatched_clients: Vec<String>,
        files: Vec<PathBuf>,
    ) -> Self {
        Self {
            services: plans.len(),
            procedures: plans.iter().map(|p| p.controller.len()).sum(),
            client_procedures: plans.iter().map(|p| p.correlated()).sum(),
            files,
            skipped: plans.iter().flat_map(|p| p.correlation_errors().cloned()).collect(),
            failed_services,
            unmatched_clients,
        }
    }

    /// No skipped procedures, failed services or unmatched clients.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed_services.is_empty() && self.unmatched_clients.is_empty()
    }
}
