//! Call-shape planning: reduces multi-parameter and `out`-parameter procedures to a single
//! request and a single response.
//!
//! ```text
//! ProcedureSignature ──► classify ──► overload / correlate ──► aggregate ──► CallShape
//! ```
//!
//! Name map and correlation pool are built once per service; the per-procedure transforms
//! that follow only read them and run in parallel.

pub mod aggregate;
pub mod classify;
pub mod correlate;
pub mod naming;
pub mod overload;
pub mod transform;

pub use aggregate::{AggregateField, AggregatePlan, SyntheticAggregate};
pub use classify::{ParameterClass, TypeClassifier};
pub use correlate::CorrelationPool;
pub use overload::{build_name_map, FinalNameMap};
pub use transform::{
    Argument, ArgumentSource, Binding, CallShape, EntryParameter, HttpVerb, ParameterRename, RequestKind,
    ResponseKind, ShapeContext,
};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::diagnostic::{CompilerError, CorrelationError};
use crate::ir::{ClientIR, ProcedureSignature, ServiceIR};

/// A caller-side procedure together with its planned shape, or why it has none.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCall {
    pub caller: ProcedureSignature,
    #[serde(serialize_with = "serialize_outcome")]
    pub outcome: Result<CallShape, CorrelationError>,
}

fn serialize_outcome<S>(outcome: &Result<CallShape, CorrelationError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    enum Outcome<'a> {
        Shape(&'a CallShape),
        Error(&'a CorrelationError),
    }

    match outcome {
        Ok(shape) => Outcome::Shape(shape).serialize(serializer),
        Err(err) => Outcome::Error(err).serialize(serializer),
    }
}

/// Every planned shape of one service and its client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePlan {
    pub service: String,
    /// Callee-side entry points, one per service procedure, in declaration order.
    pub controller: Vec<CallShape>,
    /// Caller-side procedures in declaration order; empty without a client.
    pub client: Vec<ClientCall>,
}

impl ServicePlan {
    pub fn correlation_errors(&self) -> impl Iterator<Item = &CorrelationError> {
        self.client.iter().filter_map(|call| call.outcome.as_ref().err())
    }

    pub fn correlated(&self) -> usize {
        self.client.iter().filter(|call| call.outcome.is_ok()).count()
    }
}

/// Settings shared by every service plan.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub classifier: TypeClassifier,
    pub read_prefix: String,
}

/// Plans the controller shapes of `service` and, when given, the call shapes of its client.
///
/// Fails only when the service's overloads cannot be named; correlation failures are recorded
/// per caller procedure.
pub fn plan_service(
    service: &ServiceIR,
    client: Option<&ClientIR>,
    options: &PlanOptions,
) -> Result<ServicePlan, CompilerError> {
    let names = build_name_map(&service.name, &service.procedures)?;
    if !names.is_empty() {
        debug!(service = %service.name, renamed = names.len(), "Named overloads");
    }
    let pool = CorrelationPool::new(&service.name, &service.procedures);
    let ctx = ShapeContext {
        service: &service.name,
        names: &names,
        classifier: &options.classifier,
        read_prefix: &options.read_prefix,
    };

    let controller: Vec<CallShape> = service
        .procedures
        .par_iter()
        .map(|procedure| ctx.transform(procedure, procedure))
        .collect();

    for shape in &controller {
        debug!(
            service = %service.name,
            procedure = %shape.key,
            final_name = %shape.final_name,
            request = ?shape.request_kind,
            response = ?shape.response_kind,
            "Planned entry point"
        );
    }

    let client: Vec<ClientCall> = client
        .map(|client| {
            client
                .procedures
                .par_iter()
                .map(|caller| ClientCall {
                    caller: caller.clone(),
                    outcome: pool.find_match(caller).map(|callee| ctx.transform(callee, caller)),
                })
                .collect()
        })
        .unwrap_or_default();

    for err in client.iter().filter_map(|call| call.outcome.as_ref().err()) {
        warn!(service = %service.name, procedure = %err.caller, reason = %err.failure, "Skipping client procedure");
    }

    Ok(ServicePlan {
        service: service.name.clone(),
        controller,
        client,
    })
}
