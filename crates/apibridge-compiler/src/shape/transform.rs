//! Combines classification, naming and aggregates into one call shape.

use serde::Serialize;

use crate::ir::{CorrelationKey, ProcedureSignature};
use super::aggregate::{insertion_index, output_fields, plan_aggregates, SyntheticAggregate};
use super::classify::{ParameterClass, TypeClassifier};
use super::naming::{lower_first, route_template};
use super::overload::FinalNameMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RequestKind {
    /// Nothing travels in the body.
    None,
    /// The only Complex input is the body as-is.
    SingleComplexParam,
    /// Complex inputs are wrapped in a synthesized request aggregate.
    RequestAggregate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResponseKind {
    Plain,
    ResponseAggregate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HttpVerb {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Binding {
    Query,
    Body,
}

/// One parameter of the callee-side entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryParameter {
    pub name: String,
    pub declared_type: String,
    pub binding: Binding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// Where the value for a callee parameter comes from when the callee is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "from", rename_all = "camelCase")]
pub enum ArgumentSource {
    /// An entry parameter of the same name.
    Entry,
    /// A field of the request aggregate parameter.
    AggregateField { parameter: String, field: String },
    /// An `out` local copied into the response aggregate field afterwards.
    OutputSlot { field: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    pub name: String,
    pub declared_type: String,
    pub source: ArgumentSource,
}

/// A callee parameter name the caller declares under a different name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterRename {
    pub callee: String,
    pub caller: String,
    pub is_output: bool,
}

/// The single-request/single-response form of one procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallShape {
    pub service: String,
    pub procedure: String,
    pub key: CorrelationKey,
    pub final_name: String,
    pub request_kind: RequestKind,
    pub response_kind: ResponseKind,
    pub http_verb: HttpVerb,
    pub route_template: String,
    pub return_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_aggregate: Option<SyntheticAggregate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_aggregate: Option<SyntheticAggregate>,
    pub entry_parameters: Vec<EntryParameter>,
    pub arguments: Vec<Argument>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameter_renames: Vec<ParameterRename>,
}

impl CallShape {
    /// The entry parameter bound to the request body, if any.
    pub fn body_parameter(&self) -> Option<&EntryParameter> {
        self.entry_parameters.iter().find(|p| p.binding == Binding::Body)
    }

    pub fn query_parameters(&self) -> impl Iterator<Item = &EntryParameter> {
        self.entry_parameters.iter().filter(|p| p.binding == Binding::Query)
    }

    /// The type the entry point responds with.
    pub fn response_type(&self) -> &str {
        match &self.response_aggregate {
            Some(aggregate) => &aggregate.type_name,
            None => &self.return_type,
        }
    }

    /// The name the caller uses for a callee parameter.
    pub fn caller_name<'a>(&'a self, callee: &'a str) -> &'a str {
        self.parameter_renames
            .iter()
            .find(|r| r.callee == callee)
            .map(|r| r.caller.as_str())
            .unwrap_or(callee)
    }
}

/// Frozen per-service inputs shared by every transform.
#[derive(Debug, Clone, Copy)]
pub struct ShapeContext<'a> {
    pub service: &'a str,
    pub names: &'a FinalNameMap,
    pub classifier: &'a TypeClassifier,
    pub read_prefix: &'a str,
}

impl ShapeContext<'_> {
    /// Builds the call shape of `callee` as invoked through `caller`.
    ///
    /// Pass the callee twice for the callee-side entry point alone.
    pub fn transform(&self, callee: &ProcedureSignature, caller: &ProcedureSignature) -> CallShape {
        let final_name = self.names.final_name(callee).to_string();
        let plan = plan_aggregates(callee, &final_name, self.classifier);
        let complex_inputs = self.classifier.complex_inputs(&callee.parameters).len();

        let request_kind = if plan.request.is_some() {
            RequestKind::RequestAggregate
        } else if complex_inputs == 1 {
            RequestKind::SingleComplexParam
        } else {
            RequestKind::None
        };

        let response_kind = if plan.response.is_some() {
            ResponseKind::ResponseAggregate
        } else {
            ResponseKind::Plain
        };

        let all_simple = callee.parameters.iter().all(|p| self.classifier.is_simple(p));
        let http_verb = if final_name.starts_with(self.read_prefix) && all_simple {
            HttpVerb::Read
        } else {
            HttpVerb::Write
        };

        let aggregate_parameter = plan.request.as_ref().map(|a| lower_first(&a.type_name));
        let entry_parameters = self.entry_parameters(callee, plan.request.as_ref());
        let arguments = self.arguments(callee, aggregate_parameter.as_deref());

        CallShape {
            service: self.service.to_string(),
            procedure: callee.name.clone(),
            key: callee.correlation_key(),
            route_template: route_template(self.service, &final_name),
            final_name,
            request_kind,
            response_kind,
            http_verb,
            return_type: callee.return_type.clone(),
            request_aggregate: plan.request,
            response_aggregate: plan.response,
            entry_parameters,
            arguments,
            parameter_renames: parameter_renames(callee, caller),
        }
    }

    fn entry_parameters(&self, callee: &ProcedureSignature, request: Option<&SyntheticAggregate>) -> Vec<EntryParameter> {
        let mut entry = Vec::with_capacity(callee.arity());
        let mut displaced = None;

        for param in callee.parameters.iter().filter(|p| !p.is_output) {
            match self.classifier.classify(param) {
                ParameterClass::Simple => entry.push(EntryParameter {
                    name: param.name.clone(),
                    declared_type: param.declared_type.clone(),
                    binding: Binding::Query,
                    default_value: param.default_value.clone(),
                }),
                ParameterClass::Complex if request.is_some() => {}
                ParameterClass::Complex => {
                    let body = EntryParameter {
                        name: param.name.clone(),
                        declared_type: param.declared_type.clone(),
                        binding: Binding::Body,
                        default_value: None,
                    };
                    if param.has_default_value() {
                        displaced = Some(body);
                    } else {
                        entry.push(body);
                    }
                }
            }
        }

        let body = request
            .map(|aggregate| EntryParameter {
                name: lower_first(&aggregate.type_name),
                declared_type: aggregate.type_name.clone(),
                binding: Binding::Body,
                default_value: None,
            })
            .or(displaced);

        if let Some(body) = body {
            let index = insertion_index(&entry, |p| p.default_value.is_some());
            entry.insert(index, body);
        }

        entry
    }

    fn arguments(&self, callee: &ProcedureSignature, aggregate_parameter: Option<&str>) -> Vec<Argument> {
        let mut slots = output_fields(callee).into_iter().map(|(_, field)| field);

        callee
            .parameters
            .iter()
            .map(|param| {
                let slot = if param.is_output { slots.next() } else { None };
                let source = if let Some(field) = slot {
                    ArgumentSource::OutputSlot { field }
                } else {
                    match (self.classifier.classify(param), aggregate_parameter) {
                        (ParameterClass::Complex, Some(aggregate)) => ArgumentSource::AggregateField {
                            parameter: aggregate.to_string(),
                            field: param.name.clone(),
                        },
                        _ => ArgumentSource::Entry,
                    }
                };

                Argument {
                    name: param.name.clone(),
                    declared_type: param.declared_type.clone(),
                    source,
                }
            })
            .collect()
    }
}

/// Positional name differences; empty when the parameter counts differ.
fn parameter_renames(callee: &ProcedureSignature, caller: &ProcedureSignature) -> Vec<ParameterRename> {
    if callee.arity() != caller.arity() {
        return Vec::new();
    }

    callee
        .parameters
        .iter()
        .zip(&caller.parameters)
        .filter(|(callee, caller)| callee.name != caller.name)
        .map(|(callee, caller)| ParameterRename {
            callee: callee.name.clone(),
            caller: caller.name.clone(),
            is_output: callee.is_output,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Parameter;
    use crate::shape::overload::build_name_map;
    use pretty_assertions::assert_eq;

    fn shape_of(service: &str, procedures: &[ProcedureSignature], index: usize) -> CallShape {
        let names = build_name_map(service, procedures).unwrap();
        let classifier = TypeClassifier::default();
        let ctx = ShapeContext {
            service,
            names: &names,
            classifier: &classifier,
            read_prefix: "Get",
        };
        ctx.transform(&procedures[index], &procedures[index])
    }

    fn entry_names(shape: &CallShape) -> Vec<(&str, Binding)> {
        shape
            .entry_parameters
            .iter()
            .map(|p| (p.name.as_str(), p.binding))
            .collect()
    }

    #[test]
    fn test_simple_read() {
        let procedures = vec![ProcedureSignature::new(
            "GetOrderById",
            vec![Parameter::new("orderId", "int")],
            "Order",
        )];
        let shape = shape_of("OrderService", &procedures, 0);

        assert_eq!(shape.final_name, "GetOrderById");
        assert_eq!(shape.http_verb, HttpVerb::Read);
        assert_eq!(shape.request_kind, RequestKind::None);
        assert_eq!(shape.response_kind, ResponseKind::Plain);
        assert_eq!(shape.route_template, "orderservice/get-order-by-id");
        assert_eq!(entry_names(&shape), vec![("orderId", Binding::Query)]);
        assert_eq!(shape.response_type(), "Order");
        assert!(shape.parameter_renames.is_empty());
    }

    #[test]
    fn test_overloads_route_by_final_name() {
        let procedures = vec![
            ProcedureSignature::new("Foo", vec![Parameter::new("a", "int")], "void"),
            ProcedureSignature::new("Foo", vec![Parameter::new("a", "int"), Parameter::new("b", "string")], "void"),
        ];
        let shape = shape_of("Svc", &procedures, 1);
        assert_eq!(shape.procedure, "Foo");
        assert_eq!(shape.final_name, "FooByB");
        assert_eq!(shape.route_template, "svc/foo-by-b");
        assert_eq!(shape.http_verb, HttpVerb::Write);
    }

    #[test]
    fn test_single_complex_with_output() {
        let procedures = vec![ProcedureSignature::new(
            "Place",
            vec![Parameter::new("order", "Order"), Parameter::output("confirmationId", "int")],
            "bool",
        )];
        let shape = shape_of("OrderService", &procedures, 0);

        assert_eq!(shape.request_kind, RequestKind::SingleComplexParam);
        assert_eq!(shape.response_kind, ResponseKind::ResponseAggregate);
        assert_eq!(shape.response_type(), "PlaceResponse");
        assert_eq!(entry_names(&shape), vec![("order", Binding::Body)]);
        assert_eq!(
            shape.arguments.iter().map(|a| a.source.clone()).collect::<Vec<_>>(),
            vec![
                ArgumentSource::Entry,
                ArgumentSource::OutputSlot {
                    field: "ConfirmationId".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_request_aggregate_keeps_simple_inputs_in_query() {
        let procedures = vec![ProcedureSignature::new(
            "Search",
            vec![
                Parameter::new("term", "string"),
                Parameter::new("filter", "Filter"),
                Parameter::new("sort", "SortOptions"),
            ],
            "List<Item>",
        )];
        let shape = shape_of("Catalog", &procedures, 0);

        assert_eq!(shape.request_kind, RequestKind::RequestAggregate);
        assert_eq!(
            entry_names(&shape),
            vec![("term", Binding::Query), ("searchParams", Binding::Body)]
        );
        assert_eq!(
            shape.arguments[2].source,
            ArgumentSource::AggregateField {
                parameter: "searchParams".to_string(),
                field: "sort".to_string(),
            }
        );
        assert_eq!(shape.body_parameter().map(|p| p.declared_type.as_str()), Some("SearchParams"));
    }

    #[test]
    fn test_aggregate_goes_before_defaulted_parameters() {
        let procedures = vec![ProcedureSignature::new(
            "List",
            vec![
                Parameter::new("owner", "string"),
                Parameter::new("a", "Range"),
                Parameter::new("b", "Range"),
                Parameter::new("take", "int").with_default("10"),
            ],
            "Page",
        )];
        let shape = shape_of("Svc", &procedures, 0);
        assert_eq!(
            entry_names(&shape),
            vec![("owner", Binding::Query), ("listParams", Binding::Body), ("take", Binding::Query)]
        );
        assert_eq!(shape.entry_parameters[2].default_value.as_deref(), Some("10"));
    }

    #[test]
    fn test_defaulted_complex_parameter_loses_default() {
        let procedures = vec![ProcedureSignature::new(
            "Export",
            vec![
                Parameter::new("format", "string").with_default("\"csv\""),
                Parameter::new("options", "ExportOptions").with_default("null"),
            ],
            "string",
        )];
        let shape = shape_of("Svc", &procedures, 0);

        assert_eq!(entry_names(&shape), vec![("options", Binding::Body), ("format", Binding::Query)]);
        assert_eq!(shape.entry_parameters[0].default_value, None);
        assert_eq!(shape.request_kind, RequestKind::SingleComplexParam);
    }

    #[test]
    fn test_read_prefix_requires_all_simple() {
        let procedures = vec![ProcedureSignature::new(
            "GetTotals",
            vec![Parameter::new("year", "int"), Parameter::output("count", "int")],
            "decimal",
        )];
        let shape = shape_of("Svc", &procedures, 0);
        assert_eq!(shape.http_verb, HttpVerb::Write);
        assert!(shape.entry_parameters.iter().all(|p| p.name != "count"));
    }

    #[test]
    fn test_parameter_renames() {
        let callee = ProcedureSignature::new(
            "Update",
            vec![Parameter::new("orderId", "int"), Parameter::output("version", "int")],
            "void",
        );
        let caller = ProcedureSignature::new(
            "Update",
            vec![Parameter::new("id", "int"), Parameter::output("version", "int")],
            "void",
        );
        let names = FinalNameMap::default();
        let classifier = TypeClassifier::default();
        let ctx = ShapeContext {
            service: "Svc",
            names: &names,
            classifier: &classifier,
            read_prefix: "Get",
        };

        let shape = ctx.transform(&callee, &caller);
        assert_eq!(
            shape.parameter_renames,
            vec![ParameterRename {
                callee: "orderId".to_string(),
                caller: "id".to_string(),
                is_output: false,
            }]
        );
        assert_eq!(shape.caller_name("orderId"), "id");
        assert_eq!(shape.caller_name("version"), "version");
    }

    #[test]
    fn test_output_slot_matches_renamed_field() {
        let procedures = vec![ProcedureSignature::new(
            "TryFind",
            vec![Parameter::new("id", "int"), Parameter::output("result", "Item")],
            "bool",
        )];
        let shape = shape_of("Svc", &procedures, 0);

        assert_eq!(
            shape.arguments[1].source,
            ArgumentSource::OutputSlot {
                field: "OutResult".to_string()
            }
        );
        let response = shape.response_aggregate.as_ref().unwrap();
        assert!(response.field("OutResult").is_some());
    }

    #[test]
    fn test_two_complex_inputs_with_output() {
        let procedures = vec![ProcedureSignature::new(
            "P",
            vec![
                Parameter::new("o", "Order"),
                Parameter::new("f", "Filter"),
                Parameter::output("x", "int"),
            ],
            "void",
        )];
        let shape = shape_of("Svc", &procedures, 0);

        assert_eq!(shape.request_kind, RequestKind::RequestAggregate);
        assert_eq!(shape.response_kind, ResponseKind::ResponseAggregate);
        assert_eq!(entry_names(&shape), vec![("pParams", Binding::Body)]);
    }

    #[test]
    fn test_output_alone_does_not_force_request_aggregate() {
        let procedures = vec![ProcedureSignature::new(
            "Reserve",
            vec![Parameter::new("seat", "int"), Parameter::output("ticket", "string")],
            "void",
        )];
        let shape = shape_of("Svc", &procedures, 0);

        assert_eq!(shape.request_kind, RequestKind::None);
        assert_eq!(shape.response_kind, ResponseKind::ResponseAggregate);
        assert!(shape.request_aggregate.is_none());
    }

    #[test]
    fn test_transform_is_idempotent() {
        let procedures = vec![ProcedureSignature::new(
            "Search",
            vec![
                Parameter::new("term", "string"),
                Parameter::new("filter", "Filter"),
                Parameter::new("sort", "SortOptions"),
                Parameter::output("total", "int"),
            ],
            "List<Item>",
        )];
        assert_eq!(shape_of("Svc", &procedures, 0), shape_of("Svc", &procedures, 0));
    }
}
