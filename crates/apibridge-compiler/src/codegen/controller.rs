//! Web API controller generation for service classes.
//!
//! One controller per service. Each procedure becomes an action that binds its simple inputs
//! from the query string and at most one value from the body, invokes the original service
//! procedure and returns either its result or the response aggregate.

use crate::ir::ServiceIR;
use crate::shape::aggregate::RESULT_FIELD;
use crate::shape::{ArgumentSource, Binding, CallShape, HttpVerb, ServicePlan};
use super::cs_syntax::{file_header, render_aggregate_class, render_usings, target_namespace, LocalNames, INDENT};

const CONTROLLER_USINGS: &[&str] = &["System.Web.Http", "System.Web.Http.Description"];
const DEFAULT_NAMESPACE: &str = "ApiServices";

/// File name of the controller generated for `service`.
pub fn controller_file_name(service: &ServiceIR) -> String {
    format!("{}Controller.cs", service.name)
}

/// Generates the controller source for a service.
pub fn generate_controller(service: &ServiceIR, plan: &ServicePlan) -> String {
    let name = &service.name;
    let namespace = target_namespace(service.namespace.as_deref(), "Services", DEFAULT_NAMESPACE);

    let mut code = file_header(&service.source_path);
    let usings: Vec<String> = service.usings.iter().chain(service.namespace.iter()).cloned().collect();
    code.push_str(&render_usings(CONTROLLER_USINGS, &usings, &[]));

    code.push_str(&format!(
        r#"
namespace {namespace}
{{
    public class {name}Controller : ApiController
    {{
        private static readonly {name} {name} = new {name}();
"#
    ));

    for aggregate in plan
        .controller
        .iter()
        .flat_map(|shape| shape.request_aggregate.iter().chain(shape.response_aggregate.iter()))
    {
        code.push('\n');
        code.push_str(&render_aggregate_class(aggregate));
    }

    let provider = if service.is_asmx { "ASMX" } else { "WCF" };
    for shape in &plan.controller {
        code.push('\n');
        code.push_str(&generate_action(name, shape, provider));
    }

    code.push_str("    }\n}\n");
    code
}

fn generate_action(service: &str, shape: &CallShape, provider: &str) -> String {
    let pad = INDENT.repeat(2);
    let body = INDENT.repeat(3);

    let verb = match shape.http_verb {
        HttpVerb::Read => "HttpGet",
        HttpVerb::Write => "HttpPost",
    };

    let parameters: Vec<String> = shape
        .entry_parameters
        .iter()
        .map(|p| {
            let binding = if p.binding == Binding::Body { "[FromBody] " } else { "" };
            match &p.default_value {
                Some(default) => format!("{binding}{} {} = {default}", p.declared_type, p.name),
                None => format!("{binding}{} {}", p.declared_type, p.name),
            }
        })
        .collect();

    let mut code = format!(
        r#"{pad}/// <summary>
{pad}/// auto code generated using {provider} Service provider class
{pad}/// </summary>
{pad}[{verb}, Route("{route}")]
{pad}[ResponseType(typeof({response_type}))]
{pad}public IHttpActionResult {final_name}({parameters})
{pad}{{
"#,
        route = shape.route_template,
        response_type = shape.response_type(),
        final_name = shape.final_name,
        parameters = parameters.join(", "),
    );

    for argument in &shape.arguments {
        if matches!(argument.source, ArgumentSource::OutputSlot { .. }) {
            code.push_str(&format!("{body}{} {};\n", argument.declared_type, argument.name));
        }
    }

    let arguments: Vec<String> = shape
        .arguments
        .iter()
        .map(|a| match &a.source {
            ArgumentSource::Entry => a.name.clone(),
            ArgumentSource::AggregateField { parameter, field } => format!("{parameter}.{field}"),
            ArgumentSource::OutputSlot { .. } => format!("out {}", a.name),
        })
        .collect();
    let call = format!("{service}.{}({})", shape.procedure, arguments.join(", "));
    let returns_value = shape.return_type != "void";

    let mut locals = LocalNames::new(
        shape
            .entry_parameters
            .iter()
            .map(|p| p.name.as_str())
            .chain(shape.arguments.iter().map(|a| a.name.as_str()))
            .chain([service]),
    );

    match &shape.response_aggregate {
        Some(aggregate) => {
            let result_value = if returns_value {
                let result = locals.fresh("result");
                code.push_str(&format!("{body}var {result} = {call};\n"));
                result
            } else {
                code.push_str(&format!("{body}{call};\n"));
                "null".to_string()
            };

            let response = locals.fresh("response");
            code.push_str(&format!("{body}var {response} = new {}\n{body}{{\n", aggregate.type_name));
            code.push_str(&format!("{body}{INDENT}{RESULT_FIELD} = {result_value},\n"));
            for argument in &shape.arguments {
                if let ArgumentSource::OutputSlot { field } = &argument.source {
                    code.push_str(&format!("{body}{INDENT}{field} = {},\n", argument.name));
                }
            }
            code.push_str(&format!("{body}}};\n{body}return Ok({response});\n"));
        }
        None if returns_value => {
            let result = locals.fresh("result");
            code.push_str(&format!("{body}var {result} = {call};\n{body}return Ok({result});\n"));
        }
        None => {
            code.push_str(&format!("{body}{call};\n{body}return Ok();\n"));
        }
    }

    code.push_str(&format!("{pad}}}\n"));
    code
}
