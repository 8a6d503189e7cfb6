//! HTTP client generation for client contracts.
//!
//! The generated client keeps the caller's own method signatures and routes every call to the
//! controller action planned for the correlated service procedure.

use crate::ir::{ClientIR, ProcedureSignature};
use crate::shape::{ArgumentSource, CallShape, ClientCall, HttpVerb, RequestKind, ServicePlan, SyntheticAggregate};
use crate::diagnostic::CorrelationError;
use crate::shape::aggregate::RESULT_FIELD;
use super::cs_syntax::{
    file_header, is_string_type, render_aggregate_class, render_usings, target_namespace, LocalNames, INDENT,
};

const CLIENT_USINGS: &[&str] = &["System", "System.Net.Http", "System.Text", "System.Web", "Newtonsoft.Json"];
const EXCLUDED_USINGS: &[&str] = &["System.ServiceModel", "System.Web.Services"];
const DEFAULT_NAMESPACE: &str = "ApiServiceClients";

/// File name of the client generated for `client`.
pub fn client_file_name(client: &ClientIR) -> String {
    format!("{}Client.cs", client.name)
}

/// Generates the HTTP client source for a client contract.
pub fn generate_client(client: &ClientIR, plan: &ServicePlan) -> String {
    let name = &client.name;
    let namespace = target_namespace(client.namespace.as_deref(), "Clients", DEFAULT_NAMESPACE);
    let base = client
        .interface_name
        .as_ref()
        .map(|i| format!(" : {i}"))
        .unwrap_or_default();

    let mut code = file_header(&client.source_path);
    let usings: Vec<String> = client.usings.iter().chain(client.namespace.iter()).cloned().collect();
    code.push_str(&render_usings(CLIENT_USINGS, &usings, EXCLUDED_USINGS));

    code.push_str(&format!(
        r#"
namespace {namespace}
{{
    internal class {name}Client{base}
    {{
        private static readonly JsonSerializerSettings JsonSettings = new JsonSerializerSettings
        {{
            TypeNameHandling = TypeNameHandling.Auto,
        }};

        private readonly HttpClient httpClient;
        private readonly string baseUrl;

        public {name}Client(string baseUrl)
            : this(new HttpClient(), baseUrl)
        {{
        }}

        public {name}Client(HttpClient httpClient, string baseUrl)
        {{
            this.httpClient = httpClient;
            this.baseUrl = baseUrl.TrimEnd('/');
        }}
"#
    ));

    let mut emitted: Vec<&str> = Vec::new();
    for aggregate in response_aggregates(&plan.client) {
        if !emitted.contains(&aggregate.type_name.as_str()) {
            emitted.push(&aggregate.type_name);
            code.push('\n');
            code.push_str(&render_aggregate_class(aggregate));
        }
    }

    for call in &plan.client {
        code.push('\n');
        match &call.outcome {
            Ok(shape) => code.push_str(&generate_method(&call.caller, shape)),
            Err(err) => code.push_str(&generate_stub(&call.caller, err)),
        }
    }

    code.push_str("    }\n}\n");
    code
}

fn response_aggregates(calls: &[ClientCall]) -> impl Iterator<Item = &SyntheticAggregate> {
    calls
        .iter()
        .filter_map(|call| call.outcome.as_ref().ok())
        .filter_map(|shape| shape.response_aggregate.as_ref())
}

fn signature_line(caller: &ProcedureSignature) -> String {
    let pad = INDENT.repeat(2);
    format!(
        "{pad}public {} {}({})\n{pad}{{\n",
        caller.return_type,
        caller.name,
        caller.parameter_list_text()
    )
}

fn generate_stub(caller: &ProcedureSignature, err: &CorrelationError) -> String {
    let pad = INDENT.repeat(2);
    let body = INDENT.repeat(3);
    let mut code = signature_line(caller);
    code.push_str(&format!("{body}// {err}\n"));
    code.push_str(&format!("{body}throw new NotImplementedException();\n{pad}}}\n"));
    code
}

fn generate_method(caller: &ProcedureSignature, shape: &CallShape) -> String {
    let pad = INDENT.repeat(2);
    let body = INDENT.repeat(3);
    let mut code = signature_line(caller);
    let mut locals = LocalNames::new(caller.parameters.iter().map(|p| p.name.as_str()));

    // Query keys are callee names; values are the caller's own parameters.
    let query: Vec<String> = shape
        .query_parameters()
        .map(|p| {
            let value = shape.caller_name(&p.name);
            if is_string_type(&p.declared_type) {
                format!("{}={{HttpUtility.UrlEncode({value})}}", p.name)
            } else {
                format!("{}={{{value}}}", p.name)
            }
        })
        .collect();
    let query = if query.is_empty() {
        String::new()
    } else {
        format!("?{}", query.join("&"))
    };
    let request_uri = locals.fresh("requestUri");
    code.push_str(&format!(
        "{body}var {request_uri} = $\"{{this.baseUrl}}/{}{query}\";\n",
        shape.route_template
    ));

    let returns_value = caller.return_type != "void";
    let needs_response = returns_value || shape.response_aggregate.is_some();
    let response_text = if needs_response {
        locals.fresh("responseText")
    } else {
        String::new()
    };

    match shape.http_verb {
        HttpVerb::Read if needs_response => {
            code.push_str(&format!(
                "{body}var {response_text} = this.httpClient.GetStringAsync({request_uri}).Result;\n"
            ));
        }
        HttpVerb::Read => {
            code.push_str(&format!(
                "{body}this.httpClient.GetAsync({request_uri}).Result.EnsureSuccessStatusCode();\n"
            ));
        }
        HttpVerb::Write => {
            let content = locals.fresh("content");
            code.push_str(&format!(
                "{body}var {content} = new StringContent({}, Encoding.UTF8, \"application/json\");\n",
                request_json(shape)
            ));
            if needs_response {
                code.push_str(&format!(
                    "{body}var {response_text} = this.httpClient.PostAsync({request_uri}, {content}).Result\n\
                     {body}{INDENT}.EnsureSuccessStatusCode().Content.ReadAsStringAsync().Result;\n"
                ));
            } else {
                code.push_str(&format!(
                    "{body}this.httpClient.PostAsync({request_uri}, {content}).Result.EnsureSuccessStatusCode();\n"
                ));
            }
        }
    }

    match &shape.response_aggregate {
        Some(aggregate) => {
            let response = locals.fresh("response");
            code.push_str(&format!(
                "{body}var {response} = JsonConvert.DeserializeObject<{}>({response_text}, JsonSettings);\n",
                aggregate.type_name
            ));
            for argument in &shape.arguments {
                if let ArgumentSource::OutputSlot { field } = &argument.source {
                    code.push_str(&format!(
                        "{body}{} = {response}.{field};\n",
                        shape.caller_name(&argument.name)
                    ));
                }
            }
            if returns_value {
                code.push_str(&format!(
                    "{body}return ({}){response}.{RESULT_FIELD};\n",
                    caller.return_type
                ));
            }
        }
        None if returns_value => {
            code.push_str(&format!(
                "{body}return JsonConvert.DeserializeObject<{}>({response_text}, JsonSettings);\n",
                caller.return_type
            ));
        }
        None => {}
    }

    code.push_str(&format!("{pad}}}\n"));
    code
}

/// The serialized request body expression, built from the caller's parameter names.
fn request_json(shape: &CallShape) -> String {
    match shape.request_kind {
        RequestKind::None => "string.Empty".to_string(),
        RequestKind::SingleComplexParam => match shape.body_parameter() {
            Some(param) => format!("JsonConvert.SerializeObject({}, JsonSettings)", shape.caller_name(&param.name)),
            None => "string.Empty".to_string(),
        },
        RequestKind::RequestAggregate => {
            let members: Vec<String> = shape
                .request_aggregate
                .iter()
                .flat_map(|a| a.fields.iter())
                .map(|f| match shape.caller_name(&f.name) {
                    same if same == f.name => same.to_string(),
                    other => format!("{} = {other}", f.name),
                })
                .collect();
            format!("JsonConvert.SerializeObject(new {{ {} }}, JsonSettings)", members.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Parameter, ServiceIR};
    use crate::shape::{plan_service, PlanOptions, TypeClassifier};
    use std::path::PathBuf;

    fn make_test_client(procedures: Vec<ProcedureSignature>) -> ClientIR {
        ClientIR {
            name: "OrderService".to_string(),
            namespace: Some("Legacy.Proxies".to_string()),
            usings: vec!["System.ServiceModel".to_string(), "Legacy.Models".to_string()],
            interface_name: Some("IOrderService".to_string()),
            procedures,
            source_path: PathBuf::from("IOrderService.cs"),
        }
    }

    fn generate(service_procedures: Vec<ProcedureSignature>, client: &ClientIR) -> String {
        let service = ServiceIR {
            name: "OrderService".to_string(),
            namespace: Some("Legacy.Orders".to_string()),
            usings: vec![],
            is_asmx: false,
            procedures: service_procedures,
            source_path: PathBuf::from("OrderService.svc.cs"),
        };
        let options = PlanOptions {
            classifier: TypeClassifier::default(),
            read_prefix: "Get".to_string(),
        };
        let plan = plan_service(&service, Some(client), &options).unwrap();
        generate_client(client, &plan)
    }

    #[test]
    fn test_client_class() {
        let client = make_test_client(vec![]);
        let code = generate(vec![], &client);

        assert!(code.contains("using Newtonsoft.Json;"));
        assert!(code.contains("using Legacy.Models;"));
        assert!(!code.contains("using System.ServiceModel;"));
        assert!(code.contains("namespace Legacy.Proxies.Clients"));
        assert!(code.contains("internal class OrderServiceClient : IOrderService"));
        assert!(code.contains("TypeNameHandling = TypeNameHandling.Auto,"));
        assert!(code.contains("public OrderServiceClient(string baseUrl)"));
        assert_eq!(client_file_name(&client), "OrderServiceClient.cs");
    }

    #[test]
    fn test_get_with_encoded_query_and_renames() {
        let service = vec![ProcedureSignature::new(
            "GetOrders",
            vec![Parameter::new("customer", "string"), Parameter::new("year", "int")],
            "List<Order>",
        )];
        let client = make_test_client(vec![ProcedureSignature::new(
            "GetOrders",
            vec![Parameter::new("customerName", "string"), Parameter::new("year", "int")],
            "List<Order>",
        )]);
        let code = generate(service, &client);

        assert!(code.contains("public List<Order> GetOrders(string customerName, int year)"));
        assert!(!code.contains("var customer"));
        assert!(code.contains(
            r#"var requestUri = $"{this.baseUrl}/orderservice/get-orders?customer={HttpUtility.UrlEncode(customerName)}&year={year}";"#
        ));
        assert!(code.contains("var responseText = this.httpClient.GetStringAsync(requestUri).Result;"));
        assert!(code.contains("return JsonConvert.DeserializeObject<List<Order>>(responseText, JsonSettings);"));
    }

    #[test]
    fn test_post_with_response_aggregate() {
        let procedures = vec![ProcedureSignature::new(
            "Place",
            vec![Parameter::new("order", "Order"), Parameter::output("confirmationId", "int")],
            "bool",
        )];
        let client = make_test_client(procedures.clone());
        let code = generate(procedures, &client);

        assert!(code.contains("public class PlaceResponse"));
        assert!(code.contains("public bool Place(Order order, out int confirmationId)"));
        assert!(code.contains(
            r#"var content = new StringContent(JsonConvert.SerializeObject(order, JsonSettings), Encoding.UTF8, "application/json");"#
        ));
        assert!(code.contains("this.httpClient.PostAsync(requestUri, content).Result"));
        assert!(code.contains("var response = JsonConvert.DeserializeObject<PlaceResponse>(responseText, JsonSettings);"));
        assert!(code.contains("confirmationId = response.ConfirmationId;"));
        assert!(code.contains("return (bool)response.Result;"));
    }

    #[test]
    fn test_anonymous_request_aggregate_body() {
        let procedures = vec![ProcedureSignature::new(
            "Search",
            vec![
                Parameter::new("term", "string"),
                Parameter::new("filter", "Filter"),
                Parameter::new("sort", "SortOptions"),
            ],
            "void",
        )];
        let client = make_test_client(procedures.clone());
        let code = generate(procedures, &client);

        assert!(code.contains("JsonConvert.SerializeObject(new { filter, sort }, JsonSettings)"));
        assert!(code.contains(r#"$"{this.baseUrl}/orderservice/search?term={HttpUtility.UrlEncode(term)}""#));
        assert!(code.contains("this.httpClient.PostAsync(requestUri, content).Result.EnsureSuccessStatusCode();"));
        assert!(!code.contains("public class SearchParams"));
    }

    #[test]
    fn test_stub_for_uncorrelated_procedure() {
        let service = vec![ProcedureSignature::new("GetOrder", vec![Parameter::new("id", "int")], "Order")];
        let client = make_test_client(vec![
            ProcedureSignature::new("GetUser", vec![Parameter::new("id", "int")], "User"),
            ProcedureSignature::new("GetOrder", vec![Parameter::new("orderId", "int")], "Order"),
        ]);
        let code = generate(service, &client);

        assert!(code.contains("public User GetUser(int id)"));
        assert!(code.contains("// Cannot correlate 'GetUser(int id)' in 'OrderService'"));
        assert!(code.contains("throw new NotImplementedException();"));
        assert!(code.contains("/orderservice/get-order?id={orderId}"));
    }

    #[test]
    fn test_swapped_parameter_names() {
        let service = vec![ProcedureSignature::new(
            "Move",
            vec![Parameter::new("from", "int"), Parameter::new("to", "int")],
            "void",
        )];
        let client = make_test_client(vec![ProcedureSignature::new(
            "Move",
            vec![Parameter::new("to", "int"), Parameter::new("from", "int")],
            "void",
        )]);
        let code = generate(service, &client);

        assert!(!code.contains("var from"));
        assert!(!code.contains("var to"));
        assert!(code.contains("/orderservice/move?from={to}&to={from}"));
    }

    #[test]
    fn test_renamed_request_aggregate_members() {
        let service = vec![ProcedureSignature::new(
            "Search",
            vec![Parameter::new("filter", "Filter"), Parameter::new("sort", "SortOptions")],
            "void",
        )];
        let client = make_test_client(vec![ProcedureSignature::new(
            "Search",
            vec![Parameter::new("criteria", "Filter"), Parameter::new("sort", "SortOptions")],
            "void",
        )]);
        let code = generate(service, &client);

        assert!(code.contains("JsonConvert.SerializeObject(new { filter = criteria, sort }, JsonSettings)"));
    }

    #[test]
    fn test_locals_avoid_parameter_names() {
        let procedures = vec![ProcedureSignature::new(
            "Save",
            vec![Parameter::new("content", "Doc"), Parameter::output("response", "int")],
            "bool",
        )];
        let client = make_test_client(procedures.clone());
        let code = generate(procedures, &client);

        assert!(code.contains(
            r#"var content1 = new StringContent(JsonConvert.SerializeObject(content, JsonSettings), Encoding.UTF8, "application/json");"#
        ));
        assert!(code.contains("this.httpClient.PostAsync(requestUri, content1).Result"));
        assert!(code.contains("var response1 = JsonConvert.DeserializeObject<SaveResponse>(responseText, JsonSettings);"));
        assert!(code.contains("response = response1.Response;"));
        assert!(code.contains("return (bool)response1.Result;"));
    }

    #[test]
    fn test_out_parameter_named_result() {
        let procedures = vec![ProcedureSignature::new(
            "TryFind",
            vec![Parameter::new("id", "int"), Parameter::output("result", "Item")],
            "bool",
        )];
        let client = make_test_client(procedures.clone());
        let code = generate(procedures, &client);

        assert!(code.contains("public Item OutResult { get; set; }"));
        assert!(code.contains("result = response.OutResult;"));
        assert!(code.contains("return (bool)response.Result;"));
    }
}
