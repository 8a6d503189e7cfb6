//! Envelope types that collapse several parameters into one request or response.

use serde::Serialize;

use crate::ir::{Parameter, ProcedureSignature};
use super::classify::TypeClassifier;
use super::naming::capitalize;

/// Name of the response field carrying the procedure's own return value.
pub const RESULT_FIELD: &str = "Result";

/// Field type used for [`RESULT_FIELD`] when the procedure returns `void`.
pub const VOID_RESULT_TYPE: &str = "object";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateField {
    pub name: String,
    pub field_type: String,
}

/// A type synthesized for one procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticAggregate {
    pub type_name: String,
    pub fields: Vec<AggregateField>,
}

impl SyntheticAggregate {
    pub fn field(&self, name: &str) -> Option<&AggregateField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The aggregates a procedure needs, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatePlan {
    pub request: Option<SyntheticAggregate>,
    pub response: Option<SyntheticAggregate>,
}

/// Response field names for the output parameters of `signature`, in declaration order.
///
/// A field is the capitalised parameter name, prefixed with `Out` until it no longer clashes
/// with [`RESULT_FIELD`] or an earlier field: `out Item result` becomes `OutResult`.
pub fn output_fields(signature: &ProcedureSignature) -> Vec<(&Parameter, String)> {
    let mut taken = vec![RESULT_FIELD.to_string()];
    let mut fields = Vec::new();

    for param in signature.parameters.iter().filter(|p| p.is_output) {
        let mut field = capitalize(&param.name);
        while taken.contains(&field) {
            field = format!("Out{field}");
        }
        taken.push(field.clone());
        fields.push((param, field));
    }

    fields
}

/// Decides which aggregates `signature` needs under `final_name`.
///
/// A request aggregate `{final}Params` collects the Complex inputs when there are at least
/// two. A response aggregate `{final}Response` holds `Result` and one field per output
/// parameter when any output exists.
pub fn plan_aggregates(signature: &ProcedureSignature, final_name: &str, classifier: &TypeClassifier) -> AggregatePlan {
    let complex = classifier.complex_inputs(&signature.parameters);

    let request = (complex.len() >= 2).then(|| SyntheticAggregate {
        type_name: format!("{final_name}Params"),
        fields: complex
            .iter()
            .map(|p| AggregateField {
                name: p.name.clone(),
                field_type: p.declared_type.clone(),
            })
            .collect(),
    });

    let response = signature.has_output_parameters().then(|| {
        let result_type = if signature.is_void() {
            VOID_RESULT_TYPE.to_string()
        } else {
            signature.return_type.clone()
        };

        let mut fields = vec![AggregateField {
            name: RESULT_FIELD.to_string(),
            field_type: result_type,
        }];
        fields.extend(output_fields(signature).into_iter().map(|(p, name)| AggregateField {
            name,
            field_type: p.declared_type.clone(),
        }));

        SyntheticAggregate {
            type_name: format!("{final_name}Response"),
            fields,
        }
    });

    AggregatePlan { request, response }
}

/// Where a body parameter goes in an entry-point parameter list: before the first defaulted
/// parameter, or at the end.
pub fn insertion_index<T>(params: &[T], has_default: impl Fn(&T) -> bool) -> usize {
    params.iter().position(has_default).unwrap_or(params.len())
}
