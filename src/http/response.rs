use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Performance metrics keyed by metric name, e.g. `timer_rego_query_eval_ns`.
pub type Metrics = BTreeMap<String, Value>;

#[derive(Debug, Serialize, Deserialize)]
pub struct Policy {
    /// The identifier of the policy.
    pub id: String,
    /// Raw policy code in textual format.
    pub raw: String,
    /// The parsed policy, as returned by OPA.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ast: Option<Value>,
}

impl Policy {
    #[must_use]
    pub fn new(id: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            raw: raw.into(),
            ast: None,
        }
    }
}

/// Response of a data API read.
///
/// The `result` is missing if the document is undefined, the rest
/// of the fields are only present if requested.
#[derive(Debug, Deserialize)]
pub struct DataResponse<T> {
    pub result: Option<T>,
    pub metrics: Option<Metrics>,
    /// Unique identifier of the decision, if decision logging is enabled.
    pub decision_id: Option<Uuid>,
    pub provenance: Option<Provenance>,
    pub explanation: Option<Value>,
    pub warning: Option<Warning>,
}

#[derive(Debug, Deserialize)]
pub struct Decision<T> {
    /// The result document of the decision.
    pub result: T,
    /// Unique identifier of the decision.
    pub decision_id: Option<Uuid>,
}

/// Build and bundle information of the OPA instance that
/// produced a result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Provenance {
    pub version: Option<String>,
    pub build_commit: Option<String>,
    pub build_timestamp: Option<String>,
    pub build_hostname: Option<String>,
    pub revision: Option<String>,
    pub bundles: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Warning {
    pub code: String,
    pub message: String,
}

/// Response of write endpoints that report metrics when asked to.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MetricsResponse {
    pub metrics: Option<Metrics>,
}

/// Response of an ad-hoc query, one result per set of variable bindings.
#[derive(Debug, Deserialize)]
pub struct QueryResponse<T = Value> {
    #[serde(default = "Vec::new")]
    pub result: Vec<T>,
    pub metrics: Option<Metrics>,
    pub explanation: Option<Value>,
}

/// Response of partial evaluation.
#[derive(Debug, Deserialize)]
pub struct CompileResponse<T = Value> {
    pub result: Option<T>,
    pub metrics: Option<Metrics>,
    pub explanation: Option<Value>,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct OpaResponse<T> {
    pub(crate) result: T,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_response_with_extras() {
        let res: DataResponse<bool> = serde_json::from_value(json!({
            "result": true,
            "decision_id": "3ad9e8d8-6a0f-4a7e-9a2e-d8b04ab1a2a1",
            "metrics": {"timer_rego_query_eval_ns": 1200},
            "provenance": {"version": "0.60.0", "revision": "abc"},
            "warning": {"code": "api_usage_warning", "message": "'input' key missing"}
        }))
        .unwrap();

        assert_eq!(res.result, Some(true));
        assert!(res.decision_id.is_some());
        assert_eq!(
            res.metrics.unwrap()["timer_rego_query_eval_ns"],
            json!(1200)
        );
        assert_eq!(res.provenance.unwrap().version.as_deref(), Some("0.60.0"));
        assert_eq!(res.warning.unwrap().code, "api_usage_warning");
    }

    #[test]
    fn undefined_document() {
        let res: DataResponse<Value> = serde_json::from_value(json!({})).unwrap();
        assert!(res.result.is_none());
        assert!(res.metrics.is_none());
    }

    #[test]
    fn empty_query_response() {
        let res: QueryResponse = serde_json::from_value(json!({})).unwrap();
        assert!(res.result.is_empty());
    }
}
