use crate::PolicyDecision;

use super::{
    params::QueryParams, request::Empty, ApiRequest, DataResponse, Decision, Error, Explain,
    MetricsResponse, Opa, PrettyOptions,
};
use reqwest::header::{HeaderValue, IF_NONE_MATCH};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// Evaluation options of data API reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalOptions {
    pub pretty: bool,
    /// Include build and bundle information in the response.
    pub provenance: bool,
    pub explain: Option<Explain>,
    pub metrics: bool,
    /// Include detailed query evaluation metrics, implies `metrics`.
    pub instrument: bool,
    /// Treat built-in function errors as fatal.
    pub strict_builtin_errors: bool,
}

impl EvalOptions {
    fn params(self, input: Option<String>) -> QueryParams {
        QueryParams::new()
            .value("input", input)
            .flag("pretty", self.pretty)
            .flag("provenance", self.provenance)
            .value("explain", self.explain.map(Explain::as_str))
            .flag("metrics", self.metrics)
            .flag("instrument", self.instrument)
            .flag("strict-builtin-errors", self.strict_builtin_errors)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsOptions {
    pub metrics: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SetDocumentOptions {
    pub metrics: bool,
    /// Only create the document, fail with `304 Not Modified` if
    /// it already exists.
    pub if_none_match: bool,
}

/// A single [JSON Patch](https://datatracker.ietf.org/doc/html/rfc6902) operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl PatchOperation {
    #[must_use]
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self::with_value(PatchOp::Add, path, value)
    }

    #[must_use]
    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self::with_value(PatchOp::Replace, path, value)
    }

    #[must_use]
    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Remove,
            path: path.into(),
            value: None,
            from: None,
        }
    }

    fn with_value(op: PatchOp, path: impl Into<String>, value: Value) -> Self {
        Self {
            op,
            path: path.into(),
            value: Some(value),
            from: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

fn data_path(version: &str, path: &str) -> String {
    format!("/{version}/data/{}", path.trim_start_matches('/'))
}

/// Routes for the [OPA Data API](https://www.openpolicyagent.org/docs/latest/rest-api/#data-api).
impl Opa {
    /// Endpoint for: <https://www.openpolicyagent.org/docs/latest/rest-api/#get-a-document>
    pub async fn get_document<R>(
        &self,
        path: impl AsRef<str>,
        options: &EvalOptions,
    ) -> Result<DataResponse<R>, Error>
    where
        R: DeserializeOwned,
    {
        let path = options.params(None).to_path(data_path("v1", path.as_ref()));
        self.send(ApiRequest::get(path)).await
    }

    /// Same as [`Opa::get_document`], with the input passed as a query
    /// parameter.
    pub async fn get_document_with_input<I, R>(
        &self,
        path: impl AsRef<str>,
        input: &I,
        options: &EvalOptions,
    ) -> Result<DataResponse<R>, Error>
    where
        I: Serialize,
        R: DeserializeOwned,
    {
        let input = serde_json::to_string(input).map_err(Error::Encode)?;
        let path = options
            .params(Some(input))
            .to_path(data_path("v1", path.as_ref()));
        self.send(ApiRequest::get(path)).await
    }

    /// Endpoint for: <https://www.openpolicyagent.org/docs/latest/rest-api/#get-a-document-with-input>
    pub async fn post_document<I, R>(
        &self,
        path: impl AsRef<str>,
        input: &I,
        options: &EvalOptions,
    ) -> Result<DataResponse<R>, Error>
    where
        I: Serialize,
        R: DeserializeOwned,
    {
        #[derive(Serialize)]
        struct InputRequest<'a, T> {
            input: &'a T,
        }

        let path = options.params(None).to_path(data_path("v1", path.as_ref()));
        self.send(ApiRequest::post(path).json(&InputRequest { input })?)
            .await
    }

    /// Same as [`Opa::get_decision`] with an alternative API.
    pub async fn decide<P: PolicyDecision>(
        &self,
        input: &P::Input,
    ) -> Result<Decision<P::Output>, Error> {
        self.get_decision(P::POLICY_PATH, input).await
    }

    /// Get a decision document based on a policy.
    ///
    /// The given policy path is either a package name such as `example.policy.allow` or a
    /// path such as `example/policy/allow`.
    ///
    /// # Errors
    ///
    /// [`Error::Undefined`] is returned if the policy produced no result.
    pub async fn get_decision<I, R>(&self, policy: &str, input: &I) -> Result<Decision<R>, Error>
    where
        I: Serialize,
        R: DeserializeOwned,
    {
        let policy_path = if policy.contains('.') {
            Cow::Owned(policy.replace('.', "/"))
        } else {
            Cow::Borrowed(policy)
        };

        let res: DataResponse<R> = self
            .post_document(&policy_path, input, &EvalOptions::default())
            .await?;

        match res.result {
            Some(result) => Ok(Decision {
                result,
                decision_id: res.decision_id,
            }),
            None => Err(Error::Undefined(policy_path.into_owned())),
        }
    }

    /// Endpoint for: <https://www.openpolicyagent.org/docs/latest/rest-api/#get-a-document-webhook>
    ///
    /// The input is posted as-is and the response is the bare document.
    pub async fn webhook_document<I, R>(
        &self,
        path: impl AsRef<str>,
        input: &I,
        options: &PrettyOptions,
    ) -> Result<R, Error>
    where
        I: Serialize,
        R: DeserializeOwned,
    {
        let path = options.params().to_path(data_path("v0", path.as_ref()));
        self.send(ApiRequest::post(path).json(input)?).await
    }

    /// Endpoint for: <https://www.openpolicyagent.org/docs/latest/rest-api/#create-or-overwrite-a-document>
    pub async fn set_document(
        &self,
        path: impl AsRef<str>,
        document: &impl Serialize,
        options: &SetDocumentOptions,
    ) -> Result<MetricsResponse, Error> {
        let path = QueryParams::new()
            .flag("metrics", options.metrics)
            .to_path(data_path("v1", path.as_ref()));

        let mut req = ApiRequest::put(path).json(document)?;

        if options.if_none_match {
            req = req.header(IF_NONE_MATCH, HeaderValue::from_static("*"));
        }

        self.send(req).await
    }

    /// Endpoint for: <https://www.openpolicyagent.org/docs/latest/rest-api/#patch-a-document>
    pub async fn patch_document(
        &self,
        path: impl AsRef<str>,
        operations: &[PatchOperation],
    ) -> Result<(), Error> {
        let body = serde_json::to_string(operations).map_err(Error::Encode)?;
        let req = ApiRequest::patch(data_path("v1", path.as_ref()))
            .text("application/json-patch+json", body);

        self.send::<Empty>(req).await?;
        Ok(())
    }

    /// Endpoint for: <https://www.openpolicyagent.org/docs/latest/rest-api/#delete-a-document>
    pub async fn delete_document(
        &self,
        path: impl AsRef<str>,
        options: &MetricsOptions,
    ) -> Result<MetricsResponse, Error> {
        let path = QueryParams::new()
            .flag("metrics", options.metrics)
            .to_path(data_path("v1", path.as_ref()));

        self.send(ApiRequest::delete(path)).await
    }
}
