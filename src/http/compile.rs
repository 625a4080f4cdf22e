use super::{params::QueryParams, ApiRequest, CompileResponse, Error, Explain, Opa};
use reqwest::header::{HeaderValue, ACCEPT};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Body of a partial evaluation request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompileRequest {
    /// The query to partially evaluate, e.g. `data.example.allow == true`.
    ///
    /// Not sent when empty, [`Opa::compile_filter`] takes the query from its path.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    /// References treated as unknown, e.g. `input.subject`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknowns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl CompileRequest {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_input(mut self, input: Value) -> Self {
        self.input = Some(input);
        self
    }

    #[must_use]
    pub fn with_unknowns<S, I>(mut self, unknowns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unknowns.extend(unknowns.into_iter().map(Into::into));
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    pub pretty: bool,
    pub explain: Option<Explain>,
    pub metrics: bool,
    pub instrument: bool,
}

/// Output dialect of [`Opa::compile_filter`], sent as the `Accept` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterTarget {
    UcastAll,
    UcastMinimal,
    UcastPrisma,
    UcastLinq,
    SqlPostgres,
    SqlMysql,
    SqlServer,
    SqlSqlite,
    Custom(String),
}

impl FilterTarget {
    #[must_use]
    pub fn media_type(&self) -> &str {
        match self {
            FilterTarget::UcastAll => "application/vnd.opa.ucast.all+json",
            FilterTarget::UcastMinimal => "application/vnd.opa.ucast.minimal+json",
            FilterTarget::UcastPrisma => "application/vnd.opa.ucast.prisma+json",
            FilterTarget::UcastLinq => "application/vnd.opa.ucast.linq+json",
            FilterTarget::SqlPostgres => "application/vnd.opa.sql.postgresql+json",
            FilterTarget::SqlMysql => "application/vnd.opa.sql.mysql+json",
            FilterTarget::SqlServer => "application/vnd.opa.sql.sqlserver+json",
            FilterTarget::SqlSqlite => "application/vnd.opa.sql.sqlite+json",
            FilterTarget::Custom(media_type) => media_type,
        }
    }
}

/// Routes for the [OPA Compile API](https://www.openpolicyagent.org/docs/latest/rest-api/#compile-api).
impl Opa {
    /// Partially evaluate a query.
    ///
    /// Endpoint for: <https://www.openpolicyagent.org/docs/latest/rest-api/#partially-evaluate-a-query>
    pub async fn compile<R>(
        &self,
        request: &CompileRequest,
        options: &CompileOptions,
    ) -> Result<CompileResponse<R>, Error>
    where
        R: DeserializeOwned,
    {
        let path = QueryParams::new()
            .flag("pretty", options.pretty)
            .value("explain", options.explain.map(Explain::as_str))
            .flag("metrics", options.metrics)
            .flag("instrument", options.instrument)
            .to_path("/v1/compile");

        self.send(ApiRequest::post(path).json(request)?).await
    }

    /// Translate the policy at `path` into a filter for the given target,
    /// e.g. an SQL `WHERE` clause.
    pub async fn compile_filter<R>(
        &self,
        path: impl AsRef<str>,
        request: &CompileRequest,
        target: &FilterTarget,
    ) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let path = format!("/v1/compile/{}", path.as_ref().trim_start_matches('/'));
        let accept = HeaderValue::try_from(target.media_type())?;

        self.send(ApiRequest::post(path).json(request)?.header(ACCEPT, accept))
            .await
    }
}
