use super::{params::QueryParams, ApiRequest, Error, Explain, Opa, PrettyOptions, QueryResponse};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Options for ad-hoc queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOptions {
    pub pretty: bool,
    pub explain: Option<Explain>,
    pub metrics: bool,
}

/// Routes for the [OPA Query API](https://www.openpolicyagent.org/docs/latest/rest-api/#query-api).
impl Opa {
    /// Evaluate the default decision, `data.system.main` unless configured
    /// otherwise on the server.
    ///
    /// Endpoint for: <https://www.openpolicyagent.org/docs/latest/rest-api/#execute-a-simple-query>
    pub async fn query_default<I, R>(&self, input: &I, options: &PrettyOptions) -> Result<R, Error>
    where
        I: Serialize,
        R: DeserializeOwned,
    {
        let path = options.params().to_path("/");
        self.send(ApiRequest::post(path).json(input)?).await
    }

    /// Endpoint for: <https://www.openpolicyagent.org/docs/latest/rest-api/#execute-an-ad-hoc-query>
    pub async fn query<R>(
        &self,
        query: &str,
        input: Option<&Value>,
        options: &QueryOptions,
    ) -> Result<QueryResponse<R>, Error>
    where
        R: DeserializeOwned,
    {
        #[derive(Serialize)]
        struct QueryRequest<'a> {
            query: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            input: Option<&'a Value>,
        }

        let path = QueryParams::new()
            .flag("pretty", options.pretty)
            .value("explain", options.explain.map(Explain::as_str))
            .flag("metrics", options.metrics)
            .to_path("/v1/query");

        self.send(ApiRequest::post(path).json(&QueryRequest { query, input })?)
            .await
    }
}
