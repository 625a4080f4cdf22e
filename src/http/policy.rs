use super::{
    params::QueryParams, response::OpaResponse, ApiRequest, Error, MetricsResponse, Opa, Policy,
    PrettyOptions,
};

/// Options for policy writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyOptions {
    pub pretty: bool,
    /// Return compiler performance metrics.
    pub metrics: bool,
}

impl PolicyOptions {
    fn params(self) -> QueryParams {
        QueryParams::new()
            .flag("pretty", self.pretty)
            .flag("metrics", self.metrics)
    }
}

fn policy_path(id: &str) -> String {
    format!("/v1/policies/{}", id.trim_start_matches('/'))
}

/// Routes for the [OPA Policy API](https://www.openpolicyagent.org/docs/latest/rest-api/#policy-api).
impl Opa {
    pub async fn list_policies(&self) -> Result<Vec<Policy>, Error> {
        let res: OpaResponse<Vec<Policy>> = self.send(ApiRequest::get("/v1/policies")).await?;
        Ok(res.result)
    }

    pub async fn get_policy(&self, id: &str, options: &PrettyOptions) -> Result<Policy, Error> {
        let path = options.params().to_path(policy_path(id));
        let res: OpaResponse<Policy> = self.send(ApiRequest::get(path)).await?;
        Ok(res.result)
    }

    /// Create or update a policy module from raw Rego source.
    pub async fn put_policy(
        &self,
        id: &str,
        raw: impl Into<String>,
        options: &PolicyOptions,
    ) -> Result<MetricsResponse, Error> {
        let path = options.params().to_path(policy_path(id));
        self.send(ApiRequest::put(path).text("text/plain", raw))
            .await
    }

    /// Same as [`Opa::put_policy`].
    pub async fn create_policy(
        &self,
        id: &str,
        raw: impl Into<String>,
        options: &PolicyOptions,
    ) -> Result<MetricsResponse, Error> {
        self.put_policy(id, raw, options).await
    }

    /// Same as [`Opa::put_policy`].
    pub async fn update_policy(
        &self,
        id: &str,
        raw: impl Into<String>,
        options: &PolicyOptions,
    ) -> Result<MetricsResponse, Error> {
        self.put_policy(id, raw, options).await
    }

    pub async fn delete_policy(
        &self,
        id: &str,
        options: &PolicyOptions,
    ) -> Result<MetricsResponse, Error> {
        let path = options.params().to_path(policy_path(id));
        self.send(ApiRequest::delete(path)).await
    }
}
