use super::{response::OpaResponse, ApiRequest, Error, Opa, PrettyOptions};
use serde_json::Value;

impl Opa {
    /// The active configuration of OPA, with credentials removed.
    ///
    /// Endpoint for: <https://www.openpolicyagent.org/docs/latest/rest-api/#config-api>
    pub async fn config(&self, options: &PrettyOptions) -> Result<Value, Error> {
        let path = options.params().to_path("/v1/config");
        let res: OpaResponse<Value> = self.send(ApiRequest::get(path)).await?;
        Ok(res.result)
    }
}
