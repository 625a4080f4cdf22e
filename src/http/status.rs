use super::{response::OpaResponse, ApiRequest, Error, Opa, PrettyOptions};
use serde_json::Value;

impl Opa {
    /// The status reported by the OPA status plugin.
    ///
    /// Endpoint for: <https://www.openpolicyagent.org/docs/latest/rest-api/#status-api>
    pub async fn status(&self, options: &PrettyOptions) -> Result<Value, Error> {
        let path = options.params().to_path("/v1/status");
        let res: OpaResponse<Value> = self.send(ApiRequest::get(path)).await?;
        Ok(res.result)
    }
}
