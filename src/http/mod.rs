#![allow(clippy::missing_errors_doc)]

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

mod compile;
mod config;
mod data;
mod error;
mod health;
mod params;
mod policy;
mod query;
mod request;
mod response;
mod status;

pub use compile::{CompileOptions, CompileRequest, FilterTarget};
pub use data::{EvalOptions, MetricsOptions, PatchOp, PatchOperation, SetDocumentOptions};
pub use error::{Error, ServerError};
pub use health::HealthOptions;
pub use params::{Explain, PrettyOptions};
pub use policy::PolicyOptions;
pub use query::QueryOptions;
pub use request::{ApiRequest, Body};
pub use response::{
    CompileResponse, DataResponse, Decision, Metrics, MetricsResponse, Policy, Provenance,
    QueryResponse, Warning,
};

/// Client for the [OPA REST API](https://www.openpolicyagent.org/docs/latest/rest-api/).
///
/// The configuration is fixed once the client is built, cloning is cheap and
/// clones can be used from any number of tasks at once.
#[derive(Debug, Clone)]
pub struct Opa {
    base_url: String,
    default_headers: HeaderMap,
    compress_requests: bool,
    client: reqwest::Client,
}

impl Opa {
    /// Create a client with the default configuration.
    ///
    /// Trailing slashes of the URL are ignored, `http://localhost:8181/`
    /// and `http://localhost:8181` are the same target.
    pub fn new(url: impl AsRef<str>) -> Result<Self, Error> {
        Self::builder(url).build()
    }

    #[must_use]
    pub fn builder(url: impl AsRef<str>) -> OpaBuilder {
        OpaBuilder::new(url)
    }

    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The base URL without trailing slashes.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers sent with every request.
    #[must_use]
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }
}

/// Builder for an [`Opa`] client.
#[derive(Debug)]
pub struct OpaBuilder {
    url: String,
    default_headers: HeaderMap,
    compress_requests: bool,
    client: Option<reqwest::Client>,
}

impl OpaBuilder {
    fn new(url: impl AsRef<str>) -> Self {
        Self {
            url: url.as_ref().to_owned(),
            default_headers: HeaderMap::new(),
            compress_requests: true,
            client: None,
        }
    }

    /// Add a header that is sent with every request.
    ///
    /// `Accept` and `Accept-Encoding` set here are overridden by the
    /// client's own defaults, use per-request headers to change those.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, Error> {
        let name = HeaderName::try_from(name.as_ref())?;
        let value = HeaderValue::try_from(value.as_ref())?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    #[must_use]
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers.extend(headers);
        self
    }

    /// Whether JSON request bodies are gzip-compressed, enabled by default.
    #[must_use]
    pub fn compress_requests(mut self, enabled: bool) -> Self {
        self.compress_requests = enabled;
        self
    }

    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<Opa, Error> {
        let base_url = self.url.trim_end_matches('/');

        // Only validated, paths are appended to the string as-is.
        Url::parse(base_url)?;

        Ok(Opa {
            base_url: base_url.to_owned(),
            default_headers: self.default_headers,
            compress_requests: self.compress_requests,
            client: self.client.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slashes() {
        let opa = Opa::new("http://localhost:8181/").unwrap();
        assert_eq!(opa.base_url(), "http://localhost:8181");

        let opa = Opa::new("http://localhost:8181/opa//").unwrap();
        assert_eq!(opa.base_url(), "http://localhost:8181/opa");
    }

    #[test]
    fn rejects_invalid_url() {
        assert!(matches!(Opa::new("not a url"), Err(Error::Url(_))));
    }

    #[test]
    fn rejects_invalid_default_header() {
        let res = Opa::builder("http://localhost:8181").default_header("bad header", "x");
        assert!(matches!(res, Err(Error::InvalidHeaderName(_))));
    }

    #[test]
    fn keeps_default_headers() {
        let opa = Opa::builder("http://localhost:8181")
            .default_header("Authorization", "Bearer secret")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            opa.default_headers().get("authorization").unwrap(),
            "Bearer secret"
        );
    }
}
