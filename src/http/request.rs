use super::{Error, Opa, ServerError};
use bytes::Bytes;
use flate2::{write::GzEncoder, Compression};
use reqwest::{
    header::{
        HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, CONTENT_ENCODING,
        CONTENT_TYPE,
    },
    Method,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Write;
use tracing::{field, Span};

/// Body of an [`ApiRequest`].
#[derive(Debug, Clone)]
pub enum Body {
    /// Textual body, JSON text bodies may be compressed before sending.
    Text(String),
    /// Opaque bytes sent as-is.
    Bytes(Bytes),
}

/// A single request to OPA, executed with [`Opa::send`].
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Option<Body>,
}

impl ApiRequest {
    /// The path is relative to the base URL of the client and may
    /// contain a query string.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Set a header for this request only, overriding any default.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn try_header(self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self, Error> {
        let name = HeaderName::try_from(name.as_ref())?;
        let value = HeaderValue::try_from(value.as_ref())?;
        Ok(self.header(name, value))
    }

    /// Serialize the value as the JSON body of the request.
    pub fn json(self, value: &impl Serialize) -> Result<Self, Error> {
        let text = serde_json::to_string(value).map_err(Error::Encode)?;
        Ok(self.text("application/json", text))
    }

    #[must_use]
    pub fn text(mut self, content_type: &'static str, text: impl Into<String>) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.body = Some(Body::Text(text.into()));
        self
    }

    #[must_use]
    pub fn bytes(mut self, bytes: impl Into<Bytes>) -> Self {
        self.body = Some(Body::Bytes(bytes.into()));
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Opa {
    /// Execute a request and decode the JSON response.
    ///
    /// An empty response body is decoded as an empty JSON object, use
    /// [`serde::de::IgnoredAny`] when the response is not needed.
    ///
    /// # Errors
    ///
    /// Transport errors are returned as-is, responses with a non-success
    /// status are returned as [`Error::Server`].
    #[tracing::instrument(
        name = "opa_request",
        skip_all,
        fields(
            http.method = %request.method,
            http.path = %request.path,
            http.status_code = field::Empty,
        )
    )]
    pub async fn send<T>(&self, request: ApiRequest) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        if !request.path.starts_with('/') {
            return Err(Error::InvalidPath(request.path));
        }

        let url = format!("{}{}", self.base_url, request.path);
        let mut headers = self.request_headers(request.headers);

        let mut builder = self.client.request(request.method, &url);

        match request.body {
            Some(Body::Text(text)) if self.compress_requests && is_json(&headers) => {
                match gzip(&text) {
                    Ok(compressed) => {
                        tracing::trace!(
                            uncompressed = text.len(),
                            compressed = compressed.len(),
                            "compressed request body"
                        );
                        headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
                        builder = builder.body(compressed);
                    }
                    Err(error) => {
                        tracing::debug!(%error, "request compression failed, sending uncompressed");
                        builder = builder.body(text);
                    }
                }
            }
            Some(Body::Text(text)) => builder = builder.body(text),
            Some(Body::Bytes(bytes)) => builder = builder.body(bytes),
            None => {}
        }

        let response = builder.headers(headers).send().await?;
        let status = response.status();

        Span::current().record("http.status_code", status.as_u16());
        tracing::debug!(%status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServerError::from_body(status, &body).into());
        }

        let body = response.text().await?;
        decode_body(&body)
    }

    /// Configuration defaults, then the fixed client headers, then
    /// the headers of the request.
    fn request_headers(&self, overrides: HeaderMap) -> HeaderMap {
        let mut headers = self.default_headers.clone();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        headers.extend(overrides);
        headers
    }
}

fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    if body.trim().is_empty() {
        return T::deserialize(Value::Object(Map::new())).map_err(Error::Decode);
    }

    serde_json::from_str(body).map_err(Error::Decode)
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let media_type = content_type.split(';').next().unwrap_or_default().trim();

    media_type.eq_ignore_ascii_case("application/json")
        || media_type.eq_ignore_ascii_case("application/json-patch+json")
}

fn gzip(text: &str) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(text.len() / 2), Compression::default());
    encoder.write_all(text.as_bytes())?;
    encoder.finish()
}

/// Response of endpoints that return nothing of interest.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Empty {}
