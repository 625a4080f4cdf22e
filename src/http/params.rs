use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Query string builder, parameters are encoded in insertion order.
#[derive(Debug, Default)]
pub(crate) struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds `name=true` only if the flag is set.
    pub(crate) fn flag(mut self, name: &'static str, set: bool) -> Self {
        if set {
            self.pairs.push((name, "true".into()));
        }
        self
    }

    pub(crate) fn value(mut self, name: &'static str, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.pairs.push((name, value.into()));
        }
        self
    }

    pub(crate) fn values<I, S>(mut self, name: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pairs
            .extend(values.into_iter().map(|v| (name, v.into())));
        self
    }

    /// Appends the query string to the path, the path is returned
    /// unchanged without parameters.
    pub(crate) fn to_path(&self, path: impl Into<String>) -> String {
        let mut path = path.into();

        if self.pairs.is_empty() {
            return path;
        }

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();

        path.push('?');
        path.push_str(&query);
        path
    }
}

/// Level of detail for query explanations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Explain {
    Notes,
    Fails,
    Full,
    Debug,
}

impl Explain {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Explain::Notes => "notes",
            Explain::Fails => "fails",
            Explain::Full => "full",
            Explain::Debug => "debug",
        }
    }
}

/// Options for endpoints that only support pretty-printing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyOptions {
    /// Format the response for humans.
    pub pretty: bool,
}

impl PrettyOptions {
    pub(crate) fn params(self) -> QueryParams {
        QueryParams::new().flag("pretty", self.pretty)
    }
}
