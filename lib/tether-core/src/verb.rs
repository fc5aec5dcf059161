//! HTTP verb types.

use derive_more::Display;

/// HTTP request verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Verb {
    /// GET - retrieve a resource.
    #[display("GET")]
    Get,
    /// POST - create a resource.
    #[display("POST")]
    Post,
    /// PUT - replace a resource.
    #[display("PUT")]
    Put,
    /// DELETE - remove a resource.
    #[display("DELETE")]
    Delete,
    /// PATCH - partially update a resource.
    #[display("PATCH")]
    Patch,
    /// HEAD - retrieve headers only.
    #[display("HEAD")]
    Head,
    /// OPTIONS - retrieve allowed methods.
    #[display("OPTIONS")]
    Options,
}

impl Verb {
    /// Returns `true` if this verb carries a request body.
    #[must_use]
    pub const fn supports_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl From<Verb> for http::Method {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => Self::GET,
            Verb::Post => Self::POST,
            Verb::Put => Self::PUT,
            Verb::Delete => Self::DELETE,
            Verb::Patch => Self::PATCH,
            Verb::Head => Self::HEAD,
            Verb::Options => Self::OPTIONS,
        }
    }
}

impl TryFrom<http::Method> for Verb {
    type Error = crate::Error;

    fn try_from(method: http::Method) -> Result<Self, Self::Error> {
        match method {
            http::Method::GET => Ok(Self::Get),
            http::Method::POST => Ok(Self::Post),
            http::Method::PUT => Ok(Self::Put),
            http::Method::DELETE => Ok(Self::Delete),
            http::Method::PATCH => Ok(Self::Patch),
            http::Method::HEAD => Ok(Self::Head),
            http::Method::OPTIONS => Ok(Self::Options),
            other => Err(crate::Error::InvalidRequest(format!(
                "unsupported HTTP verb: {other}"
            ))),
        }
    }
}
