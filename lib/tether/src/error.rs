//! Binding and client construction errors.
//!
//! Everything that can go wrong while turning a method declaration into a
//! usable binding lives here. Errors raised while executing a request are
//! [`tether_core::Error`].

use derive_more::{Display, Error, From};

use crate::TemplateError;

/// Opaque failure raised by a capability factory while inspecting a type.
pub type FactoryFault = Box<dyn std::error::Error + Send + Sync>;

/// Which capability a registry lookup was after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CapabilityKind {
    /// A call adapter for a method return type.
    #[display("call adapter")]
    CallAdapter,
    /// A response converter for a response body type.
    #[display("response converter")]
    ResponseConverter,
}

/// Failure of a single registry lookup.
#[derive(Debug, Display, Error)]
pub enum ResolveError {
    /// Every registered factory declined the type.
    #[display("no registered {kind} matches {requested}")]
    NotFound {
        /// Capability kind looked up.
        kind: CapabilityKind,
        /// Display form of the requested type.
        requested: String,
    },

    /// A factory recognized the type but failed while building.
    #[display("{kind} factory failed for {requested}: {source}")]
    Fault {
        /// Capability kind looked up.
        kind: CapabilityKind,
        /// Display form of the requested type.
        requested: String,
        /// Underlying factory failure.
        source: FactoryFault,
    },
}

/// Failure to bind one method declaration.
///
/// Every variant carries the method identity (`"Service.method()"`) so the
/// failing declaration is named without the caller re-deriving it.
#[derive(Debug, Display, Error)]
pub enum BindError {
    /// The declaration itself is unusable (unit return, unresolved type).
    #[display("{context}: {detail}")]
    MethodDeclaration {
        /// Method identity.
        context: String,
        /// What is wrong with the declaration.
        detail: String,
    },

    /// No factory matched the requested type.
    #[display("{context}: no registered {kind} matches {requested}")]
    CapabilityNotFound {
        /// Method identity.
        context: String,
        /// Capability kind looked up.
        kind: CapabilityKind,
        /// Display form of the requested type.
        requested: String,
    },

    /// A factory failed while building a capability.
    #[display("{context}: {kind} factory failed for {requested}: {source}")]
    CapabilityFault {
        /// Method identity.
        context: String,
        /// Capability kind looked up.
        kind: CapabilityKind,
        /// Display form of the requested type.
        requested: String,
        /// Underlying factory failure.
        source: FactoryFault,
    },

    /// The method declaration failed template resolution.
    #[display("{context}: {source}")]
    Template {
        /// Method identity.
        context: String,
        /// Underlying template error.
        source: TemplateError,
    },
}

impl BindError {
    /// Wrap a [`ResolveError`] with the failing method's identity.
    #[must_use]
    pub fn from_resolve(context: impl Into<String>, error: ResolveError) -> Self {
        let context = context.into();
        match error {
            ResolveError::NotFound { kind, requested } => Self::CapabilityNotFound {
                context,
                kind,
                requested,
            },
            ResolveError::Fault {
                kind,
                requested,
                source,
            } => Self::CapabilityFault {
                context,
                kind,
                requested,
                source,
            },
        }
    }

    /// Method identity the error is about.
    #[must_use]
    pub fn context(&self) -> &str {
        match self {
            Self::MethodDeclaration { context, .. }
            | Self::CapabilityNotFound { context, .. }
            | Self::CapabilityFault { context, .. }
            | Self::Template { context, .. } => context,
        }
    }
}

/// Failure to build or use a [`crate::ServiceClient`].
#[derive(Debug, Display, Error, From)]
pub enum ClientError {
    /// A method declaration failed to bind.
    #[display("{_0}")]
    Bind(BindError),

    /// Invocation of a method name never registered.
    #[display("unknown method: {method}")]
    #[from(skip)]
    UnknownMethod {
        /// Requested method name.
        method: String,
    },

    /// Two registered methods share the same name.
    #[display("duplicate method: {method}")]
    #[from(skip)]
    DuplicateMethod {
        /// Duplicated method name.
        method: String,
    },

    /// No base URL configured on the builder.
    #[display("no base URL configured")]
    #[from(skip)]
    MissingBaseUrl,

    /// The configured base URL does not parse.
    #[display("invalid base URL: {_0}")]
    InvalidBaseUrl(url::ParseError),
}
