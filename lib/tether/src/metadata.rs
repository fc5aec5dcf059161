//! Declarative method descriptions.
//!
//! A [`MethodMetadata`] is the caller-facing description of one service
//! method: its return type, its parameters, and the markers (HTTP verb,
//! path, feature flags) that drive template resolution and capability
//! selection. Bindings are built from metadata once and reused for every
//! invocation.
//!
//! # Example
//!
//! ```
//! use tether::{MethodMetadata, ParamBinding, TypeDesc, Verb};
//!
//! let metadata = MethodMetadata::new(
//!     "UserApi",
//!     "get_user",
//!     TypeDesc::parameterized("Call", vec![TypeDesc::named("User")]),
//! )
//! .http(Verb::Get, "/users/{id}")
//! .param("id", "u64", ParamBinding::Path("id".into()));
//!
//! assert_eq!(metadata.identity(), "UserApi.get_user()");
//! ```

use tether_core::Verb;

/// Structured description of a Rust type as seen by the binding layer.
///
/// Capability factories inspect these descriptors to decide whether they
/// can handle a method's return or response type. [`TypeDesc::Unresolved`]
/// marks a type the declaring side could not fully name (a type variable
/// or an inference placeholder); bindings reject metadata containing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDesc {
    /// The unit type `()`.
    Unit,
    /// A named type, possibly with type arguments.
    Named {
        /// Base type name, e.g. `"Call"` or `"User"`.
        name: String,
        /// Type arguments, empty for non-generic types.
        args: Vec<TypeDesc>,
    },
    /// A type that could not be resolved to a concrete name.
    Unresolved(String),
}

impl TypeDesc {
    /// A named type without type arguments.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A named type with type arguments.
    #[must_use]
    pub fn parameterized(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::Named {
            name: name.into(),
            args,
        }
    }

    /// An unresolved type placeholder.
    #[must_use]
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self::Unresolved(name.into())
    }

    /// Returns `true` for the unit type.
    #[must_use]
    pub const fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }

    /// First unresolved placeholder in this descriptor, searching
    /// depth-first through type arguments.
    #[must_use]
    pub fn first_unresolved(&self) -> Option<&str> {
        match self {
            Self::Unit => None,
            Self::Named { args, .. } => args.iter().find_map(Self::first_unresolved),
            Self::Unresolved(name) => Some(name),
        }
    }
}

impl std::fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unit => write!(f, "()"),
            Self::Named { name, args } => {
                write!(f, "{name}")?;
                if let Some((first, rest)) = args.split_first() {
                    write!(f, "<{first}")?;
                    for arg in rest {
                        write!(f, ", {arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            Self::Unresolved(name) => write!(f, "{name}"),
        }
    }
}

/// How a parameter is wired into the outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamBinding {
    /// Substituted into a `{placeholder}` path segment.
    Path(String),
    /// Appended as a query parameter under the given key.
    Query(String),
    /// Sent as a request header with the given name.
    Header(String),
    /// Serialized as the request body.
    Body,
    /// Serialized as a form URL-encoded body.
    Form,
}

impl std::fmt::Display for ParamBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(name) => write!(f, "path {{{name}}}"),
            Self::Query(key) => write!(f, "query '{key}'"),
            Self::Header(name) => write!(f, "header '{name}'"),
            Self::Body => write!(f, "body"),
            Self::Form => write!(f, "form"),
        }
    }
}

/// One declared method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name as declared.
    pub name: String,
    /// Declared type name, informational only.
    pub type_name: String,
    /// How the parameter maps onto the request.
    pub binding: ParamBinding,
}

/// A marker attached to a method declaration.
///
/// HTTP markers carry the verb and relative path template. Flag markers
/// are free-form strings that capability factories may match on to select
/// specialized adapters or converters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodMarker {
    /// HTTP verb and relative path template.
    Http {
        /// HTTP verb.
        verb: Verb,
        /// Relative path template, e.g. `/users/{id}`.
        path: String,
    },
    /// Free-form marker for capability selection.
    Flag(String),
}

/// Complete declarative description of one service method.
#[derive(Debug, Clone)]
pub struct MethodMetadata {
    service: String,
    method: String,
    return_type: TypeDesc,
    params: Vec<ParamSpec>,
    markers: Vec<MethodMarker>,
}

impl MethodMetadata {
    /// Creates metadata for `service.method` with the given return type.
    #[must_use]
    pub fn new(
        service: impl Into<String>,
        method: impl Into<String>,
        return_type: TypeDesc,
    ) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
            return_type,
            params: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// Adds an HTTP verb and path marker.
    #[must_use]
    pub fn http(self, verb: Verb, path: impl Into<String>) -> Self {
        self.marker(MethodMarker::Http {
            verb,
            path: path.into(),
        })
    }

    /// Adds a flag marker.
    #[must_use]
    pub fn flag(self, flag: impl Into<String>) -> Self {
        self.marker(MethodMarker::Flag(flag.into()))
    }

    /// Adds a marker.
    #[must_use]
    pub fn marker(mut self, marker: MethodMarker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Declares a parameter.
    #[must_use]
    pub fn param(
        mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        binding: ParamBinding,
    ) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            type_name: type_name.into(),
            binding,
        });
        self
    }

    /// Declaring service name.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Declared return type.
    #[must_use]
    pub const fn return_type(&self) -> &TypeDesc {
        &self.return_type
    }

    /// Declared parameters, in declaration order.
    #[must_use]
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Declared markers, in declaration order.
    #[must_use]
    pub fn markers(&self) -> &[MethodMarker] {
        &self.markers
    }

    /// `"Service.method()"` identity used in error messages.
    #[must_use]
    pub fn identity(&self) -> String {
        format!("{}.{}()", self.service, self.method)
    }
}
