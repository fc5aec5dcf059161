//! Runtime method binding and dispatch for HTTP service clients.
//!
//! Declare service methods as [`MethodMetadata`], bind them once against a
//! registry of call adapters and response converters, and invoke them by
//! name. All declaration mistakes surface at build time with the method
//! identity attached; invocation is a lookup plus a dispatch.
//!
//! # Example
//!
//! ```no_run
//! use tether::{
//!     Argument, JsonConverterFactory, MethodMetadata, ParamBinding, PendingCall,
//!     ServiceClient, TypeDesc, Verb,
//! };
//!
//! #[derive(Debug, serde::Deserialize)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ServiceClient::builder()
//!     .base_url("https://api.example.com")
//!     .converter_factory(JsonConverterFactory::<User>::of("User"))
//!     .method(
//!         MethodMetadata::new(
//!             "UserApi",
//!             "get_user",
//!             TypeDesc::parameterized("Call", vec![TypeDesc::named("User")]),
//!         )
//!         .http(Verb::Get, "/users/{id}")
//!         .param("id", "u64", ParamBinding::Path("id".into())),
//!     )
//!     .build()?;
//!
//! let value = client.invoke("get_user", vec![Argument::text(42)])?;
//! let call = value.downcast::<PendingCall>().map_err(|_| "not a call")?;
//! let user = call
//!     .execute()
//!     .await?
//!     .downcast::<User>()
//!     .map_err(|_| "not a user")?;
//! # Ok(())
//! # }
//! ```

mod adapt;
mod binding;
mod call;
mod capability;
mod client;
mod convert;
mod dispatch;
mod error;
mod metadata;
mod template;
pub mod transport;

// Re-export binding and dispatch types
pub use adapt::{
    FutureAdapter, FutureAdapterFactory, PendingCallAdapter, PendingCallAdapterFactory,
    ResponseFuture,
};
pub use binding::{DiagnosticContext, MethodBinding};
pub use call::{Argument, PendingCall};
pub use capability::{
    AnyValue, CallAdapter, CallAdapterFactory, CapabilityRegistry, Converter, ConverterFactory,
};
pub use client::{ServiceClient, ServiceClientBuilder};
pub use convert::{
    BytesConverterFactory, JsonConverter, JsonConverterFactory, JsonValueConverterFactory,
    TextConverterFactory,
};
pub use dispatch::Dispatcher;
pub use error::{BindError, CapabilityKind, ClientError, FactoryFault, ResolveError};
pub use metadata::{MethodMarker, MethodMetadata, ParamBinding, ParamSpec, TypeDesc};
pub use template::{ParamSlot, RequestTemplate, TemplateError, resolve_template};
pub use transport::{HyperTransport, TransportConfig, TransportConfigBuilder};

// Re-export core types
pub use tether_core::{
    ContentType, Error, Request, RequestBuilder, Response, Result, Transport, TransportFuture,
    Verb, from_json, to_form, to_json,
};

// Re-export http types for status codes and headers
pub use tether_core::{StatusCode, header};

// Re-export crates used in metadata declarations
pub use bytes;
pub use serde_json;
pub use url;
