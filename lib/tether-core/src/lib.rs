//! Core types and traits for the tether declarative HTTP client.
//!
//! This crate provides the wire-level contract shared by the binding core
//! and by transport implementations:
//! - [`Verb`] - HTTP verb enum
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] - HTTP response type
//! - [`Error`] and [`Result`] - Error handling
//! - [`Transport`] - Object-safe trait for HTTP execution
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`header`] - HTTP header names (re-exported from `http` crate)

mod body;
mod error;
mod request;
mod response;
mod transport;
mod verb;

pub use body::{ContentType, from_json, to_form, to_json};
pub use error::{Error, Result};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use transport::{Transport, TransportFuture};
pub use verb::Verb;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
