//! Transport executor trait.
//!
//! A [`Transport`] takes a fully-built [`Request`] and yields either a raw
//! [`Response`] or a failure. Connection management, pooling, retries, and
//! timeouts all live behind this boundary; the binding and dispatch layer
//! never executes requests itself.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Boxed future returned by [`Transport::execute`].
pub type TransportFuture = Pin<Box<dyn Future<Output = Result<Response<Bytes>>> + Send + 'static>>;

/// Object-safe trait for executing HTTP requests.
///
/// Implementations should be async-first and cheap to share; the dispatch
/// layer holds one transport behind an `Arc` and clones the handle into
/// every pending call.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use bytes::Bytes;
/// use tether_core::{Request, Response, Transport, TransportFuture};
///
/// struct Canned;
///
/// impl Transport for Canned {
///     fn execute(&self, _request: Request<Bytes>) -> TransportFuture {
///         Box::pin(async { Ok(Response::new(200, HashMap::new(), Bytes::from("ok"))) })
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Invalid response
    fn execute(&self, request: Request<Bytes>) -> TransportFuture;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: Request<Bytes>) -> TransportFuture {
        (**self).execute(request)
    }
}
