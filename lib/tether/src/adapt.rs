//! Built-in call adapters.
//!
//! Two return shapes are supported out of the box: `Call<T>` hands the
//! caller the [`PendingCall`] itself for explicit execution, and
//! `Future<T>` eagerly wraps execution into a [`ResponseFuture`] that can
//! be awaited directly.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;

use crate::{
    AnyValue, CallAdapter, CallAdapterFactory, FactoryFault, MethodMarker, PendingCall, TypeDesc,
};

/// Adapter returning the [`PendingCall`] unchanged.
pub struct PendingCallAdapter {
    response_type: TypeDesc,
}

impl CallAdapter for PendingCallAdapter {
    fn response_type(&self) -> &TypeDesc {
        &self.response_type
    }

    fn adapt(&self, call: PendingCall) -> AnyValue {
        Box::new(call)
    }
}

/// Factory matching `Call<T>` return types.
///
/// The adapter's response type is the inner `T`, so the registry pairs it
/// with a converter for the payload rather than the wrapper.
pub struct PendingCallAdapterFactory;

impl CallAdapterFactory for PendingCallAdapterFactory {
    fn try_resolve(
        &self,
        return_type: &TypeDesc,
        _markers: &[MethodMarker],
    ) -> Result<Option<Arc<dyn CallAdapter>>, FactoryFault> {
        match return_type {
            TypeDesc::Named { name, args } if name == "Call" && args.len() == 1 => {
                let Some(inner) = args.first() else {
                    return Ok(None);
                };
                Ok(Some(Arc::new(PendingCallAdapter {
                    response_type: inner.clone(),
                })))
            }
            _ => Ok(None),
        }
    }
}

/// Awaitable handle over an executing call.
///
/// Resolves to the converted response value, or the execution error.
pub struct ResponseFuture {
    inner: BoxFuture<'static, tether_core::Result<AnyValue>>,
}

impl ResponseFuture {
    /// Start executing a pending call.
    #[must_use]
    pub fn new(call: PendingCall) -> Self {
        Self {
            inner: Box::pin(call.execute()),
        }
    }
}

impl std::future::Future for ResponseFuture {
    type Output = tether_core::Result<AnyValue>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

impl std::fmt::Debug for ResponseFuture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseFuture").finish_non_exhaustive()
    }
}

/// Adapter wrapping execution into a [`ResponseFuture`].
pub struct FutureAdapter {
    response_type: TypeDesc,
}

impl CallAdapter for FutureAdapter {
    fn response_type(&self) -> &TypeDesc {
        &self.response_type
    }

    fn adapt(&self, call: PendingCall) -> AnyValue {
        Box::new(ResponseFuture::new(call))
    }
}

/// Factory matching `Future<T>` return types.
pub struct FutureAdapterFactory;

impl CallAdapterFactory for FutureAdapterFactory {
    fn try_resolve(
        &self,
        return_type: &TypeDesc,
        _markers: &[MethodMarker],
    ) -> Result<Option<Arc<dyn CallAdapter>>, FactoryFault> {
        match return_type {
            TypeDesc::Named { name, args } if name == "Future" && args.len() == 1 => {
                let Some(inner) = args.first() else {
                    return Ok(None);
                };
                Ok(Some(Arc::new(FutureAdapter {
                    response_type: inner.clone(),
                })))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_call_factory_unwraps_inner_type() {
        let factory = PendingCallAdapterFactory;
        let adapter = factory
            .try_resolve(
                &TypeDesc::parameterized("Call", vec![TypeDesc::named("User")]),
                &[],
            )
            .expect("no fault")
            .expect("match");

        assert_eq!(adapter.response_type(), &TypeDesc::named("User"));
    }

    #[test]
    fn pending_call_factory_declines_other_shapes() {
        let factory = PendingCallAdapterFactory;

        let bare = factory
            .try_resolve(&TypeDesc::named("Call"), &[])
            .expect("no fault");
        assert!(bare.is_none());

        let wrong_name = factory
            .try_resolve(
                &TypeDesc::parameterized("Task", vec![TypeDesc::named("User")]),
                &[],
            )
            .expect("no fault");
        assert!(wrong_name.is_none());

        let two_args = factory
            .try_resolve(
                &TypeDesc::parameterized(
                    "Call",
                    vec![TypeDesc::named("User"), TypeDesc::named("Order")],
                ),
                &[],
            )
            .expect("no fault");
        assert!(two_args.is_none());
    }

    #[test]
    fn future_factory_unwraps_inner_type() {
        let factory = FutureAdapterFactory;
        let adapter = factory
            .try_resolve(
                &TypeDesc::parameterized("Future", vec![TypeDesc::named("String")]),
                &[],
            )
            .expect("no fault")
            .expect("match");

        assert_eq!(adapter.response_type(), &TypeDesc::named("String"));
    }
}
