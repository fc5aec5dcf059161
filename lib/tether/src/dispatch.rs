//! Invocation dispatch.
//!
//! A [`Dispatcher`] owns the shared execution state (transport and base
//! URL) and turns a binding plus arguments into the method's return value.
//! Dispatch itself never executes the request; it builds a
//! [`PendingCall`] and hands it to the binding's call adapter.

use std::sync::Arc;

use tether_core::Transport;

use crate::{AnyValue, Argument, MethodBinding, PendingCall};

/// Shared execution state for all bound methods of one service.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    base_url: url::Url,
}

impl Dispatcher {
    /// Creates a dispatcher over a transport and base URL.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, base_url: url::Url) -> Self {
        Self {
            transport,
            base_url,
        }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// Dispatch one invocation through a binding.
    ///
    /// Argument problems (arity, shape) are not raised here; they surface
    /// through the adapted value's own error channel when the call runs.
    #[must_use]
    pub fn dispatch(&self, binding: &MethodBinding, args: Vec<Argument>) -> AnyValue {
        let call = PendingCall::new(
            Arc::clone(binding.template()),
            Arc::clone(binding.response_converter()),
            Arc::clone(binding.diagnostics()),
            Arc::clone(&self.transport),
            self.base_url.clone(),
            args,
        );
        binding.call_adapter().adapt(call)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bytes::Bytes;
    use tether_core::{Request, Response, TransportFuture, Verb};

    use super::*;
    use crate::{
        BytesConverterFactory, CapabilityRegistry, MethodMetadata, ParamBinding,
        PendingCallAdapterFactory, TypeDesc,
    };

    struct Ok200;

    impl Transport for Ok200 {
        fn execute(&self, _request: Request<Bytes>) -> TransportFuture {
            Box::pin(async {
                Ok(Response::new(200, HashMap::new(), Bytes::from_static(b"ok")))
            })
        }
    }

    #[tokio::test]
    async fn dispatch_yields_pending_call() {
        let mut registry = CapabilityRegistry::new();
        registry.register_call_adapter_factory(Arc::new(PendingCallAdapterFactory));
        registry.register_converter_factory(Arc::new(BytesConverterFactory));

        let metadata = MethodMetadata::new(
            "UserApi",
            "get_user",
            TypeDesc::parameterized("Call", vec![TypeDesc::named("Bytes")]),
        )
        .http(Verb::Get, "/users/{id}")
        .param("id", "u64", ParamBinding::Path("id".into()));

        let binding = MethodBinding::bind(&metadata, &registry).expect("bind");
        let dispatcher = Dispatcher::new(
            Arc::new(Ok200),
            url::Url::parse("https://api.example.com").expect("valid URL"),
        );

        let value = dispatcher.dispatch(&binding, vec![Argument::text(7)]);
        let call = value.downcast::<PendingCall>().expect("downcast");

        let body = call.execute().await.expect("execute");
        let bytes = body.downcast::<Bytes>().expect("downcast");
        assert_eq!(*bytes, Bytes::from_static(b"ok"));
    }
}
