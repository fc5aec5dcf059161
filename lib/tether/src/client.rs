//! Service client facade.
//!
//! A [`ServiceClient`] binds a set of declared methods at build time and
//! dispatches invocations by method name. All the expensive work (template
//! resolution, capability lookup) happens once in
//! [`ServiceClientBuilder::build`]; [`ServiceClient::invoke`] is a map
//! lookup plus a dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use tether_core::Transport;

use crate::transport::HyperTransport;
use crate::{
    AnyValue, Argument, BytesConverterFactory, CallAdapterFactory, CapabilityRegistry,
    ClientError, ConverterFactory, Dispatcher, FutureAdapterFactory, JsonValueConverterFactory,
    MethodBinding, MethodMetadata, PendingCallAdapterFactory, TextConverterFactory,
};

/// Builder for [`ServiceClient`].
///
/// User-registered factories take priority over the built-in ones; the
/// registry is first-match in registration order and the defaults are
/// appended last.
#[derive(Default)]
pub struct ServiceClientBuilder {
    base_url: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    adapter_factories: Vec<Arc<dyn CallAdapterFactory>>,
    converter_factories: Vec<Arc<dyn ConverterFactory>>,
    methods: Vec<MethodMetadata>,
}

impl ServiceClientBuilder {
    /// Sets the base URL all requests resolve against.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the transport. Defaults to [`HyperTransport`].
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Registers a call adapter factory ahead of the built-ins.
    #[must_use]
    pub fn adapter_factory(mut self, factory: impl CallAdapterFactory + 'static) -> Self {
        self.adapter_factories.push(Arc::new(factory));
        self
    }

    /// Registers a converter factory ahead of the built-ins.
    #[must_use]
    pub fn converter_factory(mut self, factory: impl ConverterFactory + 'static) -> Self {
        self.converter_factories.push(Arc::new(factory));
        self
    }

    /// Declares a method to bind.
    #[must_use]
    pub fn method(mut self, metadata: MethodMetadata) -> Self {
        self.methods.push(metadata);
        self
    }

    /// Bind every declared method and build the client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingBaseUrl`] or
    /// [`ClientError::InvalidBaseUrl`] for configuration problems,
    /// [`ClientError::DuplicateMethod`] when two declarations share a
    /// name, and [`ClientError::Bind`] for the first declaration that
    /// fails to bind.
    pub fn build(self) -> Result<ServiceClient, ClientError> {
        let base_url = self.base_url.ok_or(ClientError::MissingBaseUrl)?;
        let base_url = url::Url::parse(&base_url)?;

        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(HyperTransport::new()));

        let mut registry = CapabilityRegistry::new();
        for factory in self.adapter_factories {
            registry.register_call_adapter_factory(factory);
        }
        for factory in self.converter_factories {
            registry.register_converter_factory(factory);
        }
        registry.register_call_adapter_factory(Arc::new(FutureAdapterFactory));
        registry.register_call_adapter_factory(Arc::new(PendingCallAdapterFactory));
        registry.register_converter_factory(Arc::new(BytesConverterFactory));
        registry.register_converter_factory(Arc::new(TextConverterFactory));
        registry.register_converter_factory(Arc::new(JsonValueConverterFactory));

        let mut bindings = HashMap::with_capacity(self.methods.len());
        for metadata in &self.methods {
            let binding = MethodBinding::bind(metadata, &registry)?;
            if bindings
                .insert(metadata.method().to_string(), binding)
                .is_some()
            {
                return Err(ClientError::DuplicateMethod {
                    method: metadata.method().to_string(),
                });
            }
        }

        tracing::info!(
            base_url = %base_url,
            methods = bindings.len(),
            "service client built"
        );

        Ok(ServiceClient {
            bindings,
            dispatcher: Dispatcher::new(transport, base_url),
        })
    }
}

/// A set of bound methods over one base URL and transport.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    bindings: HashMap<String, MethodBinding>,
    dispatcher: Dispatcher,
}

impl ServiceClient {
    /// Creates a [`ServiceClientBuilder`].
    #[must_use]
    pub fn builder() -> ServiceClientBuilder {
        ServiceClientBuilder::default()
    }

    /// Invoke a bound method by name.
    ///
    /// The returned value's concrete type is whatever the method's call
    /// adapter produces; downcast to the declared return shape.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnknownMethod`] when no method of that name
    /// was bound.
    pub fn invoke(&self, method: &str, args: Vec<Argument>) -> Result<AnyValue, ClientError> {
        let binding = self
            .bindings
            .get(method)
            .ok_or_else(|| ClientError::UnknownMethod {
                method: method.to_string(),
            })?;
        Ok(self.dispatcher.dispatch(binding, args))
    }

    /// Look up the binding for a method name.
    #[must_use]
    pub fn binding(&self, method: &str) -> Option<&MethodBinding> {
        self.bindings.get(method)
    }

    /// Number of bound methods.
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.bindings.len()
    }
}
