//! Capability traits and the registry.
//!
//! A [`CapabilityRegistry`] holds ordered lists of [`CallAdapterFactory`]
//! and [`ConverterFactory`] instances. Lookups walk the list in
//! registration order and take the first factory that claims the type, so
//! user-registered factories can shadow the built-in ones.

use std::any::Any;
use std::sync::Arc;

use bytes::Bytes;

use crate::{CapabilityKind, FactoryFault, MethodMarker, PendingCall, ResolveError, TypeDesc};

/// Type-erased converted value.
///
/// Converters and adapters produce values behind this alias; callers
/// downcast to the concrete type the method declared.
pub type AnyValue = Box<dyn Any + Send>;

/// Decodes a raw response body into a typed value.
pub trait Converter: Send + Sync {
    /// Convert a response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be decoded as the target type.
    fn convert(&self, body: &Bytes) -> tether_core::Result<AnyValue>;
}

/// Wraps a [`PendingCall`] into the value shape the method returns.
pub trait CallAdapter: Send + Sync {
    /// Response body type the paired converter must produce.
    fn response_type(&self) -> &TypeDesc;

    /// Adapt a pending call into the method's return value.
    fn adapt(&self, call: PendingCall) -> AnyValue;
}

/// Builds [`CallAdapter`]s for return types it recognizes.
pub trait CallAdapterFactory: Send + Sync {
    /// Try to build an adapter for the given return type.
    ///
    /// Returns `Ok(None)` when this factory does not handle the type, so
    /// the registry moves on to the next factory.
    ///
    /// # Errors
    ///
    /// Returns a fault when the factory recognizes the type but cannot
    /// build an adapter for it.
    fn try_resolve(
        &self,
        return_type: &TypeDesc,
        markers: &[MethodMarker],
    ) -> Result<Option<Arc<dyn CallAdapter>>, FactoryFault>;
}

/// Builds [`Converter`]s for response types it recognizes.
pub trait ConverterFactory: Send + Sync {
    /// Try to build a converter for the given response type.
    ///
    /// Returns `Ok(None)` when this factory does not handle the type.
    ///
    /// # Errors
    ///
    /// Returns a fault when the factory recognizes the type but cannot
    /// build a converter for it.
    fn try_resolve(
        &self,
        response_type: &TypeDesc,
        markers: &[MethodMarker],
    ) -> Result<Option<Arc<dyn Converter>>, FactoryFault>;
}

/// Ordered collection of capability factories.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    adapters: Vec<Arc<dyn CallAdapterFactory>>,
    converters: Vec<Arc<dyn ConverterFactory>>,
}

impl CapabilityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a call adapter factory.
    pub fn register_call_adapter_factory(&mut self, factory: Arc<dyn CallAdapterFactory>) {
        self.adapters.push(factory);
    }

    /// Appends a converter factory.
    pub fn register_converter_factory(&mut self, factory: Arc<dyn ConverterFactory>) {
        self.converters.push(factory);
    }

    /// Resolve a call adapter for a return type.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] when every factory declines, or
    /// [`ResolveError::Fault`] when a factory fails while building.
    pub fn resolve_call_adapter(
        &self,
        return_type: &TypeDesc,
        markers: &[MethodMarker],
    ) -> Result<Arc<dyn CallAdapter>, ResolveError> {
        for factory in &self.adapters {
            match factory.try_resolve(return_type, markers) {
                Ok(Some(adapter)) => return Ok(adapter),
                Ok(None) => {}
                Err(source) => {
                    return Err(ResolveError::Fault {
                        kind: CapabilityKind::CallAdapter,
                        requested: return_type.to_string(),
                        source,
                    });
                }
            }
        }
        Err(ResolveError::NotFound {
            kind: CapabilityKind::CallAdapter,
            requested: return_type.to_string(),
        })
    }

    /// Resolve a converter for a response body type.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] when every factory declines, or
    /// [`ResolveError::Fault`] when a factory fails while building.
    pub fn resolve_response_converter(
        &self,
        response_type: &TypeDesc,
        markers: &[MethodMarker],
    ) -> Result<Arc<dyn Converter>, ResolveError> {
        for factory in &self.converters {
            match factory.try_resolve(response_type, markers) {
                Ok(Some(converter)) => return Ok(converter),
                Ok(None) => {}
                Err(source) => {
                    return Err(ResolveError::Fault {
                        kind: CapabilityKind::ResponseConverter,
                        requested: response_type.to_string(),
                        source,
                    });
                }
            }
        }
        Err(ResolveError::NotFound {
            kind: CapabilityKind::ResponseConverter,
            requested: response_type.to_string(),
        })
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("adapters", &self.adapters.len())
            .field("converters", &self.converters.len())
            .finish()
    }
}
