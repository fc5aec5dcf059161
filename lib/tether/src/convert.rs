//! Built-in response converters.
//!
//! [`JsonConverterFactory`] handles typed JSON deserialization for a type
//! name chosen at registration. The remaining factories cover the raw
//! shapes every client wants: `Bytes` passthrough, UTF-8 text, and
//! untyped [`serde_json::Value`].

use std::marker::PhantomData;
use std::sync::Arc;

use bytes::Bytes;

use crate::{AnyValue, Converter, ConverterFactory, FactoryFault, MethodMarker, TypeDesc};

/// JSON converter for a concrete deserializable type.
pub struct JsonConverter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonConverter<T> {
    /// Creates a JSON converter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Converter for JsonConverter<T>
where
    T: serde::de::DeserializeOwned + Send + 'static,
{
    fn convert(&self, body: &Bytes) -> tether_core::Result<AnyValue> {
        let value: T = tether_core::from_json(body)?;
        Ok(Box::new(value))
    }
}

/// Factory producing [`JsonConverter`]s for one named response type.
///
/// # Example
///
/// ```
/// use tether::JsonConverterFactory;
///
/// #[derive(serde::Deserialize)]
/// struct User { id: u64 }
///
/// let factory = JsonConverterFactory::<User>::of("User");
/// # let _ = factory;
/// ```
pub struct JsonConverterFactory<T> {
    type_name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonConverterFactory<T> {
    /// Factory matching response types named `type_name`.
    #[must_use]
    pub fn of(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            _marker: PhantomData,
        }
    }
}

impl<T> ConverterFactory for JsonConverterFactory<T>
where
    T: serde::de::DeserializeOwned + Send + 'static,
{
    fn try_resolve(
        &self,
        response_type: &TypeDesc,
        _markers: &[MethodMarker],
    ) -> Result<Option<Arc<dyn Converter>>, FactoryFault> {
        match response_type {
            TypeDesc::Named { name, .. } if *name == self.type_name => {
                Ok(Some(Arc::new(JsonConverter::<T>::new())))
            }
            _ => Ok(None),
        }
    }
}

/// Passthrough converter for `Bytes` response types.
pub struct BytesConverterFactory;

struct BytesConverter;

impl Converter for BytesConverter {
    fn convert(&self, body: &Bytes) -> tether_core::Result<AnyValue> {
        Ok(Box::new(body.clone()))
    }
}

impl ConverterFactory for BytesConverterFactory {
    fn try_resolve(
        &self,
        response_type: &TypeDesc,
        _markers: &[MethodMarker],
    ) -> Result<Option<Arc<dyn Converter>>, FactoryFault> {
        match response_type {
            TypeDesc::Named { name, args } if name == "Bytes" && args.is_empty() => {
                Ok(Some(Arc::new(BytesConverter)))
            }
            _ => Ok(None),
        }
    }
}

/// UTF-8 text converter for `String` response types.
pub struct TextConverterFactory;

struct TextConverter;

impl Converter for TextConverter {
    fn convert(&self, body: &Bytes) -> tether_core::Result<AnyValue> {
        let text = String::from_utf8(body.to_vec())
            .map_err(|e| tether_core::Error::decode(e.to_string()))?;
        Ok(Box::new(text))
    }
}

impl ConverterFactory for TextConverterFactory {
    fn try_resolve(
        &self,
        response_type: &TypeDesc,
        _markers: &[MethodMarker],
    ) -> Result<Option<Arc<dyn Converter>>, FactoryFault> {
        match response_type {
            TypeDesc::Named { name, args } if name == "String" && args.is_empty() => {
                Ok(Some(Arc::new(TextConverter)))
            }
            _ => Ok(None),
        }
    }
}

/// Untyped JSON converter for `Value` response types.
pub struct JsonValueConverterFactory;

struct JsonValueConverter;

impl Converter for JsonValueConverter {
    fn convert(&self, body: &Bytes) -> tether_core::Result<AnyValue> {
        let value: serde_json::Value = tether_core::from_json(body)?;
        Ok(Box::new(value))
    }
}

impl ConverterFactory for JsonValueConverterFactory {
    fn try_resolve(
        &self,
        response_type: &TypeDesc,
        _markers: &[MethodMarker],
    ) -> Result<Option<Arc<dyn Converter>>, FactoryFault> {
        match response_type {
            TypeDesc::Named { name, args } if name == "Value" && args.is_empty() => {
                Ok(Some(Arc::new(JsonValueConverter)))
            }
            _ => Ok(None),
        }
    }
}
