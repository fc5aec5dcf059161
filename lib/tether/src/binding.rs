//! Method binding.
//!
//! [`MethodBinding::bind`] is the once-per-method resolution step: it
//! validates the declaration, resolves the request template, and looks up
//! the call adapter and response converter. The resulting binding is
//! immutable and shared by every invocation of the method.

use std::sync::Arc;

use tether_core::Verb;

use crate::{
    BindError, CallAdapter, CapabilityRegistry, Converter, MethodMetadata, RequestTemplate,
    resolve_template,
};

/// Stable identification of a bound method for error reporting.
///
/// Rendered as
/// `"Service.method(), HTTP method = GET, relative path template = /users/{id}"`.
/// Carries only declaration-time facts, never argument values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticContext {
    service: String,
    method: String,
    verb: Verb,
    path: String,
}

impl DiagnosticContext {
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
}

impl std::fmt::Display for DiagnosticContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}(), HTTP method = {}, relative path template = {}",
            self.service, self.method, self.verb, self.path
        )
    }
}

/// Immutable per-method binding.
///
/// Cheap to clone; all fields sit behind [`Arc`]s.
#[derive(Clone)]
pub struct MethodBinding {
    template: Arc<RequestTemplate>,
    adapter: Arc<dyn CallAdapter>,
    converter: Arc<dyn Converter>,
    diagnostics: Arc<DiagnosticContext>,
}

impl MethodBinding {
    /// Bind a method declaration against a capability registry.
    ///
    /// Validation runs in a fixed order: the declaration itself (no unit
    /// return, no unresolved types), then template resolution, then call
    /// adapter lookup, then response converter lookup for the adapter's
    /// response type.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] naming the method and the first failing
    /// step.
    pub fn bind(
        metadata: &MethodMetadata,
        registry: &CapabilityRegistry,
    ) -> Result<Self, BindError> {
        let context = metadata.identity();

        if metadata.return_type().is_unit() {
            return Err(BindError::MethodDeclaration {
                context,
                detail: "method must not return ()".to_string(),
            });
        }
        if let Some(name) = metadata.return_type().first_unresolved() {
            return Err(BindError::MethodDeclaration {
                context,
                detail: format!("return type contains unresolved type '{name}'"),
            });
        }

        let template = resolve_template(metadata).map_err(|source| BindError::Template {
            context: context.clone(),
            source,
        })?;

        let adapter = registry
            .resolve_call_adapter(metadata.return_type(), metadata.markers())
            .map_err(|e| BindError::from_resolve(&context, e))?;

        let response_type = adapter.response_type().clone();
        if let Some(name) = response_type.first_unresolved() {
            return Err(BindError::MethodDeclaration {
                context,
                detail: format!("response type contains unresolved type '{name}'"),
            });
        }

        let converter = registry
            .resolve_response_converter(&response_type, metadata.markers())
            .map_err(|e| BindError::from_resolve(&context, e))?;

        let diagnostics = DiagnosticContext {
            service: metadata.service().to_string(),
            method: metadata.method().to_string(),
            verb: template.verb(),
            path: template.path().to_string(),
        };

        tracing::debug!(
            method = %context,
            verb = %template.verb(),
            path = %template.path(),
            "method bound"
        );

        Ok(Self {
            template: Arc::new(template),
            adapter,
            converter,
            diagnostics: Arc::new(diagnostics),
        })
    }

    /// Resolved request template.
    #[must_use]
    pub fn template(&self) -> &Arc<RequestTemplate> {
        &self.template
    }

    /// Resolved call adapter.
    #[must_use]
    pub fn call_adapter(&self) -> &Arc<dyn CallAdapter> {
        &self.adapter
    }

    /// Resolved response converter.
    #[must_use]
    pub fn response_converter(&self) -> &Arc<dyn Converter> {
        &self.converter
    }

    /// Diagnostic identification of the bound method.
    #[must_use]
    pub fn diagnostics(&self) -> &Arc<DiagnosticContext> {
        &self.diagnostics
    }
}

impl std::fmt::Debug for MethodBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodBinding")
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        BytesConverterFactory, ParamBinding, PendingCallAdapterFactory, TypeDesc, Verb,
    };

    fn registry() -> CapabilityRegistry {
        let mut registry = CapabilityRegistry::new();
        registry.register_call_adapter_factory(Arc::new(PendingCallAdapterFactory));
        registry.register_converter_factory(Arc::new(BytesConverterFactory));
        registry
    }

    fn call_of(inner: TypeDesc) -> TypeDesc {
        TypeDesc::parameterized("Call", vec![inner])
    }

    #[test]
    fn binds_valid_method() {
        let metadata =
            MethodMetadata::new("UserApi", "get_user", call_of(TypeDesc::named("Bytes")))
                .http(Verb::Get, "/users/{id}")
                .param("id", "u64", ParamBinding::Path("id".into()));

        let binding = MethodBinding::bind(&metadata, &registry()).expect("bind");
        assert_eq!(binding.template().verb(), Verb::Get);
        assert_eq!(
            binding.diagnostics().to_string(),
            "UserApi.get_user(), HTTP method = GET, relative path template = /users/{id}"
        );
    }

    #[test]
    fn rejects_unit_return() {
        let metadata =
            MethodMetadata::new("UserApi", "ping", TypeDesc::Unit).http(Verb::Get, "/ping");

        let err = MethodBinding::bind(&metadata, &registry()).expect_err("should fail");
        assert_eq!(err.to_string(), "UserApi.ping(): method must not return ()");
    }

    #[test]
    fn rejects_unresolved_return_type() {
        let metadata =
            MethodMetadata::new("UserApi", "get", call_of(TypeDesc::unresolved("T")))
                .http(Verb::Get, "/users");

        let err = MethodBinding::bind(&metadata, &registry()).expect_err("should fail");
        assert_eq!(
            err.to_string(),
            "UserApi.get(): return type contains unresolved type 'T'"
        );
    }

    #[test]
    fn template_error_before_capability_lookup() {
        // No verb marker and no matching adapter: the template error wins.
        let metadata = MethodMetadata::new("UserApi", "get", TypeDesc::named("Unadaptable"));

        let err = MethodBinding::bind(&metadata, &registry()).expect_err("should fail");
        assert_eq!(err.to_string(), "UserApi.get(): no HTTP verb marker on method");
    }

    #[test]
    fn missing_adapter_reported_with_identity() {
        let metadata = MethodMetadata::new("UserApi", "get", TypeDesc::named("Weird"))
            .http(Verb::Get, "/users");

        let err = MethodBinding::bind(&metadata, &registry()).expect_err("should fail");
        assert_eq!(
            err.to_string(),
            "UserApi.get(): no registered call adapter matches Weird"
        );
    }

    #[test]
    fn missing_converter_reported_with_identity() {
        let metadata = MethodMetadata::new("UserApi", "get", call_of(TypeDesc::named("User")))
            .http(Verb::Get, "/users");

        let err = MethodBinding::bind(&metadata, &registry()).expect_err("should fail");
        assert_eq!(
            err.to_string(),
            "UserApi.get(): no registered response converter matches User"
        );
    }
}
