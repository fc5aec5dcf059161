//! Per-invocation call state.
//!
//! A [`PendingCall`] pairs one method's binding with one set of argument
//! values. [`PendingCall::request`] materializes the outgoing request from
//! the template; [`PendingCall::execute`] runs it through the transport
//! and converts the response body.

use std::sync::Arc;

use bytes::Bytes;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use tether_core::{ContentType, Request, Transport};

use crate::{AnyValue, Converter, DiagnosticContext, ParamBinding, RequestTemplate};

/// Characters percent-encoded inside a substituted path segment.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// A positional argument value for one invocation.
#[derive(Debug, Clone)]
pub enum Argument {
    /// Textual value for path, query, and header slots.
    Text(String),
    /// Structured value for body and form slots.
    Json(serde_json::Value),
    /// Raw bytes for body slots.
    Bytes(Bytes),
}

impl Argument {
    /// Textual argument from anything displayable.
    #[must_use]
    pub fn text(value: impl ToString) -> Self {
        Self::Text(value.to_string())
    }

    /// Structured argument from a serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn json<T: serde::Serialize>(value: &T) -> tether_core::Result<Self> {
        let value = serde_json::to_value(value)?;
        Ok(Self::Json(value))
    }

    /// Raw bytes argument.
    #[must_use]
    pub const fn bytes(value: Bytes) -> Self {
        Self::Bytes(value)
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Json(_) => "json",
            Self::Bytes(_) => "bytes",
        }
    }
}

/// One prepared invocation, ready to execute.
#[derive(Clone)]
pub struct PendingCall {
    template: Arc<RequestTemplate>,
    converter: Arc<dyn Converter>,
    diagnostics: Arc<DiagnosticContext>,
    transport: Arc<dyn Transport>,
    base_url: url::Url,
    args: Vec<Argument>,
}

impl PendingCall {
    pub(crate) fn new(
        template: Arc<RequestTemplate>,
        converter: Arc<dyn Converter>,
        diagnostics: Arc<DiagnosticContext>,
        transport: Arc<dyn Transport>,
        base_url: url::Url,
        args: Vec<Argument>,
    ) -> Self {
        Self {
            template,
            converter,
            diagnostics,
            transport,
            base_url,
            args,
        }
    }

    /// Diagnostic identification of the bound method.
    #[must_use]
    pub fn diagnostics(&self) -> &DiagnosticContext {
        &self.diagnostics
    }

    /// Materialize the outgoing request from template and arguments.
    ///
    /// Arguments are matched positionally against the template's slots.
    ///
    /// # Errors
    ///
    /// Returns [`tether_core::Error::InvalidRequest`] when the argument
    /// count does not match the slot count, or when an argument's shape
    /// does not fit its slot (e.g. raw bytes in a query slot). The error
    /// message names the method, never the argument values.
    pub fn request(&self) -> tether_core::Result<Request<Bytes>> {
        let slots = self.template.slots();
        if self.args.len() != slots.len() {
            return Err(tether_core::Error::invalid_request(format!(
                "expected {} argument(s), got {} for {}",
                slots.len(),
                self.args.len(),
                self.diagnostics
            )));
        }

        let mut path = self.template.path().to_string();
        for (slot, arg) in slots.iter().zip(&self.args) {
            if let (ParamBinding::Path(placeholder), Argument::Text(value)) = (&slot.binding, arg) {
                let encoded = utf8_percent_encode(value, PATH_SEGMENT_ENCODE_SET).to_string();
                path = path.replace(&format!("{{{placeholder}}}"), &encoded);
            }
        }

        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(tether_core::Error::from)?;

        let mut builder = Request::builder(self.template.verb(), url);
        for (slot, arg) in slots.iter().zip(&self.args) {
            builder = match (&slot.binding, arg) {
                (ParamBinding::Path(_), Argument::Text(_)) => builder,
                (ParamBinding::Query(key), Argument::Text(value)) => builder.query(key, value),
                (ParamBinding::Header(name), Argument::Text(value)) => {
                    builder.header(name.clone(), value.clone())
                }
                (ParamBinding::Body, Argument::Json(value)) => builder.json(value)?,
                (ParamBinding::Body, Argument::Bytes(bytes)) => builder
                    .header("Content-Type", ContentType::OctetStream.as_str())
                    .body(bytes.clone()),
                (ParamBinding::Form, Argument::Json(value)) => builder.form(value)?,
                (binding, arg) => {
                    return Err(tether_core::Error::invalid_request(format!(
                        "{} argument does not fit {} slot '{}' for {}",
                        arg.kind(),
                        binding,
                        slot.name,
                        self.diagnostics
                    )));
                }
            };
        }

        Ok(builder.build())
    }

    /// Execute the call and convert the response body.
    ///
    /// # Errors
    ///
    /// Returns a request-building error, a transport error, an
    /// [`tether_core::Error::Http`] for non-2xx responses (carrying the
    /// raw body), or a conversion error.
    pub async fn execute(self) -> tether_core::Result<AnyValue> {
        let request = self.request()?;
        let response = self.transport.execute(request).await?;

        let (status, _, body) = response.into_parts();
        if !(200..300).contains(&status) {
            return Err(tether_core::Error::http_with_body(
                status,
                self.diagnostics.to_string(),
                body,
            ));
        }

        self.converter.convert(&body)
    }
}

impl std::fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingCall")
            .field("diagnostics", &self.diagnostics)
            .field("args", &self.args.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tether_core::{Response, TransportFuture, Verb};

    use super::*;
    use crate::{
        BytesConverterFactory, CapabilityRegistry, ConverterFactory, MethodBinding,
        MethodMetadata, PendingCallAdapterFactory, TypeDesc,
    };

    struct Canned(u16, &'static str);

    impl Transport for Canned {
        fn execute(&self, _request: Request<Bytes>) -> TransportFuture {
            let status = self.0;
            let body = Bytes::from_static(self.1.as_bytes());
            Box::pin(async move { Ok(Response::new(status, HashMap::new(), body)) })
        }
    }

    fn pending(metadata: &MethodMetadata, args: Vec<Argument>, transport: Canned) -> PendingCall {
        let mut registry = CapabilityRegistry::new();
        registry.register_call_adapter_factory(Arc::new(PendingCallAdapterFactory));
        registry.register_converter_factory(Arc::new(BytesConverterFactory));

        let binding = MethodBinding::bind(metadata, &registry).expect("bind");
        let base_url = url::Url::parse("https://api.example.com").expect("valid URL");
        PendingCall::new(
            Arc::clone(binding.template()),
            Arc::clone(binding.response_converter()),
            Arc::clone(binding.diagnostics()),
            Arc::new(transport),
            base_url,
            args,
        )
    }

    fn get_user() -> MethodMetadata {
        MethodMetadata::new(
            "UserApi",
            "get_user",
            TypeDesc::parameterized("Call", vec![TypeDesc::named("Bytes")]),
        )
        .http(Verb::Get, "/users/{id}")
        .param("id", "u64", ParamBinding::Path("id".into()))
    }

    #[test]
    fn builds_request_with_path_substitution() {
        let call = pending(&get_user(), vec![Argument::text(42)], Canned(200, "ok"));
        let request = call.request().expect("request");

        assert_eq!(request.verb(), Verb::Get);
        assert_eq!(request.url().as_str(), "https://api.example.com/users/42");
    }

    #[test]
    fn percent_encodes_path_values() {
        let call = pending(
            &get_user(),
            vec![Argument::text("a b/c")],
            Canned(200, "ok"),
        );
        let request = call.request().expect("request");

        assert_eq!(
            request.url().as_str(),
            "https://api.example.com/users/a%20b%2Fc"
        );
    }

    #[test]
    fn wires_query_and_header_slots() {
        let metadata = MethodMetadata::new(
            "UserApi",
            "list",
            TypeDesc::parameterized("Call", vec![TypeDesc::named("Bytes")]),
        )
        .http(Verb::Get, "/users")
        .param("page", "u32", ParamBinding::Query("page".into()))
        .param("accept", "String", ParamBinding::Header("Accept".into()));

        let call = pending(
            &metadata,
            vec![Argument::text(2), Argument::text("application/json")],
            Canned(200, "ok"),
        );
        let request = call.request().expect("request");

        assert_eq!(request.url().as_str(), "https://api.example.com/users?page=2");
        assert_eq!(request.header("Accept"), Some("application/json"));
    }

    #[test]
    fn wires_json_body() {
        let metadata = MethodMetadata::new(
            "UserApi",
            "create",
            TypeDesc::parameterized("Call", vec![TypeDesc::named("Bytes")]),
        )
        .http(Verb::Post, "/users")
        .param("user", "NewUser", ParamBinding::Body);

        let arg = Argument::json(&serde_json::json!({"name": "alice"})).expect("json");
        let call = pending(&metadata, vec![arg], Canned(201, "created"));
        let request = call.request().expect("request");

        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(
            request.body().map(AsRef::as_ref),
            Some(&br#"{"name":"alice"}"#[..])
        );
    }

    #[test]
    fn arity_mismatch_names_the_method() {
        let call = pending(&get_user(), vec![], Canned(200, "ok"));
        let err = call.request().expect_err("should fail");

        let msg = err.to_string();
        assert!(msg.contains("expected 1 argument(s), got 0"), "{msg}");
        assert!(msg.contains("UserApi.get_user()"), "{msg}");
    }

    #[test]
    fn slot_kind_mismatch_names_slot_not_value() {
        let call = pending(
            &get_user(),
            vec![Argument::bytes(Bytes::from_static(b"secret"))],
            Canned(200, "ok"),
        );
        let err = call.request().expect_err("should fail");

        let msg = err.to_string();
        assert!(msg.contains("bytes argument does not fit path {id} slot 'id'"), "{msg}");
        assert!(!msg.contains("secret"), "values must stay out: {msg}");
    }

    #[tokio::test]
    async fn execute_converts_success_body() {
        let call = pending(&get_user(), vec![Argument::text(1)], Canned(200, "payload"));
        let value = call.execute().await.expect("execute");

        let bytes = value.downcast::<Bytes>().expect("downcast");
        assert_eq!(*bytes, Bytes::from_static(b"payload"));
    }

    #[tokio::test]
    async fn execute_maps_error_status() {
        let call = pending(&get_user(), vec![Argument::text(1)], Canned(404, "missing"));
        let err = call.execute().await.expect_err("should fail");

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body().map(AsRef::as_ref), Some(&b"missing"[..]));
        assert!(err.to_string().contains("UserApi.get_user()"));
    }

    #[tokio::test]
    async fn execute_surfaces_conversion_failure() {
        struct Refusing;

        impl Converter for Refusing {
            fn convert(&self, _body: &Bytes) -> tether_core::Result<AnyValue> {
                Err(tether_core::Error::decode("not the right shape"))
            }
        }

        struct RefusingFactory;

        impl ConverterFactory for RefusingFactory {
            fn try_resolve(
                &self,
                _response_type: &TypeDesc,
                _markers: &[crate::MethodMarker],
            ) -> Result<Option<Arc<dyn Converter>>, crate::FactoryFault> {
                Ok(Some(Arc::new(Refusing)))
            }
        }

        let mut registry = CapabilityRegistry::new();
        registry.register_call_adapter_factory(Arc::new(PendingCallAdapterFactory));
        registry.register_converter_factory(Arc::new(RefusingFactory));

        let metadata = get_user();
        let binding = MethodBinding::bind(&metadata, &registry).expect("bind");
        let call = PendingCall::new(
            Arc::clone(binding.template()),
            Arc::clone(binding.response_converter()),
            Arc::clone(binding.diagnostics()),
            Arc::new(Canned(200, "ok")),
            url::Url::parse("https://api.example.com").expect("valid URL"),
            vec![Argument::text(1)],
        );

        let err = call.execute().await.expect_err("should fail");
        assert_eq!(err.to_string(), "decode error: not the right shape");
    }
}
