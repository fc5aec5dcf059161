//! Request template resolution.
//!
//! [`resolve_template`] walks a method's markers and parameters once,
//! validating the declaration and producing a [`RequestTemplate`] that the
//! per-call layer fills in with argument values. All structural mistakes
//! in a declaration surface here, at binding time, never at call time.

use tether_core::Verb;

use crate::{MethodMarker, MethodMetadata, ParamBinding};

/// Resolved request shape for one method.
///
/// Holds the verb, the relative path template, and one [`ParamSlot`] per
/// declared parameter in declaration order. Slots are matched positionally
/// against call arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTemplate {
    verb: Verb,
    path: String,
    slots: Vec<ParamSlot>,
}

/// One argument slot in a resolved template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSlot {
    /// Parameter name as declared.
    pub name: String,
    /// How the argument is wired into the request.
    pub binding: ParamBinding,
}

impl RequestTemplate {
    /// HTTP verb.
    #[must_use]
    pub const fn verb(&self) -> Verb {
        self.verb
    }

    /// Relative path template.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Argument slots in declaration order.
    #[must_use]
    pub fn slots(&self) -> &[ParamSlot] {
        &self.slots
    }
}

/// Structural errors in a method declaration.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TemplateError {
    /// No HTTP marker on the method.
    #[display("no HTTP verb marker on method")]
    MissingVerb,

    /// More than one HTTP marker on the method.
    #[display("conflicting HTTP verb markers: {first} and {second}")]
    ConflictingVerbs {
        /// First declared verb.
        first: Verb,
        /// Second declared verb.
        second: Verb,
    },

    /// More than one body-carrying parameter.
    #[display("conflicting body parameters: '{first}' and '{second}'")]
    ConflictingBodies {
        /// First body parameter name.
        first: String,
        /// Second body parameter name.
        second: String,
    },

    /// Body parameter on a verb that does not carry a body.
    #[display("{verb} does not support a request body (parameter '{param}')")]
    BodyNotAllowed {
        /// Declared verb.
        verb: Verb,
        /// Offending parameter name.
        param: String,
    },

    /// A path placeholder with no matching path parameter.
    #[display("path placeholder {{{name}}} has no matching parameter")]
    UnboundPlaceholder {
        /// Placeholder name.
        name: String,
    },

    /// A path parameter naming a placeholder absent from the path.
    #[display("parameter '{param}' references unknown path placeholder {{{placeholder}}}")]
    UnknownPathParam {
        /// Parameter name.
        param: String,
        /// Placeholder the parameter claims to fill.
        placeholder: String,
    },

    /// Two parameters bound to the same path placeholder.
    #[display("placeholder {{{placeholder}}} bound by both '{first}' and '{second}'")]
    DuplicatePathParam {
        /// Placeholder name.
        placeholder: String,
        /// First parameter bound to it.
        first: String,
        /// Second parameter bound to it.
        second: String,
    },
}

/// Resolve method metadata into a [`RequestTemplate`].
///
/// Validation covers the verb marker (exactly one), body parameters (at
/// most one, and only on body-carrying verbs), and path placeholders
/// (every `{name}` filled by exactly one path parameter, and every path
/// parameter naming a real placeholder).
///
/// # Errors
///
/// Returns a [`TemplateError`] describing the first structural problem
/// found in the declaration.
pub fn resolve_template(metadata: &MethodMetadata) -> Result<RequestTemplate, TemplateError> {
    let mut http: Option<(Verb, &str)> = None;
    for marker in metadata.markers() {
        if let MethodMarker::Http { verb, path } = marker {
            match http {
                None => http = Some((*verb, path)),
                Some((first, _)) => {
                    return Err(TemplateError::ConflictingVerbs {
                        first,
                        second: *verb,
                    });
                }
            }
        }
    }
    let (verb, path) = http.ok_or(TemplateError::MissingVerb)?;

    let mut body_param: Option<&str> = None;
    for param in metadata.params() {
        if matches!(param.binding, ParamBinding::Body | ParamBinding::Form) {
            match body_param {
                None => body_param = Some(&param.name),
                Some(first) => {
                    return Err(TemplateError::ConflictingBodies {
                        first: first.to_string(),
                        second: param.name.clone(),
                    });
                }
            }
        }
    }
    if let Some(param) = body_param {
        if !verb.supports_body() {
            return Err(TemplateError::BodyNotAllowed {
                verb,
                param: param.to_string(),
            });
        }
    }

    let placeholders = extract_path_placeholders(path);
    for placeholder in &placeholders {
        let mut bound: Option<&str> = None;
        for param in metadata.params() {
            if let ParamBinding::Path(name) = &param.binding {
                if name == placeholder {
                    match bound {
                        None => bound = Some(&param.name),
                        Some(first) => {
                            return Err(TemplateError::DuplicatePathParam {
                                placeholder: placeholder.clone(),
                                first: first.to_string(),
                                second: param.name.clone(),
                            });
                        }
                    }
                }
            }
        }
        if bound.is_none() {
            return Err(TemplateError::UnboundPlaceholder {
                name: placeholder.clone(),
            });
        }
    }
    for param in metadata.params() {
        if let ParamBinding::Path(name) = &param.binding {
            if !placeholders.contains(name) {
                return Err(TemplateError::UnknownPathParam {
                    param: param.name.clone(),
                    placeholder: name.clone(),
                });
            }
        }
    }

    let slots = metadata
        .params()
        .iter()
        .map(|param| ParamSlot {
            name: param.name.clone(),
            binding: param.binding.clone(),
        })
        .collect();

    Ok(RequestTemplate {
        verb,
        path: path.to_string(),
        slots,
    })
}

/// Extract `{placeholder}` names from a path template.
fn extract_path_placeholders(path: &str) -> Vec<String> {
    let mut placeholders = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + len];
        if !name.is_empty() && !placeholders.iter().any(|p| p == name) {
            placeholders.push(name.to_string());
        }
        rest = &rest[start + len + 1..];
    }
    placeholders
}
