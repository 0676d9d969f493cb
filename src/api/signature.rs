use std::collections::HashSet;

use serde_json::Value;

use crate::api::handler::Handler;
use crate::api::meta::OptionMeta;
use crate::error::SignatureError;
use crate::model::ParamKind;

/// Per-parameter configuration attached to a [`Param`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Annotation {
    /// No configuration; the option is fully auto-derived.
    #[default]
    None,
    /// Help text only; everything else is auto-derived.
    Help(String),
    /// Structured configuration.
    Meta(OptionMeta),
}

/// One declared handler parameter.
///
/// ### Example
/// ```
/// use cmdtree::Param;
/// use serde_json::json;
///
/// Param::required("src").help("Source path");
/// Param::with_default("retries", json!(3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: String,
    kind: ParamKind,
    default: Option<Value>,
    annotation: Annotation,
}

impl Param {
    fn new(name: impl Into<String>, kind: ParamKind, default: Option<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            default,
            annotation: Annotation::None,
        }
    }

    /// A required named parameter (no default).
    pub fn required(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Named, None)
    }

    /// A named parameter with a default value.
    ///
    /// `Value::Null` is a representable default.
    pub fn with_default(name: impl Into<String>, default: Value) -> Self {
        Self::new(name, ParamKind::Named, Some(default))
    }

    /// Trailing catch-all for the remaining positional values.
    pub fn rest(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Rest, None)
    }

    /// Open keyword catch-all.
    ///
    /// Never exposed as a user-facing option; its presence makes the handler
    /// receive every parsed argument by name.
    pub fn keyword_rest(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::KeywordRest, None)
    }

    /// Attach help text.
    /// If repeated, or combined with [`Param::meta`], only the final annotation applies.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.annotation = Annotation::Help(text.into());
        self
    }

    /// Attach structured metadata.
    /// If repeated, or combined with [`Param::help`], only the final annotation applies.
    pub fn meta(mut self, meta: OptionMeta) -> Self {
        self.annotation = Annotation::Meta(meta);
        self
    }

    /// The parameter name; unique within its signature.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How this parameter binds its input.
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// The parameter's own default, if declared.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The attached annotation.
    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }
}

/// The declared parameter list of a handler, in declaration order.
///
/// Built once per handler at registration time; there is no runtime
/// reflection.
///
/// ### Example
/// ```
/// use cmdtree::{Param, Signature};
/// use serde_json::json;
///
/// let signature = Signature::new()
///     .param(Param::required("src"))
///     .param(Param::with_default("retries", json!(3)));
/// assert_eq!(signature.params().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    /// Create an empty signature.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the next parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// The declared parameters, in declaration order, including catch-alls.
    pub fn params(&self) -> &[Param] {
        &self.params
    }
}

/// Describe the declared signature of `handler`.
///
/// Returns the full parameter list in declaration order, including catch-alls
/// (they are excluded only at option generation).  Fails when the declaration
/// violates the signature invariants: parameter names must be unique, a
/// [`ParamKind::Rest`] may be followed only by a [`ParamKind::KeywordRest`],
/// and a `KeywordRest` must be last.
pub fn describe(handler: &dyn Handler) -> Result<&[Param], SignatureError> {
    let params = handler.signature().params();
    let mut names = HashSet::with_capacity(params.len());
    let mut rest: Option<&str> = None;
    let mut keyword_rest: Option<&str> = None;

    for param in params {
        if !names.insert(param.name()) {
            return Err(SignatureError::DuplicateParameter {
                handler: handler.name().to_string(),
                parameter: param.name().to_string(),
            });
        }

        if let Some(name) = keyword_rest {
            if param.kind() == ParamKind::KeywordRest {
                return Err(SignatureError::RepeatedCatchAll {
                    handler: handler.name().to_string(),
                    kind: ParamKind::KeywordRest,
                });
            }

            return Err(SignatureError::CatchAllNotLast {
                handler: handler.name().to_string(),
                parameter: name.to_string(),
            });
        }

        match param.kind() {
            ParamKind::Named => {
                if let Some(name) = rest {
                    return Err(SignatureError::CatchAllNotLast {
                        handler: handler.name().to_string(),
                        parameter: name.to_string(),
                    });
                }
            }
            ParamKind::Rest => {
                if rest.is_some() {
                    return Err(SignatureError::RepeatedCatchAll {
                        handler: handler.name().to_string(),
                        kind: ParamKind::Rest,
                    });
                }

                rest = Some(param.name());
            }
            ParamKind::KeywordRest => {
                keyword_rest = Some(param.name());
            }
        }
    }

    Ok(params)
}
