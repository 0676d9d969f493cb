use std::sync::Arc;

use serde_json::{Map, Value};

use crate::api::signature::Signature;

/// Flat mapping of argument name to parsed value.
pub type ArgMap = Map<String, Value>;

/// A registered callable.
///
/// The declared [`Signature`] drives schema derivation; `call` receives only
/// arguments matching that signature, unless the signature ends in a
/// [`ParamKind::KeywordRest`](crate::ParamKind::KeywordRest) catch-all, in
/// which case every parsed argument is passed through.
///
/// Errors from `call` propagate unmodified to the dispatcher's caller; the
/// framework makes no resilience claims about handler bodies.
pub trait Handler {
    /// The handler identifier; a leaf command takes its display name from the
    /// last handler merged into it.
    fn name(&self) -> &str;

    /// The declared parameter list.
    fn signature(&self) -> &Signature;

    /// Invoke the handler with the parsed arguments.
    fn call(&self, args: &ArgMap) -> anyhow::Result<Value>;
}

/// Adapts a function and its declared [`Signature`] into a [`Handler`].
///
/// ### Example
/// ```
/// use cmdtree::{ArgMap, FnHandler, Param, Signature};
///
/// let echo = FnHandler::new(
///     "echo",
///     Signature::new().param(Param::required("message").help("Message to echo")),
///     |args: &ArgMap| Ok(args["message"].clone()),
/// );
/// ```
pub struct FnHandler<F> {
    name: String,
    signature: Signature,
    func: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&ArgMap) -> anyhow::Result<Value>,
{
    /// Create a handler from a name, a declared signature, and a function.
    pub fn new(name: impl Into<String>, signature: Signature, func: F) -> Self {
        Self {
            name: name.into(),
            signature,
            func,
        }
    }
}

impl<F> FnHandler<F>
where
    F: Fn(&ArgMap) -> anyhow::Result<Value> + 'static,
{
    /// Move into the shared form used by registrations.
    pub fn shared(self) -> Arc<dyn Handler> {
        Arc::new(self)
    }
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&ArgMap) -> anyhow::Result<Value>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, args: &ArgMap) -> anyhow::Result<Value> {
        (self.func)(args)
    }
}
