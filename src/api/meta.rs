use serde_json::{Map, Value};

/// Structured per-parameter configuration.
///
/// Everything on an `OptionMeta` is optional; unset pieces fall back to the
/// auto-derivation rules (positional when required, `--name` flag when
/// defaulted).  Settings added via [`OptionMeta::set`] pass through verbatim
/// to the argument-parser capability.
///
/// ### Example
/// ```
/// use cmdtree::{OptionMeta, Param};
/// use serde_json::json;
///
/// Param::required("numbers").meta(
///     OptionMeta::new()
///         .help("Numbers to sum up")
///         .set("nargs", json!("+"))
///         .set("type", json!("int")),
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionMeta {
    pub(crate) help: Option<String>,
    pub(crate) name_or_flags: Option<Vec<String>>,
    pub(crate) default: Option<Value>,
    pub(crate) extra: Map<String, Value>,
}

impl OptionMeta {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Document the help message for this option.
    /// If repeated, only the final help message will apply.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help.replace(text.into());
        self
    }

    /// Add an explicit CLI spelling, replacing the auto-derived one.
    ///
    /// May be repeated to declare alternate spellings (ex: `--verbose` and
    /// `-v`).  If any spelling starts with `-`, the option is optional-style
    /// and its destination is forced to the parameter name.
    pub fn flag(mut self, spelling: impl Into<String>) -> Self {
        self.name_or_flags
            .get_or_insert_with(Vec::default)
            .push(spelling.into());
        self
    }

    /// Override the parameter's own default value.
    /// If repeated, only the final default will apply.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default.replace(value);
        self
    }

    /// Add a parser-specific setting, passed through verbatim to the
    /// argument-parser capability (ex: `nargs`, `choices`, `type`).
    ///
    /// The reserved destination key (`dest`) is rejected at menu construction.
    pub fn set(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
