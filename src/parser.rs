use serde_json::{Map, Value};

use crate::constant;
use crate::error::ParseError;
use crate::tree::CommandTree;

/// The flat result of tokenizing a command line.
///
/// Maps option destinations to parsed values.  The selected command travels
/// in the same mapping, under the hidden discriminator key
/// ([`COMMAND_KEY`](crate::COMMAND_KEY)), recorded via [`ParsedArgs::select`].
///
/// ### Example
/// ```
/// use cmdtree::ParsedArgs;
/// use serde_json::json;
///
/// ParsedArgs::new()
///     .select("fs copy")
///     .arg("src", json!("a.txt"))
///     .arg("force", json!(true));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    values: Map<String, Value>,
}

impl ParsedArgs {
    /// Create an empty parse result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a parsed name/value pair.
    /// If repeated for one name, only the final value will apply.
    pub fn arg(mut self, name: impl Into<String>, value: Value) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Record the selected command: the discriminator value of the
    /// [`CommandNode`](crate::CommandNode) that parsing reached.
    pub fn select(mut self, id: impl Into<String>) -> Self {
        self.values
            .insert(constant::COMMAND_KEY.to_string(), Value::String(id.into()));
        self
    }

    pub(crate) fn into_values(self) -> Map<String, Value> {
        self.values
    }
}

/// The external argument-tokenizing capability.
///
/// `cmdtree` derives the schema and routes the result; turning raw tokens
/// into name/value pairs is this collaborator's job.  An implementation walks
/// the tree's nested [`CommandNode`](crate::CommandNode) option definitions
/// with conventional CLI semantics: `-`/`--` prefixes for flagged spellings,
/// positional binding for the rest, `required`/`default` honored, and
/// [`extra`](crate::OptionDefinition::extra) settings (nargs, choices, ...)
/// interpreted as it sees fit.
pub trait ArgumentParser {
    /// Tokenize `tokens` against the tree's option definitions.
    ///
    /// On success the result holds one value per matched option destination,
    /// plus the discriminator for the selected command (when a leaf was
    /// reached).
    fn parse(&self, tree: &CommandTree, tokens: &[&str]) -> Result<ParsedArgs, ParseError>;
}
