use thiserror::Error;

use crate::model::ParamKind;

/// Invalid declared signature on a registered handler.
///
/// Surfaced during menu construction, before any parsing occurs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The same parameter name appears twice in one signature.
    #[error("duplicate parameter '{parameter}' in handler '{handler}'.")]
    DuplicateParameter {
        /// The handler declaring the signature.
        handler: String,
        /// The repeated parameter name.
        parameter: String,
    },

    /// A catch-all parameter is followed by further parameters.
    #[error("catch-all parameter '{parameter}' in handler '{handler}' must be declared last.")]
    CatchAllNotLast {
        /// The handler declaring the signature.
        handler: String,
        /// The misplaced catch-all parameter.
        parameter: String,
    },

    /// More than one catch-all of the same kind in one signature.
    #[error("handler '{handler}' declares more than one {kind} parameter.")]
    RepeatedCatchAll {
        /// The handler declaring the signature.
        handler: String,
        /// The repeated catch-all kind.
        kind: ParamKind,
    },
}

/// Menu construction failure.
///
/// All variants indicate programmer/configuration mistakes; none are retried
/// or silently recovered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// A registered handler declares an invalid signature.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// Option metadata supplies the reserved destination key.
    #[error("'dest' is not allowed in metadata for parameter '{parameter}' of command '{command}'.")]
    ReservedKey {
        /// The command being registered.
        command: String,
        /// The offending parameter.
        parameter: String,
    },

    /// Merged handlers declare the same parameter name with different kinds.
    #[error("cannot merge parameter '{parameter}' into command '{command}': declared both as {first} and {second}.")]
    MergeConflict {
        /// The command being registered.
        command: String,
        /// The conflicting parameter name.
        parameter: String,
        /// The kind declared first.
        first: ParamKind,
        /// The later, incompatible kind.
        second: ParamKind,
    },

    /// Two leaf commands resolve to the same display name in one namespace.
    #[error("duplicate command '{command}' under '{namespace}'.")]
    DuplicateCommand {
        /// The namespace containing the collision.
        namespace: String,
        /// The colliding command name.
        command: String,
    },

    /// Malformed per-node or per-parameter configuration.
    #[error("invalid configuration for command '{command}': {message}")]
    Configuration {
        /// The command being registered.
        command: String,
        /// What went wrong.
        message: String,
    },
}

/// Tokenization failure reported by an [`ArgumentParser`](crate::ArgumentParser) implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Parse error: {0}")]
pub struct ParseError(pub String);

/// Dispatch failure.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The parse result carries no discriminator; no subcommand path reached a leaf.
    #[error("no command selected.")]
    NoCommandSelected,

    /// The discriminator names a command the tree never issued.
    #[error("unknown command '{id}'.")]
    UnknownCommand {
        /// The unrecognized discriminator value.
        id: String,
    },

    /// The invoked handler failed; its error propagates unmodified.
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

/// Umbrella error for the full parse-and-dispatch cycle.
#[derive(Debug, Error)]
pub enum MenuError {
    /// Menu construction failed.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The argument-parser capability rejected the input tokens.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Dispatch failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl MenuError {
    /// The process exit code for this error.
    ///
    /// Parse failures exit with `2`; construction and dispatch failures exit
    /// with `1`.  Success is always `0` and never produced by an error.
    pub fn exit_code(&self) -> i32 {
        match self {
            MenuError::Parse(_) => 2,
            MenuError::Build(_) | MenuError::Dispatch(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::assert_contains;

    #[test]
    fn exit_codes() {
        assert_eq!(
            MenuError::Parse(ParseError("nope".to_string())).exit_code(),
            2
        );
        assert_eq!(
            MenuError::Build(BuildError::DuplicateCommand {
                namespace: "root".to_string(),
                command: "copy".to_string(),
            })
            .exit_code(),
            1
        );
        assert_eq!(
            MenuError::Dispatch(DispatchError::NoCommandSelected).exit_code(),
            1
        );
    }

    #[test]
    fn messages() {
        let error = BuildError::ReservedKey {
            command: "copy".to_string(),
            parameter: "src".to_string(),
        };
        assert_contains!(error.to_string(), "'dest' is not allowed");
        assert_contains!(error.to_string(), "copy");

        let error = BuildError::MergeConflict {
            command: "copy".to_string(),
            parameter: "extras".to_string(),
            first: ParamKind::Named,
            second: ParamKind::KeywordRest,
        };
        assert_contains!(error.to_string(), "Named");
        assert_contains!(error.to_string(), "KeywordRest");

        let error = MenuError::Parse(ParseError("unrecognized token '--x'".to_string()));
        assert_contains!(error.to_string(), "Parse error");
    }
}
