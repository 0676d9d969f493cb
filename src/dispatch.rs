use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::api::ArgMap;
use crate::constant;
use crate::error::{DispatchError, MenuError};
use crate::parser::{ArgumentParser, ParsedArgs};
use crate::tree::CommandTree;

impl CommandTree {
    /// Route a parse result to its composite command and invoke it.
    ///
    /// The hidden discriminator is extracted and removed first; a result
    /// without one fails with [`DispatchError::NoCommandSelected`].  The
    /// remaining pairs are filtered to the composite's combined parameter
    /// names, unless the composite accepts open keywords, in which case every
    /// pair passes through.  The composite's value or error propagates
    /// unchanged.
    pub fn dispatch(&self, parsed: ParsedArgs) -> Result<Value, DispatchError> {
        let mut values = parsed.into_values();

        let id = match values.remove(constant::COMMAND_KEY) {
            Some(Value::String(id)) => id,
            Some(other) => {
                return Err(DispatchError::UnknownCommand {
                    id: other.to_string(),
                })
            }
            None => return Err(DispatchError::NoCommandSelected),
        };

        let composite = self
            .composite(&id)
            .ok_or_else(|| DispatchError::UnknownCommand { id: id.clone() })?;

        let args: ArgMap = if composite.accepts_open_keywords() {
            values
        } else {
            let names: HashSet<&str> = composite
                .params()
                .iter()
                .map(|param| param.name())
                .collect();
            values
                .into_iter()
                .filter(|(name, _)| names.contains(name.as_str()))
                .collect()
        };

        debug!(
            "dispatching '{id}' with {count} argument(s).",
            count = args.len()
        );
        composite.call(&args).map_err(DispatchError::from)
    }

    /// Parse and dispatch in one step.
    pub fn run<P: ArgumentParser + ?Sized>(
        &self,
        parser: &P,
        tokens: &[&str],
    ) -> Result<Value, MenuError> {
        let parsed = parser.parse(self, tokens).map_err(MenuError::Parse)?;
        self.dispatch(parsed).map_err(MenuError::Dispatch)
    }

    /// Parse the process arguments, dispatch, and exit.
    ///
    /// Exits with `0` on success, and with
    /// [`MenuError::exit_code`](crate::MenuError::exit_code) otherwise (`2`
    /// for parse failures, `1` for everything else), printing the error to
    /// stderr first.
    pub fn main<P: ArgumentParser + ?Sized>(&self, parser: &P) -> ! {
        let command_input: Vec<String> = std::env::args().skip(1).collect();
        match self.run(
            parser,
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(_) => std::process::exit(0),
            Err(error) => {
                eprintln!("{error}");
                std::process::exit(error.exit_code());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Command, CommandMenu, FnHandler, Module, Param, Signature};
    use crate::error::ParseError;
    use serde_json::json;

    fn tree() -> CommandTree {
        let echo = FnHandler::new(
            "echo",
            Signature::new().param(Param::required("message")),
            |args: &ArgMap| Ok(args["message"].clone()),
        );
        let sponge = FnHandler::new(
            "sponge",
            Signature::new().param(Param::keyword_rest("extras")),
            |args: &ArgMap| Ok(json!(args.len())),
        );
        let failing = FnHandler::new("failing", Signature::new(), |_: &ArgMap| {
            Err(anyhow::anyhow!("handler exploded"))
        });

        CommandMenu::new("program")
            .toplevel(
                Module::new("misc")
                    .command(Command::new(echo))
                    .command(Command::new(sponge))
                    .command(Command::new(failing)),
            )
            .build_tree()
            .unwrap()
    }

    #[test]
    fn dispatch_selected() {
        // Setup
        let tree = tree();
        let parsed = ParsedArgs::new().select("echo").arg("message", json!("hi"));

        // Execute
        let value = tree.dispatch(parsed).unwrap();

        // Verify
        assert_eq!(value, json!("hi"));
    }

    #[test]
    fn dispatch_no_command() {
        // Setup
        let tree = tree();
        let parsed = ParsedArgs::new().arg("message", json!("hi"));

        // Execute
        let error = tree.dispatch(parsed).unwrap_err();

        // Verify
        assert_matches!(error, DispatchError::NoCommandSelected);
    }

    #[test]
    fn dispatch_unknown_command() {
        // Setup
        let tree = tree();
        let parsed = ParsedArgs::new().select("nonesuch");

        // Execute
        let error = tree.dispatch(parsed).unwrap_err();

        // Verify
        assert_matches!(error, DispatchError::UnknownCommand { id } => {
            assert_eq!(id, "nonesuch".to_string());
        });
    }

    #[test]
    fn dispatch_ignores_extraneous() {
        // Setup
        let tree = tree();
        let parsed = ParsedArgs::new()
            .select("echo")
            .arg("message", json!("hi"))
            .arg("leftover", json!(123));

        // Execute
        let value = tree.dispatch(parsed).unwrap();

        // Verify
        assert_eq!(value, json!("hi"));
    }

    #[test]
    fn dispatch_open_keywords_pass_through() {
        // Setup
        let tree = tree();
        let parsed = ParsedArgs::new()
            .select("sponge")
            .arg("anything", json!(1))
            .arg("at_all", json!(2));

        // Execute
        let value = tree.dispatch(parsed).unwrap();

        // Verify
        assert_eq!(value, json!(2));
    }

    #[test]
    fn dispatch_handler_error_propagates() {
        // Setup
        let tree = tree();
        let parsed = ParsedArgs::new().select("failing");

        // Execute
        let error = tree.dispatch(parsed).unwrap_err();

        // Verify
        assert_matches!(error, DispatchError::Handler(inner) => {
            assert_eq!(inner.to_string(), "handler exploded");
        });
    }

    struct FixedParser(Result<ParsedArgs, ParseError>);

    impl ArgumentParser for FixedParser {
        fn parse(&self, _tree: &CommandTree, _tokens: &[&str]) -> Result<ParsedArgs, ParseError> {
            self.0.clone()
        }
    }

    #[test]
    fn run_success() {
        // Setup
        let tree = tree();
        let parser = FixedParser(Ok(ParsedArgs::new()
            .select("echo")
            .arg("message", json!("hi"))));

        // Execute
        let value = tree.run(&parser, &[]).unwrap();

        // Verify
        assert_eq!(value, json!("hi"));
    }

    #[test]
    fn run_parse_error() {
        // Setup
        let tree = tree();
        let parser = FixedParser(Err(ParseError("unrecognized token '--x'".to_string())));

        // Execute
        let error = tree.run(&parser, &[]).unwrap_err();

        // Verify
        assert_matches!(error, MenuError::Parse(_));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn run_dispatch_error_exit_code() {
        // Setup
        let tree = tree();
        let parser = FixedParser(Ok(ParsedArgs::new()));

        // Execute
        let error = tree.run(&parser, &[]).unwrap_err();

        // Verify
        assert_matches!(error, MenuError::Dispatch(DispatchError::NoCommandSelected));
        assert_eq!(error.exit_code(), 1);
    }
}
