//! Build hierarchical command line menus from registered handler functions.
//!
//! `cmdtree` walks a tree of [`Module`] registrations into an immutable
//! [`CommandTree`]: each leaf [`Command`] is merged with the module-scoped
//! common functions in scope, its combined signature is resolved into
//! [`OptionDefinition`]s, and the result is handed to an external
//! [`ArgumentParser`] capability.  The parser returns a flat name/value
//! mapping tagged with a hidden discriminator; [`CommandTree::dispatch`]
//! routes that mapping back into the right handler chain.
//!
//! ### Example
//! ```
//! use cmdtree::{ArgMap, ArgumentParser, Command, CommandMenu, CommandTree};
//! use cmdtree::{FnHandler, Module, Param, ParseError, ParsedArgs, Signature};
//! use serde_json::{json, Value};
//!
//! let echo = FnHandler::new(
//!     "echo",
//!     Signature::new().param(Param::required("message").help("Message to echo")),
//!     |args: &ArgMap| Ok(args["message"].clone()),
//! );
//!
//! let tree = CommandMenu::new("demo")
//!     .toplevel(Module::new("misc").command(Command::new(echo).help("Echo to terminal")))
//!     .build_tree()
//!     .unwrap();
//!
//! // The tokenizer is an external capability; stand one in for the example.
//! struct FixedParser;
//!
//! impl ArgumentParser for FixedParser {
//!     fn parse(&self, tree: &CommandTree, tokens: &[&str]) -> Result<ParsedArgs, ParseError> {
//!         let echo = &tree.root().commands()[0];
//!         Ok(ParsedArgs::new()
//!             .select(echo.id())
//!             .arg("message", json!(tokens[0])))
//!     }
//! }
//!
//! let value = tree.run(&FixedParser, &["hello"]).unwrap();
//! assert_eq!(value, json!("hello"));
//! ```
#![deny(missing_docs)]
mod api;
mod constant;
mod dispatch;
mod error;
mod merge;
mod model;
mod parser;
mod schema;
mod tree;
#[allow(missing_docs)]
pub mod prelude;

pub use api::*;
pub use constant::{COMMAND_KEY, DEST_KEY};
pub use error::*;
pub use merge::{merge, CompositeCommand};
pub use model::*;
pub use parser::{ArgumentParser, ParsedArgs};
pub use schema::OptionDefinition;
pub use tree::{CommandNode, CommandTree, MenuNode};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(test)]
pub(crate) mod test {
    macro_rules! assert_contains {
        ($base:expr, $sub:expr) => {
            assert!(
                $base.contains($sub),
                "'{b}' does not contain '{s}'",
                b = $base,
                s = $sub,
            );
        };
    }

    pub(crate) use assert_contains;
}
