use std::sync::Arc;

use crate::api::handler::Handler;

/// One leaf command registration.
///
/// ### Example
/// ```
/// use cmdtree::{ArgMap, Command, FnHandler, Param, Signature};
///
/// let echo = FnHandler::new(
///     "echo",
///     Signature::new().param(Param::required("message")),
///     |args: &ArgMap| Ok(args["message"].clone()),
/// );
/// Command::new(echo)
///     .help("Echo to terminal")
///     .description("Print the message back, unchanged.");
/// ```
#[derive(Clone)]
pub struct Command {
    pub(crate) handler: Arc<dyn Handler>,
    pub(crate) help: Option<String>,
    pub(crate) description: Option<String>,
}

impl Command {
    /// Register `handler` as a leaf command.
    pub fn new(handler: impl Handler + 'static) -> Self {
        Self::shared(Arc::new(handler))
    }

    /// Register an already-shared handler as a leaf command.
    pub fn shared(handler: Arc<dyn Handler>) -> Self {
        Self {
            handler,
            help: None,
            description: None,
        }
    }

    /// Document the short help line shown in the parent command listing.
    /// If repeated, only the final help message will apply.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help.replace(text.into());
        self
    }

    /// Document the long description shown on the command's own help page.
    /// Defaults to the help text when absent.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description.replace(text.into());
        self
    }
}

/// One namespace level of the menu.
///
/// A module carries leaf commands, module-scoped common functions, and child
/// modules.  The registration table replaces attribute marking: a handler is
/// a command because it is registered via [`Module::command`], and a child
/// namespace is visible because it is registered via [`Module::submodule`].
///
/// ### Example
/// ```
/// use cmdtree::{ArgMap, Command, FnHandler, Module, Param, Signature};
/// use serde_json::{json, Value};
///
/// let copy = FnHandler::new(
///     "copy",
///     Signature::new().param(Param::required("src")),
///     |_: &ArgMap| Ok(Value::Null),
/// );
/// let setup = FnHandler::new(
///     "setup",
///     Signature::new().param(Param::with_default("verbose", json!(false))),
///     |_: &ArgMap| Ok(Value::Null),
/// );
///
/// Module::new("fs")
///     .help("File system commands")
///     .common(setup)
///     .command(Command::new(copy).help("Copy a file"));
/// ```
#[derive(Clone)]
pub struct Module {
    pub(crate) name: String,
    pub(crate) help: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) toplevel: Option<bool>,
    pub(crate) menu: bool,
    pub(crate) common: Vec<Arc<dyn Handler>>,
    pub(crate) commands: Vec<Command>,
    pub(crate) submodules: Vec<Module>,
}

impl Module {
    /// Create an empty module named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: None,
            description: None,
            toplevel: None,
            menu: true,
            common: Vec::default(),
            commands: Vec::default(),
            submodules: Vec::default(),
        }
    }

    /// Document the short help line for this namespace.
    /// If repeated, only the final help message will apply.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help.replace(text.into());
        self
    }

    /// Document the long description for this namespace.
    /// If repeated, only the final description will apply.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description.replace(text.into());
        self
    }

    /// Mark this module for flattening: its commands and submodules attach
    /// directly to the parent namespace instead of behind this module's name.
    ///
    /// The entry point may override this marker either way
    /// (see [`CommandMenu::toplevel`](crate::CommandMenu::toplevel) and
    /// [`CommandMenu::nest`](crate::CommandMenu::nest)); without any marker,
    /// non-root modules nest.
    pub fn toplevel(mut self, toplevel: bool) -> Self {
        self.toplevel.replace(toplevel);
        self
    }

    /// Mark whether this module participates in menu discovery.
    ///
    /// A submodule registered with `menu(false)` is skipped by the tree
    /// walker even though it is structurally present.  Defaults to `true`.
    pub fn menu(mut self, menu: bool) -> Self {
        self.menu = menu;
        self
    }

    /// Register a module-scoped common function.
    ///
    /// Common functions are not directly callable commands; they are merged,
    /// in registration order, as a prefix into every leaf command of this
    /// module and of every descendant module.
    pub fn common(mut self, handler: impl Handler + 'static) -> Self {
        self.common.push(Arc::new(handler));
        self
    }

    /// Register an already-shared module-scoped common function.
    pub fn common_shared(mut self, handler: Arc<dyn Handler>) -> Self {
        self.common.push(handler);
        self
    }

    /// Register a leaf command.
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Register a child namespace.
    pub fn submodule(mut self, module: Module) -> Self {
        self.submodules.push(module);
        self
    }
}
