use crate::api::module::Module;
use crate::error::BuildError;
use crate::tree::{self, CommandTree};

/// The menu entry point.
///
/// Collects root modules and builds the immutable [`CommandTree`] consumed by
/// the argument-parser capability and the dispatcher.
///
/// ### Example
/// ```
/// use cmdtree::{ArgMap, Command, CommandMenu, FnHandler, Module, Param, Signature};
///
/// let echo = FnHandler::new(
///     "echo",
///     Signature::new().param(Param::required("message").help("Message to echo")),
///     |args: &ArgMap| Ok(args["message"].clone()),
/// );
///
/// let tree = CommandMenu::new("program")
///     .about("An example application.")
///     .toplevel(Module::new("misc").command(Command::new(echo).help("Echo to terminal")))
///     .build_tree()
///     .unwrap();
///
/// assert_eq!(tree.root().commands()[0].name(), "echo");
/// ```
pub struct CommandMenu {
    program: String,
    about: Option<String>,
    toplevel: Vec<Module>,
    nested: Vec<Module>,
}

impl CommandMenu {
    /// Create a command menu for `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            about: None,
            toplevel: Vec::default(),
            nested: Vec::default(),
        }
    }

    /// Document the about message for this menu.
    /// If repeated, only the final message will apply.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// Add a root module whose contents attach directly at the top level.
    ///
    /// This overrides the module's own
    /// [`toplevel`](crate::Module::toplevel) marker.
    pub fn toplevel(mut self, module: Module) -> Self {
        self.toplevel.push(module);
        self
    }

    /// Add a root module behind its own name.
    ///
    /// This overrides the module's own
    /// [`toplevel`](crate::Module::toplevel) marker.
    pub fn nest(mut self, module: Module) -> Self {
        self.nested.push(module);
        self
    }

    /// Build the command tree as a Result.
    /// This finalizes the registration and checks for errors (ex: a repeated
    /// command name, a reserved metadata key).
    pub fn build_tree(self) -> Result<CommandTree, BuildError> {
        tree::build(self.program, self.about, self.toplevel, self.nested)
    }

    /// Build the command tree.
    /// This finalizes the registration and checks for errors (ex: a repeated
    /// command name, a reserved metadata key).
    /// If an error is encountered, exits with error code `1` (via
    /// [`std::process::exit`]).
    pub fn build(self) -> CommandTree {
        match self.build_tree() {
            Ok(tree) => tree,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}
