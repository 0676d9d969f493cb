use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::api::{Command, Handler, Module};
use crate::constant;
use crate::error::BuildError;
use crate::merge::{merge, CompositeCommand};
use crate::model::ParamKind;
use crate::schema::{build_option, OptionDefinition};

/// One registered leaf command, as exposed to the argument-parser capability.
///
/// Created once during tree construction; immutable thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandNode {
    name: String,
    help: String,
    description: String,
    options: Vec<OptionDefinition>,
    id: String,
}

impl CommandNode {
    /// The display name, derived from the underlying handler's identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The short help line; empty when undocumented.
    pub fn help(&self) -> &str {
        &self.help
    }

    /// The long description; defaults to the help line.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The resolved option definitions, in combined-signature order.
    pub fn options(&self) -> &[OptionDefinition] {
        &self.options
    }

    /// The hidden discriminator value selecting this command's composite.
    ///
    /// An [`ArgumentParser`](crate::ArgumentParser) records it via
    /// [`ParsedArgs::select`](crate::ParsedArgs::select) when parsing reaches
    /// this leaf.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// One namespace level of the built tree.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuNode {
    name: String,
    help: Option<String>,
    description: Option<String>,
    commands: Vec<CommandNode>,
    children: Vec<MenuNode>,
}

impl MenuNode {
    fn new(name: String, help: Option<String>, description: Option<String>) -> Self {
        Self {
            name,
            help,
            description,
            commands: Vec::default(),
            children: Vec::default(),
        }
    }

    /// The namespace name; for the root, the program name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The short help line, if documented.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// The long description, if documented.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The leaf commands registered at this level, in registration order.
    pub fn commands(&self) -> &[CommandNode] {
        &self.commands
    }

    /// The child namespaces at this level, in registration order.
    pub fn children(&self) -> &[MenuNode] {
        &self.children
    }
}

/// The immutable output of menu construction.
///
/// Holds the nested namespace structure consumed by the argument-parser
/// capability, plus the flat discriminator index consumed by dispatch.
/// Built via [`CommandMenu::build_tree`](crate::CommandMenu::build_tree).
#[derive(Debug)]
pub struct CommandTree {
    root: MenuNode,
    index: HashMap<String, CompositeCommand>,
}

impl CommandTree {
    /// The root namespace, named after the program.
    pub fn root(&self) -> &MenuNode {
        &self.root
    }

    /// The program name.
    pub fn program(&self) -> &str {
        self.root.name()
    }

    /// Look up a composite command by its discriminator value.
    pub fn composite(&self, id: &str) -> Option<&CompositeCommand> {
        self.index.get(id)
    }
}

pub(crate) fn build(
    program: String,
    about: Option<String>,
    toplevel: Vec<Module>,
    nested: Vec<Module>,
) -> Result<CommandTree, BuildError> {
    let mut root = MenuNode::new(program, None, about);
    let mut index = HashMap::default();

    for module in &toplevel {
        add_module(&mut root, &[], module, Some(true), &[], &mut index)?;
    }

    for module in &nested {
        add_module(&mut root, &[], module, Some(false), &[], &mut index)?;
    }

    Ok(CommandTree { root, index })
}

fn add_module(
    parent: &mut MenuNode,
    parent_path: &[String],
    module: &Module,
    flatten_override: Option<bool>,
    inherited: &[Arc<dyn Handler>],
    index: &mut HashMap<String, CompositeCommand>,
) -> Result<(), BuildError> {
    // Explicit override beats the module's own marker beats the default.
    let flatten = flatten_override.or(module.toplevel).unwrap_or(false);
    let commons: Vec<Arc<dyn Handler>> = inherited
        .iter()
        .chain(module.common.iter())
        .cloned()
        .collect();

    if flatten {
        for command in &module.commands {
            add_command(parent, parent_path, command, &commons, index)?;
        }

        for submodule in &module.submodules {
            if submodule.menu {
                add_module(parent, parent_path, submodule, None, &commons, index)?;
            }
        }
    } else {
        let mut node = MenuNode::new(
            module.name.clone(),
            module.help.clone(),
            module.description.clone(),
        );
        let mut path = parent_path.to_vec();
        path.push(module.name.clone());

        for command in &module.commands {
            add_command(&mut node, &path, command, &commons, index)?;
        }

        for submodule in &module.submodules {
            if submodule.menu {
                add_module(&mut node, &path, submodule, None, &commons, index)?;
            }
        }

        parent.children.push(node);
    }

    Ok(())
}

fn add_command(
    node: &mut MenuNode,
    path: &[String],
    command: &Command,
    commons: &[Arc<dyn Handler>],
    index: &mut HashMap<String, CompositeCommand>,
) -> Result<(), BuildError> {
    let mut chain: Vec<Arc<dyn Handler>> = commons.to_vec();
    chain.push(Arc::clone(&command.handler));
    let composite = merge(&chain)?;
    let name = composite.name().to_string();

    if node.commands.iter().any(|existing| existing.name == name) {
        return Err(BuildError::DuplicateCommand {
            namespace: node.name.clone(),
            command: name,
        });
    }

    let mut options = Vec::with_capacity(composite.params().len());

    for param in composite.params() {
        if param.name() == constant::COMMAND_KEY {
            return Err(BuildError::Configuration {
                command: name,
                message: format!(
                    "parameter name '{key}' is reserved.",
                    key = constant::COMMAND_KEY
                ),
            });
        }

        // Catch-all keyword parameters are never user-facing options.
        if param.kind() == ParamKind::KeywordRest {
            continue;
        }

        options.push(build_option(&name, param)?);
    }

    let id = path
        .iter()
        .map(String::as_str)
        .chain([name.as_str()])
        .collect::<Vec<&str>>()
        .join(" ");
    let help = command.help.clone().unwrap_or_default();
    let description = command
        .description
        .clone()
        .or_else(|| command.help.clone())
        .unwrap_or_default();

    if index.insert(id.clone(), composite).is_some() {
        return Err(BuildError::DuplicateCommand {
            namespace: node.name.clone(),
            command: name,
        });
    }

    debug!(
        "registered command '{id}' with {count} option(s).",
        count = options.len()
    );
    node.commands.push(CommandNode {
        name,
        help,
        description,
        options,
        id,
    });

    Ok(())
}
