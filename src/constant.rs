/// The hidden key under which a parse result records the selected command.
///
/// [`ArgumentParser`](crate::ArgumentParser) implementations write it via
/// [`ParsedArgs::select`](crate::ParsedArgs::select); the dispatcher removes it
/// before any handler sees the arguments.  No parameter may use this name.
pub const COMMAND_KEY: &str = "_cmdtree_command";

/// The reserved destination key.
///
/// The destination of every option always equals its parameter name, so
/// dispatch stays unambiguous.  Supplying `dest` in option metadata is a
/// configuration error.
pub const DEST_KEY: &str = "dest";
