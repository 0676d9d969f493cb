//! Traits which, typically, may be imported without concern: `use cmdtree::prelude::*`.

pub use crate::api::Handler;
pub use crate::parser::ArgumentParser;
