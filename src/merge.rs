use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::api::{describe, ArgMap, Handler, Param};
use crate::error::BuildError;
use crate::model::ParamKind;

/// A single dispatchable unit composed from one or more handlers.
///
/// Invoking the composite calls every composed handler in merge order; each
/// handler without an open keyword catch-all receives only the argument
/// subset matching its own declared parameters.
pub struct CompositeCommand {
    name: String,
    params: Vec<Param>,
    handlers: Vec<Arc<dyn Handler>>,
    open_keywords: bool,
}

impl std::fmt::Debug for CompositeCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeCommand")
            .field("name", &self.name)
            .field("params", &self.params)
            .field(
                "handlers",
                &self.handlers.iter().map(|h| h.name()).collect::<Vec<_>>(),
            )
            .field("open_keywords", &self.open_keywords)
            .finish()
    }
}

impl CompositeCommand {
    /// The composite's display name: that of the last (most specific) handler.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The combined parameter schema, in dispatch-stable order: parameters
    /// without defaults, then parameters with defaults, then the positional
    /// catch-all, then the keyword catch-all.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Whether any composed handler declares an open keyword catch-all.
    pub fn accepts_open_keywords(&self) -> bool {
        self.open_keywords
    }

    /// Invoke every composed handler in order, filtering arguments per
    /// handler, and return the final (leaf) handler's value.
    pub fn call(&self, args: &ArgMap) -> anyhow::Result<Value> {
        let mut result = Value::Null;

        for handler in &self.handlers {
            let signature = handler.signature();
            let open = signature
                .params()
                .iter()
                .any(|param| param.kind() == ParamKind::KeywordRest);

            if open {
                result = handler.call(args)?;
            } else {
                let filtered: ArgMap = args
                    .iter()
                    .filter(|(name, _)| {
                        signature
                            .params()
                            .iter()
                            .any(|param| param.name() == name.as_str())
                    })
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect();
                result = handler.call(&filtered)?;
            }
        }

        Ok(result)
    }
}

fn rank(param: &Param) -> u8 {
    match param.kind() {
        ParamKind::Named => {
            if param.default().is_none() && !has_meta_default(param) {
                1
            } else {
                2
            }
        }
        ParamKind::Rest => 3,
        ParamKind::KeywordRest => 4,
    }
}

fn has_meta_default(param: &Param) -> bool {
    match param.annotation() {
        crate::api::Annotation::Meta(meta) => meta.default.is_some(),
        _ => false,
    }
}

/// Merge `handlers` into a single composite command.
///
/// The combined parameter set is the union keyed by name: a repeated name
/// keeps its first-seen position but takes the last-seen declaration
/// (last-one-wins, so the leaf command overrides shared defaults).  Two
/// declarations of one name with different kinds are rejected.
pub fn merge(handlers: &[Arc<dyn Handler>]) -> Result<CompositeCommand, BuildError> {
    assert!(
        !handlers.is_empty(),
        "internal error - merge requires at least one handler"
    );
    let name = handlers
        .last()
        .expect("internal error - merge requires at least one handler")
        .name()
        .to_string();

    let mut order: Vec<String> = Vec::default();
    let mut combined: HashMap<String, Param> = HashMap::default();

    for handler in handlers {
        for param in describe(handler.as_ref())? {
            if let Some(existing) = combined.get(param.name()) {
                if existing.kind() != param.kind() {
                    return Err(BuildError::MergeConflict {
                        command: name.clone(),
                        parameter: param.name().to_string(),
                        first: existing.kind(),
                        second: param.kind(),
                    });
                }
            } else {
                order.push(param.name().to_string());
            }

            // First-seen position, last-seen declaration.
            combined.insert(param.name().to_string(), param.clone());
        }
    }

    let mut params: Vec<Param> = order
        .iter()
        .map(|name| {
            combined
                .remove(name)
                .expect("internal error - ordered name must be combined")
        })
        .collect();
    // Stable: insertion order is preserved within each rank.
    params.sort_by_key(rank);

    let open_keywords = params
        .iter()
        .any(|param| param.kind() == ParamKind::KeywordRest);

    Ok(CompositeCommand {
        name,
        params,
        handlers: handlers.to_vec(),
        open_keywords,
    })
}
