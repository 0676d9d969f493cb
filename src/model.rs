/// How a handler parameter binds its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A plain named parameter, positional or flagged.
    Named,
    /// Trailing catch-all for the remaining positional values.
    Rest,
    /// Open keyword catch-all; receives every argument by name.
    KeywordRest,
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
