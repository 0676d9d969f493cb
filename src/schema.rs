use serde_json::{Map, Value};

use crate::api::{Annotation, Param};
use crate::constant;
use crate::error::BuildError;

/// One resolved option, as handed to the argument-parser capability.
///
/// Derived from a [`Param`] by the defaulting rules: a parameter without a
/// resolved default becomes a required positional spelled as its name; a
/// parameter with a resolved default becomes an optional-style option spelled
/// `--<name>`.  Explicit metadata spellings win over both.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDefinition {
    name_or_flags: Vec<String>,
    dest: String,
    help: Option<String>,
    default: Option<Value>,
    required: bool,
    extra: Map<String, Value>,
}

impl OptionDefinition {
    /// The CLI spelling(s) of this option.
    pub fn name_or_flags(&self) -> &[String] {
        &self.name_or_flags
    }

    /// The key under which the parsed value must be recorded.
    pub fn dest(&self) -> &str {
        &self.dest
    }

    /// The help message, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// The resolved default value, if any.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether the option must be supplied on the command line.
    pub fn required(&self) -> bool {
        self.required
    }

    /// Whether any spelling is optional-style (starts with `-`).
    pub fn is_flagged(&self) -> bool {
        self.name_or_flags
            .iter()
            .any(|spelling| spelling.starts_with('-'))
    }

    /// Additional parser-specific settings, passed through verbatim.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

// Resolved view of a parameter's annotation; the annotation itself is never mutated.
struct MetaView<'a> {
    help: Option<&'a str>,
    name_or_flags: Option<&'a [String]>,
    default: Option<&'a Value>,
    extra: Option<&'a Map<String, Value>>,
}

impl<'a> From<&'a Annotation> for MetaView<'a> {
    fn from(annotation: &'a Annotation) -> Self {
        match annotation {
            Annotation::None => MetaView {
                help: None,
                name_or_flags: None,
                default: None,
                extra: None,
            },
            Annotation::Help(text) => MetaView {
                help: Some(text),
                name_or_flags: None,
                default: None,
                extra: None,
            },
            Annotation::Meta(meta) => MetaView {
                help: meta.help.as_deref(),
                name_or_flags: meta.name_or_flags.as_deref(),
                default: meta.default.as_ref(),
                extra: Some(&meta.extra),
            },
        }
    }
}

/// Build the option definition for one non-catch-all parameter of `command`.
///
/// Deterministic and side-effect-free; calling twice on the same descriptor
/// yields equal definitions.
pub(crate) fn build_option(command: &str, param: &Param) -> Result<OptionDefinition, BuildError> {
    let meta = MetaView::from(param.annotation());

    if meta
        .extra
        .is_some_and(|extra| extra.contains_key(constant::DEST_KEY))
    {
        return Err(BuildError::ReservedKey {
            command: command.to_string(),
            parameter: param.name().to_string(),
        });
    }

    // Explicit metadata default wins over the parameter's own.
    let default = meta.default.or_else(|| param.default()).cloned();

    let name_or_flags = match meta.name_or_flags {
        Some(spellings) => {
            validate_spellings(command, param.name(), spellings)?;
            spellings.to_vec()
        }
        None => {
            if default.is_some() {
                vec![format!("--{name}", name = param.name())]
            } else {
                vec![param.name().to_string()]
            }
        }
    };

    let flagged = name_or_flags
        .iter()
        .any(|spelling| spelling.starts_with('-'));
    // Optional-style spellings always resolve to the parameter name.
    let dest = if flagged {
        param.name().to_string()
    } else {
        name_or_flags[0].clone()
    };

    Ok(OptionDefinition {
        name_or_flags,
        dest,
        help: meta.help.map(str::to_string),
        required: default.is_none(),
        default,
        extra: meta.extra.cloned().unwrap_or_default(),
    })
}

fn validate_spellings(command: &str, parameter: &str, spellings: &[String]) -> Result<(), BuildError> {
    let configuration = |message: String| BuildError::Configuration {
        command: command.to_string(),
        message,
    };

    if spellings.is_empty() {
        return Err(configuration(format!(
            "parameter '{parameter}' declares an empty spelling list."
        )));
    }

    if spellings.iter().any(String::is_empty) {
        return Err(configuration(format!(
            "parameter '{parameter}' declares an empty spelling."
        )));
    }

    let flagged = spellings.iter().filter(|s| s.starts_with('-')).count();

    if flagged > 0 && flagged < spellings.len() {
        return Err(configuration(format!(
            "parameter '{parameter}' mixes positional and flagged spellings."
        )));
    }

    if flagged == 0 && spellings.len() > 1 {
        return Err(configuration(format!(
            "parameter '{parameter}' declares multiple positional spellings."
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OptionMeta;
    use crate::test::assert_contains;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn required_positional() {
        // Setup
        let param = Param::required("a");

        // Execute
        let option = build_option("subject", &param).unwrap();

        // Verify
        assert_eq!(option.name_or_flags(), &["a".to_string()]);
        assert_eq!(option.dest(), "a");
        assert_eq!(option.default(), None);
        assert!(option.required());
        assert!(!option.is_flagged());
    }

    #[test]
    fn defaulted_flag() {
        // Setup
        let param = Param::with_default("b", json!(1));

        // Execute
        let option = build_option("subject", &param).unwrap();

        // Verify
        assert_eq!(option.name_or_flags(), &["--b".to_string()]);
        assert_eq!(option.dest(), "b");
        assert_eq!(option.default(), Some(&json!(1)));
        assert!(!option.required());
        assert!(option.is_flagged());
    }

    #[test]
    fn help_string_annotation() {
        // Setup
        let param = Param::required("message").help("Message to echo");

        // Execute
        let option = build_option("subject", &param).unwrap();

        // Verify
        assert_eq!(option.help(), Some("Message to echo"));
        assert!(option.extra().is_empty());
    }

    #[rstest]
    #[case(Param::required("value"))]
    #[case(Param::with_default("value", json!(0)))]
    #[case(Param::rest("value"))]
    fn metadata_default_wins(#[case] param: Param) {
        // Setup
        let param = param.meta(OptionMeta::new().default_value(json!(9)));

        // Execute
        let option = build_option("subject", &param).unwrap();

        // Verify
        assert_eq!(option.default(), Some(&json!(9)));
        assert!(!option.required());
        // A resolved default makes the auto-derived spelling optional-style.
        assert_eq!(option.name_or_flags(), &["--value".to_string()]);
    }

    #[test]
    fn explicit_flags_force_dest() {
        // Setup
        let param = Param::with_default("verbose", json!(false))
            .meta(OptionMeta::new().flag("--loud").flag("-l"));

        // Execute
        let option = build_option("subject", &param).unwrap();

        // Verify
        assert_eq!(
            option.name_or_flags(),
            &["--loud".to_string(), "-l".to_string()]
        );
        assert_eq!(option.dest(), "verbose");
    }

    #[test]
    fn explicit_positional_spelling() {
        // Setup
        let param = Param::required("source").meta(OptionMeta::new().flag("origin"));

        // Execute
        let option = build_option("subject", &param).unwrap();

        // Verify
        assert_eq!(option.name_or_flags(), &["origin".to_string()]);
        assert_eq!(option.dest(), "origin");
        assert!(option.required());
    }

    #[test]
    fn reserved_destination_key() {
        // Setup
        let param = Param::required("a").meta(OptionMeta::new().set("dest", json!("other")));

        // Execute
        let error = build_option("subject", &param).unwrap_err();

        // Verify
        assert_eq!(
            error,
            BuildError::ReservedKey {
                command: "subject".to_string(),
                parameter: "a".to_string(),
            }
        );
    }

    #[rstest]
    #[case(Param::required("a").meta(OptionMeta::new().flag("a").flag("-a")), "mixes")]
    #[case(Param::required("a").meta(OptionMeta::new().flag("a").flag("b")), "multiple positional")]
    #[case(Param::required("a").meta(OptionMeta::new().flag("")), "empty spelling")]
    fn invalid_spellings(#[case] param: Param, #[case] needle: &str) {
        // Execute
        let error = build_option("subject", &param).unwrap_err();

        // Verify
        assert_matches!(error, BuildError::Configuration { command, message } => {
            assert_eq!(command, "subject".to_string());
            assert_contains!(message, needle);
        });
    }

    #[test]
    fn extra_passthrough() {
        // Setup
        let param = Param::required("numbers").meta(
            OptionMeta::new()
                .set("nargs", json!("+"))
                .set("type", json!("int"))
                .set("choices", json!([1, 2, 3])),
        );

        // Execute
        let option = build_option("subject", &param).unwrap();

        // Verify
        assert_eq!(option.extra().get("nargs"), Some(&json!("+")));
        assert_eq!(option.extra().get("type"), Some(&json!("int")));
        assert_eq!(option.extra().get("choices"), Some(&json!([1, 2, 3])));
    }

    #[test]
    fn deterministic() {
        // Setup
        let param = Param::with_default("b", json!(1)).meta(
            OptionMeta::new()
                .help("abc def")
                .default_value(json!(2))
                .set("nargs", json!("?")),
        );

        // Execute
        let first = build_option("subject", &param).unwrap();
        let second = build_option("subject", &param).unwrap();

        // Verify
        assert_eq!(first, second);
        // The original annotation is untouched.
        assert_eq!(
            param.annotation(),
            &Annotation::Meta(
                OptionMeta::new()
                    .help("abc def")
                    .default_value(json!(2))
                    .set("nargs", json!("?"))
            )
        );
    }
}
