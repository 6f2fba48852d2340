//! Generator configuration

use crate::error::{GeneratorError, GeneratorResult};
use serde::Deserialize;

/// Parameter keys accepted in the plugin parameter string.
pub const PARAMETER_KEYS: &[&str] = &[
    "preserving_proto_field_name",
    "auto_trim_enum_prefix",
    "use_integers_for_enums",
    "disable_field_description",
    "use_none_union_syntax_instead_of_optional",
];

/// Options controlling how Python code is generated.
///
/// Built once per invocation from the `protoc` parameter string
/// (`--pydantic_opt=key=value,...`) and shared read-only by every file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Use the proto field name instead of its JSON (camelCase) name
    #[serde(default = "default_true")]
    pub preserving_proto_field_name: bool,

    /// Strip the `ENUM_NAME_` prefix from enum value names
    #[serde(default = "default_true")]
    pub auto_trim_enum_prefix: bool,

    /// Emit `int` enums keyed by number instead of `str` enums keyed by name
    #[serde(default)]
    pub use_integers_for_enums: bool,

    /// Omit `description=` arguments derived from comments
    #[serde(default)]
    pub disable_field_description: bool,

    /// Spell nullable types as `T | None` rather than `_Optional[T]`
    #[serde(default = "default_true")]
    pub use_none_union_syntax_instead_of_optional: bool,
}

fn default_true() -> bool {
    true
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            preserving_proto_field_name: true,
            auto_trim_enum_prefix: true,
            use_integers_for_enums: false,
            disable_field_description: false,
            use_none_union_syntax_instead_of_optional: true,
        }
    }
}

impl GeneratorConfig {
    /// Parse a `key=value,key2=value2` plugin parameter string.
    ///
    /// A bare key is shorthand for `key=true`. Unknown keys are rejected.
    pub fn from_parameter(parameter: &str) -> GeneratorResult<Self> {
        let mut values = serde_json::Map::new();

        for part in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, raw) = match part.split_once('=') {
                Some((key, raw)) => (key.trim(), raw.trim()),
                None => (part, "true"),
            };

            if !PARAMETER_KEYS.contains(&key) {
                return Err(GeneratorError::UnknownParameter(key.to_string()));
            }

            let flag = parse_bool(raw).ok_or_else(|| GeneratorError::InvalidParameter {
                key: key.to_string(),
                reason: format!("expected a boolean, got {raw:?}"),
            })?;
            values.insert(key.to_string(), serde_json::Value::Bool(flag));
        }

        let config = serde_json::from_value(serde_json::Value::Object(values))?;
        Ok(config)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
