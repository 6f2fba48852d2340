//! Naming rules for generated Python identifiers.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `class` | [`sanitize_field_name`] | `class_` (alias `class`) |
//! | `HTTPStatus` | [`to_upper_snake_case`] | `HTTP_STATUS` |
//! | `pkg.Outer.Inner` | [`flattened_name`] | `Outer_Inner` |
//! | `COLOR_RED` in `Color` | [`enum_member_names`] | `RED` |

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

static PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Builtins that would shadow type annotations inside a model body.
static PYTHON_BUILTINS: &[&str] = &[
    "int", "float", "bool", "str", "bytes", "list", "dict", "set", "tuple", "type", "object",
    "range", "map", "filter", "id", "hash", "len", "max", "min", "sum", "abs", "round",
    "complex", "frozenset", "memoryview", "bytearray", "property", "classmethod",
    "staticmethod", "super",
];

static PYDANTIC_ATTRIBUTES: &[&str] = &[
    "model_config",
    "model_fields",
    "model_computed_fields",
    "model_extra",
    "model_fields_set",
    "model_construct",
    "model_copy",
    "model_dump",
    "model_dump_json",
    "model_json_schema",
    "model_parametrized_name",
    "model_post_init",
    "model_rebuild",
    "model_validate",
    "model_validate_json",
    "model_validate_strings",
];

static RESERVED_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    PYTHON_KEYWORDS
        .iter()
        .chain(PYTHON_BUILTINS)
        .chain(PYDANTIC_ATTRIBUTES)
        .copied()
        .collect()
});

#[allow(clippy::unwrap_used)] // Safe: constant pattern
static LOWER_THEN_UPPER: Lazy<Regex> = Lazy::new(|| Regex::new("([a-z0-9])([A-Z])").unwrap());

#[allow(clippy::unwrap_used)] // Safe: constant pattern
static ACRONYM_THEN_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new("([A-Z])([A-Z][a-z])").unwrap());

/// Whether `name` cannot be used as a Pydantic field name as-is.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(name)
}

/// Whether `name` is a Python keyword.
pub fn is_python_keyword(name: &str) -> bool {
    PYTHON_KEYWORDS.contains(&name)
}

/// Whether `name` is a syntactically valid Python identifier (ASCII subset).
pub fn is_python_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// Produce a field name that is neither reserved nor already `taken`.
///
/// Returns the sanitized name and, when it differs from `name`, the alias
/// that keeps the original wire name.
///
/// # Examples
///
/// ```
/// use pydantic_codegen::naming::sanitize_field_name;
/// use std::collections::BTreeSet;
///
/// let taken = BTreeSet::new();
/// assert_eq!(
///     sanitize_field_name("class", &taken),
///     ("class_".to_string(), Some("class".to_string()))
/// );
/// assert_eq!(sanitize_field_name("price", &taken), ("price".to_string(), None));
/// ```
pub fn sanitize_field_name(name: &str, taken: &BTreeSet<String>) -> (String, Option<String>) {
    if !is_reserved(name) && !taken.contains(name) {
        return (name.to_string(), None);
    }

    let mut candidate = format!("{name}_");
    while is_reserved(&candidate) || taken.contains(&candidate) {
        candidate.push('_');
    }
    (candidate, Some(name.to_string()))
}

/// Convert CamelCase to UPPER_SNAKE_CASE.
///
/// # Examples
///
/// ```
/// use pydantic_codegen::naming::to_upper_snake_case;
///
/// assert_eq!(to_upper_snake_case("Color"), "COLOR");
/// assert_eq!(to_upper_snake_case("HTTPStatus"), "HTTP_STATUS");
/// assert_eq!(to_upper_snake_case("OrderState2Kind"), "ORDER_STATE2_KIND");
/// ```
pub fn to_upper_snake_case(s: &str) -> String {
    let snake = LOWER_THEN_UPPER.replace_all(s, "${1}_${2}");
    let snake = ACRONYM_THEN_WORD.replace_all(&snake, "${1}_${2}");
    snake.to_uppercase()
}

/// Flatten a fully-qualified name relative to its file package.
///
/// Nested names are joined with `_` so every type is a top-level Python class.
///
/// # Examples
///
/// ```
/// use pydantic_codegen::naming::flattened_name;
///
/// assert_eq!(flattened_name("shop.v1.Order.Item", "shop.v1"), "Order_Item");
/// assert_eq!(flattened_name("Order", ""), "Order");
/// ```
pub fn flattened_name(full_name: &str, package: &str) -> String {
    let local = if package.is_empty() {
        full_name
    } else {
        full_name
            .strip_prefix(package)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(full_name)
    };
    local.replace('.', "_")
}

/// Compute Python member names for the values of one enum.
///
/// When `trim_prefix` is set, the `UPPER_SNAKE(enum_name)_` prefix is removed
/// from each value that carries it, provided the remainder is a usable
/// identifier. If trimming would make two members collide, the whole enum
/// keeps its original names.
pub fn enum_member_names(enum_name: &str, values: &[&str], trim_prefix: bool) -> Vec<String> {
    let original: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    if !trim_prefix {
        return original;
    }

    let prefix = format!("{}_", to_upper_snake_case(enum_name));
    let trimmed: Vec<String> = values
        .iter()
        .map(|value| match value.strip_prefix(&prefix) {
            Some(rest) if is_python_identifier(rest) && !is_python_keyword(rest) => {
                rest.to_string()
            }
            _ => value.to_string(),
        })
        .collect();

    let unique: HashSet<&str> = trimmed.iter().map(String::as_str).collect();
    if unique.len() != trimmed.len() {
        tracing::debug!(enum_name, "enum prefix trim would collide, keeping names");
        return original;
    }
    trimmed
}
