//! Entity model for one generated Python module.
//!
//! The descriptor walker builds these values; the emitter renders them
//! without making further decisions.
//!
//! # Structure
//!
//! - [`PyFile`]: one schema file with hoisted [`Enum`]s and [`Message`]s
//! - [`Field`]: a message field with its resolved [`TypeRef`], default and
//!   optional [`FieldConstraints`]
//! - [`EnumValue`]: an enum member with flags and custom option literals

use crate::imports::ImportSet;
use std::collections::BTreeMap;

/// How nullable types are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullableStyle {
    /// `T | None`
    Union,
    /// `_Optional[T]`
    Optional,
}

/// A resolved Python type expression plus its nullability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Type expression without the nullable wrapper.
    pub expr: String,

    /// Whether `None` is an accepted value.
    pub nullable: bool,

    pub style: NullableStyle,
}

impl TypeRef {
    pub fn new(expr: impl Into<String>, nullable: bool, style: NullableStyle) -> Self {
        Self {
            expr: expr.into(),
            nullable,
            style,
        }
    }

    /// Render the full annotation. `None` is never wrapped.
    pub fn render(&self) -> String {
        if !self.nullable || self.expr == "None" {
            return self.expr.clone();
        }
        match self.style {
            NullableStyle::Union => format!("{} | None", self.expr),
            NullableStyle::Optional => format!("_Optional[{}]", self.expr),
        }
    }
}

/// Default expression passed as the first argument to `_Field(...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDefault {
    /// A Python expression such as `None`, `0` or `""`.
    Value(String),
    /// `default_factory=<name>`
    Factory(&'static str),
}

impl FieldDefault {
    pub fn none() -> Self {
        FieldDefault::Value("None".to_string())
    }

    pub fn render(&self) -> String {
        match self {
            FieldDefault::Value(value) => value.clone(),
            FieldDefault::Factory(factory) => format!("default_factory={factory}"),
        }
    }

    pub fn is_factory(&self) -> bool {
        matches!(self, FieldDefault::Factory(_))
    }
}

/// Oneof group membership, used for field descriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneOf {
    pub name: String,
    pub field_names: Vec<String>,
}

/// Built-in format validator selected by a validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatValidator {
    Email,
    Uri,
    Ip,
    Ipv4,
    Ipv6,
    Uuid,
}

impl FormatValidator {
    pub fn from_rule_name(name: &str) -> Option<Self> {
        match name {
            "email" => Some(FormatValidator::Email),
            "uri" => Some(FormatValidator::Uri),
            "ip" => Some(FormatValidator::Ip),
            "ipv4" => Some(FormatValidator::Ipv4),
            "ipv6" => Some(FormatValidator::Ipv6),
            "uuid" => Some(FormatValidator::Uuid),
            _ => None,
        }
    }
}

/// A `const` rule that could be translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstValue {
    /// Expressible as `_Literal[literal]`; `default` is the standalone form.
    Literal { literal: String, default: String },
    /// A float constant, enforced by a validator.
    Float(String),
}

/// Validation constraints translated for one field.
///
/// Prefix, suffix and contains rules are already folded into `pattern`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldConstraints {
    pub gt: Option<String>,
    pub gte: Option<String>,
    pub lt: Option<String>,
    pub lte: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    pub examples: Vec<String>,
    pub const_value: Option<ConstValue>,
    pub in_values: Vec<String>,
    pub not_in_values: Vec<String>,
    pub unique_items: bool,
    pub format: Option<FormatValidator>,
    pub require_finite: bool,
    /// Rule names that were recognised but not translated, sorted.
    pub dropped: Vec<String>,
}

impl FieldConstraints {
    pub fn is_empty(&self) -> bool {
        *self == FieldConstraints::default()
    }
}

/// A field of a generated model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Sanitized Python attribute name.
    pub name: String,

    /// Original wire name when `name` had to change.
    pub alias: Option<String>,

    pub ty: TypeRef,
    pub default: FieldDefault,
    pub oneof: Option<OneOf>,
    pub constraints: Option<FieldConstraints>,
    pub leading_comments: Vec<String>,
    pub trailing_comments: Vec<String>,
}

impl Field {
    /// Text for `description=`: comment lines, then the oneof note.
    pub fn description(&self) -> String {
        let mut parts = self.leading_comments.clone();
        if let Some(oneof) = &self.oneof {
            parts.push(format!(
                "Only one of the fields can be specified with: [{}] (oneof {})",
                oneof.field_names.join(" "),
                oneof.name
            ));
        }
        parts.join("\n")
    }

    pub fn has_description_source(&self) -> bool {
        !self.leading_comments.is_empty() || self.oneof.is_some()
    }

    pub fn has_constraints(&self) -> bool {
        self.constraints.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// A generated Pydantic model class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub name: String,
    pub fields: Vec<Field>,
    pub leading_comments: Vec<String>,
    pub trailing_comments: Vec<String>,
}

impl Message {
    pub fn has_alias(&self) -> bool {
        self.fields.iter().any(|f| f.alias.is_some())
    }
}

/// A generated enum member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
    pub deprecated: bool,
    pub debug_redact: bool,
    /// Custom option name to Python literal, sorted by name.
    pub custom_options: BTreeMap<String, String>,
    pub leading_comments: Vec<String>,
    pub trailing_comments: Vec<String>,
}

impl EnumValue {
    pub fn has_options(&self) -> bool {
        self.deprecated || self.debug_redact || !self.custom_options.is_empty()
    }
}

/// A generated enum class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    pub name: String,
    pub values: Vec<EnumValue>,
    pub leading_comments: Vec<String>,
    pub trailing_comments: Vec<String>,
}

impl Enum {
    /// Whether members render in the tuple-with-options form.
    pub fn has_options(&self) -> bool {
        self.values.iter().any(EnumValue::has_options)
    }
}

/// Field of the generated `_EnumValueOptions` dataclass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomOptionField {
    pub name: String,
    /// One of `bool`, `int`, `float`, `str`, `bytes`, `_Any`.
    pub python_type: String,
}

/// Everything needed to render one `<stem>_pydantic.py`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PyFile {
    /// Schema file path, e.g. `shop/v1/order.proto`.
    pub path: String,
    pub leading_comments: Vec<String>,
    pub trailing_comments: Vec<String>,
    pub enums: Vec<Enum>,
    pub messages: Vec<Message>,
    pub custom_option_fields: Vec<CustomOptionField>,
    pub imports: ImportSet,
}

impl PyFile {
    pub fn has_enum_options(&self) -> bool {
        self.enums.iter().any(Enum::has_options)
    }
}
