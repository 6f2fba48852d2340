//! Option extensions discovered in the descriptor pool.
//!
//! The [`OptionRegistry`] is built once per invocation from every file in the
//! pool, not only the files being generated, so an enum-value option declared
//! in one file resolves when used in another.

use crate::ir::CustomOptionField;
use crate::literal::{py_bool, py_bytes, py_float, py_float32, py_quote};
use prost_reflect::{DescriptorPool, DynamicMessage, ExtensionDescriptor, Kind, Value};
use std::collections::{BTreeMap, BTreeSet};

const ENUM_VALUE_OPTIONS: &str = "google.protobuf.EnumValueOptions";
const FIELD_OPTIONS: &str = "google.protobuf.FieldOptions";
const FIELD_RULES_PACKAGE: &str = "buf.validate";
const FIELD_RULES_NAME: &str = "field";

/// A custom option value reduced to what can be rendered in Python.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    Bytes(Vec<u8>),
    EnumNumber(i32),
    /// Message, list or map values.
    Unrepresentable,
}

impl OptionValue {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(v) => OptionValue::Bool(*v),
            Value::I32(v) => OptionValue::Int(i64::from(*v)),
            Value::I64(v) => OptionValue::Int(*v),
            Value::U32(v) => OptionValue::Uint(u64::from(*v)),
            Value::U64(v) => OptionValue::Uint(*v),
            Value::F32(v) => OptionValue::Float32(*v),
            Value::F64(v) => OptionValue::Float64(*v),
            Value::String(v) => OptionValue::String(v.clone()),
            Value::Bytes(v) => OptionValue::Bytes(v.to_vec()),
            Value::EnumNumber(v) => OptionValue::EnumNumber(*v),
            _ => OptionValue::Unrepresentable,
        }
    }

    /// Python literal for this value, or `None` if it has no literal form.
    pub fn to_python_literal(&self) -> Option<String> {
        let literal = match self {
            OptionValue::Bool(v) => py_bool(*v).to_string(),
            OptionValue::Int(v) => v.to_string(),
            OptionValue::Uint(v) => v.to_string(),
            OptionValue::Float32(v) => py_float32(*v),
            OptionValue::Float64(v) => py_float(*v),
            OptionValue::String(v) => py_quote(v),
            OptionValue::Bytes(v) => py_bytes(v),
            OptionValue::EnumNumber(v) => v.to_string(),
            OptionValue::Unrepresentable => return None,
        };
        Some(literal)
    }
}

/// Read-only view of the option extensions available to this invocation.
#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    custom_option_fields: Vec<CustomOptionField>,
    field_rules: Option<ExtensionDescriptor>,
}

impl OptionRegistry {
    pub fn from_pool(pool: &DescriptorPool) -> Self {
        let mut seen = BTreeSet::new();
        let mut custom_option_fields = Vec::new();
        let mut field_rules = None;

        for ext in pool.all_extensions() {
            let extendee = ext.containing_message();
            match extendee.full_name() {
                ENUM_VALUE_OPTIONS => {
                    if seen.insert(ext.name().to_string()) {
                        custom_option_fields.push(CustomOptionField {
                            name: ext.name().to_string(),
                            python_type: python_type_for_kind(&ext.kind()).to_string(),
                        });
                    }
                }
                FIELD_OPTIONS
                    if field_rules.is_none()
                        && ext.name() == FIELD_RULES_NAME
                        && ext.parent_file().package_name() == FIELD_RULES_PACKAGE =>
                {
                    field_rules = Some(ext);
                }
                _ => {}
            }
        }

        custom_option_fields.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::debug!(
            custom_options = custom_option_fields.len(),
            field_rules = field_rules.is_some(),
            "built option registry"
        );

        Self {
            custom_option_fields,
            field_rules,
        }
    }

    /// Custom enum-value option fields, sorted by name.
    pub fn custom_option_fields(&self) -> &[CustomOptionField] {
        &self.custom_option_fields
    }

    /// The `buf.validate.field` extension, when the pool defines it.
    pub fn field_rules(&self) -> Option<&ExtensionDescriptor> {
        self.field_rules.as_ref()
    }

    /// Resolve the custom extensions set on an `EnumValueOptions` message.
    ///
    /// Entries are keyed by extension name. Values without a Python literal
    /// form are skipped.
    pub fn resolve_enum_value_options(&self, options: &DynamicMessage) -> BTreeMap<String, String> {
        let mut resolved = BTreeMap::new();
        for (ext, value) in options.extensions() {
            if ext.containing_message().full_name() != ENUM_VALUE_OPTIONS {
                continue;
            }
            match OptionValue::from_value(value).to_python_literal() {
                Some(literal) => {
                    resolved.insert(ext.name().to_string(), literal);
                }
                None => {
                    tracing::warn!(
                        option = ext.full_name(),
                        "enum value option has no Python literal form, skipping"
                    );
                }
            }
        }
        resolved
    }
}

/// Python type of a custom option field.
pub fn python_type_for_kind(kind: &Kind) -> &'static str {
    match kind {
        Kind::Bool => "bool",
        Kind::Int32
        | Kind::Sint32
        | Kind::Sfixed32
        | Kind::Int64
        | Kind::Sint64
        | Kind::Sfixed64
        | Kind::Uint32
        | Kind::Fixed32
        | Kind::Uint64
        | Kind::Fixed64 => "int",
        Kind::Float | Kind::Double => "float",
        Kind::String => "str",
        Kind::Bytes => "bytes",
        Kind::Enum(_) | Kind::Message(_) => "_Any",
    }
}
