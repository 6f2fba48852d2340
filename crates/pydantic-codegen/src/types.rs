//! Field type resolution.
//!
//! Maps a protobuf field onto a Python type expression and default value,
//! recording any import the expression needs.

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, GeneratorResult};
use crate::imports::{ImportSet, StdSymbol};
use crate::ir::{FieldDefault, NullableStyle, TypeRef};
use crate::naming::flattened_name;
use crate::support::SupportSymbol;
use prost_reflect::{Cardinality, FieldDescriptor, FileDescriptor, Kind, OneofDescriptor};

/// Python mapping of a `google.protobuf` well-known message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellKnownType {
    pub expr: &'static str,
    pub support: Option<SupportSymbol>,
}

impl WellKnownType {
    const fn native(expr: &'static str) -> Self {
        Self {
            expr,
            support: None,
        }
    }

    const fn runtime(symbol: SupportSymbol, expr: &'static str) -> Self {
        Self {
            expr,
            support: Some(symbol),
        }
    }
}

/// Look up the Python mapping for a well-known message type.
pub fn well_known_type(full_name: &str) -> Option<WellKnownType> {
    let mapping = match full_name {
        "google.protobuf.Timestamp" => {
            WellKnownType::runtime(SupportSymbol::ProtoTimestamp, "ProtoTimestamp")
        }
        "google.protobuf.Duration" => {
            WellKnownType::runtime(SupportSymbol::ProtoDuration, "ProtoDuration")
        }
        "google.protobuf.Struct" => WellKnownType::native("dict[str, _Any]"),
        "google.protobuf.Value" | "google.protobuf.Any" => WellKnownType::native("_Any"),
        "google.protobuf.ListValue" => WellKnownType::native("list[_Any]"),
        "google.protobuf.Empty" => WellKnownType::native("None"),
        "google.protobuf.FieldMask" => WellKnownType::native("list[str]"),
        "google.protobuf.BoolValue" => WellKnownType::native("bool"),
        "google.protobuf.Int32Value" | "google.protobuf.UInt32Value" => {
            WellKnownType::native("int")
        }
        "google.protobuf.Int64Value" => {
            WellKnownType::runtime(SupportSymbol::ProtoInt64, "ProtoInt64")
        }
        "google.protobuf.UInt64Value" => {
            WellKnownType::runtime(SupportSymbol::ProtoUInt64, "ProtoUInt64")
        }
        "google.protobuf.FloatValue" | "google.protobuf.DoubleValue" => {
            WellKnownType::native("float")
        }
        "google.protobuf.StringValue" => WellKnownType::native("str"),
        "google.protobuf.BytesValue" => WellKnownType::native("bytes"),
        _ => return None,
    };
    Some(mapping)
}

/// Whether the field was declared with an explicit `optional` label.
///
/// Covers proto3 `optional` and proto2 `optional` outside a oneof.
pub fn has_optional_keyword(field: &FieldDescriptor) -> bool {
    if field.field_descriptor_proto().proto3_optional() {
        return true;
    }
    is_proto2(&field.parent_file())
        && field.cardinality() == Cardinality::Optional
        && field.containing_oneof().is_none()
}

/// The field's oneof, ignoring the synthetic oneof of proto3 `optional`.
pub fn real_oneof(field: &FieldDescriptor) -> Option<OneofDescriptor> {
    field
        .containing_oneof()
        .filter(|oneof| !oneof.fields().any(|f| f.field_descriptor_proto().proto3_optional()))
}

fn is_proto2(file: &FileDescriptor) -> bool {
    matches!(file.file_descriptor_proto().syntax(), "" | "proto2")
}

fn is_required_reference(field: &FieldDescriptor) -> bool {
    field.cardinality() == Cardinality::Required
        && matches!(field.kind(), Kind::Message(_) | Kind::Enum(_))
}

/// Resolves field types relative to the file being generated.
pub struct TypeResolver<'a> {
    file: &'a FileDescriptor,
    style: NullableStyle,
}

impl<'a> TypeResolver<'a> {
    pub fn new(file: &'a FileDescriptor, config: &GeneratorConfig) -> Self {
        let style = if config.use_none_union_syntax_instead_of_optional {
            NullableStyle::Union
        } else {
            NullableStyle::Optional
        };
        Self { file, style }
    }

    /// Resolve the annotation of `field`.
    pub fn resolve_type(
        &self,
        field: &FieldDescriptor,
        imports: &mut ImportSet,
    ) -> GeneratorResult<TypeRef> {
        let base = self.base_type(field, imports)?;

        if field.is_list() {
            return Ok(TypeRef::new(format!("list[{base}]"), false, self.style));
        }

        let nullable = if field.is_map() {
            false
        } else if has_optional_keyword(field) || real_oneof(field).is_some() {
            true
        } else {
            matches!(field.kind(), Kind::Message(_) | Kind::Enum(_))
                && !is_required_reference(field)
        };

        if nullable && self.style == NullableStyle::Optional && base != "None" {
            imports.add_std(StdSymbol::Optional);
        }
        Ok(TypeRef::new(base, nullable, self.style))
    }

    /// Resolve the `_Field(...)` default of `field`.
    pub fn resolve_default(&self, field: &FieldDescriptor) -> FieldDefault {
        if has_optional_keyword(field) || real_oneof(field).is_some() {
            return FieldDefault::none();
        }
        if field.is_list() {
            return FieldDefault::Factory("list");
        }
        if field.is_map() {
            return FieldDefault::Factory("dict");
        }
        if is_required_reference(field) {
            return FieldDefault::Value("...".to_string());
        }

        let value = match field.kind() {
            Kind::Message(_) | Kind::Enum(_) => "None",
            Kind::Bool => "False",
            Kind::Float | Kind::Double => "0.0",
            Kind::String => "\"\"",
            Kind::Bytes => "b\"\"",
            _ => "0",
        };
        FieldDefault::Value(value.to_string())
    }

    fn base_type(&self, field: &FieldDescriptor, imports: &mut ImportSet) -> GeneratorResult<String> {
        if field.is_group() {
            let owner = field.parent_message();
            return Err(GeneratorError::UnsupportedField {
                field: format!(
                    "{}.{}",
                    flattened_name(owner.full_name(), owner.package_name()),
                    field.name()
                ),
                kind: "group".to_string(),
            });
        }

        let ty = match field.kind() {
            Kind::Int32 | Kind::Uint32 | Kind::Fixed32 | Kind::Sint32 | Kind::Sfixed32 => {
                "int".to_string()
            }
            Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => {
                imports.add_support(SupportSymbol::ProtoInt64);
                "ProtoInt64".to_string()
            }
            Kind::Uint64 | Kind::Fixed64 => {
                imports.add_support(SupportSymbol::ProtoUInt64);
                "ProtoUInt64".to_string()
            }
            Kind::Bool => "bool".to_string(),
            Kind::Float | Kind::Double => "float".to_string(),
            Kind::String => "str".to_string(),
            Kind::Bytes => "bytes".to_string(),
            Kind::Enum(enum_desc) => {
                let name = flattened_name(enum_desc.full_name(), enum_desc.package_name());
                self.import_cross_file(&enum_desc.parent_file(), &name, imports);
                name
            }
            Kind::Message(message) => {
                if let Some(wkt) = well_known_type(message.full_name()) {
                    if let Some(symbol) = wkt.support {
                        imports.add_support(symbol);
                    }
                    if wkt.expr.contains("_Any") {
                        imports.add_std(StdSymbol::Any);
                    }
                    return Ok(wkt.expr.to_string());
                }

                if field.is_map() {
                    let key = self.base_type(&message.map_entry_key_field(), imports)?;
                    let value = self.base_type(&message.map_entry_value_field(), imports)?;
                    return Ok(format!("dict[{key}, {value}]"));
                }

                let name = flattened_name(message.full_name(), message.package_name());
                self.import_cross_file(&message.parent_file(), &name, imports);
                name
            }
        };
        Ok(ty)
    }

    /// Record the import for a type defined in `target`.
    ///
    /// Same file: nothing. Same package: relative import. Otherwise an
    /// absolute import derived from the target file's directory.
    fn import_cross_file(&self, target: &FileDescriptor, type_name: &str, imports: &mut ImportSet) {
        if target.name() == self.file.name() {
            return;
        }

        let module = module_stem(target.name());
        if target.package_name() == self.file.package_name() {
            imports.add_relative(format!(".{module}"), type_name);
            return;
        }

        let dir = parent_dir(target.name());
        if dir.is_empty() {
            imports.add_absolute(module, type_name);
        } else {
            imports.add_absolute(format!("{}.{module}", dir.replace('/', ".")), type_name);
        }
    }
}

/// `shop/v1/order.proto` becomes `order_pydantic`.
pub fn module_stem(path: &str) -> String {
    let base = path.rsplit('/').next().unwrap_or(path);
    let base = base.strip_suffix(".proto").unwrap_or(base);
    format!("{base}_pydantic")
}

/// Directory part of a schema path, `""` for files at the root.
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}
