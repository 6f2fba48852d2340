//! Descriptor traversal.
//!
//! Walks one schema file and builds the [`PyFile`] model: enums and messages
//! hoisted to module level under their flattened names, with comments,
//! resolved types, defaults and constraints attached.

use crate::comments::CommentIndex;
use crate::config::GeneratorConfig;
use crate::constraints;
use crate::error::GeneratorResult;
use crate::imports::StdSymbol;
use crate::ir::{Enum, EnumValue, Field, Message, OneOf, PyFile};
use crate::naming::{enum_member_names, flattened_name, sanitize_field_name};
use crate::options::OptionRegistry;
use crate::types::{has_optional_keyword, real_oneof, TypeResolver};
use prost_reflect::{EnumDescriptor, FileDescriptor, MessageDescriptor};
use std::collections::BTreeSet;

// Field numbers used in SourceCodeInfo paths.
const FILE_SYNTAX: i32 = 12;
const FILE_MESSAGE: i32 = 4;
const FILE_ENUM: i32 = 5;
const MESSAGE_FIELD: i32 = 2;
const MESSAGE_NESTED: i32 = 3;
const MESSAGE_ENUM: i32 = 4;
const ENUM_VALUE: i32 = 2;

/// Build the model for one schema file.
pub fn walk_file(
    file: &FileDescriptor,
    config: &GeneratorConfig,
    registry: &OptionRegistry,
) -> GeneratorResult<PyFile> {
    let proto = file.file_descriptor_proto();
    let comments = CommentIndex::new(proto.source_code_info.as_ref());
    let file_comments = comments.get(&[FILE_SYNTAX]);

    let mut walker = DescriptorWalker {
        config,
        registry,
        comments,
        types: TypeResolver::new(file, config),
        out: PyFile {
            path: file.name().to_string(),
            leading_comments: file_comments.leading,
            trailing_comments: file_comments.trailing,
            custom_option_fields: registry.custom_option_fields().to_vec(),
            ..Default::default()
        },
    };

    for (i, enum_desc) in file.enums().enumerate() {
        walker.visit_enum(&enum_desc, vec![FILE_ENUM, index(i)]);
    }
    for (i, message) in file.messages().enumerate() {
        walker.visit_message(&message, vec![FILE_MESSAGE, index(i)])?;
    }

    tracing::debug!(
        file = file.name(),
        enums = walker.out.enums.len(),
        messages = walker.out.messages.len(),
        "walked schema file"
    );
    Ok(walker.out)
}

struct DescriptorWalker<'a> {
    config: &'a GeneratorConfig,
    registry: &'a OptionRegistry,
    comments: CommentIndex,
    types: TypeResolver<'a>,
    out: PyFile,
}

impl DescriptorWalker<'_> {
    fn visit_enum(&mut self, enum_desc: &EnumDescriptor, path: Vec<i32>) {
        let comments = self.comments.get(&path);
        let wire_names: Vec<String> = enum_desc.values().map(|v| v.name().to_string()).collect();
        let wire_refs: Vec<&str> = wire_names.iter().map(String::as_str).collect();
        let names = enum_member_names(
            enum_desc.name(),
            &wire_refs,
            self.config.auto_trim_enum_prefix,
        );

        let mut values = Vec::with_capacity(names.len());
        for ((i, value), name) in enum_desc.values().enumerate().zip(names) {
            let options = value.options();
            let flag = |field: &str| {
                options
                    .get_field_by_name(field)
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false)
            };
            let value_comments = self.comments.get(&child_path(&path, ENUM_VALUE, i));

            values.push(EnumValue {
                name,
                number: value.number(),
                deprecated: flag("deprecated"),
                debug_redact: flag("debug_redact"),
                custom_options: self.registry.resolve_enum_value_options(&options),
                leading_comments: value_comments.leading,
                trailing_comments: value_comments.trailing,
            });
        }

        let def = Enum {
            name: flattened_name(enum_desc.full_name(), enum_desc.package_name()),
            values,
            leading_comments: comments.leading,
            trailing_comments: comments.trailing,
        };

        let imports = &mut self.out.imports;
        imports.add_std(StdSymbol::Enum);
        if def.has_options() {
            imports.add_std(StdSymbol::Dataclass);
            let has_custom = def.values.iter().any(|v| !v.custom_options.is_empty());
            let any_typed = self
                .registry
                .custom_option_fields()
                .iter()
                .any(|f| f.python_type == "_Any");
            if has_custom && any_typed {
                imports.add_std(StdSymbol::Any);
            }
        }
        self.out.enums.push(def);
    }

    fn visit_message(&mut self, message: &MessageDescriptor, path: Vec<i32>) -> GeneratorResult<()> {
        if message.is_map_entry() {
            return Ok(());
        }

        for (i, nested) in message.child_enums().enumerate() {
            self.visit_enum(&nested, child_path(&path, MESSAGE_ENUM, i));
        }
        for (i, nested) in message.child_messages().enumerate() {
            self.visit_message(&nested, child_path(&path, MESSAGE_NESTED, i))
                .map_err(|e| e.in_message(nested.name()))?;
        }

        let name = flattened_name(message.full_name(), message.package_name());
        let comments = self.comments.get(&path);
        let mut taken = BTreeSet::new();
        let mut fields = Vec::new();

        for (i, field) in message.fields().enumerate() {
            let ty = self.types.resolve_type(&field, &mut self.out.imports)?;

            let wire_name = if self.config.preserving_proto_field_name {
                field.name()
            } else {
                field.json_name()
            };
            let (field_name, alias) = sanitize_field_name(wire_name, &taken);
            taken.insert(field_name.clone());

            let oneof = real_oneof(&field)
                .filter(|_| !has_optional_keyword(&field))
                .map(|oneof| OneOf {
                    name: oneof.name().to_string(),
                    field_names: oneof.fields().map(|f| f.name().to_string()).collect(),
                });

            let field_comments = self.comments.get(&child_path(&path, MESSAGE_FIELD, i));
            let mut def = Field {
                name: field_name,
                alias,
                ty,
                default: self.types.resolve_default(&field),
                oneof,
                constraints: constraints::extract(&field, self.registry),
                leading_comments: field_comments.leading,
                trailing_comments: field_comments.trailing,
            };
            constraints::apply(&mut def, &mut self.out.imports);
            fields.push(def);
        }

        self.out.imports.add_std(StdSymbol::BaseModel);
        tracing::debug!(message = %name, fields = fields.len(), "built model");
        self.out.messages.push(Message {
            name,
            fields,
            leading_comments: comments.leading,
            trailing_comments: comments.trailing,
        });
        Ok(())
    }
}

fn child_path(parent: &[i32], kind: i32, i: usize) -> Vec<i32> {
    let mut path = parent.to_vec();
    path.push(kind);
    path.push(index(i));
    path
}

fn index(i: usize) -> i32 {
    i32::try_from(i).unwrap_or(i32::MAX)
}
