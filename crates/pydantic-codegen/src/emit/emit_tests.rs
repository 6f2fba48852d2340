#![allow(non_snake_case)]

use super::*;
use crate::imports::ImportSet;
use crate::ir::{FieldConstraints, FieldDefault, NullableStyle, OneOf, TypeRef};
use std::collections::BTreeMap;

fn scalar_field(name: &str, expr: &str, default: &str) -> Field {
    Field {
        name: name.to_string(),
        alias: None,
        ty: TypeRef::new(expr, false, NullableStyle::Union),
        default: FieldDefault::Value(default.to_string()),
        oneof: None,
        constraints: None,
        leading_comments: vec![],
        trailing_comments: vec![],
    }
}

fn message(name: &str, fields: Vec<Field>) -> Message {
    Message {
        name: name.to_string(),
        fields,
        leading_comments: vec![],
        trailing_comments: vec![],
    }
}

fn enum_value(name: &str, number: i32) -> EnumValue {
    EnumValue {
        name: name.to_string(),
        number,
        deprecated: false,
        debug_redact: false,
        custom_options: BTreeMap::new(),
        leading_comments: vec![],
        trailing_comments: vec![],
    }
}

fn model_file(messages: Vec<Message>) -> PyFile {
    let mut imports = ImportSet::new();
    imports.add_std(StdSymbol::BaseModel);
    PyFile {
        path: "shop/v1/order.proto".to_string(),
        messages,
        imports,
        ..Default::default()
    }
}

// ============================================================================
// normalize
// ============================================================================

#[test]
fn normalize___strips_trailing_whitespace() {
    assert_eq!(normalize("a \t\n    \nb"), "a\n\nb\n");
}

#[test]
fn normalize___collapses_long_blank_runs_to_two() {
    assert_eq!(normalize("a\n\n\n\n\n\n\nb"), "a\n\n\nb\n");
}

#[test]
fn normalize___is_idempotent() {
    let once = normalize("x  \n\n\n\n\ny\n\n\n");

    assert_eq!(normalize(&once), once);
}

// ============================================================================
// Messages
// ============================================================================

#[test]
fn render___simple_message___full_layout() {
    let file = model_file(vec![message(
        "Order",
        vec![scalar_field("id", "str", "\"\"")],
    )]);

    let code = render(&file, &GeneratorConfig::default());

    assert!(code.starts_with(
        "# DO NOT EDIT. Generated by protoc-gen-pydantic.\n\nfrom pydantic import BaseModel as _BaseModel, ConfigDict as _ConfigDict, Field as _Field\n\n\nclass _ProtoModel(_BaseModel):\n"
    ));
    assert!(code.ends_with(concat!(
        "\n\n\nclass Order(_ProtoModel):\n",
        "    \"\"\"\n",
        "\n",
        "    Attributes:\n",
        "      id (str):\n",
        "    \"\"\"\n",
        "\n",
        "    model_config = _ConfigDict(\n",
        "        ser_json_bytes=\"base64\",\n",
        "        val_json_bytes=\"base64\",\n",
        "        ser_json_inf_nan=\"strings\",\n",
        "    )\n",
        "\n",
        "    id: \"str\" = _Field(\"\")\n",
    )));
}

#[test]
fn render___empty_message___emits_pass() {
    let file = model_file(vec![message("Empty", vec![])]);

    let code = render(&file, &GeneratorConfig::default());

    assert!(code.ends_with("    )\n\n    pass\n"));
}

#[test]
fn render___aliased_field___expanded_with_populate_by_name() {
    let mut field = scalar_field("class_", "str", "\"\"");
    field.alias = Some("class".to_string());
    let file = model_file(vec![message("Course", vec![field])]);

    let code = render(&file, &GeneratorConfig::default());

    assert!(code.contains("        populate_by_name=True,\n"));
    assert!(code.contains(
        "    class_: \"str\" = _Field(\n        \"\",\n        alias=\"class\",\n    )\n"
    ));
}

#[test]
fn render___described_field___uses_comments_and_oneof() {
    let mut field = scalar_field("email", "str", "None");
    field.ty.nullable = true;
    field.leading_comments = vec!["Contact email.".to_string()];
    field.oneof = Some(OneOf {
        name: "contact".to_string(),
        field_names: vec!["email".to_string(), "phone".to_string()],
    });
    let file = model_file(vec![message("Person", vec![field])]);

    let code = render(&file, &GeneratorConfig::default());

    assert!(code.contains("      email (str | None):\n        Contact email.\n"));
    assert!(code.contains("    # Contact email.\n    email: \"str | None\" = _Field(\n        None,\n"));
    assert!(code.contains(
        "        description=\"Contact email.\\nOnly one of the fields can be specified with: [email phone] (oneof contact)\",\n"
    ));
}

#[test]
fn render___description_disabled___compact_field() {
    let mut field = scalar_field("name", "str", "\"\"");
    field.leading_comments = vec!["Display name.".to_string()];
    let file = model_file(vec![message("User", vec![field])]);
    let config = GeneratorConfig {
        disable_field_description: true,
        ..Default::default()
    };

    let code = render(&file, &config);

    assert!(code.contains("    # Display name.\n    name: \"str\" = _Field(\"\")\n"));
    assert!(!code.contains("description="));
}

#[test]
fn render___constraints___args_then_dropped_comments() {
    let mut field = scalar_field("sku", "str", "\"\"");
    field.constraints = Some(FieldConstraints {
        min_length: Some(3),
        pattern: Some("^SKU".to_string()),
        dropped: vec!["required".to_string()],
        ..Default::default()
    });
    let file = model_file(vec![message("Item", vec![field])]);

    let code = render(&file, &GeneratorConfig::default());

    assert!(code.contains(concat!(
        "    sku: \"str\" = _Field(\n",
        "        \"\",\n",
        "        min_length=3,\n",
        "        pattern=\"^SKU\",\n",
        "        # buf.validate: required (not translated)\n",
        "    )\n",
    )));
}

#[test]
fn render___factory_default___expanded() {
    let mut field = scalar_field("tags", "list[str]", "");
    field.default = FieldDefault::Factory("list");
    let file = model_file(vec![message("Post", vec![field])]);

    let code = render(&file, &GeneratorConfig::default());

    assert!(code.contains("    tags: \"list[str]\" = _Field(\n        default_factory=list,\n    )\n"));
}

#[test]
fn render___literal_annotation___is_escaped() {
    let field = scalar_field("kind", "_Literal['a\"b']", "\"\"");
    let file = model_file(vec![message("Tagged", vec![field])]);

    let code = render(&file, &GeneratorConfig::default());

    assert!(code.contains(r#"    kind: "_Literal['a\"b']" = _Field("")"#));
}

// ============================================================================
// Enums
// ============================================================================

#[test]
fn render___plain_enum___string_members() {
    let mut imports = ImportSet::new();
    imports.add_std(StdSymbol::Enum);
    let file = PyFile {
        enums: vec![Enum {
            name: "Color".to_string(),
            values: vec![enum_value("UNSPECIFIED", 0), enum_value("RED", 1)],
            leading_comments: vec![],
            trailing_comments: vec![],
        }],
        imports,
        ..Default::default()
    };

    let code = render(&file, &GeneratorConfig::default());

    assert_eq!(
        code,
        concat!(
            "# DO NOT EDIT. Generated by protoc-gen-pydantic.\n",
            "\n",
            "from enum import Enum as _Enum\n",
            "\n",
            "\n",
            "class Color(str, _Enum):\n",
            "    \"\"\" \"\"\"\n",
            "\n",
            "    UNSPECIFIED = \"UNSPECIFIED\"  # 0\n",
            "\n",
            "    RED = \"RED\"  # 1\n",
        )
    );
}

#[test]
fn render___integer_enum___number_members() {
    let file = PyFile {
        enums: vec![Enum {
            name: "Level".to_string(),
            values: vec![enum_value("LOW", 0)],
            leading_comments: vec!["Severity.".to_string()],
            trailing_comments: vec![],
        }],
        ..Default::default()
    };
    let config = GeneratorConfig {
        use_integers_for_enums: true,
        ..Default::default()
    };

    let code = render(&file, &config);

    assert!(code.contains("class Level(int, _Enum):\n    \"\"\"\n    Severity.\n    \"\"\"\n\n    LOW = 0  # LOW\n"));
}

#[test]
fn render___enum_with_options___tuple_members_and_support_classes() {
    let mut deprecated = enum_value("OLD", 1);
    deprecated.deprecated = true;
    let mut custom = enum_value("RED", 2);
    custom.custom_options.insert("label".to_string(), "\"Red\"".to_string());
    let file = PyFile {
        enums: vec![Enum {
            name: "Color".to_string(),
            values: vec![enum_value("UNSPECIFIED", 0), deprecated, custom],
            leading_comments: vec![],
            trailing_comments: vec![],
        }],
        custom_option_fields: vec![CustomOptionField {
            name: "label".to_string(),
            python_type: "str".to_string(),
        }],
        ..Default::default()
    };

    let code = render(&file, &GeneratorConfig::default());

    assert!(code.contains("    label: str | None = None\n"));
    assert!(code.contains("class _ProtoEnum(str, _Enum):\n"));
    assert!(code.contains("class Color(_ProtoEnum):\n"));
    assert!(code.contains(
        "    UNSPECIFIED = (\n        \"UNSPECIFIED\",\n        _EnumValueOptions(number=0),\n    )  # 0\n"
    ));
    assert!(code.contains(
        "    OLD = (\n        \"OLD\",\n        _EnumValueOptions(number=1, deprecated=True),\n    )  # 1\n"
    ));
    assert!(code.contains(concat!(
        "    RED = (\n",
        "        \"RED\",\n",
        "        _EnumValueOptions(\n",
        "            number=2,\n",
        "            label=\"Red\",\n",
        "        ),\n",
        "    )  # 2\n",
    )));
}

// ============================================================================
// File-level comments
// ============================================================================

#[test]
fn render___file_comments___docstring_and_trailer() {
    let file = PyFile {
        leading_comments: vec!["Order service types.".to_string()],
        trailing_comments: vec!["End of file.".to_string()],
        ..Default::default()
    };

    let code = render(&file, &GeneratorConfig::default());

    assert_eq!(
        code,
        "# DO NOT EDIT. Generated by protoc-gen-pydantic.\n\"\"\"\nOrder service types.\n\"\"\"\n\n\n# End of file.\n"
    );
}

// ============================================================================
// Docstrings
// ============================================================================

#[test]
fn docstring_line___quotes_and_backslashes___escaped() {
    assert_eq!(docstring_line(r#"say """hi""""#), r#"say \"\"\"hi\"\"\""#);
    assert_eq!(docstring_line(r"ends with \"), r"ends with \\");
    assert_eq!(docstring_line("plain \"quoted\" text"), "plain \"quoted\" text");
}

#[test]
fn render___message_comment_with_triple_quotes___escaped_in_docstring() {
    let mut field = scalar_field("path", "str", "\"\"");
    field.leading_comments = vec![r"Windows root C:\".to_string()];
    let mut def = message("Quoted", vec![field]);
    def.leading_comments = vec![r#"Wraps """raw""" text."#.to_string()];
    let file = model_file(vec![def]);

    let code = render(&file, &GeneratorConfig::default());

    assert!(code.contains("    Wraps \\\"\\\"\\\"raw\\\"\\\"\\\" text.\n"));
    assert!(code.contains("        Windows root C:\\\\\n"));
    assert!(!code.contains("\"\"\"raw"));
}
