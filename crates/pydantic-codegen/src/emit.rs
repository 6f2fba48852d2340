//! Python source rendering.
//!
//! [`render`] turns a [`PyFile`] into module text. All decisions were made
//! while building the model; this module only lays out text and then
//! [`normalize`]s it.

use crate::config::GeneratorConfig;
use crate::constraints::{dropped_comments, pydantic_args};
use crate::imports::StdSymbol;
use crate::ir::{CustomOptionField, Enum, EnumValue, Field, Message, PyFile};
use crate::literal::py_quote;

pub const HEADER: &str = "# DO NOT EDIT. Generated by protoc-gen-pydantic.";

const PROTO_MODEL: &str = r#"class _ProtoModel(_BaseModel):
    """Base class for generated Pydantic models with ProtoJSON helpers."""

    def to_proto_dict(self, **kwargs) -> dict:
        """Serialize to a dict using ProtoJSON conventions.

        Omits fields with default (zero) values and uses original proto
        field names (camelCase aliases).
        """
        kwargs.setdefault("exclude_defaults", True)
        kwargs.setdefault("by_alias", True)
        return super().model_dump(**kwargs)

    def to_proto_json(self, **kwargs) -> str:
        """Serialize to a JSON string using ProtoJSON conventions.

        Omits fields with default (zero) values and uses original proto
        field names (camelCase aliases).
        """
        kwargs.setdefault("exclude_defaults", True)
        kwargs.setdefault("by_alias", True)
        return super().model_dump_json(**kwargs)

    @classmethod
    def from_proto_dict(cls, data: dict, **kwargs):
        """Deserialize from a dict using ProtoJSON conventions."""
        return cls.model_validate(data, **kwargs)

    @classmethod
    def from_proto_json(cls, json_str: str, **kwargs):
        """Deserialize from a JSON string using ProtoJSON conventions."""
        return cls.model_validate_json(json_str, **kwargs)
"#;

/// Render one generated module.
pub fn render(file: &PyFile, config: &GeneratorConfig) -> String {
    let mut code = String::new();

    code.push_str(HEADER);
    code.push('\n');
    if !file.leading_comments.is_empty() {
        code.push_str("\"\"\"\n");
        for line in &file.leading_comments {
            code.push_str(&format!("{}\n", docstring_line(line)));
        }
        code.push_str("\"\"\"\n");
    }

    let groups = file.imports.render_groups();
    if !groups.is_empty() {
        code.push('\n');
        code.push_str(&groups.join("\n\n"));
        code.push('\n');
    }

    if file.imports.has_std(StdSymbol::BaseModel) {
        code.push_str("\n\n");
        code.push_str(PROTO_MODEL);
    }

    if file.has_enum_options() {
        code.push_str("\n\n");
        code.push_str(&render_enum_support(&file.custom_option_fields, config));
    }

    for def in &file.enums {
        code.push_str("\n\n");
        code.push_str(&render_enum(def, config));
    }

    for def in &file.messages {
        code.push_str("\n\n");
        code.push_str(&render_message(def, config));
    }

    if !file.trailing_comments.is_empty() {
        code.push_str("\n\n");
        for line in &file.trailing_comments {
            code.push_str(&format!("# {line}\n"));
        }
    }

    normalize(&code)
}

/// Strip trailing whitespace, cap blank runs at two lines and end with a
/// single newline.
///
/// # Examples
///
/// ```
/// use pydantic_codegen::emit::normalize;
///
/// assert_eq!(normalize("a  \n\n\n\n\nb\n\n"), "a\n\n\nb\n");
/// ```
pub fn normalize(text: &str) -> String {
    let mut out = text
        .split('\n')
        .map(|line| line.trim_end_matches([' ', '\t']))
        .collect::<Vec<_>>()
        .join("\n");
    while out.contains("\n\n\n\n") {
        out = out.replace("\n\n\n\n", "\n\n\n");
    }
    let trimmed_len = out.trim_end_matches('\n').len();
    out.truncate(trimmed_len);
    out.push('\n');
    out
}

/// Escape a comment line for use inside a `"""` docstring.
pub fn docstring_line(line: &str) -> String {
    line.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"")
}

fn enum_base(config: &GeneratorConfig) -> &'static str {
    if config.use_integers_for_enums { "int" } else { "str" }
}

fn render_enum_support(custom: &[CustomOptionField], config: &GeneratorConfig) -> String {
    let base = enum_base(config);
    let mut code = String::new();

    code.push_str("@_dataclass(frozen=True)\n");
    code.push_str("class _EnumValueOptions:\n");
    code.push_str("    number: int\n");
    code.push_str("    deprecated: bool = False\n");
    code.push_str("    debug_redact: bool = False\n");
    for field in custom {
        code.push_str(&format!("    {}: {} | None = None\n", field.name, field.python_type));
    }

    code.push_str("\n\n");
    code.push_str(&format!("class _ProtoEnum({base}, _Enum):\n"));
    code.push_str("    _options_: _EnumValueOptions\n\n");
    code.push_str(&format!(
        "    def __new__(cls, value: {base}, options: _EnumValueOptions | None = None):\n"
    ));
    code.push_str(&format!("        obj = {base}.__new__(cls, value)\n"));
    code.push_str("        obj._value_ = value\n");
    code.push_str("        if options is not None:\n");
    code.push_str("            obj._options_ = options\n");
    code.push_str("        return obj\n\n");
    code.push_str("    @property\n");
    code.push_str("    def options(self) -> _EnumValueOptions:\n");
    code.push_str("        return self._options_\n");
    code
}

fn render_enum(def: &Enum, config: &GeneratorConfig) -> String {
    let mut code = String::new();
    let with_options = def.has_options();

    let base = if with_options {
        "_ProtoEnum".to_string()
    } else {
        format!("{}, _Enum", enum_base(config))
    };
    code.push_str(&format!("class {}({base}):\n", def.name));

    if def.leading_comments.is_empty() {
        code.push_str("    \"\"\" \"\"\"\n");
    } else {
        code.push_str("    \"\"\"\n");
        for line in &def.leading_comments {
            code.push_str(&format!("    {}\n", docstring_line(line)));
        }
        code.push_str("    \"\"\"\n");
    }
    push_comment_block(&mut code, &def.trailing_comments);

    for value in &def.values {
        code.push('\n');
        for line in &value.leading_comments {
            code.push_str(&format!("    # {line}\n"));
        }
        code.push_str(&render_enum_value(value, with_options, config));
        for line in &value.trailing_comments {
            code.push_str(&format!("    # {line}\n"));
        }
    }
    code
}

fn render_enum_value(value: &EnumValue, with_options: bool, config: &GeneratorConfig) -> String {
    let name = &value.name;
    let number = value.number;
    let (member, marker) = if config.use_integers_for_enums {
        (number.to_string(), name.clone())
    } else {
        (format!("\"{name}\""), number.to_string())
    };

    if !with_options {
        return format!("    {name} = {member}  # {marker}\n");
    }

    let mut code = format!("    {name} = (\n        {member},\n");
    if value.custom_options.is_empty() {
        let mut args = format!("number={number}");
        if value.deprecated {
            args.push_str(", deprecated=True");
        }
        if value.debug_redact {
            args.push_str(", debug_redact=True");
        }
        code.push_str(&format!("        _EnumValueOptions({args}),\n"));
    } else {
        code.push_str("        _EnumValueOptions(\n");
        code.push_str(&format!("            number={number},\n"));
        if value.deprecated {
            code.push_str("            deprecated=True,\n");
        }
        if value.debug_redact {
            code.push_str("            debug_redact=True,\n");
        }
        for (key, literal) in &value.custom_options {
            code.push_str(&format!("            {key}={literal},\n"));
        }
        code.push_str("        ),\n");
    }
    code.push_str(&format!("    )  # {marker}\n"));
    code
}

fn render_message(def: &Message, config: &GeneratorConfig) -> String {
    let mut code = String::new();

    code.push_str(&format!("class {}(_ProtoModel):\n", def.name));
    code.push_str("    \"\"\"\n");
    for line in &def.leading_comments {
        code.push_str(&format!("    {}\n", docstring_line(line)));
    }
    code.push_str("\n    Attributes:\n");
    for field in &def.fields {
        code.push_str(&format!("      {} ({}):\n", field.name, field.ty.render()));
        for line in &field.leading_comments {
            code.push_str(&format!("        {}\n", docstring_line(line)));
        }
    }
    code.push_str("    \"\"\"\n\n");

    code.push_str("    model_config = _ConfigDict(\n");
    if def.has_alias() {
        code.push_str("        populate_by_name=True,\n");
    }
    code.push_str("        ser_json_bytes=\"base64\",\n");
    code.push_str("        val_json_bytes=\"base64\",\n");
    code.push_str("        ser_json_inf_nan=\"strings\",\n");
    code.push_str("    )\n");
    push_comment_block(&mut code, &def.trailing_comments);

    for field in &def.fields {
        code.push('\n');
        code.push_str(&render_field(field, config));
    }
    if def.fields.is_empty() {
        code.push_str("\n    pass\n");
    }
    code
}

fn render_field(field: &Field, config: &GeneratorConfig) -> String {
    let mut code = String::new();
    for line in &field.leading_comments {
        code.push_str(&format!("    # {line}\n"));
    }

    let annotation = quote_annotation(&field.ty.render());
    let default = field.default.render();
    let describe = !config.disable_field_description && field.has_description_source();
    let expanded =
        describe || field.alias.is_some() || field.default.is_factory() || field.has_constraints();

    if expanded {
        code.push_str(&format!("    {}: {annotation} = _Field(\n", field.name));
        code.push_str(&format!("        {default},\n"));
        if describe {
            code.push_str(&format!("        description={},\n", py_quote(&field.description())));
        }
        if let Some(alias) = &field.alias {
            code.push_str(&format!("        alias=\"{alias}\",\n"));
        }
        if let Some(constraints) = &field.constraints {
            for arg in pydantic_args(constraints) {
                code.push_str(&format!("        {arg},\n"));
            }
            for comment in dropped_comments(constraints) {
                code.push_str(&format!("        {comment}\n"));
            }
        }
        code.push_str("    )\n");
    } else {
        code.push_str(&format!("    {}: {annotation} = _Field({default})\n", field.name));
    }

    for line in &field.trailing_comments {
        code.push_str(&format!("    # {line}\n"));
    }
    code
}

fn push_comment_block(code: &mut String, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    code.push('\n');
    for line in lines {
        code.push_str(&format!("    # {line}\n"));
    }
}

/// Type annotations are emitted as string literals so forward references
/// resolve regardless of class order.
fn quote_annotation(annotation: &str) -> String {
    format!("\"{}\"", annotation.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
#[path = "emit/emit_tests.rs"]
mod emit_tests;
