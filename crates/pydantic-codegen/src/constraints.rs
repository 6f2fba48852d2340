//! Translation of `buf.validate` field rules into Pydantic constraints.
//!
//! Rules are read from the `buf.validate.field` extension on a field's
//! options. Each rule of the type-specific sub-message is fed to a
//! [`RuleCollector`]; once the whole sub-message has been visited,
//! [`RuleCollector::seal`] folds prefix, suffix and contains into a single
//! pattern and produces the final [`FieldConstraints`].

use crate::imports::{ImportSet, StdSymbol};
use crate::ir::{ConstValue, Field, FieldConstraints, FieldDefault, FormatValidator};
use crate::literal::{py_bool, py_float, py_float32, py_quote, py_quote_single};
use crate::options::OptionRegistry;
use crate::support::SupportSymbol;
use prost_reflect::{FieldDescriptor, Kind, ReflectMessage, Value};

/// Accumulates rules of one field before they are sealed.
#[derive(Debug, Default)]
pub struct RuleCollector {
    constraints: FieldConstraints,
    prefix: Option<String>,
    suffix: Option<String>,
    contains: Option<String>,
    enum_valued: bool,
}

impl RuleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collector for a field of the given kind.
    ///
    /// Enum fields render as enum members, so numeric `const`, `in` and
    /// `not_in` rules on them are dropped.
    pub fn for_kind(kind: &Kind) -> Self {
        Self {
            enum_valued: matches!(kind, Kind::Enum(_)),
            ..Self::default()
        }
    }

    /// Record a rule dropped at the top level of `FieldRules`.
    pub fn drop_rule(&mut self, name: &str) {
        self.constraints.dropped.push(name.to_string());
    }

    /// Visit one rule of the type-specific rules message.
    pub fn visit(&mut self, name: &str, value: &Value) {
        let c = &mut self.constraints;
        if self.enum_valued && matches!(name, "const" | "in" | "not_in") {
            c.dropped.push(name.to_string());
            return;
        }
        match name {
            "gt" | "gte" | "lt" | "lte" => {
                let Some(literal) = numeric_literal(value) else {
                    c.dropped.push(name.to_string());
                    return;
                };
                let slot = match name {
                    "gt" => &mut c.gt,
                    "gte" => &mut c.gte,
                    "lt" => &mut c.lt,
                    _ => &mut c.lte,
                };
                *slot = Some(literal);
            }
            "min_len" | "min_items" | "min_pairs" => match length(value) {
                Some(n) => c.min_length = Some(n),
                None => c.dropped.push(name.to_string()),
            },
            "max_len" | "max_items" | "max_pairs" => match length(value) {
                Some(n) => c.max_length = Some(n),
                None => c.dropped.push(name.to_string()),
            },
            "len" => match length(value) {
                Some(n) => {
                    c.min_length = Some(n);
                    c.max_length = Some(n);
                }
                None => c.dropped.push(name.to_string()),
            },
            "pattern" | "prefix" | "suffix" | "contains" => {
                let Some(text) = value.as_str() else {
                    c.dropped.push(name.to_string());
                    return;
                };
                let slot = match name {
                    "pattern" => &mut c.pattern,
                    "prefix" => &mut self.prefix,
                    "suffix" => &mut self.suffix,
                    _ => &mut self.contains,
                };
                *slot = Some(text.to_string());
            }
            "example" => {
                if let Some(items) = value.as_list() {
                    c.examples.extend(items.iter().filter_map(example_literal));
                }
            }
            "const" => match const_value(value) {
                Some(constant) => c.const_value = Some(constant),
                None => c.dropped.push(name.to_string()),
            },
            "in" | "not_in" => {
                let literals: Vec<String> = value
                    .as_list()
                    .map(|items| items.iter().filter_map(scalar_literal).collect())
                    .unwrap_or_default();
                if literals.is_empty() {
                    c.dropped.push(name.to_string());
                } else if name == "in" {
                    c.in_values.extend(literals);
                } else {
                    c.not_in_values.extend(literals);
                }
            }
            "unique" => {
                if value.as_bool() == Some(true) {
                    c.unique_items = true;
                }
            }
            "finite" => {
                if value.as_bool() == Some(true) {
                    c.require_finite = true;
                }
            }
            "email" | "uri" | "ip" | "ipv4" | "ipv6" | "uuid" => {
                if value.as_bool() == Some(true) {
                    c.format = FormatValidator::from_rule_name(name);
                }
            }
            _ => c.dropped.push(name.to_string()),
        }
    }

    /// Resolve intermediate string rules and finish the constraint set.
    ///
    /// Returns `None` when nothing was recorded.
    pub fn seal(mut self) -> Option<FieldConstraints> {
        let (pattern, dropped) = synthesize_pattern(
            self.constraints.pattern.take(),
            self.prefix.as_deref(),
            self.suffix.as_deref(),
            self.contains.as_deref(),
        );
        self.constraints.pattern = pattern;
        self.constraints
            .dropped
            .extend(dropped.into_iter().map(str::to_string));

        self.constraints.dropped.sort();
        self.constraints.dropped.dedup();

        if self.constraints.is_empty() {
            return None;
        }
        Some(self.constraints)
    }
}

/// Combine an explicit pattern with prefix, suffix and contains rules.
///
/// Returns the resulting pattern and the rule names that could not be
/// combined.
///
/// # Examples
///
/// ```
/// use pydantic_codegen::constraints::synthesize_pattern;
///
/// let (pattern, dropped) = synthesize_pattern(None, Some("a"), Some("z"), None);
/// assert_eq!(pattern.as_deref(), Some("^a.*z$"));
/// assert!(dropped.is_empty());
///
/// let (pattern, dropped) = synthesize_pattern(Some("^x$".into()), Some("a"), None, None);
/// assert_eq!(pattern.as_deref(), Some("^x$"));
/// assert_eq!(dropped, vec!["prefix"]);
/// ```
pub fn synthesize_pattern(
    pattern: Option<String>,
    prefix: Option<&str>,
    suffix: Option<&str>,
    contains: Option<&str>,
) -> (Option<String>, Vec<&'static str>) {
    let mut dropped = Vec::new();

    if pattern.is_some() {
        for (name, rule) in [("prefix", prefix), ("suffix", suffix), ("contains", contains)] {
            if rule.is_some() {
                dropped.push(name);
            }
        }
        return (pattern, dropped);
    }

    let synthesized = match (prefix, suffix) {
        (Some(p), Some(s)) => Some(format!("^{}.*{}$", regex::escape(p), regex::escape(s))),
        (Some(p), None) => Some(format!("^{}", regex::escape(p))),
        (None, Some(s)) => Some(format!("{}$", regex::escape(s))),
        (None, None) => None,
    };

    match (synthesized, contains) {
        (Some(pattern), contains) => {
            if contains.is_some() {
                dropped.push("contains");
            }
            (Some(pattern), dropped)
        }
        (None, Some(c)) => (Some(regex::escape(c)), dropped),
        (None, None) => (None, dropped),
    }
}

/// Extract the translated constraints of `field`, if any.
pub fn extract(field: &FieldDescriptor, registry: &OptionRegistry) -> Option<FieldConstraints> {
    let extension = registry.field_rules()?;
    let options = field.options();
    if !options.has_extension(extension) {
        return None;
    }
    let rules_value = options.get_extension(extension);
    let rules = rules_value.as_message()?;

    let mut collector = RuleCollector::for_kind(&field.kind());
    for rule_field in rules.descriptor().fields() {
        if !rules.has_field(&rule_field) {
            continue;
        }
        let value = rules.get_field(&rule_field);
        match rule_field.name() {
            "required" => {
                if value.as_bool() == Some(true) {
                    collector.drop_rule("required");
                }
            }
            "cel" | "cel_expression" => collector.drop_rule(rule_field.name()),
            _ => {
                if rule_field.is_list() {
                    continue;
                }
                if let Some(type_rules) = value.as_message() {
                    for rule in type_rules.descriptor().fields() {
                        if type_rules.has_field(&rule) {
                            collector.visit(rule.name(), &type_rules.get_field(&rule));
                        }
                    }
                }
            }
        }
    }

    let constraints = collector.seal()?;
    for name in &constraints.dropped {
        tracing::debug!(field = field.full_name(), rule = %name, "validation rule not translated");
    }
    Some(constraints)
}

/// Fold type-level constraints into the field's annotation and default.
///
/// `const` on a literal-capable kind narrows the type to `_Literal[...]`;
/// membership, uniqueness, format, finiteness and float `const` rules wrap
/// the type in `_Annotated[T, _AfterValidator(...), ...]`.
pub fn apply(field: &mut Field, imports: &mut ImportSet) {
    let Some(constraints) = field.constraints.as_ref() else {
        return;
    };
    let mut validators = Vec::new();

    if let Some(ConstValue::Literal { literal, default }) = &constraints.const_value {
        field.ty.expr = format!("_Literal[{literal}]");
        imports.add_std(StdSymbol::Literal);
        if !field.ty.nullable {
            field.default = FieldDefault::Value(default.clone());
        }
    }

    if !constraints.in_values.is_empty() {
        validators.push(format!(
            "_AfterValidator(_make_in_validator(frozenset({{{}}})))",
            constraints.in_values.join(", ")
        ));
        imports.add_support(SupportSymbol::MakeInValidator);
    }
    if !constraints.not_in_values.is_empty() {
        validators.push(format!(
            "_AfterValidator(_make_not_in_validator(frozenset({{{}}})))",
            constraints.not_in_values.join(", ")
        ));
        imports.add_support(SupportSymbol::MakeNotInValidator);
    }
    if constraints.unique_items {
        validators.push("_AfterValidator(_require_unique)".to_string());
        imports.add_support(SupportSymbol::RequireUnique);
    }
    if let Some(format) = constraints.format {
        let symbol = format_symbol(format);
        validators.push(format!("_AfterValidator({symbol})"));
        imports.add_support(symbol);
    }
    if constraints.require_finite {
        validators.push("_AfterValidator(_require_finite)".to_string());
        imports.add_support(SupportSymbol::RequireFinite);
    }
    if let Some(ConstValue::Float(literal)) = &constraints.const_value {
        validators.push(format!("_AfterValidator(_make_const_validator({literal}))"));
        imports.add_support(SupportSymbol::MakeConstValidator);
        if !field.ty.nullable {
            field.default = FieldDefault::Value(literal.clone());
        }
    }

    if !validators.is_empty() {
        field.ty.expr = format!("_Annotated[{}, {}]", field.ty.expr, validators.join(", "));
        imports.add_std(StdSymbol::Annotated);
        imports.add_std(StdSymbol::AfterValidator);
    }
}

/// Keyword arguments for `_Field(...)`, in a fixed order.
pub fn pydantic_args(constraints: &FieldConstraints) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(v) = &constraints.gte {
        args.push(format!("ge={v}"));
    }
    if let Some(v) = &constraints.gt {
        args.push(format!("gt={v}"));
    }
    if let Some(v) = &constraints.lte {
        args.push(format!("le={v}"));
    }
    if let Some(v) = &constraints.lt {
        args.push(format!("lt={v}"));
    }
    if let Some(n) = constraints.min_length {
        args.push(format!("min_length={n}"));
    }
    if let Some(n) = constraints.max_length {
        args.push(format!("max_length={n}"));
    }
    if let Some(pattern) = &constraints.pattern {
        args.push(format!("pattern={}", py_quote(pattern)));
    }
    if !constraints.examples.is_empty() {
        args.push(format!("examples=[{}]", constraints.examples.join(", ")));
    }
    args
}

/// One comment line per rule that was recognised but not translated.
pub fn dropped_comments(constraints: &FieldConstraints) -> Vec<String> {
    constraints
        .dropped
        .iter()
        .map(|name| format!("# buf.validate: {name} (not translated)"))
        .collect()
}

fn format_symbol(format: FormatValidator) -> SupportSymbol {
    match format {
        FormatValidator::Email => SupportSymbol::ValidateEmail,
        FormatValidator::Uri => SupportSymbol::ValidateUri,
        FormatValidator::Ip => SupportSymbol::ValidateIp,
        FormatValidator::Ipv4 => SupportSymbol::ValidateIpv4,
        FormatValidator::Ipv6 => SupportSymbol::ValidateIpv6,
        FormatValidator::Uuid => SupportSymbol::ValidateUuid,
    }
}

fn numeric_literal(value: &Value) -> Option<String> {
    match value {
        Value::F32(v) => Some(py_float32(*v)),
        Value::F64(v) => Some(py_float(*v)),
        Value::I32(v) => Some(v.to_string()),
        Value::I64(v) => Some(v.to_string()),
        Value::U32(v) => Some(v.to_string()),
        Value::U64(v) => Some(v.to_string()),
        _ => None,
    }
}

fn length(value: &Value) -> Option<u64> {
    match value {
        Value::U64(v) => Some(*v),
        Value::U32(v) => Some(u64::from(*v)),
        Value::I64(v) => u64::try_from(*v).ok(),
        Value::I32(v) => u64::try_from(*v).ok(),
        _ => None,
    }
}

/// Literal for `Literal[...]` and `frozenset({...})`; strings single-quoted.
fn scalar_literal(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(py_quote_single(s)),
        Value::Bool(b) => Some(py_bool(*b).to_string()),
        Value::I32(_) | Value::I64(_) | Value::U32(_) | Value::U64(_) => numeric_literal(value),
        _ => None,
    }
}

fn example_literal(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(py_quote(s)),
        Value::Bool(b) => Some(py_bool(*b).to_string()),
        Value::EnumNumber(n) => Some(n.to_string()),
        _ => numeric_literal(value),
    }
}

fn const_value(value: &Value) -> Option<ConstValue> {
    match value {
        Value::F32(v) => Some(ConstValue::Float(py_float32(*v))),
        Value::F64(v) => Some(ConstValue::Float(py_float(*v))),
        Value::String(s) => Some(ConstValue::Literal {
            literal: py_quote_single(s),
            default: py_quote(s),
        }),
        _ => scalar_literal(value).map(|literal| ConstValue::Literal {
            default: literal.clone(),
            literal,
        }),
    }
}

#[cfg(test)]
#[path = "constraints/constraints_tests.rs"]
mod constraints_tests;
