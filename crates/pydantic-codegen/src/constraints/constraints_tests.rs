#![allow(non_snake_case)]

use super::*;
use crate::ir::{NullableStyle, TypeRef};
use test_case::test_case;

fn sealed(rules: &[(&str, Value)]) -> Option<FieldConstraints> {
    let mut collector = RuleCollector::new();
    for (name, value) in rules {
        collector.visit(name, value);
    }
    collector.seal()
}

fn string_field(nullable: bool, constraints: FieldConstraints) -> Field {
    Field {
        name: "code".to_string(),
        alias: None,
        ty: TypeRef::new("str", nullable, NullableStyle::Union),
        default: if nullable {
            FieldDefault::none()
        } else {
            FieldDefault::Value("\"\"".to_string())
        },
        oneof: None,
        constraints: Some(constraints),
        leading_comments: vec![],
        trailing_comments: vec![],
    }
}

// ============================================================================
// synthesize_pattern
// ============================================================================

#[test_case(None, Some("a"), Some("z"), None, Some("^a.*z$"), &[] ; "prefix and suffix")]
#[test_case(None, Some("a"), None, None, Some("^a"), &[] ; "prefix only")]
#[test_case(None, None, Some("z"), None, Some("z$"), &[] ; "suffix only")]
#[test_case(None, None, None, Some("mid"), Some("mid"), &[] ; "contains only")]
#[test_case(None, Some("a"), None, Some("mid"), Some("^a"), &["contains"] ; "prefix with contains")]
#[test_case(Some("^x$"), Some("a"), None, None, Some("^x$"), &["prefix"] ; "explicit pattern wins over prefix")]
#[test_case(Some("^x$"), Some("a"), Some("z"), Some("m"), Some("^x$"), &["prefix", "suffix", "contains"] ; "explicit pattern drops all")]
#[test_case(None, None, None, None, None, &[] ; "nothing set")]
fn synthesize_pattern___combinations(
    pattern: Option<&str>,
    prefix: Option<&str>,
    suffix: Option<&str>,
    contains: Option<&str>,
    expected: Option<&str>,
    expected_dropped: &[&str],
) {
    let (result, dropped) = synthesize_pattern(pattern.map(str::to_string), prefix, suffix, contains);

    assert_eq!(result.as_deref(), expected);
    assert_eq!(dropped, expected_dropped);
}

#[test]
fn synthesize_pattern___metacharacters___are_escaped() {
    let (pattern, _) = synthesize_pattern(None, Some("a.b"), Some("(z)"), None);

    assert_eq!(pattern.as_deref(), Some(r"^a\.b.*\(z\)$"));
}

// ============================================================================
// RuleCollector
// ============================================================================

#[test]
fn RuleCollector___nothing_visited___seals_to_none() {
    assert_eq!(RuleCollector::new().seal(), None);
}

#[test]
fn RuleCollector___len___sets_both_bounds() {
    let c = sealed(&[("len", Value::U64(5))]).unwrap();

    assert_eq!(c.min_length, Some(5));
    assert_eq!(c.max_length, Some(5));
}

#[test]
fn RuleCollector___collection_bounds___map_to_length() {
    let c = sealed(&[("min_items", Value::U64(1)), ("max_pairs", Value::U64(10))]).unwrap();

    assert_eq!(c.min_length, Some(1));
    assert_eq!(c.max_length, Some(10));
}

#[test]
fn RuleCollector___numeric_bounds___render_by_kind() {
    let c = sealed(&[
        ("gt", Value::I32(0)),
        ("lte", Value::I64(150)),
        ("gte", Value::F32(0.5)),
        ("lt", Value::F64(1e10)),
    ])
    .unwrap();

    assert_eq!(c.gt.as_deref(), Some("0"));
    assert_eq!(c.lte.as_deref(), Some("150"));
    assert_eq!(c.gte.as_deref(), Some("0.5"));
    assert_eq!(c.lt.as_deref(), Some("1e+10"));
}

#[test]
fn RuleCollector___enum_field_membership_and_const___dropped() {
    let enum_kind = Kind::Enum(
        prost_reflect::DescriptorPool::global()
            .get_enum_by_name("google.protobuf.FieldDescriptorProto.Type")
            .unwrap(),
    );
    let mut collector = RuleCollector::for_kind(&enum_kind);
    collector.visit("in", &Value::List(vec![Value::I32(1), Value::I32(2)]));
    collector.visit("not_in", &Value::List(vec![Value::I32(0)]));
    collector.visit("const", &Value::I32(1));
    collector.visit("defined_only", &Value::Bool(true));

    let c = collector.seal().unwrap();

    assert!(c.in_values.is_empty());
    assert!(c.not_in_values.is_empty());
    assert_eq!(c.const_value, None);
    assert_eq!(c.dropped, vec!["const", "defined_only", "in", "not_in"]);
}

#[test]
fn RuleCollector___integer_field_membership___kept() {
    let mut collector = RuleCollector::for_kind(&Kind::Int32);
    collector.visit("in", &Value::List(vec![Value::I32(1), Value::I32(2)]));

    let c = collector.seal().unwrap();

    assert_eq!(c.in_values, vec!["1", "2"]);
    assert!(c.dropped.is_empty());
}

#[test]
fn RuleCollector___message_bound___is_dropped() {
    let duration = prost_reflect::DynamicMessage::new(
        prost_reflect::DescriptorPool::global()
            .get_message_by_name("google.protobuf.Duration")
            .unwrap(),
    );

    let c = sealed(&[("gt", Value::Message(duration))]).unwrap();

    assert_eq!(c.gt, None);
    assert_eq!(c.dropped, vec!["gt"]);
}

#[test]
fn RuleCollector___const_string___is_literal_with_double_quoted_default() {
    let c = sealed(&[("const", Value::String("x".into()))]).unwrap();

    assert_eq!(
        c.const_value,
        Some(ConstValue::Literal {
            literal: "'x'".into(),
            default: "\"x\"".into()
        })
    );
}

#[test]
fn RuleCollector___const_double___is_float() {
    let c = sealed(&[("const", Value::F64(3.0))]).unwrap();

    assert_eq!(c.const_value, Some(ConstValue::Float("3.0".into())));
}

#[test]
fn RuleCollector___const_bytes___is_dropped() {
    let c = sealed(&[("const", Value::Bytes(vec![1u8].into()))]).unwrap();

    assert_eq!(c.const_value, None);
    assert_eq!(c.dropped, vec!["const"]);
}

#[test]
fn RuleCollector___in_strings___are_single_quoted_in_order() {
    let c = sealed(&[(
        "in",
        Value::List(vec![Value::String("b".into()), Value::String("a".into())]),
    )])
    .unwrap();

    assert_eq!(c.in_values, vec!["'b'", "'a'"]);
}

#[test]
fn RuleCollector___in_floats___are_dropped() {
    let c = sealed(&[("not_in", Value::List(vec![Value::F64(1.0)]))]).unwrap();

    assert!(c.not_in_values.is_empty());
    assert_eq!(c.dropped, vec!["not_in"]);
}

#[test]
fn RuleCollector___examples___skip_bytes() {
    let c = sealed(&[(
        "example",
        Value::List(vec![
            Value::String("x".into()),
            Value::Bytes(vec![0u8].into()),
            Value::EnumNumber(2),
        ]),
    )])
    .unwrap();

    assert_eq!(c.examples, vec!["\"x\"", "2"]);
}

#[test]
fn RuleCollector___format_and_flags___recorded() {
    let c = sealed(&[
        ("email", Value::Bool(true)),
        ("unique", Value::Bool(true)),
        ("finite", Value::Bool(true)),
    ])
    .unwrap();

    assert_eq!(c.format, Some(FormatValidator::Email));
    assert!(c.unique_items);
    assert!(c.require_finite);
}

#[test]
fn RuleCollector___false_flags___record_nothing() {
    assert_eq!(sealed(&[("uuid", Value::Bool(false)), ("unique", Value::Bool(false))]), None);
}

#[test]
fn RuleCollector___dropped_names___are_sorted_and_unique() {
    let mut collector = RuleCollector::new();
    collector.visit("zeta", &Value::Bool(true));
    collector.visit("alpha", &Value::Bool(true));
    collector.drop_rule("cel");
    collector.drop_rule("cel");

    let c = collector.seal().unwrap();

    assert_eq!(c.dropped, vec!["alpha", "cel", "zeta"]);
}

#[test]
fn RuleCollector___bytes_prefix___is_dropped() {
    let c = sealed(&[("prefix", Value::Bytes(vec![0x01u8].into()))]).unwrap();

    assert_eq!(c.pattern, None);
    assert_eq!(c.dropped, vec!["prefix"]);
}

#[test]
fn RuleCollector___prefix_visited_after_pattern___still_dropped() {
    let c = sealed(&[
        ("prefix", Value::String("a".into())),
        ("pattern", Value::String("^[a-z]+$".into())),
    ])
    .unwrap();

    assert_eq!(c.pattern.as_deref(), Some("^[a-z]+$"));
    assert_eq!(c.dropped, vec!["prefix"]);
}

// ============================================================================
// Rendering helpers
// ============================================================================

#[test]
fn pydantic_args___fixed_keyword_order() {
    let c = FieldConstraints {
        gt: Some("0".into()),
        gte: Some("1".into()),
        lt: Some("9".into()),
        lte: Some("8".into()),
        min_length: Some(2),
        max_length: Some(3),
        pattern: Some("^a".into()),
        examples: vec!["\"ab\"".into(), "\"ac\"".into()],
        ..Default::default()
    };

    let args = pydantic_args(&c);

    assert_eq!(
        args,
        vec![
            "ge=1",
            "gt=0",
            "le=8",
            "lt=9",
            "min_length=2",
            "max_length=3",
            "pattern=\"^a\"",
            "examples=[\"ab\", \"ac\"]",
        ]
    );
}

#[test]
fn dropped_comments___one_line_per_rule() {
    let c = FieldConstraints {
        dropped: vec!["alpha".into(), "zeta".into()],
        ..Default::default()
    };

    assert_eq!(
        dropped_comments(&c),
        vec![
            "# buf.validate: alpha (not translated)",
            "# buf.validate: zeta (not translated)",
        ]
    );
}

// ============================================================================
// apply
// ============================================================================

#[test]
fn apply___const_literal___narrows_type_and_default() {
    let mut field = string_field(
        false,
        sealed(&[("const", Value::String("x".into()))]).unwrap(),
    );
    let mut imports = ImportSet::new();

    apply(&mut field, &mut imports);

    assert_eq!(field.ty.render(), "_Literal['x']");
    assert_eq!(field.default, FieldDefault::Value("\"x\"".into()));
    assert!(imports.has_std(StdSymbol::Literal));
}

#[test]
fn apply___const_literal_on_nullable___keeps_none_default() {
    let mut field = string_field(true, sealed(&[("const", Value::String("x".into()))]).unwrap());
    let mut imports = ImportSet::new();

    apply(&mut field, &mut imports);

    assert_eq!(field.ty.render(), "_Literal['x'] | None");
    assert_eq!(field.default, FieldDefault::none());
}

#[test]
fn apply___validators___wrap_in_order_with_nullability_outside() {
    let mut field = string_field(
        true,
        sealed(&[
            ("uuid", Value::Bool(true)),
            ("in", Value::List(vec![Value::String("a".into())])),
        ])
        .unwrap(),
    );
    let mut imports = ImportSet::new();

    apply(&mut field, &mut imports);

    assert_eq!(
        field.ty.render(),
        "_Annotated[str, _AfterValidator(_make_in_validator(frozenset({'a'}))), _AfterValidator(_validate_uuid)] | None"
    );
    assert!(imports.has_std(StdSymbol::Annotated));
    assert!(imports.has_std(StdSymbol::AfterValidator));
    let support: Vec<_> = imports.support_symbols().iter().copied().collect();
    assert_eq!(support, vec![SupportSymbol::MakeInValidator, SupportSymbol::ValidateUuid]);
}

#[test]
fn apply___float_const___adds_validator_and_default() {
    let mut field = string_field(false, sealed(&[("const", Value::F32(1.5))]).unwrap());
    field.ty = TypeRef::new("float", false, NullableStyle::Union);
    let mut imports = ImportSet::new();

    apply(&mut field, &mut imports);

    assert_eq!(
        field.ty.render(),
        "_Annotated[float, _AfterValidator(_make_const_validator(1.5))]"
    );
    assert_eq!(field.default, FieldDefault::Value("1.5".into()));
}

#[test]
fn apply___plain_bounds___leave_type_alone() {
    let mut field = string_field(false, sealed(&[("min_len", Value::U64(1))]).unwrap());
    let mut imports = ImportSet::new();

    apply(&mut field, &mut imports);

    assert_eq!(field.ty.render(), "str");
    assert_eq!(imports, ImportSet::new());
}
