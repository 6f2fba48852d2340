#![allow(non_snake_case)]

use super::*;

#[test]
fn format_import_block___short___stays_on_one_line() {
    let line = format_import_block("from ._proto_types import ", &["ProtoInt64", "ProtoUInt64"]);

    assert_eq!(line, "from ._proto_types import ProtoInt64, ProtoUInt64");
}

#[test]
fn format_import_block___long___wraps_one_symbol_per_line() {
    let symbols = [
        "AfterValidator as _AfterValidator",
        "BaseModel as _BaseModel",
        "ConfigDict as _ConfigDict",
        "Field as _Field",
    ];

    let block = format_import_block("from pydantic import ", &symbols);

    assert_eq!(
        block,
        "from pydantic import (\n    AfterValidator as _AfterValidator,\n    BaseModel as _BaseModel,\n    ConfigDict as _ConfigDict,\n    Field as _Field,\n)"
    );
}

#[test]
fn format_import_block___exactly_limit___stays_on_one_line() {
    let prefix = "from x import ";
    let symbol = "a".repeat(MAX_LINE_LENGTH - prefix.len());

    let line = format_import_block(prefix, &[symbol.as_str()]);

    assert_eq!(line.len(), MAX_LINE_LENGTH);
    assert!(!line.contains('('));
}

#[test]
fn ImportSet___empty___renders_nothing() {
    let imports = ImportSet::new();

    assert!(imports.render_groups().is_empty());
}

#[test]
fn ImportSet___typing_symbols___render_in_fixed_order() {
    let mut imports = ImportSet::new();
    imports.add_std(StdSymbol::Optional);
    imports.add_std(StdSymbol::Any);
    imports.add_std(StdSymbol::Annotated);

    let groups = imports.render_groups();

    assert_eq!(
        groups,
        vec!["from typing import Annotated as _Annotated, Any as _Any, Optional as _Optional"]
    );
}

#[test]
fn ImportSet___pydantic_without_base_model___is_omitted() {
    let mut imports = ImportSet::new();
    imports.add_std(StdSymbol::AfterValidator);

    assert!(imports.render_groups().is_empty());
}

#[test]
fn ImportSet___enum_and_dataclass___share_stdlib_group() {
    let mut imports = ImportSet::new();
    imports.add_std(StdSymbol::Dataclass);
    imports.add_std(StdSymbol::Enum);

    let groups = imports.render_groups();

    assert_eq!(
        groups,
        vec!["from enum import Enum as _Enum\nfrom dataclasses import dataclass as _dataclass"]
    );
}

#[test]
fn ImportSet___support_symbols___render_sorted_and_deduplicated() {
    let mut imports = ImportSet::new();
    imports.add_support(SupportSymbol::RequireUnique);
    imports.add_support(SupportSymbol::ProtoUInt64);
    imports.add_support(SupportSymbol::ProtoInt64);
    imports.add_support(SupportSymbol::ProtoInt64);

    let groups = imports.render_groups();

    assert_eq!(
        groups,
        vec!["from ._proto_types import ProtoInt64, ProtoUInt64, _require_unique"]
    );
}

#[test]
fn ImportSet___cross_file___groups_symbols_by_module() {
    let mut imports = ImportSet::new();
    imports.add_relative(".common_pydantic", "Money");
    imports.add_relative(".common_pydantic", "Address");
    imports.add_absolute("shared.v1.types_pydantic", "Id");

    let groups = imports.render_groups();

    assert_eq!(
        groups,
        vec![
            "from .common_pydantic import Address, Money",
            "from shared.v1.types_pydantic import Id",
        ]
    );
}
