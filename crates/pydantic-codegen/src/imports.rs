//! Per-file import bookkeeping and rendering.

use crate::support::SupportSymbol;
use std::collections::{BTreeMap, BTreeSet};

/// Maximum length of a single-line import before it is wrapped.
pub const MAX_LINE_LENGTH: usize = 88;

/// Standard-library and pydantic symbols a generated module may need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StdSymbol {
    Enum,
    Dataclass,
    Annotated,
    Any,
    Literal,
    Optional,
    AfterValidator,
    BaseModel,
}

/// Imports accumulated while walking one schema file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    std: BTreeSet<StdSymbol>,
    support: BTreeSet<SupportSymbol>,
    relative: BTreeMap<String, BTreeSet<String>>,
    absolute: BTreeMap<String, BTreeSet<String>>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_std(&mut self, symbol: StdSymbol) {
        self.std.insert(symbol);
    }

    pub fn has_std(&self, symbol: StdSymbol) -> bool {
        self.std.contains(&symbol)
    }

    pub fn add_support(&mut self, symbol: SupportSymbol) {
        self.support.insert(symbol);
    }

    /// Runtime-support symbols referenced by this file, sorted.
    pub fn support_symbols(&self) -> &BTreeSet<SupportSymbol> {
        &self.support
    }

    /// Record a same-package import; `module` carries its leading dot.
    pub fn add_relative(&mut self, module: impl Into<String>, symbol: impl Into<String>) {
        self.relative
            .entry(module.into())
            .or_default()
            .insert(symbol.into());
    }

    /// Record `from {module} import {symbol}`.
    pub fn add_absolute(&mut self, module: impl Into<String>, symbol: impl Into<String>) {
        self.absolute
            .entry(module.into())
            .or_default()
            .insert(symbol.into());
    }

    /// Render every import group, in output order.
    ///
    /// Groups are: standard library, pydantic, runtime support, relative
    /// cross-file, absolute cross-file. Empty groups are omitted; the caller
    /// separates groups with a blank line.
    pub fn render_groups(&self) -> Vec<String> {
        let mut groups = Vec::new();

        let mut stdlib = Vec::new();
        if self.has_std(StdSymbol::Enum) {
            stdlib.push("from enum import Enum as _Enum".to_string());
        }
        if self.has_std(StdSymbol::Dataclass) {
            stdlib.push("from dataclasses import dataclass as _dataclass".to_string());
        }
        if let Some(line) = self.typing_line() {
            stdlib.push(line);
        }
        if !stdlib.is_empty() {
            groups.push(stdlib.join("\n"));
        }

        if let Some(line) = self.pydantic_line() {
            groups.push(line);
        }

        if !self.support.is_empty() {
            let names: Vec<&str> = self.support.iter().map(|s| s.name()).collect();
            groups.push(format_import_block("from ._proto_types import ", &names));
        }

        for modules in [&self.relative, &self.absolute] {
            if modules.is_empty() {
                continue;
            }
            let lines: Vec<String> = modules
                .iter()
                .map(|(module, symbols)| {
                    let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();
                    format_import_block(&format!("from {module} import "), &symbols)
                })
                .collect();
            groups.push(lines.join("\n"));
        }

        groups
    }

    fn typing_line(&self) -> Option<String> {
        let symbols: Vec<&str> = [
            (StdSymbol::Annotated, "Annotated as _Annotated"),
            (StdSymbol::Any, "Any as _Any"),
            (StdSymbol::Literal, "Literal as _Literal"),
            (StdSymbol::Optional, "Optional as _Optional"),
        ]
        .into_iter()
        .filter(|(symbol, _)| self.has_std(*symbol))
        .map(|(_, text)| text)
        .collect();

        if symbols.is_empty() {
            return None;
        }
        Some(format_import_block("from typing import ", &symbols))
    }

    fn pydantic_line(&self) -> Option<String> {
        if !self.has_std(StdSymbol::BaseModel) {
            return None;
        }
        let mut symbols = Vec::new();
        if self.has_std(StdSymbol::AfterValidator) {
            symbols.push("AfterValidator as _AfterValidator");
        }
        symbols.extend([
            "BaseModel as _BaseModel",
            "ConfigDict as _ConfigDict",
            "Field as _Field",
        ]);
        Some(format_import_block("from pydantic import ", &symbols))
    }
}

/// Format an import statement, wrapping into the parenthesized one-symbol-
/// per-line form when the single line would exceed [`MAX_LINE_LENGTH`].
///
/// # Examples
///
/// ```
/// use pydantic_codegen::imports::format_import_block;
///
/// assert_eq!(
///     format_import_block("from typing import ", &["Any as _Any"]),
///     "from typing import Any as _Any"
/// );
/// ```
pub fn format_import_block(prefix: &str, symbols: &[&str]) -> String {
    let one_line = format!("{prefix}{}", symbols.join(", "));
    if one_line.len() <= MAX_LINE_LENGTH {
        return one_line;
    }

    let mut block = format!("{prefix}(\n");
    for symbol in symbols {
        block.push_str(&format!("    {symbol},\n"));
    }
    block.push(')');
    block
}

#[cfg(test)]
#[path = "imports/imports_tests.rs"]
mod imports_tests;
