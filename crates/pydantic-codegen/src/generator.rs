//! Top-level generation over a descriptor pool.

use crate::config::GeneratorConfig;
use crate::emit::render;
use crate::error::{GeneratorError, GeneratorResult};
use crate::options::OptionRegistry;
use crate::support::{SupportSymbol, build_support_module};
use crate::types::{module_stem, parent_dir};
use crate::walker::walk_file;
use prost_reflect::DescriptorPool;
use std::collections::{BTreeMap, BTreeSet};

/// Content of the `__init__.py` written to every output directory.
pub const PACKAGE_INIT: &str = "# Generated by protoc-gen-pydantic.\n";

/// One output file, path relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub content: String,
}

/// Generate Python modules for `files_to_generate`.
///
/// Output order: one `<stem>_pydantic.py` per requested file in request
/// order, then `__init__.py` per directory, then `_proto_types.py` for each
/// directory that references runtime-support symbols. Directories are
/// visited in sorted order.
pub fn generate(
    pool: &DescriptorPool,
    files_to_generate: &[String],
    config: &GeneratorConfig,
) -> GeneratorResult<Vec<GeneratedFile>> {
    let registry = OptionRegistry::from_pool(pool);

    let mut outputs = Vec::with_capacity(files_to_generate.len());
    let mut dirs = BTreeSet::new();
    let mut support: BTreeMap<String, BTreeSet<SupportSymbol>> = BTreeMap::new();

    for path in files_to_generate {
        let file = pool
            .get_file_by_name(path)
            .ok_or_else(|| GeneratorError::FileNotFound(path.clone()))?;
        let model = walk_file(&file, config, &registry).map_err(|e| e.in_file(path))?;

        let dir = parent_dir(path).to_string();
        outputs.push(GeneratedFile {
            name: output_path(&dir, &format!("{}.py", module_stem(path))),
            content: render(&model, config),
        });

        let symbols = model.imports.support_symbols();
        if !symbols.is_empty() {
            support
                .entry(dir.clone())
                .or_default()
                .extend(symbols.iter().copied());
        }
        dirs.insert(dir);
        tracing::debug!(file = %path, "generated module");
    }

    for dir in &dirs {
        outputs.push(GeneratedFile {
            name: output_path(dir, "__init__.py"),
            content: PACKAGE_INIT.to_string(),
        });
    }
    for (dir, symbols) in &support {
        outputs.push(GeneratedFile {
            name: output_path(dir, "_proto_types.py"),
            content: build_support_module(symbols),
        });
    }

    tracing::info!(
        requested = files_to_generate.len(),
        outputs = outputs.len(),
        "generation complete"
    );
    Ok(outputs)
}

fn output_path(dir: &str, file_name: &str) -> String {
    if dir.is_empty() {
        file_name.to_string()
    } else {
        format!("{dir}/{file_name}")
    }
}
