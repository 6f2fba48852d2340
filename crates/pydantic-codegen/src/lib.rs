//! pydantic-codegen - Protobuf descriptors to Pydantic v2 models
//!
//! This crate is the translation engine behind `protoc-gen-pydantic`:
//! - [`generate`] walks requested files of a [`prost_reflect::DescriptorPool`]
//!   and returns the Python modules to write
//! - [`GeneratorConfig`] holds the plugin options
//! - [`GeneratorError`] for error handling
//!
//! `buf.validate` field rules and custom enum-value options are read from the
//! pool's extensions, so the pool must be decoded from raw descriptor bytes
//! for them to survive.

mod config;
mod error;
mod generator;
mod walker;

pub mod comments;
pub mod constraints;
pub mod emit;
pub mod imports;
pub mod ir;
pub mod literal;
pub mod naming;
pub mod options;
pub mod support;
pub mod types;

pub use config::{GeneratorConfig, PARAMETER_KEYS};
pub use error::{GeneratorError, GeneratorResult};
pub use generator::{GeneratedFile, PACKAGE_INIT, generate};
pub use walker::walk_file;
