//! Plugin request decoding and response assembly.
//!
//! `prost_types::compiler::CodeGeneratorRequest` decodes `proto_file` into
//! `FileDescriptorProto` values, which drops unknown option extensions such
//! as `buf.validate.field`. The request is therefore decoded through a raw
//! mirror that keeps each file as bytes, and the pool is built from those.

use anyhow::{Context, Result};
use prost::Message;
use prost_reflect::DescriptorPool;
use prost_types::compiler::CodeGeneratorResponse;
use prost_types::compiler::code_generator_response::{Feature, File};
use pydantic_codegen::{GeneratorConfig, GeneratorResult, generate};

/// `google.protobuf.compiler.CodeGeneratorRequest` with files kept encoded.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawCodeGeneratorRequest {
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: Vec<String>,
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,
    #[prost(bytes = "vec", repeated, tag = "15")]
    pub proto_file: Vec<Vec<u8>>,
}

/// `google.protobuf.FileDescriptorSet` with files kept encoded.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawFileDescriptorSet {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub file: Vec<Vec<u8>>,
}

/// Build a descriptor pool from encoded `FileDescriptorProto`s.
pub fn build_descriptor_pool(files: &[Vec<u8>]) -> Result<DescriptorPool> {
    let set = RawFileDescriptorSet {
        file: files.to_vec(),
    };
    DescriptorPool::decode(set.encode_to_vec().as_slice())
        .context("Failed to build descriptor pool from request")
}

/// Decode a request, run generation and assemble the response.
///
/// Generation failures are reported in the response's `error` field; only a
/// malformed request is returned as `Err`.
pub fn handle(input: &[u8], parameter_override: Option<&str>) -> Result<CodeGeneratorResponse> {
    let request =
        RawCodeGeneratorRequest::decode(input).context("Failed to decode CodeGeneratorRequest")?;
    tracing::debug!(
        files = request.file_to_generate.len(),
        descriptors = request.proto_file.len(),
        "decoded request"
    );
    let pool = build_descriptor_pool(&request.proto_file)?;

    let parameter = parameter_override
        .or(request.parameter.as_deref())
        .unwrap_or_default();

    let mut response = CodeGeneratorResponse {
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    };
    match run(&pool, &request.file_to_generate, parameter) {
        Ok(files) => response.file = files,
        Err(err) => {
            tracing::error!(error = %err, "generation failed");
            response.error = Some(err.to_string());
        }
    }
    Ok(response)
}

fn run(pool: &DescriptorPool, files: &[String], parameter: &str) -> GeneratorResult<Vec<File>> {
    let config = GeneratorConfig::from_parameter(parameter)?;
    let generated = generate(pool, files, &config)?;
    Ok(generated
        .into_iter()
        .map(|f| File {
            name: Some(f.name),
            content: Some(f.content),
            ..Default::default()
        })
        .collect())
}
