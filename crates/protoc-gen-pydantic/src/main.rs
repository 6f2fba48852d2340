//! protoc-gen-pydantic - protoc plugin emitting Pydantic v2 models
//!
//! Reads a `CodeGeneratorRequest` from stdin and writes a
//! `CodeGeneratorResponse` to stdout. Generation problems are reported in the
//! response; a malformed request exits non-zero.

use anyhow::Context;
use clap::Parser;
use prost::Message;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

mod logging;
mod request;

#[derive(Parser)]
#[command(name = "protoc-gen-pydantic")]
#[command(author, version, about = "Generate Pydantic v2 models from protobuf schemas", long_about = None)]
struct Cli {
    /// Read the encoded request from a file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Write the encoded response to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Parameter string overriding the one carried by the request
    #[arg(short, long)]
    parameter: Option<String>,

    /// Log filter directive (e.g., debug, pydantic_codegen=trace)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref());

    let input = read_input(cli.input.as_deref())?;
    let response = request::handle(&input, cli.parameter.as_deref())?;
    write_output(cli.output.as_deref(), &response.encode_to_vec())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read request from {}", path.display())),
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read request from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> anyhow::Result<()> {
    match path {
        Some(path) => std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write response to {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(bytes)
                .context("Failed to write response to stdout")?;
            stdout.flush().context("Failed to flush stdout")
        }
    }
}
