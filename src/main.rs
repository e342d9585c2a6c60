// src/main.rs
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use huffsqueeze::{HuffError, artifact, logger};

const ARTIFACT_EXT: &str = "hsq";

#[derive(Parser)]
#[command(name = "huffsqueeze", version = "0.1.0")]
#[command(about = "A character-level Huffman text compressor.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a text file into a .hsq artifact
    Compress {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decompress a .hsq artifact back into text
    Decompress {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show header and code statistics of an artifact
    Inspect { input: PathBuf },
}

fn main() -> Result<(), HuffError> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let span = tracing::info_span!("command_execution", command = ?std::env::args().collect::<Vec<_>>());
    let _enter = span.enter();

    match cli.command {
        Commands::Compress { input, output } => {
            let output = output.unwrap_or_else(|| default_compressed_path(&input));
            artifact::compress_file(&input, &output)
        }
        Commands::Decompress { input, output } => {
            let output = match output {
                Some(path) => path,
                None => default_decompressed_path(&input)?,
            };
            artifact::decompress_file(&input, &output)
        }
        Commands::Inspect { input } => artifact::inspect_file(&input),
    }
}

// Append rather than replace the extension, so the original file extension
// survives for decompression.
fn default_compressed_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".");
    name.push(ARTIFACT_EXT);
    PathBuf::from(name)
}

fn default_decompressed_path(input: &Path) -> Result<PathBuf, HuffError> {
    if input.extension().is_some_and(|ext| ext == ARTIFACT_EXT) {
        Ok(input.with_extension(""))
    } else {
        Err(HuffError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("input has no .{ARTIFACT_EXT} extension, pass --output"),
        )))
    }
}
