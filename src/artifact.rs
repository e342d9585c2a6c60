//! File-level operations around the codec: scoped reads, atomic writes and
//! a read-only artifact report.

use std::fs;
use std::io::{self, Cursor};
use std::path::Path;

use tracing::debug;

use crate::code::CodeTable;
use crate::codec;
use crate::error::HuffError;
use crate::tree::HuffmanTree;

const TEMP_EXT: &str = "tmp"; // For atomic writes

/// Compress the text file at `input` into an artifact at `output`.
pub fn compress_file(input: &Path, output: &Path) -> Result<(), HuffError> {
    let text = read_text(input)?;
    debug!(chars = text.chars().count(), "read input text");

    let artifact = codec::encode(&text)?;
    write_atomic(output, &artifact)?;

    println!(
        "Compressed {} ({}) -> {} ({}, {:.1}% of original)",
        input.display(),
        format_bytes(text.len()),
        output.display(),
        format_bytes(artifact.len()),
        ratio_percent(artifact.len(), text.len()),
    );
    Ok(())
}

/// Decompress the artifact at `input` back into a text file at `output`.
pub fn decompress_file(input: &Path, output: &Path) -> Result<(), HuffError> {
    let data = fs::read(input)?;
    debug!(bytes = data.len(), "read artifact");

    let text = codec::decode(&data)?;
    write_atomic(output, text.as_bytes())?;

    println!(
        "Decompressed {} ({}) -> {} ({})",
        input.display(),
        format_bytes(data.len()),
        output.display(),
        format_bytes(text.len()),
    );
    Ok(())
}

/// Print header and code statistics for the artifact at `input` without
/// producing any output file.
pub fn inspect_file(input: &Path) -> Result<(), HuffError> {
    let data = fs::read(input)?;
    let mut cursor = Cursor::new(data.as_slice());
    let table = codec::read_header(&mut cursor)?;
    let header_len = cursor.position() as usize;
    let body_len = data.len() - header_len;

    println!("Artifact: {}", input.display());
    println!("  distinct symbols : {}", table.len());
    println!("  total symbols    : {}", table.total());
    println!("  header           : {}", format_bytes(header_len));
    println!("  body             : {}", format_bytes(body_len));

    if table.is_empty() {
        return Ok(());
    }

    let tree = HuffmanTree::from_frequencies(&table)?;
    let codes = CodeTable::from_tree(&tree);
    let bits = codes.encoded_bits(&table);
    let expected_body = bits.div_ceil(8);
    if body_len as u64 != expected_body {
        return Err(HuffError::CorruptArtifact {
            reason: format!("body is {body_len} bytes, expected {expected_body}"),
        });
    }

    println!("  entropy          : {:.3} bits/symbol", table.entropy());
    println!(
        "  mean code length : {:.3} bits/symbol",
        bits as f64 / table.total() as f64
    );
    Ok(())
}

fn read_text(path: &Path) -> Result<String, HuffError> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|e| HuffError::Encoding {
        position: e.utf8_error().valid_up_to(),
    })
}

// Write through a temp file and rename, so a failed write never leaves a
// half-written artifact at the destination.
fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let temp_path = path.with_extension(TEMP_EXT);
    fs::write(&temp_path, data)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Format bytes into human-readable string (e.g. 1024 -> "1.00 KB")
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", size, UNITS[unit])
}

fn ratio_percent(compressed: usize, original: usize) -> f64 {
    if original == 0 {
        return 100.0;
    }
    compressed as f64 / original as f64 * 100.0
}
