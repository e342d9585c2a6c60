//! The persisted artifact format: a frequency-table header followed by the
//! MSB-first packed code stream.
//!
//! Layout:
//!
//! ```text
//! symbol_count     u32 big-endian, number of distinct symbols
//! per symbol, in first-occurrence order:
//!     symbol       UTF-8 bytes of one character (1-4 bytes)
//!     frequency    u32 big-endian, >= 1
//! packed_body      MSB-first Huffman codes, zero-padded to a whole byte
//! ```
//!
//! The body carries no end marker: the decoder emits exactly the number of
//! symbols the header promises and ignores trailing pad bits.

use std::io::{self, Cursor, Read, Write};

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::code::CodeTable;
use crate::error::HuffError;
use crate::frequency::FrequencyTable;
use crate::tree::{HuffNode, HuffmanTree};

/// Write the artifact header for `table`.
pub fn write_header<W: Write>(sink: &mut W, table: &FrequencyTable) -> io::Result<()> {
    sink.write_all(&(table.len() as u32).to_be_bytes())?;
    let mut buf = [0u8; 4];
    for (ch, count) in table.iter() {
        sink.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
        sink.write_all(&count.to_be_bytes())?;
    }
    Ok(())
}

/// Read back a header written by [`write_header`], reconstructing the
/// frequency table in its original order.
pub fn read_header<R: Read>(source: &mut R) -> Result<FrequencyTable, HuffError> {
    let records = read_u32(source, "header record count")?;
    let mut table = FrequencyTable::new();
    for _ in 0..records {
        let ch = read_symbol(source)?;
        let count = read_u32(source, "frequency record")?;
        if count == 0 {
            return Err(corrupt(format!("zero frequency for symbol {ch:?}")));
        }
        if !table.insert(ch, count) {
            return Err(corrupt(format!("duplicate symbol {ch:?} in header")));
        }
    }
    Ok(table)
}

/// Compress `text` into a self-contained artifact.
///
/// Empty text produces a header-only artifact that decodes back to the
/// empty string.
pub fn encode(text: &str) -> Result<Vec<u8>, HuffError> {
    let table = FrequencyTable::from_text(text);
    let mut out = Vec::new();
    write_header(&mut out, &table)?;
    if table.is_empty() {
        return Ok(out);
    }

    let tree = HuffmanTree::from_frequencies(&table)?;
    let codes = CodeTable::from_tree(&tree);

    let mut writer = BitWriter::endian(out, BigEndian);
    for ch in text.chars() {
        let code = codes.get(ch).ok_or(HuffError::MissingCode(ch))?;
        for &bit in code {
            writer.write_bit(bit)?;
        }
    }
    writer.byte_align()?;
    Ok(writer.into_writer())
}

/// Decompress an artifact produced by [`encode`].
pub fn decode(artifact: &[u8]) -> Result<String, HuffError> {
    let mut cursor = Cursor::new(artifact);
    let table = read_header(&mut cursor)?;
    if table.is_empty() {
        return Ok(String::new());
    }
    let tree = HuffmanTree::from_frequencies(&table)?;
    let total = table.total();
    unpack_body(BitReader::endian(cursor, BigEndian), &tree, total)
}

/// Walk the tree once per output symbol, descending left on 0 and right on
/// 1. The symbol count from the header terminates the loop, never the
/// buffer length, so pad bits in the final byte are never misread as codes.
fn unpack_body<R: Read>(
    mut reader: BitReader<R, BigEndian>,
    tree: &HuffmanTree,
    total: u64,
) -> Result<String, HuffError> {
    let mut out = String::with_capacity(total as usize);

    // Degenerate one-symbol tree: every code is the single bit 0.
    if let HuffNode::Leaf { symbol, .. } = &tree.root {
        for _ in 0..total {
            read_body_bit(&mut reader)?;
            out.push(*symbol);
        }
        return Ok(out);
    }

    for _ in 0..total {
        let mut node = &tree.root;
        loop {
            match node {
                HuffNode::Leaf { symbol, .. } => {
                    out.push(*symbol);
                    break;
                }
                HuffNode::Internal { left, right, .. } => {
                    node = if read_body_bit(&mut reader)? {
                        right
                    } else {
                        left
                    };
                }
            }
        }
    }
    Ok(out)
}

fn read_body_bit<R: Read>(reader: &mut BitReader<R, BigEndian>) -> Result<bool, HuffError> {
    reader.read_bit().map_err(|e| truncated(e, "packed body"))
}

fn read_u32<R: Read>(source: &mut R, what: &str) -> Result<u32, HuffError> {
    let mut buf = [0u8; 4];
    source
        .read_exact(&mut buf)
        .map_err(|e| truncated(e, what))?;
    Ok(u32::from_be_bytes(buf))
}

fn read_symbol<R: Read>(source: &mut R) -> Result<char, HuffError> {
    let mut buf = [0u8; 4];
    source
        .read_exact(&mut buf[..1])
        .map_err(|e| truncated(e, "symbol record"))?;
    let len = match buf[0] {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        lead => {
            return Err(corrupt(format!(
                "invalid UTF-8 lead byte {lead:#04x} in header"
            )));
        }
    };
    source
        .read_exact(&mut buf[1..len])
        .map_err(|e| truncated(e, "symbol record"))?;
    let symbol = std::str::from_utf8(&buf[..len])
        .map_err(|_| corrupt("malformed UTF-8 symbol in header".to_string()))?;
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(corrupt("symbol record is not a single character".to_string())),
    }
}

fn corrupt(reason: String) -> HuffError {
    HuffError::CorruptArtifact { reason }
}

fn truncated(err: io::Error, what: &str) -> HuffError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        corrupt(format!("unexpected end of data in {what}"))
    } else {
        HuffError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_len(table: &FrequencyTable) -> usize {
        let mut buf = Vec::new();
        write_header(&mut buf, table).unwrap();
        buf.len()
    }

    #[test]
    fn test_header_round_trip() {
        let table = FrequencyTable::from_text("abracadabra");
        let mut buf = Vec::new();
        write_header(&mut buf, &table).unwrap();
        let restored = read_header(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn test_header_layout() {
        let table = FrequencyTable::from_text("aab");
        let mut buf = Vec::new();
        write_header(&mut buf, &table).unwrap();
        assert_eq!(
            buf,
            vec![
                0, 0, 0, 2, // two records
                b'a', 0, 0, 0, 2, // 'a' x2
                b'b', 0, 0, 0, 1, // 'b' x1
            ]
        );
    }

    #[test]
    fn test_header_multibyte_symbols() {
        let table = FrequencyTable::from_text("é€");
        let mut buf = Vec::new();
        write_header(&mut buf, &table).unwrap();
        // 4-byte count + (2 utf-8 bytes + 4) + (3 utf-8 bytes + 4)
        assert_eq!(buf.len(), 4 + 6 + 7);
        let restored = read_header(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn test_round_trip_simple() {
        let text = "abracadabra";
        assert_eq!(decode(&encode(text).unwrap()).unwrap(), text);
    }

    #[test]
    fn test_round_trip_empty() {
        let artifact = encode("").unwrap();
        // Header-only artifact: a zero record count and nothing else.
        assert_eq!(artifact, vec![0, 0, 0, 0]);
        assert_eq!(decode(&artifact).unwrap(), "");
    }

    #[test]
    fn test_round_trip_single_distinct_symbol() {
        let artifact = encode("aaaa").unwrap();
        // 4 one-bit codes pack into a single zero byte.
        let table = FrequencyTable::from_text("aaaa");
        assert_eq!(artifact.len(), header_len(&table) + 1);
        assert_eq!(decode(&artifact).unwrap(), "aaaa");
    }

    #[test]
    fn test_round_trip_unicode() {
        let text = "naïve café — 10€ für die Küche";
        assert_eq!(decode(&encode(text).unwrap()).unwrap(), text);
    }

    #[test]
    fn test_abracadabra_packed_bytes() {
        // Codes: a=0, b=110, r=111, c=100, d=101. The 23-bit stream
        // 0 110 111 0 100 0 101 0 110 111 0 packs (zero-padded) into
        // 01101110 10001010 11011100.
        let artifact = encode("abracadabra").unwrap();
        let table = FrequencyTable::from_text("abracadabra");
        let body = &artifact[header_len(&table)..];
        assert_eq!(body, &[0x6e, 0x8a, 0xdc]);
    }

    #[test]
    fn test_body_is_padded_to_whole_bytes() {
        for text in ["abracadabra", "abab", "x", "to be or not to be"] {
            let table = FrequencyTable::from_text(text);
            let tree = HuffmanTree::from_frequencies(&table).unwrap();
            let codes = CodeTable::from_tree(&tree);
            let artifact = encode(text).unwrap();
            let body_len = artifact.len() - header_len(&table);
            assert_eq!(body_len as u64, codes.encoded_bits(&table).div_ceil(8));
        }
    }

    #[test]
    fn test_truncated_body_is_detected() {
        let artifact = encode("abracadabra").unwrap();
        let err = decode(&artifact[..artifact.len() - 1]).unwrap_err();
        assert!(matches!(err, HuffError::CorruptArtifact { .. }), "{err}");
    }

    #[test]
    fn test_truncated_header_is_detected() {
        let artifact = encode("abracadabra").unwrap();
        for cut in [0, 3, 4, 7, 11] {
            let err = decode(&artifact[..cut]).unwrap_err();
            assert!(matches!(err, HuffError::CorruptArtifact { .. }), "{err}");
        }
    }

    #[test]
    fn test_invalid_lead_byte_is_detected() {
        // One record whose symbol byte can never start a UTF-8 sequence.
        let data = vec![0, 0, 0, 1, 0xff, 0, 0, 0, 1];
        let err = read_header(&mut Cursor::new(&data)).unwrap_err();
        assert!(matches!(err, HuffError::CorruptArtifact { .. }), "{err}");
    }

    #[test]
    fn test_zero_frequency_record_is_detected() {
        let data = vec![0, 0, 0, 1, b'a', 0, 0, 0, 0];
        let err = read_header(&mut Cursor::new(&data)).unwrap_err();
        assert!(matches!(err, HuffError::CorruptArtifact { .. }), "{err}");
    }

    #[test]
    fn test_duplicate_symbol_record_is_detected() {
        let data = vec![
            0, 0, 0, 2, //
            b'a', 0, 0, 0, 1, //
            b'a', 0, 0, 0, 2,
        ];
        let err = read_header(&mut Cursor::new(&data)).unwrap_err();
        assert!(matches!(err, HuffError::CorruptArtifact { .. }), "{err}");
    }

    #[test]
    fn test_round_trip_longer_text() {
        let text = "it was the best of times, it was the worst of times, \
                    it was the age of wisdom, it was the age of foolishness\n";
        assert_eq!(decode(&encode(text).unwrap()).unwrap(), text);
    }
}
