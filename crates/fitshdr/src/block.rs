//! Conversion between a line sequence and 2880-byte FITS header blocks.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::str;

use crate::codec::{clip, keyword_of};
use crate::error::{Error, Result};

/// FITS block size in bytes.
pub const BLOCK_SIZE: usize = 2880;

/// Header line (card) size in bytes.
pub const CARD_SIZE: usize = 80;

/// Number of cards that fit in a single block.
pub const CARDS_PER_BLOCK: usize = BLOCK_SIZE / CARD_SIZE;

/// Padding byte used for header blocks (ASCII space).
pub const HEADER_PAD_BYTE: u8 = 0x20;

/// Returns the number of FITS blocks required to hold `num_bytes` bytes.
pub const fn blocks_needed(num_bytes: usize) -> usize {
    num_bytes.div_ceil(BLOCK_SIZE)
}

/// Returns the total byte length (in whole blocks) required to hold `num_bytes`.
pub const fn padded_byte_len(num_bytes: usize) -> usize {
    blocks_needed(num_bytes) * BLOCK_SIZE
}

fn is_end_line(line: &str) -> bool {
    keyword_of(line) == "END"
}

/// Serialize lines into complete header blocks.
///
/// Each line becomes one 80-byte record, blank padded or truncated on a
/// character boundary. Lines after the first END are not written, since a
/// reader stops there. An END record is appended when the lines contain
/// none, and the final block is padded with blank records.
pub fn serialize_lines(lines: &[String]) -> Vec<u8> {
    let (lines, needs_end) = match lines.iter().position(|l| is_end_line(l)) {
        Some(end) => (&lines[..=end], false),
        None => (lines, true),
    };
    let total_cards = lines.len() + usize::from(needs_end);
    let mut buf = vec![HEADER_PAD_BYTE; padded_byte_len(total_cards * CARD_SIZE)];

    for (i, line) in lines.iter().enumerate() {
        let bytes = clip(line, CARD_SIZE).as_bytes();
        let offset = i * CARD_SIZE;
        buf[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    if needs_end {
        let offset = lines.len() * CARD_SIZE;
        buf[offset..offset + 3].copy_from_slice(b"END");
    }

    buf
}

/// Read 80-byte records from consecutive blocks up to and including END.
///
/// Records are kept at full width, so lines produced by
/// [`serialize_lines`] from 80-character input come back unchanged. Only
/// complete blocks are scanned.
pub fn parse_header_blocks(data: &[u8]) -> Result<Vec<String>> {
    if data.len() < BLOCK_SIZE {
        return Err(Error::UnexpectedEof);
    }

    let mut lines = Vec::new();
    let num_cards = (data.len() / BLOCK_SIZE) * CARDS_PER_BLOCK;

    for record in data.chunks_exact(CARD_SIZE).take(num_cards) {
        let line = str::from_utf8(record).map_err(|_| Error::Generic)?;
        let is_end = is_end_line(line);
        lines.push(String::from(line));
        if is_end {
            return Ok(lines);
        }
    }

    Err(Error::UnexpectedEof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::format_int_line;

    #[test]
    fn blocks_needed_edges() {
        assert_eq!(blocks_needed(0), 0);
        assert_eq!(blocks_needed(1), 1);
        assert_eq!(blocks_needed(BLOCK_SIZE), 1);
        assert_eq!(blocks_needed(BLOCK_SIZE + 1), 2);
        assert_eq!(padded_byte_len(81), BLOCK_SIZE);
    }

    #[test]
    fn serialize_appends_end() {
        let lines = vec![format_int_line("NAXIS", 0, None)];
        let buf = serialize_lines(&lines);
        assert_eq!(buf.len(), BLOCK_SIZE);
        assert_eq!(&buf[CARD_SIZE..CARD_SIZE + 8], b"END     ");
        assert!(buf[2 * CARD_SIZE..].iter().all(|&b| b == HEADER_PAD_BYTE));
    }

    #[test]
    fn serialize_keeps_existing_end() {
        let lines = vec![format_int_line("NAXIS", 0, None), String::from("END")];
        let buf = serialize_lines(&lines);
        let parsed = parse_header_blocks(&buf).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn serialize_stops_at_first_end() {
        let lines = vec![
            format_int_line("NAXIS", 0, None),
            String::from("END"),
            format_int_line("LOST", 1, None),
        ];
        let buf = serialize_lines(&lines);
        let parsed = parse_header_blocks(&buf).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(buf[2 * CARD_SIZE..].iter().all(|&b| b == HEADER_PAD_BYTE));
    }

    #[test]
    fn long_line_truncated_on_char_boundary() {
        let mut line = "HISTORY ".repeat(10);
        line.truncate(79);
        line.push('é');
        let parsed = parse_header_blocks(&serialize_lines(&[line])).unwrap();
        assert_eq!(parsed[0].len(), CARD_SIZE);
        assert!(parsed[0].ends_with(' '));
    }

    #[test]
    fn serialize_empty_is_one_block() {
        let buf = serialize_lines(&[]);
        assert_eq!(buf.len(), BLOCK_SIZE);
        assert_eq!(&buf[..3], b"END");
    }

    #[test]
    fn serialize_exactly_one_block() {
        let lines: Vec<String> = (0..CARDS_PER_BLOCK - 1)
            .map(|i| format_int_line("KEY", i as i64, None))
            .collect();
        assert_eq!(serialize_lines(&lines).len(), BLOCK_SIZE);
    }

    #[test]
    fn serialize_spills_to_two_blocks() {
        let lines: Vec<String> = (0..CARDS_PER_BLOCK)
            .map(|i| format_int_line("KEY", i as i64, None))
            .collect();
        let buf = serialize_lines(&lines);
        assert_eq!(buf.len(), 2 * BLOCK_SIZE);
        let parsed = parse_header_blocks(&buf).unwrap();
        assert_eq!(parsed.len(), CARDS_PER_BLOCK + 1);
        assert_eq!(&parsed[..CARDS_PER_BLOCK], &lines[..]);
    }

    #[test]
    fn short_lines_are_padded() {
        let lines = vec![String::from("HISTORY short")];
        let parsed = parse_header_blocks(&serialize_lines(&lines)).unwrap();
        assert_eq!(parsed[0].len(), CARD_SIZE);
        assert_eq!(parsed[0].trim_end(), "HISTORY short");
    }

    #[test]
    fn parse_without_end_fails() {
        let data = vec![HEADER_PAD_BYTE; BLOCK_SIZE];
        assert!(matches!(
            parse_header_blocks(&data),
            Err(Error::UnexpectedEof)
        ));
    }

    #[test]
    fn parse_too_small_fails() {
        assert!(matches!(
            parse_header_blocks(&[b' '; 100]),
            Err(Error::UnexpectedEof)
        ));
    }

    #[test]
    fn parse_ignores_trailing_partial_block() {
        let mut data = serialize_lines(&[]);
        data.extend_from_slice(&[b' '; 10]);
        assert_eq!(parse_header_blocks(&data).unwrap().len(), 1);
    }
}
