//! Formatting typed values into fixed-format header lines and reading them
//! back out of a line array.

use alloc::string::String;
use alloc::vec::Vec;
use core::str;

use crate::block::CARD_SIZE;
use crate::value::{format_value, parse_value, value_end, Value, VALUE_FIELD_SIZE};

/// Width of the keyword field at the start of every line.
pub const KEYWORD_SIZE: usize = 8;

/// The `= ` value indicator that follows the keyword field.
const VALUE_INDICATOR: &[u8; 2] = b"= ";

/// A header line split into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Keyword with trailing blanks removed.
    pub keyword: String,
    /// The parsed value, if the line carries a value indicator and a
    /// recognisable value.
    pub value: Option<Value>,
    pub comment: Option<String>,
}

impl Card {
    /// Returns `true` if this card is the END record.
    pub fn is_end(&self) -> bool {
        self.keyword == "END"
    }
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a
/// character.
pub fn clip(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Return the keyword field of `line` with trailing blanks removed.
pub fn keyword_of(line: &str) -> &str {
    clip(line, KEYWORD_SIZE).trim_end()
}

/// Clip a requested keyword to the keyword field, the same way
/// formatting does.
fn normalize_keyword(keyword: &str) -> &str {
    clip(keyword, KEYWORD_SIZE).trim_end()
}

/// Whole-keyword comparison against the keyword field of `line`.
pub fn matches_keyword(line: &str, keyword: &str) -> bool {
    keyword_of(line) == normalize_keyword(keyword)
}

/// Split a raw line into keyword, value and comment.
pub fn parse_line(line: &str) -> Card {
    let bytes = line.as_bytes();
    let keyword = String::from(keyword_of(line));

    let has_value = bytes.len() > KEYWORD_SIZE + 1
        && &bytes[KEYWORD_SIZE..KEYWORD_SIZE + 2] == VALUE_INDICATOR;
    if !has_value {
        // Commentary lines: everything after the keyword is free text.
        let text = str::from_utf8(&bytes[bytes.len().min(KEYWORD_SIZE)..])
            .unwrap_or("")
            .trim_end();
        return Card {
            keyword,
            value: None,
            comment: (!text.is_empty()).then(|| String::from(text)),
        };
    }

    let end = bytes.len().min(CARD_SIZE);
    match parse_value(&bytes[KEYWORD_SIZE + 2..end]) {
        Some((value, comment)) => Card {
            keyword,
            value: Some(value),
            comment: comment.map(String::from),
        },
        None => Card {
            keyword,
            value: None,
            comment: None,
        },
    }
}

// ── Formatting ──

/// Build one 80-character line from a keyword, a value and a comment.
///
/// Keywords longer than eight bytes are clipped. An empty comment
/// produces no ` / ` separator. A comment that does not fit is truncated at
/// column 80. Clipping never splits a character, so the result is always
/// exactly 80 bytes.
pub fn format_line(keyword: &str, value: &Value, comment: &str) -> String {
    let mut buf = [b' '; CARD_SIZE];

    let kw = clip(keyword, KEYWORD_SIZE).as_bytes();
    buf[..kw.len()].copy_from_slice(kw);
    buf[KEYWORD_SIZE..KEYWORD_SIZE + 2].copy_from_slice(VALUE_INDICATOR);

    let mut field = format_value(value);
    if !comment.is_empty() {
        insert_comment(&mut field, comment);
    }
    buf[KEYWORD_SIZE + 2..].copy_from_slice(&field);

    // Every write above ends on a character boundary, so this is lossless.
    String::from_utf8_lossy(&buf).into_owned()
}

fn insert_comment(field: &mut [u8; VALUE_FIELD_SIZE], comment: &str) {
    let sep_start = value_end(field) + 1;
    if sep_start + 3 >= VALUE_FIELD_SIZE {
        return;
    }

    field[sep_start] = b'/';
    field[sep_start + 1] = b' ';

    let comment_start = sep_start + 2;
    let bytes = clip(comment, VALUE_FIELD_SIZE - comment_start).as_bytes();
    field[comment_start..comment_start + bytes.len()].copy_from_slice(bytes);
}

fn comment_or_empty(comment: Option<&str>) -> &str {
    comment.unwrap_or("")
}

/// Format a line holding a character-string value.
pub fn format_ascii_line(keyword: &str, value: &str, comment: Option<&str>) -> String {
    format_line(
        keyword,
        &Value::String(String::from(value)),
        comment_or_empty(comment),
    )
}

/// Format a line holding a floating-point value.
pub fn format_double_line(keyword: &str, value: f64, comment: Option<&str>) -> String {
    format_line(keyword, &Value::Float(value), comment_or_empty(comment))
}

/// Format a line holding an integer value.
pub fn format_int_line(keyword: &str, value: i64, comment: Option<&str>) -> String {
    format_line(keyword, &Value::Integer(value), comment_or_empty(comment))
}

/// Format a line holding a logical value.
pub fn format_logical_line(keyword: &str, value: bool, comment: Option<&str>) -> String {
    format_line(keyword, &Value::Logical(value), comment_or_empty(comment))
}

// ── Lookup ──

/// Return the first line whose keyword is `keyword`.
pub fn find_line_text<'a>(lines: &'a [String], keyword: &str) -> Option<&'a str> {
    lines
        .iter()
        .find(|line| matches_keyword(line, keyword))
        .map(String::as_str)
}

/// Parse the value of the first line whose keyword is `keyword`.
pub fn find_value(lines: &[String], keyword: &str) -> Option<Value> {
    find_line_text(lines, keyword).and_then(|line| parse_line(line).value)
}

pub fn parse_ascii(lines: &[String], keyword: &str) -> Option<String> {
    find_value(lines, keyword)?.as_str().map(String::from)
}

pub fn parse_double(lines: &[String], keyword: &str) -> Option<f64> {
    find_value(lines, keyword)?.as_f64()
}

pub fn parse_int(lines: &[String], keyword: &str) -> Option<i64> {
    find_value(lines, keyword)?.as_i64()
}

pub fn parse_logical(lines: &[String], keyword: &str) -> Option<bool> {
    find_value(lines, keyword)?.as_bool()
}

/// Parse every line into a [`Card`].
pub fn parse_lines(lines: &[String]) -> Vec<Card> {
    lines.iter().map(|line| parse_line(line)).collect()
}
