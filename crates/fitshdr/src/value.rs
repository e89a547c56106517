//! Typed values carried in the value field (bytes 10..80) of a header line.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::str;

/// Width of the value field that follows the `= ` indicator.
pub const VALUE_FIELD_SIZE: usize = 70;

/// Fixed-format numeric and logical values end in column 30 of the line,
/// which is the 20th byte of the value field.
const FIXED_WIDTH: usize = 20;

/// A parsed header value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Logical value (`T` or `F`).
    Logical(bool),
    /// Integer value.
    Integer(i64),
    /// Floating-point value.
    Float(f64),
    /// Character string (content between single quotes).
    String(String),
}

impl Value {
    /// Character-string content; other kinds are rejected.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integers widen to `f64`; everything else but floats is rejected.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Logical(b) => Some(*b),
            _ => None,
        }
    }
}

/// Find ` /` in `field` and return the text before it plus the trimmed comment.
///
/// Writers that omit the space after the slash (`/comment`) are accepted.
fn split_comment(field: &[u8]) -> (&[u8], Option<&str>) {
    match field.windows(2).position(|w| w == b" /") {
        Some(i) => {
            let mut start = i + 2;
            if field.get(start) == Some(&b' ') {
                start += 1;
            }
            let comment = str::from_utf8(&field[start..])
                .ok()
                .map(|s| s.trim_end())
                .filter(|s| !s.is_empty());
            (&field[..i], comment)
        }
        None => (field, None),
    }
}

/// Parse a quoted string. `''` inside the quotes is a literal quote.
fn parse_string(field: &[u8]) -> Option<(Value, Option<&str>)> {
    if field.first() != Some(&b'\'') {
        return None;
    }

    let mut raw = Vec::new();
    let mut i = 1;
    while i < field.len() {
        if field[i] == b'\'' {
            if field.get(i + 1) == Some(&b'\'') {
                raw.push(b'\'');
                i += 2;
                continue;
            }
            i += 1;
            break;
        }
        raw.push(field[i]);
        i += 1;
    }

    // Strings are blank padded to 8 characters; the padding is not content.
    let value = String::from_utf8(raw).ok()?;
    let trimmed = value.trim_end().to_string();
    let (_, comment) = split_comment(&field[i..]);
    Some((Value::String(trimmed), comment))
}

/// Parse a float, accepting the Fortran `D` exponent.
fn parse_float_str(s: &str) -> Option<f64> {
    s.replace(['D', 'd'], "E").parse::<f64>().ok()
}

/// Parse the value field of a line (the bytes after `= `).
///
/// Returns the value and the comment, if any. Leading blanks before a string
/// are tolerated.
pub fn parse_value(value_bytes: &[u8]) -> Option<(Value, Option<&str>)> {
    let start = value_bytes.iter().position(|&b| b != b' ')?;
    if value_bytes[start] == b'\'' {
        return parse_string(&value_bytes[start..]);
    }

    let (val_part, comment) = split_comment(value_bytes);
    let text = str::from_utf8(val_part).ok()?.trim();
    if text.is_empty() {
        return None;
    }

    match text {
        "T" => return Some((Value::Logical(true), comment)),
        "F" => return Some((Value::Logical(false), comment)),
        _ => {}
    }

    let looks_real = text.contains(['.', 'E', 'e', 'D', 'd']);
    if !looks_real {
        if let Ok(n) = text.parse::<i64>() {
            return Some((Value::Integer(n), comment));
        }
    }

    parse_float_str(text).map(|f| (Value::Float(f), comment))
}

/// Serialize a [`Value`] into the 70-byte value field.
///
/// Numbers and logicals are right-justified in the first 20 bytes; strings
/// start at byte 0 with a quote.
pub fn format_value(value: &Value) -> [u8; VALUE_FIELD_SIZE] {
    let mut buf = [b' '; VALUE_FIELD_SIZE];

    match value {
        Value::Logical(b) => {
            buf[FIXED_WIDTH - 1] = if *b { b'T' } else { b'F' };
        }
        Value::Integer(n) => {
            right_justify(format!("{n}").as_bytes(), &mut buf[..FIXED_WIDTH]);
        }
        Value::Float(f) => {
            right_justify(format_float(*f).as_bytes(), &mut buf[..FIXED_WIDTH]);
        }
        Value::String(s) => write_string(s, &mut buf),
    }

    buf
}

/// Index one past the last byte of the value proper inside a formatted field.
///
/// Comments are placed after this point.
pub fn value_end(field: &[u8; VALUE_FIELD_SIZE]) -> usize {
    if field[0] != b'\'' {
        return FIXED_WIDTH;
    }
    let mut i = 1;
    while i < VALUE_FIELD_SIZE {
        if field[i] == b'\'' {
            if i + 1 < VALUE_FIELD_SIZE && field[i + 1] == b'\'' {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    VALUE_FIELD_SIZE
}

fn right_justify(src: &[u8], dest: &mut [u8]) {
    let len = src.len().min(dest.len());
    let start = dest.len() - len;
    dest.fill(b' ');
    dest[start..].copy_from_slice(&src[..len]);
}

/// Shortest round-trip `E` notation, losing precision only when it does not
/// fit the fixed-format field.
fn format_float(f: f64) -> String {
    if f == 0.0 {
        return String::from("0.0");
    }
    let shortest = format!("{f:E}");
    if shortest.len() <= FIXED_WIDTH {
        return shortest;
    }
    let mut precision = 15usize;
    loop {
        let s = format!("{:.prec$E}", f, prec = precision);
        if s.len() <= FIXED_WIDTH || precision == 0 {
            return s;
        }
        precision -= 1;
    }
}

fn write_string(s: &str, buf: &mut [u8; VALUE_FIELD_SIZE]) {
    let last = VALUE_FIELD_SIZE - 1;
    let mut pos = 0;
    buf[pos] = b'\'';
    pos += 1;

    for ch in s.chars() {
        let width = if ch == '\'' { 2 } else { ch.len_utf8() };
        if pos + width > last {
            break;
        }
        if ch == '\'' {
            buf[pos..pos + 2].copy_from_slice(b"''");
        } else {
            ch.encode_utf8(&mut buf[pos..pos + width]);
        }
        pos += width;
    }

    // At least 8 characters between the quotes.
    pos = pos.max(9);
    buf[pos] = b'\'';
}
