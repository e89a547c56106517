//! The header store: a bounded, ordered set of header lines with keyword and
//! line-number access.
//!
//! A [`Header`] is either *unallocated* (no line storage) or *allocated*.
//! Queries on an unallocated header fail with [`Error::HeaderIsNull`];
//! inserts allocate on demand. Every applied mutation bumps a modification
//! counter that callers may use as a cheap change indicator.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use tracing::{debug, trace};

use crate::block::{parse_header_blocks, serialize_lines};
use crate::codec::{
    self, format_ascii_line, format_double_line, format_int_line, format_logical_line, Card,
};
use crate::error::{Error, Result};
use crate::lines::{self, APPEND};

/// Default maximum number of lines a header can hold.
pub const MAX_HEADER_LINES: usize = 5000;

/// An ordered, bounded collection of header lines.
///
/// `Default` gives an unallocated header; [`Header::new`] gives an allocated,
/// empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// `None` while unallocated. Present lines are the whole vector; every
    /// index past its length up to `capacity` is an absent slot.
    lines: Option<Vec<String>>,
    capacity: usize,
    modification_count: u64,
}

impl Default for Header {
    fn default() -> Self {
        Self::unallocated()
    }
}

impl Header {
    /// Create an allocated, empty header with the default capacity.
    ///
    /// Memory exhaustion aborts the process through the global allocator.
    pub fn new() -> Self {
        Self::with_capacity(MAX_HEADER_LINES)
    }

    /// Create an allocated, empty header holding at most `max_lines` lines.
    pub fn with_capacity(max_lines: usize) -> Self {
        let mut header = Self {
            lines: None,
            capacity: max_lines,
            modification_count: 0,
        };
        header.allocate();
        header
    }

    /// Create a header with no line storage.
    pub fn unallocated() -> Self {
        Self {
            lines: None,
            capacity: MAX_HEADER_LINES,
            modification_count: 0,
        }
    }

    /// Build a header from serialized header blocks.
    ///
    /// Every record up to and including END becomes one line. Fails with
    /// [`Error::HeaderInsertion`] if there are more records than
    /// [`MAX_HEADER_LINES`].
    pub fn from_header_bytes(data: &[u8]) -> Result<Self> {
        let parsed = parse_header_blocks(data)?;
        let mut header = Self::new();
        if parsed.len() > header.capacity {
            debug!(
                lines = parsed.len(),
                capacity = header.capacity,
                "header blocks exceed capacity"
            );
            return Err(Error::HeaderInsertion);
        }
        header.lines = Some(parsed);
        header.bump();
        Ok(header)
    }

    /// Serialize the present lines into 2880-byte header blocks.
    pub fn to_header_bytes(&self) -> Result<Vec<u8>> {
        Ok(serialize_lines(self.storage()?))
    }

    /// Release every line and the storage itself.
    ///
    /// Consuming `self` makes a second release impossible.
    pub fn destroy(mut self) {
        self.free_all();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_allocated(&self) -> bool {
        self.lines.is_some()
    }

    /// Number of applied mutations since creation. Diagnostic only.
    pub fn modification_count(&self) -> u64 {
        self.modification_count
    }

    /// Iterate over the present lines in order. Empty when unallocated.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().flatten().map(String::as_str)
    }

    /// Parse every present line into a [`Card`].
    pub fn cards(&self) -> Result<Vec<Card>> {
        Ok(codec::parse_lines(self.storage()?))
    }

    // ── Lifecycle ──

    fn bump(&mut self) {
        self.modification_count = self.modification_count.wrapping_add(1);
    }

    fn allocate(&mut self) {
        self.lines = Some(Vec::new());
        self.bump();
        debug!(capacity = self.capacity, "allocated header storage");
    }

    /// Storage for a mutation, allocating it first if needed.
    fn storage_mut_or_allocate(&mut self) -> &mut Vec<String> {
        if self.lines.is_none() {
            self.allocate();
        }
        self.lines.get_or_insert_with(Vec::new)
    }

    fn storage(&self) -> Result<&Vec<String>> {
        self.lines.as_ref().ok_or(Error::HeaderIsNull)
    }

    fn storage_mut(&mut self) -> Result<&mut Vec<String>> {
        self.lines.as_mut().ok_or(Error::HeaderIsNull)
    }

    /// Make the header allocated and empty.
    ///
    /// Allocates when unallocated; otherwise frees the lines but keeps the
    /// storage. Always counts as one more modification.
    pub fn reset(&mut self) {
        if self.lines.is_none() {
            self.allocate();
        } else {
            self.free_contents();
        }
        self.bump();
    }

    /// Drop every line but keep the storage.
    ///
    /// Counts as a modification only if a line was actually freed.
    pub fn free_contents(&mut self) {
        let Some(lines) = self.lines.as_mut() else {
            return;
        };
        if lines.is_empty() {
            return;
        }
        let freed = lines.len();
        lines.clear();
        self.bump();
        debug!(freed, "freed header lines");
    }

    /// Drop every line and the storage; the header becomes unallocated.
    pub fn free_all(&mut self) {
        if self.lines.is_none() {
            return;
        }
        self.free_contents();
        self.lines = None;
        self.bump();
        debug!("released header storage");
    }

    // ── Queries ──

    /// String value of the first line whose keyword is `keyword`.
    pub fn get_ascii(&self, keyword: &str) -> Result<String> {
        codec::parse_ascii(self.storage()?, keyword).ok_or(Error::Generic)
    }

    /// Floating-point value of `keyword`. Integer values are widened.
    pub fn get_double(&self, keyword: &str) -> Result<f64> {
        codec::parse_double(self.storage()?, keyword).ok_or(Error::Generic)
    }

    pub fn get_int(&self, keyword: &str) -> Result<i64> {
        codec::parse_int(self.storage()?, keyword).ok_or(Error::Generic)
    }

    pub fn get_logical(&self, keyword: &str) -> Result<bool> {
        codec::parse_logical(self.storage()?, keyword).ok_or(Error::Generic)
    }

    /// The whole raw line of the first line whose keyword is `keyword`.
    pub fn get_line(&self, keyword: &str) -> Result<&str> {
        codec::find_line_text(self.storage()?, keyword).ok_or(Error::Generic)
    }

    /// Index of the first line that *begins with* `keyword`.
    ///
    /// This is a prefix comparison on the raw text, not a keyword match:
    /// `"EXP"` finds a line for `EXPTIME`.
    pub fn get_line_number(&self, keyword: &str) -> Result<usize> {
        self.storage()?
            .iter()
            .take(self.capacity)
            .position(|line| line.as_bytes().starts_with(keyword.as_bytes()))
            .ok_or(Error::Generic)
    }

    /// Number of present lines. Zero when unallocated.
    pub fn line_count(&self) -> usize {
        self.lines
            .as_ref()
            .map_or(0, |lines| lines.len().min(self.capacity))
    }

    /// Raw text at `index`, or an empty string for an absent slot.
    ///
    /// Fails with [`Error::Generic`] when `index` is beyond the capacity,
    /// whether or not that many lines are present.
    pub fn get_line_content(&self, index: usize) -> Result<&str> {
        let storage = self.storage()?;
        if index >= self.capacity {
            return Err(Error::Generic);
        }
        Ok(storage.get(index).map_or("", String::as_str))
    }

    // ── Mutations ──

    fn append_line(&mut self, line: String) -> Result<()> {
        let capacity = self.capacity;
        let storage = self.storage_mut_or_allocate();
        if !lines::insert_at(storage, capacity, APPEND, &line) {
            debug!(capacity, "header full, line rejected");
            return Err(Error::HeaderInsertion);
        }
        self.bump();
        trace!(line = line.as_str(), "appended header line");
        Ok(())
    }

    /// Append a character-string line.
    pub fn insert_ascii(
        &mut self,
        keyword: &str,
        value: &str,
        comment: Option<&str>,
    ) -> Result<()> {
        self.append_line(format_ascii_line(keyword, value, comment))
    }

    /// Append a floating-point line.
    pub fn insert_double(
        &mut self,
        keyword: &str,
        value: f64,
        comment: Option<&str>,
    ) -> Result<()> {
        self.append_line(format_double_line(keyword, value, comment))
    }

    /// Append an integer line.
    pub fn insert_int(
        &mut self,
        keyword: &str,
        value: i64,
        comment: Option<&str>,
    ) -> Result<()> {
        self.append_line(format_int_line(keyword, value, comment))
    }

    /// Append a logical line.
    pub fn insert_logical(
        &mut self,
        keyword: &str,
        value: bool,
        comment: Option<&str>,
    ) -> Result<()> {
        self.append_line(format_logical_line(keyword, value, comment))
    }

    /// Insert `text` verbatim so that it becomes line `line_number`.
    ///
    /// Lines at and after `line_number` move down by one; a position past
    /// the last line appends.
    pub fn insert_line_at(&mut self, line_number: usize, text: &str) -> Result<()> {
        let capacity = self.capacity;
        let storage = self.storage_mut_or_allocate();
        if !lines::insert_at(storage, capacity, line_number, text) {
            debug!(line_number, capacity, "header full, line rejected");
            return Err(Error::HeaderInsertion);
        }
        self.bump();
        trace!(line_number, "inserted header line");
        Ok(())
    }

    /// Overwrite line `line_number` with `text`, without reformatting.
    pub fn replace_line_at(&mut self, line_number: usize, text: &str) -> Result<()> {
        if !lines::replace_at(self.storage_mut()?, line_number, text) {
            return Err(Error::Generic);
        }
        self.bump();
        trace!(line_number, "replaced header line");
        Ok(())
    }

    /// Remove line `line_number`; later lines move up by one.
    pub fn delete_line_at(&mut self, line_number: usize) -> Result<()> {
        if !lines::delete_at(self.storage_mut()?, line_number) {
            return Err(Error::Generic);
        }
        self.bump();
        trace!(line_number, "deleted header line");
        Ok(())
    }

    /// Remove the first line whose keyword is `keyword`.
    pub fn delete_by_keyword(&mut self, keyword: &str) -> Result<()> {
        if !lines::delete_by_keyword(self.storage_mut()?, keyword) {
            return Err(Error::Generic);
        }
        self.bump();
        trace!(keyword, "deleted header line by keyword");
        Ok(())
    }

    /// Replace this header's lines with deep copies of `source`'s.
    ///
    /// See [`copy`].
    pub fn copy_from(&mut self, source: &Header) -> Result<()> {
        copy(source, self)
    }
}

/// Deep-copy every line of `source` into `destination`.
///
/// The destination's previous lines are discarded, or its storage is
/// allocated if it had none. Line positions are preserved. The destination's
/// modification counter advances by exactly one.
///
/// Fails with [`Error::HeaderInsertion`], leaving the destination untouched,
/// if the source holds more lines than the destination's capacity.
pub fn copy(source: &Header, destination: &mut Header) -> Result<()> {
    let src = source.storage()?;
    if src.len() > destination.capacity {
        debug!(
            lines = src.len(),
            capacity = destination.capacity,
            "copy source exceeds destination capacity"
        );
        return Err(Error::HeaderInsertion);
    }

    let dest = destination.lines.get_or_insert_with(Vec::new);
    dest.clear();
    dest.extend(src.iter().cloned());

    destination.bump();
    debug!(lines = src.len(), "copied header");
    Ok(())
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
