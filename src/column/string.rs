//! String column implementations
//!
//! **ClickHouse Documentation:**
//! - [String](https://clickhouse.com/docs/en/sql-reference/data-types/string)
//!   - Variable-length UTF-8 strings
//! - [FixedString](https://clickhouse.com/docs/en/sql-reference/data-types/fixedstring)
//!   - Fixed-length binary strings
//!
//! ## String Type
//!
//! Variable-length UTF-8 strings. Each string is prefixed with its length
//! (varint encoded).
//!
//! **Wire Format:**
//! ```text
//! For each string: [length:varint][bytes:UInt8 * length]
//! ```
//!
//! ## FixedString Type
//!
//! Fixed-length binary strings, zero-padded if shorter than the specified
//! size. Useful for storing UUIDs, hashes, or other fixed-size binary data.
//!
//! **Wire Format:**
//! ```text
//! [bytes:UInt8 * N]  // N is the FixedString size
//! ```

use super::{
    Column,
    ColumnRef,
};
use crate::{
    io::buffer_utils,
    types::Type,
    Error,
    Result,
};
use bytes::{
    Buf,
    BufMut,
    BytesMut,
};
use std::sync::Arc;

/// Column for fixed-length strings (all strings padded to same length)
///
/// Stores binary data of exactly `N` bytes per element, zero-padded if needed.
///
/// **ClickHouse Reference:** <https://clickhouse.com/docs/en/sql-reference/data-types/fixedstring>
pub struct ColumnFixedString {
    type_: Type,
    string_size: usize,
    data: Vec<u8>,
}

impl ColumnFixedString {
    pub fn new(type_: Type) -> Self {
        let string_size = match &type_ {
            Type::FixedString { size } => *size,
            _ => panic!("Expected FixedString type"),
        };

        Self { type_, string_size, data: Vec::new() }
    }

    pub fn with_capacity(type_: Type, capacity: usize) -> Self {
        let string_size = match &type_ {
            Type::FixedString { size } => *size,
            _ => panic!("Expected FixedString type"),
        };

        Self {
            type_,
            string_size,
            data: Vec::with_capacity(string_size * capacity),
        }
    }

    /// Create a column with initial data (builder pattern)
    pub fn with_data(mut self, data: Vec<String>) -> Self {
        for s in data {
            self.append(s);
        }
        self
    }

    pub fn append(&mut self, s: String) {
        let bytes = s.as_bytes();

        if bytes.len() > self.string_size {
            panic!(
                "String too long for FixedString({}): got {} bytes",
                self.string_size,
                bytes.len()
            );
        }

        // Append the string data
        self.data.extend_from_slice(bytes);

        // Pad with zeros if needed
        if bytes.len() < self.string_size {
            self.data
                .resize(self.data.len() + (self.string_size - bytes.len()), 0);
        }
    }

    pub fn get(&self, index: usize) -> Option<String> {
        if index >= self.size() {
            return None;
        }

        let start = index * self.string_size;
        let end = start + self.string_size;
        let bytes = &self.data[start..end];

        // Trim null bytes from the end
        let trimmed =
            bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Some(String::from_utf8_lossy(&bytes[..trimmed]).to_string())
    }

    /// Get value at index (for tests)
    pub fn at(&self, index: usize) -> String {
        self.get(index).unwrap()
    }

    /// Get the number of elements (alias for size())
    pub fn len(&self) -> usize {
        self.size()
    }

    /// Check if the column is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn fixed_size(&self) -> usize {
        self.string_size
    }
}

impl Column for ColumnFixedString {
    fn column_type(&self) -> &Type {
        &self.type_
    }

    fn size(&self) -> usize {
        self.data.len() / self.string_size
    }

    fn clear(&mut self) {
        self.data.clear();
    }

    fn reserve(&mut self, new_cap: usize) {
        self.data.reserve(self.string_size * new_cap);
    }

    fn append_column(&mut self, other: ColumnRef) -> Result<()> {
        let other = other
            .as_any()
            .downcast_ref::<ColumnFixedString>()
            .ok_or_else(|| Error::TypeMismatch {
                expected: self.type_.name(),
                actual: other.column_type().name(),
            })?;

        if self.string_size != other.string_size {
            return Err(Error::TypeMismatch {
                expected: format!("FixedString({})", self.string_size),
                actual: format!("FixedString({})", other.string_size),
            });
        }

        self.data.extend_from_slice(&other.data);
        Ok(())
    }

    fn load_from_buffer(
        &mut self,
        buffer: &mut &[u8],
        rows: usize,
    ) -> Result<()> {
        let total_bytes = self.string_size * rows;

        if buffer.len() < total_bytes {
            return Err(Error::Protocol(format!(
                "Not enough data for {} FixedString({}) values: need {}, have {}",
                rows, self.string_size, total_bytes, buffer.len()
            )));
        }

        self.data.extend_from_slice(&buffer[..total_bytes]);
        buffer.advance(total_bytes);
        Ok(())
    }

    fn save_to_buffer(&self, buffer: &mut BytesMut) -> Result<()> {
        buffer.put_slice(&self.data);
        Ok(())
    }

    fn clone_empty(&self) -> ColumnRef {
        Arc::new(ColumnFixedString::new(self.type_.clone()))
    }

    fn slice(&self, begin: usize, len: usize) -> Result<ColumnRef> {
        if begin + len > self.size() {
            return Err(Error::InvalidArgument(format!(
                "Slice out of bounds: begin={}, len={}, size={}",
                begin,
                len,
                self.size()
            )));
        }

        let start = begin * self.string_size;
        let end = start + len * self.string_size;

        let mut result = ColumnFixedString::new(self.type_.clone());
        result.data = self.data[start..end].to_vec();

        Ok(Arc::new(result))
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Column for variable-length strings.
///
/// ClickHouse's `String` type carries arbitrary bytes, not necessarily valid
/// UTF-8 (e.g. raw hashes stashed in a `String` column). The column therefore
/// stores the exact bytes it read off the wire and never rejects a value for
/// being invalid UTF-8; decoding into a Rust `str`/`String` is a lossy
/// convenience left to the caller via [`ColumnString::get_lossy`].
pub struct ColumnString {
    type_: Type,
    data: Vec<bytes::Bytes>,
}

impl ColumnString {
    pub fn new(type_: Type) -> Self {
        Self { type_, data: Vec::new() }
    }

    pub fn with_capacity(type_: Type, capacity: usize) -> Self {
        Self { type_, data: Vec::with_capacity(capacity) }
    }

    pub fn from_vec(type_: Type, data: Vec<String>) -> Self {
        Self {
            type_,
            data: data.into_iter().map(|s| bytes::Bytes::from(s.into_bytes())).collect(),
        }
    }

    /// Build a column directly from raw byte values, with no UTF-8
    /// requirement.
    pub fn from_bytes_vec(type_: Type, data: Vec<bytes::Bytes>) -> Self {
        Self { type_, data }
    }

    /// Create a column with initial data (builder pattern)
    pub fn with_data(mut self, data: Vec<String>) -> Self {
        self.data =
            data.into_iter().map(|s| bytes::Bytes::from(s.into_bytes())).collect();
        self
    }

    /// Append a UTF-8 value.
    pub fn append(&mut self, s: impl Into<String>) {
        self.data.push(bytes::Bytes::from(s.into().into_bytes()));
    }

    /// Append arbitrary bytes, with no UTF-8 requirement.
    pub fn append_bytes(&mut self, bytes: impl Into<bytes::Bytes>) {
        self.data.push(bytes.into());
    }

    /// Get the exact bytes stored at `index`, lossless.
    pub fn get_bytes(&self, index: usize) -> Option<&[u8]> {
        self.data.get(index).map(|b| b.as_ref())
    }

    /// Get the value at `index` decoded as UTF-8, replacing invalid
    /// sequences (lossy). Returns `None` for the valid-UTF-8 fast path as
    /// a borrowed `&str`; use [`ColumnString::get_bytes`] for the raw form.
    pub fn get(&self, index: usize) -> Option<std::borrow::Cow<'_, str>> {
        self.data.get(index).map(|b| String::from_utf8_lossy(b))
    }

    /// Get value at index as an owned, lossily-decoded `String` (for tests).
    pub fn at(&self, index: usize) -> String {
        self.get(index).expect("index out of range").into_owned()
    }

    /// Get the number of elements (alias for size())
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the column is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.data.iter().map(|b| b.as_ref())
    }
}

impl Default for ColumnString {
    fn default() -> Self {
        Self::new(Type::string())
    }
}

impl Column for ColumnString {
    fn column_type(&self) -> &Type {
        &self.type_
    }

    fn size(&self) -> usize {
        self.data.len()
    }

    fn clear(&mut self) {
        self.data.clear();
    }

    fn reserve(&mut self, new_cap: usize) {
        self.data.reserve(new_cap);
    }

    fn append_column(&mut self, other: ColumnRef) -> Result<()> {
        let other = other.as_any().downcast_ref::<ColumnString>().ok_or_else(
            || Error::TypeMismatch {
                expected: self.type_.name(),
                actual: other.column_type().name(),
            },
        )?;

        self.data.extend(other.data.iter().cloned());
        Ok(())
    }

    fn load_from_buffer(
        &mut self,
        buffer: &mut &[u8],
        rows: usize,
    ) -> Result<()> {
        self.data.reserve(rows);

        for _ in 0..rows {
            // Read varint length
            let len = buffer_utils::read_varint(buffer)? as usize;

            if buffer.len() < len {
                return Err(Error::Protocol(format!(
                    "Not enough data for string: need {}, have {}",
                    len,
                    buffer.len()
                )));
            }

            // Read the exact bytes; ClickHouse Strings are not guaranteed
            // to be valid UTF-8, so no validation happens here.
            let string_data = bytes::Bytes::copy_from_slice(&buffer[..len]);

            self.data.push(string_data);
            buffer.advance(len);
        }

        Ok(())
    }

    fn save_to_buffer(&self, buffer: &mut BytesMut) -> Result<()> {
        for s in &self.data {
            // Write varint length
            buffer_utils::write_varint(buffer, s.len() as u64);
            // Write raw bytes
            buffer.put_slice(s);
        }
        Ok(())
    }

    fn clone_empty(&self) -> ColumnRef {
        Arc::new(ColumnString::new(self.type_.clone()))
    }

    fn slice(&self, begin: usize, len: usize) -> Result<ColumnRef> {
        if begin + len > self.data.len() {
            return Err(Error::InvalidArgument(format!(
                "Slice out of bounds: begin={}, len={}, size={}",
                begin,
                len,
                self.data.len()
            )));
        }

        let sliced = self.data[begin..begin + len].to_vec();
        Ok(Arc::new(ColumnString::from_bytes_vec(self.type_.clone(), sliced)))
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

// Helper functions removed - using buffer_utils module
