//! Error types for the ClickHouse client.
//!
//! All fallible operations in this crate return [`Result<T>`], which is an
//! alias for `std::result::Result<T, Error>`.

use thiserror::Error;

/// Errors that can occur when using the ClickHouse client.
#[derive(Error, Debug)]
pub enum Error {
    /// An I/O error occurred on the underlying TCP or TLS connection.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to establish a connection to the ClickHouse server.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A protocol-level error, such as an unexpected packet type or
    /// malformed data from the server.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// An error during LZ4 or ZSTD compression/decompression.
    #[error("Compression error: {0}")]
    Compression(String),

    /// A type mismatch between expected and actual column types.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The type that was expected.
        expected: String,
        /// The type that was received.
        actual: String,
    },

    /// A validation error, such as mismatched row counts in a block.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An error returned by the ClickHouse server (exception).
    #[error("Server error {code}: {message}")]
    Server {
        /// ClickHouse error code.
        code: i32,
        /// Error message from the server.
        message: String,
    },

    /// A feature or type that has not been implemented yet.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// An invalid argument was provided to a function.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A write exceeded the available buffer capacity.
    #[error("Buffer overflow")]
    BufferOverflow,

    /// Invalid UTF-8 was encountered when reading a string.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// A socket read returned fewer bytes than the frame declared.
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Bytes the frame said were coming.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// A socket write did not complete.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// A connect, read, or query deadline elapsed before the operation
    /// completed.
    #[error("deadline elapsed: {0}")]
    DeadlineElapsed(String),

    /// A varint used more than the 10 bytes needed to encode a 64-bit value.
    #[error("malformed varint: more than 10 continuation bytes")]
    MalformedVarint,

    /// A type name did not match any registered type.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// A type expression could not be parsed.
    #[error("type parse error: {0}")]
    TypeParse(String),

    /// A type composition is structurally disallowed (e.g.
    /// `Nullable(Array(T))`).
    #[error("unsupported type composition: {0}")]
    UnsupportedTypeComposition(String),

    /// Converting a logical value to its wire representation failed during
    /// `Column::append`.
    #[error("value conversion failed in column '{column}' at row {row_index}: {cause}")]
    ValueConversion {
        /// Name of the column being appended to.
        column: String,
        /// Row index the append was attempted at.
        row_index: usize,
        /// Human-readable cause.
        cause: String,
    },

    /// `Block::append_row` failed partway through a row.
    #[error("append failed in column '{column}' at row {row_index}")]
    AppendFailed {
        /// Name of the column whose append failed.
        column: String,
        /// Row index the append was attempted at.
        row_index: usize,
    },

    /// The compressed-frame CityHash128 checksum did not match the payload.
    #[error("checksum mismatch: expected {expected:032x}, computed {actual:032x}")]
    ChecksumMismatch {
        /// Checksum transmitted in the frame.
        expected: u128,
        /// Checksum computed over the received payload.
        actual: u128,
    },

    /// A setting name was not recognized by the settings registry.
    #[error("unknown setting: {0}")]
    UnknownSetting(String),

    /// An operation was attempted while the session was in a state that
    /// does not permit it (e.g. issuing a query while already streaming).
    #[error("usage error: {0}")]
    Usage(String),
}

/// A type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
