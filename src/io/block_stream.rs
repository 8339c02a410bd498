use crate::block::{Block, BlockInfo};
use crate::column::ColumnRef;
use crate::compression::{compress, decompress};
use crate::connection::Connection;
use crate::protocol::CompressionMethod;
use crate::types::Type;
use crate::{Error, Result};
use bytes::{Buf, BufMut, BytesMut};
use std::sync::Arc;

/// Minimum revision constants
const DBMS_MIN_REVISION_WITH_TEMPORARY_TABLES: u64 = 50264;
const DBMS_MIN_REVISION_WITH_BLOCK_INFO: u64 = 51903;
const DBMS_MIN_REVISION_WITH_CUSTOM_SERIALIZATION: u64 = 54454;

/// Create a column instance for the given type
/// This is used internally by column types like Array and Nullable
pub fn create_column(type_: &Type) -> Result<ColumnRef> {
    use crate::column::array::ColumnArray;
    use crate::column::date::{ColumnDate, ColumnDate32, ColumnDateTime, ColumnDateTime64};
    use crate::column::decimal::ColumnDecimal;
    use crate::column::enum_column::{ColumnEnum8, ColumnEnum16};
    use crate::column::ipv4::ColumnIpv4;
    use crate::column::ipv6::ColumnIpv6;
    use crate::column::lowcardinality::ColumnLowCardinality;
    use crate::column::map::ColumnMap;
    use crate::column::nothing::ColumnNothing;
    use crate::column::nullable::ColumnNullable;
    use crate::column::numeric::*;
    use crate::column::string::{ColumnFixedString, ColumnString};
    use crate::column::uuid::ColumnUuid;

    match type_ {
        Type::Simple(code) => {
            use crate::types::TypeCode;
            match code {
                TypeCode::UInt8 => Ok(Arc::new(ColumnUInt8::new(type_.clone()))),
                TypeCode::UInt16 => Ok(Arc::new(ColumnUInt16::new(type_.clone()))),
                TypeCode::UInt32 => Ok(Arc::new(ColumnUInt32::new(type_.clone()))),
                TypeCode::UInt64 => Ok(Arc::new(ColumnUInt64::new(type_.clone()))),
                TypeCode::Int8 => Ok(Arc::new(ColumnInt8::new(type_.clone()))),
                TypeCode::Int16 => Ok(Arc::new(ColumnInt16::new(type_.clone()))),
                TypeCode::Int32 => Ok(Arc::new(ColumnInt32::new(type_.clone()))),
                TypeCode::Int64 => Ok(Arc::new(ColumnInt64::new(type_.clone()))),
                TypeCode::Float32 => Ok(Arc::new(ColumnFloat32::new(type_.clone()))),
                TypeCode::Float64 => Ok(Arc::new(ColumnFloat64::new(type_.clone()))),
                TypeCode::String => Ok(Arc::new(ColumnString::new(type_.clone()))),
                TypeCode::Date => Ok(Arc::new(ColumnDate::new(type_.clone()))),
                TypeCode::Date32 => Ok(Arc::new(ColumnDate32::new(type_.clone()))),
                TypeCode::UUID => Ok(Arc::new(ColumnUuid::new(type_.clone()))),
                TypeCode::IPv4 => Ok(Arc::new(ColumnIpv4::new(type_.clone()))),
                TypeCode::IPv6 => Ok(Arc::new(ColumnIpv6::new(type_.clone()))),
                TypeCode::Void => Ok(Arc::new(ColumnNothing::new(type_.clone()))),
                _ => Err(Error::Protocol(format!("Unsupported type: {}", type_.name()))),
            }
        }
        Type::FixedString { .. } => Ok(Arc::new(ColumnFixedString::new(type_.clone()))),
        Type::DateTime { .. } => {
            // Use specialized ColumnDateTime with timezone support
            Ok(Arc::new(ColumnDateTime::new(type_.clone())))
        }
        Type::DateTime64 { .. } => {
            // Use specialized ColumnDateTime64 with precision and timezone
            Ok(Arc::new(ColumnDateTime64::new(type_.clone())))
        }
        Type::Enum8 { .. } => {
            // Use specialized ColumnEnum8 with name-value mapping
            Ok(Arc::new(ColumnEnum8::new(type_.clone())))
        }
        Type::Enum16 { .. } => {
            // Use specialized ColumnEnum16 with name-value mapping
            Ok(Arc::new(ColumnEnum16::new(type_.clone())))
        }
        Type::Decimal { .. } => {
            // Use specialized ColumnDecimal with precision and scale
            Ok(Arc::new(ColumnDecimal::new(type_.clone())))
        }
        Type::Nullable { .. } => {
            Ok(Arc::new(ColumnNullable::new(type_.clone())))
        }
        Type::Array { .. } => {
            Ok(Arc::new(ColumnArray::new(type_.clone())))
        }
        Type::Map { .. } => {
            Ok(Arc::new(ColumnMap::new(type_.clone())))
        }
        Type::LowCardinality { .. } => {
            Ok(Arc::new(ColumnLowCardinality::new(type_.clone())))
        }
        Type::Tuple { item_types } => {
            // Create empty columns for each tuple element
            let mut columns = Vec::new();
            for item_type in item_types {
                columns.push(create_column(item_type)?);
            }
            Ok(Arc::new(crate::column::ColumnTuple::new(
                type_.clone(),
                columns,
            )))
        }
    }
}

/// Reader for blocks from network
pub struct BlockReader {
    server_revision: u64,
    compression: Option<CompressionMethod>,
}

impl BlockReader {
    /// Create a new block reader
    pub fn new(server_revision: u64) -> Self {
        Self {
            server_revision,
            compression: None,
        }
    }

    /// Enable compression
    pub fn with_compression(mut self, method: CompressionMethod) -> Self {
        self.compression = Some(method);
        self
    }

    /// Read a block from the connection
    /// Note: Caller is responsible for skipping temp table name if needed (matches C++ ReadBlock)
    pub async fn read_block(&self, conn: &mut Connection) -> Result<Block> {
        // Read the block data
        let block_data = if let Some(_compression_method) = self.compression {
            // Read compressed data: checksum (16) + header (9) + compressed data (N)
            // First read checksum
            let checksum = conn.read_bytes(16).await?;

            // Read header to determine compressed size
            let method = conn.read_u8().await?;
            let compressed_size = conn.read_u32().await? as usize;
            let uncompressed_size = conn.read_u32().await?;

            // Read the remaining compressed data
            let compressed_data_len = compressed_size.saturating_sub(9);
            let compressed_data = conn.read_bytes(compressed_data_len).await?;

            // Build the full compressed block for decompression
            let mut full_block = BytesMut::with_capacity(16 + 9 + compressed_data_len);
            full_block.extend_from_slice(&checksum);
            full_block.put_u8(method);
            full_block.put_u32_le(compressed_size as u32);
            full_block.put_u32_le(uncompressed_size);
            full_block.extend_from_slice(&compressed_data);

            // Decompress
            decompress(&full_block)?
        } else {
            // Read uncompressed - we'll read into a buffer as we parse
            // For now, create an empty buffer and read fields directly
            BytesMut::new().into()
        };

        // Parse block from buffer (or read directly if uncompressed)
        if self.compression.is_some() {
            self.parse_block_from_buffer(&mut &block_data[..])
        } else {
            self.read_block_direct(conn).await
        }
    }

    /// Read block directly from connection (uncompressed)
    async fn read_block_direct(&self, conn: &mut Connection) -> Result<Block> {
        let mut block = Block::new();

        // Read block info if supported
        if self.server_revision >= DBMS_MIN_REVISION_WITH_BLOCK_INFO {
            let info = self.read_block_info(conn).await?;
            block.set_info(info);
        }

        // Read column count and row count
        let num_columns = conn.read_varint().await? as usize;
        let num_rows = conn.read_varint().await? as usize;

        // Read each column
        for _ in 0..num_columns {
            let name = conn.read_string().await?;
            let type_name = conn.read_string().await?;

            // Check for custom serialization
            if self.server_revision >= DBMS_MIN_REVISION_WITH_CUSTOM_SERIALIZATION {
                let custom_len = conn.read_u8().await?;
                if custom_len > 0 {
                    return Err(Error::Protocol(
                        "Custom serialization not supported".to_string(),
                    ));
                }
            }

            // Parse the type
            let column_type = Type::parse(&type_name)?;

            // Create column and load data. Bytes are first copied off the
            // socket into a plain buffer (mirroring what the Compressed
            // Frame path hands to `parse_block_from_buffer`), then decoded
            // through the column's own bulk codec so the two read paths
            // can never disagree on layout.
            let mut column = create_column(&column_type)?;

            if num_rows > 0 {
                let mut staging = BytesMut::new();
                self.copy_column_bytes(conn, &column_type, num_rows, &mut staging).await?;
                Arc::get_mut(&mut column)
                    .ok_or_else(|| Error::Protocol("Column not mutable".to_string()))?
                    .load_from_buffer(&mut &staging[..], num_rows)?;
            }

            block.append_column(name, column)?;
        }

        Ok(block)
    }

    /// Copy the wire bytes for one column's bulk payload off the connection
    /// into `out`, without attempting to interpret them. Recurses for
    /// composite types so that the accumulated buffer is exactly what
    /// `Column::load_from_buffer` expects to consume.
    fn copy_column_bytes<'a>(
        &'a self,
        conn: &'a mut Connection,
        type_: &'a Type,
        num_rows: usize,
        out: &'a mut BytesMut,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + 'a>> {
        Box::pin(async move {
            self.copy_column_bytes_impl(conn, type_, num_rows, out).await
        })
    }

    async fn copy_column_bytes_impl(
        &self,
        conn: &mut Connection,
        type_: &Type,
        num_rows: usize,
        out: &mut BytesMut,
    ) -> Result<()> {
        use crate::types::TypeCode;

        async fn copy(conn: &mut Connection, len: usize, out: &mut BytesMut) -> Result<()> {
            let bytes = conn.read_bytes(len).await?;
            out.extend_from_slice(&bytes);
            Ok(())
        }

        match type_ {
            Type::Simple(code) => {
                match code {
                    TypeCode::UInt8 | TypeCode::Int8 | TypeCode::Enum8 | TypeCode::Void => {
                        copy(conn, num_rows, out).await?;
                    }
                    TypeCode::UInt16 | TypeCode::Int16 | TypeCode::Date | TypeCode::Enum16 => {
                        copy(conn, num_rows * 2, out).await?;
                    }
                    TypeCode::UInt32
                    | TypeCode::Int32
                    | TypeCode::Float32
                    | TypeCode::Date32
                    | TypeCode::IPv4 => {
                        copy(conn, num_rows * 4, out).await?;
                    }
                    TypeCode::UInt64 | TypeCode::Int64 | TypeCode::Float64 => {
                        copy(conn, num_rows * 8, out).await?;
                    }
                    TypeCode::UUID | TypeCode::IPv6 => {
                        copy(conn, num_rows * 16, out).await?;
                    }
                    TypeCode::String => {
                        for _ in 0..num_rows {
                            let len = conn.read_varint().await?;
                            crate::io::buffer_utils::write_varint(out, len);
                            copy(conn, len as usize, out).await?;
                        }
                    }
                    _ => {
                        return Err(Error::Protocol(format!(
                            "Uncompressed reading not implemented for type: {}",
                            type_.name()
                        )));
                    }
                }
            }
            Type::FixedString { size } => {
                copy(conn, num_rows * size, out).await?;
            }
            Type::DateTime { .. } => {
                copy(conn, num_rows * 4, out).await?;
            }
            Type::DateTime64 { .. } => {
                copy(conn, num_rows * 8, out).await?;
            }
            Type::Enum8 { .. } => {
                copy(conn, num_rows, out).await?;
            }
            Type::Enum16 { .. } => {
                copy(conn, num_rows * 2, out).await?;
            }
            Type::Decimal { precision, .. } => {
                let width = if *precision <= 9 {
                    4
                } else if *precision <= 18 {
                    8
                } else {
                    16
                };
                copy(conn, num_rows * width, out).await?;
            }
            Type::Nullable { nested_type } => {
                copy(conn, num_rows, out).await?;
                self.copy_column_bytes(conn, nested_type, num_rows, out).await?;
            }
            Type::Array { item_type } => {
                let mut offsets = Vec::with_capacity(num_rows);
                for _ in 0..num_rows {
                    let offset = conn.read_u64().await?;
                    out.put_u64_le(offset);
                    offsets.push(offset);
                }
                let total_items = offsets.last().copied().unwrap_or(0) as usize;
                self.copy_column_bytes(conn, item_type, total_items, out).await?;
            }
            Type::Map { key_type, value_type } => {
                let mut offsets = Vec::with_capacity(num_rows);
                for _ in 0..num_rows {
                    let offset = conn.read_u64().await?;
                    out.put_u64_le(offset);
                    offsets.push(offset);
                }
                let total_items = offsets.last().copied().unwrap_or(0) as usize;
                self.copy_column_bytes(conn, key_type, total_items, out).await?;
                self.copy_column_bytes(conn, value_type, total_items, out).await?;
            }
            Type::Tuple { item_types } => {
                for item_type in item_types {
                    self.copy_column_bytes(conn, item_type, num_rows, out).await?;
                }
            }
            _ => {
                return Err(Error::Protocol(format!(
                    "Uncompressed reading not implemented for complex type: {}",
                    type_.name()
                )));
            }
        }

        Ok(())
    }

    /// Read block info
    async fn read_block_info(&self, conn: &mut Connection) -> Result<BlockInfo> {
        let _num1 = conn.read_varint().await?;
        let is_overflows = conn.read_u8().await?;
        let _num2 = conn.read_varint().await?;
        let bucket_num = conn.read_i32().await?;
        let _num3 = conn.read_varint().await?;

        Ok(BlockInfo {
            is_overflows,
            bucket_num,
        })
    }

    /// Parse block from buffer (compressed data)
    fn parse_block_from_buffer(&self, buffer: &mut &[u8]) -> Result<Block> {
        let mut block = Block::new();

        // Read block info if supported
        if self.server_revision >= DBMS_MIN_REVISION_WITH_BLOCK_INFO {
            let info = self.read_block_info_from_buffer(buffer)?;
            block.set_info(info);
        }

        // Read column count and row count
        let num_columns = read_varint(buffer)? as usize;
        let num_rows = read_varint(buffer)? as usize;

        // Read each column
        for _ in 0..num_columns {
            let name = read_string(buffer)?;
            let type_name = read_string(buffer)?;

            // Check for custom serialization
            if self.server_revision >= DBMS_MIN_REVISION_WITH_CUSTOM_SERIALIZATION {
                if buffer.is_empty() {
                    return Err(Error::Protocol("Unexpected end of block data".to_string()));
                }
                let custom_len = buffer[0];
                buffer.advance(1);

                if custom_len > 0 {
                    return Err(Error::Protocol(
                        "Custom serialization not supported".to_string(),
                    ));
                }
            }

            // Parse the type
            let column_type = Type::parse(&type_name)?;

            // Create column and load data
            let mut column = create_column(&column_type)?;

            if num_rows > 0 {
                // Load column data from buffer
                Arc::get_mut(&mut column)
                    .ok_or_else(|| Error::Protocol("Column not mutable".to_string()))?
                    .load_from_buffer(buffer, num_rows)?;
            }

            block.append_column(name, column)?;
        }

        Ok(block)
    }

    /// Read block info from buffer
    fn read_block_info_from_buffer(&self, buffer: &mut &[u8]) -> Result<BlockInfo> {
        let _num1 = read_varint(buffer)?;

        if buffer.is_empty() {
            return Err(Error::Protocol("Unexpected end reading block info".to_string()));
        }
        let is_overflows = buffer[0];
        buffer.advance(1);

        let _num2 = read_varint(buffer)?;

        if buffer.len() < 4 {
            return Err(Error::Protocol("Unexpected end reading bucket_num".to_string()));
        }
        let bucket_num = i32::from_le_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]);
        buffer.advance(4);

        let _num3 = read_varint(buffer)?;

        Ok(BlockInfo {
            is_overflows,
            bucket_num,
        })
    }

}

/// Writer for blocks to network
pub struct BlockWriter {
    server_revision: u64,
    compression: Option<CompressionMethod>,
}

impl BlockWriter {
    /// Create a new block writer
    pub fn new(server_revision: u64) -> Self {
        Self {
            server_revision,
            compression: None,
        }
    }

    /// Enable compression
    pub fn with_compression(mut self, method: CompressionMethod) -> Self {
        self.compression = Some(method);
        self
    }

    /// Write a block to the connection
    pub async fn write_block(&self, conn: &mut Connection, block: &Block) -> Result<()> {
        tracing::debug!("Writing block: {} columns, {} rows", block.column_count(), block.row_count());

        // Skip temporary table name if protocol supports it
        if self.server_revision >= DBMS_MIN_REVISION_WITH_TEMPORARY_TABLES {
            tracing::debug!("Writing empty temp table name");
            conn.write_string("").await?;
        }

        // Serialize block to buffer
        let mut buffer = BytesMut::new();
        self.write_block_to_buffer(&mut buffer, block)?;
        tracing::debug!("Block serialized to {} bytes", buffer.len());

        // Compress if needed
        if let Some(compression_method) = self.compression {
            let compressed = compress(compression_method, &buffer)?;
            tracing::debug!("Compressed to {} bytes (includes 16-byte checksum + 9-byte header)", compressed.len());
            // Compressed data already includes checksum + header, write it directly
            conn.write_bytes(&compressed).await?;
        } else {
            // Write uncompressed
            tracing::debug!("Writing uncompressed block");
            conn.write_bytes(&buffer).await?;
        }

        conn.flush().await?;
        tracing::debug!("Block write complete");
        Ok(())
    }

    /// Write block to buffer
    fn write_block_to_buffer(&self, buffer: &mut BytesMut, block: &Block) -> Result<()> {
        // Write block info if supported
        if self.server_revision >= DBMS_MIN_REVISION_WITH_BLOCK_INFO {
            write_varint(buffer, 1);
            buffer.put_u8(block.info().is_overflows);
            write_varint(buffer, 2);
            buffer.put_i32_le(block.info().bucket_num);
            write_varint(buffer, 0);
        }

        // Write column count and row count
        write_varint(buffer, block.column_count() as u64);
        write_varint(buffer, block.row_count() as u64);

        // Write each column
        for (name, type_, column) in block.iter() {
            write_string(buffer, name);
            write_string(buffer, &type_.name());

            // Custom serialization flag
            if self.server_revision >= DBMS_MIN_REVISION_WITH_CUSTOM_SERIALIZATION {
                buffer.put_u8(0); // No custom serialization
            }

            // Write column data (only if rows > 0)
            if block.row_count() > 0 {
                column.save_to_buffer(buffer)?;
            }
        }

        Ok(())
    }
}

// Helper functions
fn read_varint(buffer: &mut &[u8]) -> Result<u64> {
    let mut result: u64 = 0;
    let mut shift = 0;

    loop {
        if buffer.is_empty() {
            return Err(Error::Protocol(
                "Unexpected end of buffer reading varint".to_string(),
            ));
        }

        let byte = buffer[0];
        buffer.advance(1);

        result |= ((byte & 0x7F) as u64) << shift;

        if byte & 0x80 == 0 {
            break;
        }

        shift += 7;
        if shift >= 64 {
            return Err(Error::Protocol("Varint overflow".to_string()));
        }
    }

    Ok(result)
}

fn write_varint(buffer: &mut BytesMut, mut value: u64) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;

        if value != 0 {
            byte |= 0x80;
        }

        buffer.put_u8(byte);

        if value == 0 {
            break;
        }
    }
}

fn read_string(buffer: &mut &[u8]) -> Result<String> {
    let len = read_varint(buffer)? as usize;

    if buffer.len() < len {
        return Err(Error::Protocol(format!(
            "Not enough data for string: need {}, have {}",
            len,
            buffer.len()
        )));
    }

    let string_data = &buffer[..len];
    let s = String::from_utf8(string_data.to_vec())
        .map_err(|e| Error::Protocol(format!("Invalid UTF-8 in string: {}", e)))?;

    buffer.advance(len);
    Ok(s)
}

fn write_string(buffer: &mut BytesMut, s: &str) {
    write_varint(buffer, s.len() as u64);
    buffer.put_slice(s.as_bytes());
}
