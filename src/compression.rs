use crate::{
    protocol::CompressionMethod,
    Error,
    Result,
};
use bytes::{
    Buf,
    BufMut,
    Bytes,
    BytesMut,
};
use cityhash_rs::cityhash_102_128;

/// Compression header size (9 bytes: 1 byte method + 4 bytes compressed + 4
/// bytes uncompressed)
const HEADER_SIZE: usize = 9;

/// Checksum size (16 bytes for CityHash128)
const CHECKSUM_SIZE: usize = 16;

/// Compression method byte values (from ClickHouse CompressionMethodByte)
#[repr(u8)]
enum CompressionMethodByte {
    None = 0x02,
    LZ4 = 0x82,
    ZSTD = 0x90,
}

/// Maximum compressed block size (1GB)
const MAX_COMPRESSED_SIZE: usize = 0x40000000;

/// Write a CityHash128 checksum in the wire's canonical byte layout.
///
/// ClickHouse's `CityHash_v1_0_2::uint128` is `(low64, high64)`; the native
/// protocol writes the two halves as separate little-endian u64s in that
/// field order. This is the one place that encoding happens, used
/// identically by every compression method (including `None`).
fn write_checksum(buffer: &mut BytesMut, checksum: u128) {
    buffer.put_u64_le(checksum as u64); // low64
    buffer.put_u64_le((checksum >> 64) as u64); // high64
}

fn read_checksum(buffer: &[u8]) -> u128 {
    let low = u64::from_le_bytes(buffer[0..8].try_into().unwrap());
    let high = u64::from_le_bytes(buffer[8..16].try_into().unwrap());
    ((high as u128) << 64) | (low as u128)
}

/// Compress data using the specified method
pub fn compress(method: CompressionMethod, data: &[u8]) -> Result<Bytes> {
    match method {
        CompressionMethod::None => {
            // No compression, but still add header and checksum
            compress_none(data)
        }
        CompressionMethod::Lz4 => compress_lz4(data),
        CompressionMethod::Zstd => compress_zstd(data),
    }
}

/// Decompress data (auto-detects compression method from header)
///
/// Verifies the CityHash128 checksum over `method || compressedSize ||
/// uncompressedSize || payload` before decompressing; a mismatch is a
/// [`Error::ChecksumMismatch`], not a silent pass-through.
pub fn decompress(data: &[u8]) -> Result<Bytes> {
    if data.len() < CHECKSUM_SIZE + HEADER_SIZE {
        return Err(Error::Compression(
            "Data too small for checksum and compression header".to_string(),
        ));
    }

    let expected_checksum = read_checksum(&data[..CHECKSUM_SIZE]);
    let data_without_checksum = &data[CHECKSUM_SIZE..];

    let method = data_without_checksum[0];
    let mut reader = &data_without_checksum[1..];

    // Read compressed size (4 bytes) and uncompressed size (4 bytes)
    let compressed_size = reader.get_u32_le() as usize;
    let uncompressed_size = reader.get_u32_le() as usize;

    // Validate sizes
    if compressed_size > MAX_COMPRESSED_SIZE {
        return Err(Error::Compression(format!(
            "Compressed size too large: {}",
            compressed_size
        )));
    }

    if uncompressed_size > MAX_COMPRESSED_SIZE {
        return Err(Error::Compression(format!(
            "Uncompressed size too large: {}",
            uncompressed_size
        )));
    }

    if data_without_checksum.len() < compressed_size {
        return Err(Error::Compression(format!(
            "Truncated compressed frame: declared {} bytes, have {}",
            compressed_size,
            data_without_checksum.len()
        )));
    }

    let actual_checksum =
        cityhash_102_128(&data_without_checksum[..compressed_size]);
    if actual_checksum != expected_checksum {
        return Err(Error::ChecksumMismatch {
            expected: expected_checksum,
            actual: actual_checksum,
        });
    }

    // The remaining data after header
    let compressed_data = &data_without_checksum[HEADER_SIZE..compressed_size];

    match method {
        0x02 => {
            // No compression
            if compressed_data.len() != uncompressed_size {
                return Err(Error::Compression(format!(
                    "Uncompressed data size mismatch: expected {}, got {}",
                    uncompressed_size,
                    compressed_data.len()
                )));
            }
            Ok(Bytes::copy_from_slice(compressed_data))
        }
        0x82 => {
            // LZ4
            decompress_lz4(compressed_data, uncompressed_size)
        }
        0x90 => {
            // ZSTD
            decompress_zstd(compressed_data, uncompressed_size)
        }
        _ => Err(Error::Compression(format!(
            "Unknown compression method: 0x{:02x}",
            method
        ))),
    }
}

/// Compress using LZ4
fn compress_lz4(data: &[u8]) -> Result<Bytes> {
    let max_compressed_size = lz4::block::compress_bound(data.len())?;
    let mut compressed = vec![0u8; max_compressed_size];

    let compressed_size =
        lz4::block::compress_to_buffer(data, None, false, &mut compressed)?;

    compressed.truncate(compressed_size);

    frame(CompressionMethodByte::LZ4 as u8, data.len(), &compressed)
}

/// Decompress LZ4 data
fn decompress_lz4(data: &[u8], uncompressed_size: usize) -> Result<Bytes> {
    let decompressed =
        lz4::block::decompress(data, Some(uncompressed_size as i32))?;

    if decompressed.len() != uncompressed_size {
        return Err(Error::Compression(format!(
            "LZ4 decompression size mismatch: expected {}, got {}",
            uncompressed_size,
            decompressed.len()
        )));
    }

    Ok(Bytes::from(decompressed))
}

/// Compress using ZSTD
fn compress_zstd(data: &[u8]) -> Result<Bytes> {
    let compressed = zstd::bulk::compress(data, 3) // Compression level 3
        .map_err(|e| {
            Error::Compression(format!("ZSTD compression failed: {}", e))
        })?;

    frame(CompressionMethodByte::ZSTD as u8, data.len(), &compressed)
}

/// Decompress ZSTD data
fn decompress_zstd(data: &[u8], uncompressed_size: usize) -> Result<Bytes> {
    let decompressed = zstd::bulk::decompress(data, uncompressed_size)
        .map_err(|e| {
            Error::Compression(format!("ZSTD decompression failed: {}", e))
        })?;

    if decompressed.len() != uncompressed_size {
        return Err(Error::Compression(format!(
            "ZSTD decompression size mismatch: expected {}, got {}",
            uncompressed_size,
            decompressed.len()
        )));
    }

    Ok(Bytes::from(decompressed))
}

/// No compression (just adds header)
fn compress_none(data: &[u8]) -> Result<Bytes> {
    frame(CompressionMethodByte::None as u8, data.len(), data)
}

/// Build `checksum || method || compressedSize || uncompressedSize ||
/// payload`, shared by every compression method so the checksum encoding
/// stays in one place.
fn frame(method_byte: u8, uncompressed_len: usize, payload: &[u8]) -> Result<Bytes> {
    let mut header_and_data =
        BytesMut::with_capacity(HEADER_SIZE + payload.len());

    header_and_data.put_u8(method_byte);
    header_and_data.put_u32_le((HEADER_SIZE + payload.len()) as u32);
    header_and_data.put_u32_le(uncompressed_len as u32);
    header_and_data.put_slice(payload);

    let checksum = cityhash_102_128(&header_and_data);

    let mut output =
        BytesMut::with_capacity(CHECKSUM_SIZE + header_and_data.len());
    write_checksum(&mut output, checksum);
    output.put_slice(&header_and_data);

    Ok(output.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_decompress_none() {
        let original = b"Hello, ClickHouse!";

        let compressed = compress(CompressionMethod::None, original).unwrap();
        let decompressed = decompress(&compressed).unwrap();

        assert_eq!(&decompressed[..], original);
    }

    #[test]
    fn test_compress_decompress_lz4() {
        let original = b"Hello, ClickHouse! ".repeat(100);

        let compressed = compress(CompressionMethod::Lz4, &original).unwrap();
        let decompressed = decompress(&compressed).unwrap();

        assert_eq!(&decompressed[..], &original[..]);

        // Should achieve some compression
        assert!(compressed.len() < original.len());
    }

    #[test]
    fn test_compress_decompress_zstd() {
        let original =
            b"ClickHouse is a fast open-source column-oriented database"
                .repeat(50);

        let compressed = compress(CompressionMethod::Zstd, &original).unwrap();
        let decompressed = decompress(&compressed).unwrap();

        assert_eq!(&decompressed[..], &original[..]);

        // Should achieve good compression
        assert!(compressed.len() < original.len());
    }

    #[test]
    fn test_empty_data() {
        let original = b"";

        // Should work with empty data
        let compressed = compress(CompressionMethod::Lz4, original).unwrap();
        let decompressed = decompress(&compressed).unwrap();

        assert_eq!(&decompressed[..], original);
    }

    #[test]
    fn test_large_data_lz4() {
        // Test with larger data
        let original = vec![42u8; 100_000];

        let compressed = compress(CompressionMethod::Lz4, &original).unwrap();
        let decompressed = decompress(&compressed).unwrap();

        assert_eq!(&decompressed[..], &original[..]);

        // Should compress very well (all same byte)
        assert!(compressed.len() < original.len() / 10);
    }

    #[test]
    fn test_invalid_compression_method() {
        // Valid checksum over an invalid method byte, so the checksum check
        // passes and the method-dispatch error is what surfaces.
        let mut header_and_data = BytesMut::new();
        header_and_data.put_u8(0xFF);
        header_and_data.put_u32_le(19);
        header_and_data.put_u32_le(10);
        header_and_data.put_slice(b"0123456789");
        let checksum = cityhash_102_128(&header_and_data);

        let mut bad_data = BytesMut::new();
        write_checksum(&mut bad_data, checksum);
        bad_data.put_slice(&header_and_data);

        let result = decompress(&bad_data);
        assert!(matches!(result, Err(Error::Compression(_))));
    }

    #[test]
    fn test_header_too_small() {
        let bad_data = vec![0x82, 1, 2, 3]; // Only 4 bytes, need checksum + header

        let result = decompress(&bad_data);
        assert!(result.is_err());
    }

    #[test]
    fn test_checksum_mismatch_detected() {
        let original = b"Hello, ClickHouse! ".repeat(10);
        let mut compressed =
            compress(CompressionMethod::Lz4, &original).unwrap().to_vec();

        // Flip a bit in the checksum
        compressed[0] ^= 0xFF;

        let result = decompress(&compressed);
        assert!(matches!(result, Err(Error::ChecksumMismatch { .. })));
    }
}
