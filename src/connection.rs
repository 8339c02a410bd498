use crate::wire_format::WireFormat;
use crate::{Error, Result};
use bytes::Bytes;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;

#[cfg(feature = "tls")]
use crate::ssl::SSLOptions;
#[cfg(feature = "tls")]
use std::convert::TryFrom;
#[cfg(feature = "tls")]
use tokio_rustls::TlsConnector;

/// Default buffer sizes for reading and writing
const DEFAULT_READ_BUFFER_SIZE: usize = 8192;
const DEFAULT_WRITE_BUFFER_SIZE: usize = 8192;

/// Connect, read, and query deadlines applied to a session.
///
/// Each deadline is independently optional; `None` means wait indefinitely.
#[derive(Clone, Debug, Default)]
pub struct ConnectionOptions {
    /// Deadline for establishing the TCP (or TLS) connection.
    pub connect_timeout: Option<Duration>,
    /// Deadline for a single socket read.
    pub read_timeout: Option<Duration>,
    /// Deadline for a query to complete end to end.
    pub query_timeout: Option<Duration>,
}

impl ConnectionOptions {
    /// Create a new, unconstrained set of connection options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connect deadline.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the per-read deadline.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Set the end-to-end query deadline.
    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }
}

/// Anything a [`Connection`] can be built on top of: a plain TCP socket or,
/// with the `tls` feature, a TLS session wrapping one.
pub trait AsyncStream: AsyncRead + AsyncWrite + Unpin + Send {}
impl<T: AsyncRead + AsyncWrite + Unpin + Send> AsyncStream for T {}

type BoxedReadHalf = Box<dyn tokio::io::AsyncRead + Unpin + Send>;
type BoxedWriteHalf = Box<dyn tokio::io::AsyncWrite + Unpin + Send>;

/// Async connection wrapper for a ClickHouse transport (TCP, optionally TLS)
/// This is the async I/O boundary - all socket operations are async
pub struct Connection {
    reader: BufReader<BoxedReadHalf>,
    writer: BufWriter<BoxedWriteHalf>,
}

impl Connection {
    /// Create a new connection from any stream implementing [`AsyncStream`]
    pub fn new<S>(stream: S) -> Self
    where
        S: AsyncStream + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);

        Self {
            reader: BufReader::with_capacity(
                DEFAULT_READ_BUFFER_SIZE,
                Box::new(read_half) as BoxedReadHalf,
            ),
            writer: BufWriter::with_capacity(
                DEFAULT_WRITE_BUFFER_SIZE,
                Box::new(write_half) as BoxedWriteHalf,
            ),
        }
    }

    /// Open a plain TCP connection to a ClickHouse server
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        Self::connect_with_options(host, port, &ConnectionOptions::default()).await
    }

    /// Open a plain TCP connection, applying the connect deadline from
    /// `options` if one is set.
    pub async fn connect_with_options(
        host: &str,
        port: u16,
        options: &ConnectionOptions,
    ) -> Result<Self> {
        let stream = Self::connect_tcp(host, port, options.connect_timeout).await?;
        Ok(Self::new(stream))
    }

    /// Open a TLS connection to a ClickHouse server
    #[cfg(feature = "tls")]
    pub async fn connect_tls(
        host: &str,
        port: u16,
        ssl_options: &SSLOptions,
    ) -> Result<Self> {
        Self::connect_tls_with_options(host, port, ssl_options, &ConnectionOptions::default())
            .await
    }

    /// Open a TLS connection, applying the connect deadline from `options`
    /// if one is set. The deadline covers both the TCP connect and the TLS
    /// handshake.
    #[cfg(feature = "tls")]
    pub async fn connect_tls_with_options(
        host: &str,
        port: u16,
        ssl_options: &SSLOptions,
        options: &ConnectionOptions,
    ) -> Result<Self> {
        let handshake = async {
            let stream = Self::connect_tcp(host, port, None).await?;

            let config = ssl_options.build_client_config()?;
            let connector = TlsConnector::from(config);

            let server_name = ssl_options.server_name.as_deref().unwrap_or(host);
            let dns_name = rustls::ServerName::try_from(server_name).map_err(|e| {
                Error::Connection(format!("Invalid TLS server name {:?}: {}", server_name, e))
            })?;

            let tls_stream = connector.connect(dns_name, stream).await.map_err(|e| {
                Error::Connection(format!("TLS handshake with {}:{} failed: {}", host, port, e))
            })?;

            tracing::debug!("TLS handshake with {}:{} completed", host, port);

            Ok(tls_stream)
        };

        let tls_stream = match options.connect_timeout {
            Some(timeout) => tokio::time::timeout(timeout, handshake)
                .await
                .map_err(|_| {
                    Error::DeadlineElapsed(format!(
                        "TLS connect to {}:{} exceeded {:?}",
                        host, port, timeout
                    ))
                })??,
            None => handshake.await?,
        };

        Ok(Self::new(tls_stream))
    }

    async fn connect_tcp(
        host: &str,
        port: u16,
        connect_timeout: Option<Duration>,
    ) -> Result<TcpStream> {
        let addr = format!("{}:{}", host, port);

        let connect = TcpStream::connect(&addr);
        let stream = match connect_timeout {
            Some(timeout) => tokio::time::timeout(timeout, connect)
                .await
                .map_err(|_| {
                    Error::DeadlineElapsed(format!(
                        "connect to {} exceeded {:?}",
                        addr, timeout
                    ))
                })?
                .map_err(|e| {
                    Error::Connection(format!("Failed to connect to {}: {}", addr, e))
                })?,
            None => connect.await.map_err(|e| {
                Error::Connection(format!("Failed to connect to {}: {}", addr, e))
            })?,
        };

        // Enable TCP_NODELAY for lower latency
        stream
            .set_nodelay(true)
            .map_err(|e| Error::Connection(format!("Failed to set TCP_NODELAY: {}", e)))?;

        Ok(stream)
    }

    /// Read a varint-encoded u64
    pub async fn read_varint(&mut self) -> Result<u64> {
        WireFormat::read_varint64(&mut self.reader).await
    }

    /// Write a varint-encoded u64
    pub async fn write_varint(&mut self, value: u64) -> Result<()> {
        WireFormat::write_varint64(&mut self.writer, value).await
    }

    /// Read a fixed-size value
    pub async fn read_u8(&mut self) -> Result<u8> {
        Ok(self.reader.read_u8().await?)
    }

    pub async fn read_u16(&mut self) -> Result<u16> {
        Ok(self.reader.read_u16_le().await?)
    }

    pub async fn read_u32(&mut self) -> Result<u32> {
        Ok(self.reader.read_u32_le().await?)
    }

    pub async fn read_u64(&mut self) -> Result<u64> {
        Ok(self.reader.read_u64_le().await?)
    }

    pub async fn read_i8(&mut self) -> Result<i8> {
        Ok(self.reader.read_i8().await?)
    }

    pub async fn read_i16(&mut self) -> Result<i16> {
        Ok(self.reader.read_i16_le().await?)
    }

    pub async fn read_i32(&mut self) -> Result<i32> {
        Ok(self.reader.read_i32_le().await?)
    }

    pub async fn read_i64(&mut self) -> Result<i64> {
        Ok(self.reader.read_i64_le().await?)
    }

    /// Write fixed-size values
    pub async fn write_u8(&mut self, value: u8) -> Result<()> {
        Ok(self.writer.write_u8(value).await?)
    }

    pub async fn write_u16(&mut self, value: u16) -> Result<()> {
        Ok(self.writer.write_u16_le(value).await?)
    }

    pub async fn write_u32(&mut self, value: u32) -> Result<()> {
        Ok(self.writer.write_u32_le(value).await?)
    }

    pub async fn write_u64(&mut self, value: u64) -> Result<()> {
        Ok(self.writer.write_u64_le(value).await?)
    }

    pub async fn write_i8(&mut self, value: i8) -> Result<()> {
        Ok(self.writer.write_i8(value).await?)
    }

    pub async fn write_i16(&mut self, value: i16) -> Result<()> {
        Ok(self.writer.write_i16_le(value).await?)
    }

    pub async fn write_i32(&mut self, value: i32) -> Result<()> {
        Ok(self.writer.write_i32_le(value).await?)
    }

    pub async fn write_i64(&mut self, value: i64) -> Result<()> {
        Ok(self.writer.write_i64_le(value).await?)
    }

    /// Read a length-prefixed string
    pub async fn read_string(&mut self) -> Result<String> {
        WireFormat::read_string(&mut self.reader).await
    }

    /// Write a length-prefixed string
    pub async fn write_string(&mut self, s: &str) -> Result<()> {
        WireFormat::write_string(&mut self.writer, s).await
    }

    /// Read exact number of bytes into a buffer
    pub async fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        let mut buf = vec![0u8; len];
        self.reader.read_exact(&mut buf).await?;
        Ok(Bytes::from(buf))
    }

    /// Read bytes into an existing buffer
    pub async fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.reader.read_exact(buf).await?;
        Ok(())
    }

    /// Write bytes
    pub async fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        Ok(self.writer.write_all(data).await?)
    }

    /// Flush the write buffer
    pub async fn flush(&mut self) -> Result<()> {
        Ok(self.writer.flush().await?)
    }

    /// Read a complete packet (length-prefixed data)
    /// Returns the packet data without the length prefix
    pub async fn read_packet(&mut self) -> Result<Bytes> {
        let len = self.read_varint().await? as usize;

        if len == 0 {
            return Ok(Bytes::new());
        }

        if len > 0x40000000 {
            // 1GB limit
            return Err(Error::Protocol(format!("Packet too large: {}", len)));
        }

        self.read_bytes(len).await
    }

    /// Write a packet with length prefix
    pub async fn write_packet(&mut self, data: &[u8]) -> Result<()> {
        self.write_varint(data.len() as u64).await?;
        self.write_bytes(data).await?;
        Ok(())
    }

    /// Get access to the underlying reader (for advanced use)
    pub fn reader_mut(&mut self) -> &mut BufReader<BoxedReadHalf> {
        &mut self.reader
    }

    /// Get access to the underlying writer (for advanced use)
    pub fn writer_mut(&mut self) -> &mut BufWriter<BoxedWriteHalf> {
        &mut self.writer
    }
}
