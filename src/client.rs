use crate::block::Block;
use crate::connection::{Connection, ConnectionOptions};
use crate::io::{BlockReader, BlockWriter};
use crate::protocol::{ClientCode, CompressionMethod, ServerCode};
use crate::query::{ClientInfo, ExternalTable, Profile, Progress, Query, ServerInfo};
use crate::{Error, Result};

/// Session state. Every public operation that talks to the wire checks its
/// precondition against this before issuing a packet; violations fail fast
/// with [`Error::Usage`] rather than confusing the server with an
/// out-of-sequence packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionState {
    /// Handshake complete, no query in flight.
    Ready,
    /// A query has been dispatched and the response is being read.
    Streaming,
    /// A transport or protocol error left the session unusable.
    Failed,
}

/// Client options
#[derive(Clone, Debug)]
pub struct ClientOptions {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database name
    pub database: String,
    /// Username
    pub user: String,
    /// Password
    pub password: String,
    /// Compression method
    pub compression: Option<CompressionMethod>,
    /// Client information
    pub client_info: ClientInfo,
    /// Connect/read/query deadlines
    pub connection_options: ConnectionOptions,
    /// TLS options; when set, the connection is established over TLS
    /// instead of plain TCP (requires the `tls` feature)
    #[cfg(feature = "tls")]
    pub ssl_options: Option<crate::ssl::SSLOptions>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9000,
            database: "default".to_string(),
            user: "default".to_string(),
            password: String::new(),
            compression: Some(CompressionMethod::Lz4),
            client_info: ClientInfo::default(),
            connection_options: ConnectionOptions::default(),
            #[cfg(feature = "tls")]
            ssl_options: None,
        }
    }
}

impl ClientOptions {
    /// Create new client options with host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the database
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set the username
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Set the password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set compression method
    pub fn compression(mut self, method: Option<CompressionMethod>) -> Self {
        self.compression = method;
        self
    }

    /// Enable TLS for this connection
    #[cfg(feature = "tls")]
    pub fn ssl_options(mut self, options: crate::ssl::SSLOptions) -> Self {
        self.ssl_options = Some(options);
        self
    }

    /// Set connect/read/query deadlines
    pub fn connection_options(mut self, options: ConnectionOptions) -> Self {
        self.connection_options = options;
        self
    }
}

/// ClickHouse client
pub struct Client {
    conn: Connection,
    server_info: ServerInfo,
    block_reader: BlockReader,
    block_writer: BlockWriter,
    options: ClientOptions,
    state: SessionState,
}

impl Client {
    /// Connect to ClickHouse server
    pub async fn connect(options: ClientOptions) -> Result<Self> {
        #[cfg(feature = "tls")]
        let mut conn = match &options.ssl_options {
            Some(ssl_options) => {
                Connection::connect_tls_with_options(
                    &options.host,
                    options.port,
                    ssl_options,
                    &options.connection_options,
                )
                .await?
            }
            None => {
                Connection::connect_with_options(
                    &options.host,
                    options.port,
                    &options.connection_options,
                )
                .await?
            }
        };
        #[cfg(not(feature = "tls"))]
        let mut conn = Connection::connect_with_options(
            &options.host,
            options.port,
            &options.connection_options,
        )
        .await?;

        // Send hello
        Self::send_hello(&mut conn, &options).await?;

        // Receive hello
        let server_info = Self::receive_hello(&mut conn).await?;

        // Send addendum (quota key) if server supports it
        // DBMS_MIN_PROTOCOL_VERSION_WITH_ADDENDUM = 54458
        if server_info.revision >= 54458 {
            tracing::debug!("Sending quota key addendum (empty string)...");
            conn.write_string("").await?;
            conn.flush().await?;
            tracing::debug!("Addendum sent");
        }

        // Create block reader/writer with compression
        let mut block_reader = BlockReader::new(server_info.revision);
        let mut block_writer = BlockWriter::new(server_info.revision);

        // Enable compression on both reader and writer
        if let Some(compression) = options.compression {
            block_reader = block_reader.with_compression(compression);
            block_writer = block_writer.with_compression(compression);
        }

        Ok(Self {
            conn,
            server_info,
            block_reader,
            block_writer,
            options,
            state: SessionState::Ready,
        })
    }

    /// Fail fast with [`Error::Usage`] if the session is not ready to accept
    /// a new operation (e.g. a query already in flight, or a prior failure).
    fn check_ready(&self) -> Result<()> {
        match self.state {
            SessionState::Ready => Ok(()),
            SessionState::Streaming => Err(Error::Usage(
                "a query is already streaming on this session".to_string(),
            )),
            SessionState::Failed => {
                Err(Error::Usage("session is in a failed state".to_string()))
            }
        }
    }

    /// Read and discard packets until `EndOfStream`, used to resynchronize
    /// the stream after a server `Exception` so a subsequent query can be
    /// issued on the same session.
    async fn drain_until_end_of_stream(&mut self) -> Result<()> {
        loop {
            let packet_type = self.conn.read_varint().await?;
            match packet_type {
                code if code == ServerCode::EndOfStream as u64 => return Ok(()),
                code if code == ServerCode::Data as u64 => {
                    if self.server_info.revision >= 50264 {
                        let _temp_table = self.conn.read_string().await?;
                    }
                    let _block = self.block_reader.read_block(&mut self.conn).await?;
                }
                code if code == ServerCode::Progress as u64 => {
                    let _ = self.read_progress().await?;
                }
                code if code == ServerCode::ProfileInfo as u64 => {
                    let _ = self.read_profile().await?;
                }
                code if code == ServerCode::Log as u64 => {
                    let _log_tag = self.conn.read_string().await?;
                    let uncompressed_reader = BlockReader::new(self.server_info.revision);
                    let _block = uncompressed_reader.read_block(&mut self.conn).await?;
                }
                code if code == ServerCode::ProfileEvents as u64 => {
                    let _table_name = self.conn.read_string().await?;
                    let uncompressed_reader = BlockReader::new(self.server_info.revision);
                    let _block = uncompressed_reader.read_block(&mut self.conn).await?;
                }
                code if code == ServerCode::TableColumns as u64 => {
                    let _table_name = self.conn.read_string().await?;
                    let _columns_metadata = self.conn.read_string().await?;
                }
                code if code == ServerCode::Exception as u64 => {
                    // A second exception while draining; keep draining past it.
                    let _ = self.read_exception().await?;
                }
                other => {
                    return Err(Error::Protocol(format!(
                        "Unexpected packet type while draining after exception: {}",
                        other
                    )));
                }
            }
        }
    }

    /// Send hello packet
    async fn send_hello(conn: &mut Connection, options: &ClientOptions) -> Result<()> {
        tracing::debug!("Sending client hello...");
        // Write client hello code
        conn.write_varint(ClientCode::Hello as u64).await?;
        tracing::debug!("Sent hello code");

        // Write client name and version
        conn.write_string(&options.client_info.client_name).await?;
        tracing::debug!("Sent client name: {}", options.client_info.client_name);
        conn.write_varint(options.client_info.client_version_major)
            .await?;
        conn.write_varint(options.client_info.client_version_minor)
            .await?;
        conn.write_varint(options.client_info.client_revision)
            .await?;
        tracing::debug!("Sent version: {}.{}.{}",
            options.client_info.client_version_major,
            options.client_info.client_version_minor,
            options.client_info.client_revision);

        // Write database, user, password
        conn.write_string(&options.database).await?;
        conn.write_string(&options.user).await?;
        conn.write_string(&options.password).await?;
        tracing::debug!("Sent credentials");

        conn.flush().await?;
        tracing::debug!("Flushed");
        Ok(())
    }

    /// Receive hello packet from server
    async fn receive_hello(conn: &mut Connection) -> Result<ServerInfo> {
        tracing::debug!("Reading server hello...");
        let packet_type = conn.read_varint().await?;
        tracing::debug!("Got packet type: {}", packet_type);

        if packet_type != ServerCode::Hello as u64 {
            if packet_type == ServerCode::Exception as u64 {
                tracing::warn!("Server sent exception during handshake");
                return Err(Error::Protocol("Server returned exception during handshake".to_string()));
            }
            tracing::debug!("Unexpected packet type: {}", packet_type);
            return Err(Error::Protocol(format!(
                "Expected Hello packet, got {}",
                packet_type
            )));
        }

        // Read server info
        tracing::debug!("Reading server info...");
        let name = conn.read_string().await?;
        tracing::debug!("Server name: {}", name);
        let version_major = conn.read_varint().await?;
        let version_minor = conn.read_varint().await?;
        let revision = conn.read_varint().await?;
        tracing::debug!("Server version: {}.{}, revision: {}",version_major, version_minor, revision);

        let timezone = if revision >= 54058 {
            tracing::debug!("Reading timezone...");
            conn.read_string().await?
        } else {
            String::new()
        };

        let display_name = if revision >= 54372 {
            tracing::debug!("Reading display name...");
            conn.read_string().await?
        } else {
            String::new()
        };

        let version_patch = if revision >= 54401 {
            tracing::debug!("Reading version patch...");
            conn.read_varint().await?
        } else {
            0
        };

        tracing::debug!("Server hello complete!");
        Ok(ServerInfo {
            name,
            version_major,
            version_minor,
            version_patch,
            revision,
            timezone,
            display_name,
        })
    }

    /// Execute a query and return results
    pub async fn query(&mut self, query: impl Into<Query>) -> Result<QueryResult> {
        self.query_with_external_data(query, &[]).await
    }

    /// Execute a query with an explicit query ID and return results
    pub async fn query_with_id(
        &mut self,
        query_text: impl Into<String>,
        query_id: impl Into<String>,
    ) -> Result<QueryResult> {
        self.query(Query::new(query_text).with_query_id(query_id)).await
    }

    /// Execute a query, making the given blocks available as named
    /// temporary tables for the duration of the query (e.g. to `JOIN`
    /// against client-supplied rows)
    pub async fn query_with_external_data(
        &mut self,
        query: impl Into<Query>,
        external_tables: &[ExternalTable],
    ) -> Result<QueryResult> {
        self.check_ready()?;
        let query = query.into();

        if let Err(e) = self.send_query_with_external(&query, external_tables).await {
            self.state = SessionState::Failed;
            return Err(e);
        }
        self.state = SessionState::Streaming;

        let result = self.read_query_response(&query).await;
        match &result {
            Ok(_) => self.state = SessionState::Ready,
            Err(Error::Server { .. }) => self.state = SessionState::Ready,
            Err(_) => self.state = SessionState::Failed,
        }
        result
    }

    async fn read_query_response(&mut self, query: &Query) -> Result<QueryResult> {
        let mut blocks = Vec::new();
        let mut progress_info = Progress::default();
        let mut cancelled = false;

        loop {
            let packet_type = self.conn.read_varint().await?;
            tracing::debug!("Query response packet: {}", packet_type);

            match packet_type {
                code if code == ServerCode::Data as u64 => {
                    tracing::debug!("Received data packet");
                    // Skip temp table name if protocol supports it (matches C++ ReceiveData)
                    if self.server_info.revision >= 50264 { // DBMS_MIN_REVISION_WITH_TEMPORARY_TABLES
                        let _temp_table = self.conn.read_string().await?;
                    }
                    let block = self.block_reader.read_block(&mut self.conn).await?;
                    if !block.is_empty() {
                        if let Some(cb) = query.get_on_data() {
                            cb(&block);
                        }
                        let keep_going = match query.get_on_data_cancelable() {
                            Some(cb) => cb(&block),
                            None => true,
                        };
                        blocks.push(block);
                        if !keep_going && !cancelled {
                            tracing::debug!("Cancelable data callback requested cancellation");
                            self.conn.write_varint(ClientCode::Cancel as u64).await?;
                            self.conn.flush().await?;
                            cancelled = true;
                        }
                    }
                }
                code if code == ServerCode::Progress as u64 => {
                    tracing::debug!("Received progress packet");
                    progress_info = self.read_progress().await?;
                    if let Some(cb) = query.get_on_progress() {
                        cb(&progress_info);
                    }
                }
                code if code == ServerCode::EndOfStream as u64 => {
                    tracing::debug!("Received end of stream");
                    break;
                }
                code if code == ServerCode::ProfileInfo as u64 => {
                    tracing::debug!("Received profile info packet");
                    let profile = self.read_profile().await?;
                    if let Some(cb) = query.get_on_profile() {
                        cb(&profile);
                    }
                }
                code if code == ServerCode::Log as u64 => {
                    tracing::debug!("Received log packet");
                    let _log_tag = self.conn.read_string().await?;
                    let uncompressed_reader = BlockReader::new(self.server_info.revision);
                    let block = uncompressed_reader.read_block(&mut self.conn).await?;
                    if let Some(cb) = query.get_on_server_log() {
                        cb(&block);
                    }
                }
                code if code == ServerCode::ProfileEvents as u64 => {
                    tracing::debug!("Received profile events packet");
                    let _table_name = self.conn.read_string().await?;
                    let uncompressed_reader = BlockReader::new(self.server_info.revision);
                    let block = uncompressed_reader.read_block(&mut self.conn).await?;
                    if let Some(cb) = query.get_on_profile_events() {
                        cb(&block);
                    }
                }
                code if code == ServerCode::TableColumns as u64 => {
                    tracing::debug!("Received table columns packet (ignoring)");
                    let _table_name = self.conn.read_string().await?;
                    let _columns_metadata = self.conn.read_string().await?;
                }
                code if code == ServerCode::Exception as u64 => {
                    tracing::warn!("Server returned exception during query, reading details");
                    let exception = self.read_exception().await?;
                    tracing::warn!("Exception: code={}, name={}, msg={}",
                        exception.code, exception.name, exception.display_text);
                    if let Some(cb) = query.get_on_exception() {
                        cb(&exception);
                    }
                    self.drain_until_end_of_stream().await?;
                    return Err(Error::Server {
                        code: exception.code,
                        message: format!("{}: {}", exception.name, exception.display_text),
                    });
                }
                other => {
                    tracing::debug!("Unexpected packet type: {}", other);
                    return Err(Error::Protocol(format!("Unexpected packet type: {}", other)));
                }
            }
        }

        Ok(QueryResult {
            blocks,
            progress: progress_info,
        })
    }

    /// Send a query packet
    async fn send_query(&mut self, query: &Query) -> Result<()> {
        self.send_query_with_external(query, &[]).await
    }

    async fn send_query_with_external(
        &mut self,
        query: &Query,
        external_tables: &[ExternalTable],
    ) -> Result<()> {
        tracing::debug!("Sending query: {}", query.text());
        // Write query code
        self.conn.write_varint(ClientCode::Query as u64).await?;

        // Write query ID
        self.conn.write_string(query.id()).await?;
        tracing::debug!("Sent query ID");

        // Client info
        let revision = self.server_info.revision;
        if revision >= 54032 {
            tracing::debug!("Writing client info...");
            let info = &self.options.client_info;

            // Write client info fields in the correct order
            self.conn.write_u8(1).await?; // query_kind = 1 (initial query)
            self.conn.write_string(&info.initial_user).await?;
            self.conn.write_string(&info.initial_query_id).await?;
            self.conn.write_string("127.0.0.1:0").await?; // initial_address (client address:port)

            if revision >= 54449 {
                self.conn.write_i64(0).await?; // initial_query_start_time
            }

            self.conn.write_u8(info.interface_type).await?; // interface type (1 = TCP)
            self.conn.write_string(&info.os_user).await?;
            self.conn.write_string(&info.client_hostname).await?;
            self.conn.write_string(&info.client_name).await?;
            self.conn.write_varint(info.client_version_major).await?;
            self.conn.write_varint(info.client_version_minor).await?;
            self.conn.write_varint(info.client_revision).await?;

            if revision >= 54060 {
                self.conn.write_string(&info.quota_key).await?;
            }
            if revision >= 54448 {
                self.conn.write_varint(0).await?; // distributed_depth
            }
            if revision >= 54401 {
                self.conn.write_varint(info.client_version_patch).await?;
            }
            if revision >= 54442 {
                self.conn.write_u8(0).await?; // no OpenTelemetry
            }
            if revision >= 54453 {
                self.conn.write_varint(0).await?; // collaborate_with_initiator
                self.conn.write_varint(0).await?; // count_participating_replicas
                self.conn.write_varint(0).await?; // number_of_current_replica
            }

            tracing::debug!("Client info sent");
        }

        // Settings
        if revision >= 54429 {
            tracing::debug!("Writing settings...");
            for (key, value) in query.settings() {
                self.conn.write_string(key).await?;
                self.conn.write_varint(query.setting_flags(key) as u64).await?;
                self.conn.write_string(value).await?;
            }
        }
        // Empty string to mark end of settings
        self.conn.write_string("").await?;
        tracing::debug!("Settings sent");

        // Interserver secret (for servers >= 54441)
        if revision >= 54441 {
            self.conn.write_string("").await?; // empty interserver secret
        }

        // Query stage, compression, text
        tracing::debug!("Writing query stage and text...");
        self.conn.write_varint(2).await?; // Stage = Complete
        // Enable compression if we have it configured
        let compression_enabled = if self.options.compression.is_some() { 1u64 } else { 0u64 };
        self.conn.write_varint(compression_enabled).await?;
        self.conn.write_string(query.text()).await?;

        // Query parameters (for servers >= 54459)
        if revision >= 54459 {
            for (key, value) in query.parameters() {
                self.conn.write_string(key).await?;
                self.conn.write_varint(2).await?; // Custom type
                self.conn.write_string(value).await?;
            }
            // Empty string to mark end of parameters
            self.conn.write_string("").await?;
        }

        // Create writer that matches the compression setting
        let writer = if self.options.compression.is_some() {
            BlockWriter::new(self.server_info.revision)
                .with_compression(self.options.compression.unwrap())
        } else {
            BlockWriter::new(self.server_info.revision)
        };

        // Send each external table as a named Data packet
        for table in external_tables {
            tracing::debug!("Sending external table '{}'...", table.name);
            self.conn.write_varint(ClientCode::Data as u64).await?;
            if revision >= 50264 {
                self.conn.write_string(&table.name).await?;
            }
            writer.write_block(&mut self.conn, &table.block).await?;
        }

        // Send empty block to finalize query (as per C++ client)
        tracing::debug!("Sending empty block to finalize...");
        self.conn.write_varint(ClientCode::Data as u64).await?;
        if revision >= 50264 {
            self.conn.write_string("").await?;
        }
        let empty_block = Block::new();
        writer.write_block(&mut self.conn, &empty_block).await?;

        self.conn.flush().await?;
        tracing::debug!("Query sent, waiting for response...");
        Ok(())
    }

    /// Read progress info
    async fn read_progress(&mut self) -> Result<Progress> {
        let rows = self.conn.read_varint().await?;
        let bytes = self.conn.read_varint().await?;
        let total_rows = self.conn.read_varint().await?;

        let (written_rows, written_bytes) = if self.server_info.revision >= 54405 {
            (
                self.conn.read_varint().await?,
                self.conn.read_varint().await?,
            )
        } else {
            (0, 0)
        };

        Ok(Progress {
            rows,
            bytes,
            total_rows,
            written_rows,
            written_bytes,
        })
    }

    /// Read profile info
    async fn read_profile(&mut self) -> Result<Profile> {
        let rows = self.conn.read_varint().await?;
        let blocks = self.conn.read_varint().await?;
        let bytes = self.conn.read_varint().await?;
        let applied_limit = self.conn.read_u8().await? != 0;
        let rows_before_limit = self.conn.read_varint().await?;
        let calculated_rows_before_limit = self.conn.read_u8().await? != 0;

        Ok(Profile {
            rows,
            blocks,
            bytes,
            rows_before_limit,
            applied_limit,
            calculated_rows_before_limit,
        })
    }

    /// Read exception from server
    fn read_exception<'a>(&'a mut self) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<crate::query::Exception>> + 'a>> {
        use crate::query::Exception;
        Box::pin(async move {
            tracing::debug!("Reading exception code...");
            let code = self.conn.read_i32().await?;
            tracing::debug!("Exception code: {}", code);
            tracing::debug!("Reading exception name...");
            let name = self.conn.read_string().await?;
            tracing::debug!("Exception name: {}", name);
            tracing::debug!("Reading exception display_text...");
            let display_text = self.conn.read_string().await?;
            tracing::debug!("Exception display_text length: {}", display_text.len());
            tracing::debug!("Reading exception stack_trace...");
            let stack_trace = self.conn.read_string().await?;
            tracing::debug!("Exception stack_trace length: {}", stack_trace.len());

            // Check for nested exception
            let has_nested = self.conn.read_u8().await?;
            let nested = if has_nested != 0 {
                Some(Box::new(self.read_exception().await?))
            } else {
                None
            };

            Ok(Exception {
                code,
                name,
                display_text,
                stack_trace,
                nested,
            })
        })
    }

    /// Insert data into a table
    ///
    /// This method constructs an INSERT query from the block's column names and sends the data.
    /// Example: `client.insert("my_database.my_table", block).await?`
    pub async fn insert(&mut self, table_name: &str, block: Block) -> Result<()> {
        self.check_ready()?;

        // Build query with column names from block (matches C++ implementation)
        let col_names: Vec<String> = (0..block.column_count())
            .filter_map(|i| block.column_name(i))
            .map(|n| format!("`{}`", n.replace("`", "``"))) // Escape backticks
            .collect();

        if col_names.is_empty() {
            return Err(Error::Protocol("Block has no columns".to_string()));
        }

        let query_text = format!(
            "INSERT INTO {} ({}) VALUES",
            table_name,
            col_names.join(", ")
        );

        self.state = SessionState::Streaming;
        let result = self.insert_inner(query_text, block).await;
        match &result {
            Ok(_) => self.state = SessionState::Ready,
            Err(Error::Server { .. }) => self.state = SessionState::Ready,
            Err(_) => self.state = SessionState::Failed,
        }
        result
    }

    async fn insert_inner(&mut self, query_text: String, block: Block) -> Result<()> {
        tracing::debug!("Sending INSERT query: {}", query_text);
        let query = Query::new(query_text);

        // Send query
        self.send_query(&query).await?;

        // Wait for server to respond with Data packet (matches C++ Insert flow)
        tracing::debug!("Waiting for server Data packet...");
        loop {
            let packet_type = self.conn.read_varint().await?;
            tracing::debug!("INSERT wait response packet type: {}", packet_type);

            match packet_type {
                code if code == ServerCode::Data as u64 => {
                    tracing::debug!("Received Data packet, ready to send data");
                    // CRITICAL: Must consume the Data packet's payload to keep stream aligned!
                    // Skip temp table name
                    if self.server_info.revision >= 50264 {
                        let _temp_table = self.conn.read_string().await?;
                    }
                    // Read the block (likely empty, but must consume it)
                    let _block = self.block_reader.read_block(&mut self.conn).await?;
                    tracing::debug!("Consumed Data packet payload, stream aligned");
                    break;
                }
                code if code == ServerCode::Progress as u64 => {
                    tracing::debug!("Received Progress packet");
                    let _ = self.read_progress().await?;
                }
                code if code == ServerCode::TableColumns as u64 => {
                    tracing::debug!("Received TableColumns packet");
                    // Skip external table name
                    let _table_name = self.conn.read_string().await?;
                    // Skip columns metadata string
                    let _columns_metadata = self.conn.read_string().await?;
                }
                code if code == ServerCode::Exception as u64 => {
                    tracing::warn!("Server returned exception before accepting data");
                    let exception = self.read_exception().await?;
                    self.drain_until_end_of_stream().await?;
                    return Err(Error::Server {
                        code: exception.code,
                        message: format!("{}: {}", exception.name, exception.display_text),
                    });
                }
                other => {
                    return Err(Error::Protocol(format!(
                        "Unexpected packet type while waiting for Data: {}",
                        other
                    )));
                }
            }
        }

        // Now send our data block
        tracing::debug!("Sending data block with {} rows", block.row_count());
        self.conn.write_varint(ClientCode::Data as u64).await?;
        self.block_writer
            .write_block(&mut self.conn, &block)
            .await?;

        // Send empty block to signal end
        tracing::debug!("Sending empty block to signal end");
        let empty_block = Block::new();
        self.conn.write_varint(ClientCode::Data as u64).await?;
        self.block_writer
            .write_block(&mut self.conn, &empty_block)
            .await?;

        // Wait for EndOfStream (matches C++ flow)
        tracing::debug!("Waiting for EndOfStream...");
        loop {
            let packet_type = self.conn.read_varint().await?;
            tracing::debug!("INSERT final response packet type: {}", packet_type);

            match packet_type {
                code if code == ServerCode::EndOfStream as u64 => {
                    tracing::debug!("Received EndOfStream, insert complete");
                    break;
                }
                code if code == ServerCode::Data as u64 => {
                    tracing::debug!("Received Data packet in INSERT response (skipping)");
                    // Skip temp table name if protocol supports it
                    if self.server_info.revision >= 50264 {
                        let _temp_table = self.conn.read_string().await?;
                    }
                    // Read and discard the block
                    let _block = self.block_reader.read_block(&mut self.conn).await?;
                }
                code if code == ServerCode::Progress as u64 => {
                    tracing::debug!("Received Progress packet");
                    let _ = self.read_progress().await?;
                }
                code if code == ServerCode::ProfileEvents as u64 => {
                    tracing::debug!("Received ProfileEvents packet (skipping)");
                    let _table_name = self.conn.read_string().await?;
                    let uncompressed_reader = BlockReader::new(self.server_info.revision);
                    let _block = uncompressed_reader.read_block(&mut self.conn).await?;
                }
                code if code == ServerCode::TableColumns as u64 => {
                    tracing::debug!("Received TableColumns packet (skipping)");
                    let _table_name = self.conn.read_string().await?;
                    let _columns_metadata = self.conn.read_string().await?;
                }
                code if code == ServerCode::Exception as u64 => {
                    tracing::warn!("Server returned exception after sending data");
                    let exception = self.read_exception().await?;
                    self.drain_until_end_of_stream().await?;
                    return Err(Error::Server {
                        code: exception.code,
                        message: format!("{}: {}", exception.name, exception.display_text),
                    });
                }
                _ => {
                    tracing::warn!("Ignoring unexpected packet type: {} - stream may be misaligned", packet_type);
                }
            }
        }

        Ok(())
    }

    /// Ping the server
    pub async fn ping(&mut self) -> Result<()> {
        self.check_ready()?;
        let result = self.ping_inner().await;
        if result.is_err() {
            self.state = SessionState::Failed;
        }
        result
    }

    async fn ping_inner(&mut self) -> Result<()> {
        tracing::debug!("Sending ping...");
        self.conn.write_varint(ClientCode::Ping as u64).await?;
        self.conn.flush().await?;
        tracing::debug!("Ping sent, waiting for pong...");

        let packet_type = self.conn.read_varint().await?;
        tracing::debug!("Got response packet type: {}", packet_type);

        if packet_type == ServerCode::Pong as u64 {
            tracing::debug!("Pong received!");
            Ok(())
        } else {
            tracing::debug!("Unexpected packet: {}", packet_type);
            Err(Error::Protocol(format!(
                "Expected Pong, got {}",
                packet_type
            )))
        }
    }

    /// Get server info
    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Negotiated (major, minor, patch) server version
    pub fn server_version(&self) -> (u64, u64, u64) {
        (
            self.server_info.version_major,
            self.server_info.version_minor,
            self.server_info.version_patch,
        )
    }

    /// Negotiated server protocol revision
    pub fn server_revision(&self) -> u64 {
        self.server_info.revision
    }

    /// Run a statement that returns no rows (DDL, DML without a result set)
    pub async fn execute(&mut self, query: impl Into<Query>) -> Result<()> {
        self.query(query).await?;
        Ok(())
    }
}

/// Query result
pub struct QueryResult {
    /// Result blocks
    pub blocks: Vec<Block>,
    /// Progress information
    pub progress: Progress,
}

impl QueryResult {
    /// Get all blocks
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Get progress info
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Get total number of rows across all blocks
    pub fn total_rows(&self) -> usize {
        self.blocks.iter().map(|b| b.row_count()).sum()
    }
}
