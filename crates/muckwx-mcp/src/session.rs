//! MCP session lifecycle over a MUCK connection

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use muckwx_core::ReportSink;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::message::McpMessage;
use crate::{McpError, McpResult};

/// The one protocol revision this client speaks
const MCP_VERSION: (u32, u32) = (2, 1);

/// Login banner lines tolerated before the MCP announcement
const MAX_BANNER_LINES: usize = 64;

/// Plain or TLS-wrapped byte stream to the MUCK
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}
impl<T: AsyncRead + AsyncWrite + Unpin + Send> Transport for T {}

/// One MCP 2.1 session: connect, negotiate, call, quit
pub struct McpSession {
    stream: BufReader<Box<dyn Transport>>,
    auth_key: String,
    read_timeout: Duration,
}

impl McpSession {
    /// Open the connection, TLS-wrapped when the MUCK listens on SSL
    pub async fn connect(host: &str, port: u16, use_tls: bool) -> McpResult<Self> {
        let tcp = TcpStream::connect((host, port)).await?;

        let stream: Box<dyn Transport> = if use_tls {
            let connector =
                native_tls::TlsConnector::new().map_err(|e| McpError::Tls(e.to_string()))?;
            let connector = tokio_native_tls::TlsConnector::from(connector);
            let tls = connector
                .connect(host, tcp)
                .await
                .map_err(|e| McpError::Tls(e.to_string()))?;
            Box::new(tls)
        } else {
            Box::new(tcp)
        };

        Ok(Self {
            stream: BufReader::new(stream),
            auth_key: generate_auth_key(),
            read_timeout: Duration::from_secs(30),
        })
    }

    /// Perform the version handshake and announce the packages we can speak
    pub async fn negotiate(&mut self, packages: &[&str]) -> McpResult<()> {
        let announcement = self.read_announcement().await?;

        let min = announcement_field(&announcement, "version")
            .ok_or_else(|| McpError::Handshake("announcement missing version".to_string()))?;
        let max = announcement_field(&announcement, "to")
            .ok_or_else(|| McpError::Handshake("announcement missing to-version".to_string()))?;

        let range = format!("{} to {}", min, max);
        let min = parse_version(&min)
            .ok_or_else(|| McpError::Handshake(format!("bad version {:?}", min)))?;
        let max = parse_version(&max)
            .ok_or_else(|| McpError::Handshake(format!("bad version {:?}", max)))?;
        if !version_supported(min, max) {
            return Err(McpError::UnsupportedVersion(range));
        }

        let line = McpMessage::new("mcp")
            .field("authentication-key", self.auth_key.clone())
            .field("version", "2.1")
            .field("to", "2.1")
            .encode(None);
        self.send(&line).await?;

        for package in packages {
            let line = McpMessage::new("mcp-negotiate-can")
                .field("package", *package)
                .field("min-version", "1.0")
                .field("max-version", "1.0")
                .encode(Some(&self.auth_key));
            self.send(&line).await?;
        }

        let line = McpMessage::new("mcp-negotiate-end").encode(Some(&self.auth_key));
        self.send(&line).await?;

        debug!(packages = ?packages, "MCP negotiation complete");
        Ok(())
    }

    /// Issue a package call. Values must be single-line; the message
    /// format has no multiline transfer here.
    pub async fn call(
        &mut self,
        package: &str,
        message: &str,
        args: &[(&str, &str)],
    ) -> McpResult<()> {
        let mut msg = McpMessage::new(format!("{}-{}", package, message));
        for (key, value) in args {
            if value.contains('\n') || value.contains('\r') {
                return Err(McpError::InvalidValue((*key).to_string()));
            }
            msg = msg.field(*key, *value);
        }

        let line = msg.encode(Some(&self.auth_key));
        self.send(&line).await?;
        debug!(package = %package, message = %message, "Sent MCP call");
        Ok(())
    }

    /// Tear the session down the way a player would leave
    pub async fn quit(mut self) -> McpResult<()> {
        self.send("QUIT").await?;
        self.stream.shutdown().await?;
        Ok(())
    }

    /// Servers print a login banner before speaking MCP; skip it.
    async fn read_announcement(&mut self) -> McpResult<String> {
        for _ in 0..MAX_BANNER_LINES {
            let line = self.read_line().await?;
            if line.starts_with("#$#mcp ") {
                return Ok(line);
            }
        }
        Err(McpError::Handshake(
            "no MCP announcement from server".to_string(),
        ))
    }

    async fn read_line(&mut self) -> McpResult<String> {
        let mut buf = String::new();
        let n = timeout(self.read_timeout, self.stream.read_line(&mut buf))
            .await
            .map_err(|_| McpError::Timeout)??;
        if n == 0 {
            return Err(McpError::ConnectionClosed);
        }
        Ok(buf.trim_end_matches(|c| c == '\r' || c == '\n').to_string())
    }

    async fn send(&mut self, line: &str) -> McpResult<()> {
        self.stream.write_all(line.as_bytes()).await?;
        self.stream.write_all(b"\r\n").await?;
        self.stream.flush().await?;
        Ok(())
    }
}

/// The key only tags this session's out-of-band traffic; it does not need
/// to be cryptographically strong.
fn generate_auth_key() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(1);
    format!("{:x}", nanos & 0xffff_ffff)
}

/// Pull one simple-valued field out of the version announcement
fn announcement_field(line: &str, key: &str) -> Option<String> {
    let mut tokens = line.split_whitespace();
    while let Some(token) = tokens.next() {
        if token.strip_suffix(':') == Some(key) {
            return tokens.next().map(|v| v.trim_matches('"').to_string());
        }
    }
    None
}

fn parse_version(text: &str) -> Option<(u32, u32)> {
    let (major, minor) = text.split_once('.')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}

fn version_supported(min: (u32, u32), max: (u32, u32)) -> bool {
    min <= MCP_VERSION && MCP_VERSION <= max
}

/// Publishes a weather message to the MUCK, one full session per publish
pub struct MuckSink {
    host: String,
    port: u16,
    use_tls: bool,
    package: String,
    auth_token: String,
}

impl MuckSink {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        use_tls: bool,
        package: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> McpResult<Self> {
        let host = host.into();
        let package = package.into();
        let auth_token = auth_token.into();
        if host.is_empty() || package.is_empty() || auth_token.is_empty() {
            return Err(McpError::Config(
                "host, package, and auth token must all be set".to_string(),
            ));
        }
        Ok(Self {
            host,
            port,
            use_tls,
            package,
            auth_token,
        })
    }
}

#[async_trait::async_trait]
impl ReportSink for MuckSink {
    async fn publish(&mut self, message: &str) -> anyhow::Result<()> {
        let mut session = McpSession::connect(&self.host, self.port, self.use_tls).await?;
        session.negotiate(&[self.package.as_str()]).await?;
        session
            .call(
                &self.package,
                "set",
                &[
                    ("auth", self.auth_token.as_str()),
                    ("weather", message),
                ],
            )
            .await?;
        session.quit().await?;

        info!(host = %self.host, package = %self.package, "Published weather message");
        Ok(())
    }
}
