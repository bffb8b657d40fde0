//! TCP probe for a gpsd-compatible location daemon.

use std::{
    io::{self, Read},
    net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs},
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::StatusProbe;

/// Default daemon host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default gpsd port.
pub const DEFAULT_PORT: u16 = 2947;
/// Default budget for connecting and reading the greeting.
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;
/// Longest greeting accepted; gpsd's VERSION line is about 100 bytes.
pub const MAX_GREETING_BYTES: usize = 4096;

/// Where and how to reach the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Host name or address.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Total budget for one attempt, connect and greeting together.
    pub timeout_ms: u64,
    /// Require a JSON greeting line with a `class` field after connecting.
    pub expect_banner: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            expect_banner: true,
        }
    }
}

impl ProbeConfig {
    fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }
}

/// Why the last probe attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFailure {
    /// Host name did not resolve.
    Unresolved,
    /// Connect or greeting exceeded the timeout.
    Timeout,
    /// Nothing listening on the port.
    Refused,
    /// Something answered, but not with a daemon greeting.
    Protocol,
    /// Any other socket error.
    Io,
}

#[derive(Debug, Error)]
enum ProbeError {
    #[error("cannot resolve {0}")]
    Unresolved(String),
    #[error("timed out")]
    Timeout,
    #[error("connection refused")]
    Refused,
    #[error("unexpected greeting: {0}")]
    Protocol(String),
    #[error("socket error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for ProbeError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Self::Timeout,
            io::ErrorKind::ConnectionRefused => Self::Refused,
            _ => Self::Io(err),
        }
    }
}

impl ProbeError {
    fn failure(&self) -> ProbeFailure {
        match self {
            ProbeError::Unresolved(_) => ProbeFailure::Unresolved,
            ProbeError::Timeout => ProbeFailure::Timeout,
            ProbeError::Refused => ProbeFailure::Refused,
            ProbeError::Protocol(_) => ProbeFailure::Protocol,
            ProbeError::Io(_) => ProbeFailure::Io,
        }
    }
}

/// Blocking probe with explicit timeouts.
///
/// The host is resolved once, in [`GpsdProbe::new`]; that lookup is the
/// only step not bounded by `timeout_ms`. Later attempts only connect.
#[derive(Debug)]
pub struct GpsdProbe {
    config: ProbeConfig,
    addrs: Vec<SocketAddr>,
    stream: Option<TcpStream>,
    last_failure: Option<ProbeFailure>,
}

impl GpsdProbe {
    /// Creates a disconnected probe and resolves the configured host.
    pub fn new(config: ProbeConfig) -> Self {
        let addrs = match (config.host.as_str(), config.port).to_socket_addrs() {
            Ok(addrs) => addrs.collect(),
            Err(err) => {
                log::warn!("cannot resolve location daemon {}: {err}", config.host);
                Vec::new()
            }
        };
        Self {
            config,
            addrs,
            stream: None,
            last_failure: None,
        }
    }

    /// Addresses the host resolved to; empty when resolution failed.
    pub fn resolved_addrs(&self) -> &[SocketAddr] {
        &self.addrs
    }

    /// Probe configuration.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// True while a session opened by [`StatusProbe::connect`] is held.
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Classification of the most recent failure, cleared on success.
    pub fn last_failure(&self) -> Option<ProbeFailure> {
        self.last_failure
    }

    fn open(&self) -> Result<TcpStream, ProbeError> {
        let deadline = Instant::now() + self.config.timeout();
        let mut last_err =
            ProbeError::Unresolved(format!("{}:{}", self.config.host, self.config.port));
        for addr in &self.addrs {
            match TcpStream::connect_timeout(addr, time_left(deadline)?) {
                Ok(stream) => {
                    stream.set_write_timeout(Some(self.config.timeout()))?;
                    if self.config.expect_banner {
                        read_banner(&stream, deadline)?;
                    }
                    return Ok(stream);
                }
                Err(err) => last_err = err.into(),
            }
        }
        Err(last_err)
    }

    fn record<T>(&mut self, result: Result<T, ProbeError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.last_failure = None;
                Some(value)
            }
            Err(err) => {
                log::debug!(
                    "location daemon {}:{} unavailable: {err}",
                    self.config.host,
                    self.config.port
                );
                self.last_failure = Some(err.failure());
                None
            }
        }
    }
}

impl Default for GpsdProbe {
    fn default() -> Self {
        Self::new(ProbeConfig::default())
    }
}

impl StatusProbe for GpsdProbe {
    fn connect(&mut self) -> bool {
        if self.stream.is_some() {
            return true;
        }
        let result = self.open();
        self.stream = self.record(result);
        self.stream.is_some()
    }

    fn disconnect(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }

    fn check_running(&mut self) -> bool {
        let result = self.open();
        match self.record(result) {
            Some(stream) => {
                let _ = stream.shutdown(Shutdown::Both);
                true
            }
            None => false,
        }
    }
}

fn time_left(deadline: Instant) -> Result<Duration, ProbeError> {
    let left = deadline.saturating_duration_since(Instant::now());
    if left.is_zero() {
        return Err(ProbeError::Timeout);
    }
    Ok(left)
}

// The daemon greets every client with one JSON object carrying a "class".
// The whole line must arrive before `deadline`, however it is chunked.
fn read_banner(stream: &TcpStream, deadline: Instant) -> Result<(), ProbeError> {
    let mut reader = Read::take(stream, MAX_GREETING_BYTES as u64);
    let mut line = Vec::with_capacity(128);
    let mut chunk = [0u8; 256];
    loop {
        stream.set_read_timeout(Some(time_left(deadline)?))?;
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            let reason = if reader.limit() == 0 {
                format!("greeting longer than {MAX_GREETING_BYTES} bytes")
            } else {
                "connection closed before greeting".to_string()
            };
            return Err(ProbeError::Protocol(reason));
        }
        line.extend_from_slice(&chunk[..n]);
        if let Some(end) = line.iter().position(|b| *b == b'\n') {
            line.truncate(end);
            break;
        }
    }

    let text = std::str::from_utf8(&line)
        .map_err(|_| ProbeError::Protocol("greeting is not UTF-8".to_string()))?;
    let value: serde_json::Value = serde_json::from_str(text.trim())
        .map_err(|err| ProbeError::Protocol(format!("greeting is not JSON: {err}")))?;
    if value.get("class").and_then(serde_json::Value::as_str).is_none() {
        return Err(ProbeError::Protocol("greeting has no class field".to_string()));
    }
    Ok(())
}
