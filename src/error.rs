//! Unified error types for the GrowMonitor firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level loop's error handling uniform.  All variants are `Copy` so they
//! can travel through events and cycle outcomes without allocation.
//!
//! None of these is fatal: the loop logs them and carries on with the next
//! scheduled pass.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor reading was absent or physically implausible.
    Sensor(SensorError),
    /// A remote endpoint could not be reached or answered garbage.
    Transport(TransportError),
    /// A parametrized command carried an unacceptable value.
    Command(CommandError),
    /// The record exporter reported a non-success result.
    Export(ExportError),
    /// Startup could not complete (configuration or peripherals).
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Export(e) => write!(f, "export: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The one-wire probe reported the disconnected-device sentinel.
    InternalProbeDisconnected,
    /// External temperature came back as NaN.
    ExternalTemperatureInvalid,
    /// External humidity came back as NaN.
    ExternalHumidityInvalid,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InternalProbeDisconnected => write!(f, "internal probe disconnected"),
            Self::ExternalTemperatureInvalid => write!(f, "external temperature invalid"),
            Self::ExternalHumidityInvalid => write!(f, "external humidity invalid"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The connection could not be established.
    ConnectFailed,
    /// The request was sent but no answer arrived in time.
    Timeout,
    /// The endpoint answered with a non-success HTTP status.
    Status(u16),
    /// The reply body could not be parsed, or the API reported `ok: false`.
    MalformedReply,
    /// The channel is not configured (missing token / URL).
    NotConfigured,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed => write!(f, "connection failed"),
            Self::Timeout => write!(f, "timed out"),
            Self::Status(code) => write!(f, "HTTP status {code}"),
            Self::MalformedReply => write!(f, "malformed reply"),
            Self::NotConfigured => write!(f, "channel not configured"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Command argument errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// The argument is missing or is not a number.
    NotANumber,
    /// The temperature threshold must be strictly positive.
    TemperatureNotPositive,
    /// The soil threshold must lie within 0–100 %.
    SoilOutOfRange,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber => write!(f, "argument is not a number"),
            Self::TemperatureNotPositive => write!(f, "temperature threshold must be > 0"),
            Self::SoilOutOfRange => write!(f, "soil threshold must be within 0-100"),
        }
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportError {
    /// Wi-Fi is down; the record was not submitted.
    Offline,
    /// The exporter endpoint rejected or failed the request.
    Rejected(TransportError),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => write!(f, "offline"),
            Self::Rejected(e) => write!(f, "rejected ({e})"),
        }
    }
}

impl From<ExportError> for Error {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
