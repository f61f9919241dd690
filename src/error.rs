//! # Errors
//! Error types of the console core.
//!
//! All variants carry fixed-size data only, so every error is `Copy` and can be handed
//! across the tick loop without allocation.

use core::fmt;

/// Top-level error of the console core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The persisted alarm configuration is unusable.
    Config(ConfigError),
    /// A sound could not be loaded.
    Audio(AudioError),
    /// A hardware collaborator failed or did not answer in time.
    Gateway(GatewayError),
}

/// Problems with the persisted alarm configuration.
///
/// Fatal at start-up. At runtime a failed reload keeps the previous configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The stored bytes are not a valid configuration record (bad JSON, non-numeric field,
    /// missing field).
    Malformed,
    /// A field parsed but lies outside its range.
    OutOfRange(ConfigField),
    /// Nothing has been stored yet.
    Missing,
    /// The record does not fit the encode buffer.
    BufferTooSmall,
    /// The storage medium reported an error.
    Storage,
}

/// Fields of the alarm configuration, used to report range violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigField {
    /// Alarm hour, valid 0-23
    Hour,
    /// Alarm minute, valid 0-59
    Minute,
}

/// The sound backend could not provide the requested sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AudioError {
    /// The sound file (or track) does not exist.
    FileMissing,
    /// The sound file exists but cannot be decoded.
    FileCorrupt,
    /// The sound backend itself is not reachable.
    Unavailable(GatewayError),
}

/// Failure of a call across a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GatewayError {
    /// The call did not complete within its bound.
    Timeout,
    /// The collaborator answered with an error.
    Fault,
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<AudioError> for Error {
    fn from(e: AudioError) -> Self {
        Self::Audio(e)
    }
}

impl From<GatewayError> for Error {
    fn from(e: GatewayError) -> Self {
        Self::Gateway(e)
    }
}

impl From<GatewayError> for AudioError {
    fn from(e: GatewayError) -> Self {
        Self::Unavailable(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "alarm configuration: {e}"),
            Self::Audio(e) => write!(f, "audio: {e}"),
            Self::Gateway(e) => write!(f, "gateway: {e}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => f.write_str("malformed record"),
            Self::OutOfRange(ConfigField::Hour) => f.write_str("hour out of range"),
            Self::OutOfRange(ConfigField::Minute) => f.write_str("minute out of range"),
            Self::Missing => f.write_str("no record stored"),
            Self::BufferTooSmall => f.write_str("record does not fit buffer"),
            Self::Storage => f.write_str("storage failure"),
        }
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileMissing => f.write_str("sound file missing"),
            Self::FileCorrupt => f.write_str("sound file corrupt"),
            Self::Unavailable(e) => write!(f, "player unavailable ({e})"),
        }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("timed out"),
            Self::Fault => f.write_str("fault"),
        }
    }
}
