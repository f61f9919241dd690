//! # Gateways
//! The boundary between the console core and the hardware it drives.
//!
//! Every trait here is implemented by the firmware on real peripherals and by in-memory fakes in
//! the tests. Implementations must bound every call and report failure instead of blocking,
//! an unbounded call would stall the whole tick cadence including the alarm countdown.

use crate::alarm::AlarmConfig;
use crate::clock::Now;
use crate::error::{AudioError, ConfigError, GatewayError};
use crate::screen::{Frame, RefreshMode};
use crate::volume::Volume;

/// Relay outputs, numbered as labelled on the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PinId {
    /// Relay 9
    P9 = 9,
    /// Relay 10
    P10 = 10,
    /// Relay 11
    P11 = 11,
    /// Relay 12
    P12 = 12,
}

impl PinId {
    /// Every relay, highest number first
    pub const ALL: [Self; 4] = [Self::P12, Self::P11, Self::P10, Self::P9];

    /// Relay number as printed on the board
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Dense index 0..4, used for per-pin tables
    #[must_use]
    pub const fn index(self) -> usize {
        (self as u8 - 9) as usize
    }
}

/// Relay bank access.
///
/// The bank is shared with other writers, the core never assumes it owns the pin state.
/// Implementations serialize the operations so two toggles cannot interleave.
pub trait PinGateway {
    /// Switch `pin` on. Idempotent.
    async fn on(&self, pin: PinId) -> Result<(), GatewayError>;
    /// Switch `pin` off. Idempotent.
    async fn off(&self, pin: PinId) -> Result<(), GatewayError>;
    /// Flip `pin`, returns the new state
    async fn toggle(&self, pin: PinId) -> Result<bool, GatewayError>;
    /// Current state of `pin`
    async fn get(&self, pin: PinId) -> Result<bool, GatewayError>;
}

/// The display.
pub trait RenderGateway {
    /// Compose `frame` into the back buffer, replacing what was there
    async fn draw(&mut self, frame: &Frame) -> Result<(), GatewayError>;
    /// Push the composed frame to the panel
    async fn commit(&mut self, mode: RefreshMode) -> Result<(), GatewayError>;
}

/// Track number on the sound medium
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Track(pub u16);

/// What the audio player should load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Source {
    /// A specific track, e.g. the alarm sound
    Track(Track),
    /// Any track picked at random
    Random,
}

/// Sound output.
pub trait AudioPlayer {
    /// Load `source` for playback, returns the track that was loaded
    async fn load(&mut self, source: Source) -> Result<Track, AudioError>;
    /// Play the loaded track from the start. Harmless when nothing is playing.
    async fn play(&mut self) -> Result<(), GatewayError>;
    /// Stop playback
    async fn stop(&mut self) -> Result<(), GatewayError>;
    /// Whether a track is playing right now
    async fn is_playing(&mut self) -> Result<bool, GatewayError>;
    /// Set the output level
    async fn set_volume(&mut self, volume: Volume) -> Result<(), GatewayError>;
}

/// Persistent storage of the alarm configuration.
pub trait AlarmStore {
    /// Read the stored configuration
    async fn load(&mut self) -> Result<AlarmConfig, ConfigError>;
    /// Replace the stored configuration. All or nothing, never a partial write.
    async fn save(&mut self, config: &AlarmConfig) -> Result<(), ConfigError>;
}

/// Board telemetry for the Info menus. Any reading may be unavailable on a given board.
pub trait SystemProbe {
    /// Processor load in percent
    async fn cpu_load(&mut self) -> Option<u8>;
    /// Memory use in percent
    async fn memory_usage(&mut self) -> Option<u8>;
    /// Seconds since boot
    async fn uptime_secs(&mut self) -> Option<u64>;
    /// Temperature of the external sensor in Fahrenheit
    async fn sensor_temperature_f(&mut self) -> Option<f32>;
    /// Die temperature of the processor in Fahrenheit
    async fn cpu_temperature_f(&mut self) -> Option<f32>;
}

/// Wall-clock time.
pub trait ClockSource {
    /// The current date and time
    async fn now(&mut self) -> Result<Now, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_indices_are_dense() {
        let mut seen = [false; 4];
        for pin in PinId::ALL {
            seen[pin.index()] = true;
        }
        assert_eq!(seen, [true; 4]);
        assert_eq!(PinId::P12.number(), 12);
    }
}
