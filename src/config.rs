//! # Console configuration
//! Settings of one console: relay names and roles, volume levels, the alarm sound, idle
//! timeouts and tick intervals.
//!
//! `Default` is the stock console. The firmware starts from it and overrides what its
//! build-time configuration file sets.

use crate::gateway::{PinId, Track};
use crate::volume::Volume;
use embassy_time::Duration;
use heapless::String;

/// Longest relay name that fits the legend
pub const PIN_NAME_LEN: usize = 6;

/// Display name of a relay
pub type PinName = String<PIN_NAME_LEN>;

/// Display names of all relays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinNames([PinName; 4]);

impl PinNames {
    /// Name of `pin`
    #[must_use]
    pub fn get(&self, pin: PinId) -> &str {
        self.0[pin.index()].as_str()
    }

    /// Rename `pin`. Names longer than six characters are cut off.
    pub fn set(&mut self, pin: PinId, name: &str) {
        let slot = &mut self.0[pin.index()];
        slot.clear();
        for c in name.chars() {
            if slot.push(c).is_err() {
                break;
            }
        }
    }
}

impl Default for PinNames {
    fn default() -> Self {
        let mut names = Self([PinName::new(), PinName::new(), PinName::new(), PinName::new()]);
        names.set(PinId::P9, "Pin 9");
        names.set(PinId::P10, "Pin 10");
        names.set(PinId::P11, "Pin 11");
        names.set(PinId::P12, "Pin 12");
        names
    }
}

/// Everything the core needs to know about the console it runs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Relay names shown in legends and messages
    pub pin_names: PinNames,
    /// Relay switched on when the alarm rings and left on afterwards
    pub lights: PinId,
    /// Relay powering the speaker, switched off whenever sound ends
    pub speaker: PinId,
    /// Relay switched off when the alarm rings
    pub alarm_off_pin: PinId,
    /// Level the alarm rings at
    pub alarm_volume: Volume,
    /// User volume after boot
    pub start_volume: Volume,
    /// Sound played by the alarm
    pub alarm_track: Track,
    /// Ticks without input before a submenu returns to the main screen
    pub submenu_idle_ticks: u16,
    /// The same for the volume menu, which ticks twice as fast
    pub volume_idle_ticks: u16,
    /// Tick length in most menus and while the alarm is active
    pub normal_tick: Duration,
    /// Tick length in the volume and music menus
    pub fast_tick: Duration,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            pin_names: PinNames::default(),
            lights: PinId::P12,
            speaker: PinId::P11,
            alarm_off_pin: PinId::P9,
            alarm_volume: Volume::new(80),
            start_volume: Volume::new(80),
            alarm_track: Track(1),
            submenu_idle_ticks: 30,
            volume_idle_ticks: 60,
            normal_tick: Duration::from_secs(1),
            fast_tick: Duration::from_millis(500),
        }
    }
}
