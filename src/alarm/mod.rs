//! # Alarm
//! The alarm configuration, its JSON record and the scheduler deciding when the alarm is due.
//!
//! The configuration lives in the [`AlarmStore`]. It is read once at start-up, where a bad record
//! is fatal, and again at minute 30 of every hour and on request from the menu. A failing
//! runtime reload keeps the configuration that was in use.

pub mod session;

use crate::clock::ClockTime;
use crate::error::{ConfigError, ConfigField};
use crate::gateway::AlarmStore;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Size of a buffer that holds any encoded [`AlarmConfig`]
pub const RECORD_LEN: usize = 64;

/// When the alarm rings and whether it is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmConfig {
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// Whether the alarm rings at all
    pub enabled: bool,
}

impl AlarmConfig {
    /// Create a checked configuration
    pub const fn new(hour: u8, minute: u8, enabled: bool) -> Result<Self, ConfigError> {
        Self {
            hour,
            minute,
            enabled,
        }
        .validated()
    }

    /// Check the ranges of hour and minute
    pub const fn validated(self) -> Result<Self, ConfigError> {
        if self.hour > 23 {
            Err(ConfigError::OutOfRange(ConfigField::Hour))
        } else if self.minute > 59 {
            Err(ConfigError::OutOfRange(ConfigField::Minute))
        } else {
            Ok(self)
        }
    }

    /// Decode the stored record `{"hour":H,"minute":M,"enabled":B}`
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let (config, _) =
            serde_json_core::from_slice::<Self>(bytes).map_err(|_| ConfigError::Malformed)?;
        config.validated()
    }

    /// Encode the record into `buf`, returns the number of bytes written
    pub fn to_json(&self, buf: &mut [u8]) -> Result<usize, ConfigError> {
        serde_json_core::to_slice(self, buf).map_err(|_| ConfigError::BufferTooSmall)
    }

    /// Status line for the display: `Alarm on at 7:30`
    #[must_use]
    pub const fn status(self) -> Status {
        Status(self)
    }
}

/// Display text of an [`AlarmConfig`]
pub struct Status(AlarmConfig);

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.0.enabled { "on" } else { "off" };
        write!(f, "Alarm {state} at {}:{:02}", self.0.hour, self.0.minute)
    }
}

/// Decides when the alarm is due and owns reloading and toggling the configuration
pub struct AlarmScheduler<S> {
    /// Where the configuration lives
    store: S,
    /// Configuration in use
    config: AlarmConfig,
    /// Set once the alarm fired, cleared when the clock leaves the alarm minute
    latched: bool,
}

impl<S: AlarmStore> AlarmScheduler<S> {
    /// Read the configuration for the first time. A bad record is returned as an error.
    pub async fn load(mut store: S) -> Result<Self, ConfigError> {
        let config = store.load().await?;
        info!("alarm loaded: {}", config);
        Ok(Self {
            store,
            config,
            latched: false,
        })
    }

    /// Configuration in use
    pub const fn config(&self) -> AlarmConfig {
        self.config
    }

    /// True exactly once when the clock reaches the enabled alarm time.
    ///
    /// While a session is active the alarm cannot fire again, the minute is consumed instead.
    pub fn check_due(&mut self, now: ClockTime, session_active: bool) -> bool {
        if !now.is_at(self.config.hour, self.config.minute) {
            self.latched = false;
            return false;
        }
        if self.latched || !self.config.enabled {
            return false;
        }
        self.latched = true;
        if session_active {
            debug!("alarm minute reached during an active session");
            return false;
        }
        info!("alarm due at {}:{}", now.hour, now.minute);
        true
    }

    /// Read the configuration again. On failure the previous configuration stays in use.
    pub async fn reload(&mut self) -> Result<AlarmConfig, ConfigError> {
        match self.store.load().await {
            Ok(config) => {
                if config != self.config {
                    info!("alarm changed to {}", config);
                }
                self.config = config;
                Ok(config)
            }
            Err(e) => {
                warn!("alarm reload failed, keeping {}: {}", self.config, e);
                Err(e)
            }
        }
    }

    /// Flip `enabled` and save. The flipped value stays in use even when saving fails.
    pub async fn toggle(&mut self) -> Result<bool, ConfigError> {
        self.config.enabled = !self.config.enabled;
        let enabled = self.config.enabled;
        self.store.save(&self.config).await.map_err(|e| {
            warn!("alarm toggle not saved: {}", e);
            e
        })?;
        info!("alarm toggled, enabled: {}", enabled);
        Ok(enabled)
    }

    /// The backing store
    pub const fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use std::string::ToString;

    /// Store holding one record, or an error to return instead
    struct MemoryStore {
        record: Result<AlarmConfig, ConfigError>,
        saves: usize,
        refuse_saves: bool,
    }

    impl MemoryStore {
        fn with(config: AlarmConfig) -> Self {
            Self {
                record: Ok(config),
                saves: 0,
                refuse_saves: false,
            }
        }
    }

    impl AlarmStore for MemoryStore {
        async fn load(&mut self) -> Result<AlarmConfig, ConfigError> {
            self.record
        }

        async fn save(&mut self, config: &AlarmConfig) -> Result<(), ConfigError> {
            if self.refuse_saves {
                return Err(ConfigError::Storage);
            }
            self.record = Ok(*config);
            self.saves += 1;
            Ok(())
        }
    }

    fn config(hour: u8, minute: u8, enabled: bool) -> AlarmConfig {
        AlarmConfig {
            hour,
            minute,
            enabled,
        }
    }

    #[test]
    fn json_record() {
        let parsed = AlarmConfig::from_json(br#"{"hour":7,"minute":30,"enabled":true}"#);
        assert_eq!(parsed, Ok(config(7, 30, true)));

        let mut buf = [0u8; RECORD_LEN];
        let len = config(23, 5, false).to_json(&mut buf).unwrap();
        assert_eq!(&buf[..len], br#"{"hour":23,"minute":5,"enabled":false}"#);
    }

    #[test]
    fn bad_records_are_rejected() {
        assert_eq!(
            AlarmConfig::from_json(br#"{"hour":"seven","minute":30,"enabled":true}"#),
            Err(ConfigError::Malformed)
        );
        assert_eq!(
            AlarmConfig::from_json(br#"{"hour":7,"enabled":true}"#),
            Err(ConfigError::Malformed)
        );
        assert_eq!(
            AlarmConfig::from_json(br#"{"hour":24,"minute":30,"enabled":true}"#),
            Err(ConfigError::OutOfRange(ConfigField::Hour))
        );
        assert_eq!(
            AlarmConfig::from_json(br#"{"hour":7,"minute":60,"enabled":true}"#),
            Err(ConfigError::OutOfRange(ConfigField::Minute))
        );
        assert_eq!(AlarmConfig::from_json(b"7,30,1"), Err(ConfigError::Malformed));
        assert_eq!(
            config(1, 2, true).to_json(&mut [0u8; 8]),
            Err(ConfigError::BufferTooSmall)
        );
    }

    #[test]
    fn status_line() {
        assert_eq!(config(7, 5, true).status().to_string(), "Alarm on at 7:05");
        assert_eq!(config(18, 30, false).status().to_string(), "Alarm off at 18:30");
    }

    #[test]
    fn due_exactly_once_per_day() {
        let mut alarm = block_on(AlarmScheduler::load(MemoryStore::with(config(7, 30, true)))).unwrap();
        let mut fired = 0;
        // every 20 seconds for a whole day
        for tick in 0..(24 * 60 * 3) {
            let seconds = tick * 20;
            let now = ClockTime::new((seconds / 3600) as u8, (seconds / 60 % 60) as u8, (seconds % 60) as u8);
            if alarm.check_due(now, false) {
                assert_eq!((now.hour, now.minute), (7, 30));
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
    }

    #[test]
    fn not_due_when_disabled_or_ringing() {
        let mut alarm = block_on(AlarmScheduler::load(MemoryStore::with(config(6, 0, false)))).unwrap();
        assert!(!alarm.check_due(ClockTime::new(6, 0, 0), false));

        let mut alarm = block_on(AlarmScheduler::load(MemoryStore::with(config(6, 0, true)))).unwrap();
        assert!(!alarm.check_due(ClockTime::new(6, 0, 0), true));
        assert!(!alarm.check_due(ClockTime::new(6, 0, 30), false));
        assert!(!alarm.check_due(ClockTime::new(6, 1, 0), false));
    }

    #[test]
    fn startup_load_failure_is_returned() {
        let store = MemoryStore {
            record: Err(ConfigError::Malformed),
            saves: 0,
            refuse_saves: false,
        };
        assert!(matches!(
            block_on(AlarmScheduler::load(store)),
            Err(ConfigError::Malformed)
        ));
    }

    #[test]
    fn failed_reload_keeps_previous_config() {
        let mut alarm = block_on(AlarmScheduler::load(MemoryStore::with(config(7, 30, true)))).unwrap();
        alarm.store.record = Err(ConfigError::Storage);
        assert_eq!(block_on(alarm.reload()), Err(ConfigError::Storage));
        assert_eq!(alarm.config(), config(7, 30, true));

        alarm.store.record = Ok(config(8, 0, true));
        assert_eq!(block_on(alarm.reload()), Ok(config(8, 0, true)));
        assert_eq!(alarm.config(), config(8, 0, true));
    }

    #[test]
    fn toggle_persists_and_survives_a_failed_save() {
        let mut alarm = block_on(AlarmScheduler::load(MemoryStore::with(config(7, 30, true)))).unwrap();
        assert_eq!(block_on(alarm.toggle()), Ok(false));
        assert_eq!(alarm.store().saves, 1);
        assert_eq!(alarm.store().record, Ok(config(7, 30, false)));

        alarm.store.refuse_saves = true;
        assert_eq!(block_on(alarm.toggle()), Err(ConfigError::Storage));
        assert!(alarm.config().enabled);
    }
}
