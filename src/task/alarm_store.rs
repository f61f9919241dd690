//! # Alarm store
//! This module persists the alarm configuration in the flash memory.
//!
//! The configuration is kept as one JSON record under a single key of a sequential-storage map,
//! so a save replaces the whole record or nothing.
use console_clock::alarm::{AlarmConfig, RECORD_LEN};
use console_clock::error::ConfigError;
use console_clock::gateway::AlarmStore;
use core::ops::Range;
use defmt::{Debug2Format, info, warn};
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use sequential_storage::cache::NoCache;
use sequential_storage::map::{fetch_item, store_item};

/// The size of the flash memory in bytes.
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Key of the alarm record
const ALARM_KEY: u8 = 0;

/// The flash peripheral as the store uses it
pub type AlarmFlash = Flash<'static, FLASH, Async, { FLASH_SIZE }>;

/// Alarm configuration kept in flash
pub struct FlashAlarmStore {
    /// The flash peripheral used to read and write the record.
    flash: AlarmFlash,
    /// The range of the flash memory used for the map.
    flash_range: Range<u32>,
    /// Scratch buffer of the map.
    data_buffer: [u8; 128],
}

impl FlashAlarmStore {
    /// Create the store on top of the flash peripheral
    pub const fn new(flash: AlarmFlash) -> Self {
        Self {
            flash,
            flash_range: 0x1F_9000..0x1FC_000,
            data_buffer: [0; 128],
        }
    }

    /// Store `default` if no record exists yet.
    ///
    /// A record that exists but cannot be read is left alone, start-up reports it.
    pub async fn seed(&mut self, default: AlarmConfig) -> Result<(), ConfigError> {
        match self.load().await {
            Err(ConfigError::Missing) => {
                info!("No alarm stored, seeding {}", default);
                self.save(&default).await
            }
            _ => Ok(()),
        }
    }
}

impl AlarmStore for FlashAlarmStore {
    async fn load(&mut self) -> Result<AlarmConfig, ConfigError> {
        let record = fetch_item::<u8, &[u8], _>(
            &mut self.flash,
            self.flash_range.clone(),
            &mut NoCache::new(),
            &mut self.data_buffer,
            &ALARM_KEY,
        )
        .await
        .map_err(|e| {
            warn!("Failed to fetch the alarm record: {:?}", Debug2Format(&e));
            ConfigError::Storage
        })?;

        record.map_or(Err(ConfigError::Missing), AlarmConfig::from_json)
    }

    async fn save(&mut self, config: &AlarmConfig) -> Result<(), ConfigError> {
        let mut record = [0u8; RECORD_LEN];
        let len = config.to_json(&mut record)?;

        store_item::<u8, &[u8], _>(
            &mut self.flash,
            self.flash_range.clone(),
            &mut NoCache::new(),
            &mut self.data_buffer,
            &ALARM_KEY,
            &&record[..len],
        )
        .await
        .map_err(|e| {
            warn!("Failed to store the alarm record: {:?}", Debug2Format(&e));
            ConfigError::Storage
        })
    }
}
