//! # Settings
//! The firmware's build-time settings, generated by `build.rs` from `config/console_config.json`.
use console_clock::alarm::AlarmConfig;
use console_clock::config::ConsoleConfig;
use console_clock::error::ConfigError;
use console_clock::gateway::{PinId, Track};
use console_clock::volume::Volume;
use embassy_rp::rtc::{DateTime, DayOfWeek};

/// Constants written by the build script
#[allow(clippy::missing_docs_in_private_items)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/console_config.rs"));
}

/// The console settings of this board
pub fn console_config() -> ConsoleConfig {
    let mut config = ConsoleConfig {
        alarm_volume: Volume::new(generated::ALARM_VOLUME),
        start_volume: Volume::new(generated::START_VOLUME),
        alarm_track: Track(generated::ALARM_TRACK),
        ..ConsoleConfig::default()
    };
    for (pin, name) in [PinId::P9, PinId::P10, PinId::P11, PinId::P12]
        .into_iter()
        .zip(generated::PIN_NAMES)
    {
        config.pin_names.set(pin, name);
    }
    config
}

/// The alarm stored on first boot
pub const fn default_alarm() -> Result<AlarmConfig, ConfigError> {
    AlarmConfig::new(
        generated::DEFAULT_ALARM_HOUR,
        generated::DEFAULT_ALARM_MINUTE,
        generated::DEFAULT_ALARM_ENABLED,
    )
}

/// Local time of the build, the RTC starts from here
pub const fn build_time() -> DateTime {
    DateTime {
        year: generated::BUILD_YEAR,
        month: generated::BUILD_MONTH,
        day: generated::BUILD_DAY,
        day_of_week: match generated::BUILD_WEEKDAY {
            0 => DayOfWeek::Sunday,
            1 => DayOfWeek::Monday,
            2 => DayOfWeek::Tuesday,
            3 => DayOfWeek::Wednesday,
            4 => DayOfWeek::Thursday,
            5 => DayOfWeek::Friday,
            _ => DayOfWeek::Saturday,
        },
        hour: generated::BUILD_HOUR,
        minute: generated::BUILD_MINUTE,
        second: generated::BUILD_SECOND,
    }
}
