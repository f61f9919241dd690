//! # Clock
//! Wall-clock time from the RP2040 real time clock.
//!
//! The board has no network time source. The RTC is seeded once at boot with the time the firmware
//! was built, shifted by the configured UTC offset.
use crate::settings;
use console_clock::clock::{ClockTime, Date, Now, Weekday};
use console_clock::error::GatewayError;
use console_clock::gateway::ClockSource;
use defmt::{Debug2Format, info, warn};
use embassy_rp::peripherals::RTC;
use embassy_rp::rtc::{DateTime, DayOfWeek, Rtc};

/// The RTC as the tick loop reads it
pub struct RtcClock {
    /// The real time clock
    rtc: Rtc<'static, RTC>,
}

impl RtcClock {
    /// Take over the RTC and seed it with the build time
    pub fn new(mut rtc: Rtc<'static, RTC>) -> Self {
        let seed = settings::build_time();
        info!(
            "Seeding the RTC with {}-{:02}-{:02} {:02}:{:02}",
            seed.year, seed.month, seed.day, seed.hour, seed.minute
        );
        if let Err(e) = rtc.set_datetime(seed) {
            warn!("Failed to seed the RTC: {:?}", Debug2Format(&e));
        }
        Self { rtc }
    }
}

/// Map the RTC's day of the week onto the console's
const fn weekday(day: DayOfWeek) -> Weekday {
    match day {
        DayOfWeek::Monday => Weekday::Monday,
        DayOfWeek::Tuesday => Weekday::Tuesday,
        DayOfWeek::Wednesday => Weekday::Wednesday,
        DayOfWeek::Thursday => Weekday::Thursday,
        DayOfWeek::Friday => Weekday::Friday,
        DayOfWeek::Saturday => Weekday::Saturday,
        DayOfWeek::Sunday => Weekday::Sunday,
    }
}

/// Convert an RTC reading
fn to_now(dt: DateTime) -> Now {
    Now::new(
        Date {
            year: dt.year,
            month: dt.month,
            day: dt.day,
            weekday: weekday(dt.day_of_week),
        },
        ClockTime::new(dt.hour, dt.minute, dt.second),
    )
}

impl ClockSource for RtcClock {
    async fn now(&mut self) -> Result<Now, GatewayError> {
        self.rtc.now().map(to_now).map_err(|e| {
            warn!("Failed to read the RTC: {:?}", Debug2Format(&e));
            GatewayError::Fault
        })
    }
}
