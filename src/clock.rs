//! # Clock
//! Wall-clock values as the console sees them: a calendar date, a time of day and the
//! minute-transition watch that drives every countdown and redraw in the core.
//!
//! All comparisons are exact hour/minute matches. Nothing here reads a clock, the current
//! time is handed in by the tick loop.

use core::fmt;

/// Abbreviated month names, January first
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Time of day, 24-hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTime {
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// 0-59
    pub second: u8,
}

impl ClockTime {
    /// Create a time of day
    #[must_use]
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }

    /// The time `hours` later. The hour wraps at midnight, minute and second are kept.
    #[must_use]
    pub const fn plus_hours(self, hours: u8) -> Self {
        let hour = ((self.hour as u16 + hours as u16) % 24) as u8;
        Self { hour, ..self }
    }

    /// Exact hour and minute match, seconds are ignored
    #[must_use]
    pub const fn is_at(self, hour: u8, minute: u8) -> bool {
        self.hour == hour && self.minute == minute
    }

    /// Hour on the 12-hour dial, 1-12
    #[must_use]
    pub const fn hour_12(self) -> u8 {
        match self.hour % 12 {
            0 => 12,
            h => h,
        }
    }

    /// "AM" or "PM"
    #[must_use]
    pub const fn meridiem(self) -> &'static str {
        if self.hour < 12 { "AM" } else { "PM" }
    }

    /// Clock face text, zero padded: `07:05 PM`
    #[must_use]
    pub const fn face(self) -> Face {
        Face(self)
    }

    /// Short text without the leading zero: `7:05 PM`
    #[must_use]
    pub const fn short(self) -> Short {
        Short(self)
    }
}

/// Zero padded 12-hour rendering of a [`ClockTime`]
pub struct Face(ClockTime);

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02} {}",
            self.0.hour_12(),
            self.0.minute,
            self.0.meridiem()
        )
    }
}

/// Unpadded 12-hour rendering of a [`ClockTime`]
pub struct Short(ClockTime);

impl fmt::Display for Short {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:02} {}",
            self.0.hour_12(),
            self.0.minute,
            self.0.meridiem()
        )
    }
}

/// Day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Weekday {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl Weekday {
    /// Three letter name
    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Monday => "Mon",
            Self::Tuesday => "Tue",
            Self::Wednesday => "Wed",
            Self::Thursday => "Thu",
            Self::Friday => "Fri",
            Self::Saturday => "Sat",
            Self::Sunday => "Sun",
        }
    }
}

/// Calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Date {
    /// Full year, e.g. 2026
    pub year: u16,
    /// 1-12
    pub month: u8,
    /// 1-31
    pub day: u8,
    /// Day of the week
    pub weekday: Weekday,
}

impl Date {
    /// Abbreviated month name, `???` for an invalid month
    #[must_use]
    pub fn month_name(&self) -> &'static str {
        usize::from(self.month)
            .checked_sub(1)
            .and_then(|i| MONTHS.get(i))
            .copied()
            .unwrap_or("???")
    }

    /// `Sat Oct 18`
    #[must_use]
    pub const fn long(self) -> LongDate {
        LongDate(self)
    }

    /// `10/18/26`
    #[must_use]
    pub const fn numeric(self) -> NumericDate {
        NumericDate(self)
    }
}

/// Weekday, month and day rendering of a [`Date`]
pub struct LongDate(Date);

impl fmt::Display for LongDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.0.weekday.abbreviation(),
            self.0.month_name(),
            self.0.day
        )
    }
}

/// Month/day/two-digit-year rendering of a [`Date`]
pub struct NumericDate(Date);

impl fmt::Display for NumericDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{:02}",
            self.0.month,
            self.0.day,
            self.0.year % 100
        )
    }
}

/// The current date and time as handed to the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Now {
    /// Calendar date
    pub date: Date,
    /// Time of day
    pub time: ClockTime,
}

impl Now {
    /// Combine a date and a time
    #[must_use]
    pub const fn new(date: Date, time: ClockTime) -> Self {
        Self { date, time }
    }
}

/// Observes the minute component of successive clock readings and reports transitions.
///
/// Countdowns in the core count distinct minute transitions, not elapsed seconds, so they
/// decrement at most once per tick no matter how often the loop runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MinuteWatch {
    /// Minute seen on the previous observation
    last: Option<u8>,
}

impl MinuteWatch {
    /// A watch that has seen nothing yet, so its first observation is a transition
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// A watch that treats `minute` as already seen
    #[must_use]
    pub const fn starting_at(minute: u8) -> Self {
        Self { last: Some(minute) }
    }

    /// Record `minute`, returns true if it differs from the previous observation
    pub fn changed(&mut self, minute: u8) -> bool {
        let changed = self.last != Some(minute);
        self.last = Some(minute);
        changed
    }
}

impl Default for MinuteWatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn plus_hours_wraps_at_midnight() {
        let t = ClockTime::new(23, 30, 12).plus_hours(1);
        assert_eq!(t, ClockTime::new(0, 30, 12));
        assert_eq!(ClockTime::new(22, 5, 0).plus_hours(2), ClockTime::new(0, 5, 0));
        assert_eq!(ClockTime::new(10, 0, 0).plus_hours(2), ClockTime::new(12, 0, 0));
    }

    #[test]
    fn twelve_hour_texts() {
        assert_eq!(ClockTime::new(0, 5, 0).face().to_string(), "12:05 AM");
        assert_eq!(ClockTime::new(7, 30, 0).face().to_string(), "07:30 AM");
        assert_eq!(ClockTime::new(12, 0, 0).short().to_string(), "12:00 PM");
        assert_eq!(ClockTime::new(20, 30, 0).short().to_string(), "8:30 PM");
    }

    #[test]
    fn date_texts() {
        let date = Date {
            year: 2026,
            month: 10,
            day: 18,
            weekday: Weekday::Sunday,
        };
        assert_eq!(date.long().to_string(), "Sun Oct 18");
        assert_eq!(date.numeric().to_string(), "10/18/26");

        let broken = Date { month: 13, ..date };
        assert_eq!(broken.month_name(), "???");
    }

    #[test]
    fn minute_watch_reports_transitions_only() {
        let mut watch = MinuteWatch::starting_at(30);
        assert!(!watch.changed(30));
        assert!(!watch.changed(30));
        assert!(watch.changed(31));
        assert!(!watch.changed(31));

        let mut fresh = MinuteWatch::new();
        assert!(fresh.changed(0));
        assert!(!fresh.changed(0));
    }
}
