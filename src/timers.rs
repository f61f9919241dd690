//! # Relay shutoff timers
//! One independent one-shot timer per relay. An armed timer switches its relay off when the clock
//! shows exactly the deadline hour and minute, then disarms itself.

use crate::clock::ClockTime;
use crate::gateway::PinId;
use heapless::Vec;

/// Hour and minute a timer fires at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
}

/// Deadlines of all relays
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerScheduler {
    /// Per relay, the armed deadline
    deadlines: [Option<Deadline>; 4],
}

impl TimerScheduler {
    /// No timer armed
    #[must_use]
    pub const fn new() -> Self {
        Self {
            deadlines: [None; 4],
        }
    }

    /// Arm the timer of `pin` to fire `hours` after `now`, replacing any earlier deadline.
    /// Returns the time the relay will go off.
    pub fn arm(&mut self, pin: PinId, now: ClockTime, hours: u8) -> ClockTime {
        let at = now.plus_hours(hours);
        self.deadlines[pin.index()] = Some(Deadline {
            hour: at.hour,
            minute: at.minute,
        });
        info!("relay {} off at {}:{}", pin.number(), at.hour, at.minute);
        at
    }

    /// Cancel the timer of `pin`
    pub fn disarm(&mut self, pin: PinId) {
        self.deadlines[pin.index()] = None;
    }

    /// Cancel every timer
    pub fn disarm_all(&mut self) {
        self.deadlines = [None; 4];
    }

    /// Armed deadline of `pin`
    #[must_use]
    pub const fn deadline(&self, pin: PinId) -> Option<Deadline> {
        self.deadlines[pin.index()]
    }

    /// Disarm and return every relay whose deadline is exactly `now`
    pub fn check(&mut self, now: ClockTime) -> Vec<PinId, 4> {
        let mut due = Vec::new();
        for pin in PinId::ALL {
            let slot = &mut self.deadlines[pin.index()];
            if slot.is_some_and(|d| now.is_at(d.hour, d.minute)) {
                *slot = None;
                // at most one entry per relay, four relays fit
                let _ = due.push(pin);
            }
        }
        due
    }
}
