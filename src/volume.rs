//! # Volume
//! The user volume level. Kept in memory only, it starts from the configured level on every boot.

/// Volume in percent, always within 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Volume(u8);

impl Volume {
    /// Loudest level
    pub const MAX: u8 = 100;
    /// Change per up/down press
    pub const STEP: u8 = 2;

    /// Create a level, anything above 100 is clamped
    #[must_use]
    pub const fn new(percent: u8) -> Self {
        if percent > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(percent)
        }
    }

    /// Level in percent
    #[must_use]
    pub const fn percent(self) -> u8 {
        self.0
    }

    /// One step louder, stops at 100
    #[must_use]
    pub const fn up(self) -> Self {
        Self::new(self.0.saturating_add(Self::STEP))
    }

    /// One step quieter, stops at 0
    #[must_use]
    pub const fn down(self) -> Self {
        Self(self.0.saturating_sub(Self::STEP))
    }
}
