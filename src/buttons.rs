//! # Buttons
//! The four console buttons and the per-tick sample of which of them are held.
//!
//! There is no debounce beyond the tick cadence. A button that is held across several ticks
//! is seen as pressed on each of them.

/// The console buttons, labelled SW1..SW4 on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Button {
    /// Rightmost button
    Sw1 = 0,
    /// Second from the right
    Sw2 = 1,
    /// Second from the left
    Sw3 = 2,
    /// Leftmost button, Back in every submenu
    Sw4 = 3,
}

impl Button {
    /// Every button, in the order a menu legend lists them
    pub const LEGEND_ORDER: [Self; 4] = [Self::Sw4, Self::Sw3, Self::Sw2, Self::Sw1];

    /// Bit of this button inside a [`ButtonSet`]
    const fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// Set of buttons held during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonSet(u8);

impl ButtonSet {
    /// Nothing pressed
    pub const EMPTY: Self = Self(0);

    /// Convert raw line levels of SW1..SW4 into the pressed set.
    /// The buttons pull their line low when pressed, so `false` means pressed.
    #[must_use]
    pub const fn from_levels(levels: [bool; 4]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < 4 {
            if !levels[i] {
                bits |= 1 << i;
            }
            i += 1;
        }
        Self(bits)
    }

    /// A set holding exactly `button`
    #[must_use]
    pub const fn only(button: Button) -> Self {
        Self(button.mask())
    }

    /// This set plus `button`
    #[must_use]
    pub const fn with(self, button: Button) -> Self {
        Self(self.0 | button.mask())
    }

    /// Whether `button` is held
    #[must_use]
    pub const fn contains(self, button: Button) -> bool {
        self.0 & button.mask() != 0
    }

    /// Whether no button is held
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<Button> for ButtonSet {
    fn from(button: Button) -> Self {
        Self::only(button)
    }
}

/// Reads all four buttons once per tick.
pub trait InputSampler {
    /// Buttons currently held
    fn sample(&mut self) -> ButtonSet;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_active_low() {
        let set = ButtonSet::from_levels([true, false, true, false]);
        assert!(!set.contains(Button::Sw1));
        assert!(set.contains(Button::Sw2));
        assert!(!set.contains(Button::Sw3));
        assert!(set.contains(Button::Sw4));

        assert!(ButtonSet::from_levels([true; 4]).is_empty());
    }

    #[test]
    fn combining_buttons() {
        let set = ButtonSet::only(Button::Sw3).with(Button::Sw4);
        assert!(set.contains(Button::Sw3));
        assert!(set.contains(Button::Sw4));
        assert!(!set.contains(Button::Sw1));
        assert_eq!(ButtonSet::from(Button::Sw1), ButtonSet::only(Button::Sw1));
    }
}
