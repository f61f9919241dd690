//! # Buttons
//! The four console buttons, read once per tick. The buttons pull their line low when pressed.
use console_clock::buttons::{ButtonSet, InputSampler};
use embassy_rp::gpio::Input;

/// Inputs of SW1..SW4
pub struct ButtonPanel {
    /// One input per button, SW1 first
    inputs: [Input<'static>; 4],
}

impl ButtonPanel {
    /// Wrap the button inputs, SW1 first. The inputs need their pull-ups enabled.
    pub const fn new(inputs: [Input<'static>; 4]) -> Self {
        Self { inputs }
    }
}

impl InputSampler for ButtonPanel {
    fn sample(&mut self) -> ButtonSet {
        ButtonSet::from_levels(self.inputs.each_ref().map(Input::is_high))
    }
}
