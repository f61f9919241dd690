//! Tasks that make up the firmware as well as the peripherals they drive.
pub mod alarm_store;
pub mod buttons;
pub mod clock;
pub mod display;
pub mod probe;
pub mod relays;
pub mod resources;
pub mod sound;
pub mod tick_loop;
pub mod watchdog;
