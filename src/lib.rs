//! # Console clock
//! Hardware-independent core of a bedside console: a small display, four push buttons and a relay
//! bank. It drives a menu, a daily wake-up alarm with snooze and shutoff timers for the relays.
//!
//! The core talks to the hardware only through the traits in [`gateway`] and the
//! [`buttons::InputSampler`]. The firmware binary implements them for the RP2040 board, the tests
//! implement them in memory. [`console::Console`] runs one tick per call, the caller sleeps
//! [`console::Console::tick_interval`] between calls.
#![cfg_attr(not(test), no_std)]
// the gateway traits are only used with the single-threaded embassy executor
#![allow(async_fn_in_trait)]

#[macro_use]
mod fmt;

pub mod alarm;
pub mod buttons;
pub mod clock;
pub mod config;
pub mod console;
pub mod error;
pub mod exchange;
pub mod gateway;
pub mod life;
pub mod menu;
pub mod music;
pub mod relays;
pub mod screen;
pub mod timers;
pub mod volume;

pub use console::{Console, ExitReason, Flow, Gateways};
pub use error::Error;
