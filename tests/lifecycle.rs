//! Start-up, display retries and the end of the loop
mod common;

use common::{alarm, at, at_second, console, gateways, idle, press, tick};
use console_clock::buttons::Button;
use console_clock::config::ConsoleConfig;
use console_clock::error::{ConfigError, Error};
use console_clock::menu::NodeId;
use console_clock::screen::RefreshMode;
use console_clock::{Console, ExitReason, Flow};
use embassy_futures::block_on;

#[test]
fn unreadable_alarm_stops_the_start() {
    let gateways = gateways(alarm(7, 30, true));
    gateways.store.record.set(Err(ConfigError::Malformed));
    let started = block_on(Console::start(ConsoleConfig::default(), gateways, &at(8, 0)));
    assert!(matches!(started, Err(Error::Config(ConfigError::Malformed))));
}

#[test]
fn failed_frame_is_shown_on_the_next_tick() {
    let mut console = console(alarm(7, 30, true), &at(8, 0));
    let commits = console.display().commits();
    console.display().failing.set(true);
    tick(&mut console, press(Button::Sw3), &at(8, 0));
    assert_eq!(console.menu().current(), NodeId::Info);
    assert_eq!(console.display().commits(), commits);

    console.display().failing.set(false);
    idle(&mut console, &at_second(8, 0, 1));
    assert_eq!(console.display().commits(), commits + 1);
    assert_eq!(console.display().last_legend(), " Back  More  Temp");
}

#[test]
fn owed_full_refresh_survives_a_partial_frame() {
    let mut console = console(alarm(7, 30, true), &at(8, 0));
    let now = at(8, 0);
    console.display().failing.set(true);
    tick(&mut console, press(Button::Sw2), &now);
    tick(&mut console, press(Button::Sw2), &now);
    tick(&mut console, press(Button::Sw2), &now);

    console.display().failing.set(false);
    idle(&mut console, &now);
    let (frame, mode) = console.display().last();
    assert_eq!(frame.message(), Some("Volume: 82%"));
    assert_eq!(mode, RefreshMode::Full);
}

#[test]
fn shutdown_ends_the_loop_with_a_banner() {
    let mut console = console(alarm(7, 30, true), &at(22, 0));
    let now = at(22, 0);
    tick(&mut console, press(Button::Sw4), &now);
    tick(&mut console, press(Button::Sw2), &now);
    assert_eq!(console.display().last_legend(), " Back  Shutdown  Reboot");

    let flow = tick(&mut console, press(Button::Sw3), &now);
    assert_eq!(flow, Flow::Exit(ExitReason::Shutdown));
    let (frame, mode) = console.display().last();
    assert!(frame.has_line("Shutting Down!"));
    assert_eq!(frame.legend(), None);
    assert_eq!(mode, RefreshMode::Full);

    let commits = console.display().commits();
    block_on(console.teardown());
    assert_eq!(console.display().commits(), commits, "banner stays");
    assert!(!console.audio().playing.get());
}

#[test]
fn reboot_ends_the_loop() {
    let mut console = console(alarm(7, 30, true), &at(22, 0));
    let now = at(22, 0);
    tick(&mut console, press(Button::Sw4), &now);
    tick(&mut console, press(Button::Sw2), &now);
    let flow = tick(&mut console, press(Button::Sw2), &now);
    assert_eq!(flow, Flow::Exit(ExitReason::Reboot));
    assert!(console.display().last().0.has_line("Rebooting!"));
}

#[test]
fn teardown_silences_the_speaker() {
    let mut console = console(alarm(7, 30, true), &at(20, 0));
    let now = at(20, 0);
    tick(&mut console, press(Button::Sw2), &now);
    tick(&mut console, press(Button::Sw1), &now);
    idle(&mut console, &now);
    assert!(console.audio().playing.get());

    block_on(console.teardown());
    assert!(!console.audio().playing.get());
    assert!(!console.relays().gateway().is_on(console.config().speaker));
    assert!(console.display().last().0.has_line("Turned off"));
}
