//! Menu scenarios: navigation, idle timeouts, volume, telemetry and the alarm menu
mod common;

use common::{alarm, at, at_second, console, idle, press, tick};
use console_clock::alarm::session::SessionState;
use console_clock::buttons::Button;
use console_clock::error::ConfigError;
use console_clock::menu::NodeId;
use console_clock::screen::RefreshMode;
use console_clock::volume::Volume;
use embassy_time::Duration;

#[test]
fn start_draws_the_main_screen() {
    let console = console(alarm(7, 30, true), &at(19, 5));
    let (frame, mode) = console.display().last();
    assert_eq!(mode, RefreshMode::Full);
    assert_eq!(frame.legend(), Some(" Menu  Info  Stuff  Lights"));
    assert_eq!(frame.message(), None);
    assert!(frame.has_line("07:05 PM"));
    assert!(frame.has_line("Sun Oct 18"));
    assert!(frame.has_line("10/18/26"));
    assert_eq!(console.volume(), Volume::new(80));
    assert_eq!(console.audio().volume.get(), Some(Volume::new(80)));
}

#[test]
fn main_screen_follows_the_minute() {
    let mut console = console(alarm(7, 30, true), &at(8, 0));
    let commits = console.display().commits();
    idle(&mut console, &at_second(8, 0, 30));
    assert_eq!(console.display().commits(), commits);

    idle(&mut console, &at(8, 1));
    assert_eq!(console.display().commits(), commits + 1);
    assert_eq!(console.display().last().1, RefreshMode::Partial);
    assert!(console.display().last().0.has_line("08:01 AM"));

    idle(&mut console, &at(8, 10));
    assert_eq!(console.display().last().1, RefreshMode::Full);
}

#[test]
fn submenu_returns_to_the_main_screen_after_thirty_idle_ticks() {
    let mut console = console(alarm(7, 30, true), &at(8, 0));
    let now = at(8, 0);
    tick(&mut console, press(Button::Sw3), &now);
    assert_eq!(console.menu().current(), NodeId::Info);
    assert_eq!(console.display().last_legend(), " Back  More  Temp");

    for _ in 0..29 {
        idle(&mut console, &now);
    }
    assert_eq!(console.menu().current(), NodeId::Info);
    idle(&mut console, &now);
    assert_eq!(console.menu().current(), NodeId::Root);
    let (frame, mode) = console.display().last();
    assert_eq!(mode, RefreshMode::Full);
    assert_eq!(frame.legend(), Some(" Menu  Info  Stuff  Lights"));
}

#[test]
fn input_before_the_timeout_keeps_the_submenu() {
    let mut console = console(alarm(7, 30, true), &at(8, 0));
    let now = at(8, 0);
    tick(&mut console, press(Button::Sw4), &now);
    for _ in 0..29 {
        idle(&mut console, &now);
    }
    tick(&mut console, press(Button::Sw2), &now);
    assert_eq!(console.menu().current(), NodeId::Power);
    assert_eq!(console.menu().idle_ticks(), 0);
}

#[test]
fn volume_is_clamped_at_the_top() {
    let mut console = console(alarm(7, 30, true), &at(8, 0));
    let now = at(8, 0);
    tick(&mut console, press(Button::Sw2), &now);
    tick(&mut console, press(Button::Sw2), &now);
    assert_eq!(console.menu().current(), NodeId::Volume);
    assert_eq!(console.tick_interval(), Duration::from_millis(500));

    for _ in 0..11 {
        tick(&mut console, press(Button::Sw2), &now);
        assert!(console.volume().percent() <= 100);
    }
    assert_eq!(console.volume(), Volume::new(100));
    assert_eq!(console.audio().volume.get(), Some(Volume::new(100)));
    let (frame, mode) = console.display().last();
    assert_eq!(frame.message(), Some("Volume: 100%"));
    assert_eq!(mode, RefreshMode::Partial);
}

#[test]
fn volume_menu_waits_sixty_fast_ticks() {
    let mut console = console(alarm(7, 30, true), &at(8, 0));
    let now = at(8, 0);
    tick(&mut console, press(Button::Sw2), &now);
    tick(&mut console, press(Button::Sw2), &now);
    for _ in 0..59 {
        idle(&mut console, &now);
    }
    assert_eq!(console.menu().current(), NodeId::Volume);
    idle(&mut console, &now);
    assert_eq!(console.menu().current(), NodeId::Root);
    assert_eq!(console.tick_interval(), Duration::from_secs(1));
}

#[test]
fn telemetry_readings() {
    let mut console = console(alarm(7, 30, true), &at(8, 0));
    let now = at(8, 0);
    tick(&mut console, press(Button::Sw3), &now);
    tick(&mut console, press(Button::Sw3), &now);
    tick(&mut console, press(Button::Sw4), &now);
    assert_eq!(console.menu().current(), NodeId::Info);
    tick(&mut console, press(Button::Sw3), &now);
    assert_eq!(console.menu().current(), NodeId::InfoMore);

    tick(&mut console, press(Button::Sw3), &now);
    assert_eq!(console.menu().current(), NodeId::Info);
    assert_eq!(console.display().last_message().as_deref(), Some("CPU Usage: n/a"));

    tick(&mut console, press(Button::Sw3), &now);
    tick(&mut console, press(Button::Sw1), &now);
    assert_eq!(
        console.display().last_message().as_deref(),
        Some("Uptime: 1 days, 02:03")
    );

    tick(&mut console, press(Button::Sw2), &now);
    assert_eq!(console.menu().current(), NodeId::Temperature);
    tick(&mut console, press(Button::Sw3), &now);
    assert_eq!(
        console.display().last_message().as_deref(),
        Some("LM75 Sensor temp: 70.3F")
    );
    tick(&mut console, press(Button::Sw2), &now);
    tick(&mut console, press(Button::Sw2), &now);
    assert_eq!(console.display().last_message().as_deref(), Some("CPU Temp: 98.6F"));
}

#[test]
fn alarm_toggle_is_saved() {
    let mut console = console(alarm(7, 30, true), &at(8, 0));
    let now = at(8, 0);
    tick(&mut console, press(Button::Sw4), &now);
    tick(&mut console, press(Button::Sw3), &now);
    assert_eq!(console.display().last_legend(), " Back  Toggle  Status");

    tick(&mut console, press(Button::Sw3), &now);
    assert_eq!(console.menu().current(), NodeId::Root);
    assert_eq!(console.display().last_message().as_deref(), Some("Alarm off at 7:30"));
    assert!(!console.alarm().config().enabled);
    assert_eq!(console.alarm().store().saves.get(), 1);
    assert_eq!(console.alarm().store().record.get(), Ok(alarm(7, 30, false)));
}

#[test]
fn failed_alarm_save_keeps_the_new_setting() {
    let mut console = console(alarm(7, 15, false), &at(7, 0));
    console.alarm().store().save_fails.set(true);
    let now = at(7, 0);
    tick(&mut console, press(Button::Sw4), &now);
    tick(&mut console, press(Button::Sw3), &now);
    tick(&mut console, press(Button::Sw3), &now);
    assert_eq!(console.display().last_message().as_deref(), Some("Alarm not saved"));
    assert!(console.alarm().config().enabled);

    idle(&mut console, &at(7, 15));
    assert_eq!(console.session(), SessionState::Ringing { countdown: 11 });
}

#[test]
fn status_rereads_the_store() {
    let mut console = console(alarm(7, 30, true), &at(8, 0));
    let now = at(8, 0);
    console.alarm().store().record.set(Ok(alarm(6, 5, true)));
    tick(&mut console, press(Button::Sw4), &now);
    tick(&mut console, press(Button::Sw3), &now);
    tick(&mut console, press(Button::Sw2), &now);
    assert_eq!(console.display().last_message().as_deref(), Some("Alarm on at 6:05"));
    assert_eq!(console.alarm().config(), alarm(6, 5, true));

    console.alarm().store().record.set(Err(ConfigError::Malformed));
    tick(&mut console, press(Button::Sw4), &now);
    tick(&mut console, press(Button::Sw3), &now);
    tick(&mut console, press(Button::Sw2), &now);
    assert_eq!(
        console.display().last_message().as_deref(),
        Some("Alarm file unreadable")
    );
    assert_eq!(console.alarm().config(), alarm(6, 5, true));
}

#[test]
fn alarm_is_reloaded_at_half_past() {
    let mut console = console(alarm(7, 30, true), &at(7, 28));
    console.alarm().store().record.set(Ok(alarm(7, 45, true)));
    idle(&mut console, &at(7, 29));
    assert_eq!(console.alarm().config(), alarm(7, 30, true));

    // the reload runs before the due check
    idle(&mut console, &at(7, 30));
    assert_eq!(console.alarm().config(), alarm(7, 45, true));
    assert_eq!(console.session(), SessionState::Idle);

    idle(&mut console, &at(7, 45));
    assert_eq!(console.session(), SessionState::Ringing { countdown: 11 });
}

#[test]
fn unreadable_store_at_half_past_keeps_the_alarm() {
    let mut console = console(alarm(8, 31, true), &at(8, 29));
    console.alarm().store().record.set(Err(ConfigError::Malformed));
    idle(&mut console, &at(8, 30));
    assert_eq!(console.alarm().config(), alarm(8, 31, true));
    idle(&mut console, &at(8, 31));
    assert_eq!(console.session(), SessionState::Ringing { countdown: 11 });
}
