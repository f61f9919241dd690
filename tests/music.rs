//! Shuffle play from the music menu
mod common;

use common::{TestConsole, alarm, at, at_second, console, idle, press, tick};
use console_clock::alarm::session::SessionState;
use console_clock::buttons::Button;
use console_clock::clock::Now;
use console_clock::gateway::{PinId, Source, Track};
use console_clock::menu::NodeId;
use console_clock::screen::RefreshMode;
use embassy_time::Duration;

/// Walk from the main screen into the music menu
fn start_music(console: &mut TestConsole, now: &Now) {
    tick(console, press(Button::Sw2), now);
    tick(console, press(Button::Sw1), now);
    assert_eq!(console.menu().current(), NodeId::Music);
}

#[test]
fn plays_skips_and_stops() {
    let mut console = console(alarm(7, 30, true), &at(20, 0));
    let now = at(20, 0);
    start_music(&mut console, &now);
    assert!(console.relays().gateway().is_on(PinId::P11));
    assert_eq!(console.display().last_legend(), " Off  Skip  Up  Down");
    assert_eq!(console.display().last_message().as_deref(), Some("Song: Loading..."));
    assert_eq!(console.tick_interval(), Duration::from_millis(500));

    idle(&mut console, &now);
    assert!(console.audio().playing.get());
    assert_eq!(console.music_track(), Some(Track(101)));
    let (frame, mode) = console.display().last();
    assert_eq!(frame.message(), Some("Song: 0101"));
    assert_eq!(mode, RefreshMode::Full);

    let commits = console.display().commits();
    idle(&mut console, &at_second(20, 0, 1));
    assert_eq!(console.display().commits(), commits);

    // the track ended
    console.audio().playing.set(false);
    idle(&mut console, &at_second(20, 0, 2));
    assert_eq!(console.display().last_message().as_deref(), Some("Song: 0102"));

    tick(&mut console, press(Button::Sw3), &at_second(20, 0, 3));
    assert_eq!(console.display().last_message().as_deref(), Some("Song: 0103"));
    assert_eq!(console.music_track(), Some(Track(103)));

    tick(&mut console, press(Button::Sw2), &at_second(20, 0, 4));
    assert_eq!(console.menu().current(), NodeId::Music);
    assert_eq!(console.display().last_message().as_deref(), Some("Volume: 82%"));

    tick(&mut console, press(Button::Sw4), &at_second(20, 0, 5));
    assert_eq!(console.menu().current(), NodeId::Stuff);
    assert!(!console.relays().gateway().is_on(PinId::P11));
    assert!(!console.audio().playing.get());
    assert_eq!(console.display().last_legend(), " Back  GOL  Volume  Music");
    assert_eq!(console.display().last_message(), None);
}

#[test]
fn music_menu_never_times_out() {
    let mut console = console(alarm(7, 30, true), &at(20, 0));
    let now = at(20, 0);
    start_music(&mut console, &now);
    for _ in 0..200 {
        idle(&mut console, &now);
    }
    assert_eq!(console.menu().current(), NodeId::Music);
}

#[test]
fn missing_track_returns_to_stuff() {
    let mut console = console(alarm(7, 30, true), &at(20, 0));
    let now = at(20, 0);
    start_music(&mut console, &now);
    console.audio().missing.set(true);
    idle(&mut console, &now);
    assert_eq!(console.menu().current(), NodeId::Stuff);
    assert!(!console.relays().gateway().is_on(PinId::P11));
    assert_eq!(
        console.display().last_message().as_deref(),
        Some("Incorrect/missing audio file")
    );
}

#[test]
fn music_cancels_the_speaker_timer() {
    let mut console = console(alarm(7, 30, true), &at(20, 0));
    let now = at(20, 0);
    tick(&mut console, press(Button::Sw1), &now);
    tick(&mut console, press(Button::Sw3), &now);
    tick(&mut console, press(Button::Sw3), &now);
    tick(&mut console, press(Button::Sw2), &now);
    assert!(console.timers().deadline(PinId::P11).is_some());
    tick(&mut console, press(Button::Sw4), &now);
    tick(&mut console, press(Button::Sw4), &now);
    assert_eq!(console.menu().current(), NodeId::Root);

    start_music(&mut console, &now);
    assert_eq!(console.timers().deadline(PinId::P11), None);
}

#[test]
fn alarm_during_music_ends_on_the_stuff_menu() {
    let mut console = console(alarm(7, 30, true), &at(7, 29));
    let now = at(7, 29);
    start_music(&mut console, &now);
    idle(&mut console, &at_second(7, 29, 1));
    assert_eq!(console.music_track(), Some(Track(101)));

    idle(&mut console, &at(7, 30));
    assert_eq!(console.session(), SessionState::Ringing { countdown: 11 });
    assert_eq!(console.menu().current(), NodeId::Stuff);
    assert_eq!(console.music_track(), None);
    assert_eq!(console.audio().loaded.get(), Some(Source::Track(Track(1))));

    tick(&mut console, press(Button::Sw4), &at_second(7, 30, 5));
    assert_eq!(console.session(), SessionState::Idle);
    assert_eq!(console.display().last_legend(), " Back  GOL  Volume  Music");
    assert_eq!(console.display().last_message().as_deref(), Some("Alarm turned off"));

    idle(&mut console, &at_second(7, 30, 6));
    assert_eq!(console.menu().current(), NodeId::Stuff);
    assert!(!console.audio().playing.get());
    assert!(!console.relays().gateway().is_on(PinId::P11));
    assert_eq!(console.music_track(), None);
    assert_eq!(console.tick_interval(), Duration::from_secs(1));
}
