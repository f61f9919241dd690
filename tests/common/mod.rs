//! In-memory gateways and helpers shared by the scenario tests
#![allow(dead_code)]
#![allow(clippy::missing_docs_in_private_items)]

use console_clock::alarm::AlarmConfig;
use console_clock::buttons::{Button, ButtonSet};
use console_clock::clock::{ClockTime, Date, Now, Weekday};
use console_clock::config::ConsoleConfig;
use console_clock::error::{AudioError, ConfigError, GatewayError};
use console_clock::gateway::{
    AlarmStore, AudioPlayer, PinGateway, PinId, RenderGateway, Source, SystemProbe, Track,
};
use console_clock::screen::{Frame, RefreshMode};
use console_clock::volume::Volume;
use console_clock::{Console, Flow, Gateways};
use embassy_futures::block_on;
use std::cell::{Cell, RefCell};

/// Relay bank that can be told to fail
#[derive(Default)]
pub struct FakePins {
    state: Cell<[bool; 4]>,
    pub failing: Cell<bool>,
}

impl FakePins {
    pub fn is_on(&self, pin: PinId) -> bool {
        self.state.get()[pin.index()]
    }

    pub fn set(&self, pin: PinId, on: bool) {
        let mut state = self.state.get();
        state[pin.index()] = on;
        self.state.set(state);
    }

    fn check(&self) -> Result<(), GatewayError> {
        if self.failing.get() {
            Err(GatewayError::Timeout)
        } else {
            Ok(())
        }
    }
}

impl PinGateway for FakePins {
    async fn on(&self, pin: PinId) -> Result<(), GatewayError> {
        self.check()?;
        self.set(pin, true);
        Ok(())
    }

    async fn off(&self, pin: PinId) -> Result<(), GatewayError> {
        self.check()?;
        self.set(pin, false);
        Ok(())
    }

    async fn toggle(&self, pin: PinId) -> Result<bool, GatewayError> {
        self.check()?;
        let on = !self.is_on(pin);
        self.set(pin, on);
        Ok(on)
    }

    async fn get(&self, pin: PinId) -> Result<bool, GatewayError> {
        self.check()?;
        Ok(self.is_on(pin))
    }
}

/// Display recording every committed frame
#[derive(Default)]
pub struct FakeDisplay {
    drawn: Option<Frame>,
    commits: RefCell<Vec<(Frame, RefreshMode)>>,
    pub failing: Cell<bool>,
}

impl FakeDisplay {
    pub fn commits(&self) -> usize {
        self.commits.borrow().len()
    }

    pub fn last(&self) -> (Frame, RefreshMode) {
        self.commits.borrow().last().cloned().expect("nothing committed")
    }

    pub fn last_message(&self) -> Option<String> {
        self.last().0.message().map(str::to_string)
    }

    pub fn last_legend(&self) -> String {
        self.last().0.legend().map(str::to_string).unwrap_or_default()
    }
}

impl RenderGateway for FakeDisplay {
    async fn draw(&mut self, frame: &Frame) -> Result<(), GatewayError> {
        self.drawn = Some(frame.clone());
        Ok(())
    }

    async fn commit(&mut self, mode: RefreshMode) -> Result<(), GatewayError> {
        if self.failing.get() {
            return Err(GatewayError::Timeout);
        }
        let frame = self.drawn.clone().unwrap_or_default();
        self.commits.borrow_mut().push((frame, mode));
        Ok(())
    }
}

/// Sound module with a card that may miss its files
#[derive(Default)]
pub struct FakeAudio {
    pub missing: Cell<bool>,
    pub playing: Cell<bool>,
    pub loaded: Cell<Option<Source>>,
    pub volume: Cell<Option<Volume>>,
    pub plays: Cell<u32>,
    next_random: Cell<u16>,
}

impl AudioPlayer for FakeAudio {
    async fn load(&mut self, source: Source) -> Result<Track, AudioError> {
        if self.missing.get() {
            return Err(AudioError::FileMissing);
        }
        self.loaded.set(Some(source));
        let track = match source {
            Source::Track(track) => track,
            Source::Random => {
                let n = self.next_random.get() + 1;
                self.next_random.set(n);
                Track(100 + n)
            }
        };
        Ok(track)
    }

    async fn play(&mut self) -> Result<(), GatewayError> {
        self.playing.set(true);
        self.plays.set(self.plays.get() + 1);
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), GatewayError> {
        self.playing.set(false);
        Ok(())
    }

    async fn is_playing(&mut self) -> Result<bool, GatewayError> {
        Ok(self.playing.get())
    }

    async fn set_volume(&mut self, volume: Volume) -> Result<(), GatewayError> {
        self.volume.set(Some(volume));
        Ok(())
    }
}

/// Alarm record in memory
pub struct MemoryStore {
    pub record: Cell<Result<AlarmConfig, ConfigError>>,
    pub saves: Cell<u32>,
    pub save_fails: Cell<bool>,
}

impl MemoryStore {
    pub fn holding(config: AlarmConfig) -> Self {
        Self {
            record: Cell::new(Ok(config)),
            saves: Cell::new(0),
            save_fails: Cell::new(false),
        }
    }
}

impl AlarmStore for MemoryStore {
    async fn load(&mut self) -> Result<AlarmConfig, ConfigError> {
        self.record.get()
    }

    async fn save(&mut self, config: &AlarmConfig) -> Result<(), ConfigError> {
        if self.save_fails.get() {
            return Err(ConfigError::Storage);
        }
        self.record.set(Ok(*config));
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

/// Board with a sensor but no load or memory figures
pub struct FakeProbe;

impl SystemProbe for FakeProbe {
    async fn cpu_load(&mut self) -> Option<u8> {
        None
    }

    async fn memory_usage(&mut self) -> Option<u8> {
        None
    }

    async fn uptime_secs(&mut self) -> Option<u64> {
        Some(86_400 + 2 * 3_600 + 3 * 60)
    }

    async fn sensor_temperature_f(&mut self) -> Option<f32> {
        Some(70.3)
    }

    async fn cpu_temperature_f(&mut self) -> Option<f32> {
        Some(98.6)
    }
}

pub type TestConsole = Console<FakePins, FakeDisplay, FakeAudio, MemoryStore, FakeProbe>;

/// Sunday, October 18th 2026 at `hour:minute`
pub fn at(hour: u8, minute: u8) -> Now {
    at_second(hour, minute, 0)
}

pub fn at_second(hour: u8, minute: u8, second: u8) -> Now {
    Now::new(
        Date {
            year: 2026,
            month: 10,
            day: 18,
            weekday: Weekday::Sunday,
        },
        ClockTime::new(hour, minute, second),
    )
}

pub fn alarm(hour: u8, minute: u8, enabled: bool) -> AlarmConfig {
    AlarmConfig::new(hour, minute, enabled).expect("valid alarm")
}

pub fn gateways(config: AlarmConfig) -> Gateways<FakePins, FakeDisplay, FakeAudio, MemoryStore, FakeProbe> {
    Gateways {
        pins: FakePins::default(),
        display: FakeDisplay::default(),
        audio: FakeAudio::default(),
        store: MemoryStore::holding(config),
        probe: FakeProbe,
    }
}

/// A console with stock settings, started at `now`
pub fn console(config: AlarmConfig, now: &Now) -> TestConsole {
    block_on(Console::start(ConsoleConfig::default(), gateways(config), now)).expect("console starts")
}

pub fn press(button: Button) -> ButtonSet {
    ButtonSet::only(button)
}

pub fn tick(console: &mut TestConsole, pressed: ButtonSet, now: &Now) -> Flow {
    block_on(console.tick(pressed, now))
}

pub fn idle(console: &mut TestConsole, now: &Now) -> Flow {
    tick(console, ButtonSet::EMPTY, now)
}
