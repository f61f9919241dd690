//! # Console
//! The tick loop: one [`Console::tick`] per interval sequences everything the console does.
//!
//! Per tick, in this order: retry relay writes that failed earlier, reload the alarm at minute 30,
//! fire due relay timers, check whether the alarm is due, then feed the tick either to the alarm
//! session (while it is active) or to the menu, and finally show at most one frame. The caller
//! sleeps for [`Console::tick_interval`] between ticks.
//!
//! All state of the console lives in this one value and is only changed by `tick`.

use crate::alarm::AlarmScheduler;
use crate::alarm::session::{AlarmSession, SessionIo, SessionState, SessionStep};
use crate::buttons::ButtonSet;
use crate::clock::{ClockTime, MinuteWatch, Now};
use crate::config::ConsoleConfig;
use crate::error::{AudioError, Error};
use crate::gateway::{AlarmStore, AudioPlayer, PinGateway, PinId, RenderGateway, SystemProbe, Track};
use crate::life::Board;
use crate::menu::{Cadence, Command, MenuEvent, MenuTree, NodeId};
use crate::music::MusicPlayer;
use crate::relays::Relays;
use crate::screen::{Frame, RefreshMode, Render, Screen, Text, format, text};
use crate::timers::TimerScheduler;
use crate::volume::Volume;
use core::fmt;
use embassy_time::Duration;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Message shown when a sound cannot be loaded
const AUDIO_UNAVAILABLE: &str = "Incorrect/missing audio file";

/// Why the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExitReason {
    /// Power down
    Shutdown,
    /// Restart
    Reboot,
}

/// Whether the loop goes on after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Flow {
    /// Sleep and tick again
    Continue,
    /// Run the teardown and stop
    Exit(ExitReason),
}

/// The hardware a console is built from
pub struct Gateways<P, R, A, S, Y> {
    /// Relay bank
    pub pins: P,
    /// Display
    pub display: R,
    /// Sound output
    pub audio: A,
    /// Alarm configuration storage
    pub store: S,
    /// Telemetry
    pub probe: Y,
}

/// The console: gateways plus every state machine of the core
pub struct Console<P, R, A, S, Y> {
    /// Settings
    config: ConsoleConfig,
    /// Relay bank with write retries
    relays: Relays<P>,
    /// Display with frame retries
    screen: Screen<R>,
    /// Sound output
    audio: A,
    /// Telemetry
    probe: Y,
    /// Alarm configuration and due check
    alarm: AlarmScheduler<S>,
    /// Ringing and snooze
    session: AlarmSession,
    /// Relay shutoff timers
    timers: TimerScheduler,
    /// Menu position
    menu: MenuTree,
    /// Shuffle play
    music: MusicPlayer,
    /// Life board of the Life screen
    life: Board,
    /// Randomness for Life boards
    rng: SmallRng,
    /// User volume
    volume: Volume,
    /// Minute transitions of the clock, for the half-hourly reload
    clock_minutes: MinuteWatch,
    /// Minute last drawn on the main screen
    root_minutes: MinuteWatch,
    /// Set once shutdown or reboot was picked
    exiting: bool,
}

impl<P, R, A, S, Y> Console<P, R, A, S, Y>
where
    P: PinGateway,
    R: RenderGateway,
    A: AudioPlayer,
    S: AlarmStore,
    Y: SystemProbe,
{
    /// Load the alarm configuration, set the start-up volume and draw the main screen.
    ///
    /// # Errors
    /// A missing or malformed alarm configuration is returned, the console does not start without one.
    pub async fn start(
        config: ConsoleConfig,
        gateways: Gateways<P, R, A, S, Y>,
        now: &Now,
    ) -> Result<Self, Error> {
        let alarm = AlarmScheduler::load(gateways.store).await?;
        let mut console = Self {
            relays: Relays::new(gateways.pins),
            screen: Screen::new(gateways.display),
            audio: gateways.audio,
            probe: gateways.probe,
            alarm,
            session: AlarmSession::new(),
            timers: TimerScheduler::new(),
            menu: MenuTree::new(&config),
            music: MusicPlayer::new(),
            life: Board::empty(),
            rng: SmallRng::seed_from_u64(seed(now)),
            volume: config.start_volume,
            clock_minutes: MinuteWatch::starting_at(now.time.minute),
            root_minutes: MinuteWatch::new(),
            exiting: false,
            config,
        };
        if let Err(e) = console.audio.set_volume(console.volume).await {
            warn!("start-up volume not set: {}", e);
        }
        let main = console.node_screen(None, RefreshMode::Full);
        console.show(main, now).await;
        info!("console started");
        Ok(console)
    }

    /// Run one tick with the buttons `pressed` during it
    pub async fn tick(&mut self, pressed: ButtonSet, now: &Now) -> Flow {
        let time = now.time;
        self.relays.retry_pending().await;

        if self.clock_minutes.changed(time.minute) && time.minute == 30 {
            // a failure keeps the configuration in use and is logged by the scheduler
            let _ = self.alarm.reload().await;
        }

        for pin in self.timers.check(time) {
            info!("relay {} timer expired", pin.number());
            self.relays.off(pin).await;
        }

        let (render, flow) = if self.alarm.check_due(time, self.session.is_active()) {
            (self.start_alarm(time).await, Flow::Continue)
        } else if self.session.is_active() {
            (self.session_tick(pressed, time).await, Flow::Continue)
        } else {
            self.menu_tick(pressed, now).await
        };

        match render {
            Some(render) => self.show(render, now).await,
            None => {
                self.screen.flush().await;
            }
        }
        flow
    }

    /// Sleep between ticks: half a second in the volume and music menus and while a Life board
    /// runs, a second elsewhere and while the alarm is active
    pub fn tick_interval(&self) -> Duration {
        if self.session.is_active() {
            return self.config.normal_tick;
        }
        match self.menu.node().cadence {
            Cadence::Normal => self.config.normal_tick,
            Cadence::Fast => self.config.fast_tick,
        }
    }

    /// Last work before the loop ends: stop any sound and switch the speaker off.
    /// The shutdown or reboot banner stays on the display, any other exit shows `Turned off`.
    pub async fn teardown(&mut self) {
        info!("teardown");
        if let Err(e) = self.audio.stop().await {
            warn!("stop failed: {}", e);
        }
        self.relays.off(self.config.speaker).await;
        if self.exiting {
            self.screen.flush().await;
        } else {
            let frame = Frame::compose(
                &Render::banner("Turned off").view,
                // the banner does not show the time
                &placeholder_now(),
                &self.config.pin_names,
            );
            self.screen.show(frame, RefreshMode::Full).await;
        }
    }

    /// Feed an active session the tick
    async fn session_tick(&mut self, pressed: ButtonSet, time: ClockTime) -> Option<Render> {
        let io = SessionIo {
            relays: &mut self.relays,
            audio: &mut self.audio,
            config: &self.config,
            volume: self.volume,
        };
        let step = self.session.tick(pressed, time, io).await;
        self.session_screen(step)
    }

    /// Start the alarm session, scheduled or as a test.
    /// Shuffle play and a running Life board are left first, the session ends on their parent menu.
    async fn start_alarm(&mut self, time: ClockTime) -> Option<Render> {
        match self.menu.current() {
            NodeId::Music => {
                self.music
                    .leave(&mut self.relays, &mut self.audio, self.config.speaker)
                    .await;
                self.menu.jump(NodeId::Stuff);
            }
            NodeId::LifeRun => self.menu.jump(NodeId::Life),
            _ => {}
        }
        self.timers.disarm(self.config.speaker);
        let io = SessionIo {
            relays: &mut self.relays,
            audio: &mut self.audio,
            config: &self.config,
            volume: self.volume,
        };
        let step = self.session.start(time, io).await;
        self.session_screen(step)
    }

    /// What to show after a session step. When the session ended the menu takes over again.
    fn session_screen(&mut self, step: SessionStep) -> Option<Render> {
        match step {
            SessionStep::Idle => None,
            SessionStep::Active(render) => render,
            SessionStep::Ended(end) => {
                self.menu.reset_idle();
                Some(self.node_screen(Some(text(end.message())), RefreshMode::Full))
            }
        }
    }

    /// Feed the menu the tick
    async fn menu_tick(&mut self, pressed: ButtonSet, now: &Now) -> (Option<Render>, Flow) {
        match self.menu.step(pressed) {
            MenuEvent::Stayed => (self.idle_screen(now.time).await, Flow::Continue),
            MenuEvent::Moved(_) | MenuEvent::TimedOut(_) => {
                (Some(self.node_screen(None, RefreshMode::Full)), Flow::Continue)
            }
            MenuEvent::Command { command, .. } => self.execute(command, now.time).await,
        }
    }

    /// Work done on a tick without input: the main screen follows the clock, the music menu keeps
    /// a track playing and a running Life board advances one generation
    async fn idle_screen(&mut self, time: ClockTime) -> Option<Render> {
        match self.menu.current() {
            NodeId::Root if self.root_minutes.changed(time.minute) => Some(
                self.node_screen(None, RefreshMode::for_minute(time.minute)),
            ),
            NodeId::Music => match self.music.poll(&mut self.audio).await {
                Ok(Some(track)) => Some(self.node_screen(Some(song(track)), RefreshMode::Full)),
                Ok(None) => None,
                Err(e) => Some(self.music_failed(e).await),
            },
            NodeId::LifeRun => {
                self.life.step();
                Some(Render::life(self.life, RefreshMode::Partial))
            }
            _ => None,
        }
    }

    /// Carry out a menu command. The menu already moved to the command's target node.
    async fn execute(&mut self, command: Command, time: ClockTime) -> (Option<Render>, Flow) {
        let message = match command {
            Command::TogglePin(pin) => {
                self.timers.disarm(pin);
                let name = self.config.pin_names.get(pin);
                match self.relays.toggle(pin).await {
                    Some(_) => format(format_args!("{name} toggled")),
                    None => format(format_args!("{name} toggle failed")),
                }
            }
            Command::ArmTimer { pin, hours } => {
                let at = self.timers.arm(pin, time, hours);
                self.relays.on(pin).await;
                let name = self.config.pin_names.get(pin);
                format(format_args!("{name} off at: {}", at.short()))
            }
            Command::AllOff => {
                for pin in PinId::ALL {
                    self.relays.off(pin).await;
                }
                self.timers.disarm_all();
                text("All off")
            }
            Command::ToggleAlarm => match self.alarm.toggle().await {
                Ok(_) => format(format_args!("{}", self.alarm.config().status())),
                Err(_) => text("Alarm not saved"),
            },
            Command::ReloadAlarm => match self.alarm.reload().await {
                Ok(config) => format(format_args!("{}", config.status())),
                Err(_) => text("Alarm file unreadable"),
            },
            Command::TestAlarm => return (self.start_alarm(time).await, Flow::Continue),
            Command::VolumeUp => return (Some(self.set_volume(self.volume.up()).await), Flow::Continue),
            Command::VolumeDown => {
                return (Some(self.set_volume(self.volume.down()).await), Flow::Continue);
            }
            Command::StartMusic => {
                self.timers.disarm(self.config.speaker);
                self.music.enter(&mut self.relays, self.config.speaker).await;
                text("Song: Loading...")
            }
            Command::SkipTrack => match self.music.skip(&mut self.audio).await {
                Ok(track) => song(track),
                Err(e) => return (Some(self.music_failed(e).await), Flow::Continue),
            },
            Command::StopMusic => {
                self.music
                    .leave(&mut self.relays, &mut self.audio, self.config.speaker)
                    .await;
                return (Some(self.node_screen(None, RefreshMode::Full)), Flow::Continue);
            }
            Command::SeedLife(pattern) => {
                info!("life seeded with {}", pattern);
                self.life = Board::seeded(pattern, &mut self.rng);
                return (Some(Render::life(self.life, RefreshMode::Full)), Flow::Continue);
            }
            Command::ShowLoad => {
                let load = self.probe.cpu_load().await;
                reading("CPU Usage", load.map(|v| format(format_args!("{v}%"))))
            }
            Command::ShowMemory => {
                let used = self.probe.memory_usage().await;
                reading("RAM Usage", used.map(|v| format(format_args!("{v}%"))))
            }
            Command::ShowUptime => {
                let secs = self.probe.uptime_secs().await;
                reading("Uptime", secs.map(|s| format(format_args!("{}", Uptime(s)))))
            }
            Command::ShowSensorTemp => {
                let temp = self.probe.sensor_temperature_f().await;
                reading("LM75 Sensor temp", temp.map(|t| format(format_args!("{t:.1}F"))))
            }
            Command::ShowCpuTemp => {
                let temp = self.probe.cpu_temperature_f().await;
                reading("CPU Temp", temp.map(|t| format(format_args!("{t:.1}F"))))
            }
            Command::Shutdown => return self.exit(ExitReason::Shutdown, "Shutting Down!"),
            Command::Reboot => return self.exit(ExitReason::Reboot, "Rebooting!"),
        };
        (Some(self.node_screen(Some(message), RefreshMode::Full)), Flow::Continue)
    }

    /// Change the user volume, a partial refresh shows the new level
    async fn set_volume(&mut self, volume: Volume) -> Render {
        self.volume = volume;
        if let Err(e) = self.audio.set_volume(volume).await {
            warn!("volume not set: {}", e);
        }
        let message = format(format_args!("Volume: {}%", volume.percent()));
        self.node_screen(Some(message), RefreshMode::Partial)
    }

    /// Shuffle play could not load a track: speaker off, back to the Stuff menu
    async fn music_failed(&mut self, e: AudioError) -> Render {
        warn!("music stopped: {}", e);
        self.relays.off(self.config.speaker).await;
        self.menu.jump(NodeId::Stuff);
        self.node_screen(Some(text(AUDIO_UNAVAILABLE)), RefreshMode::Full)
    }

    /// End the loop after this tick with `banner` on the display
    fn exit(&mut self, reason: ExitReason, banner: &'static str) -> (Option<Render>, Flow) {
        info!("exit requested: {}", reason);
        self.exiting = true;
        (Some(Render::banner(banner)), Flow::Exit(reason))
    }

    /// The current node's screen
    fn node_screen(&self, message: Option<Text>, mode: RefreshMode) -> Render {
        Render::console(self.menu.node().legend, message, mode)
    }

    /// Compose and show `render`
    async fn show(&mut self, render: Render, now: &Now) {
        if self.menu.current() == NodeId::Root && !self.session.is_active() && !self.exiting {
            // the main screen now shows this minute
            self.root_minutes.changed(now.time.minute);
        }
        let frame = Frame::compose(&render.view, now, &self.config.pin_names);
        self.screen.show(frame, render.mode).await;
    }

    /// Settings
    pub const fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Relay bank with its retry queue
    pub const fn relays(&self) -> &Relays<P> {
        &self.relays
    }

    /// The display
    pub const fn display(&self) -> &R {
        self.screen.gateway()
    }

    /// Sound output
    pub const fn audio(&self) -> &A {
        &self.audio
    }

    /// Alarm scheduler
    pub const fn alarm(&self) -> &AlarmScheduler<S> {
        &self.alarm
    }

    /// State of the alarm session
    pub const fn session(&self) -> SessionState {
        self.session.state()
    }

    /// Menu position
    pub const fn menu(&self) -> &MenuTree {
        &self.menu
    }

    /// Relay timers
    pub const fn timers(&self) -> &TimerScheduler {
        &self.timers
    }

    /// User volume
    pub const fn volume(&self) -> Volume {
        self.volume
    }

    /// Track of the shuffle player
    pub const fn music_track(&self) -> Option<Track> {
        self.music.track()
    }
}

/// Status text of a music track
fn song(track: Track) -> Text {
    format(format_args!("Song: {:04}", track.0))
}

/// Seed of the Life randomness, from the time the console started
fn seed(now: &Now) -> u64 {
    let day = u64::from(now.date.year) * 372 + u64::from(now.date.month) * 31 + u64::from(now.date.day);
    let second = u64::from(now.time.hour) * 3_600 + u64::from(now.time.minute) * 60 + u64::from(now.time.second);
    day * 86_400 + second
}

/// `label: value`, or `label: n/a` when the board cannot provide the reading
fn reading(label: &str, value: Option<Text>) -> Text {
    match value {
        Some(value) => format(format_args!("{label}: {value}")),
        None => format(format_args!("{label}: n/a")),
    }
}

/// Uptime as days, hours and minutes
struct Uptime(u64);

impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = self.0 / 86_400;
        let hours = self.0 % 86_400 / 3_600;
        let minutes = self.0 % 3_600 / 60;
        write!(f, "{days} days, {hours:02}:{minutes:02}")
    }
}

/// Any time, for frames that do not show it
const fn placeholder_now() -> Now {
    Now::new(
        crate::clock::Date {
            year: 2000,
            month: 1,
            day: 1,
            weekday: crate::clock::Weekday::Saturday,
        },
        ClockTime::new(0, 0, 0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn uptime_text() {
        assert_eq!(Uptime(0).to_string(), "0 days, 00:00");
        assert_eq!(Uptime(3 * 86_400 + 4 * 3_600 + 5 * 60 + 59).to_string(), "3 days, 04:05");
    }

    #[test]
    fn readings() {
        assert_eq!(reading("CPU Temp", None).as_str(), "CPU Temp: n/a");
        assert_eq!(reading("RAM Usage", Some(text("40%"))).as_str(), "RAM Usage: 40%");
        assert_eq!(song(Track(7)).as_str(), "Song: 0007");
    }
}
