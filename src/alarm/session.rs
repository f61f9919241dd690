//! # Alarm session
//! The ringing and snooze state machine.
//!
//! A session starts when the alarm is due or when the alarm test is picked from the volume menu,
//! both go through [`AlarmSession::start`]. While it is active the session receives every button
//! press and the menu receives none.
//!
//! Countdowns count distinct clock-minute transitions. A ring that nobody answers lasts eleven of
//! them, a snooze five. When the session ends the speaker relay goes off but the lights relay is
//! left on.

use crate::buttons::{Button, ButtonSet};
use crate::clock::{ClockTime, MinuteWatch};
use crate::config::ConsoleConfig;
use crate::gateway::{AudioPlayer, PinGateway, Source};
use crate::relays::Relays;
use crate::screen::{Label, RefreshMode, Render, text};
use crate::volume::Volume;

/// Minute transitions an unanswered alarm rings for
pub const RING_MINUTES: u8 = 11;
/// Minute transitions a snooze lasts
pub const SNOOZE_MINUTES: u8 = 5;

/// Legend while ringing
const RINGING_LEGEND: &[Label] = &[Label::Text("Off"), Label::Text("Snooze")];
/// Legend while snoozed
const SNOOZED_LEGEND: &[Label] = &[Label::Text("Back")];

/// What a snoozed session shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SnoozeView {
    /// The snooze screen, SW4 is Back
    Snoozed,
    /// The ringing screen after Back. The snooze keeps running silently, SW4 turns the alarm
    /// off and SW3 starts a fresh snooze.
    Ringing,
}

/// State of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// No alarm active, the menu has the buttons
    Idle,
    /// Sound playing
    Ringing {
        /// Minute transitions left before the alarm gives up
        countdown: u8,
    },
    /// Sound stopped for a while
    Snoozed {
        /// Minute transitions left before ringing again
        countdown: u8,
        /// Screen shown meanwhile
        view: SnoozeView,
    },
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionEnd {
    /// Off was pressed
    TurnedOff,
    /// Nobody answered
    TimedOut,
    /// The alarm sound could not be loaded
    AudioUnavailable,
}

impl SessionEnd {
    /// Status message shown when the menu takes over again
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::TurnedOff | Self::TimedOut => "Alarm turned off",
            Self::AudioUnavailable => "Incorrect/missing audio file",
        }
    }
}

/// Result of feeding the session a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStep {
    /// No session, the menu handles the tick
    Idle,
    /// Session running, optionally with a frame to show
    Active(Option<Render>),
    /// Session ended during this tick
    Ended(SessionEnd),
}

/// Hardware the session works with during one call
pub struct SessionIo<'a, P, A> {
    /// Relay bank
    pub relays: &'a mut Relays<P>,
    /// Sound output
    pub audio: &'a mut A,
    /// Relay roles, alarm sound and level
    pub config: &'a ConsoleConfig,
    /// User volume to restore when the session ends
    pub volume: Volume,
}

/// The one alarm session of the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmSession {
    /// Current state
    state: SessionState,
    /// Minute transitions seen since the last countdown change
    minutes: MinuteWatch,
}

impl AlarmSession {
    /// A session that is not ringing
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SessionState::Idle,
            minutes: MinuteWatch::new(),
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the session holds the buttons
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, SessionState::Idle)
    }

    /// Start ringing: lights and speaker on, the designated relay off, load and play the alarm.
    /// If the sound cannot be loaded only the speaker goes off again and the session ends at once.
    pub async fn start<P: PinGateway, A: AudioPlayer>(
        &mut self,
        now: ClockTime,
        io: SessionIo<'_, P, A>,
    ) -> SessionStep {
        info!("alarm session start");
        let config = io.config;
        io.relays.on(config.lights).await;
        io.relays.on(config.speaker).await;
        io.relays.off(config.alarm_off_pin).await;

        if let Err(e) = io.audio.load(Source::Track(config.alarm_track)).await {
            warn!("alarm sound unavailable: {}", e);
            io.relays.off(config.speaker).await;
            self.state = SessionState::Idle;
            return SessionStep::Ended(SessionEnd::AudioUnavailable);
        }
        if let Err(e) = io.audio.set_volume(config.alarm_volume).await {
            warn!("alarm volume not set: {}", e);
        }
        play(&mut *io.audio).await;

        self.ring(now);
        SessionStep::Active(Some(ringing_screen()))
    }

    /// Feed the session one tick
    pub async fn tick<P: PinGateway, A: AudioPlayer>(
        &mut self,
        pressed: ButtonSet,
        now: ClockTime,
        io: SessionIo<'_, P, A>,
    ) -> SessionStep {
        match self.state {
            SessionState::Idle => SessionStep::Idle,
            SessionState::Ringing { countdown } => self.ringing(countdown, pressed, now, io).await,
            SessionState::Snoozed { countdown, view } => {
                self.snoozed(countdown, view, pressed, now, io).await
            }
        }
    }

    /// Tick while ringing. Off wins over Snooze.
    async fn ringing<P: PinGateway, A: AudioPlayer>(
        &mut self,
        countdown: u8,
        pressed: ButtonSet,
        now: ClockTime,
        io: SessionIo<'_, P, A>,
    ) -> SessionStep {
        if pressed.contains(Button::Sw4) {
            return self.finish(SessionEnd::TurnedOff, io).await;
        }
        if pressed.contains(Button::Sw3) {
            return self.snooze(now, &mut *io.audio).await;
        }

        // the track ended, start it over
        if matches!(io.audio.is_playing().await, Ok(false)) {
            play(&mut *io.audio).await;
        }

        if !self.minutes.changed(now.minute) {
            return SessionStep::Active(None);
        }
        let countdown = countdown.saturating_sub(1);
        debug!("alarm ringing, {} minutes left", countdown);
        if countdown == 0 {
            return self.finish(SessionEnd::TimedOut, io).await;
        }
        self.state = SessionState::Ringing { countdown };
        SessionStep::Active(Some(ringing_screen()))
    }

    /// Tick while snoozed
    async fn snoozed<P: PinGateway, A: AudioPlayer>(
        &mut self,
        countdown: u8,
        view: SnoozeView,
        pressed: ButtonSet,
        now: ClockTime,
        io: SessionIo<'_, P, A>,
    ) -> SessionStep {
        match view {
            SnoozeView::Snoozed if pressed.contains(Button::Sw4) => {
                self.state = SessionState::Snoozed {
                    countdown,
                    view: SnoozeView::Ringing,
                };
                return SessionStep::Active(Some(ringing_screen()));
            }
            SnoozeView::Ringing if pressed.contains(Button::Sw4) => {
                return self.finish(SessionEnd::TurnedOff, io).await;
            }
            SnoozeView::Ringing if pressed.contains(Button::Sw3) => {
                return self.snooze(now, &mut *io.audio).await;
            }
            _ => {}
        }

        if !self.minutes.changed(now.minute) {
            return SessionStep::Active(None);
        }
        let countdown = countdown.saturating_sub(1);
        if countdown == 0 {
            info!("snooze over, ringing again");
            play(&mut *io.audio).await;
            self.ring(now);
            return SessionStep::Active(Some(ringing_screen()));
        }
        self.state = SessionState::Snoozed { countdown, view };
        let screen = match view {
            SnoozeView::Snoozed => snoozed_screen(RefreshMode::for_minute(now.minute)),
            SnoozeView::Ringing => ringing_screen(),
        };
        SessionStep::Active(Some(screen))
    }

    /// Enter or restart ringing with a fresh countdown
    fn ring(&mut self, now: ClockTime) {
        self.state = SessionState::Ringing {
            countdown: RING_MINUTES,
        };
        self.minutes = MinuteWatch::starting_at(now.minute);
    }

    /// Stop the sound and start a fresh snooze. The relays stay as they are.
    async fn snooze<A: AudioPlayer>(&mut self, now: ClockTime, audio: &mut A) -> SessionStep {
        info!("alarm snoozed");
        if let Err(e) = audio.stop().await {
            warn!("stop failed: {}", e);
        }
        self.state = SessionState::Snoozed {
            countdown: SNOOZE_MINUTES,
            view: SnoozeView::Snoozed,
        };
        self.minutes = MinuteWatch::starting_at(now.minute);
        SessionStep::Active(Some(snoozed_screen(RefreshMode::Full)))
    }

    /// Stop the sound, restore the user volume and switch the speaker off. Lights stay on.
    async fn finish<P: PinGateway, A: AudioPlayer>(
        &mut self,
        end: SessionEnd,
        io: SessionIo<'_, P, A>,
    ) -> SessionStep {
        info!("alarm session over: {}", end);
        if let Err(e) = io.audio.stop().await {
            warn!("stop failed: {}", e);
        }
        if let Err(e) = io.audio.set_volume(io.volume).await {
            warn!("volume not restored: {}", e);
        }
        io.relays.off(io.config.speaker).await;
        self.state = SessionState::Idle;
        SessionStep::Ended(end)
    }
}

impl Default for AlarmSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Start playback, logging a failure. The next tick tries again.
async fn play<A: AudioPlayer>(audio: &mut A) {
    if let Err(e) = audio.play().await {
        warn!("play failed: {}", e);
    }
}

/// The ringing screen
fn ringing_screen() -> Render {
    Render::console(
        RINGING_LEGEND,
        Some(text("TURN OFF THE ALARM")),
        RefreshMode::Full,
    )
}

/// The snooze screen
fn snoozed_screen(mode: RefreshMode) -> Render {
    Render::console(SNOOZED_LEGEND, Some(text("Alarm snoozed")), mode)
}
