//! # Menu
//! Hierarchical navigation over the console's menu nodes.
//!
//! Every node declares its soft-key legend, the action bound to each button, how many idle ticks
//! it tolerates and where it goes when they run out. [`MenuTree::step`] walks that table once per
//! tick. Commands are not executed here, they are handed back to the tick loop together with the
//! node the menu moved to.

mod table;

use crate::buttons::{Button, ButtonSet};
use crate::config::ConsoleConfig;
use crate::gateway::PinId;
use crate::life::Pattern;
use crate::screen::Label;

pub use table::node;

/// Identifies a menu node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NodeId {
    /// Main screen with the clock
    Root,
    /// Alarm and power entries
    Menu,
    /// Alarm toggle and status
    AlarmMenu,
    /// Shutdown and reboot
    Power,
    /// Telemetry
    Info,
    /// Load, memory and uptime
    InfoMore,
    /// Sensor and processor temperature
    Temperature,
    /// Volume, music and Life entries
    Stuff,
    /// Life seed choice
    Life,
    /// A Life board running
    LifeRun,
    /// Volume up and down, alarm test
    Volume,
    /// Shuffle play
    Music,
    /// Relay toggles
    Lights,
    /// More relay toggles, all off
    LightsMore,
    /// Shutoff timer of the speaker relay
    PinTimer,
}

/// Idle timeout class of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdleTimeout {
    /// The node never times out
    Never,
    /// The usual submenu timeout
    Submenu,
    /// The longer timeout of the fast ticking volume menu
    Extended,
}

/// Tick length while a node is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cadence {
    /// One second
    Normal,
    /// Half a second
    Fast,
}

/// Work the tick loop carries out for a button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Flip a relay, cancelling its timer
    TogglePin(PinId),
    /// Switch a relay on and arm its shutoff timer
    ArmTimer {
        /// Relay to switch
        pin: PinId,
        /// Hours until it goes off
        hours: u8,
    },
    /// Every relay off, every timer cancelled
    AllOff,
    /// Flip the alarm on or off and save
    ToggleAlarm,
    /// Read the alarm configuration again and show it
    ReloadAlarm,
    /// Ring the alarm now
    TestAlarm,
    /// Louder by one step
    VolumeUp,
    /// Quieter by one step
    VolumeDown,
    /// Speaker on, start shuffle play
    StartMusic,
    /// Next random track
    SkipTrack,
    /// Stop shuffle play, speaker off
    StopMusic,
    /// Start a Life board from a pattern
    SeedLife(Pattern),
    /// Show processor load
    ShowLoad,
    /// Show memory use
    ShowMemory,
    /// Show uptime
    ShowUptime,
    /// Show the external sensor temperature
    ShowSensorTemp,
    /// Show the processor temperature
    ShowCpuTemp,
    /// End the loop and power down
    Shutdown,
    /// End the loop and restart
    Reboot,
}

/// What a button does on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Go to a child node
    Navigate(NodeId),
    /// Go back to an explicit node, evaluated before any other binding
    Back(NodeId),
    /// Run a command, then show `then`
    Command {
        /// Work to do
        command: Command,
        /// Node shown afterwards
        then: NodeId,
    },
}

/// One entry of the menu table
#[derive(Debug)]
pub struct MenuNode {
    /// Which node this is
    pub id: NodeId,
    /// Soft-key legend, SW4 first
    pub legend: &'static [Label],
    /// Button bindings in declaration order
    pub bindings: &'static [(Button, Action)],
    /// How long the node tolerates no input
    pub idle: IdleTimeout,
    /// Where the node goes when the idle timeout runs out
    pub idle_target: NodeId,
    /// Tick length while shown
    pub cadence: Cadence,
}

impl MenuNode {
    /// The binding that wins for `pressed`: Back first, then declaration order
    #[must_use]
    pub fn binding(&self, pressed: ButtonSet) -> Option<Action> {
        let held = |(button, _): &&(Button, Action)| pressed.contains(*button);
        self.bindings
            .iter()
            .filter(held)
            .find(|(_, action)| matches!(action, Action::Back(_)))
            .or_else(|| self.bindings.iter().find(held))
            .map(|(_, action)| *action)
    }
}

/// Outcome of one menu tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuEvent {
    /// Nothing bound was pressed and the node did not time out
    Stayed,
    /// A navigation binding moved the menu
    Moved(NodeId),
    /// The node timed out and the menu moved to its idle target
    TimedOut(NodeId),
    /// A command binding fired, the menu now shows `then`
    Command {
        /// Work for the tick loop
        command: Command,
        /// Node the menu moved to
        then: NodeId,
    },
}

/// Menu position and idle counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuTree {
    /// Node shown
    current: NodeId,
    /// Ticks without a bound press on the current node
    idle_ticks: u16,
    /// Length of [`IdleTimeout::Submenu`]
    submenu_idle_ticks: u16,
    /// Length of [`IdleTimeout::Extended`]
    extended_idle_ticks: u16,
}

impl MenuTree {
    /// A menu on the main screen
    #[must_use]
    pub const fn new(config: &ConsoleConfig) -> Self {
        Self {
            current: NodeId::Root,
            idle_ticks: 0,
            submenu_idle_ticks: config.submenu_idle_ticks,
            extended_idle_ticks: config.volume_idle_ticks,
        }
    }

    /// Node shown
    #[must_use]
    pub const fn current(&self) -> NodeId {
        self.current
    }

    /// Table entry of the node shown
    #[must_use]
    pub fn node(&self) -> &'static MenuNode {
        node(self.current)
    }

    /// Ticks without input on the current node
    #[must_use]
    pub const fn idle_ticks(&self) -> u16 {
        self.idle_ticks
    }

    /// Number of idle ticks after which the current node times out
    #[must_use]
    pub fn idle_limit(&self) -> Option<u16> {
        match self.node().idle {
            IdleTimeout::Never => None,
            IdleTimeout::Submenu => Some(self.submenu_idle_ticks),
            IdleTimeout::Extended => Some(self.extended_idle_ticks),
        }
    }

    /// Move to `to` outside of the table, e.g. when a command fails
    pub fn jump(&mut self, to: NodeId) {
        self.current = to;
        self.idle_ticks = 0;
    }

    /// Start counting idle ticks from zero again
    pub fn reset_idle(&mut self) {
        self.idle_ticks = 0;
    }

    /// Feed the menu one tick of button input
    pub fn step(&mut self, pressed: ButtonSet) -> MenuEvent {
        if let Some(action) = self.node().binding(pressed) {
            return match action {
                Action::Navigate(to) | Action::Back(to) => {
                    debug!("menu {} -> {}", self.current, to);
                    self.jump(to);
                    MenuEvent::Moved(to)
                }
                Action::Command { command, then } => {
                    debug!("menu command {} -> {}", command, then);
                    self.jump(then);
                    MenuEvent::Command { command, then }
                }
            };
        }

        let Some(limit) = self.idle_limit() else {
            return MenuEvent::Stayed;
        };
        self.idle_ticks = self.idle_ticks.saturating_add(1);
        if self.idle_ticks < limit {
            return MenuEvent::Stayed;
        }
        let to = self.node().idle_target;
        debug!("menu {} idle, back to {}", self.current, to);
        self.jump(to);
        MenuEvent::TimedOut(to)
    }
}
