//! The menu table. Bindings are declared SW4 first, the same order the legend prints them.

use super::{Action, Cadence, Command, IdleTimeout, MenuNode, NodeId};
use crate::buttons::Button::{Sw1, Sw2, Sw3, Sw4};
use crate::gateway::PinId;
use crate::life::Pattern;
use crate::screen::Label::{Pin, Text};

/// Shorthand for a command binding
const fn run(command: Command, then: NodeId) -> Action {
    Action::Command { command, then }
}

static ROOT: MenuNode = MenuNode {
    id: NodeId::Root,
    legend: &[Text("Menu"), Text("Info"), Text("Stuff"), Text("Lights")],
    bindings: &[
        (Sw4, Action::Navigate(NodeId::Menu)),
        (Sw3, Action::Navigate(NodeId::Info)),
        (Sw2, Action::Navigate(NodeId::Stuff)),
        (Sw1, Action::Navigate(NodeId::Lights)),
    ],
    idle: IdleTimeout::Never,
    idle_target: NodeId::Root,
    cadence: Cadence::Normal,
};

static MENU: MenuNode = MenuNode {
    id: NodeId::Menu,
    legend: &[Text("Back"), Text("Alarm"), Text("Power")],
    bindings: &[
        (Sw4, Action::Back(NodeId::Root)),
        (Sw3, Action::Navigate(NodeId::AlarmMenu)),
        (Sw2, Action::Navigate(NodeId::Power)),
    ],
    idle: IdleTimeout::Submenu,
    idle_target: NodeId::Root,
    cadence: Cadence::Normal,
};

static ALARM_MENU: MenuNode = MenuNode {
    id: NodeId::AlarmMenu,
    legend: &[Text("Back"), Text("Toggle"), Text("Status")],
    bindings: &[
        (Sw4, Action::Back(NodeId::Menu)),
        (Sw3, run(Command::ToggleAlarm, NodeId::Root)),
        (Sw2, run(Command::ReloadAlarm, NodeId::Root)),
    ],
    idle: IdleTimeout::Submenu,
    idle_target: NodeId::Root,
    cadence: Cadence::Normal,
};

static POWER: MenuNode = MenuNode {
    id: NodeId::Power,
    legend: &[Text("Back"), Text("Shutdown"), Text("Reboot")],
    bindings: &[
        (Sw4, Action::Back(NodeId::Menu)),
        (Sw3, run(Command::Shutdown, NodeId::Power)),
        (Sw2, run(Command::Reboot, NodeId::Power)),
    ],
    idle: IdleTimeout::Submenu,
    idle_target: NodeId::Root,
    cadence: Cadence::Normal,
};

static INFO: MenuNode = MenuNode {
    id: NodeId::Info,
    legend: &[Text("Back"), Text("More"), Text("Temp")],
    bindings: &[
        (Sw4, Action::Back(NodeId::Root)),
        (Sw3, Action::Navigate(NodeId::InfoMore)),
        (Sw2, Action::Navigate(NodeId::Temperature)),
    ],
    idle: IdleTimeout::Submenu,
    idle_target: NodeId::Root,
    cadence: Cadence::Normal,
};

static INFO_MORE: MenuNode = MenuNode {
    id: NodeId::InfoMore,
    legend: &[Text("Back"), Text("CPU"), Text("RAM"), Text("Uptime")],
    bindings: &[
        (Sw4, Action::Back(NodeId::Info)),
        (Sw3, run(Command::ShowLoad, NodeId::Info)),
        (Sw2, run(Command::ShowMemory, NodeId::Info)),
        (Sw1, run(Command::ShowUptime, NodeId::Info)),
    ],
    idle: IdleTimeout::Submenu,
    idle_target: NodeId::Root,
    cadence: Cadence::Normal,
};

static TEMPERATURE: MenuNode = MenuNode {
    id: NodeId::Temperature,
    legend: &[Text("Back"), Text("LM75"), Text("CPU")],
    bindings: &[
        (Sw4, Action::Back(NodeId::Info)),
        (Sw3, run(Command::ShowSensorTemp, NodeId::Info)),
        (Sw2, run(Command::ShowCpuTemp, NodeId::Info)),
    ],
    idle: IdleTimeout::Submenu,
    idle_target: NodeId::Root,
    cadence: Cadence::Normal,
};

static STUFF: MenuNode = MenuNode {
    id: NodeId::Stuff,
    legend: &[Text("Back"), Text("GOL"), Text("Volume"), Text("Music")],
    bindings: &[
        (Sw4, Action::Back(NodeId::Root)),
        (Sw3, Action::Navigate(NodeId::Life)),
        (Sw2, Action::Navigate(NodeId::Volume)),
        (Sw1, run(Command::StartMusic, NodeId::Music)),
    ],
    idle: IdleTimeout::Submenu,
    idle_target: NodeId::Root,
    cadence: Cadence::Normal,
};

static LIFE: MenuNode = MenuNode {
    id: NodeId::Life,
    legend: &[Text("Back"), Text("Random"), Text("Gosper"), Text("R")],
    bindings: &[
        (Sw4, Action::Back(NodeId::Stuff)),
        (Sw3, run(Command::SeedLife(Pattern::Random), NodeId::LifeRun)),
        (Sw2, run(Command::SeedLife(Pattern::GosperGun), NodeId::LifeRun)),
        (Sw1, run(Command::SeedLife(Pattern::RPentomino), NodeId::LifeRun)),
    ],
    idle: IdleTimeout::Submenu,
    idle_target: NodeId::Root,
    cadence: Cadence::Normal,
};

/// The board covers the panel, no legend is drawn while it runs
static LIFE_RUN: MenuNode = MenuNode {
    id: NodeId::LifeRun,
    legend: &[Text("Back")],
    bindings: &[(Sw4, Action::Back(NodeId::Life))],
    idle: IdleTimeout::Never,
    idle_target: NodeId::Root,
    cadence: Cadence::Fast,
};

static VOLUME: MenuNode = MenuNode {
    id: NodeId::Volume,
    legend: &[Text("Back"), Text("Test"), Text("Up"), Text("Down")],
    bindings: &[
        (Sw4, Action::Back(NodeId::Stuff)),
        (Sw3, run(Command::TestAlarm, NodeId::Volume)),
        (Sw2, run(Command::VolumeUp, NodeId::Volume)),
        (Sw1, run(Command::VolumeDown, NodeId::Volume)),
    ],
    idle: IdleTimeout::Extended,
    idle_target: NodeId::Root,
    cadence: Cadence::Fast,
};

static MUSIC: MenuNode = MenuNode {
    id: NodeId::Music,
    legend: &[Text("Off"), Text("Skip"), Text("Up"), Text("Down")],
    bindings: &[
        (Sw4, run(Command::StopMusic, NodeId::Stuff)),
        (Sw3, run(Command::SkipTrack, NodeId::Music)),
        (Sw2, run(Command::VolumeUp, NodeId::Music)),
        (Sw1, run(Command::VolumeDown, NodeId::Music)),
    ],
    idle: IdleTimeout::Never,
    idle_target: NodeId::Root,
    cadence: Cadence::Fast,
};

static LIGHTS: MenuNode = MenuNode {
    id: NodeId::Lights,
    legend: &[Text("Back"), Text("More"), Pin(PinId::P10), Pin(PinId::P9)],
    bindings: &[
        (Sw4, Action::Back(NodeId::Root)),
        (Sw3, Action::Navigate(NodeId::LightsMore)),
        (Sw2, run(Command::TogglePin(PinId::P10), NodeId::Root)),
        (Sw1, run(Command::TogglePin(PinId::P9), NodeId::Root)),
    ],
    idle: IdleTimeout::Submenu,
    idle_target: NodeId::Root,
    cadence: Cadence::Normal,
};

static LIGHTS_MORE: MenuNode = MenuNode {
    id: NodeId::LightsMore,
    legend: &[Text("Back"), Pin(PinId::P11), Pin(PinId::P12), Text("Off")],
    bindings: &[
        (Sw4, Action::Back(NodeId::Lights)),
        (Sw3, Action::Navigate(NodeId::PinTimer)),
        (Sw2, run(Command::TogglePin(PinId::P12), NodeId::Lights)),
        (Sw1, run(Command::AllOff, NodeId::Lights)),
    ],
    idle: IdleTimeout::Submenu,
    idle_target: NodeId::Root,
    cadence: Cadence::Normal,
};

static PIN_TIMER: MenuNode = MenuNode {
    id: NodeId::PinTimer,
    legend: &[Text("Back"), Pin(PinId::P11), Text("1-Hour"), Text("2-Hours")],
    bindings: &[
        (Sw4, Action::Back(NodeId::LightsMore)),
        (Sw3, run(Command::TogglePin(PinId::P11), NodeId::LightsMore)),
        (
            Sw2,
            run(
                Command::ArmTimer {
                    pin: PinId::P11,
                    hours: 1,
                },
                NodeId::LightsMore,
            ),
        ),
        (
            Sw1,
            run(
                Command::ArmTimer {
                    pin: PinId::P11,
                    hours: 2,
                },
                NodeId::LightsMore,
            ),
        ),
    ],
    idle: IdleTimeout::Submenu,
    idle_target: NodeId::Root,
    cadence: Cadence::Normal,
};

/// Table entry of `id`
#[must_use]
pub fn node(id: NodeId) -> &'static MenuNode {
    match id {
        NodeId::Root => &ROOT,
        NodeId::Menu => &MENU,
        NodeId::AlarmMenu => &ALARM_MENU,
        NodeId::Power => &POWER,
        NodeId::Info => &INFO,
        NodeId::InfoMore => &INFO_MORE,
        NodeId::Temperature => &TEMPERATURE,
        NodeId::Stuff => &STUFF,
        NodeId::Life => &LIFE,
        NodeId::LifeRun => &LIFE_RUN,
        NodeId::Volume => &VOLUME,
        NodeId::Music => &MUSIC,
        NodeId::Lights => &LIGHTS,
        NodeId::LightsMore => &LIGHTS_MORE,
        NodeId::PinTimer => &PIN_TIMER,
    }
}
