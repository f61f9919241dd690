//! # Tick loop
//! The task that runs the console: read the clock, sample the buttons, tick, sleep, repeat.
//!
//! Once the console exits, the loop tears it down and either asks the watchdog for a reboot or
//! parks, still reporting health so the watchdog leaves the shutdown banner on the display.
use crate::settings;
use crate::task::alarm_store::FlashAlarmStore;
use crate::task::buttons::ButtonPanel;
use crate::task::clock::RtcClock;
use crate::task::display::DisplayLink;
use crate::task::probe::BoardProbe;
use crate::task::relays::RelayBank;
use crate::task::sound::SoundLink;
use crate::task::watchdog::{TaskId, report_task_success, request_reboot};
use console_clock::buttons::InputSampler;
use console_clock::clock::Now;
use console_clock::gateway::ClockSource;
use console_clock::{Console, ExitReason, Flow, Gateways};
use defmt::{error, info, warn};
use embassy_time::{Duration, Timer};

/// The gateways of this board
pub type BoardGateways = Gateways<RelayBank, DisplayLink, SoundLink, FlashAlarmStore, BoardProbe>;

/// How long to wait for a clock that cannot be read yet
const CLOCK_RETRY: Duration = Duration::from_millis(100);
/// Health report interval once the console stopped
const PARKED_REPORT_INTERVAL: Duration = Duration::from_secs(30);

/// Read the clock until it answers
async fn first_reading(clock: &mut RtcClock) -> Now {
    loop {
        if let Ok(now) = clock.now().await {
            return now;
        }
        Timer::after(CLOCK_RETRY).await;
    }
}

#[embassy_executor::task]
pub async fn tick_loop(gateways: BoardGateways, mut clock: RtcClock, mut buttons: ButtonPanel) {
    info!("Tick loop started");

    let now = first_reading(&mut clock).await;
    let mut console = match Console::start(settings::console_config(), gateways, &now).await {
        Ok(console) => console,
        Err(e) => {
            error!("Console failed to start: {}", e);
            return;
        }
    };

    let reason = loop {
        match clock.now().await {
            Ok(now) => {
                if let Flow::Exit(reason) = console.tick(buttons.sample(), &now).await {
                    break reason;
                }
            }
            // a tick without a time cannot check the alarm, skip it
            Err(e) => warn!("Tick skipped, no time: {}", e),
        }
        report_task_success(TaskId::TickLoop).await;
        Timer::after(console.tick_interval()).await;
    };

    info!("Console exiting: {}", reason);
    console.teardown().await;
    if reason == ExitReason::Reboot {
        request_reboot();
    }

    loop {
        report_task_success(TaskId::TickLoop).await;
        Timer::after(PARKED_REPORT_INTERVAL).await;
    }
}
