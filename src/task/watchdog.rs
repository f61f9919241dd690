//! # Watchdog
//! Resets the board when the tick loop or the display task stop checking in, or when the console
//! picks Reboot from the power menu.
//!
//! The hardware watchdog is not fed continuously. Each task records when it last finished a round
//! of work. Once a minute the records are looked at: while a task is overdue a reset deadline runs,
//! and when the deadline passes the hardware watchdog is started without feeding, which resets the
//! board a few seconds later.
use defmt::{Format, info, warn};
use embassy_futures::select::{Either, select};
use embassy_rp::{Peri, peripherals::WATCHDOG, watchdog::Watchdog};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex, signal::Signal};
use embassy_time::{Duration, Instant, Timer};

/// Time an overdue task gets to recover before the reset
const RECOVERY_WINDOW: Duration = Duration::from_secs(900);
/// Time between two looks at the records
const CHECK_PERIOD: Duration = Duration::from_secs(60);
/// Nothing is judged this long after boot
const STARTUP_GRACE: Duration = Duration::from_secs(120);
/// A task is overdue when its last check-in is older than this
const OVERDUE_AFTER: Duration = Duration::from_secs(120);
/// Hardware timeout when tasks stayed overdue
const HANG_RESET_TIMEOUT: Duration = Duration::from_millis(8000);
/// Hardware timeout for Reboot
const REBOOT_TIMEOUT: Duration = Duration::from_millis(100);

/// Tasks that check in
#[derive(Debug, Clone, Copy, Eq, PartialEq, Format)]
pub enum TaskId {
    /// Checks in after every tick
    TickLoop,
    /// Checks in after every frame and once a minute while idle
    Display,
}

/// What one look at the records found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
enum Verdict {
    /// Still booting
    Starting,
    /// Every task that ever checked in did so recently
    Healthy,
    /// Some tasks are late
    Overdue {
        /// Number of late tasks
        overdue: u8,
        /// Time until the reset
        left: Duration,
    },
    /// The recovery window ran out
    Expired,
}

/// Last check-in of every task plus the running reset deadline
struct CheckIns {
    /// Indexed by [`TaskId`], `None` until the task first checks in
    last: [Option<Instant>; 2],
    /// First look at the records
    booted: Option<Instant>,
    /// Set while some task is overdue
    deadline: Option<Instant>,
}

impl CheckIns {
    /// No check-ins yet
    const fn new() -> Self {
        Self {
            last: [None; 2],
            booted: None,
            deadline: None,
        }
    }

    /// Judge the records at `now`
    fn judge(&mut self, now: Instant) -> Verdict {
        let booted = *self.booted.get_or_insert(now);
        if now.duration_since(booted) < STARTUP_GRACE {
            return Verdict::Starting;
        }

        let overdue = self
            .last
            .iter()
            .flatten()
            .filter(|seen| now.duration_since(**seen) >= OVERDUE_AFTER)
            .count();
        if overdue == 0 {
            self.deadline = None;
            return Verdict::Healthy;
        }

        let deadline = *self.deadline.get_or_insert(now + RECOVERY_WINDOW);
        if now >= deadline {
            return Verdict::Expired;
        }
        Verdict::Overdue {
            overdue: u8::try_from(overdue).unwrap_or(u8::MAX),
            left: deadline - now,
        }
    }
}

/// Check-ins of the monitored tasks
static CHECK_INS: Mutex<CriticalSectionRawMutex, CheckIns> = Mutex::new(CheckIns::new());

/// Raised by [`request_reboot`]
static REBOOT_SIGNAL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Record that `task` finished a round of work
pub async fn report_task_success(task: TaskId) {
    CHECK_INS.lock().await.last[task as usize] = Some(Instant::now());
}

/// Reset the board as soon as the watchdog task sees the request
pub fn request_reboot() {
    REBOOT_SIGNAL.signal(());
}

/// Arm the hardware watchdog with `timeout` and never feed it
async fn reset(watchdog: Peri<'static, WATCHDOG>, timeout: Duration) {
    let mut wd = Watchdog::new(watchdog);
    // reset even with a debugger attached
    wd.pause_on_debug(false);
    wd.start(timeout);
    warn!("Resetting in {}ms", timeout.as_millis());
    loop {
        Timer::after_secs(1).await;
    }
}

#[embassy_executor::task]
pub async fn watchdog_task(watchdog: Peri<'static, WATCHDOG>) {
    info!(
        "Watchdog started, tasks are overdue after {}s and get {}s to recover",
        OVERDUE_AFTER.as_secs(),
        RECOVERY_WINDOW.as_secs()
    );

    let timeout = loop {
        let verdict = CHECK_INS.lock().await.judge(Instant::now());
        match verdict {
            Verdict::Starting | Verdict::Healthy => {}
            Verdict::Overdue { overdue, left } => {
                warn!("{} task(s) overdue, reset in {}s", overdue, left.as_secs());
            }
            Verdict::Expired => {
                warn!("Tasks stayed overdue, resetting");
                break HANG_RESET_TIMEOUT;
            }
        }

        if let Either::Second(()) = select(Timer::after(CHECK_PERIOD), REBOOT_SIGNAL.wait()).await {
            info!("Reboot requested");
            break REBOOT_TIMEOUT;
        }
    };

    reset(watchdog, timeout).await;
}
