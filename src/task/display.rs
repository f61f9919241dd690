//! # Display task
//! This module contains the task that puts console frames on the OLED display, and the link the
//! tick loop uses to hand frames to it.
//!
//! Frames are laid out for the console's large panel. The task scales the line positions and the
//! Life cells down to the 128x64 OLED and picks a font per text size.
use crate::task::resources::SharedI2c;
use crate::task::watchdog::{TaskId, report_task_success};
use console_clock::error::GatewayError;
use console_clock::exchange::{Sequence, Tagged};
use console_clock::gateway::RenderGateway;
use console_clock::life::{Board, CELL_SIZE};
use console_clock::screen::{Frame, RefreshMode, TextSize};
use defmt::{Debug2Format, debug, error, info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, with_timeout};
use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyleBuilder,
        ascii::{FONT_4X6, FONT_5X8, FONT_9X18_BOLD},
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use ssd1306_async::{I2CDisplayInterface, Ssd1306, prelude::*};

/// How long the tick loop waits for the display task to take and finish a frame
const COMMIT_TIMEOUT: Duration = Duration::from_millis(300);

/// How often the task reports health while no frames arrive
const IDLE_REPORT_INTERVAL: Duration = Duration::from_secs(60);

/// Width of the panel frames are laid out for
const LAYOUT_WIDTH: i32 = 264;
/// Height of the panel frames are laid out for
const LAYOUT_HEIGHT: i32 = 176;

/// Frames on their way to the display task
static FRAME_CHANNEL: Channel<CriticalSectionRawMutex, Tagged<(Frame, RefreshMode)>, 1> =
    Channel::new();
/// Outcome of the latest frame
static FRAME_DONE: Signal<CriticalSectionRawMutex, Tagged<Result<(), GatewayError>>> = Signal::new();

/// The tick loop's side of the display
#[derive(Default)]
pub struct DisplayLink {
    /// Frame composed but not committed yet
    frame: Frame,
    /// Tickets of the commits
    sequence: Sequence,
}

impl RenderGateway for DisplayLink {
    async fn draw(&mut self, frame: &Frame) -> Result<(), GatewayError> {
        self.frame = frame.clone();
        Ok(())
    }

    async fn commit(&mut self, mode: RefreshMode) -> Result<(), GatewayError> {
        let ticket = self.sequence.issue();
        let frame = Tagged::new(ticket, (self.frame.clone(), mode));
        let exchange = async {
            FRAME_CHANNEL.send(frame).await;
            loop {
                let done = FRAME_DONE.wait().await;
                let stale = done.ticket;
                match done.claim(ticket) {
                    Some(result) => break result,
                    None => debug!("Dropped the late outcome of frame {}", stale),
                }
            }
        };
        with_timeout(COMMIT_TIMEOUT, exchange)
            .await
            .map_err(|_| GatewayError::Timeout)?
    }
}

/// Font for a text size
fn font(size: TextSize) -> &'static MonoFont<'static> {
    match size {
        TextSize::Clock => &FONT_9X18_BOLD,
        TextSize::Date => &FONT_5X8,
        TextSize::Menu => &FONT_4X6,
    }
}

/// Map a layout position onto the OLED
const fn scale(at: Point) -> Point {
    Point::new(at.x * 128 / LAYOUT_WIDTH, at.y * 64 / LAYOUT_HEIGHT)
}

/// Draw the live cells of `board`, each as a filled block one pixel short of the next cell
fn draw_cells<D>(board: &Board, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = PrimitiveStyle::with_fill(BinaryColor::On);
    for corner in board.live_cells() {
        let far = scale(corner + Point::new(CELL_SIZE, CELL_SIZE)) - Point::new(1, 1);
        Rectangle::with_corners(scale(corner), far)
            .into_styled(style)
            .draw(target)?;
    }
    Ok(())
}

#[embassy_executor::task]
pub async fn display(i2c: SharedI2c) {
    info!("Display task started");

    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    let mut ready = match display.init().await {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to initialize display: {}", Debug2Format(&e));
            false
        }
    };
    if ready && display.set_brightness(Brightness::DIM).await.is_err() {
        warn!("Failed to dim the display");
    }

    loop {
        let Ok(request) = with_timeout(IDLE_REPORT_INTERVAL, FRAME_CHANNEL.receive()).await else {
            // no frame for a while, still alive
            report_task_success(TaskId::Display).await;
            continue;
        };

        // a display that failed to come up gets another chance with every frame
        if !ready {
            ready = display.init().await.is_ok();
        }
        if !ready {
            FRAME_DONE.signal(request.answer(Err(GatewayError::Fault)));
            continue;
        }

        let (frame, mode) = &request.value;
        display.clear();
        let mut result = Ok(());
        if frame
            .cells()
            .is_some_and(|board| draw_cells(board, &mut display).is_err())
        {
            result = Err(GatewayError::Fault);
        }
        for line in frame.lines() {
            let style = MonoTextStyleBuilder::new()
                .font(font(line.size))
                .text_color(BinaryColor::On)
                .build();
            if Text::with_baseline(&line.text, scale(line.at), style, Baseline::Top)
                .draw(&mut display)
                .is_err()
            {
                result = Err(GatewayError::Fault);
            }
        }

        // the OLED has no partial refresh, every frame is sent whole
        debug!("display refresh {}", mode);
        if let Err(e) = display.flush().await {
            warn!("Display flush failed: {}", Debug2Format(&e));
            result = Err(GatewayError::Fault);
        }
        FRAME_DONE.signal(request.answer(result));
        report_task_success(TaskId::Display).await;
    }
}
