//! # Screen
//! Composes the frames shown on the display and hands them to the [`RenderGateway`].
//!
//! A console frame is the clock face (time and two date lines) with the soft-key legend on top
//! and an optional status message under it. Shutdown and reboot show a single banner instead, a
//! running Life board fills the panel with its cells.
//!
//! Frames whose commit fails stay pending and are pushed again on the next tick, unless a newer
//! frame replaces them first.

use crate::clock::Now;
use crate::config::PinNames;
use crate::gateway::{PinId, RenderGateway};
use crate::life::Board;
use core::fmt::{self, Write};
use embedded_graphics::prelude::Point;
use heapless::{String, Vec};

/// Longest text of a single line
pub const LINE_LEN: usize = 40;
/// Most lines a frame holds
pub const MAX_LINES: usize = 6;

/// Text of one display line
pub type Text = String<LINE_LEN>;

/// Where the soft-key legend goes
const LEGEND_AT: Point = Point::new(2, 10);
/// Where the status message goes
const MESSAGE_AT: Point = Point::new(4, 40);
/// Where the time goes
const CLOCK_AT: Point = Point::new(5, 70);
/// Where the long date goes
const DATE_AT: Point = Point::new(10, 120);
/// Where the numeric date goes
const NUMERIC_DATE_AT: Point = Point::new(10, 145);
/// Where a banner goes
const BANNER_AT: Point = Point::new(10, 70);

/// Copy `s` into a line, cutting it off at the line length
#[must_use]
pub fn text(s: &str) -> Text {
    let mut t = Text::new();
    for c in s.chars() {
        if t.push(c).is_err() {
            break;
        }
    }
    t
}

/// Format into a line, cutting it off at the line length
#[must_use]
pub fn format(args: fmt::Arguments<'_>) -> Text {
    let mut t = Text::new();
    // overflow only truncates
    let _ = t.write_fmt(args);
    t
}

/// Display update mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshMode {
    /// Redraw the whole panel, clears ghosting
    Full,
    /// Update only what changed, cheap but degrades contrast over time
    Partial,
}

impl RefreshMode {
    /// Mode for a redraw caused by the clock reaching `minute`.
    /// Full when the unpadded minute text contains a zero (0, 10, 20, ..., 50), Partial otherwise.
    #[must_use]
    pub const fn for_minute(minute: u8) -> Self {
        if minute % 10 == 0 {
            Self::Full
        } else {
            Self::Partial
        }
    }

    /// The stronger of two modes
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Partial, Self::Partial) => Self::Partial,
            _ => Self::Full,
        }
    }
}

/// Font size of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextSize {
    /// Large clock digits
    Clock,
    /// Date lines and banners
    Date,
    /// Legend and messages
    Menu,
}

/// One positioned line of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Top left corner
    pub at: Point,
    /// Font size
    pub size: TextSize,
    /// The text
    pub text: Text,
}

/// An ordered set of lines making up one display frame, or a Life board
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    /// Lines in drawing order
    lines: Vec<Line, MAX_LINES>,
    /// Cells drawn before the lines
    cells: Option<Board>,
}

impl Frame {
    /// A blank frame
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            cells: None,
        }
    }

    /// Append a line. A frame that is already full drops it.
    pub fn push(&mut self, at: Point, size: TextSize, text: Text) {
        if self.lines.push(Line { at, size, text }).is_err() {
            warn!("frame full, line dropped");
        }
    }

    /// Lines in drawing order
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The Life board, if the frame shows one
    #[must_use]
    pub const fn cells(&self) -> Option<&Board> {
        self.cells.as_ref()
    }

    /// Whether any line reads exactly `text`
    #[must_use]
    pub fn has_line(&self, text: &str) -> bool {
        self.lines.iter().any(|line| line.text.as_str() == text)
    }

    /// Text of the first line drawn at `at`
    fn text_at(&self, at: Point) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| line.at == at)
            .map(|line| line.text.as_str())
    }

    /// The soft-key legend of a console frame
    #[must_use]
    pub fn legend(&self) -> Option<&str> {
        self.text_at(LEGEND_AT)
    }

    /// The status message of a console frame
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.text_at(MESSAGE_AT)
    }

    /// Compose the frame for `view` at time `now`
    #[must_use]
    pub fn compose(view: &View, now: &Now, names: &PinNames) -> Self {
        let mut frame = Self::new();
        match view {
            View::Console { legend, message } => {
                frame.push(LEGEND_AT, TextSize::Menu, legend_text(legend, names));
                if let Some(message) = message {
                    frame.push(MESSAGE_AT, TextSize::Menu, message.clone());
                }
                frame.push(CLOCK_AT, TextSize::Clock, format(format_args!("{}", now.time.face())));
                frame.push(DATE_AT, TextSize::Date, format(format_args!("{}", now.date.long())));
                frame.push(
                    NUMERIC_DATE_AT,
                    TextSize::Date,
                    format(format_args!("{}", now.date.numeric())),
                );
            }
            View::Banner(banner) => frame.push(BANNER_AT, TextSize::Date, text(banner)),
            View::Life(board) => frame.cells = Some(*board),
        }
        frame
    }
}

/// One entry of a soft-key legend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// Fixed text
    Text(&'static str),
    /// The configured name of a relay
    Pin(PinId),
}

/// Join legend entries the way they are printed above the buttons
fn legend_text(labels: &[Label], names: &PinNames) -> Text {
    let mut t = Text::new();
    for (i, label) in labels.iter().enumerate() {
        let entry = match label {
            Label::Text(s) => *s,
            Label::Pin(pin) => names.get(*pin),
        };
        let gap = if i == 0 { " " } else { "  " };
        // overflow only truncates
        let _ = write!(t, "{gap}{entry}");
    }
    t
}

/// What a frame shows, before it is composed against the current time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Clock face with legend and optional message
    Console {
        /// Soft-key legend, SW4 first
        legend: &'static [Label],
        /// Status line
        message: Option<Text>,
    },
    /// A single line instead of the clock face
    Banner(&'static str),
    /// A Life board instead of the clock face
    Life(Board),
}

/// A view plus how to push it to the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Render {
    /// What to show
    pub view: View,
    /// How to refresh
    pub mode: RefreshMode,
}

impl Render {
    /// Clock face with `legend` and optional `message`
    #[must_use]
    pub fn console(legend: &'static [Label], message: Option<Text>, mode: RefreshMode) -> Self {
        Self {
            view: View::Console { legend, message },
            mode,
        }
    }

    /// A Life board
    #[must_use]
    pub const fn life(board: Board, mode: RefreshMode) -> Self {
        Self {
            view: View::Life(board),
            mode,
        }
    }

    /// A banner, always a full refresh
    #[must_use]
    pub const fn banner(banner: &'static str) -> Self {
        Self {
            view: View::Banner(banner),
            mode: RefreshMode::Full,
        }
    }
}

/// The display as seen by the tick loop, with the retry of failed frames.
pub struct Screen<R> {
    /// Display access
    gateway: R,
    /// Frame that has not been committed yet
    pending: Option<(Frame, RefreshMode)>,
}

impl<R: RenderGateway> Screen<R> {
    /// Wrap a display
    pub const fn new(gateway: R) -> Self {
        Self {
            gateway,
            pending: None,
        }
    }

    /// Show `frame`, replacing any frame still pending.
    /// A Full refresh that is still owed is kept even when the new frame asks for Partial.
    pub async fn show(&mut self, frame: Frame, mode: RefreshMode) {
        let mode = match &self.pending {
            Some((_, owed)) => mode.merge(*owed),
            None => mode,
        };
        self.pending = Some((frame, mode));
        self.flush().await;
    }

    /// Push the pending frame, if any. Returns true when nothing is left pending.
    pub async fn flush(&mut self) -> bool {
        let Some((frame, mode)) = &self.pending else {
            return true;
        };
        let result = match self.gateway.draw(frame).await {
            Ok(()) => self.gateway.commit(*mode).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                self.pending = None;
                true
            }
            Err(e) => {
                warn!("display update failed, retrying next tick: {}", e);
                false
            }
        }
    }

    /// Whether a frame is waiting for a retry
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The wrapped display
    pub const fn gateway(&self) -> &R {
        &self.gateway
    }
}
