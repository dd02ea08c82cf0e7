//! Screen composition for the 2-line character display.
//!
//! The controller decides *what* to show as a [`ScreenView`]; this module
//! turns it into two fixed-width text lines. Nothing here touches the
//! hardware: the finished [`Screen`] is handed to the
//! [`Display`](drawerlock_hardware::Display) peripheral as is.
//!
//! # Character Encoding - ASCII Only
//!
//! Character LCDs only render ASCII. Every line is stripped of control
//! characters, truncated to the display width and padded with spaces.
//!
//! # Examples
//!
//! ```
//! use drawerlock_controller::display::{Screen, ScreenView};
//!
//! let screen = Screen::from_view(&ScreenView::Unlocked { remaining_s: 7 });
//! assert_eq!(screen.lines()[0].trim_end(), "UNLOCKED");
//! assert_eq!(screen.lines()[1].trim_end(), "RELOCK IN 7s");
//! ```

use drawerlock_core::constants::{DISPLAY_COLUMNS, DISPLAY_LINES, PLACEHOLDER_TIME};
use drawerlock_core::{Error, Result, TimeOfDay};

/// Text alignment options for display lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Text starts at column 0, padded with spaces on the right.
    Left,
    /// Text centered (extra space on the right if odd).
    Center,
    /// Text ends at the last column, padded with spaces on the left.
    Right,
}

/// Values shown for each controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenView {
    /// Locked and waiting; `None` when no calendar is available.
    Idle { time: Option<TimeOfDay> },
    /// Code entry with masked progress and seconds left.
    Prompt { masked: String, remaining_s: u64 },
    Verifying { masked: String },
    Unlocked { remaining_s: u64 },
    Lockout { remaining_s: u64 },
}

/// A full display frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    lines: [String; DISPLAY_LINES],
}

impl Screen {
    /// A blank frame.
    pub fn blank() -> Self {
        Self {
            lines: [" ".repeat(DISPLAY_COLUMNS), " ".repeat(DISPLAY_COLUMNS)],
        }
    }

    /// Compose the frame for a view.
    pub fn from_view(view: &ScreenView) -> Self {
        let (top, bottom) = match view {
            ScreenView::Idle { time } => (
                "DRAWER LOCKED".to_string(),
                time.map_or_else(|| PLACEHOLDER_TIME.to_string(), |t| t.to_string()),
            ),
            ScreenView::Prompt {
                masked,
                remaining_s,
            } => {
                let countdown = format!("{remaining_s}s");
                let width = DISPLAY_COLUMNS.saturating_sub(masked.chars().count());
                ("ENTER CODE".to_string(), format!("{masked}{countdown:>width$}"))
            }
            ScreenView::Verifying { masked } => ("VERIFYING...".to_string(), masked.clone()),
            ScreenView::Unlocked { remaining_s } => {
                ("UNLOCKED".to_string(), format!("RELOCK IN {remaining_s}s"))
            }
            ScreenView::Lockout { remaining_s } => {
                ("!! ALARM !!".to_string(), format!("WAIT {remaining_s}s"))
            }
        };

        let mut screen = Screen::blank();
        // Both indices are in range for a two-line frame.
        let _ = screen.set_line(0, &top, Alignment::Center);
        let _ = screen.set_line(1, &bottom, Alignment::Left);
        screen
    }

    /// Set text on one line.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidLine` if the line index is out of bounds.
    pub fn set_line(&mut self, line: usize, text: &str, align: Alignment) -> Result<()> {
        if line >= DISPLAY_LINES {
            return Err(Error::InvalidLine {
                line,
                max: DISPLAY_LINES - 1,
            });
        }
        self.lines[line] = align_text(&sanitize_text(text), DISPLAY_COLUMNS, align);
        Ok(())
    }

    pub fn lines(&self) -> &[String; DISPLAY_LINES] {
        &self.lines
    }
}

/// Whole seconds left until `deadline_ms`, rounded up.
pub fn remaining_seconds(now_ms: u64, deadline_ms: u64) -> u64 {
    deadline_ms.saturating_sub(now_ms).div_ceil(1000)
}

/// Truncate text to a maximum number of characters.
///
/// # Examples
///
/// ```
/// use drawerlock_controller::display::truncate_text;
///
/// assert_eq!(truncate_text("DRAWER LOCKED", 6), "DRAWER");
/// assert_eq!(truncate_text("Short", 10), "Short");
/// ```
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Align text within a fixed width, padding with spaces.
///
/// # Examples
///
/// ```
/// use drawerlock_controller::display::{align_text, Alignment};
///
/// assert_eq!(align_text("HELLO", 10, Alignment::Left), "HELLO     ");
/// assert_eq!(align_text("HELLO", 10, Alignment::Center), "  HELLO   ");
/// assert_eq!(align_text("HELLO", 10, Alignment::Right), "     HELLO");
/// ```
pub fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
    let char_count = text.chars().count();

    if char_count >= width {
        return truncate_text(text, width);
    }

    let padding = width - char_count;

    match alignment {
        Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::Center => {
            let left_pad = padding / 2;
            let right_pad = padding - left_pad;
            format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
        }
    }
}

/// Drop control and non-ASCII characters, trim the ends.
fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect::<String>()
        .trim()
        .to_string()
}
