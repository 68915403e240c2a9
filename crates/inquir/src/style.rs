//! Text styling for prompt output.
//!
//! Wraps ANSI styling behind a closed set of tags so the rest of the crate
//! never touches escape sequences directly. When colorization is disabled
//! every operation returns its input unchanged.

use crossterm::Command;
use crossterm::cursor::MoveTo;
use crossterm::style::{Attribute, Color, ContentStyle};
use crossterm::terminal::{Clear, ClearType};

/// A style tag applicable to a piece of prompt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleTag {
    /// Yellow foreground.
    Yellow,
    /// Red foreground.
    Red,
    /// Green foreground.
    Green,
    /// Cyan foreground.
    Cyan,
    /// Grey foreground.
    Grey,
    /// Dimmed intensity.
    Dim,
    /// Bold intensity.
    Bold,
    /// Underlined text.
    Underline,
}

impl StyleTag {
    fn apply_to(self, style: &mut ContentStyle) {
        match self {
            Self::Yellow => style.foreground_color = Some(Color::Yellow),
            Self::Red => style.foreground_color = Some(Color::Red),
            Self::Green => style.foreground_color = Some(Color::Green),
            Self::Cyan => style.foreground_color = Some(Color::Cyan),
            Self::Grey => style.foreground_color = Some(Color::Grey),
            Self::Dim => style.attributes.set(Attribute::Dim),
            Self::Bold => style.attributes.set(Attribute::Bold),
            Self::Underline => style.attributes.set(Attribute::Underlined),
        }
    }
}

/// Applies style tags to text, honoring the session colorize flag.
#[derive(Debug, Clone, Copy)]
pub struct Styler {
    colorize: bool,
}

impl Styler {
    /// Create a new styler.
    #[must_use]
    pub const fn new(colorize: bool) -> Self {
        Self { colorize }
    }

    /// Check whether colorization is enabled.
    #[must_use]
    pub const fn colorize(&self) -> bool {
        self.colorize
    }

    /// Apply the given tags to `text`.
    ///
    /// Returns the text unchanged when colorization is off or no tags are
    /// given.
    #[must_use]
    pub fn apply(&self, text: &str, tags: &[StyleTag]) -> String {
        if !self.colorize || tags.is_empty() {
            return text.to_string();
        }
        let mut style = ContentStyle::new();
        for tag in tags {
            tag.apply_to(&mut style);
        }
        style.apply(text).to_string()
    }
}

impl Default for Styler {
    fn default() -> Self {
        Self::new(true)
    }
}

/// ANSI sequence that erases the current line and returns the cursor to
/// column zero.
#[must_use]
pub(crate) fn clear_line_sequence() -> String {
    let mut seq = String::from("\r");
    let _ = Clear(ClearType::CurrentLine).write_ansi(&mut seq);
    seq
}

/// ANSI sequence that clears the whole screen and homes the cursor.
#[must_use]
pub(crate) fn clear_screen_sequence() -> String {
    let mut seq = String::new();
    let _ = Clear(ClearType::All).write_ansi(&mut seq);
    let _ = MoveTo(0, 0).write_ansi(&mut seq);
    seq
}
