//! Colored output units.
//!
//! A [`StyledElement`] pairs a value with optional colors. Absent colors mean
//! "inherit the terminal default"; the renderer resets color state after every
//! styled section so nothing bleeds into the next write.

pub use crossterm::style::Color;

/// Foreground/background pair applied to a single write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementStyle {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

impl ElementStyle {
    pub const fn new(foreground: Option<Color>, background: Option<Color>) -> Self {
        Self {
            foreground,
            background,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.foreground.is_none() && self.background.is_none()
    }
}

/// A value rendered with its own colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledElement<T> {
    pub value: T,
    pub style: ElementStyle,
}

impl<T> StyledElement<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            style: ElementStyle::default(),
        }
    }

    pub fn fg(mut self, color: Color) -> Self {
        self.style.foreground = Some(color);
        self
    }

    pub fn bg(mut self, color: Color) -> Self {
        self.style.background = Some(color);
        self
    }

    pub fn foreground(&self) -> Option<Color> {
        self.style.foreground
    }

    pub fn background(&self) -> Option<Color> {
        self.style.background
    }
}

impl From<char> for StyledElement<char> {
    fn from(value: char) -> Self {
        Self::new(value)
    }
}

impl From<&str> for StyledElement<String> {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl From<String> for StyledElement<String> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
