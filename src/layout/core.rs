use bitflags::bitflags;

use crate::error::{BarError, Result};
use crate::style::{Color, StyledElement};

/// Narrowest width the bar itself may shrink to before labels are truncated.
pub const MINIMUM_BAR_WIDTH: usize = 10;

/// Whether the percentage label sits before or after the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarDirection {
    /// Percentage first, then the bar.
    #[default]
    Forward,
    /// Bar first, then the percentage.
    Reverse,
}

/// Horizontal placement of the bar relative to its labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarPosition {
    Left,
    #[default]
    Center,
    Right,
}

bitflags! {
    /// Bracket decorations drawn around the percentage and/or the bar.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Brackets: u8 {
        const PERCENTAGE = 1 << 0;
        const BAR = 1 << 1;
    }
}

/// Indicator characters and arrangement of the bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    progress: StyledElement<char>,
    pending: StyledElement<char>,
    pub direction: BarDirection,
    pub position: BarPosition,
    pub brackets: Brackets,
}

impl BarLayout {
    /// Build a bar from its filled and remaining indicators.
    ///
    /// Control characters would break the single-row invariant and are
    /// rejected here rather than at render time.
    pub fn new(
        progress: impl Into<StyledElement<char>>,
        pending: impl Into<StyledElement<char>>,
    ) -> Result<Self> {
        let progress = progress.into();
        let pending = pending.into();
        validate_indicator(&progress)?;
        validate_indicator(&pending)?;
        Ok(Self {
            progress,
            pending,
            direction: BarDirection::default(),
            position: BarPosition::default(),
            brackets: Brackets::empty(),
        })
    }

    pub fn with_direction(mut self, direction: BarDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_position(mut self, position: BarPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_brackets(mut self, brackets: Brackets) -> Self {
        self.brackets = brackets;
        self
    }

    pub fn progress_indicator(&self) -> &StyledElement<char> {
        &self.progress
    }

    pub fn pending_indicator(&self) -> &StyledElement<char> {
        &self.pending
    }

    pub fn has_bar_brackets(&self) -> bool {
        self.brackets.contains(Brackets::BAR)
    }

    pub fn has_percentage_brackets(&self) -> bool {
        self.brackets.contains(Brackets::PERCENTAGE)
    }
}

fn validate_indicator(element: &StyledElement<char>) -> Result<()> {
    if element.value.is_control() {
        return Err(BarError::InvalidIndicator(element.value));
    }
    Ok(())
}

/// Full visual composition: the bar plus its primary and dynamic labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub bar: BarLayout,
    text: Option<StyledElement<String>>,
    additional_text: Option<StyledElement<String>>,
}

impl Layout {
    pub fn new(bar: BarLayout) -> Self {
        Self {
            bar,
            text: None,
            additional_text: None,
        }
    }

    /// Attach the primary label. An empty label is a configuration error.
    pub fn with_text(mut self, text: impl Into<StyledElement<String>>) -> Result<Self> {
        let text = text.into();
        if text.value.is_empty() {
            return Err(BarError::EmptyText("text"));
        }
        self.text = Some(text);
        Ok(self)
    }

    /// Attach the dynamic label. It may start empty to pre-configure its colors.
    pub fn with_additional_text(mut self, text: impl Into<StyledElement<String>>) -> Self {
        self.additional_text = Some(text.into());
        self
    }

    /// Primary label, if set and non-empty.
    pub fn text(&self) -> Option<&StyledElement<String>> {
        self.text.as_ref().filter(|el| !el.value.is_empty())
    }

    /// Dynamic label, if set and non-empty.
    pub fn additional_text(&self) -> Option<&StyledElement<String>> {
        self.additional_text
            .as_ref()
            .filter(|el| !el.value.is_empty())
    }

    /// Replace the primary label's value, keeping its colors.
    pub fn set_text(&mut self, value: Option<String>) {
        replace_value(&mut self.text, value);
    }

    /// Replace the dynamic label's value, keeping its colors.
    pub fn set_additional_text(&mut self, value: Option<String>) {
        replace_value(&mut self.additional_text, value);
    }

    /// Classic `#`/`.` bar with bracketed percentage and bar.
    pub fn unix() -> Self {
        Self {
            bar: BarLayout {
                progress: StyledElement::new('#').fg(Color::Green),
                pending: StyledElement::new('.').fg(Color::DarkGreen),
                direction: BarDirection::Forward,
                position: BarPosition::Center,
                brackets: Brackets::PERCENTAGE | Brackets::BAR,
            },
            text: Some(StyledElement::from("Progress:")),
            additional_text: None,
        }
    }
}

impl Default for Layout {
    /// Block-character bar with the percentage after it.
    fn default() -> Self {
        Self {
            bar: BarLayout {
                progress: StyledElement::new('█').fg(Color::Green),
                pending: StyledElement::new('░').fg(Color::DarkGreen),
                direction: BarDirection::Reverse,
                position: BarPosition::Center,
                brackets: Brackets::empty(),
            },
            text: Some(StyledElement::from("Progress:")),
            additional_text: None,
        }
    }
}

fn replace_value(slot: &mut Option<StyledElement<String>>, value: Option<String>) {
    let value = value.unwrap_or_default();
    match slot {
        Some(element) => element.value = value,
        None if value.is_empty() => {}
        None => *slot = Some(StyledElement::new(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_indicators_are_rejected() {
        let err = BarLayout::new('\t', '.').unwrap_err();
        assert!(matches!(err, BarError::InvalidIndicator('\t')));
        let err = BarLayout::new('#', '\u{7f}').unwrap_err();
        assert!(matches!(err, BarError::InvalidIndicator('\u{7f}')));
    }

    #[test]
    fn empty_primary_text_fails_fast() {
        let bar = BarLayout::new('#', '.').unwrap();
        let err = Layout::new(bar).with_text("").unwrap_err();
        assert!(matches!(err, BarError::EmptyText("text")));
    }

    #[test]
    fn empty_labels_are_treated_as_absent() {
        let bar = BarLayout::new('#', '.').unwrap();
        let layout = Layout::new(bar).with_additional_text(StyledElement::from("").fg(Color::Yellow));
        assert!(layout.text().is_none());
        assert!(layout.additional_text().is_none());
    }

    #[test]
    fn replacing_a_value_keeps_its_colors() {
        let bar = BarLayout::new('#', '.').unwrap();
        let mut layout =
            Layout::new(bar).with_additional_text(StyledElement::from("").fg(Color::Yellow));
        layout.set_additional_text(Some("step 3".into()));
        let label = layout.additional_text().unwrap();
        assert_eq!(label.value, "step 3");
        assert_eq!(label.foreground(), Some(Color::Yellow));

        layout.set_additional_text(None);
        assert!(layout.additional_text().is_none());
        layout.set_additional_text(Some("again".into()));
        assert_eq!(layout.additional_text().unwrap().foreground(), Some(Color::Yellow));
    }

    #[test]
    fn setting_text_on_bare_layout_creates_plain_label() {
        let mut layout = Layout::new(BarLayout::new('#', '.').unwrap());
        layout.set_text(None);
        assert!(layout.text().is_none());
        layout.set_text(Some("Copying".into()));
        let label = layout.text().unwrap();
        assert_eq!(label.value, "Copying");
        assert!(label.style.is_plain());
    }

    #[test]
    fn presets_match_their_themes() {
        let default = Layout::default();
        assert_eq!(default.bar.progress_indicator().value, '█');
        assert_eq!(default.bar.direction, BarDirection::Reverse);
        assert!(default.bar.brackets.is_empty());
        assert_eq!(default.text().unwrap().value, "Progress:");

        let unix = Layout::unix();
        assert_eq!(unix.bar.pending_indicator().value, '.');
        assert!(unix.bar.has_bar_brackets());
        assert!(unix.bar.has_percentage_brackets());
        assert_eq!(unix.bar.direction, BarDirection::Forward);
    }
}
