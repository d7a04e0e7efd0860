use crate::layout::{BarDirection, BarLayout, BarPosition, Layout};
use crate::style::{ElementStyle, StyledElement};

const ELLIPSIS: &str = "...";

/// What the truncation pass did to a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFate {
    Kept,
    Shortened,
    Dropped,
}

impl LabelFate {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelFate::Kept => "kept",
            LabelFate::Shortened => "shortened",
            LabelFate::Dropped => "dropped",
        }
    }
}

/// Record of a truncation pass, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    pub deficit: usize,
    pub text: LabelFate,
    pub additional_text: LabelFate,
}

/// One write operation: text plus the colors it is drawn with.
///
/// `style` is `None` for undecorated sections (percentage, brackets), which
/// are written without touching color state. Styled sections always reset
/// colors afterwards, even when both colors are absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub text: String,
    pub style: Option<ElementStyle>,
}

impl Section {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    fn styled(text: impl Into<String>, style: ElementStyle) -> Self {
        Self {
            text: text.into(),
            style: Some(style),
        }
    }
}

/// Everything one render pass draws, computed from a layout snapshot, the
/// current percentage and the current terminal width.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    bar: BarLayout,
    pub percentage_label: String,
    pub text: Option<StyledElement<String>>,
    pub additional_text: Option<StyledElement<String>>,
    pub bar_width: usize,
    pub filled_width: usize,
    pub truncation: Option<Truncation>,
}

impl Frame {
    pub fn compute(
        layout: &Layout,
        percentage: f64,
        terminal_width: u16,
        minimum_bar_width: usize,
    ) -> Self {
        let bar = layout.bar.clone();
        let percentage_label = percentage_label(percentage, bar.has_percentage_brackets());
        let mut text = layout.text().cloned();
        let mut additional_text = layout.additional_text().cloned();

        let width = usize::from(terminal_width);
        let textual = textual_width(
            text.as_ref(),
            additional_text.as_ref(),
            bar.has_bar_brackets(),
            &percentage_label,
        );
        let available = width as isize - textual as isize;

        let mut truncation = None;
        if available < minimum_bar_width as isize {
            let mut deficit = (minimum_bar_width as isize - available) as usize + ELLIPSIS.len();
            let initial = deficit;
            let additional_fate = shrink(&mut additional_text, &mut deficit);
            let text_fate = shrink(&mut text, &mut deficit);
            truncation = Some(Truncation {
                deficit: initial,
                text: text_fate,
                additional_text: additional_fate,
            });
        }

        // Never let the bar push the row past the terminal edge, even when
        // the labels cannot shrink any further.
        let fixed = textual_width(
            text.as_ref(),
            additional_text.as_ref(),
            bar.has_bar_brackets(),
            &percentage_label,
        );
        let bar_width = available
            .max(minimum_bar_width as isize)
            .min(width.saturating_sub(fixed) as isize)
            .max(0) as usize;
        let filled_width = filled_width(percentage, bar_width);

        Self {
            bar,
            percentage_label,
            text,
            additional_text,
            bar_width,
            filled_width,
            truncation,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.truncation.is_some()
    }

    pub fn progress_run(&self) -> String {
        repeat_char(self.bar.progress_indicator().value, self.filled_width)
    }

    pub fn pending_run(&self) -> String {
        repeat_char(
            self.bar.pending_indicator().value,
            self.bar_width - self.filled_width,
        )
    }

    /// The ordered writes for this frame.
    pub fn sections(&self) -> Vec<Section> {
        let mut out = Vec::with_capacity(8);
        match self.bar.position {
            BarPosition::Left => {
                self.push_bar(&mut out);
                if let Some(text) = &self.text {
                    out.push(Section::styled(format!(" {}", text.value), text.style));
                }
                if let Some(extra) = &self.additional_text {
                    out.push(Section::styled(format!(" {}", extra.value), extra.style));
                }
            }
            BarPosition::Right => {
                if let Some(text) = &self.text {
                    out.push(Section::styled(format!("{} ", text.value), text.style));
                }
                if let Some(extra) = &self.additional_text {
                    out.push(Section::styled(format!("{} ", extra.value), extra.style));
                }
                self.push_bar(&mut out);
            }
            BarPosition::Center => {
                if let Some(text) = &self.text {
                    out.push(Section::styled(format!("{} ", text.value), text.style));
                }
                self.push_bar(&mut out);
                if let Some(extra) = &self.additional_text {
                    out.push(Section::styled(format!(" {}", extra.value), extra.style));
                }
            }
        }
        out
    }

    /// Plain text of the whole row.
    pub fn line(&self) -> String {
        self.sections().into_iter().map(|s| s.text).collect()
    }

    fn push_bar(&self, out: &mut Vec<Section>) {
        let brackets = self.bar.has_bar_brackets();
        if self.bar.direction == BarDirection::Forward {
            out.push(Section::plain(format!("{} ", self.percentage_label)));
        }
        if brackets {
            out.push(Section::plain("["));
        }
        let progress = self.progress_run();
        if !progress.is_empty() {
            out.push(Section::styled(progress, self.bar.progress_indicator().style));
        }
        let pending = self.pending_run();
        if !pending.is_empty() {
            out.push(Section::styled(pending, self.bar.pending_indicator().style));
        }
        if brackets {
            out.push(Section::plain("]"));
        }
        if self.bar.direction == BarDirection::Reverse {
            out.push(Section::plain(format!(" {}", self.percentage_label)));
        }
    }
}

/// `"07%"`, `"42%"`, `"100%"`; halves round away from zero.
pub fn percentage_label(percentage: f64, bracketed: bool) -> String {
    let rounded = percentage.round().clamp(0.0, 100.0) as u32;
    if bracketed {
        format!("[{rounded:02}%]")
    } else {
        format!("{rounded:02}%")
    }
}

/// Width of everything on the row except the bar itself: one base space, each
/// label plus its separator, bar brackets and the percentage label.
pub fn textual_width(
    text: Option<&StyledElement<String>>,
    additional_text: Option<&StyledElement<String>>,
    bar_brackets: bool,
    percentage_label: &str,
) -> usize {
    let mut width = 1;
    if let Some(text) = text {
        width += text.value.chars().count() + 1;
    }
    if let Some(extra) = additional_text {
        width += extra.value.chars().count() + 1;
    }
    if bar_brackets {
        width += 2;
    }
    width + percentage_label.chars().count()
}

pub fn filled_width(percentage: f64, bar_width: usize) -> usize {
    let filled = (percentage / 100.0 * bar_width as f64).floor();
    (filled.max(0.0) as usize).min(bar_width)
}

/// Cut `deficit` characters from the tail (plus an ellipsis), or drop the
/// label entirely when it is not longer than the deficit.
fn shrink(label: &mut Option<StyledElement<String>>, deficit: &mut usize) -> LabelFate {
    let Some(element) = label.as_mut() else {
        return LabelFate::Kept;
    };
    if *deficit == 0 {
        return LabelFate::Kept;
    }

    let len = element.value.chars().count();
    if len > *deficit {
        let mut shortened: String = element.value.chars().take(len - *deficit).collect();
        shortened.push_str(ELLIPSIS);
        element.value = shortened;
        *deficit = 0;
        LabelFate::Shortened
    } else {
        *deficit -= len;
        *label = None;
        LabelFate::Dropped
    }
}

fn repeat_char(ch: char, count: usize) -> String {
    std::iter::repeat_n(ch, count).collect()
}
