use crate::error::{BarError, Result};

/// Step counter behind the bar. `steps` never leaves `[0, max_steps]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    steps: u32,
    max_steps: u32,
    started: bool,
}

impl ProgressState {
    pub fn new(max_steps: u32) -> Result<Self> {
        if max_steps == 0 {
            return Err(BarError::InvalidMaxSteps(max_steps));
        }
        Ok(Self {
            steps: 0,
            max_steps,
            started: false,
        })
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn percentage(&self) -> f64 {
        100.0 * f64::from(self.steps) / f64::from(self.max_steps)
    }

    /// Step count after adding `delta`, or `None` if it would leave the range.
    pub fn checked_add(&self, delta: i64) -> Option<u32> {
        let total = i64::from(self.steps).checked_add(delta)?;
        if (0..=i64::from(self.max_steps)).contains(&total) {
            Some(total as u32)
        } else {
            None
        }
    }

    /// Step count for `percentage` in `[0, 100]`, rounded up.
    pub fn steps_for_percentage(&self, percentage: f64) -> Option<u32> {
        if !(0.0..=100.0).contains(&percentage) {
            return None;
        }
        let steps = (percentage / 100.0 * f64::from(self.max_steps)).ceil() as u32;
        Some(steps.min(self.max_steps))
    }

    pub(crate) fn set_steps(&mut self, steps: u32) {
        debug_assert!(steps <= self.max_steps);
        self.steps = steps.min(self.max_steps);
    }

    pub(crate) fn set_started(&mut self, started: bool) {
        self.started = started;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_max_steps_is_rejected() {
        assert!(matches!(
            ProgressState::new(0),
            Err(BarError::InvalidMaxSteps(0))
        ));
    }

    #[test]
    fn additions_outside_the_range_are_refused() {
        let mut state = ProgressState::new(10).unwrap();
        assert_eq!(state.checked_add(-1), None);
        assert_eq!(state.checked_add(11), None);
        assert_eq!(state.checked_add(i64::MAX), None);
        state.set_steps(state.checked_add(10).unwrap());
        assert_eq!(state.percentage(), 100.0);
        assert_eq!(state.checked_add(-10), Some(0));
    }

    #[test]
    fn percentage_maps_to_ceiling_steps() {
        let state = ProgressState::new(3).unwrap();
        assert_eq!(state.steps_for_percentage(0.0), Some(0));
        assert_eq!(state.steps_for_percentage(34.0), Some(2));
        assert_eq!(state.steps_for_percentage(100.0), Some(3));
        assert_eq!(state.steps_for_percentage(-0.1), None);
        assert_eq!(state.steps_for_percentage(100.1), None);
        assert_eq!(state.steps_for_percentage(f64::NAN), None);
    }
}
