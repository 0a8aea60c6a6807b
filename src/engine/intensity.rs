use super::clamp_unit;

/// The operator's fire slider: the one authoritative owner of intensity.
///
/// Operator input goes through [`IntensityControl::set`]. The controller may
/// only force the value to zero, disable the control or re-enable it.
/// Input arriving while the control is disabled is staged and only takes
/// effect when the control is re-enabled by a resume.
#[derive(Debug, Clone, Default)]
pub struct IntensityControl {
    value: f64,
    enabled: bool,
    staged: Option<f64>,
}

impl IntensityControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn staged(&self) -> Option<f64> {
        self.staged
    }

    /// Operator input. Returns the new value when it changed on an enabled
    /// control; that return value is the change notification.
    pub fn set(&mut self, v: f64) -> Option<f64> {
        let v = clamp_unit(v);
        if !self.enabled {
            self.staged = Some(v);
            return None;
        }
        if v == self.value {
            return None;
        }
        self.value = v;
        Some(v)
    }

    pub fn force_zero_and_disable(&mut self) {
        self.value = 0.0;
        self.enabled = false;
        self.staged = None;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Enable for a fresh run; anything staged earlier is dropped.
    pub fn enable(&mut self) {
        self.enabled = true;
        self.staged = None;
    }

    /// Re-enable and fold in whatever the operator staged while disabled.
    pub fn enable_with_staged(&mut self) -> f64 {
        self.enabled = true;
        if let Some(v) = self.staged.take() {
            self.value = v;
        }
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disabled_at_zero() {
        let c = IntensityControl::new();
        assert_eq!(c.value(), 0.0);
        assert!(!c.enabled());
    }

    #[test]
    fn notifies_only_on_change() {
        let mut c = IntensityControl::new();
        c.enable();
        assert_eq!(c.set(0.4), Some(0.4));
        assert_eq!(c.set(0.4), None);
        assert_eq!(c.set(2.0), Some(1.0));
        assert_eq!(c.set(-1.0), Some(0.0));
    }

    #[test]
    fn disabled_input_is_staged_not_applied() {
        let mut c = IntensityControl::new();
        c.enable();
        c.set(0.3);
        c.disable();
        assert_eq!(c.set(0.9), None);
        assert_eq!(c.value(), 0.3);
        assert_eq!(c.staged(), Some(0.9));
        assert_eq!(c.enable_with_staged(), 0.9);
        assert_eq!(c.staged(), None);
    }

    #[test]
    fn forcing_zero_drops_staged_input() {
        let mut c = IntensityControl::new();
        c.enable();
        c.set(0.6);
        c.disable();
        c.set(0.8);
        c.force_zero_and_disable();
        assert_eq!(c.value(), 0.0);
        assert_eq!(c.staged(), None);
        assert_eq!(c.enable_with_staged(), 0.0);
    }

    #[test]
    fn plain_enable_discards_staged_input() {
        let mut c = IntensityControl::new();
        c.set(0.7);
        assert_eq!(c.staged(), Some(0.7));
        c.enable();
        assert_eq!(c.staged(), None);
        assert_eq!(c.value(), 0.0);
    }
}
