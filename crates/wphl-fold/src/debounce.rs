/// Debounced tooltip hiding, driven by caller-supplied millisecond clocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HideTimer {
    deadline: Option<u64>,
}

impl HideTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a hide `wait` ms from `now`.
    ///
    /// With `update` the pending hide is always replaced. Without it, a
    /// pending hide is only brought forward, never postponed, and nothing
    /// is scheduled when no hide is pending.
    pub fn schedule(&mut self, now: u64, wait: u64, update: bool) {
        let brings_forward = self
            .deadline
            .is_some_and(|deadline| deadline.saturating_sub(now) > wait);
        if update || brings_forward {
            self.deadline = Some(now.saturating_add(wait));
        }
    }

    /// Whether the pending hide is due; a due hide is consumed.
    pub fn poll(&mut self, now: u64) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }
}
