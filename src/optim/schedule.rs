use serde::{Serialize, Deserialize};

/// Two-stage step schedule: the base rate for the first half of training,
/// a tenth of it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepSchedule {
    pub base: f64,
    pub total_epochs: usize,
}

impl StepSchedule {
    pub fn new(base: f64, total_epochs: usize) -> StepSchedule {
        StepSchedule { base, total_epochs }
    }

    /// Learning rate for the 0-based `epoch`. The switch happens once
    /// `epoch > total_epochs / 2` (real division, so with 20 epochs epochs
    /// 0..=10 run at the base rate).
    pub fn learning_rate(&self, epoch: usize) -> f64 {
        if 2 * epoch <= self.total_epochs {
            self.base
        } else {
            self.base / 10.0
        }
    }
}
