use std::time::Duration;

use serde::{Serialize, Deserialize};

/// One evaluation point inside an epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// 1-based epoch number.
    pub epoch: usize,
    /// 0-based iteration within the epoch.
    pub iteration: usize,
    /// Cross-entropy of the training batch at this iteration, before the update.
    pub loss: f64,
    /// Held-out accuracy after the update, as a fraction in [0, 1].
    pub accuracy: f64,
}

/// Per-epoch summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Learning rate used throughout this epoch.
    pub learning_rate: f64,
    /// Loss of the last checkpoint in this epoch, if one was reached.
    pub loss: Option<f64>,
    /// Accuracy of the last checkpoint in this epoch, if one was reached.
    pub accuracy: Option<f64>,
    /// Wall-clock duration of this epoch in milliseconds.
    pub elapsed_ms: u64,
}

/// Everything recorded during a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub epochs: Vec<EpochStats>,
    pub checkpoints: Vec<Checkpoint>,
    pub elapsed: Duration,
}

impl TrainingHistory {
    /// Loss per epoch slot, in epoch order.
    pub fn losses(&self) -> Vec<Option<f64>> {
        self.epochs.iter().map(|e| e.loss).collect()
    }

    /// Accuracy per epoch slot, in epoch order.
    pub fn accuracies(&self) -> Vec<Option<f64>> {
        self.epochs.iter().map(|e| e.accuracy).collect()
    }

    pub fn final_accuracy(&self) -> Option<f64> {
        self.checkpoints.last().map(|c| c.accuracy)
    }
}
