pub mod epoch_stats;
pub mod loop_fn;
pub mod train_config;

pub use epoch_stats::{Checkpoint, EpochStats, TrainingHistory};
pub use loop_fn::{train, train_from, train_step, StepOutcome, TrainingRun};
pub use train_config::TrainConfig;
