pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod eval;
pub mod data;
pub mod train;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use network::params::{LayerSizes, Parameters};
pub use network::network::{backward, forward, predict, Activations, Gradients};
pub use loss::cross_entropy::cross_entropy;
pub use optim::{Sgd, StepSchedule};
pub use eval::{accuracy, evaluate};
pub use data::{Batch, Dataset};
pub use train::{train, train_from, train_step, TrainConfig, TrainingHistory, TrainingRun};
