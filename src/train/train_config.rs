use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::network::params::LayerSizes;

/// Hyperparameters for a `train` run.
///
/// # Fields
/// - `epochs`               — number of epochs; also drives the learning-rate switch
/// - `iterations_per_epoch` — mini-batch updates per epoch
/// - `batch_size`           — samples per mini-batch
/// - `learning_rate`        — base rate; drops to a tenth after the midpoint
/// - `weight_decay`         — L2 shrink factor applied to weight matrices
/// - `layers`               — layer widths (input → hidden1 → hidden2 → output)
/// - `eval_every`           — evaluate every n-th iteration within an epoch
/// - `seed`                 — fixes initialization when set
/// - `model_path`           — where the binary writes trained parameters, if anywhere
///
/// Missing JSON fields fall back to `Default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub iterations_per_epoch: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub weight_decay: f64,
    pub layers: LayerSizes,
    pub eval_every: usize,
    pub seed: Option<u64>,
    pub model_path: Option<PathBuf>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 20,
            iterations_per_epoch: 10,
            batch_size: 100,
            learning_rate: 0.1,
            weight_decay: 0.0005,
            layers: LayerSizes::default(),
            eval_every: 10,
            seed: None,
            model_path: None,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("epochs", self.epochs),
            ("iterations_per_epoch", self.iterations_per_epoch),
            ("batch_size", self.batch_size),
            ("eval_every", self.eval_every),
            ("layers.input", self.layers.input),
            ("layers.hidden1", self.layers.hidden1),
            ("layers.hidden2", self.layers.hidden2),
            ("layers.output", self.layers.output),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("{} must be > 0", name)));
            }
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        if !(self.weight_decay.is_finite() && self.weight_decay >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "weight_decay must be finite and >= 0, got {}",
                self.weight_decay
            )));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Reads a config from JSON and validates it.
    pub fn load_json(path: impl AsRef<Path>) -> Result<TrainConfig> {
        let file = File::open(path)?;
        let config: TrainConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }
}
