use std::time::Instant;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::dataset::{Batch, Dataset};
use crate::error::{Error, Result};
use crate::eval::accuracy::evaluate;
use crate::loss::cross_entropy::cross_entropy;
use crate::network::network::{backward, forward};
use crate::network::params::Parameters;
use crate::optim::schedule::StepSchedule;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::{Checkpoint, EpochStats, TrainingHistory};
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Result of one mini-batch update.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub params: Parameters,
    /// Batch loss measured before the update.
    pub loss: f64,
}

/// Final parameters plus the recorded history of a run.
#[derive(Debug, Clone)]
pub struct TrainingRun {
    pub params: Parameters,
    pub history: TrainingHistory,
}

/// Forward, loss, backward and SGD update on one batch.
pub fn train_step(params: &Parameters, batch: &Batch, optimizer: &Sgd, learning_rate: f64) -> StepOutcome {
    let acts = forward(params, &batch.images);
    let loss = cross_entropy(&batch.labels, &acts.output);
    let grads = backward(params, &batch.images, &acts, &batch.labels);
    let params = optimizer.step(params, &grads, batch.images.rows, learning_rate);
    StepOutcome { params, loss }
}

/// Initializes parameters (Xavier, seeded from `config.seed` when set) and
/// trains them on `train_set`, checking accuracy against `held_out`.
pub fn train(config: &TrainConfig, train_set: &Dataset, held_out: &Dataset) -> Result<TrainingRun> {
    config.validate()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let params = Parameters::xavier(config.layers, &mut rng);
    train_from(params, config, train_set, held_out)
}

/// Trains the given parameters for `config.epochs` epochs.
///
/// Each epoch runs `config.iterations_per_epoch` updates over consecutive
/// batches of the training set, starting again from the first batch. On
/// every `config.eval_every`-th iteration the batch loss is recorded and the
/// held-out set is scored.
pub fn train_from(
    params: Parameters,
    config: &TrainConfig,
    train_set: &Dataset,
    held_out: &Dataset,
) -> Result<TrainingRun> {
    config.validate()?;
    params.validate()?;
    if params.sizes() != config.layers {
        return Err(Error::InvalidConfig(format!(
            "parameters have layer sizes {:?} but config asks for {:?}",
            params.sizes(),
            config.layers
        )));
    }
    check_dataset("training", train_set, config)?;
    check_dataset("held-out", held_out, config)?;
    if train_set.len() < config.batch_size {
        return Err(Error::InvalidData(format!(
            "training set has {} samples, fewer than one batch of {}",
            train_set.len(),
            config.batch_size
        )));
    }
    if held_out.is_empty() {
        warn!("held-out set is empty; accuracy will read 0");
    }

    let optimizer = Sgd::new(config.weight_decay);
    let schedule = StepSchedule::new(config.learning_rate, config.epochs);

    info!(
        "training {}-{}-{}-{} network: {} epochs x {} iterations, batch {}, {} training / {} held-out samples",
        config.layers.input, config.layers.hidden1, config.layers.hidden2, config.layers.output,
        config.epochs, config.iterations_per_epoch, config.batch_size,
        train_set.len(), held_out.len()
    );

    let run_start = Instant::now();
    let mut params = params;
    let mut history = TrainingHistory::default();
    let mut previous_rate = None;

    for epoch in 0..config.epochs {
        let epoch_start = Instant::now();
        let learning_rate = schedule.learning_rate(epoch);
        if previous_rate != Some(learning_rate) {
            debug!("epoch {}: learning rate {}", epoch + 1, learning_rate);
            previous_rate = Some(learning_rate);
        }

        let mut stats = EpochStats {
            epoch: epoch + 1,
            learning_rate,
            loss: None,
            accuracy: None,
            elapsed_ms: 0,
        };

        for iteration in 0..config.iterations_per_epoch {
            let batch = train_set.batch(iteration, config.batch_size);
            let outcome = train_step(&params, &batch, &optimizer, learning_rate);
            params = outcome.params;
            debug!("epoch {} iteration {}: loss {:.6}", epoch + 1, iteration, outcome.loss);

            if (iteration + 1) % config.eval_every == 0 {
                let accuracy = evaluate(&params, held_out);
                info!(
                    "epoch {} iteration {}: loss {:.6}, accuracy {:.4}",
                    epoch + 1, iteration, outcome.loss, accuracy
                );
                stats.loss = Some(outcome.loss);
                stats.accuracy = Some(accuracy);
                history.checkpoints.push(Checkpoint {
                    epoch: epoch + 1,
                    iteration,
                    loss: outcome.loss,
                    accuracy,
                });
            }
        }

        stats.elapsed_ms = epoch_start.elapsed().as_millis() as u64;
        history.epochs.push(stats);
    }

    history.elapsed = run_start.elapsed();
    info!("training finished in {:.3}s", history.elapsed.as_secs_f64());

    Ok(TrainingRun { params, history })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn check_dataset(name: &str, data: &Dataset, config: &TrainConfig) -> Result<()> {
    if data.input_dim() != config.layers.input {
        return Err(Error::InvalidData(format!(
            "{} set has {} features per sample, network expects {}",
            name,
            data.input_dim(),
            config.layers.input
        )));
    }
    if data.num_classes != config.layers.output {
        return Err(Error::InvalidData(format!(
            "{} set has {} classes, network outputs {}",
            name, data.num_classes, config.layers.output
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::matrix::Matrix;
    use crate::network::params::LayerSizes;

    fn config() -> TrainConfig {
        TrainConfig {
            epochs: 3,
            iterations_per_epoch: 4,
            batch_size: 2,
            layers: LayerSizes { input: 3, hidden1: 4, hidden2: 4, output: 2 },
            eval_every: 2,
            seed: Some(1),
            ..TrainConfig::default()
        }
    }

    fn data(n: usize) -> Dataset {
        let images = Matrix::from_vec(n, 3, (0..n * 3).map(|i| (i % 7) as f64 / 7.0).collect());
        Dataset::new(images, (0..n).map(|i| i % 2).collect(), 2).unwrap()
    }

    #[test]
    fn records_one_slot_per_epoch_and_every_checkpoint() {
        let run = train(&config(), &data(6), &data(4)).unwrap();
        assert_eq!(run.history.epochs.len(), 3);
        // iterations 1 and 3 of each epoch
        assert_eq!(run.history.checkpoints.len(), 6);
        assert!(run.history.checkpoints.iter().all(|c| c.iteration % 2 == 1));
        let last = run.history.checkpoints.last().unwrap();
        assert_eq!(run.history.epochs[2].loss, Some(last.loss));
        assert_eq!(run.history.epochs[2].accuracy, Some(last.accuracy));
    }

    #[test]
    fn epochs_without_a_checkpoint_leave_their_slot_empty() {
        let cfg = TrainConfig { eval_every: 10, ..config() };
        let run = train(&cfg, &data(6), &data(4)).unwrap();
        assert!(run.history.checkpoints.is_empty());
        assert_eq!(run.history.losses(), vec![None, None, None]);
    }

    #[test]
    fn learning_rate_drops_after_midpoint() {
        let run = train(&config(), &data(6), &data(4)).unwrap();
        let rates: Vec<f64> = run.history.epochs.iter().map(|e| e.learning_rate).collect();
        assert_eq!(rates[0], 0.1);
        assert_eq!(rates[1], 0.1);
        assert!((rates[2] - 0.01).abs() < 1e-15);
    }

    #[test]
    fn rejects_feature_mismatch() {
        let cfg = TrainConfig { layers: LayerSizes { input: 5, ..config().layers }, ..config() };
        assert!(matches!(train(&cfg, &data(6), &data(4)), Err(Error::InvalidData(_))));
    }

    #[test]
    fn rejects_training_set_smaller_than_a_batch() {
        let cfg = TrainConfig { batch_size: 10, ..config() };
        let err = train(&cfg, &data(6), &data(4)).unwrap_err();
        assert!(err.to_string().contains("fewer than one batch"));
    }

    #[test]
    fn step_does_not_mutate_its_input() {
        let cfg = config();
        let params = Parameters::xavier(cfg.layers, &mut StdRng::seed_from_u64(2));
        let before = params.clone();
        let batch = data(6).batch(0, 2);
        let outcome = train_step(&params, &batch, &Sgd::new(0.0005), 0.1);
        assert_eq!(params, before);
        assert_ne!(outcome.params, before);
        assert!(outcome.loss > 0.0);
    }
}
