//! Trains the three-layer perceptron on an MNIST-style IDX dataset.
//!
//! Usage:
//!   mlp-trainer <data-dir> [config.json]
//!
//! `<data-dir>` must contain train-images-idx3-ubyte, train-labels-idx1-ubyte,
//! t10k-images-idx3-ubyte and t10k-labels-idx1-ubyte. Without a config file
//! the built-in defaults are used (784-300-100-10, 20 epochs of 10 batches).
//! Set RUST_LOG=debug for per-iteration losses.
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use log::info;

use mlp_trainer::data::load_idx_pair;
use mlp_trainer::{train, Dataset, TrainConfig};

const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

fn load(dir: &Path, images: &str, labels: &str, num_classes: usize) -> Result<Dataset> {
    load_idx_pair(dir.join(images), dir.join(labels), num_classes)
        .with_context(|| format!("failed to load {} / {} from {}", images, labels, dir.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(data_dir) = args.next().map(PathBuf::from) else {
        bail!("usage: mlp-trainer <data-dir> [config.json]");
    };
    let config = match args.next() {
        Some(path) => TrainConfig::load_json(&path)
            .with_context(|| format!("failed to read config {}", path))?,
        None => TrainConfig::default(),
    };

    let num_classes = config.layers.output;
    let train_set = load(&data_dir, TRAIN_IMAGES, TRAIN_LABELS, num_classes)?;
    let test_set = load(&data_dir, TEST_IMAGES, TEST_LABELS, num_classes)?;
    info!("loaded {} training and {} test samples", train_set.len(), test_set.len());

    let start = Instant::now();

    let run = train(&config, &train_set, &test_set)?;

    println!("{:>6}  {:>9}  {:>8}  {:>12}  {:>9}", "Epoch", "Iteration", "LR", "CE Loss", "Accuracy");
    println!("{}", "─".repeat(52));
    for checkpoint in &run.history.checkpoints {
        let lr = run.history.epochs[checkpoint.epoch - 1].learning_rate;
        println!(
            "{:>6}  {:>9}  {:>8.4}  {:>12.6}  {:>8.2}%",
            checkpoint.epoch,
            checkpoint.iteration + 1,
            lr,
            checkpoint.loss,
            checkpoint.accuracy * 100.0
        );
    }

    if let Some(path) = &config.model_path {
        run.params
            .save_json(path)
            .with_context(|| format!("failed to save model to {}", path.display()))?;
        println!("\nModel saved to {}", path.display());
    }

    println!("\ntime: {:.3}s", start.elapsed().as_secs_f64());
    Ok(())
}
