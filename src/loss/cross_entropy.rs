use crate::math::matrix::Matrix;

/// Probabilities are floored at this value before taking the log, so a
/// confidently wrong prediction costs `-ln(EPS)` instead of infinity.
pub const EPS: f64 = 1e-12;

/// Mean categorical cross-entropy over a batch:
///   L = -sum(labels ⊙ ln(max(predicted, EPS))) / batch_size
///
/// `labels`    — one-hot targets, shape [batch, classes]
/// `predicted` — softmax probabilities, same shape
pub fn cross_entropy(labels: &Matrix, predicted: &Matrix) -> f64 {
    assert_eq!(labels.shape(), predicted.shape(), "label/prediction shapes differ");
    if labels.rows == 0 {
        return 0.0;
    }
    let total: f64 = labels.data.iter().zip(&predicted.data)
        .filter(|(y, _)| **y != 0.0)
        .map(|(y, p)| -y * p.max(EPS).ln())
        .sum();
    total / labels.rows as f64
}

/// Gradient of softmax followed by cross-entropy w.r.t. the output logits,
/// summed over the batch rather than averaged: `predicted - labels`.
pub fn softmax_cross_entropy_delta(labels: &Matrix, predicted: &Matrix) -> Matrix {
    predicted - labels
}
