use crate::data::dataset::Dataset;
use crate::math::matrix::Matrix;
use crate::network::network::forward;
use crate::network::params::Parameters;

/// Fraction of rows whose argmax equals the true class index.
/// An empty set scores 0.
pub fn accuracy(predicted: &Matrix, labels: &[usize]) -> f64 {
    assert_eq!(predicted.rows, labels.len(), "prediction/label counts differ");
    if labels.is_empty() {
        return 0.0;
    }
    let correct = predicted.argmax_rows().iter().zip(labels)
        .filter(|(p, y)| p == y)
        .count();
    correct as f64 / labels.len() as f64
}

/// Runs the network over the whole held-out set and scores it.
pub fn evaluate(params: &Parameters, held_out: &Dataset) -> f64 {
    if held_out.is_empty() {
        return 0.0;
    }
    accuracy(&forward(params, &held_out.images).output, &held_out.labels)
}
