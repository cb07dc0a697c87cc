use crate::activation::activation::{relu, softmax};
use crate::math::matrix::Matrix;

/// Affine transform `x · w + b`, with the 1×n bias row added to every sample.
///
/// The batch size is the row count of `x`.
pub fn affine(x: &Matrix, w: &Matrix, b: &Matrix) -> Matrix {
    (x * w).add_row_broadcast(b)
}

/// Fully connected layer followed by ReLU.
pub fn hidden_layer(x: &Matrix, w: &Matrix, b: &Matrix) -> Matrix {
    relu(&affine(x, w, b))
}

/// Fully connected layer followed by a row-wise softmax. Each output row is
/// the predicted class distribution of one sample.
pub fn output_layer(x: &Matrix, w: &Matrix, b: &Matrix) -> Matrix {
    softmax(&affine(x, w, b))
}
