use crate::activation::activation::relu_mask;
use crate::layers::dense::{hidden_layer, output_layer};
use crate::loss::cross_entropy::softmax_cross_entropy_delta;
use crate::math::matrix::Matrix;
use crate::network::params::Parameters;

/// Activations of every layer for one batch, kept for the backward pass.
#[derive(Debug, Clone)]
pub struct Activations {
    pub hidden1: Matrix,
    pub hidden2: Matrix,
    /// Softmax probabilities, one row per sample.
    pub output: Matrix,
}

/// Gradients of the summed batch loss, one per parameter matrix and with the
/// same shape. Not yet divided by the batch size.
#[derive(Debug, Clone)]
pub struct Gradients {
    pub w1: Matrix,
    pub b1: Matrix,
    pub w2: Matrix,
    pub b2: Matrix,
    pub w3: Matrix,
    pub b3: Matrix,
}

/// Forward pass: ReLU → ReLU → softmax.
pub fn forward(params: &Parameters, images: &Matrix) -> Activations {
    let hidden1 = hidden_layer(images, &params.w1, &params.b1);
    let hidden2 = hidden_layer(&hidden1, &params.w2, &params.b2);
    let output = output_layer(&hidden2, &params.w3, &params.b3);
    Activations { hidden1, hidden2, output }
}

/// Most probable class per sample.
pub fn predict(params: &Parameters, images: &Matrix) -> Vec<usize> {
    forward(params, images).output.argmax_rows()
}

/// Backward pass through the three layers.
///
/// `images` and `acts` must come from the same `forward` call; `labels` is
/// the one-hot target matrix of that batch.
pub fn backward(
    params: &Parameters,
    images: &Matrix,
    acts: &Activations,
    labels: &Matrix,
) -> Gradients {
    // Softmax + cross-entropy: ∂L/∂z3 = p - y
    let delta3 = softmax_cross_entropy_delta(labels, &acts.output);
    let w3 = &acts.hidden2.transpose() * &delta3;
    let b3 = delta3.sum_rows();

    let delta2 = (&delta3 * &params.w3.transpose()).hadamard(&relu_mask(&acts.hidden2));
    let w2 = &acts.hidden1.transpose() * &delta2;
    let b2 = delta2.sum_rows();

    let delta1 = (&delta2 * &params.w2.transpose()).hadamard(&relu_mask(&acts.hidden1));
    let w1 = &images.transpose() * &delta1;
    let b1 = delta1.sum_rows();

    Gradients { w1, b1, w2, b2, w3, b3 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::cross_entropy::cross_entropy;
    use crate::network::params::LayerSizes;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sizes() -> LayerSizes {
        LayerSizes { input: 5, hidden1: 7, hidden2: 6, output: 4 }
    }

    fn random_batch(rng: &mut StdRng, n: usize) -> (Matrix, Matrix) {
        let s = sizes();
        let x = Matrix::from_vec(n, s.input, (0..n * s.input).map(|_| rng.gen_range(-1.0..1.0)).collect());
        let mut y = Matrix::zeros(n, s.output);
        for i in 0..n {
            y.set(i, rng.gen_range(0..s.output), 1.0);
        }
        (x, y)
    }

    #[test]
    fn gradient_shapes_match_parameters() {
        let mut rng = StdRng::seed_from_u64(3);
        let params = Parameters::xavier(sizes(), &mut rng);
        for n in [1, 2, 17] {
            let (x, y) = random_batch(&mut rng, n);
            let acts = forward(&params, &x);
            assert_eq!(acts.output.shape(), (n, 4));
            let g = backward(&params, &x, &acts, &y);
            assert_eq!(g.w1.shape(), params.w1.shape());
            assert_eq!(g.b1.shape(), params.b1.shape());
            assert_eq!(g.w2.shape(), params.w2.shape());
            assert_eq!(g.b2.shape(), params.b2.shape());
            assert_eq!(g.w3.shape(), params.w3.shape());
            assert_eq!(g.b3.shape(), params.b3.shape());
        }
    }

    /// Summed batch loss, the quantity `backward` differentiates.
    fn summed_loss(params: &Parameters, x: &Matrix, y: &Matrix) -> f64 {
        cross_entropy(y, &forward(params, x).output) * x.rows as f64
    }

    fn numeric(
        params: &Parameters,
        x: &Matrix,
        y: &Matrix,
        pick: fn(&mut Parameters) -> &mut Matrix,
        idx: usize,
    ) -> f64 {
        let h = 1e-6;
        let mut plus = params.clone();
        pick(&mut plus).data[idx] += h;
        let mut minus = params.clone();
        pick(&mut minus).data[idx] -= h;
        (summed_loss(&plus, x, y) - summed_loss(&minus, x, y)) / (2.0 * h)
    }

    #[test]
    fn analytic_gradients_match_finite_differences() {
        let mut rng = StdRng::seed_from_u64(11);
        let params = Parameters::xavier(sizes(), &mut rng);
        let (x, y) = random_batch(&mut rng, 8);
        let g = backward(&params, &x, &forward(&params, &x), &y);

        let checks: [(fn(&mut Parameters) -> &mut Matrix, &Matrix); 6] = [
            (|p| &mut p.w1, &g.w1),
            (|p| &mut p.b1, &g.b1),
            (|p| &mut p.w2, &g.w2),
            (|p| &mut p.b2, &g.b2),
            (|p| &mut p.w3, &g.w3),
            (|p| &mut p.b3, &g.b3),
        ];
        for (pick, analytic) in checks {
            for idx in (0..analytic.data.len()).step_by(3) {
                let num = numeric(&params, &x, &y, pick, idx);
                let ana = analytic.data[idx];
                let tol = 1e-5 * (1.0 + num.abs().max(ana.abs()));
                assert!((num - ana).abs() < tol, "idx {}: numeric {} vs analytic {}", idx, num, ana);
            }
        }
    }

    #[test]
    fn predict_is_argmax_of_forward() {
        let mut rng = StdRng::seed_from_u64(5);
        let params = Parameters::xavier(sizes(), &mut rng);
        let (x, _) = random_batch(&mut rng, 10);
        assert_eq!(predict(&params, &x), forward(&params, &x).output.argmax_rows());
    }
}
