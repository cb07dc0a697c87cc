use crate::math::matrix::Matrix;
use crate::network::network::Gradients;
use crate::network::params::Parameters;

/// Plain stochastic gradient descent with L2 weight decay on the weight
/// matrices. Biases are not decayed.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    pub weight_decay: f64,
}

impl Sgd {
    pub fn new(weight_decay: f64) -> Sgd {
        Sgd { weight_decay }
    }

    /// Returns the parameters after one update:
    ///
    ///   w' = w - (dw / batch_size)·lr - w·(lr·weight_decay)
    ///   b' = b - (db / batch_size)·lr
    ///
    /// `grads` are batch sums as produced by `network::backward`.
    pub fn step(
        &self,
        params: &Parameters,
        grads: &Gradients,
        batch_size: usize,
        learning_rate: f64,
    ) -> Parameters {
        let scale = learning_rate / batch_size as f64;
        let shrink = 1.0 - learning_rate * self.weight_decay;
        let weight = |w: &Matrix, g: &Matrix| &w.scale(shrink) - &g.scale(scale);
        let bias = |b: &Matrix, g: &Matrix| b - &g.scale(scale);

        Parameters {
            w1: weight(&params.w1, &grads.w1),
            b1: bias(&params.b1, &grads.b1),
            w2: weight(&params.w2, &grads.w2),
            b2: bias(&params.b2, &grads.b2),
            w3: weight(&params.w3, &grads.w3),
            b3: bias(&params.b3, &grads.b3),
        }
    }
}
