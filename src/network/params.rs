use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Widths of the four neuron layers: input → hidden1 → hidden2 → output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSizes {
    pub input: usize,
    pub hidden1: usize,
    pub hidden2: usize,
    pub output: usize,
}

impl Default for LayerSizes {
    fn default() -> Self {
        LayerSizes { input: 784, hidden1: 300, hidden2: 100, output: 10 }
    }
}

/// Weights and biases of the three fully connected layers.
///
/// Weight matrices are laid out (fan_in × fan_out) so a batch of row vectors
/// is propagated with `x · w`; biases are single rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub w1: Matrix,
    pub b1: Matrix,
    pub w2: Matrix,
    pub b2: Matrix,
    pub w3: Matrix,
    pub b3: Matrix,
}

impl Parameters {
    /// Xavier-uniform initialization of every matrix, biases included.
    ///
    /// Each matrix draws from U(-x, x) with x = sqrt(6 / (rows + cols)) of
    /// that matrix, so bias rows use a fan-in of 1.
    pub fn xavier<R: Rng + ?Sized>(sizes: LayerSizes, rng: &mut R) -> Parameters {
        let LayerSizes { input, hidden1, hidden2, output } = sizes;
        Parameters {
            w1: Matrix::xavier_uniform(input, hidden1, rng),
            b1: Matrix::xavier_uniform(1, hidden1, rng),
            w2: Matrix::xavier_uniform(hidden1, hidden2, rng),
            b2: Matrix::xavier_uniform(1, hidden2, rng),
            w3: Matrix::xavier_uniform(hidden2, output, rng),
            b3: Matrix::xavier_uniform(1, output, rng),
        }
    }

    /// Layer widths as implied by the weight shapes.
    pub fn sizes(&self) -> LayerSizes {
        LayerSizes {
            input: self.w1.rows,
            hidden1: self.w1.cols,
            hidden2: self.w2.cols,
            output: self.w3.cols,
        }
    }

    /// Checks that consecutive layers agree on their shared width.
    pub fn validate(&self) -> Result<()> {
        let s = self.sizes();
        let expected = [
            ("b1", &self.b1, (1, s.hidden1)),
            ("w2", &self.w2, (s.hidden1, s.hidden2)),
            ("b2", &self.b2, (1, s.hidden2)),
            ("w3", &self.w3, (s.hidden2, s.output)),
            ("b3", &self.b3, (1, s.output)),
        ];
        for (what, m, shape) in expected {
            if m.shape() != shape {
                return Err(Error::ShapeMismatch { what, expected: shape, actual: m.shape() });
            }
        }
        Ok(())
    }

    /// Serializes the parameters to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Reads parameters written by `save_json` and checks their shapes.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Parameters> {
        let file = File::open(path)?;
        let params: Parameters = serde_json::from_reader(BufReader::new(file))?;
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small() -> LayerSizes {
        LayerSizes { input: 6, hidden1: 5, hidden2: 4, output: 3 }
    }

    #[test]
    fn xavier_shapes_follow_layer_sizes() {
        let p = Parameters::xavier(small(), &mut StdRng::seed_from_u64(1));
        assert_eq!(p.w1.shape(), (6, 5));
        assert_eq!(p.b1.shape(), (1, 5));
        assert_eq!(p.w2.shape(), (5, 4));
        assert_eq!(p.b2.shape(), (1, 4));
        assert_eq!(p.w3.shape(), (4, 3));
        assert_eq!(p.b3.shape(), (1, 3));
        assert_eq!(p.sizes(), small());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn same_seed_same_parameters() {
        let a = Parameters::xavier(small(), &mut StdRng::seed_from_u64(42));
        let b = Parameters::xavier(small(), &mut StdRng::seed_from_u64(42));
        let c = Parameters::xavier(small(), &mut StdRng::seed_from_u64(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn validate_reports_inconsistent_widths() {
        let mut p = Parameters::xavier(small(), &mut StdRng::seed_from_u64(1));
        p.w2 = Matrix::zeros(7, 4);
        match p.validate() {
            Err(Error::ShapeMismatch { what, expected, actual }) => {
                assert_eq!(what, "w2");
                assert_eq!(expected, (5, 4));
                assert_eq!(actual, (7, 4));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn json_round_trip_through_file() {
        let p = Parameters::xavier(small(), &mut StdRng::seed_from_u64(9));
        let path = std::env::temp_dir().join(format!("mlp-params-{}.json", std::process::id()));
        p.save_json(&path).unwrap();
        let loaded = Parameters::load_json(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.sizes(), p.sizes());
        let diff = (&loaded.w1 - &p.w1).data.iter().chain((&loaded.b3 - &p.b3).data.iter())
            .fold(0.0f64, |m, x| m.max(x.abs()));
        assert!(diff < 1e-12);
    }
}
