pub mod cross_entropy;

pub use cross_entropy::{cross_entropy, softmax_cross_entropy_delta};
