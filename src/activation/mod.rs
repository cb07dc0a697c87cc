pub mod activation;

pub use activation::{relu, relu_mask, softmax};
