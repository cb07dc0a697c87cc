pub mod dense;

pub use dense::{affine, hidden_layer, output_layer};
