pub mod network;
pub mod params;

pub use network::{backward, forward, predict, Activations, Gradients};
pub use params::{LayerSizes, Parameters};
