pub mod dataset;
pub mod idx;

pub use dataset::{one_hot, normalize_pixels, Batch, Dataset};
pub use idx::{load_idx_pair, parse_idx_pair};
