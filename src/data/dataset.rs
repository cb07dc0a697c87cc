use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Flattened images paired with integer class labels.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// One sample per row.
    pub images: Matrix,
    pub labels: Vec<usize>,
    pub num_classes: usize,
}

/// One mini-batch: input rows plus the matching one-hot targets.
#[derive(Debug, Clone)]
pub struct Batch {
    pub images: Matrix,
    pub labels: Matrix,
}

impl Dataset {
    pub fn new(images: Matrix, labels: Vec<usize>, num_classes: usize) -> Result<Dataset> {
        if images.rows != labels.len() {
            return Err(Error::InvalidData(format!(
                "{} images but {} labels",
                images.rows,
                labels.len()
            )));
        }
        if let Some((i, &label)) = labels.iter().enumerate().find(|&(_, &l)| l >= num_classes) {
            return Err(Error::InvalidData(format!(
                "label {} at index {} is out of range for {} classes",
                label, i, num_classes
            )));
        }
        Ok(Dataset { images, labels, num_classes })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn input_dim(&self) -> usize {
        self.images.cols
    }

    /// Number of whole batches of `batch_size` that fit in the dataset.
    pub fn batches_per_pass(&self, batch_size: usize) -> usize {
        self.len() / batch_size
    }

    /// The `iteration`-th consecutive slice of `batch_size` rows, wrapping
    /// back to the start once the whole batches are exhausted. A trailing
    /// partial batch is never produced.
    ///
    /// # Panics
    /// Panics if the dataset holds fewer than `batch_size` samples.
    pub fn batch(&self, iteration: usize, batch_size: usize) -> Batch {
        let per_pass = self.batches_per_pass(batch_size);
        assert!(per_pass > 0, "dataset of {} samples cannot fill a batch of {}", self.len(), batch_size);
        let start = (iteration % per_pass) * batch_size;
        let end = start + batch_size;
        Batch {
            images: self.images.slice_rows(start, end),
            labels: one_hot(&self.labels[start..end], self.num_classes),
        }
    }
}

/// One-hot encodes class indices into a [labels.len(), num_classes] matrix.
pub fn one_hot(labels: &[usize], num_classes: usize) -> Matrix {
    let mut m = Matrix::zeros(labels.len(), num_classes);
    for (i, &label) in labels.iter().enumerate() {
        m.set(i, label, 1.0);
    }
    m
}

/// Scales raw 8-bit pixels into [0, 1) by dividing by 256.
pub fn normalize_pixels(pixels: &[u8]) -> Vec<f64> {
    pixels.iter().map(|&p| p as f64 / 256.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> Dataset {
        let images = Matrix::from_vec(5, 2, (0..10).map(|x| x as f64).collect());
        Dataset::new(images, vec![0, 1, 2, 1, 0], 3).unwrap()
    }

    #[test]
    fn rejects_label_count_mismatch() {
        let err = Dataset::new(Matrix::zeros(3, 2), vec![0, 1], 2).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn rejects_out_of_range_label() {
        let err = Dataset::new(Matrix::zeros(2, 2), vec![0, 2], 2).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn batches_walk_consecutive_rows_and_wrap() {
        let d = tiny();
        assert_eq!(d.batches_per_pass(2), 2);
        let b1 = d.batch(1, 2);
        assert_eq!(b1.images.data, vec![4.0, 5.0, 6.0, 7.0]);
        assert_eq!(b1.labels, Matrix::from_rows(vec![vec![0.0, 0.0, 1.0], vec![0.0, 1.0, 0.0]]));
        // the fifth sample never forms a batch; iteration 2 wraps to the start
        assert_eq!(d.batch(2, 2).images.data, d.batch(0, 2).images.data);
    }

    #[test]
    fn one_hot_marks_single_class_per_row() {
        let m = one_hot(&[2, 0], 3);
        assert_eq!(m.data, vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn pixels_scale_below_one() {
        assert_eq!(normalize_pixels(&[0, 128, 255]), vec![0.0, 0.5, 255.0 / 256.0]);
    }
}
