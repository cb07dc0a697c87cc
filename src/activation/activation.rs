use crate::math::matrix::Matrix;

/// ReLU applied element-wise: max(x, 0).
pub fn relu(z: &Matrix) -> Matrix {
    z.map(|x| if x > 0.0 { x } else { 0.0 })
}

/// ReLU derivative evaluated from the activation itself: 1 where the unit
/// fired (a > 0), 0 elsewhere.
pub fn relu_mask(a: &Matrix) -> Matrix {
    a.map(|x| if x > 0.0 { 1.0 } else { 0.0 })
}

/// Row-wise softmax.
///
/// Each row has its maximum subtracted before exponentiation so large logits
/// cannot overflow; every output row sums to 1.
pub fn softmax(z: &Matrix) -> Matrix {
    let mut out = Vec::with_capacity(z.data.len());
    for row in z.row_iter() {
        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let start = out.len();
        out.extend(row.iter().map(|&x| (x - max).exp()));
        let sum: f64 = out[start..].iter().sum();
        for e in &mut out[start..] {
            *e /= sum;
        }
    }
    Matrix::from_vec(z.rows, z.cols, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relu_clamps_negatives() {
        let z = Matrix::from_rows(vec![vec![-3.0, 0.0, 2.5], vec![-0.1, 7.0, -1e9]]);
        let a = relu(&z);
        assert!(a.data.iter().all(|&x| x >= 0.0));
        assert_eq!(a.data, vec![0.0, 0.0, 2.5, 0.0, 7.0, 0.0]);
        assert_eq!(relu_mask(&a).data, vec![0.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn softmax_rows_are_distributions() {
        let z = Matrix::from_rows(vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![1000.0, 1000.0, -1000.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0],
        ]);
        let p = softmax(&z);
        for row in p.row_iter() {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "row sums to {}", sum);
            assert!(row.iter().all(|x| x.is_finite() && *x >= 0.0));
        }
        assert!((p.get(1, 0) - 0.5).abs() < 1e-12);
        assert!((p.get(2, 3) - 0.25).abs() < 1e-12);
    }
}
