//! Pairwise distance matrices between point sets.
//!
//! Points are matrix rows: box centers are `n x 2`, feature descriptors
//! `n x D`.

use ndarray::{Array1, Array2, ArrayView2};

use crate::shared::bounding_box::Vector2;

/// Euclidean distance between every row of `a` and every row of `b`.
///
/// Entry `[i, j]` is the distance from `a.row(i)` to `b.row(j)`. If either
/// set is empty the result has zero rows or zero columns.
pub fn pairwise_distances(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Array2<f64> {
    debug_assert!(
        a.nrows() == 0 || b.nrows() == 0 || a.ncols() == b.ncols(),
        "point sets must share a dimension"
    );
    Array2::from_shape_fn((a.nrows(), b.nrows()), |(i, j)| {
        a.row(i)
            .iter()
            .zip(b.row(j).iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
    })
}

/// Stacks 2D points into an `n x 2` matrix.
pub fn points_matrix(points: &[Vector2]) -> Array2<f64> {
    Array2::from_shape_fn((points.len(), 2), |(i, j)| points[i][j])
}

/// Stacks descriptors of length `dimension` into an `n x dimension` matrix.
pub fn features_matrix(features: &[&Array1<f64>], dimension: usize) -> Array2<f64> {
    Array2::from_shape_fn((features.len(), dimension), |(i, j)| features[i][j])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_pairwise_distances_values() {
        let a = array![[0.0, 0.0], [3.0, 4.0]];
        let b = array![[0.0, 0.0], [6.0, 8.0], [3.0, 0.0]];
        let d = pairwise_distances(a.view(), b.view());
        assert_eq!(d.shape(), &[2, 3]);
        assert_relative_eq!(d[[0, 0]], 0.0);
        assert_relative_eq!(d[[0, 1]], 10.0);
        assert_relative_eq!(d[[0, 2]], 3.0);
        assert_relative_eq!(d[[1, 0]], 5.0);
        assert_relative_eq!(d[[1, 1]], 5.0);
        assert_relative_eq!(d[[1, 2]], 4.0);
    }

    #[test]
    fn test_pairwise_distances_high_dimension() {
        let a = Array2::<f64>::ones((1, 10));
        let b = Array2::<f64>::zeros((2, 10));
        let d = pairwise_distances(a.view(), b.view());
        assert_relative_eq!(d[[0, 0]], 10f64.sqrt());
        assert_relative_eq!(d[[0, 1]], 10f64.sqrt());
    }

    #[test]
    fn test_empty_side_gives_empty_matrix() {
        let a = array![[1.0, 2.0]];
        let empty = Array2::<f64>::zeros((0, 2));
        assert_eq!(pairwise_distances(a.view(), empty.view()).shape(), &[1, 0]);
        assert_eq!(pairwise_distances(empty.view(), a.view()).shape(), &[0, 1]);
    }

    #[test]
    fn test_points_matrix_layout() {
        let m = points_matrix(&[[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(m, array![[1.0, 2.0], [3.0, 4.0]]);
    }

    #[test]
    fn test_features_matrix_layout() {
        let f1 = array![1.0, 2.0, 3.0];
        let f2 = array![4.0, 5.0, 6.0];
        let m = features_matrix(&[&f1, &f2], 3);
        assert_eq!(m, array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    }
}
