//! Common metrics for regression: mean squared error, mean absolute error
//! and the coefficient of determination.

use ndarray::{ArrayBase, Data, Ix1};
use num_traits::{Float, FromPrimitive};

/// Regression metrics on 1-D arrays of predictions.
///
/// Implemented for any `ndarray` storage, so owned arrays and views mix
/// freely on either side of the comparison.
pub trait Regression<A, D: Data<Elem = A>> {
    /// Mean of the absolute differences.
    fn mean_absolute_error(&self, compare_to: &ArrayBase<D, Ix1>) -> A;
    /// Mean of the squared differences.
    fn mean_squared_error(&self, compare_to: &ArrayBase<D, Ix1>) -> A;
    /// Coefficient of determination against `compare_to` as ground truth.
    /// Infinite when the ground truth has zero variance.
    fn r2(&self, compare_to: &ArrayBase<D, Ix1>) -> A;
}

impl<A, D, D2> Regression<A, D> for ArrayBase<D2, Ix1>
where
    A: Float + FromPrimitive,
    D: Data<Elem = A>,
    D2: Data<Elem = A>,
{
    fn mean_absolute_error(&self, compare_to: &ArrayBase<D, Ix1>) -> A {
        let sum = self
            .iter()
            .zip(compare_to.iter())
            .fold(A::zero(), |acc, (&p, &t)| acc + (p - t).abs());
        sum / A::from_usize(self.len()).unwrap()
    }

    fn mean_squared_error(&self, compare_to: &ArrayBase<D, Ix1>) -> A {
        let sum = self
            .iter()
            .zip(compare_to.iter())
            .fold(A::zero(), |acc, (&p, &t)| {
                acc + (p - t) * (p - t)
            });
        sum / A::from_usize(self.len()).unwrap()
    }

    fn r2(&self, compare_to: &ArrayBase<D, Ix1>) -> A {
        let mean = compare_to.sum() / A::from_usize(compare_to.len()).unwrap();
        let residual = self
            .iter()
            .zip(compare_to.iter())
            .fold(A::zero(), |acc, (&p, &t)| acc + (p - t) * (p - t));
        let total = compare_to
            .iter()
            .fold(A::zero(), |acc, &t| acc + (t - mean) * (t - mean));
        if total == A::zero() {
            A::infinity()
        } else {
            A::one() - residual / total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn mse_is_zero_iff_equal() {
        let y = array![1.0, 2.0, 3.0];
        assert_abs_diff_eq!(y.mean_squared_error(&y), 0.0);

        let y_hat = array![1.0, 2.0, 3.5];
        assert!(y_hat.mean_squared_error(&y) > 0.0);
    }

    #[test]
    fn mse_averages_squared_differences() {
        let y_hat = array![0.0, 0.0];
        let y = array![3.0, 1.0];
        // (9 + 1) / 2
        assert_abs_diff_eq!(y_hat.mean_squared_error(&y), 5.0);
        assert_abs_diff_eq!(y_hat.mean_absolute_error(&y), 2.0);
    }

    #[test]
    fn mse_accepts_views() {
        let y_hat = array![1.0, 3.0];
        let y = array![2.0, 2.0];
        assert_abs_diff_eq!(y_hat.view().mean_squared_error(&y.view()), 1.0);
    }

    #[test]
    fn r2_of_perfect_fit_is_one() {
        let y = array![1.0, 2.0, 3.0, 4.0];
        assert_abs_diff_eq!(y.r2(&y), 1.0);
    }

    #[test]
    fn r2_of_mean_predictor_is_zero() {
        let y = array![1.0, 2.0, 3.0];
        let y_hat = array![2.0, 2.0, 2.0];
        assert_abs_diff_eq!(y_hat.r2(&y), 0.0);
    }

    #[test]
    fn r2_with_constant_truth_is_infinite() {
        let y = array![2.0, 2.0];
        let y_hat = array![1.0, 3.0];
        assert!(y_hat.r2(&y).is_infinite());
    }
}
