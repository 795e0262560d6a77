//! Linear regression fit by mini-batch gradient descent, from first
//! principles: no black-box optimizer, no autodiff.
//!
//! [`LinearRegression`] owns a weight vector and a bias scalar, both drawn
//! from a standard normal at construction. [`LinearRegression::fit`] walks
//! the training set once per epoch through a [`minilearn::MiniBatcher`],
//! descends the exact mean-squared-error gradients and stops early once the
//! validation loss settles.

use log::{debug, info};
use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use minilearn::dataset::Dataset;
use minilearn::error::{Error, Result};
use minilearn::metrics::Regression;

/// Hyperparameters for one `fit` call.
///
/// The defaults match the documented reference settings: learning rate
/// 0.001, up to 1000 epochs, early stop once consecutive validation losses
/// differ by less than 0.001, shuffled batches of 16 rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitConfig {
    pub lr: f64,
    pub epochs: usize,
    pub batch_size: usize,
    pub shuffle: bool,
    pub acceptable_error: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        FitConfig {
            lr: 0.001,
            epochs: 1000,
            batch_size: 16,
            shuffle: true,
            acceptable_error: 0.001,
        }
    }
}

/// Per-epoch loss histories of a completed `fit` call.
///
/// One entry per epoch actually run, so both vectors are `epochs` long at
/// most and shorter when the early stop fired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitReport {
    pub training: Vec<f64>,
    pub validation: Vec<f64>,
}

impl FitReport {
    pub fn epochs_run(&self) -> usize {
        self.training.len()
    }
}

/// A linear predictor `x * w + b` with its parameters optimized by
/// mini-batch gradient descent on the mean squared error.
///
/// The weight vector and bias are the model's only mutable state. `fit` may
/// be called repeatedly; each call resumes from the current parameters and
/// starts a fresh loss history. The model does no internal locking, so
/// sharing one instance across threads must be serialized by the caller.
///
/// A learning rate too large for the data makes the loss diverge; that is
/// not detected here. NaN and infinity propagate through predictions and
/// the loss histories, where the caller can observe them.
pub struct LinearRegression {
    weights: Array1<f64>,
    bias: f64,
}

impl LinearRegression {
    /// Create a model for `n_features` columns, parameters drawn from a
    /// standard normal.
    pub fn new(n_features: usize) -> Result<LinearRegression> {
        Self::with_rng(n_features, &mut rand::thread_rng())
    }

    /// Like [`new`](Self::new), drawing the initial parameters from the
    /// given source. Seed the source to make runs reproducible.
    pub fn with_rng<R: Rng>(n_features: usize, rng: &mut R) -> Result<LinearRegression> {
        if n_features == 0 {
            return Err(Error::ZeroFeatures);
        }
        let weights = Array1::random_using(n_features, StandardNormal, rng);
        let bias: f64 = rng.sample(StandardNormal);
        Ok(LinearRegression { weights, bias })
    }

    /// Rebuild a model from known parameters.
    pub fn from_parameters(weights: Array1<f64>, bias: f64) -> Result<LinearRegression> {
        if weights.is_empty() {
            return Err(Error::ZeroFeatures);
        }
        Ok(LinearRegression { weights, bias })
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Predict one value per row of `x` with the current parameters.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.shape()[1] != self.weights.len() {
            return Err(Error::MismatchedFeatures {
                expected: self.weights.len(),
                actual: x.shape()[1],
            });
        }
        Ok(x.dot(&self.weights) + self.bias)
    }

    /// Exact MSE gradients for a linear predictor on one batch.
    ///
    /// With `error = y_hat - y` over `m` rows these are
    /// `grad_w = (2/m) * transpose(error) * X` and `grad_b = (2/m) * sum(error)`. The
    /// factor of two and the mean keep the documented learning rates valid.
    fn gradients(&self, x: &Array2<f64>, y: &Array1<f64>, y_hat: &Array1<f64>) -> (Array1<f64>, f64) {
        let m = y.len() as f64;
        let error = y_hat - y;
        let grad_w = error.dot(x).mapv(|g| 2.0 * g / m);
        let grad_b = 2.0 * error.sum() / m;
        (grad_w, grad_b)
    }

    fn update(&mut self, lr: f64, x: &Array2<f64>, y: &Array1<f64>, y_hat: &Array1<f64>) {
        let (grad_w, grad_b) = self.gradients(x, y, y_hat);
        self.weights.scaled_add(-lr, &grad_w);
        self.bias -= lr * grad_b;
    }

    fn validation_loss(&self, valid: &Dataset) -> f64 {
        let y_hat = valid.records.dot(&self.weights) + self.bias;
        y_hat.mean_squared_error(&valid.targets)
    }

    /// Fit the parameters to `train`, watching `valid` for the early stop.
    /// Batches are shuffled with `thread_rng`; use
    /// [`fit_using`](Self::fit_using) for a seeded run.
    pub fn fit(&mut self, train: &Dataset, valid: &Dataset, config: &FitConfig) -> Result<FitReport> {
        self.fit_using(train, valid, config, &mut rand::thread_rng())
    }

    /// Fit the parameters to `train` by mini-batch gradient descent.
    ///
    /// Each epoch takes one pass over a fresh batcher. Per batch the model
    /// records the training and validation MSE at the current parameters,
    /// then steps against the gradients; the epoch means of both
    /// accumulators make up the returned histories. After epoch two, the
    /// fit stops as soon as two consecutive validation means differ by less
    /// than `acceptable_error`.
    pub fn fit_using<R: Rng>(
        &mut self,
        train: &Dataset,
        valid: &Dataset,
        config: &FitConfig,
        rng: &mut R,
    ) -> Result<FitReport> {
        if train.nfeatures() != self.weights.len() {
            return Err(Error::MismatchedFeatures {
                expected: self.weights.len(),
                actual: train.nfeatures(),
            });
        }
        if valid.nfeatures() != self.weights.len() {
            return Err(Error::MismatchedFeatures {
                expected: self.weights.len(),
                actual: valid.nfeatures(),
            });
        }

        let mut training = Vec::new();
        let mut validation = Vec::new();
        for epoch in 0..config.epochs {
            let batches = if config.shuffle {
                train.minibatches_shuffled(config.batch_size, rng)?
            } else {
                train.minibatches(config.batch_size)?
            };

            let mut batch_losses = Vec::new();
            let mut batch_validation_losses = Vec::new();
            for (x_batch, y_batch) in batches {
                let y_hat = x_batch.dot(&self.weights) + self.bias;
                batch_losses.push(y_hat.mean_squared_error(&y_batch));
                batch_validation_losses.push(self.validation_loss(valid));
                self.update(config.lr, &x_batch, &y_batch, &y_hat);
            }
            training.push(mean(&batch_losses));
            validation.push(mean(&batch_validation_losses));
            debug!(
                "epoch {}: training loss {}, validation loss {}",
                epoch,
                training[training.len() - 1],
                validation[validation.len() - 1]
            );

            let n = validation.len();
            if epoch > 2 && (validation[n - 2] - validation[n - 1]).abs() < config.acceptable_error {
                info!(
                    "validation loss settled at {} after epoch {}",
                    validation[n - 1],
                    epoch
                );
                break;
            }
        }

        Ok(FitReport {
            training,
            validation,
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
