//! Row-aligned datasets and the mini-batch iterator that feeds one epoch
//! of gradient descent.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};

/// A feature matrix together with its row-aligned target vector.
///
/// `records` is an `N x D` matrix of numerical features, `targets` holds one
/// value per row. Construction checks the alignment once, so everything
/// downstream can rely on it.
#[derive(Debug)]
pub struct Dataset {
    pub records: Array2<f64>,
    pub targets: Array1<f64>,
}

impl Dataset {
    pub fn new(records: Array2<f64>, targets: Array1<f64>) -> Result<Dataset> {
        if records.shape()[0] != targets.len() {
            return Err(Error::MismatchedRows {
                records: records.shape()[0],
                targets: targets.len(),
            });
        }
        if records.shape()[0] == 0 {
            return Err(Error::EmptyDataset);
        }
        Ok(Dataset { records, targets })
    }

    pub fn nsamples(&self) -> usize {
        self.records.shape()[0]
    }

    pub fn nfeatures(&self) -> usize {
        self.records.shape()[1]
    }

    /// One pass over the rows in their original order.
    pub fn minibatches(&self, batch_size: usize) -> Result<MiniBatcher<'_>> {
        MiniBatcher::new(self.records.view(), self.targets.view(), batch_size)
    }

    /// One pass over the rows in a freshly permuted order.
    pub fn minibatches_shuffled<R: Rng>(
        &self,
        batch_size: usize,
        rng: &mut R,
    ) -> Result<MiniBatcher<'_>> {
        MiniBatcher::shuffled(self.records.view(), self.targets.view(), batch_size, rng)
    }
}

/// A finite, lazy sequence of `(X_sub, y_sub)` batches covering the dataset
/// exactly once.
///
/// One instance is one pass (one epoch): the iterator runs to exhaustion and
/// is then spent. Construct a fresh batcher for every epoch; a shuffled one
/// draws a new permutation each time. When the row count is not an exact
/// multiple of the batch size the final batch carries the remainder.
#[derive(Debug)]
pub struct MiniBatcher<'a> {
    records: ArrayView2<'a, f64>,
    targets: ArrayView1<'a, f64>,
    order: Vec<usize>,
    batch_size: usize,
    cursor: usize,
}

impl<'a> MiniBatcher<'a> {
    /// Sequential batches in original row order.
    pub fn new(
        records: ArrayView2<'a, f64>,
        targets: ArrayView1<'a, f64>,
        batch_size: usize,
    ) -> Result<MiniBatcher<'a>> {
        let order = (0..records.shape()[0]).collect();
        Self::with_order(records, targets, order, batch_size)
    }

    /// Batches over a row order permuted once, at construction.
    pub fn shuffled<R: Rng>(
        records: ArrayView2<'a, f64>,
        targets: ArrayView1<'a, f64>,
        batch_size: usize,
        rng: &mut R,
    ) -> Result<MiniBatcher<'a>> {
        let mut order: Vec<usize> = (0..records.shape()[0]).collect();
        order.shuffle(rng);
        Self::with_order(records, targets, order, batch_size)
    }

    fn with_order(
        records: ArrayView2<'a, f64>,
        targets: ArrayView1<'a, f64>,
        order: Vec<usize>,
        batch_size: usize,
    ) -> Result<MiniBatcher<'a>> {
        if batch_size == 0 {
            return Err(Error::InvalidBatchSize);
        }
        if records.shape()[0] != targets.len() {
            return Err(Error::MismatchedRows {
                records: records.shape()[0],
                targets: targets.len(),
            });
        }
        if records.shape()[0] == 0 {
            return Err(Error::EmptyDataset);
        }
        Ok(MiniBatcher {
            records,
            targets,
            order,
            batch_size,
            cursor: 0,
        })
    }
}

impl<'a> Iterator for MiniBatcher<'a> {
    type Item = (Array2<f64>, Array1<f64>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.order.len() {
            return None;
        }
        let end = (self.cursor + self.batch_size).min(self.order.len());
        let rows = &self.order[self.cursor..end];
        self.cursor = end;

        let x_sub = self.records.select(Axis(0), rows);
        let y_sub = self.targets.select(Axis(0), rows);
        Some((x_sub, y_sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array};
    use rand::SeedableRng;
    use rand_isaac::Isaac64Rng;

    fn counting_dataset(n: usize) -> Dataset {
        let records =
            Array::from_shape_fn((n, 2), |(i, j)| (i * 2 + j) as f64);
        let targets = Array::from_shape_fn(n, |i| i as f64);
        Dataset::new(records, targets).unwrap()
    }

    #[test]
    fn rejects_misaligned_rows() {
        let records = Array2::<f64>::zeros((3, 2));
        let targets = Array1::<f64>::zeros(4);
        assert_eq!(
            Dataset::new(records, targets).unwrap_err(),
            Error::MismatchedRows {
                records: 3,
                targets: 4
            }
        );
    }

    #[test]
    fn rejects_empty_dataset() {
        let records = Array2::<f64>::zeros((0, 2));
        let targets = Array1::<f64>::zeros(0);
        assert_eq!(Dataset::new(records, targets).unwrap_err(), Error::EmptyDataset);
    }

    #[test]
    fn rejects_zero_batch_size() {
        let data = counting_dataset(5);
        assert_eq!(data.minibatches(0).unwrap_err(), Error::InvalidBatchSize);
    }

    #[test]
    fn sequential_batches_slice_in_order() {
        let data = counting_dataset(10);
        let batches: Vec<_> = data.minibatches(3).unwrap().collect();
        assert_eq!(batches.len(), 4);

        let sizes: Vec<usize> = batches.iter().map(|(x, _)| x.shape()[0]).collect();
        assert_eq!(sizes, vec![3, 3, 3, 1]);

        // original row order, remainder batch included
        let seen: Vec<f64> = batches
            .iter()
            .flat_map(|(_, y)| y.iter().cloned())
            .collect();
        assert_eq!(seen, (0..10).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn batch_rows_stay_aligned_with_targets() {
        let data = counting_dataset(7);
        let mut rng = Isaac64Rng::seed_from_u64(11);
        for (x, y) in data.minibatches_shuffled(2, &mut rng).unwrap() {
            for (row, target) in x.genrows().into_iter().zip(y.iter()) {
                // row i of the source is [2i, 2i + 1] with target i
                assert_eq!(row[0], target * 2.0);
                assert_eq!(row[1], target * 2.0 + 1.0);
            }
        }
    }

    #[test]
    fn shuffled_pass_covers_every_row_once() {
        let data = counting_dataset(10);
        let mut rng = Isaac64Rng::seed_from_u64(42);
        let mut seen: Vec<f64> = data
            .minibatches_shuffled(4, &mut rng)
            .unwrap()
            .flat_map(|(_, y)| y.to_vec())
            .collect();
        assert_eq!(seen.len(), 10);
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(seen, (0..10).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_draws_same_order() {
        let data = counting_dataset(12);
        let collect = |seed| -> Vec<f64> {
            let mut rng = Isaac64Rng::seed_from_u64(seed);
            data.minibatches_shuffled(5, &mut rng)
                .unwrap()
                .flat_map(|(_, y)| y.to_vec())
                .collect()
        };
        assert_eq!(collect(7), collect(7));
    }

    #[test]
    fn single_batch_when_batch_size_exceeds_rows() {
        let data = counting_dataset(3);
        let batches: Vec<_> = data.minibatches(16).unwrap().collect();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].1, array![0.0, 1.0, 2.0]);
    }
}
