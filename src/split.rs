//! Seeded, reproducible dataset partitioning.
//!
//! Membership is decided by one seeded permutation of the record indices, so
//! the held-out subset has exactly `round(fraction * len)` records and the
//! same `(dataset, fraction, seed)` always yields the same subsets.

use crate::dataset::Dataset;
use crate::error::{PipelineError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// Disjoint train/validation/test partitions of one dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct Partitions {
    pub train: Dataset,
    pub validation: Dataset,
    pub test: Dataset,
}

impl Partitions {
    /// Record counts as `(train, validation, test)`.
    pub fn sizes(&self) -> (usize, usize, usize) {
        (self.train.len(), self.validation.len(), self.test.len())
    }
}

/// Split `n_samples` indices into `(kept, held_out)`.
///
/// `held_out` has exactly `round(fraction * n_samples)` entries. Both vectors
/// are in permutation order.
///
/// # Errors
/// - [`PipelineError::InvalidSplitFraction`] if `fraction` is not strictly inside (0, 1)
/// - [`PipelineError::EmptyInput`] if `n_samples == 0`
pub fn split_indices(n_samples: usize, fraction: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    // NaN fails both comparisons
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(PipelineError::InvalidSplitFraction(fraction));
    }
    if n_samples == 0 {
        return Err(PipelineError::EmptyInput(
            "cannot split an empty dataset".to_string(),
        ));
    }

    let n_held_out = (fraction * n_samples as f64).round() as usize;

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let held_out = indices.split_off(n_samples - n_held_out);
    debug!(
        n_samples,
        n_kept = indices.len(),
        n_held_out = held_out.len(),
        seed,
        "split indices"
    );
    Ok((indices, held_out))
}

/// Split `dataset` into `(subset_a, subset_b)` where `subset_b` holds
/// `round(fraction * len)` records.
///
/// Records keep every column, including the label; callers remove the label
/// afterwards with [`Dataset::split_target`].
pub fn split(dataset: &Dataset, fraction: f64, seed: u64) -> Result<(Dataset, Dataset)> {
    let (kept, held_out) = split_indices(dataset.len(), fraction, seed)?;
    Ok((dataset.take(&kept)?, dataset.take(&held_out)?))
}

/// Three-way split built from two successive [`split`] calls.
///
/// The test subset is drawn from the full dataset; the validation subset is
/// then drawn from the remaining records, with `validation_fraction` relative
/// to that remainder. Both calls use `seed`.
pub fn train_validation_test_split(
    dataset: &Dataset,
    test_fraction: f64,
    validation_fraction: f64,
    seed: u64,
) -> Result<Partitions> {
    let (train_full, test) = split(dataset, test_fraction, seed)?;
    let (train, validation) = split(&train_full, validation_fraction, seed)?;

    let partitions = Partitions {
        train,
        validation,
        test,
    };
    let (n_train, n_validation, n_test) = partitions.sizes();
    debug!(n_train, n_validation, n_test, "three-way split");
    Ok(partitions)
}
