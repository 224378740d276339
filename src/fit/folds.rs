//! Deterministic k-fold partitioning.
//!
//! The partition shuffles indices under a fixed seed and slices the shuffled
//! order into k contiguous validation chunks. Together the chunks cover every
//! index exactly once, so the folds form a proper partition.
//!
//! Reproducibility is a hard requirement: the same (n, k, seed) triple must
//! always produce the same folds, or repeated runs would select different
//! degrees for the same series.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::AppError;

/// One train/validation split of series indices.
#[derive(Debug, Clone)]
pub struct FoldSplit {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

/// Build the k-fold partition of `0..n`.
///
/// Fails with exit-code-3 semantics when `n < k`: silently degrading to
/// fewer folds would change selection behavior between series lengths.
pub fn k_fold_splits(n: usize, k: usize, seed: u64) -> Result<Vec<FoldSplit>, AppError> {
    if k < 2 {
        return Err(AppError::new(2, "Fold count k must be >= 2."));
    }
    if n < k {
        return Err(AppError::new(
            3,
            format!("Series has {n} points; {k}-fold cross-validation needs at least {k}."),
        ));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    // The first n % k folds take one extra index.
    let base = n / k;
    let extra = n % k;

    let mut folds = Vec::with_capacity(k);
    let mut start = 0usize;
    for fold in 0..k {
        let size = base + usize::from(fold < extra);
        let end = start + size;
        let validation = indices[start..end].to_vec();
        let train: Vec<usize> = indices[..start]
            .iter()
            .chain(indices[end..].iter())
            .copied()
            .collect();
        folds.push(FoldSplit { train, validation });
        start = end;
    }

    Ok(folds)
}

/// The smallest training-set size across the folds.
///
/// Candidate degrees are checked against this: a degree needing more
/// coefficients than the smallest training fold has points cannot be
/// cross-validated meaningfully.
pub fn min_train_size(folds: &[FoldSplit]) -> usize {
    folds.iter().map(|f| f.train.len()).min().unwrap_or(0)
}
