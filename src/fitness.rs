//! This module implements the impurity measures and the evaluation metrics used
//! for training and scoring a decision tree.

use crate::decision_tree::{ClassLabel, DataVec, Probabilities, ValueType};
use crate::errors::{CartError, Result};

use std::collections::HashMap;

/// Comparing two number with a costomized floating error threshold.
///
/// # Example
/// ```rust
/// use cart::fitness::almost_equal_thrs;
/// assert_eq!(true, almost_equal_thrs(1.0, 0.998, 0.01));
/// ```
pub fn almost_equal_thrs(a: ValueType, b: ValueType, thrs: f64) -> bool {
    ((a - b).abs() as f64) < thrs
}

/// Comparing two number with default floating error threshold.
///
/// # Example
/// ```rust
/// use cart::fitness::almost_equal;
/// assert_eq!(false, almost_equal(1.0, 0.998));
/// assert_eq!(true, almost_equal(1.0, 0.999998));
/// ```
pub fn almost_equal(a: ValueType, b: ValueType) -> bool {
    ((a - b).abs() as f64) < 1.0e-5
}

/// Return whether all labels in the slice are identical.
/// An empty slice is not considered pure.
pub fn same(labels: &[ClassLabel]) -> bool {
    if labels.is_empty() {
        return false;
    }

    let t: ClassLabel = labels[0];
    for label in labels.iter().skip(1) {
        if *label != t {
            return false;
        }
    }
    true
}

/// Calculate the Gini impurity of a label subset. Return the impurity score and
/// the number of labels.
///
/// The score is `1 - sum(p_c^2)` over the distinct classes present, where `p_c`
/// is the empirical fraction of labels equal to class `c`. The score is 0 exactly
/// when all labels are identical and grows as the classes approach an even split.
///
/// An empty subset has no defined impurity and is rejected as an invalid
/// argument.
///
/// # Example
/// ```rust
/// use cart::fitness::impurity;
/// let (score, count) = impurity(&[0, 0, 0, 1]).unwrap();
/// assert_eq!(count, 4);
/// assert!((score - 0.375).abs() < 1e-9);
/// ```
pub fn impurity(labels: &[ClassLabel]) -> Result<(f64, usize)> {
    if labels.is_empty() {
        return Err(CartError::from(
            "cannot compute the impurity of an empty label subset",
        ));
    }

    let mut counts: HashMap<ClassLabel, usize> = HashMap::new();
    for label in labels.iter() {
        *counts.entry(*label).or_insert(0) += 1;
    }

    let n = labels.len();
    let mut score: f64 = 1.0;
    for count in counts.values() {
        let p = (*count as f64) / (n as f64);
        score -= p * p;
    }
    Ok((score, n))
}

/// Calculate the size-weighted Gini impurity of two label subsets. This is the
/// objective the split search minimizes: it rewards splits that make both sides
/// more homogeneous, weighted by how many labels land on each side.
///
/// # Example
/// ```rust
/// use cart::fitness::weighted_impurity;
/// let score = weighted_impurity(&[0, 0], &[1, 1]).unwrap();
/// assert_eq!(score, 0.0);
/// ```
pub fn weighted_impurity(left: &[ClassLabel], right: &[ClassLabel]) -> Result<f64> {
    let (left_score, left_count) = impurity(left)?;
    let (right_score, right_count) = impurity(right)?;
    let total = (left_count + right_count) as f64;
    Ok((left_score * (left_count as f64) + right_score * (right_count as f64)) / total)
}

/// Return the class with the largest predicted probability. The smallest label
/// wins ties, so the result does not depend on the map's iteration order.
///
/// # Example
/// ```rust
/// use std::collections::HashMap;
/// use cart::fitness::most_likely;
/// let mut probabilities = HashMap::new();
/// probabilities.insert(0, 0.25);
/// probabilities.insert(1, 0.75);
/// assert_eq!(most_likely(&probabilities), Some(1));
/// ```
pub fn most_likely(probabilities: &Probabilities) -> Option<ClassLabel> {
    let mut best: Option<(ClassLabel, f64)> = None;
    for (label, p) in probabilities.iter() {
        best = match best {
            None => Some((*label, *p)),
            Some((best_label, best_p)) => {
                if *p > best_p || (*p == best_p && *label < best_label) {
                    Some((*label, *p))
                } else {
                    Some((best_label, best_p))
                }
            }
        };
    }
    best.map(|(label, _)| label)
}

/// Return the fraction of samples whose most likely predicted class equals
/// their label. `predict` must have the same length as `dv`.
pub fn accuracy(dv: &DataVec, predict: &[Probabilities]) -> f64 {
    assert_eq!(dv.len(), predict.len());

    if dv.is_empty() {
        return 0.0;
    }

    let mut correct: usize = 0;
    for (data, probabilities) in dv.iter().zip(predict.iter()) {
        if most_likely(probabilities) == Some(data.label) {
            correct += 1;
        }
    }
    (correct as f64) / (dv.len() as f64)
}
