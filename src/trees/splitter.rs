use crate::data::example_set::ExampleSet;
use crate::trees::criterion::Criterion;
use std::sync::Arc;

/// Finds the best binary threshold of a numerical attribute.
#[derive(Clone, Debug)]
pub struct NumericalSplitter {
    criterion: Arc<dyn Criterion>,
}

impl NumericalSplitter {
    pub fn new(criterion: Arc<dyn Criterion>) -> Self {
        Self { criterion }
    }

    /// Threshold maximising the criterion's numerical benefit, or `NaN` when
    /// the attribute has fewer than two distinct non-missing values here.
    ///
    /// Candidates are the midpoints between consecutive distinct values; the
    /// first candidate wins ties.
    pub fn best_split(&self, examples: &ExampleSet, attribute: usize) -> f64 {
        if !self.criterion.supports_incremental_calculation() {
            return self.best_split_by_rescoring(examples, attribute);
        }

        let number_of_labels = examples.label().values().len();
        let mut sorted: Vec<(f64, usize)> = Vec::with_capacity(examples.size());
        let mut right = vec![0.0; number_of_labels];

        for &row in examples.rows() {
            let label = examples.dataset().label_value(row) as usize;
            right[label] += 1.0;
            let value = examples.value(row, attribute);
            if !value.is_nan() {
                sorted.push((value, label));
            }
        }
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left = vec![0.0; number_of_labels];
        let mut best_split = f64::NAN;
        let mut best_benefit = f64::NEG_INFINITY;

        for window in sorted.windows(2) {
            let (value, label) = window[0];
            let next_value = window[1].0;
            left[label] += 1.0;
            right[label] -= 1.0;

            if value == next_value {
                continue;
            }

            let benefit = self.criterion.benefit(&[left.clone(), right.clone()]);
            if benefit > best_benefit {
                best_benefit = benefit;
                best_split = midpoint(value, next_value);
            }
        }

        best_split
    }

    fn best_split_by_rescoring(&self, examples: &ExampleSet, attribute: usize) -> f64 {
        let mut values: Vec<f64> = examples
            .rows()
            .iter()
            .map(|&row| examples.value(row, attribute))
            .filter(|v| !v.is_nan())
            .collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup();

        let mut best_split = f64::NAN;
        let mut best_benefit = f64::NEG_INFINITY;
        for window in values.windows(2) {
            let split_value = midpoint(window[0], window[1]);
            let benefit = self
                .criterion
                .numerical_benefit(examples, attribute, split_value);
            if benefit > best_benefit {
                best_benefit = benefit;
                best_split = split_value;
            }
        }
        best_split
    }
}

/// Threshold between two consecutive distinct values `value < next_value`.
/// The result always satisfies `value <= t < next_value`, so `≤ t` keeps
/// `value` and `> t` keeps `next_value`.
pub fn midpoint(value: f64, next_value: f64) -> f64 {
    let mid = value + (next_value - value) / 2.0;
    if mid.is_nan() || mid < value || mid >= next_value {
        value
    } else {
        mid
    }
}
