//! Split-quality criteria.
//!
//! Every criterion scores a weight-count matrix `[partition][label]`. The
//! nominal and numerical benefits are built on top of that by counting the
//! examples on each side of the candidate split, which also lets the
//! numerical splitter score thresholds incrementally.

use crate::data::example_set::ExampleSet;
use crate::error::{Result, TreeError};
use std::fmt::Debug;
use std::str::FromStr;
use std::sync::Arc;

pub trait Criterion: Debug + Send + Sync {
    /// Benefit of distributing the examples as given by `weight_counts`.
    fn benefit(&self, weight_counts: &[Vec<f64>]) -> f64;

    /// Benefit of a multiway split on every value of a nominal attribute.
    fn nominal_benefit(&self, examples: &ExampleSet, attribute: usize) -> f64 {
        self.benefit(&nominal_weight_counts(examples, attribute))
    }

    /// Benefit of a binary split of a numerical attribute at `split_value`.
    fn numerical_benefit(&self, examples: &ExampleSet, attribute: usize, split_value: f64) -> f64 {
        self.benefit(&numerical_weight_counts(examples, attribute, split_value))
    }

    /// Whether [`Criterion::benefit`] may be fed running counts while sweeping
    /// sorted values.
    fn supports_incremental_calculation(&self) -> bool {
        true
    }
}

/// Label counts per nominal value, plus a trailing row for missing values.
pub fn nominal_weight_counts(examples: &ExampleSet, attribute: usize) -> Vec<Vec<f64>> {
    let number_of_values = examples.attribute(attribute).values().len();
    let number_of_labels = examples.label().values().len();
    let mut counts = vec![vec![0.0; number_of_labels]; number_of_values + 1];

    for &row in examples.rows() {
        let label = examples.dataset().label_value(row) as usize;
        let value = examples.value(row, attribute);
        let partition = if value.is_nan() {
            number_of_values
        } else {
            value as usize
        };
        counts[partition][label] += 1.0;
    }
    counts
}

/// Label counts for `<= split_value` and the remainder (missing included).
pub fn numerical_weight_counts(
    examples: &ExampleSet,
    attribute: usize,
    split_value: f64,
) -> Vec<Vec<f64>> {
    let number_of_labels = examples.label().values().len();
    let mut counts = vec![vec![0.0; number_of_labels]; 2];

    for &row in examples.rows() {
        let label = examples.dataset().label_value(row) as usize;
        let side = if examples.value(row, attribute) <= split_value {
            0
        } else {
            1
        };
        counts[side][label] += 1.0;
    }
    counts
}

fn label_weights(weight_counts: &[Vec<f64>]) -> Vec<f64> {
    let number_of_labels = weight_counts.first().map_or(0, Vec::len);
    let mut weights = vec![0.0; number_of_labels];
    for partition in weight_counts {
        for (label, weight) in partition.iter().enumerate() {
            weights[label] += weight;
        }
    }
    weights
}

fn partition_weights(weight_counts: &[Vec<f64>]) -> Vec<f64> {
    weight_counts.iter().map(|p| p.iter().sum()).collect()
}

/// Shannon entropy in bits of a weight vector with the given total.
pub fn entropy(weights: &[f64], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    weights
        .iter()
        .filter(|&&w| w > 0.0)
        .map(|&w| {
            let p = w / total;
            -p * p.log2()
        })
        .sum()
}

/// Gini impurity of a weight vector with the given total.
pub fn gini_index(weights: &[f64], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - weights
        .iter()
        .map(|&w| {
            let p = w / total;
            p * p
        })
        .sum::<f64>()
}

fn information_gain(weight_counts: &[Vec<f64>]) -> f64 {
    let partitions = partition_weights(weight_counts);
    let total: f64 = partitions.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let label_entropy = entropy(&label_weights(weight_counts), total);
    let split_entropy: f64 = weight_counts
        .iter()
        .zip(&partitions)
        .map(|(counts, &weight)| weight / total * entropy(counts, weight))
        .sum();
    label_entropy - split_entropy
}

fn apply_minimal_gain(benefit: f64, minimal_gain: f64) -> f64 {
    if benefit < minimal_gain {
        0.0
    } else {
        benefit
    }
}

/// Reduction in label entropy.
#[derive(Clone, Debug)]
pub struct InfoGainCriterion {
    minimal_gain: f64,
}

impl InfoGainCriterion {
    pub fn new(minimal_gain: f64) -> Self {
        Self { minimal_gain }
    }
}

impl Criterion for InfoGainCriterion {
    fn benefit(&self, weight_counts: &[Vec<f64>]) -> f64 {
        apply_minimal_gain(information_gain(weight_counts), self.minimal_gain)
    }
}

/// Information gain normalised by the entropy of the partition sizes.
#[derive(Clone, Debug)]
pub struct GainRatioCriterion {
    minimal_gain: f64,
}

impl GainRatioCriterion {
    pub fn new(minimal_gain: f64) -> Self {
        Self { minimal_gain }
    }
}

impl Criterion for GainRatioCriterion {
    fn benefit(&self, weight_counts: &[Vec<f64>]) -> f64 {
        let gain = information_gain(weight_counts);
        let partitions = partition_weights(weight_counts);
        let split_info = entropy(&partitions, partitions.iter().sum());
        let ratio = if split_info > 0.0 {
            gain / split_info
        } else {
            gain
        };
        apply_minimal_gain(ratio, self.minimal_gain)
    }
}

/// Reduction in Gini impurity.
#[derive(Clone, Debug)]
pub struct GiniIndexCriterion {
    minimal_gain: f64,
}

impl GiniIndexCriterion {
    pub fn new(minimal_gain: f64) -> Self {
        Self { minimal_gain }
    }
}

impl Criterion for GiniIndexCriterion {
    fn benefit(&self, weight_counts: &[Vec<f64>]) -> f64 {
        let partitions = partition_weights(weight_counts);
        let total: f64 = partitions.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        let label_gini = gini_index(&label_weights(weight_counts), total);
        let split_gini: f64 = weight_counts
            .iter()
            .zip(&partitions)
            .map(|(counts, &weight)| weight / total * gini_index(counts, weight))
            .sum();
        apply_minimal_gain(label_gini - split_gini, self.minimal_gain)
    }
}

/// Training accuracy obtained by predicting the majority label of each
/// partition.
#[derive(Clone, Debug)]
pub struct AccuracyCriterion {
    minimal_gain: f64,
}

impl AccuracyCriterion {
    pub fn new(minimal_gain: f64) -> Self {
        Self { minimal_gain }
    }
}

impl Criterion for AccuracyCriterion {
    fn benefit(&self, weight_counts: &[Vec<f64>]) -> f64 {
        let total: f64 = partition_weights(weight_counts).iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        let correct: f64 = weight_counts
            .iter()
            .map(|counts| counts.iter().copied().fold(0.0, f64::max))
            .sum();
        apply_minimal_gain(correct / total, self.minimal_gain)
    }
}

/// Selection key for the available criteria.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CriterionKind {
    GainRatio,
    InformationGain,
    GiniIndex,
    Accuracy,
}

impl CriterionKind {
    pub const NAMES: [&'static str; 4] =
        ["gain_ratio", "information_gain", "gini_index", "accuracy"];

    pub fn name(&self) -> &'static str {
        match self {
            CriterionKind::GainRatio => Self::NAMES[0],
            CriterionKind::InformationGain => Self::NAMES[1],
            CriterionKind::GiniIndex => Self::NAMES[2],
            CriterionKind::Accuracy => Self::NAMES[3],
        }
    }

    pub fn create(&self, minimal_gain: f64) -> Arc<dyn Criterion> {
        match self {
            CriterionKind::GainRatio => Arc::new(GainRatioCriterion::new(minimal_gain)),
            CriterionKind::InformationGain => Arc::new(InfoGainCriterion::new(minimal_gain)),
            CriterionKind::GiniIndex => Arc::new(GiniIndexCriterion::new(minimal_gain)),
            CriterionKind::Accuracy => Arc::new(AccuracyCriterion::new(minimal_gain)),
        }
    }
}

impl FromStr for CriterionKind {
    type Err = TreeError;

    fn from_str(key: &str) -> Result<Self> {
        match key {
            "gain_ratio" => Ok(CriterionKind::GainRatio),
            "information_gain" => Ok(CriterionKind::InformationGain),
            "gini_index" => Ok(CriterionKind::GiniIndex),
            "accuracy" => Ok(CriterionKind::Accuracy),
            _ => Err(TreeError::UnknownCriterion {
                key: key.to_string(),
            }),
        }
    }
}

/// Resolves a criterion selection key.
pub fn create_criterion(key: &str, minimal_gain: f64) -> Result<Arc<dyn Criterion>> {
    Ok(key.parse::<CriterionKind>()?.create(minimal_gain))
}
