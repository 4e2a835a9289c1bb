use crate::error::{Result, TreeError};
use crate::trees::criterion::CriterionKind;

/// Size, depth and pre-pruning settings shared by tree learners.
#[derive(Clone, Debug)]
pub struct TreeParams {
    pub minimal_size_for_split: usize,
    pub minimal_leaf_size: usize,
    pub maximal_depth: Option<usize>,
    pub pre_pruning: bool,
    pub number_of_prepruning_alternatives: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeParams {
    pub fn new() -> Self {
        Self {
            minimal_size_for_split: 4,
            minimal_leaf_size: 2,
            maximal_depth: Some(20),
            pre_pruning: true,
            number_of_prepruning_alternatives: 3,
        }
    }

    pub fn set_minimal_size_for_split(&mut self, minimal_size_for_split: usize) -> Result<()> {
        if minimal_size_for_split < 1 {
            return Err(TreeError::invalid_parameter(
                "minimal_size_for_split",
                minimal_size_for_split,
                "must be at least 1",
            ));
        }
        self.minimal_size_for_split = minimal_size_for_split;
        Ok(())
    }

    pub fn set_minimal_leaf_size(&mut self, minimal_leaf_size: usize) -> Result<()> {
        if minimal_leaf_size < 1 {
            return Err(TreeError::invalid_parameter(
                "minimal_leaf_size",
                minimal_leaf_size,
                "must be at least 1",
            ));
        }
        self.minimal_leaf_size = minimal_leaf_size;
        Ok(())
    }

    /// `None` grows without a depth limit.
    pub fn set_maximal_depth(&mut self, maximal_depth: Option<usize>) -> Result<()> {
        if maximal_depth.is_some_and(|depth| depth < 1) {
            return Err(TreeError::invalid_parameter(
                "maximal_depth",
                0,
                "must be at least 1",
            ));
        }
        self.maximal_depth = maximal_depth;
        Ok(())
    }

    pub fn set_pre_pruning(&mut self, pre_pruning: bool) {
        self.pre_pruning = pre_pruning;
    }

    pub fn set_number_of_prepruning_alternatives(&mut self, alternatives: usize) {
        self.number_of_prepruning_alternatives = alternatives;
    }
}

/// Everything a [`DecisionTreeClassifier`](crate::trees::classifier::DecisionTreeClassifier)
/// is configured with.
#[derive(Clone, Debug)]
pub struct TreeClassifierParams {
    pub base_params: TreeParams,
    pub criterion: CriterionKind,
    pub minimal_gain: f64,
    pub pruning: bool,
    pub confidence: f64,
    pub parallel: bool,
    pub subset_ratio: Option<f64>,
    pub seed: Option<u64>,
}

impl Default for TreeClassifierParams {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeClassifierParams {
    pub fn new() -> Self {
        Self {
            base_params: TreeParams::new(),
            criterion: CriterionKind::GainRatio,
            minimal_gain: 0.1,
            pruning: true,
            confidence: 0.25,
            parallel: true,
            subset_ratio: None,
            seed: None,
        }
    }

    /// Selects the criterion by key: `gain_ratio`, `information_gain`,
    /// `gini_index` or `accuracy`.
    pub fn set_criterion(&mut self, criterion: &str) -> Result<()> {
        self.criterion = criterion.parse()?;
        Ok(())
    }

    pub fn set_minimal_gain(&mut self, minimal_gain: f64) -> Result<()> {
        if !(minimal_gain >= 0.0) {
            return Err(TreeError::invalid_parameter(
                "minimal_gain",
                minimal_gain,
                "must be non-negative",
            ));
        }
        self.minimal_gain = minimal_gain;
        Ok(())
    }

    pub fn set_confidence(&mut self, confidence: f64) -> Result<()> {
        if !(confidence > 0.0 && confidence <= 0.5) {
            return Err(TreeError::invalid_parameter(
                "confidence",
                confidence,
                "must be in (0, 0.5]",
            ));
        }
        self.confidence = confidence;
        Ok(())
    }

    pub fn set_subset_ratio(&mut self, subset_ratio: Option<f64>) -> Result<()> {
        if let Some(ratio) = subset_ratio {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(TreeError::invalid_parameter(
                    "subset_ratio",
                    ratio,
                    "must be in (0, 1]",
                ));
            }
        }
        self.subset_ratio = subset_ratio;
        Ok(())
    }

    pub fn set_pruning(&mut self, pruning: bool) {
        self.pruning = pruning;
    }

    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    pub fn set_minimal_size_for_split(&mut self, minimal_size_for_split: usize) -> Result<()> {
        self.base_params
            .set_minimal_size_for_split(minimal_size_for_split)
    }

    pub fn set_minimal_leaf_size(&mut self, minimal_leaf_size: usize) -> Result<()> {
        self.base_params.set_minimal_leaf_size(minimal_leaf_size)
    }

    pub fn set_maximal_depth(&mut self, maximal_depth: Option<usize>) -> Result<()> {
        self.base_params.set_maximal_depth(maximal_depth)
    }

    pub fn set_pre_pruning(&mut self, pre_pruning: bool) {
        self.base_params.set_pre_pruning(pre_pruning)
    }

    pub fn set_number_of_prepruning_alternatives(&mut self, alternatives: usize) {
        self.base_params
            .set_number_of_prepruning_alternatives(alternatives)
    }

    pub fn criterion(&self) -> CriterionKind {
        self.criterion
    }

    pub fn minimal_size_for_split(&self) -> usize {
        self.base_params.minimal_size_for_split
    }

    pub fn minimal_leaf_size(&self) -> usize {
        self.base_params.minimal_leaf_size
    }

    pub fn maximal_depth(&self) -> Option<usize> {
        self.base_params.maximal_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = TreeClassifierParams::default();
        assert_eq!(params.criterion(), CriterionKind::GainRatio);
        assert_eq!(params.minimal_size_for_split(), 4);
        assert_eq!(params.minimal_leaf_size(), 2);
        assert_eq!(params.maximal_depth(), Some(20));
        assert_eq!(params.base_params.number_of_prepruning_alternatives, 3);
        assert!(params.pruning);
        assert!(params.base_params.pre_pruning);
    }

    #[test]
    fn test_criterion_key() {
        let mut params = TreeClassifierParams::new();
        params.set_criterion("gini_index").unwrap();
        assert_eq!(params.criterion(), CriterionKind::GiniIndex);
        assert!(matches!(
            params.set_criterion("entropy"),
            Err(TreeError::UnknownCriterion { .. })
        ));
        assert_eq!(params.criterion(), CriterionKind::GiniIndex);
    }

    #[test]
    fn test_validation() {
        let mut params = TreeClassifierParams::new();
        assert!(params.set_minimal_leaf_size(0).is_err());
        assert!(params.set_minimal_size_for_split(0).is_err());
        assert!(params.set_maximal_depth(Some(0)).is_err());
        assert!(params.set_maximal_depth(None).is_ok());
        assert!(params.set_minimal_gain(-0.1).is_err());
        assert!(params.set_minimal_gain(f64::NAN).is_err());
        assert!(params.set_confidence(0.0).is_err());
        assert!(params.set_confidence(0.6).is_err());
        assert!(params.set_confidence(0.1).is_ok());
        assert!(params.set_subset_ratio(Some(1.5)).is_err());
        assert!(params.set_subset_ratio(Some(0.5)).is_ok());
    }
}
