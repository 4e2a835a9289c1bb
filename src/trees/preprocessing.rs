use crate::data::example_set::ExampleSet;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt::Debug;
use std::sync::{Mutex, PoisonError};

/// Transformation applied to a node's examples before the split search.
pub trait SplitPreprocessing: Debug + Send + Sync {
    fn preprocess(&self, examples: &ExampleSet) -> ExampleSet;
}

/// Restricts the split search to a random subset of the available
/// attributes, as done when growing the members of a random forest.
///
/// Without a ratio, `floor(log2(n)) + 1` of the `n` attributes are kept.
#[derive(Debug)]
pub struct RandomAttributeSubset {
    subset_ratio: Option<f64>,
    rng: Mutex<StdRng>,
}

impl RandomAttributeSubset {
    pub fn new(subset_ratio: Option<f64>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            subset_ratio,
            rng: Mutex::new(rng),
        }
    }

    fn subset_size(&self, available: usize) -> usize {
        let size = match self.subset_ratio {
            Some(ratio) => (ratio * available as f64).round() as usize,
            None => (available as f64).log2().floor() as usize + 1,
        };
        size.clamp(1, available)
    }
}

impl SplitPreprocessing for RandomAttributeSubset {
    fn preprocess(&self, examples: &ExampleSet) -> ExampleSet {
        let available = examples.attributes();
        if available.is_empty() {
            return examples.clone();
        }

        let size = self.subset_size(available.len());
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let mut selected: Vec<usize> = rand::seq::index::sample(&mut *rng, available.len(), size)
            .into_iter()
            .map(|i| available[i])
            .collect();
        selected.sort_unstable();

        examples.with_attributes(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::Dataset;
    use std::sync::Arc;

    fn examples(number_of_attributes: usize) -> ExampleSet {
        let mut builder = Dataset::builder();
        for i in 0..number_of_attributes {
            builder = builder.numerical(&format!("a{}", i), &[1.0, 2.0]);
        }
        let dataset = builder.label("l", &["x", "y"]).build().unwrap();
        ExampleSet::new(Arc::new(dataset))
    }

    #[test]
    fn test_default_subset_size() {
        let preprocessing = RandomAttributeSubset::new(None, Some(7));
        let subset = preprocessing.preprocess(&examples(8));
        assert_eq!(subset.attributes().len(), 4);
        assert_eq!(subset.size(), 2);
    }

    #[test]
    fn test_ratio_keeps_sorted_subset() {
        let preprocessing = RandomAttributeSubset::new(Some(0.5), Some(7));
        let subset = preprocessing.preprocess(&examples(6));
        let attributes = subset.attributes().to_vec();
        assert_eq!(attributes.len(), 3);
        assert!(attributes.windows(2).all(|w| w[0] < w[1]));
        assert!(attributes.iter().all(|&a| a < 6));
    }

    #[test]
    fn test_same_seed_same_subsets() {
        let set = examples(10);
        let first = RandomAttributeSubset::new(Some(0.3), Some(42));
        let second = RandomAttributeSubset::new(Some(0.3), Some(42));
        for _ in 0..5 {
            assert_eq!(
                first.preprocess(&set).attributes(),
                second.preprocess(&set).attributes()
            );
        }
    }

    #[test]
    fn test_no_attributes() {
        let preprocessing = RandomAttributeSubset::new(None, Some(1));
        let subset = preprocessing.preprocess(&examples(0));
        assert!(subset.attributes().is_empty());
    }
}
