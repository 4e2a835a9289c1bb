use crate::data::example_set::ExampleSet;
use std::fmt::Debug;

/// Decides whether a node reached at `depth` becomes a leaf without searching
/// for a split. The root is checked at depth 0, its children at depth 1.
pub trait Terminator: Debug + Send + Sync {
    fn should_stop(&self, examples: &ExampleSet, depth: usize) -> bool;
}

/// Stops on subsets smaller than `min_size`.
#[derive(Clone, Debug)]
pub struct MinSizeTermination {
    min_size: usize,
}

impl MinSizeTermination {
    pub fn new(min_size: usize) -> Self {
        Self { min_size }
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }
}

impl Terminator for MinSizeTermination {
    fn should_stop(&self, examples: &ExampleSet, _depth: usize) -> bool {
        examples.size() < self.min_size
    }
}

/// Stops when every example carries the same label.
#[derive(Clone, Debug, Default)]
pub struct SingleLabelTermination;

impl Terminator for SingleLabelTermination {
    fn should_stop(&self, examples: &ExampleSet, _depth: usize) -> bool {
        examples.label_counts().len() <= 1
    }
}

/// Stops when no attribute is left to split on.
#[derive(Clone, Debug, Default)]
pub struct NoAttributeLeftTermination;

impl Terminator for NoAttributeLeftTermination {
    fn should_stop(&self, examples: &ExampleSet, _depth: usize) -> bool {
        examples.attributes().is_empty()
    }
}

/// Stops once `depth` reaches `max_depth`.
#[derive(Clone, Debug)]
pub struct MaxDepthTermination {
    max_depth: usize,
}

impl MaxDepthTermination {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Terminator for MaxDepthTermination {
    fn should_stop(&self, _examples: &ExampleSet, depth: usize) -> bool {
        depth >= self.max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::Dataset;
    use std::sync::Arc;

    fn examples(labels: &[&str]) -> ExampleSet {
        let values: Vec<f64> = (0..labels.len()).map(|i| i as f64).collect();
        let dataset = Dataset::builder()
            .numerical("x", &values)
            .label("l", labels)
            .build()
            .unwrap();
        ExampleSet::new(Arc::new(dataset))
    }

    #[test]
    fn test_min_size() {
        let set = examples(&["a", "b", "a"]);
        assert!(!MinSizeTermination::new(3).should_stop(&set, 0));
        assert!(MinSizeTermination::new(4).should_stop(&set, 0));
    }

    #[test]
    fn test_single_label() {
        assert!(SingleLabelTermination.should_stop(&examples(&["a", "a"]), 3));
        assert!(!SingleLabelTermination.should_stop(&examples(&["a", "b"]), 3));
    }

    #[test]
    fn test_no_attribute_left() {
        let set = examples(&["a", "b"]);
        assert!(!NoAttributeLeftTermination.should_stop(&set, 0));
        assert!(NoAttributeLeftTermination.should_stop(&set.without_attribute(0), 0));
    }

    #[test]
    fn test_max_depth() {
        let set = examples(&["a", "b"]);
        let terminator = MaxDepthTermination::new(2);
        assert!(!terminator.should_stop(&set, 1));
        assert!(terminator.should_stop(&set, 2));
    }
}
