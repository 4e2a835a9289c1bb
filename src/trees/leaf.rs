use crate::data::example_set::ExampleSet;
use crate::trees::node::{majority_label, Tree};
use std::fmt::Debug;

/// Turns a node that will not be split any further into a leaf.
pub trait LeafCreator: Debug + Send + Sync {
    fn change_tree_to_leaf(&self, node: &mut Tree, examples: &ExampleSet);
}

/// Stores the label distribution of `examples` and labels the leaf with its
/// majority class.
#[derive(Clone, Debug, Default)]
pub struct DecisionTreeLeafCreator;

impl LeafCreator for DecisionTreeLeafCreator {
    fn change_tree_to_leaf(&self, node: &mut Tree, examples: &ExampleSet) {
        let counts = examples.label_counts();
        for (class_name, &count) in &counts {
            node.add_count(class_name, count);
        }
        if let Some(label) = majority_label(&counts) {
            node.set_leaf(label);
        }
    }
}
