//! Recursive partitioning.
//!
//! [`TreeBuilder::split_node`] performs all the work for a single node and
//! returns the descriptors of the children it created. [`TreeBuilder`] drives
//! it with native recursion and computes benefits on the rayon pool;
//! [`NonParallelTreeBuilder`](crate::trees::non_parallel::NonParallelTreeBuilder)
//! drives the same function from an explicit stack.

use crate::data::dataset::Dataset;
use crate::data::example_set::ExampleSet;
use crate::error::{Result, TreeError};
use crate::trees::benefit::Benefit;
use crate::trees::condition::SplitCondition;
use crate::trees::criterion::Criterion;
use crate::trees::leaf::{DecisionTreeLeafCreator, LeafCreator};
use crate::trees::node::Tree;
use crate::trees::preprocessing::SplitPreprocessing;
use crate::trees::pruner::Pruner;
use crate::trees::splitter::NumericalSplitter;
use crate::trees::termination::{MinSizeTermination, Terminator};
use rayon::prelude::*;
use std::sync::Arc;

/// A node waiting to be split: where it sits in the tree, the examples that
/// reached it (with the attributes still available to it) and its depth.
#[derive(Clone, Debug)]
pub struct NodeData {
    path: Vec<usize>,
    examples: ExampleSet,
    depth: usize,
}

impl NodeData {
    pub fn new(path: Vec<usize>, examples: ExampleSet, depth: usize) -> Self {
        Self {
            path,
            examples,
            depth,
        }
    }

    pub fn examples(&self) -> &ExampleSet {
        &self.examples
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Grows a decision tree from a labelled dataset.
#[derive(Debug)]
pub struct TreeBuilder {
    criterion: Arc<dyn Criterion>,
    splitter: NumericalSplitter,
    min_leaf_size_terminator: MinSizeTermination,
    other_terminators: Vec<Box<dyn Terminator>>,
    min_size_for_split: usize,
    pruner: Option<Box<dyn Pruner>>,
    preprocessing: Option<Box<dyn SplitPreprocessing>>,
    leaf_creator: Box<dyn LeafCreator>,
    number_of_prepruning_alternatives: usize,
    use_pre_pruning: bool,
    parallel_benefits: bool,
    keep_training_sets: bool,
}

impl TreeBuilder {
    /// Builder with pre-pruning enabled, no alternatives, minimal split size
    /// 2, minimal leaf size 1, no pruner and no preprocessing.
    pub fn new(criterion: Arc<dyn Criterion>) -> Self {
        Self {
            splitter: NumericalSplitter::new(Arc::clone(&criterion)),
            criterion,
            min_leaf_size_terminator: MinSizeTermination::new(1),
            other_terminators: Vec::new(),
            min_size_for_split: 2,
            pruner: None,
            preprocessing: None,
            leaf_creator: Box::new(DecisionTreeLeafCreator),
            number_of_prepruning_alternatives: 0,
            use_pre_pruning: true,
            parallel_benefits: true,
            keep_training_sets: true,
        }
    }

    pub fn with_terminator(mut self, terminator: impl Terminator + 'static) -> Self {
        self.other_terminators.push(Box::new(terminator));
        self
    }

    pub fn with_pruner(mut self, pruner: impl Pruner + 'static) -> Self {
        self.pruner = Some(Box::new(pruner));
        self
    }

    pub fn with_preprocessing(mut self, preprocessing: impl SplitPreprocessing + 'static) -> Self {
        self.preprocessing = Some(Box::new(preprocessing));
        self
    }

    pub fn with_leaf_creator(mut self, leaf_creator: impl LeafCreator + 'static) -> Self {
        self.leaf_creator = Box::new(leaf_creator);
        self
    }

    pub fn with_pre_pruning(mut self, use_pre_pruning: bool) -> Self {
        self.use_pre_pruning = use_pre_pruning;
        self
    }

    pub fn with_prepruning_alternatives(mut self, alternatives: usize) -> Self {
        self.number_of_prepruning_alternatives = alternatives;
        self
    }

    pub fn with_min_size_for_split(mut self, min_size_for_split: usize) -> Self {
        self.min_size_for_split = min_size_for_split;
        self
    }

    pub fn with_min_leaf_size(mut self, min_leaf_size: usize) -> Self {
        self.min_leaf_size_terminator = MinSizeTermination::new(min_leaf_size);
        self
    }

    /// Whether the recursive driver fans benefit computation out to rayon.
    pub fn with_parallel_benefits(mut self, parallel: bool) -> Self {
        self.parallel_benefits = parallel;
        self
    }

    /// Whether nodes keep the example subset they were grown from.
    pub fn with_training_sets(mut self, keep: bool) -> Self {
        self.keep_training_sets = keep;
        self
    }

    pub fn criterion(&self) -> &Arc<dyn Criterion> {
        &self.criterion
    }

    /// Grows, prunes and returns the tree for `dataset`, recursing on the call
    /// stack.
    pub fn learn_tree(&self, dataset: &Dataset) -> Result<Tree> {
        self.learn_with(dataset, |root, node_data| self.build_tree(root, node_data))
    }

    /// Shared frame of both drivers: validates the label, creates the root,
    /// hands it to `grow` unless the root must stop right away, then prunes.
    pub(crate) fn learn_with<F>(&self, dataset: &Dataset, grow: F) -> Result<Tree>
    where
        F: FnOnce(&mut Tree, NodeData) -> Result<()>,
    {
        let missing = dataset.missing_label_count();
        if missing > 0 {
            return Err(TreeError::MissingLabelValues {
                attribute: dataset.label().name().to_string(),
                count: missing,
            });
        }

        if dataset.attributes().is_empty() {
            log::warn!("dataset has no regular attributes, the tree will be a single leaf");
        }

        let examples = ExampleSet::new(Arc::new(dataset.clone()));
        let mut root = Tree::from_examples(examples.clone());
        if self.should_stop(&examples, 0) {
            self.leaf_creator.change_tree_to_leaf(&mut root, &examples);
        } else {
            grow(&mut root, NodeData::new(Vec::new(), examples, 1))?;
        }

        if let Some(pruner) = &self.pruner {
            pruner.prune(&mut root);
        }
        if !self.keep_training_sets {
            root.clear_training_sets();
        }

        log::info!(
            "learned tree on {} examples: {} nodes, {} leaves, depth {}",
            dataset.nrows(),
            root.node_count(),
            root.leaf_count(),
            root.depth()
        );
        Ok(root)
    }

    fn build_tree(&self, root: &mut Tree, node_data: NodeData) -> Result<()> {
        for child in self.split_node(root, &node_data, self.parallel_benefits)? {
            self.build_tree(root, child)?;
        }
        Ok(())
    }

    /// Benefit of splitting `examples` on `attribute`, or `None` for a
    /// numerical attribute without a legal threshold.
    pub fn calculate_benefit(&self, examples: &ExampleSet, attribute: usize) -> Option<Benefit> {
        if examples.attribute(attribute).is_nominal() {
            let benefit = self.criterion.nominal_benefit(examples, attribute);
            Some(Benefit::nominal(benefit, attribute))
        } else {
            let split_value = self.splitter.best_split(examples, attribute);
            if split_value.is_nan() {
                return None;
            }
            let benefit = self
                .criterion
                .numerical_benefit(examples, attribute, split_value);
            Some(Benefit::numerical(benefit, attribute, split_value))
        }
    }

    /// Benefits of all attributes of `examples`, best first.
    pub fn calculate_all_benefits(&self, examples: &ExampleSet, parallel: bool) -> Vec<Benefit> {
        let mut benefits: Vec<Benefit> = if parallel {
            examples
                .attributes()
                .par_iter()
                .filter_map(|&attribute| self.calculate_benefit(examples, attribute))
                .collect()
        } else {
            examples
                .attributes()
                .iter()
                .filter_map(|&attribute| self.calculate_benefit(examples, attribute))
                .collect()
        };
        benefits.sort();
        for benefit in &benefits {
            log::trace!("{}", benefit);
        }
        benefits
    }

    pub fn should_stop(&self, examples: &ExampleSet, depth: usize) -> bool {
        if self.use_pre_pruning && examples.size() < self.min_size_for_split {
            return true;
        }
        self.min_leaf_size_terminator.should_stop(examples, depth)
            || self
                .other_terminators
                .iter()
                .any(|terminator| terminator.should_stop(examples, depth))
    }

    /// Splits the node at `node_data.path` below `root`, or turns it into a
    /// leaf. Returns the descriptors of the created children in child order.
    pub fn split_node(
        &self,
        root: &mut Tree,
        node_data: &NodeData,
        parallel: bool,
    ) -> Result<Vec<NodeData>> {
        let node = root
            .node_at_mut(&node_data.path)
            .ok_or_else(|| TreeError::Internal {
                message: format!("no node at path {:?}", node_data.path),
            })?;
        let examples = &node_data.examples;
        let depth = node_data.depth;

        if self.should_stop(examples, depth) {
            self.leaf_creator.change_tree_to_leaf(node, examples);
            return Ok(Vec::new());
        }

        let benefits = match &self.preprocessing {
            Some(preprocessing) => {
                self.calculate_all_benefits(&preprocessing.preprocess(examples), parallel)
            }
            None => self.calculate_all_benefits(examples, parallel),
        };
        let mut benefits = benefits.into_iter();

        // a benefit rejected for a non-positive score still uses up one try
        for _ in 0..=self.number_of_prepruning_alternatives {
            let Some(best) = benefits.next() else {
                break;
            };

            if self.use_pre_pruning && best.benefit() <= 0.0 {
                log::debug!("depth {}: rejected {} (no gain)", depth, best);
                continue;
            }

            let mut children: Vec<(SplitCondition, ExampleSet)> = partition(examples, &best)
                .into_iter()
                .filter(|(_, subset)| !subset.is_empty())
                .collect();

            // a split must separate the examples
            if children.len() < 2 {
                log::debug!("depth {}: rejected {} (single subset)", depth, best);
                continue;
            }

            if self.use_pre_pruning
                && children
                    .iter()
                    .any(|(_, subset)| self.min_leaf_size_terminator.should_stop(subset, depth))
            {
                log::debug!(
                    "depth {}: rejected {} (leaf smaller than {})",
                    depth,
                    best,
                    self.min_leaf_size_terminator.min_size()
                );
                continue;
            }

            log::debug!(
                "depth {}: splitting {} examples on '{}'",
                depth,
                examples.size(),
                examples.attribute(best.attribute()).name()
            );

            children.sort_by(|a, b| a.0.cmp(&b.0));

            let mut created = Vec::with_capacity(children.len());
            for (index, (condition, subset)) in children.into_iter().enumerate() {
                let subset = if condition.is_nominal() {
                    subset.without_attribute(best.attribute())
                } else {
                    subset
                };
                node.add_child(Tree::from_examples(subset.clone()), condition);

                let mut path = node_data.path.clone();
                path.push(index);
                created.push(NodeData::new(path, subset, depth + 1));
            }
            return Ok(created);
        }

        self.leaf_creator.change_tree_to_leaf(node, examples);
        Ok(Vec::new())
    }
}

/// Subsets of `examples` produced by the split `benefit` describes, each with
/// the condition on its edge.
fn partition(examples: &ExampleSet, benefit: &Benefit) -> Vec<(SplitCondition, ExampleSet)> {
    let attribute = benefit.attribute();
    let name = examples.attribute(attribute).name().to_string();

    match benefit.split_value() {
        None => examples
            .split_by_attribute(attribute)
            .into_iter()
            .map(|(value, subset)| {
                let condition = SplitCondition::Nominal {
                    attribute,
                    name: name.clone(),
                    value,
                };
                (condition, subset)
            })
            .collect(),
        Some(threshold) => {
            let (left, right) = examples.split_by_threshold(attribute, threshold);
            vec![
                (
                    SplitCondition::LessEquals {
                        attribute,
                        name: name.clone(),
                        threshold,
                    },
                    left,
                ),
                (
                    SplitCondition::Greater {
                        attribute,
                        name,
                        threshold,
                    },
                    right,
                ),
            ]
        }
    }
}
