//! Decision Tree Classifier
use crate::data::dataset::Dataset;
use crate::error::{Result, TreeError};
use crate::trees::builder::TreeBuilder;
use crate::trees::node::Tree;
use crate::trees::non_parallel::NonParallelTreeBuilder;
use crate::trees::params::TreeClassifierParams;
use crate::trees::preprocessing::RandomAttributeSubset;
use crate::trees::pruner::PessimisticPruner;
use crate::trees::termination::{
    MaxDepthTermination, NoAttributeLeftTermination, SingleLabelTermination,
};

/// Decision tree classifier for nominal labels.
#[derive(Clone, Debug, Default)]
pub struct DecisionTreeClassifier {
    root: Option<Tree>,
    tree_params: TreeClassifierParams,
}

impl DecisionTreeClassifier {
    /// Creates a new classifier with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new classifier from already validated parameters.
    pub fn with_params(tree_params: TreeClassifierParams) -> Self {
        Self {
            root: None,
            tree_params,
        }
    }

    pub fn params(&self) -> &TreeClassifierParams {
        &self.tree_params
    }

    pub fn params_mut(&mut self) -> &mut TreeClassifierParams {
        &mut self.tree_params
    }

    /// The learned tree, if [`fit`](Self::fit) has been called.
    pub fn root(&self) -> Option<&Tree> {
        self.root.as_ref()
    }

    /// Assembles the tree builder described by the parameters.
    pub fn tree_builder(&self) -> TreeBuilder {
        let params = &self.tree_params;
        let base = &params.base_params;

        let mut builder = TreeBuilder::new(params.criterion.create(params.minimal_gain))
            .with_terminator(SingleLabelTermination)
            .with_terminator(NoAttributeLeftTermination)
            .with_pre_pruning(base.pre_pruning)
            .with_prepruning_alternatives(base.number_of_prepruning_alternatives)
            .with_min_size_for_split(base.minimal_size_for_split)
            .with_min_leaf_size(base.minimal_leaf_size)
            .with_parallel_benefits(params.parallel)
            .with_training_sets(false);

        if let Some(max_depth) = base.maximal_depth {
            builder = builder.with_terminator(MaxDepthTermination::new(max_depth));
        }
        if params.pruning {
            builder = builder.with_pruner(PessimisticPruner::new(params.confidence));
        }
        if params.subset_ratio.is_some() {
            builder = builder
                .with_preprocessing(RandomAttributeSubset::new(params.subset_ratio, params.seed));
        }
        builder
    }

    /// Builds the decision tree from a dataset.
    ///
    /// # Errors
    ///
    /// Fails when the label attribute contains missing values.
    pub fn fit(&mut self, dataset: &Dataset) -> Result<()> {
        let builder = self.tree_builder();
        log::debug!(
            "fitting {} tree on {} examples ({})",
            self.tree_params.criterion.name(),
            dataset.nrows(),
            if self.tree_params.parallel {
                "recursive, parallel benefits"
            } else {
                "iterative"
            }
        );

        let root = if self.tree_params.parallel {
            builder.learn_tree(dataset)?
        } else {
            NonParallelTreeBuilder::new(builder).learn_tree(dataset)?
        };
        self.root = Some(root);
        Ok(())
    }

    /// Predicts one label per row of `dataset`, which must have the training
    /// attributes in the same order.
    pub fn predict(&self, dataset: &Dataset) -> Result<Vec<String>> {
        let root = self.root.as_ref().ok_or(TreeError::NotFitted)?;
        (0..dataset.nrows())
            .map(|row| {
                root.predict(&dataset.example(row))
                    .ok_or_else(|| TreeError::Internal {
                        message: format!("no label reachable for row {}", row),
                    })
            })
            .collect()
    }
}
