use crate::data::dataset::Dataset;
use crate::error::Result;
use crate::trees::builder::{NodeData, TreeBuilder};
use crate::trees::node::Tree;

/// Grows the same tree as [`TreeBuilder::learn_tree`] from an explicit LIFO
/// stack of pending nodes, computing benefits on the current thread.
#[derive(Debug)]
pub struct NonParallelTreeBuilder {
    builder: TreeBuilder,
}

impl NonParallelTreeBuilder {
    pub fn new(builder: TreeBuilder) -> Self {
        Self { builder }
    }

    pub fn builder(&self) -> &TreeBuilder {
        &self.builder
    }

    pub fn learn_tree(&self, dataset: &Dataset) -> Result<Tree> {
        self.builder
            .learn_with(dataset, |root, node_data| self.start_tree(root, node_data))
    }

    fn start_tree(&self, root: &mut Tree, node_data: NodeData) -> Result<()> {
        let mut stack = vec![node_data];
        while let Some(current) = stack.pop() {
            let children = self.builder.split_node(root, &current, false)?;
            // reversed so the first child is popped next, as in recursion
            stack.extend(children.into_iter().rev());
        }
        Ok(())
    }
}

impl From<TreeBuilder> for NonParallelTreeBuilder {
    fn from(builder: TreeBuilder) -> Self {
        Self::new(builder)
    }
}
