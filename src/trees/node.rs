use crate::data::example_set::{Example, ExampleSet};
use crate::trees::condition::SplitCondition;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Connection from a node to one of its children.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub child: Tree,
    pub condition: SplitCondition,
}

/// Decision tree node. Leaves carry the predicted label; every node carries
/// the label distribution of the training examples that reached it.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    label: Option<String>,
    children: Vec<Edge>,
    counter_map: BTreeMap<String, usize>,
    training_set: Option<ExampleSet>,
}

/// Structural equality; the retained training subsets are not compared.
impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
            && self.counter_map == other.counter_map
            && self.children == other.children
    }
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node bound to the examples reaching it, counts filled from their labels.
    pub fn from_examples(training_set: ExampleSet) -> Self {
        Self {
            label: None,
            children: Vec::new(),
            counter_map: training_set.label_counts(),
            training_set: Some(training_set),
        }
    }

    pub fn training_set(&self) -> Option<&ExampleSet> {
        self.training_set.as_ref()
    }

    /// Drops the retained training subsets of the whole subtree.
    pub fn clear_training_sets(&mut self) {
        self.training_set = None;
        for edge in &mut self.children {
            edge.child.clear_training_sets();
        }
    }

    pub fn add_count(&mut self, class_name: &str, count: usize) {
        self.counter_map.insert(class_name.to_string(), count);
    }

    pub fn count(&self, class_name: &str) -> usize {
        self.counter_map.get(class_name).copied().unwrap_or(0)
    }

    pub fn counter_map(&self) -> &BTreeMap<String, usize> {
        &self.counter_map
    }

    pub fn frequency_sum(&self) -> usize {
        self.counter_map.values().sum()
    }

    pub fn subtree_frequency_sum(&self) -> usize {
        if self.is_leaf() {
            self.frequency_sum()
        } else {
            self.children
                .iter()
                .map(|edge| edge.child.subtree_frequency_sum())
                .sum()
        }
    }

    /// Class counts summed over all leaves below this node.
    pub fn subtree_counter_map(&self) -> BTreeMap<String, usize> {
        let mut counter_map = BTreeMap::new();
        self.fill_subtree_counter_map(&mut counter_map);
        counter_map
    }

    fn fill_subtree_counter_map(&self, counter_map: &mut BTreeMap<String, usize>) {
        if self.is_leaf() {
            for (class_name, count) in &self.counter_map {
                *counter_map.entry(class_name.clone()).or_insert(0) += count;
            }
        } else {
            for edge in &self.children {
                edge.child.fill_subtree_counter_map(counter_map);
            }
        }
    }

    pub fn set_leaf(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Appends an edge, keeping children in [`SplitCondition`] order.
    pub fn add_child(&mut self, child: Tree, condition: SplitCondition) {
        self.children.push(Edge { child, condition });
        self.children.sort_by(|a, b| a.condition.cmp(&b.condition));
    }

    pub fn remove_children(&mut self) {
        self.children.clear();
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> &[Edge] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Edge] {
        &mut self.children
    }

    pub fn number_of_children(&self) -> usize {
        self.children.len()
    }

    /// Follows child indices from this node.
    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Tree> {
        let mut node = self;
        for &index in path {
            node = &mut node.children.get_mut(index)?.child;
        }
        Some(node)
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|edge| edge.child.node_count())
            .sum::<usize>()
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children
                .iter()
                .map(|edge| edge.child.leaf_count())
                .sum()
        }
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|edge| 1 + edge.child.depth())
            .max()
            .unwrap_or(0)
    }

    /// Label for `example`. When no edge matches (e.g. an unseen nominal
    /// value) the majority of the current subtree is returned.
    pub fn predict(&self, example: &Example<'_>) -> Option<String> {
        if self.is_leaf() {
            return self.label.clone();
        }
        match self
            .children
            .iter()
            .find(|edge| edge.condition.test(example))
        {
            Some(edge) => edge.child.predict(example),
            None => majority_label(&self.subtree_counter_map()),
        }
    }

    fn write_node(
        &self,
        condition: Option<&SplitCondition>,
        indent: &str,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        if let Some(condition) = condition {
            write!(f, "{}", condition)?;
        }
        if self.is_leaf() {
            write!(f, ": {} {{", self.label.as_deref().unwrap_or("?"))?;
            let counts: Vec<String> = self
                .counter_map
                .iter()
                .map(|(class_name, count)| format!("{}={}", class_name, count))
                .collect();
            write!(f, "{}}}", counts.join(", "))
        } else {
            let child_indent = format!("{}|   ", indent);
            for edge in &self.children {
                writeln!(f)?;
                write!(f, "{}", indent)?;
                edge.child
                    .write_node(Some(&edge.condition), &child_indent, f)?;
            }
            Ok(())
        }
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_node(None, "", f)
    }
}

/// Most frequent class; ties go to the lexicographically smallest name.
pub fn majority_label(counts: &BTreeMap<String, usize>) -> Option<String> {
    let mut best: Option<(&String, usize)> = None;
    for (class_name, &count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((class_name, count));
        }
    }
    best.map(|(class_name, _)| class_name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::Dataset;
    use std::sync::Arc;

    fn condition(value: &str) -> SplitCondition {
        SplitCondition::Nominal {
            attribute: 0,
            name: "x".to_string(),
            value: value.to_string(),
        }
    }

    fn leaf(label: &str, counts: &[(&str, usize)]) -> Tree {
        let mut tree = Tree::new();
        for (class_name, count) in counts {
            tree.add_count(class_name, *count);
        }
        tree.set_leaf(label);
        tree
    }

    #[test]
    fn test_counts() {
        let mut tree = Tree::new();
        tree.add_count("a", 3);
        tree.add_count("b", 2);
        tree.add_count("a", 4);
        assert_eq!(tree.count("a"), 4);
        assert_eq!(tree.count("c"), 0);
        assert_eq!(tree.frequency_sum(), 6);
    }

    #[test]
    fn test_from_examples_counts_labels() {
        let dataset = Dataset::builder()
            .numerical("x", &[1.0, 2.0, 3.0])
            .label("l", &["a", "b", "a"])
            .build()
            .unwrap();
        let tree = Tree::from_examples(ExampleSet::new(Arc::new(dataset)));
        assert_eq!(tree.count("a"), 2);
        assert_eq!(tree.count("b"), 1);
        assert!(tree.training_set().is_some());
        assert!(tree.is_leaf());
        assert_eq!(tree.label(), None);
    }

    #[test]
    fn test_children_sorted_and_subtree_sums() {
        let mut root = Tree::new();
        root.add_count("a", 3);
        root.add_count("b", 2);
        root.add_child(leaf("b", &[("b", 2)]), condition("q"));
        root.add_child(leaf("a", &[("a", 3)]), condition("p"));

        assert!(!root.is_leaf());
        assert_eq!(root.children()[0].condition.value_string(), "p");
        assert_eq!(root.subtree_frequency_sum(), 5);
        let counts = root.subtree_counter_map();
        assert_eq!(counts.get("a"), Some(&3));
        assert_eq!(counts.get("b"), Some(&2));
        assert_eq!(root.node_count(), 3);
        assert_eq!(root.leaf_count(), 2);
        assert_eq!(root.depth(), 1);

        root.remove_children();
        assert!(root.is_leaf());
    }

    #[test]
    fn test_node_at_mut() {
        let mut root = Tree::new();
        root.add_child(leaf("a", &[("a", 1)]), condition("p"));
        assert!(root.node_at_mut(&[0]).is_some());
        assert!(root.node_at_mut(&[1]).is_none());
        assert!(root.node_at_mut(&[0, 0]).is_none());
    }

    #[test]
    fn test_majority_label_ties() {
        let mut counts = BTreeMap::new();
        counts.insert("b".to_string(), 2);
        counts.insert("a".to_string(), 2);
        counts.insert("c".to_string(), 1);
        assert_eq!(majority_label(&counts), Some("a".to_string()));
        assert_eq!(majority_label(&BTreeMap::new()), None);
    }

    #[test]
    fn test_display() {
        let mut root = Tree::new();
        root.add_child(leaf("a", &[("a", 2)]), condition("p"));
        root.add_child(leaf("b", &[("b", 1), ("a", 1)]), condition("q"));
        assert_eq!(root.to_string(), "\nx = p: a {a=2}\nx = q: b {a=1, b=1}");
    }

    #[test]
    fn test_equality_ignores_training_sets() {
        let dataset = Dataset::builder()
            .numerical("x", &[1.0])
            .label("l", &["a"])
            .build()
            .unwrap();
        let mut with_set = Tree::from_examples(ExampleSet::new(Arc::new(dataset)));
        let mut without_set = leaf("a", &[("a", 1)]);
        with_set.set_leaf("a");
        assert_eq!(with_set, without_set);
        without_set.set_leaf("b");
        assert_ne!(with_set, without_set);
    }
}
