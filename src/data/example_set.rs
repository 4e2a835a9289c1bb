use crate::data::dataset::{Attribute, Dataset, MISSING_VALUE};
use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// A single row of a [`Dataset`].
#[derive(Clone, Copy)]
pub struct Example<'a> {
    data: &'a Dataset,
    row: usize,
}

impl<'a> Example<'a> {
    pub fn new(data: &'a Dataset, row: usize) -> Self {
        Self { data, row }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn value(&self, attribute: usize) -> f64 {
        self.data.value(self.row, attribute)
    }

    pub fn value_as_string(&self, attribute: usize) -> String {
        self.data
            .attribute(attribute)
            .format_value(self.value(attribute))
    }

    pub fn label(&self) -> Option<&'a str> {
        let value = self.data.label_value(self.row);
        if value.is_nan() {
            return None;
        }
        self.data
            .label()
            .values()
            .get(value as usize)
            .map(String::as_str)
    }
}

/// A view on a shared [`Dataset`]: a subset of its rows together with the
/// attributes that are still available for splitting. Cloning copies only the
/// index lists.
#[derive(Clone)]
pub struct ExampleSet {
    data: Arc<Dataset>,
    rows: Vec<usize>,
    attributes: Vec<usize>,
}

impl Debug for ExampleSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExampleSet")
            .field("rows", &self.rows)
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl ExampleSet {
    /// View on all rows and attributes of `data`.
    pub fn new(data: Arc<Dataset>) -> Self {
        let rows = (0..data.nrows()).collect();
        let attributes = (0..data.attributes().len()).collect();
        Self {
            data,
            rows,
            attributes,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Indices (into the underlying dataset) of the attributes in this view.
    pub fn attributes(&self) -> &[usize] {
        &self.attributes
    }

    pub fn attribute(&self, index: usize) -> &Attribute {
        self.data.attribute(index)
    }

    pub fn label(&self) -> &Attribute {
        self.data.label()
    }

    pub fn value(&self, row: usize, attribute: usize) -> f64 {
        self.data.value(row, attribute)
    }

    pub fn examples(&self) -> impl Iterator<Item = Example<'_>> + '_ {
        self.rows.iter().map(|&row| Example::new(&self.data, row))
    }

    /// Counts of the labels present in this view.
    pub fn label_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for example in self.examples() {
            if let Some(label) = example.label() {
                *counts.entry(label.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn missing_label_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|&&row| self.data.label_value(row).is_nan())
            .count()
    }

    pub fn with_attributes(&self, attributes: Vec<usize>) -> Self {
        Self {
            data: Arc::clone(&self.data),
            rows: self.rows.clone(),
            attributes,
        }
    }

    pub fn without_attribute(&self, attribute: usize) -> Self {
        let attributes = self
            .attributes
            .iter()
            .copied()
            .filter(|&a| a != attribute)
            .collect();
        self.with_attributes(attributes)
    }

    pub fn select_rows(&self, rows: Vec<usize>) -> Self {
        Self {
            data: Arc::clone(&self.data),
            rows,
            attributes: self.attributes.clone(),
        }
    }

    /// Multiway partition on a nominal attribute: one subset per value that
    /// occurs, in value-mapping order, followed by a `?` subset when values
    /// are missing.
    pub fn split_by_attribute(&self, attribute: usize) -> Vec<(String, ExampleSet)> {
        let values = self.attribute(attribute).values();
        let mut partitions: Vec<Vec<usize>> = vec![Vec::new(); values.len()];
        let mut missing = Vec::new();

        for &row in &self.rows {
            let value = self.value(row, attribute);
            if value.is_nan() {
                missing.push(row);
            } else {
                partitions[value as usize].push(row);
            }
        }

        let mut subsets: Vec<(String, ExampleSet)> = partitions
            .into_iter()
            .enumerate()
            .filter(|(_, rows)| !rows.is_empty())
            .map(|(index, rows)| (values[index].clone(), self.select_rows(rows)))
            .collect();
        if !missing.is_empty() {
            subsets.push((MISSING_VALUE.to_string(), self.select_rows(missing)));
        }
        subsets
    }

    /// Binary partition at `threshold`: values `<= threshold` go left, all
    /// others (missing values included) go right.
    pub fn split_by_threshold(&self, attribute: usize, threshold: f64) -> (Self, Self) {
        let (left, right): (Vec<usize>, Vec<usize>) = self
            .rows
            .iter()
            .partition(|&&row| self.value(row, attribute) <= threshold);

        (self.select_rows(left), self.select_rows(right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_set() -> ExampleSet {
        let dataset = Dataset::builder()
            .nominal("color", &["red", "blue", "red", "?", "blue"])
            .numerical("size", &[1.0, 4.0, 2.0, 3.0, f64::NAN])
            .label("class", &["a", "b", "a", "b", "b"])
            .build()
            .unwrap();
        ExampleSet::new(Arc::new(dataset))
    }

    #[test]
    fn test_new_selects_everything() {
        let set = example_set();
        assert_eq!(set.size(), 5);
        assert_eq!(set.attributes(), &[0, 1]);
        assert_eq!(set.rows(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_label_counts() {
        let set = example_set();
        let counts = set.label_counts();
        assert_eq!(counts.get("a"), Some(&2));
        assert_eq!(counts.get("b"), Some(&3));
    }

    #[test]
    fn test_split_by_attribute() {
        let set = example_set();
        let subsets = set.split_by_attribute(0);

        let names: Vec<&str> = subsets.iter().map(|(v, _)| v.as_str()).collect();
        assert_eq!(names, vec!["red", "blue", "?"]);
        assert_eq!(subsets[0].1.rows(), &[0, 2]);
        assert_eq!(subsets[1].1.rows(), &[1, 4]);
        assert_eq!(subsets[2].1.rows(), &[3]);
    }

    #[test]
    fn test_split_by_threshold_sends_missing_right() {
        let set = example_set();
        let (left, right) = set.split_by_threshold(1, 2.5);
        assert_eq!(left.rows(), &[0, 2]);
        assert_eq!(right.rows(), &[1, 3, 4]);
    }

    #[test]
    fn test_split_by_threshold_left_empty() {
        let set = example_set();
        let (left, right) = set.split_by_threshold(1, -1.0);
        assert!(left.is_empty());
        assert_eq!(right.size(), 5);
    }

    #[test]
    fn test_without_attribute() {
        let set = example_set().without_attribute(0);
        assert_eq!(set.attributes(), &[1]);
        assert_eq!(set.size(), 5);
    }

    #[test]
    fn test_example_access() {
        let set = example_set();
        let example = set.examples().nth(3).unwrap();
        assert_eq!(example.row(), 3);
        assert_eq!(example.value_as_string(0), "?");
        assert_eq!(example.value_as_string(1), "3");
        assert_eq!(example.label(), Some("b"));
    }
}
