use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

/// Score of a candidate split on one attribute. Numerical attributes carry
/// the threshold of their binary split; nominal attributes split on every
/// value and carry none.
///
/// Benefits sort best first, ties going to the lower attribute index, so that
/// computing them on parallel workers and sorting afterwards selects the same
/// split as a sequential pass.
#[derive(Clone, Copy, Debug)]
pub struct Benefit {
    attribute: usize,
    benefit: f64,
    split_value: Option<f64>,
}

impl Benefit {
    pub fn nominal(benefit: f64, attribute: usize) -> Self {
        Self {
            attribute,
            benefit,
            split_value: None,
        }
    }

    pub fn numerical(benefit: f64, attribute: usize, split_value: f64) -> Self {
        Self {
            attribute,
            benefit,
            split_value: Some(split_value),
        }
    }

    pub fn attribute(&self) -> usize {
        self.attribute
    }

    pub fn benefit(&self) -> f64 {
        self.benefit
    }

    pub fn split_value(&self) -> Option<f64> {
        self.split_value
    }
}

impl Display for Benefit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Attribute number= {}, benefit = {}",
            self.attribute, self.benefit
        )?;
        if let Some(split_value) = self.split_value {
            write!(f, ", split = {}", split_value)?;
        }
        Ok(())
    }
}

impl Ord for Benefit {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .benefit
            .total_cmp(&self.benefit)
            .then(self.attribute.cmp(&other.attribute))
    }
}

impl PartialOrd for Benefit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Benefit {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Benefit {}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_sorts_descending_by_benefit() {
        let mut benefits = vec![
            Benefit::nominal(0.2, 0),
            Benefit::numerical(0.9, 1, 3.5),
            Benefit::nominal(0.5, 2),
        ];
        benefits.sort();
        let order: Vec<usize> = benefits.iter().map(Benefit::attribute).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_ties_broken_by_attribute_index() {
        let mut benefits = vec![
            Benefit::nominal(0.5, 3),
            Benefit::nominal(0.5, 1),
            Benefit::numerical(0.5, 2, 1.0),
        ];
        benefits.sort();
        let order: Vec<usize> = benefits.iter().map(Benefit::attribute).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let scores = [0.3, 0.7, 0.3, 0.0, 0.7, 0.1, 0.7, 0.3];
        let mut sequential: Vec<Benefit> = scores
            .iter()
            .enumerate()
            .map(|(i, &s)| Benefit::nominal(s, i))
            .collect();
        let mut parallel: Vec<Benefit> = scores
            .par_iter()
            .enumerate()
            .map(|(i, &s)| Benefit::nominal(s, i))
            .collect();
        parallel.reverse();
        sequential.sort();
        parallel.sort();
        let left: Vec<usize> = sequential.iter().map(Benefit::attribute).collect();
        let right: Vec<usize> = parallel.iter().map(Benefit::attribute).collect();
        assert_eq!(left, right);
        assert_eq!(left[0], 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Benefit::numerical(0.5, 2, 1.5).to_string(),
            "Attribute number= 2, benefit = 0.5, split = 1.5"
        );
        assert_eq!(
            Benefit::nominal(1.0, 0).to_string(),
            "Attribute number= 0, benefit = 1"
        );
    }
}
