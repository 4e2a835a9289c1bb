use crate::data::dataset::MISSING_VALUE;
use crate::data::example_set::Example;
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

/// Predicate attached to the edge between a node and one of its children.
#[derive(Clone, Debug)]
pub enum SplitCondition {
    /// Nominal attribute equals `value`; `?` matches missing values.
    Nominal {
        attribute: usize,
        name: String,
        value: String,
    },
    /// Numerical attribute is `<= threshold`.
    LessEquals {
        attribute: usize,
        name: String,
        threshold: f64,
    },
    /// Numerical attribute is not `<= threshold`, which includes missing values.
    Greater {
        attribute: usize,
        name: String,
        threshold: f64,
    },
}

impl SplitCondition {
    pub fn attribute(&self) -> usize {
        match self {
            SplitCondition::Nominal { attribute, .. }
            | SplitCondition::LessEquals { attribute, .. }
            | SplitCondition::Greater { attribute, .. } => *attribute,
        }
    }

    pub fn attribute_name(&self) -> &str {
        match self {
            SplitCondition::Nominal { name, .. }
            | SplitCondition::LessEquals { name, .. }
            | SplitCondition::Greater { name, .. } => name,
        }
    }

    pub fn relation(&self) -> &'static str {
        match self {
            SplitCondition::Nominal { .. } => "=",
            SplitCondition::LessEquals { .. } => "\u{2264}",
            SplitCondition::Greater { .. } => ">",
        }
    }

    pub fn value_string(&self) -> String {
        match self {
            SplitCondition::Nominal { value, .. } => value.clone(),
            SplitCondition::LessEquals { threshold, .. }
            | SplitCondition::Greater { threshold, .. } => format!("{}", threshold),
        }
    }

    pub fn is_nominal(&self) -> bool {
        matches!(self, SplitCondition::Nominal { .. })
    }

    pub fn test(&self, example: &Example<'_>) -> bool {
        match self {
            SplitCondition::Nominal {
                attribute, value, ..
            } => {
                if example.value(*attribute).is_nan() {
                    value == MISSING_VALUE
                } else {
                    example.value_as_string(*attribute) == *value
                }
            }
            SplitCondition::LessEquals {
                attribute,
                threshold,
                ..
            } => example.value(*attribute) <= *threshold,
            SplitCondition::Greater {
                attribute,
                threshold,
                ..
            } => !(example.value(*attribute) <= *threshold),
        }
    }

    fn relation_rank(&self) -> u8 {
        match self {
            SplitCondition::Nominal { .. } => 0,
            SplitCondition::LessEquals { .. } => 1,
            SplitCondition::Greater { .. } => 2,
        }
    }

    fn threshold(&self) -> f64 {
        match self {
            SplitCondition::Nominal { .. } => 0.0,
            SplitCondition::LessEquals { threshold, .. }
            | SplitCondition::Greater { threshold, .. } => *threshold,
        }
    }
}

impl Display for SplitCondition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.attribute_name(),
            self.relation(),
            self.value_string()
        )
    }
}

/// Children are kept in this order: attribute name, then `=` before `≤`
/// before `>`, then threshold, then nominal value.
impl Ord for SplitCondition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.attribute_name()
            .cmp(other.attribute_name())
            .then(self.relation_rank().cmp(&other.relation_rank()))
            .then(self.threshold().total_cmp(&other.threshold()))
            .then_with(|| match (self, other) {
                (
                    SplitCondition::Nominal { value: a, .. },
                    SplitCondition::Nominal { value: b, .. },
                ) => a.cmp(b),
                _ => Ordering::Equal,
            })
    }
}

impl PartialOrd for SplitCondition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SplitCondition {
    fn eq(&self, other: &Self) -> bool {
        self.attribute() == other.attribute() && self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SplitCondition {}
