//! Error type shared by the dataset layer and the tree learners.

use std::io;
use thiserror::Error;

/// Errors raised while loading data, configuring a learner or growing a tree.
///
/// Growth itself never fails on well-formed input: attributes without a legal
/// split and exhausted pre-pruning alternatives both end in a leaf.
#[derive(Error, Debug)]
pub enum TreeError {
    /// The label attribute contains missing values
    #[error("Label attribute '{attribute}' contains {count} missing value(s)")]
    MissingLabelValues { attribute: String, count: usize },

    /// Unknown criterion selection key
    #[error("Unknown criterion '{key}', expected one of: gain_ratio, information_gain, gini_index, accuracy")]
    UnknownCriterion { key: String },

    /// Invalid learner parameter
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Malformed dataset
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// Prediction requested before fitting
    #[error("Tree wasn't built yet.")]
    NotFitted,

    /// Broken internal invariant
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// File I/O errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// CSV parsing errors
    #[error("CSV parsing error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },
}

impl TreeError {
    pub(crate) fn invalid_parameter(
        parameter: &str,
        value: impl ToString,
        reason: &str,
    ) -> Self {
        TreeError::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn dataset(message: impl Into<String>) -> Self {
        TreeError::Dataset {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TreeError>;
