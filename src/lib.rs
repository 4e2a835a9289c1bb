//! # Rusty-trees
//!
//! `rusty-trees` grows classification trees from labelled tabular data. Split
//! quality is measured by a pluggable criterion (gain ratio, information gain,
//! Gini index or accuracy), growth is bounded by pre-pruning rules and the
//! finished tree can be simplified by a post-pruning pass.
//!
//! ## Getting Started
//!
//! To use `rusty-trees`, add the following to your `Cargo.toml` file:
//!
//! ```toml
//! [dependencies]
//! rusty-trees = "*"
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use rusty_trees::data::dataset::Dataset;
//! use rusty_trees::trees::classifier::DecisionTreeClassifier;
//!
//! let dataset = Dataset::builder()
//!     .nominal("outlook", &["sunny", "sunny", "rain", "rain"])
//!     .numerical("humidity", &[90.0, 85.0, 60.0, 65.0])
//!     .label("play", &["no", "no", "yes", "yes"])
//!     .build()
//!     .unwrap();
//!
//! let mut model = DecisionTreeClassifier::new();
//! model.fit(&dataset).unwrap();
//!
//! let predictions = model.predict(&dataset).unwrap();
//! assert_eq!(predictions.len(), 4);
//! ```
//!
//! For direct control over growth use [`trees::builder::TreeBuilder`] (native
//! recursion, benefits computed in parallel) or
//! [`trees::non_parallel::NonParallelTreeBuilder`] (explicit work stack). Both
//! grow identical trees.

/// Datasets and example-set views
pub mod data;
/// Error type
pub mod error;
/// Decision tree induction
pub mod trees;
