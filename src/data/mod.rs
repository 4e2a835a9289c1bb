pub mod dataset;
pub mod example_set;
