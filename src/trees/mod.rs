pub mod benefit;
pub mod builder;
pub mod classifier;
pub mod condition;
pub mod criterion;
pub mod leaf;
pub mod node;
pub mod non_parallel;
pub mod params;
pub mod preprocessing;
pub mod pruner;
pub mod splitter;
pub mod termination;
