pub mod assessment;
pub mod catalog;
pub mod config;
pub mod eligibility;
pub mod graph;
pub mod instruments;
pub mod normalize;
pub mod output;
pub mod rules;
pub mod snapshot;
pub mod submit;
