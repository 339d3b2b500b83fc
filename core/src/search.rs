mod clause_classifier;
mod cost_policy;
mod query;
mod search_policy;
mod statistics_collector;

pub use {clause_classifier::*, cost_policy::*, query::*, search_policy::*, statistics_collector::*};
