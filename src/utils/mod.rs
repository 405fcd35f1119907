//! Shared utilities: tag merging, CIDR helpers, configuration lints.

pub mod ip_utils;
pub mod tags;
pub mod validation;

pub use tags::{merge_tags, name_tags};
pub use validation::lint_network_spec;
