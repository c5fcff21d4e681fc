//! Custom field validators used by the resource inputs

pub mod rules;

pub use rules::{validate_not_blank, validate_slug};
