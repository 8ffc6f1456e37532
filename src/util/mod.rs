//! Utilities

pub mod strings;

pub use strings::{check_name, describe_schema, MAX_NAME_LENGTH};
