//! Core traits and trait implementations for plain Rust storage.

pub mod traits;
pub mod wrappers;
