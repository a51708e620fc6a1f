//! Property-based tests for traversal and publication guarantees

mod isolation;
mod traversal;
