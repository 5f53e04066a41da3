//! # amf-properties
//!
//! Property-based and table-driven tests for the quantified invariants
//! in spec.md §8. This crate has no runtime surface of its own; see
//! `tests/` for the actual property tests.
