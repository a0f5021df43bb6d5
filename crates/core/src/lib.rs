//! Core types and pure functions for the teamcal event source.
//!
//! Following the Functional Core pattern, nothing in this crate performs
//! I/O. The `storage` module only declares the document store contract;
//! implementations live in the `teamcal` crate.

pub mod calendar;
pub mod storage;
