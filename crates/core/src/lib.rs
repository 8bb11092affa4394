//! Functional core for ugcbench.
//!
//! Everything in this crate is free of I/O: domain records, the derivation
//! of aggregate statistics, the storage and cache contracts, cache key shapes,
//! synthetic data generation and the timing types produced by benchmark cases.
//! Concrete backends and the orchestration live in the `ugcbench` crate.

pub mod bench;
pub mod cache;
pub mod domain;
pub mod generator;
pub mod storage;
