//! Shared test helpers for `wiss-core` integration tests.
//!
//! In-memory fakes for every core port plus small fixture builders, so the
//! tests can focus on behaviour instead of wiring.

#![allow(dead_code)]

pub mod fixtures;
pub mod repositories;
