//! Replisync: Periodic One-Way Directory Mirroring
//!
//! Keeps a replica directory tree convergent with a source directory tree by
//! running full propagate-then-prune passes under a timed loop, emitting one
//! structured event per mutating action.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod logging;
pub mod mapping;
pub mod sink;
