//! # Pipeline Module
//!
//! Batch orchestration split into submodules:
//! - `resolver`: fan-out/fan-in resolution of item handles into paths
//! - `runner`: strictly sequential per-file processing state machine
//! - `controller`: the public entry point tying state, resolver and runner
//!   together

pub mod controller;
pub mod resolver;
pub mod runner;

pub use controller::DropPipeline;
pub use resolver::{BatchResolver, ItemHandle, ResolvedFile};
pub use runner::SequentialRunner;
