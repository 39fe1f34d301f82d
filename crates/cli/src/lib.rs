//! Command-line driver for the alchemy randomizer.
//!
//! Wires the `delta_plugin` tool, the YAML loader and writer from
//! `alchemy-content` and the shuffle engine from `alchemy-core` into one run.

pub mod commands;
pub mod config;
pub mod delta;
pub mod logging;

pub use commands::{Randomize, RunSummary};
pub use delta::DeltaPlugin;
