//! Plugin data loaders and writers.
//!
//! This crate reads the YAML dump `delta_plugin convert` produces for a
//! plugin filtered down to ingredient records, turns every record into an
//! [`alchemy_core::Ingredient`] carrying its verbatim layout, and writes the
//! shuffled records back in the same shape. It also loads the optional TOML
//! settings file.
//!
//! Only the effects block of a record is owned by this crate; every other
//! line is preserved as read.

pub mod loaders;
pub mod settings;
pub mod writer;

pub use loaders::{ConfigLoader, PluginDocument, PluginLoader, RecordLayout};
pub use settings::Settings;
pub use writer::PluginWriter;
