//! Run settings shared by the settings file, the environment and the CLI.

use std::path::PathBuf;

use alchemy_core::{ClassifyOptions, ConfigError, ShuffleConfig};
use serde::{Deserialize, Serialize};

/// Partial run settings.
///
/// Every field is optional so layers can be stacked with [`Settings::overlay`];
/// unset fields fall back to the defaults in the accessors.
///
/// ```toml
/// min_effects = 2
/// no_loners = true
/// seed = 42
/// delta_plugin = "./delta_plugin"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub min_effects: Option<u8>,
    pub no_loners: Option<bool>,
    pub ignore_food: Option<bool>,
    pub print_clones: Option<bool>,
    pub seed: Option<u64>,
    pub delta_plugin: Option<PathBuf>,
}

impl Settings {
    pub const DEFAULT_DELTA_PLUGIN: &'static str = "./delta_plugin";

    /// Returns `self` with every field set in `other` replaced.
    #[must_use]
    pub fn overlay(self, other: Settings) -> Settings {
        Settings {
            min_effects: other.min_effects.or(self.min_effects),
            no_loners: other.no_loners.or(self.no_loners),
            ignore_food: other.ignore_food.or(self.ignore_food),
            print_clones: other.print_clones.or(self.print_clones),
            seed: other.seed.or(self.seed),
            delta_plugin: other.delta_plugin.or(self.delta_plugin),
        }
    }

    /// Validated engine configuration.
    pub fn shuffle_config(&self) -> Result<ShuffleConfig, ConfigError> {
        ShuffleConfig::new(
            self.min_effects.unwrap_or(ShuffleConfig::DEFAULT_MIN_EFFECTS),
            self.no_loners.unwrap_or(false),
        )
    }

    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            ignore_food: self.ignore_food.unwrap_or(false),
            print_clones: self.print_clones.unwrap_or(false),
        }
    }

    pub fn delta_plugin(&self) -> PathBuf {
        self.delta_plugin
            .clone()
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_DELTA_PLUGIN))
    }
}
