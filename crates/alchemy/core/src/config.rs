//! Shuffle configuration.

/// Errors raised while validating a [`ShuffleConfig`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "min_effects must be between {min} and {max} (got {value})",
        min = ShuffleConfig::MIN_GUARANTEED,
        max = ShuffleConfig::MAX_GUARANTEED
    )]
    MinEffectsOutOfRange { value: u8 },
}

/// Tunables for a single redistribution run.
///
/// Construct through [`ShuffleConfig::new`] so the guaranteed minimum is
/// validated; settings files deserialize into their own type first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShuffleConfig {
    /// Effects every redistributed ingredient is guaranteed to receive.
    min_effects: u8,
    /// Double the availability of effects present on only one ingredient.
    no_loners: bool,
}

impl ShuffleConfig {
    // ===== compile-time parameters =====
    /// Hard capacity of an ingredient's effect list.
    pub const MAX_EFFECTS: usize = 4;
    pub const MIN_GUARANTEED: u8 = 1;
    pub const MAX_GUARANTEED: u8 = 3;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MIN_EFFECTS: u8 = 1;

    pub fn new(min_effects: u8, no_loners: bool) -> Result<Self, ConfigError> {
        if !(Self::MIN_GUARANTEED..=Self::MAX_GUARANTEED).contains(&min_effects) {
            return Err(ConfigError::MinEffectsOutOfRange { value: min_effects });
        }
        Ok(Self {
            min_effects,
            no_loners,
        })
    }

    pub fn min_effects(&self) -> u8 {
        self.min_effects
    }

    pub fn no_loners(&self) -> bool {
        self.no_loners
    }
}

impl Default for ShuffleConfig {
    fn default() -> Self {
        Self {
            min_effects: Self::DEFAULT_MIN_EFFECTS,
            no_loners: false,
        }
    }
}
