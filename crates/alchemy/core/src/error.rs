//! Common error infrastructure for alchemy-core.
//!
//! Domain errors live next to the code that raises them ([`crate::ConfigError`]
//! in `config`, [`crate::ShuffleError`] in `engine`). This module holds the
//! shared classification used by callers to decide how to report them.

/// Severity level of an error.
///
/// - **Validation**: the configuration does not fit the input population;
///   change `min_effects`, the exclusion options or the input and run again
/// - **Fatal**: the pool cannot be absorbed by the ingredients at hand
/// - **Internal**: a conservation invariant broke; this is a bug
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    Validation,
    Fatal,
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Fatal => "fatal",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error indicates a bug rather than bad input.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for alchemy-core errors.
pub trait AlchemyError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant, used in logs and tests.
    fn error_code(&self) -> &'static str;
}

impl AlchemyError for crate::ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MinEffectsOutOfRange { .. } => "config.min_effects_out_of_range",
        }
    }
}
