//! Error types for the redistribution engine.

use crate::effect::Effect;
use crate::error::{AlchemyError, ErrorSeverity};

/// Errors that abort a redistribution run.
///
/// Any of these means no output may be written: the ingredient list the
/// engine was working on is dropped.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShuffleError {
    /// The guaranteed-minimum phase found an ingredient the jar could not
    /// serve. The pool is too small or too uniform for `min_effects`.
    #[error(
        "cannot give ingredient '{record_id}' effect {round} of {min_effects}: \
         no compatible effect left in the jar"
    )]
    MinimumUnreachable {
        record_id: String,
        round: u8,
        min_effects: u8,
    },

    /// Effects remain but every ingredient is finalized.
    #[error(
        "no ingredient can accept more effects, but {instances} effect instances \
         remain in {} jar entries",
        remaining.len()
    )]
    Shortage {
        instances: usize,
        /// `(remaining uses, effect)` pairs left in the jar.
        remaining: Vec<(usize, Effect)>,
    },

    /// A counting invariant broke.
    #[error("conservation violated: expected {expected} {what}, found {actual}")]
    ConservationViolated {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl AlchemyError for ShuffleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MinimumUnreachable { .. } => ErrorSeverity::Validation,
            Self::Shortage { .. } => ErrorSeverity::Fatal,
            Self::ConservationViolated { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MinimumUnreachable { .. } => "shuffle.minimum_unreachable",
            Self::Shortage { .. } => "shuffle.shortage",
            Self::ConservationViolated { .. } => "shuffle.conservation_violated",
        }
    }
}
