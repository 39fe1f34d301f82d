//! Effect redistribution for alchemy ingredients.
//!
//! `alchemy-core` owns the rules of the shuffle: the effect value type, the
//! ingredient holder, the frequency jar and the two-phase engine that hands
//! every effect instance back out. It knows nothing about file formats; the
//! loaders in `alchemy-content` build [`Ingredient`] values and carry their
//! own layout data through the engine in the ingredient's source payload.
//!
//! All redistribution flows through [`engine::ShuffleEngine`].
pub mod classify;
pub mod config;
pub mod effect;
pub mod engine;
pub mod error;
pub mod ingredient;
pub mod jar;

pub use classify::{Classified, ClassifyOptions, CloneGroups, classify};
pub use config::{ConfigError, ShuffleConfig};
pub use effect::{Effect, EffectSet};
pub use engine::{Redistribution, ShuffleEngine, ShuffleError, ShuffleStats};
pub use error::{AlchemyError, ErrorSeverity};
pub use ingredient::{Descriptor, IdentityKey, Ingredient};
pub use jar::{CollectReport, Jar};
