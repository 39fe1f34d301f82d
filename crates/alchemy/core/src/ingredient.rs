//! Ingredient records as seen by the engine.

use core::fmt;

use sha2::{Digest, Sha256};

use crate::effect::{Effect, EffectSet};

/// Descriptive fields of an ingredient record.
///
/// These never change during a shuffle. Two records with identical
/// descriptors are clones (usually a cursed copy of a regular item) and must
/// end up with identical effects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Descriptor {
    pub name: Option<String>,
    pub model: Option<String>,
    pub icon: Option<String>,
    pub weight: Option<String>,
    pub value: Option<String>,
}

impl Descriptor {
    /// Names of the descriptor fields that are absent.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter_map(|(label, field)| field.is_none().then_some(label))
            .collect()
    }

    /// Stable identity key computed over every field.
    ///
    /// Absent fields hash differently from empty ones.
    pub fn identity(&self) -> IdentityKey {
        let mut hasher = Sha256::new();
        for (label, field) in self.fields() {
            hasher.update(label.as_bytes());
            match field {
                Some(text) => {
                    hasher.update([1u8]);
                    hasher.update((text.len() as u64).to_le_bytes());
                    hasher.update(text.as_bytes());
                }
                None => hasher.update([0u8]),
            }
        }
        IdentityKey(hasher.finalize().into())
    }

    fn fields(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("name", self.name.as_deref()),
            ("model", self.model.as_deref()),
            ("icon", self.icon.as_deref()),
            ("weight", self.weight.as_deref()),
            ("value", self.value.as_deref()),
        ]
    }
}

/// SHA-256 digest of a [`Descriptor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey(pub [u8; 32]);

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Eight bytes are plenty to tell groups apart in logs.
        f.write_str(&hex::encode(&self.0[..8]))
    }
}

/// An ingredient taking part in (or skipping) the shuffle.
///
/// `S` is an opaque payload owned by whoever loaded the record (for the
/// plugin YAML loader, the verbatim lines around the effects block). The
/// engine moves it along untouched.
#[derive(Clone, Debug)]
pub struct Ingredient<S = ()> {
    pub record_id: String,
    pub descriptor: Descriptor,
    pub effects: EffectSet,
    pub source: S,
    identity: IdentityKey,
}

impl<S> Ingredient<S> {
    pub fn new(
        record_id: impl Into<String>,
        descriptor: Descriptor,
        effects: EffectSet,
        source: S,
    ) -> Self {
        let identity = descriptor.identity();
        Self {
            record_id: record_id.into(),
            descriptor,
            effects,
            source,
            identity,
        }
    }

    pub fn identity(&self) -> IdentityKey {
        self.identity
    }

    /// True for a lone `RestoreFatigue`, the signature of plain food items.
    pub fn is_food_only(&self) -> bool {
        matches!(self.effects.as_slice(), [only] if only.kind == Effect::FOOD_KIND)
    }
}
