//! Effect values and the per-ingredient effect set.

use core::fmt;

use arrayvec::ArrayVec;

use crate::config::ShuffleConfig;

/// A magic effect an ingredient can carry.
///
/// Effects are plain values: two effects are the same effect iff kind,
/// attribute and skill all match. The jar counts how many instances of a
/// value exist rather than tracking distinguishable objects.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Effect {
    pub kind: String,
    /// Attribute the effect targets (`FortifyAttribute` and friends).
    pub attribute: Option<String>,
    /// Skill the effect targets (`FortifySkill` and friends).
    pub skill: Option<String>,
}

impl Effect {
    /// Kind carried by food items that are not really alchemy ingredients.
    pub const FOOD_KIND: &'static str = "RestoreFatigue";

    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attribute: None,
            skill: None,
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    #[must_use]
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = Some(skill.into());
        self
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kind)?;
        if let Some(attribute) = &self.attribute {
            write!(f, " {attribute}")?;
        }
        if let Some(skill) = &self.skill {
            write!(f, " {skill}")?;
        }
        Ok(())
    }
}

/// Ordered, duplicate-free list of at most [`ShuffleConfig::MAX_EFFECTS`] effects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectSet(ArrayVec<Effect, { ShuffleConfig::MAX_EFFECTS }>);

impl EffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `effect` unless it is already present or the set is full.
    ///
    /// Returns `true` if the effect was added.
    pub fn insert(&mut self, effect: Effect) -> bool {
        if self.is_full() || self.contains(&effect) {
            return false;
        }
        self.0.push(effect);
        true
    }

    pub fn contains(&self, effect: &Effect) -> bool {
        self.0.contains(effect)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.0.is_full()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.0.iter()
    }

    /// Empties the set, handing back the effects it held.
    pub fn take(&mut self) -> impl Iterator<Item = Effect> + '_ {
        self.0.drain(..)
    }

    pub fn as_slice(&self) -> &[Effect] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a EffectSet {
    type Item = &'a Effect;
    type IntoIter = core::slice::Iter<'a, Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
