//! One-time classification of loaded ingredients.
//!
//! Every ingredient lands in exactly one place:
//! - `skip`: no effects, or plain food when `ignore_food` is set; left as is
//! - `keep`: the first ingredient seen with a given identity key
//! - `clones`: later ingredients sharing a kept ingredient's identity key

use std::collections::BTreeMap;

use crate::ingredient::{IdentityKey, Ingredient};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Leave ingredients whose only effect is `RestoreFatigue` alone.
    pub ignore_food: bool,
    /// Log every detected clone at info level instead of debug.
    pub print_clones: bool,
}

/// Clones of kept ingredients, keyed by the representative's identity.
///
/// Every kept ingredient owns an entry (possibly empty). The engine pops the
/// entry when it finalizes the representative, so a fully processed run
/// leaves the map empty.
#[derive(Clone, Debug)]
pub struct CloneGroups<S> {
    groups: BTreeMap<IdentityKey, Vec<Ingredient<S>>>,
}

impl<S> Default for CloneGroups<S> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }
}

impl<S> CloneGroups<S> {
    pub fn contains(&self, key: &IdentityKey) -> bool {
        self.groups.contains_key(key)
    }

    /// Removes and returns the clones registered under `key`.
    pub fn take(&mut self, key: &IdentityKey) -> Vec<Ingredient<S>> {
        self.groups.remove(key).unwrap_or_default()
    }

    pub fn clone_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Number of registered representatives still awaiting finalization.
    pub fn pending(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups with at least one clone, as `(key, clone record ids)`.
    pub fn groups(&self) -> impl Iterator<Item = (&IdentityKey, Vec<&str>)> {
        self.groups
            .iter()
            .filter(|(_, clones)| !clones.is_empty())
            .map(|(key, clones)| (key, clones.iter().map(|c| c.record_id.as_str()).collect()))
    }
}

/// Result of [`classify`].
#[derive(Clone, Debug)]
pub struct Classified<S> {
    pub keep: Vec<Ingredient<S>>,
    pub clones: CloneGroups<S>,
    pub skip: Vec<Ingredient<S>>,
}

impl<S> Classified<S> {
    /// Ingredients across all three partitions.
    pub fn total(&self) -> usize {
        self.keep.len() + self.clones.clone_count() + self.skip.len()
    }
}

/// Splits `ingredients` into skip, keep and clone partitions.
///
/// Deterministic in input order: the first ingredient with a given identity
/// key becomes the representative.
pub fn classify<S>(
    ingredients: impl IntoIterator<Item = Ingredient<S>>,
    options: ClassifyOptions,
) -> Classified<S> {
    let mut keep = Vec::new();
    let mut skip = Vec::new();
    let mut clones = CloneGroups::default();

    for ingredient in ingredients {
        if ingredient.effects.is_empty() || (options.ignore_food && ingredient.is_food_only()) {
            skip.push(ingredient);
            continue;
        }

        let key = ingredient.identity();
        match clones.groups.get_mut(&key) {
            Some(group) => {
                if options.print_clones {
                    tracing::info!(record = %ingredient.record_id, key = %key, "Clone detected");
                } else {
                    tracing::debug!(record = %ingredient.record_id, key = %key, "Clone detected");
                }
                group.push(ingredient);
            }
            None => {
                clones.groups.insert(key, Vec::new());
                keep.push(ingredient);
            }
        }
    }

    Classified { keep, clones, skip }
}
