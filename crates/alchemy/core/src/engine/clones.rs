//! Finalization and clone propagation.

use crate::classify::CloneGroups;
use crate::ingredient::Ingredient;

/// Collects finished ingredients and copies their effects onto clones.
pub(crate) struct Finisher<S> {
    clones: CloneGroups<S>,
    output: Vec<Ingredient<S>>,
    propagated: usize,
}

impl<S> Finisher<S> {
    /// `output` starts with the ingredients that bypass the engine.
    pub(crate) fn new(clones: CloneGroups<S>, output: Vec<Ingredient<S>>) -> Self {
        Self {
            clones,
            output,
            propagated: 0,
        }
    }

    /// Moves `ingredient` to the output, followed by each of its clones
    /// carrying an identical copy of its effect set.
    pub(crate) fn finalize(&mut self, ingredient: Ingredient<S>) {
        let clones = self.clones.take(&ingredient.identity());
        for mut clone in clones {
            tracing::trace!(
                record = %clone.record_id,
                source = %ingredient.record_id,
                "Propagating effects to clone"
            );
            clone.effects = ingredient.effects.clone();
            self.output.push(clone);
            self.propagated += 1;
        }
        self.output.push(ingredient);
    }

    pub(crate) fn finalized(&self) -> usize {
        self.output.len()
    }

    /// Hands back the output along with the clone groups that were never
    /// claimed and the number of clones that received effects.
    pub(crate) fn finish(self) -> (Vec<Ingredient<S>>, CloneGroups<S>, usize) {
        (self.output, self.clones, self.propagated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ClassifyOptions, classify};
    use crate::effect::{Effect, EffectSet};
    use crate::ingredient::Descriptor;

    fn ingredient(id: &str, name: &str, kinds: &[&str]) -> Ingredient {
        let mut effects = EffectSet::new();
        for kind in kinds {
            effects.insert(Effect::new(*kind));
        }
        let descriptor = Descriptor {
            name: Some(name.to_string()),
            ..Descriptor::default()
        };
        Ingredient::new(id, descriptor, effects, ())
    }

    #[test]
    fn clones_receive_the_representatives_effects() {
        let classified = classify(
            vec![
                ingredient("ingred_dreugh_wax", "Dreugh Wax", &["A", "B"]),
                ingredient("ingred_dreugh_wax_cursed", "Dreugh Wax", &["A", "B"]),
                ingredient("ingred_dreugh_wax_unique", "Dreugh Wax", &["A", "B"]),
            ],
            ClassifyOptions::default(),
        );
        let mut keep = classified.keep;
        let mut finisher = Finisher::new(classified.clones, classified.skip);

        let mut representative = keep.pop().unwrap();
        representative.effects = EffectSet::new();
        representative.effects.insert(Effect::new("C"));
        representative.effects.insert(Effect::new("D"));
        finisher.finalize(representative);

        let (output, leftover, propagated) = finisher.finish();
        assert!(leftover.is_empty());
        assert_eq!(propagated, 2);
        assert_eq!(output.len(), 3);
        for ingredient in &output {
            assert_eq!(
                ingredient.effects.as_slice(),
                &[Effect::new("C"), Effect::new("D")]
            );
        }
    }

    #[test]
    fn finalizing_without_clones_only_moves_the_ingredient() {
        let classified = classify(
            vec![ingredient("ingred_moss", "Moss", &["A"])],
            ClassifyOptions::default(),
        );
        let mut finisher = Finisher::new(classified.clones, Vec::new());
        for ingredient in classified.keep {
            finisher.finalize(ingredient);
        }
        assert_eq!(finisher.finalized(), 1);
        let (_, leftover, propagated) = finisher.finish();
        assert!(leftover.is_empty());
        assert_eq!(propagated, 0);
    }
}
