//! The frequency jar: every effect instance waiting to be handed out.
//!
//! Effects are bucketed by how many uses they have left. Bucket `n` holds
//! the effect values with exactly `n` remaining uses, so the jar holds
//! `sum(n * bucket[n].len())` instances in total. Drawing always starts at
//! the highest non-empty bucket, which spends the most over-represented
//! effects first and flattens the distribution as the shuffle goes on.
//!
//! Bucket 0 is never populated; it only keeps indices aligned with
//! remaining-use counts. Trailing empty buckets are popped so the top of the
//! `Vec` is always the highest count still in play.

use std::collections::BTreeMap;

use rand::Rng;

use crate::effect::{Effect, EffectSet};
use crate::ingredient::Ingredient;

/// What [`Jar::collect`] found while emptying the ingredients.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectReport {
    /// Effect occurrences taken from the ingredients.
    pub collected: usize,
    /// Distinct effect values among them.
    pub distinct: usize,
    /// A most frequent effect and its tally, if anything was collected.
    pub most_frequent: Option<(Effect, usize)>,
    /// Effects moved from bucket 1 to bucket 2 by loner folding.
    pub loners_folded: usize,
}

/// Effect instances bucketed by remaining uses.
#[derive(Clone, Debug, Default)]
pub struct Jar {
    buckets: Vec<Vec<Effect>>,
}

impl Jar {
    /// Builds a jar from explicit `(effect, remaining uses)` pairs.
    ///
    /// Pairs with zero uses are ignored. Mostly useful for tests and tools
    /// that already know the tallies.
    pub fn from_tallies(tallies: impl IntoIterator<Item = (Effect, usize)>) -> Self {
        let mut jar = Self::default();
        for (effect, uses) in tallies {
            if uses == 0 {
                continue;
            }
            jar.bucket_mut(uses).push(effect);
        }
        jar
    }

    /// Strips every effect off `ingredients` and tallies them into a jar.
    ///
    /// The ingredients come out with empty effect sets. With `no_loners`,
    /// effects seen on a single ingredient start with two uses instead of one
    /// so a second ingredient can receive them too.
    pub fn collect<S>(ingredients: &mut [Ingredient<S>], no_loners: bool) -> (Self, CollectReport) {
        let mut tallies: BTreeMap<Effect, usize> = BTreeMap::new();
        let mut collected = 0;
        for ingredient in ingredients.iter_mut() {
            for effect in ingredient.effects.take() {
                *tallies.entry(effect).or_default() += 1;
                collected += 1;
            }
        }

        let most_frequent = tallies
            .iter()
            .max_by_key(|(_, tally)| **tally)
            .map(|(effect, tally)| (effect.clone(), *tally));
        let distinct = tallies.len();

        let mut jar = Self::from_tallies(tallies);
        let loners_folded = if no_loners { jar.fold_loners() } else { 0 };

        let report = CollectReport {
            collected,
            distinct,
            most_frequent,
            loners_folded,
        };
        (jar, report)
    }

    /// Moves every single-use effect into the two-use bucket.
    ///
    /// Returns the number of effects moved.
    pub fn fold_loners(&mut self) -> usize {
        let loners = match self.buckets.get_mut(1) {
            Some(bucket) if !bucket.is_empty() => std::mem::take(bucket),
            _ => return 0,
        };
        let moved = loners.len();
        self.bucket_mut(2).extend(loners);
        moved
    }

    /// Gives `target` one effect it does not hold yet.
    ///
    /// Buckets are scanned from the highest remaining-use count down. Within
    /// a bucket, effects are drawn uniformly at random; effects the target
    /// already holds are set aside and put back once the draw settles. The
    /// assigned effect drops one bucket, or leaves the jar if it was on its
    /// last use.
    ///
    /// Returns `false` when no bucket holds a compatible effect (or the
    /// target is full). The jar content is unchanged in that case.
    pub fn assign<R: Rng + ?Sized>(&mut self, target: &mut EffectSet, rng: &mut R) -> bool {
        if target.is_full() {
            return false;
        }

        let mut assigned = false;
        for index in (1..self.buckets.len()).rev() {
            if self.buckets[index].is_empty() {
                continue;
            }

            let mut set_aside = Vec::new();
            let mut picked = None;
            let bucket = &mut self.buckets[index];
            while !bucket.is_empty() {
                let effect = bucket.swap_remove(rng.random_range(0..bucket.len()));
                if target.contains(&effect) {
                    set_aside.push(effect);
                } else {
                    picked = Some(effect);
                    break;
                }
            }
            bucket.append(&mut set_aside);

            if let Some(effect) = picked {
                if index >= 2 {
                    self.buckets[index - 1].push(effect.clone());
                }
                target.insert(effect);
                assigned = true;
                break;
            }
        }

        self.trim();
        assigned
    }

    /// Remaining effect instances (sum of uses over every bucket).
    pub fn remaining(&self) -> usize {
        self.buckets
            .iter()
            .enumerate()
            .map(|(uses, bucket)| uses * bucket.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Highest remaining-use count present, or 0 for an empty jar.
    pub fn top(&self) -> usize {
        self.buckets.len().saturating_sub(1)
    }

    /// Effects currently holding exactly `uses` remaining uses.
    pub fn bucket(&self, uses: usize) -> &[Effect] {
        self.buckets.get(uses).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every `(remaining uses, effect)` pair still in the jar, highest first.
    pub fn contents(&self) -> Vec<(usize, Effect)> {
        let mut pairs: Vec<_> = self
            .buckets
            .iter()
            .enumerate()
            .flat_map(|(uses, bucket)| bucket.iter().map(move |effect| (uses, effect.clone())))
            .collect();
        pairs.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        pairs
    }

    fn bucket_mut(&mut self, uses: usize) -> &mut Vec<Effect> {
        if self.buckets.len() <= uses {
            self.buckets.resize_with(uses + 1, Vec::new);
        }
        &mut self.buckets[uses]
    }

    fn trim(&mut self) {
        while self.buckets.last().is_some_and(Vec::is_empty) {
            self.buckets.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient::Descriptor;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn effects(kinds: &[&str]) -> EffectSet {
        let mut set = EffectSet::new();
        for kind in kinds {
            set.insert(Effect::new(*kind));
        }
        set
    }

    fn ingredient(id: &str, kinds: &[&str]) -> Ingredient {
        let descriptor = Descriptor {
            name: Some(id.to_string()),
            ..Descriptor::default()
        };
        Ingredient::new(id, descriptor, effects(kinds), ())
    }

    #[test]
    fn collect_tallies_and_clears() {
        let mut ingredients = vec![
            ingredient("a", &["A", "B", "C"]),
            ingredient("b", &["B", "C"]),
            ingredient("c", &["C"]),
        ];
        let (jar, report) = Jar::collect(&mut ingredients, false);

        assert!(ingredients.iter().all(|i| i.effects.is_empty()));
        assert_eq!(report.collected, 6);
        assert_eq!(report.distinct, 3);
        assert_eq!(report.most_frequent, Some((Effect::new("C"), 3)));
        assert_eq!(report.loners_folded, 0);

        assert!(jar.bucket(0).is_empty());
        assert_eq!(jar.bucket(1), &[Effect::new("A")]);
        assert_eq!(jar.bucket(2), &[Effect::new("B")]);
        assert_eq!(jar.bucket(3), &[Effect::new("C")]);
        assert_eq!(jar.remaining(), 6);
        assert_eq!(jar.top(), 3);
    }

    #[test]
    fn loners_move_to_second_bucket() {
        let mut ingredients = vec![ingredient("a", &["A", "B"]), ingredient("b", &["B"])];
        let (jar, report) = Jar::collect(&mut ingredients, true);

        assert_eq!(report.loners_folded, 1);
        assert!(jar.bucket(1).is_empty());
        let mut second: Vec<_> = jar.bucket(2).to_vec();
        second.sort();
        assert_eq!(second, vec![Effect::new("A"), Effect::new("B")]);
        assert_eq!(jar.remaining(), 4);
    }

    #[test]
    fn loner_folding_grows_a_single_bucket_jar() {
        let mut jar = Jar::from_tallies([(Effect::new("A"), 1)]);
        assert_eq!(jar.fold_loners(), 1);
        assert_eq!(jar.top(), 2);
        assert_eq!(jar.remaining(), 2);
    }

    #[test]
    fn assign_prefers_highest_bucket_and_decrements() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut jar = Jar::from_tallies([(Effect::new("A"), 1), (Effect::new("C"), 3)]);
        let mut target = EffectSet::new();

        assert!(jar.assign(&mut target, &mut rng));
        assert_eq!(target.as_slice(), &[Effect::new("C")]);
        assert_eq!(jar.bucket(2), &[Effect::new("C")]);
        assert!(jar.bucket(3).is_empty());
        assert_eq!(jar.top(), 2);
        assert_eq!(jar.remaining(), 3);
    }

    #[test]
    fn assign_skips_held_effects_without_losing_them() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut jar = Jar::from_tallies([
            (Effect::new("A"), 2),
            (Effect::new("B"), 2),
            (Effect::new("C"), 1),
        ]);
        let mut target = effects(&["A", "B"]);

        assert!(jar.assign(&mut target, &mut rng));
        assert!(target.contains(&Effect::new("C")));
        let mut second = jar.bucket(2).to_vec();
        second.sort();
        assert_eq!(second, vec![Effect::new("A"), Effect::new("B")]);
        assert!(jar.bucket(1).is_empty());
        assert_eq!(jar.remaining(), 4);
    }

    #[test]
    fn failed_assign_leaves_content_intact() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut jar = Jar::from_tallies([(Effect::new("A"), 2), (Effect::new("B"), 1)]);
        let before = jar.contents();
        let mut target = effects(&["A", "B"]);

        assert!(!jar.assign(&mut target, &mut rng));
        assert_eq!(jar.contents(), before);
        assert_eq!(target.len(), 2);
    }

    #[test]
    fn full_target_is_refused() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut jar = Jar::from_tallies([(Effect::new("E"), 1)]);
        let mut target = effects(&["A", "B", "C", "D"]);
        assert!(!jar.assign(&mut target, &mut rng));
        assert_eq!(jar.remaining(), 1);
    }

    #[test]
    fn last_use_empties_the_jar() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut jar = Jar::from_tallies([(Effect::new("A"), 1)]);
        let mut target = EffectSet::new();
        assert!(jar.assign(&mut target, &mut rng));
        assert!(jar.is_empty());
        assert_eq!(jar.top(), 0);
        assert!(jar.contents().is_empty());
    }

    #[test]
    fn every_assignment_spends_exactly_one_instance() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut jar = Jar::from_tallies([
            (Effect::new("A"), 4),
            (Effect::new("B"), 3),
            (Effect::new("C"), 2),
            (Effect::new("D"), 1),
        ]);
        let mut targets = vec![EffectSet::new(); 4];
        let mut remaining = jar.remaining();
        assert_eq!(remaining, 10);

        for i in (0..targets.len()).cycle().take(40) {
            let target = &mut targets[i];
            if jar.assign(target, &mut rng) {
                remaining -= 1;
            }
            assert_eq!(jar.remaining(), remaining);
        }
        assert!(jar.is_empty());
        assert_eq!(targets.iter().map(EffectSet::len).sum::<usize>(), 10);
    }
}
