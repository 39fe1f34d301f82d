//! The two assignment phases.

use rand::Rng;

use super::{Finisher, ShuffleEngine, ShuffleError, ShuffleStats, check};
use crate::ingredient::Ingredient;
use crate::jar::Jar;

impl<R: Rng + ?Sized> ShuffleEngine<'_, R> {
    /// Gives every ingredient `min_effects` effects, one per round.
    ///
    /// Each round drains the working set in random order. Returns the
    /// working set for the leftover phase.
    pub(super) fn guarantee_minimum<S>(
        &mut self,
        jar: &mut Jar,
        mut working: Vec<Ingredient<S>>,
        stats: &mut ShuffleStats,
    ) -> Result<Vec<Ingredient<S>>, ShuffleError> {
        let min_effects = self.config.min_effects();
        tracing::info!(
            "Assigning at least {} effect(s) to each ingredient, starting from most frequent ones...",
            min_effects
        );

        for round in 1..=min_effects {
            let mut processed = Vec::with_capacity(working.len());
            while !working.is_empty() {
                let index = self.rng.random_range(0..working.len());
                let mut ingredient = working.swap_remove(index);
                if !jar.assign(&mut ingredient.effects, &mut *self.rng) {
                    tracing::error!(
                        record = %ingredient.record_id,
                        round,
                        remaining = jar.remaining(),
                        "Jar cannot serve the guaranteed minimum"
                    );
                    return Err(ShuffleError::MinimumUnreachable {
                        record_id: ingredient.record_id,
                        round,
                        min_effects,
                    });
                }
                stats.guaranteed += 1;
                processed.push(ingredient);
            }
            working = processed;
            tracing::debug!(round, remaining = jar.remaining(), "Guaranteed round done");
        }

        check(
            "guaranteed effects",
            working.len() * usize::from(min_effects),
            stats.guaranteed,
        )?;
        tracing::info!(
            "Applied {} effects evenly onto {} ingredients",
            stats.guaranteed,
            working.len()
        );
        Ok(working)
    }

    /// Hands out whatever the guaranteed rounds left in the jar.
    ///
    /// Ingredients are finalized as soon as they are full or the jar holds
    /// nothing they can take; the rest are finalized once the jar is empty.
    pub(super) fn distribute_leftovers<S>(
        &mut self,
        jar: &mut Jar,
        mut working: Vec<Ingredient<S>>,
        finisher: &mut Finisher<S>,
        stats: &mut ShuffleStats,
    ) -> Result<(), ShuffleError> {
        tracing::info!("Redistributing remaining effects...");

        while !jar.is_empty() {
            if working.is_empty() {
                let remaining = jar.contents();
                tracing::error!(
                    "There are no more available ingredients, but still {} effects in {} buckets of the jar",
                    jar.remaining(),
                    jar.top()
                );
                for (uses, effect) in &remaining {
                    tracing::error!("{}: {}", uses, effect);
                }
                return Err(ShuffleError::Shortage {
                    instances: jar.remaining(),
                    remaining,
                });
            }

            let index = self.rng.random_range(0..working.len());
            let ingredient = &mut working[index];
            let assigned = jar.assign(&mut ingredient.effects, &mut *self.rng);
            if assigned {
                stats.leftovers += 1;
            }
            if !assigned || ingredient.effects.is_full() {
                finisher.finalize(working.swap_remove(index));
            }
        }

        tracing::debug!(
            unfinished = working.len(),
            finalized = finisher.finalized(),
            "Jar exhausted"
        );
        for ingredient in working {
            finisher.finalize(ingredient);
        }
        Ok(())
    }
}
