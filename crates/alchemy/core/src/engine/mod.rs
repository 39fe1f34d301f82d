//! The redistribution engine.
//!
//! [`ShuffleEngine::run`] takes classified ingredients and hands every effect
//! instance collected from the kept ones back out:
//!
//! 1. **Collect**: strip kept ingredients into a [`Jar`]
//! 2. **Guarantee**: `min_effects` rounds over the whole working set, one
//!    effect per ingredient per round; any miss aborts
//! 3. **Leftovers**: random ingredients draw until the jar is empty,
//!    finalizing those that fill up or find nothing compatible
//!
//! Finalized ingredients pass their effects on to their clones. The output
//! holds exactly as many ingredients as went in.

mod clones;
mod errors;
mod phases;

pub use errors::ShuffleError;

use rand::Rng;

use crate::classify::Classified;
use crate::config::ShuffleConfig;
use crate::ingredient::Ingredient;
use crate::jar::{CollectReport, Jar};
use clones::Finisher;

/// Counters gathered over one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShuffleStats {
    /// Ingredients that went through the jar.
    pub updated: usize,
    /// Clones that received a copy of a representative's effects.
    pub clones: usize,
    /// Ingredients routed to the output untouched.
    pub kept_intact: usize,
    pub collect: CollectReport,
    /// Effects assigned during the guaranteed-minimum phase.
    pub guaranteed: usize,
    /// Effects assigned during the leftover phase.
    pub leftovers: usize,
}

impl ShuffleStats {
    pub fn assigned(&self) -> usize {
        self.guaranteed + self.leftovers
    }
}

/// Finished ingredients plus run statistics.
#[derive(Clone, Debug)]
pub struct Redistribution<S> {
    /// Every input ingredient, in no particular order.
    pub ingredients: Vec<Ingredient<S>>,
    pub stats: ShuffleStats,
}

pub struct ShuffleEngine<'r, R: ?Sized> {
    config: ShuffleConfig,
    rng: &'r mut R,
}

impl<'r, R: Rng + ?Sized> ShuffleEngine<'r, R> {
    pub fn new(config: ShuffleConfig, rng: &'r mut R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &ShuffleConfig {
        &self.config
    }

    /// Runs the full redistribution.
    ///
    /// On error nothing is returned: a partial shuffle must never be written.
    pub fn run<S>(&mut self, classified: Classified<S>) -> Result<Redistribution<S>, ShuffleError> {
        let expected = classified.total();
        let Classified {
            mut keep,
            clones,
            skip,
        } = classified;

        let mut stats = ShuffleStats {
            kept_intact: skip.len(),
            ..ShuffleStats::default()
        };
        let clone_count = clones.clone_count();
        let mut finisher = Finisher::new(clones, skip);

        if keep.len() < 2 {
            // A single ingredient would only draw its own effects back.
            tracing::info!(
                count = keep.len(),
                "Not enough ingredients to redistribute, keeping them intact"
            );
            let min_effects = self.config.min_effects();
            if let Some(short) = keep
                .iter()
                .find(|i| i.effects.len() < usize::from(min_effects))
            {
                tracing::error!(
                    record = %short.record_id,
                    effects = short.effects.len(),
                    "Jar cannot serve the guaranteed minimum"
                );
                return Err(ShuffleError::MinimumUnreachable {
                    record_id: short.record_id.clone(),
                    round: short.effects.len() as u8 + 1,
                    min_effects,
                });
            }
            stats.kept_intact += keep.len() + clone_count;
            for ingredient in keep {
                finisher.finalize(ingredient);
            }
        } else {
            tracing::info!(
                "{} ingredients (with {} clones) will be updated, {} will be kept intact",
                keep.len(),
                clone_count,
                stats.kept_intact
            );
            stats.updated = keep.len();

            let (mut jar, report) = Jar::collect(&mut keep, self.config.no_loners());
            log_collect(&report);
            let instances = jar.remaining();
            stats.collect = report;

            let working = self.guarantee_minimum(&mut jar, keep, &mut stats)?;
            self.distribute_leftovers(&mut jar, working, &mut finisher, &mut stats)?;

            check("assigned effects", instances, stats.assigned())?;
        }

        let (ingredients, unclaimed, propagated) = finisher.finish();
        check("unclaimed clone groups", 0, unclaimed.pending())?;
        check("finalized ingredients", expected, ingredients.len())?;
        if stats.updated > 0 {
            stats.clones = propagated;
        }

        tracing::info!(
            updated = stats.updated,
            clones = stats.clones,
            kept_intact = stats.kept_intact,
            assigned = stats.assigned(),
            "Redistribution finished"
        );
        Ok(Redistribution { ingredients, stats })
    }
}

fn log_collect(report: &CollectReport) {
    if report.loners_folded > 0 {
        tracing::info!(
            "Adding {} effects to the effects pool due to loner folding",
            report.loners_folded
        );
    }
    match &report.most_frequent {
        Some((effect, tally)) => tracing::info!(
            "Collected {} existing effects ({} distinct). The most frequent effect ({}) is used {} times",
            report.collected,
            report.distinct,
            effect,
            tally
        ),
        None => tracing::info!("Collected no effects"),
    }
}

fn check(what: &'static str, expected: usize, actual: usize) -> Result<(), ShuffleError> {
    if expected != actual {
        return Err(ShuffleError::ConservationViolated {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
