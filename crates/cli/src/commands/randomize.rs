//! The randomization run: extract, shuffle, write, convert back.

use std::path::{Path, PathBuf};

use alchemy_content::{ConfigLoader, PluginLoader, PluginWriter, Settings};
use alchemy_core::{AlchemyError, ShuffleEngine, ShuffleStats, classify};
use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config;
use crate::delta::DeltaPlugin;

const SOURCE_STEM: &str = "tmp_source_alchemy";
const OUTPUT_STEM: &str = "randomized_alchemy";

/// Shuffle the effects of every alchemy ingredient in an OpenMW load order
#[derive(Parser, Debug, Clone)]
#[command(name = "random-alchemy", long_about = None)]
#[command(version)]
pub struct Randomize {
    /// Ensure every ingredient ends with at least this many effects (or fail)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub min_effects: Option<u8>,

    /// Keep the generated YAML next to the plugin
    #[arg(long)]
    pub keep_yaml: bool,

    /// Leave ingredients whose only effect is RestoreFatigue alone
    #[arg(long)]
    pub ignore_food: bool,

    /// Add a second instance of every effect only one ingredient has
    #[arg(long)]
    pub no_loners: bool,

    /// Print the record ids of detected clones
    #[arg(long)]
    pub print_clones: bool,

    /// Read this YAML dump instead of extracting one with delta_plugin
    #[arg(short, long)]
    pub input_yaml: Option<PathBuf>,

    /// Directory for intermediate and final files
    #[arg(short, long, default_value = "./")]
    pub output_dir: PathBuf,

    /// Path of the delta_plugin executable
    #[arg(long)]
    pub delta_plugin: Option<PathBuf>,

    /// Seed for a reproducible shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// TOML settings file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

/// What a finished run produced.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub records: usize,
    pub stats: ShuffleStats,
    pub seed: u64,
    pub plugin: PathBuf,
    pub yaml: Option<PathBuf>,
}

impl Randomize {
    /// Merge defaults, the settings file, the environment and the flags.
    pub fn settings(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => ConfigLoader::load(path)?,
            None => Settings::default(),
        };
        Ok(file
            .overlay(config::from_env())
            .overlay(self.flag_settings()))
    }

    fn flag_settings(&self) -> Settings {
        Settings {
            min_effects: self.min_effects,
            no_loners: self.no_loners.then_some(true),
            ignore_food: self.ignore_food.then_some(true),
            print_clones: self.print_clones.then_some(true),
            seed: self.seed,
            delta_plugin: self.delta_plugin.clone(),
        }
    }

    pub fn execute(self) -> Result<RunSummary> {
        let settings = self.settings()?;
        let shuffle_config = settings.shuffle_config()?;
        let delta = DeltaPlugin::new(settings.delta_plugin());

        let plugin_in = self.output_dir.join(format!("{SOURCE_STEM}.omwaddon"));
        let yaml_in = match &self.input_yaml {
            Some(path) => path.clone(),
            None => {
                tracing::info!("Extracting ingredients with {}", delta.program().display());
                delta.extract_ingredients(&plugin_in)?;
                delta.convert(&self.output_dir, &plugin_in)?;
                self.output_dir.join(format!("{SOURCE_STEM}.yaml"))
            }
        };

        let mut document = PluginLoader::load(&yaml_in)?;
        let records = document.len();
        let classified = classify(document.ingredients.clone(), settings.classify_options());
        for (key, clones) in classified.clones.groups() {
            tracing::debug!(key = %key, "Clone group: {}", clones.join(", "));
        }

        let seed = settings.seed.unwrap_or_else(rand::random);
        tracing::info!(
            seed,
            min_effects = shuffle_config.min_effects(),
            no_loners = shuffle_config.no_loners(),
            "Shuffling {} ingredient records",
            records
        );
        let mut rng = StdRng::seed_from_u64(seed);
        let redistribution = ShuffleEngine::new(shuffle_config, &mut rng)
            .run(classified)
            .inspect_err(|e| {
                tracing::error!(
                    code = e.error_code(),
                    severity = e.severity().as_str(),
                    "{}",
                    e
                );
            })?;
        document.replace_ingredients(redistribution.ingredients)?;

        let yaml_out = self.output_dir.join(format!("{OUTPUT_STEM}.yaml"));
        tracing::info!("Generating output yaml: {}", yaml_out.display());
        PluginWriter::write_file(&document, &yaml_out)?;

        tracing::info!("Converting yaml to plugin...");
        delta.convert(&self.output_dir, &yaml_out)?;

        let yaml = if self.keep_yaml {
            Some(yaml_out)
        } else {
            remove(&yaml_out)?;
            None
        };
        if self.input_yaml.is_none() {
            remove(&yaml_in)?;
            remove(&plugin_in)?;
        }

        tracing::info!("Finished");
        Ok(RunSummary {
            records,
            stats: redistribution.stats,
            seed,
            plugin: self.output_dir.join(format!("{OUTPUT_STEM}.omwaddon")),
            yaml,
        })
    }
}

impl RunSummary {
    pub fn print(&self) {
        let stats = &self.stats;
        println!();
        println!("{}", style("Alchemy randomized").green().bold());
        println!(
            "  {} {} records, {} updated, {} clones, {} kept intact",
            style("→").cyan(),
            self.records,
            style(stats.updated).bold(),
            stats.clones,
            stats.kept_intact
        );
        println!(
            "  {} {} effects collected, {} loners folded, {} assigned ({} guaranteed)",
            style("→").cyan(),
            stats.collect.collected,
            stats.collect.loners_folded,
            stats.assigned(),
            stats.guaranteed
        );
        if let Some((effect, tally)) = &stats.collect.most_frequent {
            println!(
                "  {} most frequent: {} ({} times)",
                style("→").cyan(),
                style(effect).yellow(),
                tally
            );
        }
        println!("  {} seed {}", style("→").cyan(), style(self.seed).dim());
        println!("  {} {}", style("plugin").bold(), self.plugin.display());
        if let Some(yaml) = &self.yaml {
            println!("  {} {}", style("yaml").bold(), yaml.display());
        }
    }
}

fn remove(path: &Path) -> Result<()> {
    std::fs::remove_file(path).with_context(|| format!("Failed to delete {}", path.display()))
}
