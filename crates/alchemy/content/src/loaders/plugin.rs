//! Ingredient records from a `delta_plugin` YAML dump.
//!
//! The dump is not deserialized as a whole. Each record is split into three
//! runs of lines: everything before the `effects:` key, the effects block
//! itself, and the tail after it. Only the effects block is parsed into
//! values; the other two runs are kept verbatim in a [`RecordLayout`] so the
//! writer can put the record back together without touching fields this
//! tool does not understand.
//!
//! ```yaml
//! records:
//!   "Ingredient::ingred_alit_hide_01":
//!     name: Alit Hide
//!     model: m\Misc_Alit_Hide_01.nif
//!     effects:
//!       - effect: DrainAttribute
//!         attribute: Intelligence
//!       - effect: ResistPoison
//!     icon: m\Tx_Alit_Hide_01.tga
//! ```

use std::collections::HashMap;
use std::path::Path;

use alchemy_core::{Descriptor, Effect, EffectSet, Ingredient, ShuffleConfig};
use anyhow::{Context, anyhow, bail};

use crate::loaders::{LoadResult, read_file};

const RECORD_PREFIX: &str = "\"Ingredient::";
const EFFECTS_KEY: &str = "effects:";

/// Verbatim lines of a record around its effects block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordLayout {
    /// Lines from the record key up to, not including, the `effects:` key.
    pub header: Vec<String>,
    /// Indentation of the `effects:` key.
    pub indent: String,
    /// Lines following the effects block.
    pub tail: Vec<String>,
}

/// A parsed plugin dump.
#[derive(Clone, Debug)]
pub struct PluginDocument {
    /// Lines up to and including `records:`, plus anything before the first
    /// ingredient record.
    pub preamble: Vec<String>,
    pub ingredients: Vec<Ingredient<RecordLayout>>,
}

impl PluginDocument {
    pub fn parse(text: &str) -> LoadResult<Self> {
        let lines: Vec<&str> = text.lines().collect();
        let records_at = lines
            .iter()
            .position(|line| line.trim_end() == "records:")
            .ok_or_else(|| anyhow!("Cannot parse the plugin's header: no top-level `records:` key"))?;

        let mut preamble: Vec<String> = lines[..=records_at]
            .iter()
            .map(|line| line.to_string())
            .collect();

        let body = &lines[records_at + 1..];
        let starts: Vec<usize> = body
            .iter()
            .enumerate()
            .filter_map(|(index, line)| record_id(line).map(|_| index))
            .collect();
        let first = starts.first().copied().unwrap_or(body.len());
        preamble.extend(body[..first].iter().map(|line| line.to_string()));

        let mut ingredients = Vec::with_capacity(starts.len());
        for (n, &start) in starts.iter().enumerate() {
            let end = starts.get(n + 1).copied().unwrap_or(body.len());
            let ingredient = parse_record(&body[start..end])
                .with_context(|| format!("Invalid record at line {}", records_at + 2 + start))?;
            ingredients.push(ingredient);
        }

        // A looser match than `record_id`, so malformed keys are caught
        // instead of being folded into the previous record.
        let mentioned = body
            .iter()
            .filter(|line| line.trim_start().starts_with(RECORD_PREFIX))
            .count();
        if mentioned != ingredients.len() {
            bail!(
                "Found {} ingredient keys but parsed {} ingredient records",
                mentioned,
                ingredients.len()
            );
        }

        Ok(Self {
            preamble,
            ingredients,
        })
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Puts redistributed ingredients back in place of the loaded ones,
    /// keeping the record order of the source file.
    pub fn replace_ingredients(
        &mut self,
        mut ingredients: Vec<Ingredient<RecordLayout>>,
    ) -> LoadResult<()> {
        let positions: HashMap<&str, usize> = self
            .ingredients
            .iter()
            .enumerate()
            .map(|(index, ingredient)| (ingredient.record_id.as_str(), index))
            .collect();
        if ingredients.len() != positions.len() {
            bail!(
                "Expected {} ingredients back, got {}",
                positions.len(),
                ingredients.len()
            );
        }
        let mut order = Vec::with_capacity(ingredients.len());
        for ingredient in &ingredients {
            let position = positions
                .get(ingredient.record_id.as_str())
                .copied()
                .ok_or_else(|| anyhow!("Unknown ingredient {}", ingredient.record_id))?;
            order.push(position);
        }
        let mut sorted: Vec<(usize, Ingredient<RecordLayout>)> =
            order.into_iter().zip(ingredients.drain(..)).collect();
        sorted.sort_by_key(|(position, _)| *position);
        if sorted.windows(2).any(|pair| pair[0].0 == pair[1].0) {
            bail!("Redistribution returned an ingredient twice");
        }
        self.ingredients = sorted.into_iter().map(|(_, ingredient)| ingredient).collect();
        Ok(())
    }
}

/// Loader for `delta_plugin` YAML dumps.
pub struct PluginLoader;

impl PluginLoader {
    /// Load every ingredient record from a YAML dump.
    pub fn load(path: &Path) -> LoadResult<PluginDocument> {
        let content = read_file(path)?;
        let document = PluginDocument::parse(&content)
            .with_context(|| format!("Failed to parse plugin YAML {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            records = document.len(),
            "Loaded plugin YAML"
        );
        Ok(document)
    }
}

fn record_id(line: &str) -> Option<&str> {
    line.trim().strip_prefix(RECORD_PREFIX)?.strip_suffix("\":")
}

/// Splits an `effects:` key line into its indentation and inline value.
fn effects_key(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim_start();
    let inline = trimmed.strip_prefix(EFFECTS_KEY)?;
    let indent = &line[..line.len() - trimmed.len()];
    Some((indent, inline.trim()))
}

/// True once `line` is a sibling key of `effects:` or belongs to an outer
/// mapping.
fn ends_block(line: &str, indent: &str) -> bool {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return false;
    }
    let depth = line.len() - trimmed.len();
    depth < indent.len()
        || (depth == indent.len()
            && trimmed.starts_with(|c: char| c.is_alphanumeric() || c == '_' || c == '"'))
}

fn parse_record(lines: &[&str]) -> LoadResult<Ingredient<RecordLayout>> {
    let record = record_id(lines[0]).ok_or_else(|| anyhow!("Not an ingredient record key"))?;

    let key_at = lines
        .iter()
        .position(|line| effects_key(line).is_some())
        .ok_or_else(|| anyhow!("Ingredient {record} has no `effects` key"))?;
    let (indent, inline) = effects_key(lines[key_at]).unwrap_or_default();

    let mut block_end = key_at + 1;
    match inline {
        "[]" => {}
        "" => {
            while block_end < lines.len() && !ends_block(lines[block_end], indent) {
                block_end += 1;
            }
            while block_end > key_at + 1 && lines[block_end - 1].trim().is_empty() {
                block_end -= 1;
            }
        }
        other => bail!("Ingredient {record} has an unsupported effects value: {other}"),
    }

    let entries = parse_effects(record, &lines[key_at + 1..block_end])?;
    if entries.len() > ShuffleConfig::MAX_EFFECTS {
        bail!(
            "Ingredient {record} has {} effects, at most {} are supported",
            entries.len(),
            ShuffleConfig::MAX_EFFECTS
        );
    }
    let mut effects = EffectSet::new();
    for effect in entries {
        if effects.contains(&effect) {
            tracing::warn!("Ingredient {} lists {} twice, dropping the copy", record, effect);
            continue;
        }
        effects.insert(effect);
    }

    let outside = lines[1..key_at].iter().chain(&lines[block_end..]).copied();
    let descriptor = parse_descriptor(outside);
    for field in descriptor.missing_fields() {
        tracing::warn!("Ingredient {} doesn't have a {}", record, field);
    }

    let layout = RecordLayout {
        header: lines[..key_at].iter().map(|line| line.to_string()).collect(),
        indent: indent.to_string(),
        tail: lines[block_end..].iter().map(|line| line.to_string()).collect(),
    };
    Ok(Ingredient::new(record, descriptor, effects, layout))
}

fn parse_effects(record: &str, block: &[&str]) -> LoadResult<Vec<Effect>> {
    let mut entries: Vec<Effect> = Vec::new();
    for line in block {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (starts_entry, field) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };
        let (key, value) = field
            .split_once(':')
            .ok_or_else(|| anyhow!("Ingredient {record}: cannot read effect line `{trimmed}`"))?;
        let value = scalar(value);

        match (starts_entry, key.trim()) {
            (true, "effect") => match value {
                Some(kind) => entries.push(Effect::new(kind)),
                None => bail!("Ingredient {record}: effect without a kind"),
            },
            (false, "attribute") => {
                last_entry(record, &mut entries)?.attribute = value.map(String::from);
            }
            (false, "skill") => {
                last_entry(record, &mut entries)?.skill = value.map(String::from);
            }
            _ => bail!("Ingredient {record}: unexpected line in effects `{trimmed}`"),
        }
    }
    Ok(entries)
}

fn last_entry<'a>(record: &str, entries: &'a mut [Effect]) -> LoadResult<&'a mut Effect> {
    entries
        .last_mut()
        .ok_or_else(|| anyhow!("Ingredient {record}: effect field before any `- effect:` entry"))
}

/// Plain scalar value; `~` and empty mean absent.
fn scalar(raw: &str) -> Option<&str> {
    match raw.trim() {
        "" | "~" | "null" => None,
        value => Some(value),
    }
}

fn parse_descriptor<'a>(lines: impl Iterator<Item = &'a str>) -> Descriptor {
    let mut descriptor = Descriptor::default();
    for line in lines {
        let Some((key, value)) = line.trim().split_once(':') else {
            continue;
        };
        let slot = match key {
            "name" => &mut descriptor.name,
            "model" => &mut descriptor.model,
            "icon" => &mut descriptor.icon,
            "weight" => &mut descriptor.weight,
            "value" => &mut descriptor.value,
            _ => continue,
        };
        if slot.is_none() {
            *slot = scalar(value).map(String::from);
        }
    }
    descriptor
}
