//! Plugin YAML writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use alchemy_core::{Effect, Ingredient};
use anyhow::{Context, Result};

use crate::loaders::{PluginDocument, RecordLayout};

/// Writes ingredient records back in the layout they were read from.
pub struct PluginWriter;

impl PluginWriter {
    /// Write `document` to a new file at `path`.
    pub fn write_file(document: &PluginDocument, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output YAML {}", path.display()))?;
        let mut out = BufWriter::with_capacity(64 * 1024, file);
        Self::write(document, &mut out)?;
        out.flush()
            .with_context(|| format!("Failed to write output YAML {}", path.display()))?;
        Ok(())
    }

    /// Serialize `document` into `out`.
    pub fn write<W: Write>(document: &PluginDocument, out: &mut W) -> Result<()> {
        for line in &document.preamble {
            writeln!(out, "{line}")?;
        }
        for ingredient in &document.ingredients {
            write_record(ingredient, out)?;
        }
        Ok(())
    }

    /// Serialize `document` into a string.
    pub fn render(document: &PluginDocument) -> Result<String> {
        let mut buffer = Vec::new();
        Self::write(document, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

fn write_record<W: Write>(ingredient: &Ingredient<RecordLayout>, out: &mut W) -> Result<()> {
    let layout = &ingredient.source;
    for line in &layout.header {
        writeln!(out, "{line}")?;
    }

    let indent = &layout.indent;
    if ingredient.effects.is_empty() {
        writeln!(out, "{indent}effects: []")?;
    } else {
        writeln!(out, "{indent}effects:")?;
        for effect in &ingredient.effects {
            write_effect(effect, indent, out)?;
        }
    }

    for line in &layout.tail {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn write_effect<W: Write>(effect: &Effect, indent: &str, out: &mut W) -> Result<()> {
    writeln!(out, "{indent}  - effect: {}", effect.kind)?;
    if let Some(attribute) = &effect.attribute {
        writeln!(out, "{indent}    attribute: {attribute}")?;
    }
    if let Some(skill) = &effect.skill {
        writeln!(out, "{indent}    skill: {skill}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alchemy_core::EffectSet;

    const SAMPLE: &str = "---
meta:
  version: 1
records:
  \"Ingredient::ingred_ash_salts_01\":
    name: Ash Salts
    effects:
      - effect: DrainAttribute
        attribute: Agility
      - effect: ResistMagicka
    value: 25
  \"Ingredient::ingred_bread_01\":
    name: Bread
    effects: []
    value: 1
";

    #[test]
    fn untouched_document_is_reproduced() {
        let document = PluginDocument::parse(SAMPLE).unwrap();
        assert_eq!(PluginWriter::render(&document).unwrap(), SAMPLE);
    }

    #[test]
    fn new_effects_replace_the_block_only() {
        let mut document = PluginDocument::parse(SAMPLE).unwrap();
        let mut effects = EffectSet::new();
        effects.insert(Effect::new("FortifySkill").with_skill("Alchemy"));
        document.ingredients[1].effects = effects;
        document.ingredients[0].effects = EffectSet::new();

        let written = PluginWriter::render(&document).unwrap();
        let expected = "---
meta:
  version: 1
records:
  \"Ingredient::ingred_ash_salts_01\":
    name: Ash Salts
    effects: []
    value: 25
  \"Ingredient::ingred_bread_01\":
    name: Bread
    effects:
      - effect: FortifySkill
        skill: Alchemy
    value: 1
";
        assert_eq!(written, expected);
    }

    #[test]
    fn writes_to_file() {
        let document = PluginDocument::parse(SAMPLE).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("randomized_alchemy.yaml");

        PluginWriter::write_file(&document, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE);
    }
}
