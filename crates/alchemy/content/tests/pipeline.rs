use std::collections::BTreeMap;
use std::path::PathBuf;

use alchemy_content::{PluginDocument, PluginLoader, PluginWriter, Settings};
use alchemy_core::{ClassifyOptions, Effect, ShuffleConfig, ShuffleEngine, classify};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/ingredients.yaml")
}

fn tallies(document: &PluginDocument) -> BTreeMap<Effect, usize> {
    let mut tallies = BTreeMap::new();
    for ingredient in &document.ingredients {
        if ingredient.record_id == "ingred_crab_meat_02" {
            continue;
        }
        for effect in &ingredient.effects {
            *tallies.entry(effect.clone()).or_default() += 1;
        }
    }
    tallies
}

fn shuffle(document: &mut PluginDocument, config: ShuffleConfig, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let classified = classify(document.ingredients.clone(), ClassifyOptions::default());
    let redistribution = ShuffleEngine::new(config, &mut rng)
        .run(classified)
        .unwrap();
    document.replace_ingredients(redistribution.ingredients).unwrap();
}

#[test]
fn fixture_loads_every_record() {
    let document = PluginLoader::load(&fixture()).unwrap();
    assert_eq!(document.len(), 10);

    let classified = classify(document.ingredients, ClassifyOptions::default());
    assert_eq!(classified.keep.len(), 8);
    assert_eq!(classified.clones.clone_count(), 1);
    assert_eq!(classified.skip.len(), 1);
}

#[test]
fn ignore_food_skips_plain_bread_only() {
    let document = PluginLoader::load(&fixture()).unwrap();
    let options = ClassifyOptions {
        ignore_food: true,
        print_clones: true,
    };
    let classified = classify(document.ingredients, options);
    let skipped: Vec<_> = classified
        .skip
        .iter()
        .map(|i| i.record_id.as_str())
        .collect();
    assert_eq!(skipped, ["ingred_bread_01", "ingred_quest_token_01"]);
}

#[test]
fn shuffled_plugin_round_trips_through_the_writer() {
    let before = PluginLoader::load(&fixture()).unwrap();
    let dir = tempfile::tempdir().unwrap();

    for min_effects in 1..=3 {
        let mut document = PluginLoader::load(&fixture()).unwrap();
        let config = ShuffleConfig::new(min_effects, false).unwrap();
        shuffle(&mut document, config, u64::from(min_effects) * 17);

        let path = dir.path().join(format!("randomized_alchemy_{min_effects}.yaml"));
        PluginWriter::write_file(&document, &path).unwrap();
        let after = PluginLoader::load(&path).unwrap();

        assert_eq!(after.preamble, before.preamble);
        assert_eq!(after.len(), before.len());
        assert_eq!(tallies(&after), tallies(&before));

        for (old, new) in before.ingredients.iter().zip(&after.ingredients) {
            assert_eq!(old.record_id, new.record_id);
            assert_eq!(old.descriptor, new.descriptor);
            assert_eq!(old.source.header, new.source.header);
            assert_eq!(old.source.tail, new.source.tail);
            if !old.effects.is_empty() {
                assert!(new.effects.len() >= usize::from(min_effects));
            }
        }

        let crab = &after.ingredients[6];
        let cursed = &after.ingredients[7];
        assert_eq!(cursed.record_id, "ingred_crab_meat_02");
        assert_eq!(crab.effects, cursed.effects);

        let token = &after.ingredients[9];
        assert!(token.effects.is_empty());
    }
}

#[test]
fn settings_feed_the_engine() {
    let settings = Settings {
        min_effects: Some(2),
        seed: Some(7),
        ..Settings::default()
    };
    let config = settings.shuffle_config().unwrap();
    let mut document = PluginLoader::load(&fixture()).unwrap();
    shuffle(&mut document, config, settings.seed.unwrap_or_default());

    let mut again = PluginLoader::load(&fixture()).unwrap();
    shuffle(&mut again, config, 7);

    assert_eq!(
        PluginWriter::render(&document).unwrap(),
        PluginWriter::render(&again).unwrap()
    );
}
