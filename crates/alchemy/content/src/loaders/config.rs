//! Settings file loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::settings::Settings;

/// Loader for run settings from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing [`Settings`]
    pub fn load(path: &Path) -> LoadResult<Settings> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Settings> {
        let settings: Settings = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse settings TOML: {}", e))?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parses_every_field() {
        let settings = ConfigLoader::parse(
            r#"
min_effects = 2
no_loners = true
ignore_food = true
print_clones = false
seed = 1234
delta_plugin = "/opt/delta/delta_plugin"
"#,
        )
        .unwrap();

        assert_eq!(settings.min_effects, Some(2));
        assert_eq!(settings.no_loners, Some(true));
        assert_eq!(settings.ignore_food, Some(true));
        assert_eq!(settings.print_clones, Some(false));
        assert_eq!(settings.seed, Some(1234));
        assert_eq!(
            settings.delta_plugin,
            Some(PathBuf::from("/opt/delta/delta_plugin"))
        );
    }

    #[test]
    fn empty_file_sets_nothing() {
        assert_eq!(ConfigLoader::parse("").unwrap(), Settings::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ConfigLoader::parse("min_effect = 2").is_err());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alchemy.toml");
        std::fs::write(&path, "no_loners = true\n").unwrap();

        let settings = ConfigLoader::load(&path).unwrap();
        assert_eq!(settings.no_loners, Some(true));
        assert!(ConfigLoader::load(&dir.path().join("missing.toml")).is_err());
    }
}
