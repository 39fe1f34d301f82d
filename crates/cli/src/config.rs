//! Settings read from the process environment.
use std::env;
use std::path::PathBuf;

use alchemy_content::Settings;

/// Seed for a reproducible shuffle.
pub const SEED_VAR: &str = "RANDOM_ALCHEMY_SEED";
/// Location of the `delta_plugin` executable.
pub const DELTA_PLUGIN_VAR: &str = "DELTA_PLUGIN_PATH";

/// Construct settings from process environment variables.
///
/// Environment variables:
/// - `RANDOM_ALCHEMY_SEED` - RNG seed (default: fresh entropy per run)
/// - `DELTA_PLUGIN_PATH` - `delta_plugin` executable (default: `./delta_plugin`)
///
/// Values that fail to parse are ignored with a warning.
pub fn from_env() -> Settings {
    from_lookup(|key| env::var(key).ok())
}

pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = lookup(SEED_VAR) {
        settings.seed = parse_value(SEED_VAR, &raw);
    }

    settings.delta_plugin = lookup(DELTA_PLUGIN_VAR)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from);

    settings
}

fn parse_value<T>(key: &str, raw: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}: cannot parse {:?}", key, raw);
            None
        }
    }
}
