use std::path::PathBuf;
use std::time::Duration;

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::SettingsError;
use crate::normalize::normalize_country_code;
use crate::profile::DEFAULT_COUNTRY_CODE;

const ENV_PREFIX: &str = "FIELDFILL";
const SETTINGS_FILE: &str = "fieldfill";

/// Runtime settings: optional `fieldfill.toml`, then `FIELDFILL_*` env vars.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub db_path: PathBuf,
    /// Pause between two fills of a sequential fill.
    pub fill_delay_ms: u64,
    /// Used when the profile's phone number has no country code.
    pub default_country_code: String,
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, SettingsError> {
    Ok(Config::builder()
        .set_default("db_path", "data/fieldfill.sqlite")?
        .set_default("fill_delay_ms", 50)?
        .set_default("default_country_code", DEFAULT_COUNTRY_CODE)?)
}

impl Settings {
    pub fn load() -> Result<Settings, SettingsError> {
        let builder = defaults()?
            .add_source(File::with_name(SETTINGS_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX));
        Settings::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Settings, SettingsError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validated()
    }

    fn validated(mut self) -> Result<Settings, SettingsError> {
        self.default_country_code = normalize_country_code(&self.default_country_code);
        if self.default_country_code.len() < 2 {
            return Err(SettingsError::InvalidValue {
                field: "default_country_code".to_string(),
                message: "must contain at least one digit".to_string(),
            });
        }
        Ok(self)
    }

    pub fn fill_delay(&self) -> Duration {
        Duration::from_millis(self.fill_delay_ms)
    }
}
