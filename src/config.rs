use crate::{
    city,
    clock::TimeFormat,
    display::Palette,
    state::{Selection, Settings, Theme},
};
use anyhow::{anyhow, Context};
use log::info;
use serde::Deserialize;
use std::{fs::File, path::Path};

/// Startup configuration. Every field is optional; anything missing falls
/// back to [Config::default].
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Zone IDs of the cities to show at startup, in order. Each must be in
    /// the catalog.
    pub cities: Vec<String>,
    /// Index into `cities` of the primary city
    pub primary: usize,
    pub time_format: TimeFormat,
    pub theme: Theme,
    pub light: Palette,
    pub dark: Palette,
}

impl Config {
    const PATH: &'static str = "./config.json";

    /// Load config from the default path. A missing file isn't an error, but
    /// an invalid one is.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(Self::PATH))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!("No config at `{}`, using defaults", path.display());
            return Ok(Self::default());
        }
        info!("Loading config from `{}`", path.display());
        let file = File::open(path).with_context(|| {
            format!("Error opening config file {}", path.display())
        })?;
        serde_json::from_reader(file).with_context(|| {
            format!("Error parsing config file {}", path.display())
        })
    }

    /// Build the startup selection from the configured zone IDs
    pub fn selection(&self) -> anyhow::Result<Selection> {
        let cities = self
            .cities
            .iter()
            .map(|zone_id| {
                city::find(zone_id)
                    .copied()
                    .ok_or_else(|| anyhow!("Unknown city timezone `{zone_id}`"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Selection::new(cities, self.primary)
            .context("Invalid city selection in config")
    }

    pub fn settings(&self) -> Settings {
        Settings {
            time_format: self.time_format,
            theme: self.theme,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cities: [
                "Africa/Mogadishu",
                "America/Los_Angeles",
                "America/New_York",
                "Europe/London",
                "Asia/Tokyo",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            primary: 0,
            time_format: TimeFormat::default(),
            theme: Theme::default(),
            light: Palette::LIGHT,
            dark: Palette::DARK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Color;

    fn parse(json: &str) -> anyhow::Result<Config> {
        Ok(serde_json::from_str(json)?)
    }

    #[test]
    fn test_default() {
        let config = parse("{}").unwrap();
        let selection = config.selection().unwrap();
        assert_eq!(
            selection.iter().map(|city| city.name).collect::<Vec<_>>(),
            vec!["Mogadishu", "Los Angeles", "New York", "London", "Tokyo"]
        );
        assert_eq!(selection.primary().name, "Mogadishu");
        assert_eq!(config.settings(), Settings::default());
        assert_eq!(config.light, Palette::LIGHT);
    }

    #[test]
    fn test_parse() {
        let config = parse(
            r##"{
                "cities": ["Europe/Paris", "America/Sao_Paulo"],
                "primary": 1,
                "time_format": "24h",
                "theme": "dark",
                "dark": {
                    "foreground": "#ffffff",
                    "background": "#000000",
                    "accent": "#ff0000",
                    "muted": "#808080"
                }
            }"##,
        )
        .unwrap();
        let selection = config.selection().unwrap();
        assert_eq!(selection.primary().name, "São Paulo");
        assert_eq!(
            config.settings(),
            Settings {
                time_format: TimeFormat::TwentyFourHour,
                theme: Theme::Dark,
            }
        );
        assert_eq!(config.dark.accent, Color::rgb(255, 0, 0));
        assert_eq!(config.light, Palette::LIGHT);
    }

    #[test]
    fn test_invalid() {
        assert!(parse(r#"{"colour": "red"}"#).is_err());
        assert!(parse(r#"{"time_format": "36h"}"#).is_err());

        let unknown = parse(r#"{"cities": ["Mars/Olympus_Mons"]}"#).unwrap();
        assert!(unknown.selection().is_err());
        let empty = parse(r#"{"cities": []}"#).unwrap();
        assert!(empty.selection().is_err());
        let primary = parse(r#"{"primary": 5}"#).unwrap();
        assert!(primary.selection().is_err());
        let duplicate =
            parse(r#"{"cities": ["Asia/Tokyo", "Asia/Tokyo"]}"#).unwrap();
        assert!(duplicate.selection().is_err());
    }

    #[test]
    fn test_load_missing() {
        let config =
            Config::load_from(Path::new("./does/not/exist.json")).unwrap();
        assert_eq!(config.cities.len(), 5);
    }
}
