//! Light/dark theme preference.
//!
//! The theme is read once at startup into a plain value and handed to the
//! dashboard. Only [`Preferences::save`] writes it back.

use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Dark => Palette {
                text: Color::Gray,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                highlight: Color::DarkGray,
            },
            Theme::Light => Palette {
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                highlight: Color::LightBlue,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub highlight: Color,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
}

impl Preferences {
    /// Reads stored preferences. When nothing usable is stored, the default
    /// (dark) is written back so later runs see an explicit choice.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        let stored = match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str::<Preferences>(&raw).ok(),
            Err(_) => None,
        };
        match stored {
            Some(prefs) => Ok(prefs),
            None => {
                debug!(path = %path.display(), "no stored preferences, defaulting to dark");
                let prefs = Preferences::default();
                prefs.save(path)?;
                Ok(prefs)
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write preferences to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_missing_preferences_default_to_dark_and_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let prefs = Preferences::load_or_init(&path).unwrap();
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(path.exists());
    }

    #[test]
    fn test_toggle_then_save_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let mut prefs = Preferences::load_or_init(&path).unwrap();
        prefs.theme = prefs.theme.toggled();
        prefs.save(&path).unwrap();

        assert_eq!(Preferences::load_or_init(&path).unwrap().theme, Theme::Light);
    }

    #[test]
    fn test_corrupt_preferences_are_reset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{{nope").unwrap();
        assert_eq!(Preferences::load_or_init(&path).unwrap().theme, Theme::Dark);
    }

    #[test]
    fn test_palettes_differ() {
        assert_ne!(Theme::Dark.palette(), Theme::Light.palette());
    }
}
