use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::style::Style;
use coverflip_core::CoverViewConfig;

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub cover_view: CoverViewConfig,
    #[serde(default)]
    pub style: Style,
}
impl Config {
    pub const FILENAME: &str = "config.toml";

    pub fn load() -> Self {
        match std::fs::read_to_string(Self::FILENAME) {
            Ok(contents) => {
                // Config exists, try to parse it
                match toml::from_str(&contents) {
                    Ok(config) => config,
                    Err(e) => panic!("Failed to parse {}: {e}", Self::FILENAME),
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file found, creating default config");
                Config::default()
            }
            Err(e) => {
                panic!("Failed to read {}: {e}", Self::FILENAME)
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(Path::new(Self::FILENAME))
    }

    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("saved config to {}", path.display());
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct General {
    pub repaint_secs: f32,
    pub window_width: f32,
    pub window_height: f32,
    /// Scanned for music at startup. Without one, a demo playlist is shown.
    pub music_directory: Option<PathBuf>,
    pub demo_songs: usize,
}
impl Default for General {
    fn default() -> Self {
        Self {
            repaint_secs: 1.0,
            window_width: 480.0,
            window_height: 640.0,
            music_directory: None,
            demo_songs: 12,
        }
    }
}

#[cfg(test)]
mod tests {
    use coverflip_core::DisplayMode;

    use super::*;

    #[test]
    fn test_default_config_survives_a_save() {
        let config = Config::default();
        let parsed: Config = toml::from_str(&toml::to_string(&config).unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [general]
            music_directory = "/srv/music"

            [cover_view]
            display_mode = "separate"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.general.music_directory,
            Some(PathBuf::from("/srv/music"))
        );
        assert_eq!(config.general.demo_songs, 12);
        assert_eq!(config.cover_view.display_mode, DisplayMode::Separate);
        assert_eq!(config.cover_view.cache_capacity, 8);
        assert_eq!(config.style, Style::default());
    }

    #[test]
    fn test_save_reports_unwritable_location() {
        let config = Config::default();
        let missing = std::env::temp_dir().join("coverflip-definitely-missing-directory");
        let error = config.save_to(&missing.join(Config::FILENAME)).unwrap_err();
        assert!(format!("{error:#}").contains("Failed to write"));

        let dir = std::env::temp_dir().join(format!("coverflip-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(Config::FILENAME);
        config.save_to(&path).unwrap();
        let parsed: Config = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, config);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
