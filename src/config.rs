// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::path::Path;

use config::{Config, File};
use serde::Deserialize;

mod assets;
mod audio;
pub mod error;

pub use self::assets::Assets;
pub use self::audio::Audio;
use self::error::ConfigError;

/// The configuration for the piano.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Piano {
    /// Where the samples live.
    #[serde(default)]
    assets: Assets,

    /// The audio output configuration.
    #[serde(default)]
    audio: Audio,
}

impl Piano {
    /// Creates a new piano configuration.
    pub fn new(assets: Assets, audio: Audio) -> Piano {
        Piano { assets, audio }
    }

    /// Parse a piano configuration from a YAML file.
    pub fn deserialize(path: &Path) -> Result<Piano, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        Ok(Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Piano>()?)
    }

    /// Loads the configuration at the path, or the defaults if no path is given.
    pub fn load(path: Option<&Path>) -> Result<Piano, ConfigError> {
        match path {
            Some(path) => Piano::deserialize(path),
            None => Ok(Piano::default()),
        }
    }

    /// Gets the asset configuration.
    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    /// Gets the audio configuration.
    pub fn audio(&self) -> &Audio {
        &self.audio
    }
}

#[cfg(test)]
mod test {
    use std::{error::Error, path::Path};

    use config::{Config, File, FileFormat};

    use crate::assets::AssetLayout;

    use super::{error::ConfigError, Assets, Audio, Piano};

    #[test]
    fn test_piano_deserialize() {
        let yaml = r#"
            assets:
              path: /srv/piano
              extension: wav
            audio:
              device: mock-device
              sample_rate: 48000
        "#;

        let piano: Piano = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(AssetLayout::new("/srv/piano", "wav"), piano.assets().layout());
        assert_eq!("mock-device", piano.audio().device());
        assert_eq!(Some(48000), piano.audio().sample_rate());
    }

    #[test]
    fn test_piano_defaults() {
        let yaml = r#"
            audio:
              device: mock-device
        "#;

        let piano: Piano = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(AssetLayout::default(), piano.assets().layout());
        assert_eq!(None, piano.audio().sample_rate());

        let piano = Piano::load(None).unwrap();
        assert_eq!("default", piano.audio().device());
        assert_eq!(AssetLayout::default(), piano.assets().layout());
    }

    #[test]
    fn test_piano_from_file() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("piano.yaml");
        std::fs::write(&path, "assets:\n  extension: ogg\naudio:\n  device: mock\n")?;

        let piano = Piano::deserialize(&path)?;
        assert_eq!(AssetLayout::new("./audio", "ogg"), piano.assets().layout());
        assert_eq!(&Audio::new("mock"), piano.audio());
        Ok(())
    }

    #[test]
    fn test_piano_missing_file() {
        let result = Piano::load(Some(Path::new("/not/a/real/piano.yaml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_assets_merge() {
        let assets = Assets::new(Some("/srv/piano".to_string()), None);
        let merged = assets.merge(None, Some("flac".to_string()));
        assert_eq!(AssetLayout::new("/srv/piano", "flac"), merged.layout());

        let merged = assets.merge(Some("/tmp".to_string()), None);
        assert_eq!(AssetLayout::new("/tmp", "mp3"), merged.layout());
    }

    #[test]
    fn test_audio_with_device() {
        let audio = Audio::new("default").with_device("mock-other");
        assert_eq!("mock-other", audio.device());
    }
}
