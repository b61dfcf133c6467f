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
use std::{
    fmt,
    path::PathBuf,
    time::Duration,
};

use tracing::debug;

use crate::{audio::sample, key::Key};

pub const DEFAULT_ASSETS_PATH: &str = "./audio";
pub const DEFAULT_ASSETS_EXTENSION: &str = "mp3";

/// Where the sample for each key lives on disk: `<path>/<KEY>.<extension>`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetLayout {
    path: PathBuf,
    extension: String,
}

/// The outcome of checking a single key's asset.
pub struct AssetStatus {
    pub key: Key,
    pub path: PathBuf,
    /// The decoded duration, or the reason the asset can't be played.
    pub result: Result<Duration, String>,
}

impl AssetLayout {
    /// Creates a new layout. A leading dot on the extension is ignored.
    pub fn new(path: impl Into<PathBuf>, extension: &str) -> AssetLayout {
        AssetLayout {
            path: path.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// The file extension of the samples, without the dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The path of the sample for the given key.
    pub fn path_for(&self, key: Key) -> PathBuf {
        self.path.join(format!("{}.{}", key.as_str(), self.extension))
    }

    /// Decodes every key's asset and reports the result, in pitch order.
    pub fn verify(&self) -> Vec<AssetStatus> {
        Key::ALL
            .iter()
            .map(|&key| {
                let path = self.path_for(key);
                let result = sample::decode_file(&path)
                    .map(|decoded| decoded.duration())
                    .map_err(|e| e.to_string());
                debug!(key = key.as_str(), path = ?path, ok = result.is_ok(), "Verified asset");
                AssetStatus { key, path, result }
            })
            .collect()
    }
}

impl Default for AssetLayout {
    fn default() -> Self {
        AssetLayout::new(DEFAULT_ASSETS_PATH, DEFAULT_ASSETS_EXTENSION)
    }
}

impl fmt::Display for AssetLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/<KEY>.{}", self.path.display(), self.extension)
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(duration) => write!(
                f,
                "{} ({}): {} ok, {:.2}s",
                self.key,
                self.key.note(),
                self.path.display(),
                duration.as_secs_f64()
            ),
            Err(e) => write!(
                f,
                "{} ({}): {} FAILED: {}",
                self.key,
                self.key.note(),
                self.path.display(),
                e
            ),
        }
    }
}
