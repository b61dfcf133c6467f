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
use serde::Deserialize;

use crate::assets::{AssetLayout, DEFAULT_ASSETS_EXTENSION, DEFAULT_ASSETS_PATH};

/// A YAML representation of where the samples live.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Assets {
    /// The directory holding one sample per key.
    path: Option<String>,

    /// The extension of the sample files.
    extension: Option<String>,
}

impl Assets {
    /// New will create a new Assets configuration.
    pub fn new(path: Option<String>, extension: Option<String>) -> Assets {
        Assets { path, extension }
    }

    /// Returns a copy of this configuration with any given values replacing the current ones.
    pub fn merge(&self, path: Option<String>, extension: Option<String>) -> Assets {
        Assets {
            path: path.or_else(|| self.path.clone()),
            extension: extension.or_else(|| self.extension.clone()),
        }
    }

    /// Converts the configuration into an asset layout, filling in defaults.
    pub fn layout(&self) -> AssetLayout {
        AssetLayout::new(
            self.path.as_deref().unwrap_or(DEFAULT_ASSETS_PATH),
            self.extension.as_deref().unwrap_or(DEFAULT_ASSETS_EXTENSION),
        )
    }
}
