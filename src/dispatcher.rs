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
use std::sync::Arc;

use tracing::debug;

use crate::{assets::AssetLayout, audio, input::KeyEvent, key::Key};

/// Turns key presses into sample playback requests.
///
/// The dispatcher holds no state between presses. Every press of a playable key
/// produces exactly one playback request, even if the same key is still sounding, and
/// the request is never waited on or checked.
pub struct Dispatcher {
    device: Arc<dyn audio::Device>,
    assets: AssetLayout,
}

impl Dispatcher {
    /// Creates a new dispatcher that plays the given layout's samples through the device.
    pub fn new(device: Arc<dyn audio::Device>, assets: AssetLayout) -> Dispatcher {
        Dispatcher { device, assets }
    }

    /// Handles a single key press.
    pub fn on_key_press(&self, event: &KeyEvent) {
        let Some(key) = Key::from_identifier(event.key()) else {
            return;
        };

        let path = self.assets.path_for(key);
        debug!(key = key.as_str(), note = key.note(), path = ?path, "Key pressed.");

        // Playback failures belong to the device.
        let _ = self.device.play(&path);
    }

    /// The asset layout samples are played from.
    pub fn assets(&self) -> &AssetLayout {
        &self.assets
    }
}
