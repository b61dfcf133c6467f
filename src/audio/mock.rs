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
    error::Error,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;
use tracing::info;

/// A mock device. Doesn't actually play anything, but remembers what it was asked to play.
#[derive(Clone)]
pub struct Device {
    name: String,
    requests: Arc<Mutex<Vec<PathBuf>>>,
    failing: bool,
}

impl Device {
    /// Gets the given mock device.
    pub fn get(name: &str) -> Device {
        Device {
            name: name.to_string(),
            requests: Arc::new(Mutex::new(Vec::new())),
            failing: false,
        }
    }

    /// Gets a mock device that records each request and then rejects it.
    pub fn failing(name: &str) -> Device {
        Device {
            failing: true,
            ..Device::get(name)
        }
    }

    /// Returns every path playback was requested for, in request order.
    pub fn requests(&self) -> Vec<PathBuf> {
        self.requests.lock().clone()
    }
}

impl crate::audio::Device for Device {
    fn play(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        info!(device = self.name.as_str(), path = ?path, "Playing sample (mock).");
        self.requests.lock().push(path.to_path_buf());

        if self.failing {
            return Err(format!("unable to play {}", path.display()).into());
        }
        Ok(())
    }

    #[cfg(test)]
    fn to_mock(&self) -> Result<Arc<Device>, Box<dyn Error>> {
        Ok(Arc::new(self.clone()))
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}
