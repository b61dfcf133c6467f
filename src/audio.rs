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
use std::{error::Error, fmt, path::Path, sync::Arc};

use crate::config;

pub mod cpal;
pub mod mixer;
pub mod mock;
pub mod sample;

pub trait Device: fmt::Display + Send + Sync {
    /// Starts playing the sample at the given path and returns without waiting for it.
    /// An error means the request itself was refused. Problems found while loading or
    /// playing the sample are the device's to deal with and are never reported back.
    fn play(&self, path: &Path) -> Result<(), Box<dyn Error>>;

    #[cfg(test)]
    fn to_mock(&self) -> Result<Arc<mock::Device>, Box<dyn Error>>;
}

/// Lists devices known to cpal.
pub fn list_devices() -> Result<Vec<Box<dyn Device>>, Box<dyn Error>> {
    cpal::Device::list()
}

/// Gets a device with the given configuration.
pub fn get_device(config: &config::Audio) -> Result<Arc<dyn Device>, Box<dyn Error>> {
    let device = config.device();
    if device.starts_with("mock") {
        return Ok(Arc::new(mock::Device::get(device)));
    };

    Ok(Arc::new(cpal::Device::get(config)?))
}

#[cfg(test)]
mod test {
    use std::error::Error;

    use crate::config;

    #[test]
    fn test_get_mock_device() -> Result<(), Box<dyn Error>> {
        let device = super::get_device(&config::Audio::new("mock-piano"))?;
        assert_eq!("mock-piano (Mock)", device.to_string());
        assert!(device.to_mock()?.requests().is_empty());
        Ok(())
    }
}
