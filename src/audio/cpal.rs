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
    thread,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, error, info, span, warn, Level};

use crate::audio::{mixer::AudioMixer, sample, Device as AudioDevice};
use crate::config;

/// The device name that selects the host's default output device.
pub const DEFAULT_DEVICE: &str = "default";

/// A small wrapper around a cpal::Device.
pub struct Device {
    /// The name of the device.
    name: String,
    /// The maximum number of channels the device supports.
    max_channels: u16,
    /// The host ID of the device.
    host_id: cpal::HostId,
    /// The underlying cpal device.
    device: cpal::Device,
    /// The running output stream. Only present for devices opened with get().
    output_manager: Option<Arc<OutputManager>>,
}

/// Owns the continuous output stream that the mixer feeds.
struct OutputManager {
    /// The mixer every voice is added to.
    mixer: AudioMixer,
    /// Dropping this sender (or sending on it) tells the output thread to stop.
    shutdown_tx: crossbeam_channel::Sender<()>,
    /// Handle to the output thread, which owns the stream.
    output_thread: Option<thread::JoinHandle<()>>,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Channels={}) ({})",
            self.name,
            self.max_channels,
            self.host_id.name()
        )
    }
}

/// Converts mixed f32 frames into the device's sample type.
fn convert_into<T>(src: &[f32], dst: &mut [T])
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    for (dst, &src) in dst.iter_mut().zip(src.iter()) {
        *dst = <T as cpal::Sample>::from_sample(src);
    }
}

/// Builds an output stream that converts the mixer's f32 output to the device's sample type.
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mixer: AudioMixer,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let mut scratch: Vec<f32> = Vec::new();
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            scratch.resize(data.len(), 0.0);
            mixer.process_into(&mut scratch);
            convert_into(&scratch, data);
        },
        |err| error!("CPAL output stream error: {}", err),
        None,
    )
}

impl OutputManager {
    /// Starts the output thread. The stream is created on that thread, since cpal
    /// streams can't be moved between threads, and this returns once it's playing.
    fn start(
        device: cpal::Device,
        stream_config: cpal::StreamConfig,
        sample_format: cpal::SampleFormat,
    ) -> Result<OutputManager, Box<dyn Error>> {
        let mixer = AudioMixer::new(stream_config.channels, stream_config.sample_rate);
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(1);
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<(), String>>(1);

        let stream_mixer = mixer.clone();
        let output_thread = thread::Builder::new()
            .name("audio output".to_string())
            .spawn(move || {
                let span = span!(Level::INFO, "audio output");
                let _enter = span.enter();

                let stream = match sample_format {
                    cpal::SampleFormat::F32 => {
                        build_stream::<f32>(&device, &stream_config, stream_mixer)
                    }
                    cpal::SampleFormat::I16 => {
                        build_stream::<i16>(&device, &stream_config, stream_mixer)
                    }
                    cpal::SampleFormat::I32 => {
                        build_stream::<i32>(&device, &stream_config, stream_mixer)
                    }
                    cpal::SampleFormat::U16 => {
                        build_stream::<u16>(&device, &stream_config, stream_mixer)
                    }
                    other => {
                        let _ = ready_tx.send(Err(format!("unsupported sample format {:?}", other)));
                        return;
                    }
                };

                let stream = match stream {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = ready_tx.send(Err(format!("failed to create stream: {}", e)));
                        return;
                    }
                };
                if let Err(e) = stream.play() {
                    let _ = ready_tx.send(Err(format!("failed to start stream: {}", e)));
                    return;
                }

                info!(
                    channels = stream_config.channels,
                    sample_rate = stream_config.sample_rate,
                    "CPAL output stream started."
                );
                let _ = ready_tx.send(Ok(()));

                // Hold the stream until shutdown.
                let _ = shutdown_rx.recv();
                drop(stream);
                info!("CPAL output stream stopped.");
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(OutputManager {
                mixer,
                shutdown_tx,
                output_thread: Some(output_thread),
            }),
            Ok(Err(e)) => {
                let _ = output_thread.join();
                Err(e.into())
            }
            Err(_) => {
                let _ = output_thread.join();
                Err("audio output thread exited before the stream started".into())
            }
        }
    }
}

impl Drop for OutputManager {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(thread) = self.output_thread.take() {
            let _ = thread.join();
        }
    }
}

/// Decodes the sample and hands it to the mixer. Runs on its own thread per request.
fn load_and_play(mixer: AudioMixer, path: PathBuf) {
    match sample::decode_file(&path) {
        Ok(decoded) => {
            let decoded = decoded.resample(mixer.sample_rate());
            let voice = mixer.add_voice(decoded);
            debug!(path = ?path, voice, "Sample started.");
        }
        Err(e) => warn!(path = ?path, err = %e, "Unable to play sample."),
    }
}

impl Device {
    /// Lists cpal devices and produces the Device trait.
    pub fn list() -> Result<Vec<Box<dyn AudioDevice>>, Box<dyn Error>> {
        Ok(Device::list_cpal_devices()?
            .into_iter()
            .map(|device| {
                let device: Box<dyn AudioDevice> = Box::new(device);
                device
            })
            .collect())
    }

    /// Wraps a cpal device, returning None if it can't output audio.
    fn from_cpal(host_id: cpal::HostId, device: cpal::Device) -> Option<Device> {
        let name = device.description().ok()?.name().to_string();
        let max_channels = device
            .supported_output_configs()
            .ok()?
            .map(|config| config.channels())
            .max()
            .unwrap_or(0);

        if max_channels == 0 {
            return None;
        }

        Some(Device {
            name,
            max_channels,
            host_id,
            device,
            output_manager: None,
        })
    }

    /// Lists cpal devices.
    fn list_cpal_devices() -> Result<Vec<Device>, Box<dyn Error>> {
        // Suppress noisy output here.
        let _shh_stdout = shh::stdout()?;
        let _shh_stderr = shh::stderr()?;

        let mut devices: Vec<Device> = Vec::new();
        for host_id in cpal::available_hosts() {
            let host_devices = match cpal::host_from_id(host_id)?.output_devices() {
                Ok(host_devices) => host_devices,
                Err(e) => {
                    error!(
                        err = e.to_string(),
                        host = host_id.name(),
                        "Unable to list devices for host"
                    );
                    continue;
                }
            };

            devices.extend(
                host_devices.filter_map(|device| Device::from_cpal(host_id, device)),
            );
        }

        devices.sort_by_key(|device| device.name.to_string());
        Ok(devices)
    }

    /// Gets the given cpal device and starts its output stream.
    pub fn get(config: &config::Audio) -> Result<Device, Box<dyn Error>> {
        let name = config.device();
        let mut device = if name == DEFAULT_DEVICE {
            let host = cpal::default_host();
            host.default_output_device()
                .and_then(|device| Device::from_cpal(host.id(), device))
                .ok_or("no default output device found")?
        } else {
            Device::list_cpal_devices()?
                .into_iter()
                .find(|device| device.name.trim() == name)
                .ok_or_else(|| format!("no device found with name {}", name))?
        };

        let supported = device.device.default_output_config()?;
        let mut stream_config = supported.config();
        if let Some(sample_rate) = config.sample_rate() {
            stream_config.sample_rate = sample_rate;
        }

        device.output_manager = Some(Arc::new(OutputManager::start(
            device.device.clone(),
            stream_config,
            supported.sample_format(),
        )?));

        Ok(device)
    }
}

impl AudioDevice for Device {
    fn play(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let output_manager = self
            .output_manager
            .as_ref()
            .ok_or_else(|| format!("device {} has not been opened", self.name))?;

        debug!(device = self.name.as_str(), path = ?path, "Playing sample.");

        let mixer = output_manager.mixer.clone();
        let path = path.to_path_buf();
        thread::Builder::new()
            .name("sample loader".to_string())
            .spawn(move || load_and_play(mixer, path))?;
        Ok(())
    }

    #[cfg(test)]
    fn to_mock(&self) -> Result<Arc<super::mock::Device>, Box<dyn Error>> {
        Err("not a mock".into())
    }
}

#[cfg(test)]
mod test {
    use std::{error::Error, path::PathBuf};

    use crate::{
        audio::mixer::AudioMixer,
        test::eventually,
        testutil::write_wav,
    };

    use super::{convert_into, load_and_play};

    #[test]
    fn test_convert_into_device_formats() {
        let mixed = [0.0f32, -1.0];

        let mut unsigned = [1u16; 2];
        convert_into(&mixed, &mut unsigned);
        assert_eq!([32768, 0], unsigned);

        let mut signed = [1i16; 2];
        convert_into(&mixed, &mut signed);
        assert_eq!([0, i16::MIN], signed);

        let mut float = [1.0f32; 2];
        convert_into(&mixed, &mut float);
        assert_eq!(mixed, float);
    }

    #[test]
    fn test_load_and_play_adds_resampled_voice() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("A.wav");
        write_wav(path.clone(), vec![vec![0.5f32; 441]], 44100)?;

        let mixer = AudioMixer::new(2, 48000);
        load_and_play(mixer.clone(), path);
        assert_eq!(1, mixer.active_voices().len());

        // 441 frames at 44.1kHz is 480 frames at 48kHz.
        mixer.process_frames(479);
        assert_eq!(1, mixer.active_voices().len());
        mixer.process_frames(1);
        assert!(mixer.active_voices().is_empty());
        Ok(())
    }

    #[test]
    fn test_load_and_play_missing_sample_is_dropped() {
        let mixer = AudioMixer::new(2, 44100);
        load_and_play(mixer.clone(), PathBuf::from("/does/not/exist/A.mp3"));
        assert!(mixer.active_voices().is_empty());

        // Later requests still play.
        let mixer_for_thread = mixer.clone();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S.wav");
        write_wav(path.clone(), vec![vec![0.25f32; 100]], 44100).unwrap();
        std::thread::spawn(move || load_and_play(mixer_for_thread, path));
        eventually(
            || mixer.active_voices().len() == 1,
            "sample never reached the mixer",
        );
    }
}
