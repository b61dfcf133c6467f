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

//! Decoding of sample files into memory.
//!
//! Samples are short, so each one is decoded in full before it's handed to the mixer.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};
use tracing::debug;

/// Error types for sample decoding.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audio file error: {0}")]
    Audio(#[from] SymphoniaError),

    #[error("No audio track found in {0}")]
    NoTrack(String),

    #[error("Sample rate not specified in {0}")]
    NoSampleRate(String),

    #[error("No audio decoded from {0}")]
    Empty(String),
}

/// A fully decoded sample. Data is interleaved f32 in [-1, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSample {
    data: Vec<f32>,
    channel_count: u16,
    sample_rate: u32,
}

impl DecodedSample {
    /// Creates a sample from interleaved data.
    pub fn new(data: Vec<f32>, channel_count: u16, sample_rate: u32) -> DecodedSample {
        DecodedSample {
            data,
            channel_count,
            sample_rate,
        }
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        if self.channel_count == 0 {
            return 0;
        }
        self.data.len() / self.channel_count as usize
    }

    /// The playing time of the sample.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.frames() as u64 * 1_000_000_000 / self.sample_rate as u64)
    }

    /// Converts the sample to the target rate using linear interpolation, which is
    /// plenty for one-shot instrument samples.
    pub fn resample(self, target_rate: u32) -> DecodedSample {
        if self.sample_rate == target_rate || self.sample_rate == 0 || self.channel_count == 0 {
            return self;
        }

        let ratio = target_rate as f64 / self.sample_rate as f64;
        let channels = self.channel_count as usize;
        let source_frames = self.frames();
        let target_frames = (source_frames as u64 * target_rate as u64)
            .div_ceil(self.sample_rate as u64) as usize;

        let mut output = Vec::with_capacity(target_frames * channels);
        for target_frame in 0..target_frames {
            let source_pos = target_frame as f64 / ratio;
            let source_frame = source_pos.floor() as usize;
            let frac = source_pos.fract() as f32;

            for channel in 0..channels {
                let s0 = self
                    .data
                    .get(source_frame * channels + channel)
                    .copied()
                    .unwrap_or(0.0);
                let s1 = self
                    .data
                    .get((source_frame + 1) * channels + channel)
                    .copied()
                    .unwrap_or(s0);
                output.push(s0 + (s1 - s0) * frac);
            }
        }

        DecodedSample {
            data: output,
            channel_count: self.channel_count,
            sample_rate: target_rate,
        }
    }
}

/// Decodes the first audio track of the given file. Any format symphonia knows
/// (MP3, WAV, FLAC, OGG, ...) is accepted.
pub fn decode_file(path: &Path) -> Result<DecodedSample, SampleError> {
    let name = path.display().to_string();
    let file = File::open(path)
        .map_err(|e| std::io::Error::new(e.kind(), format!("{}: {}", name, e)))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let probed = get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format_reader = probed.format;

    let track = format_reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| SampleError::NoTrack(name.clone()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channel_count = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);

    let mut decoder = get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut data: Vec<f32> = Vec::new();
    loop {
        let packet = match format_reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                if channel_count == 0 {
                    channel_count = spec.channels.count() as u16;
                }
                if sample_rate == 0 {
                    sample_rate = spec.rate;
                }
                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                data.extend_from_slice(buffer.samples());
            }
            // A corrupt packet only loses its own frames.
            Err(SymphoniaError::DecodeError(e)) => {
                debug!(path = name.as_str(), err = e, "Skipping undecodable packet");
            }
            Err(e) => return Err(e.into()),
        }
    }

    if sample_rate == 0 {
        return Err(SampleError::NoSampleRate(name));
    }
    if data.is_empty() || channel_count == 0 {
        return Err(SampleError::Empty(name));
    }

    Ok(DecodedSample {
        data,
        channel_count,
        sample_rate,
    })
}
