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
// Core voice mixing logic that's independent of any audio backend.
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use parking_lot::Mutex;

use super::sample::DecodedSample;

/// Global atomic counter for generating unique voice IDs.
static VOICE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// A single playing instance of a sample.
struct Voice {
    /// Unique ID for this voice.
    id: u64,
    /// The sample being played. Must already be at the mixer's sample rate.
    sample: DecodedSample,
    /// The next frame to play.
    position: usize,
}

impl Voice {
    fn is_finished(&self) -> bool {
        self.position >= self.sample.frames()
    }

    /// Adds the voice's current frame into the output frame and advances.
    fn mix_frame(&mut self, frame: &mut [f32]) {
        let source_channels = self.sample.channel_count() as usize;
        let start = self.position * source_channels;
        let source = &self.sample.data()[start..start + source_channels];

        if source_channels == 1 {
            for out in frame.iter_mut() {
                *out += source[0];
            }
        } else if frame.len() == 1 {
            frame[0] += source.iter().sum::<f32>() / source_channels as f32;
        } else {
            for (out, sample) in frame.iter_mut().zip(source.iter()) {
                *out += sample;
            }
        }

        self.position += 1;
    }
}

/// Sums every active voice into an interleaved output stream. There is no limit on the
/// number of voices; a voice is dropped once it has played its last frame.
#[derive(Clone)]
pub struct AudioMixer {
    voices: Arc<Mutex<Vec<Voice>>>,
    num_channels: u16,
    sample_rate: u32,
}

impl AudioMixer {
    /// Creates a new audio mixer.
    pub fn new(num_channels: u16, sample_rate: u32) -> Self {
        Self {
            voices: Arc::new(Mutex::new(Vec::new())),
            num_channels,
            sample_rate,
        }
    }

    /// Starts a new voice for the sample and returns its ID. The sample is expected to
    /// be at the mixer's sample rate already.
    pub fn add_voice(&self, sample: DecodedSample) -> u64 {
        let id = VOICE_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.voices.lock().push(Voice {
            id,
            sample,
            position: 0,
        });
        id
    }

    /// Returns the IDs of the voices that are still playing.
    pub fn active_voices(&self) -> Vec<u64> {
        self.voices.lock().iter().map(|voice| voice.id).collect()
    }

    /// Mixes into an interleaved output buffer. Any trailing partial frame is zeroed.
    pub fn process_into(&self, output: &mut [f32]) {
        output.fill(0.0);
        let channels = self.num_channels as usize;
        if channels == 0 {
            return;
        }

        let mut voices = self.voices.lock();
        for frame in output.chunks_exact_mut(channels) {
            for voice in voices.iter_mut() {
                if !voice.is_finished() {
                    voice.mix_frame(frame);
                }
            }
            for sample in frame.iter_mut() {
                *sample = sample.clamp(-1.0, 1.0);
            }
        }
        voices.retain(|voice| !voice.is_finished());
    }

    /// Mixes the given number of frames into a new buffer.
    pub fn process_frames(&self, num_frames: usize) -> Vec<f32> {
        let mut frames = vec![0.0f32; num_frames * self.num_channels as usize];
        self.process_into(&mut frames);
        frames
    }

    /// Gets the sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
