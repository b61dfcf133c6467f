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
use std::io;

use tokio::{sync::mpsc::Sender, task::JoinHandle};

pub mod script;
pub mod terminal;

/// The identifier a source reports for the end of a line.
pub const ENTER: &str = "Enter";

/// A single key press, as reported by a key source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    key: String,
}

impl KeyEvent {
    /// Creates a new key event with the given raw identifier.
    pub fn new(key: impl Into<String>) -> KeyEvent {
        KeyEvent { key: key.into() }
    }

    /// The raw key identifier: a single character or a named key like "Enter".
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Something that produces key presses. The source sends events until it runs out,
/// then drops the sender, which ends the piano.
pub trait KeySource: Send + Sync + 'static {
    fn monitor_events(&self, events_tx: Sender<KeyEvent>) -> JoinHandle<Result<(), io::Error>>;
}
