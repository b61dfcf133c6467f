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
use std::fmt;

/// The playable keys. The home row holds the naturals and the row above it the
/// sharps, giving one octave starting at C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    A,
    W,
    S,
    E,
    D,
    F,
    T,
    G,
    Y,
    H,
    U,
    J,
}

impl Key {
    /// Every playable key, in pitch order.
    pub const ALL: [Key; 12] = [
        Key::A,
        Key::W,
        Key::S,
        Key::E,
        Key::D,
        Key::F,
        Key::T,
        Key::G,
        Key::Y,
        Key::H,
        Key::U,
        Key::J,
    ];

    /// Looks up the key for a raw key identifier. The identifier is uppercased before
    /// matching, so "a" and "A" are the same key. Named keys like "Enter" never match.
    pub fn from_identifier(identifier: &str) -> Option<Key> {
        match identifier.to_uppercase().as_str() {
            "A" => Some(Key::A),
            "W" => Some(Key::W),
            "S" => Some(Key::S),
            "E" => Some(Key::E),
            "D" => Some(Key::D),
            "F" => Some(Key::F),
            "T" => Some(Key::T),
            "G" => Some(Key::G),
            "Y" => Some(Key::Y),
            "H" => Some(Key::H),
            "U" => Some(Key::U),
            "J" => Some(Key::J),
            _ => None,
        }
    }

    /// The uppercase name of the key. Asset files are named after this.
    pub fn as_str(self) -> &'static str {
        match self {
            Key::A => "A",
            Key::W => "W",
            Key::S => "S",
            Key::E => "E",
            Key::D => "D",
            Key::F => "F",
            Key::T => "T",
            Key::G => "G",
            Key::Y => "Y",
            Key::H => "H",
            Key::U => "U",
            Key::J => "J",
        }
    }

    /// The note this key plays.
    pub fn note(self) -> &'static str {
        match self {
            Key::A => "C",
            Key::W => "C#",
            Key::S => "D",
            Key::E => "D#",
            Key::D => "E",
            Key::F => "F",
            Key::T => "F#",
            Key::G => "G",
            Key::Y => "G#",
            Key::H => "A",
            Key::U => "A#",
            Key::J => "B",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
