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
use tracing::{info, span, Level};

use super::{KeyEvent, ENTER};

/// A key source that reads lines typed into the terminal. Each character of a line is
/// one key press, and the end of the line is an Enter press.
pub struct Source {}

impl Source {
    pub fn new() -> Source {
        Source {}
    }

    /// Reads one line and sends its key presses. Returns false at end of input.
    fn monitor_io<R>(events_tx: &Sender<KeyEvent>, mut reader: R) -> Result<bool, io::Error>
    where
        R: io::BufRead,
    {
        let mut input: String = String::default();
        if reader.read_line(&mut input)? == 0 {
            return Ok(false);
        }

        let (line, ended) = match input.strip_suffix('\n') {
            Some(line) => (line.strip_suffix('\r').unwrap_or(line), true),
            None => (input.as_str(), false),
        };

        let mut events: Vec<KeyEvent> = line.chars().map(KeyEvent::new).collect();
        if ended {
            events.push(KeyEvent::new(ENTER));
        }

        for event in events {
            if events_tx.blocking_send(event).is_err() {
                // Nobody is listening anymore.
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Default for Source {
    fn default() -> Self {
        Source::new()
    }
}

impl super::KeySource for Source {
    fn monitor_events(&self, events_tx: Sender<KeyEvent>) -> JoinHandle<Result<(), io::Error>> {
        tokio::task::spawn_blocking(move || {
            let span = span!(Level::INFO, "terminal source");
            let _enter = span.enter();

            info!("Terminal source started.");

            while Self::monitor_io(&events_tx, io::stdin().lock())? {}

            info!("Terminal source finished.");
            Ok(())
        })
    }
}

#[cfg(test)]
mod test {
    use std::io::{self, BufReader};

    use tokio::sync::mpsc;

    use crate::input::{KeyEvent, ENTER};

    use super::Source;

    fn get_events(input: &str) -> Result<(Vec<KeyEvent>, bool), io::Error> {
        let (sender, mut receiver) = mpsc::channel::<KeyEvent>(64);

        let reader = BufReader::new(input.as_bytes());
        let more = Source::monitor_io(&sender, reader)?;

        // Force the sender to close.
        drop(sender);
        let mut events = Vec::new();
        while let Some(event) = receiver.blocking_recv() {
            events.push(event);
        }
        Ok((events, more))
    }

    fn keys(events: &[KeyEvent]) -> Vec<&str> {
        events.iter().map(|event| event.key()).collect()
    }

    #[test]
    fn test_line_becomes_key_presses() -> Result<(), io::Error> {
        let (events, more) = get_events("aSd\n")?;
        assert!(more);
        assert_eq!(vec!["a", "S", "d", ENTER], keys(&events));
        Ok(())
    }

    #[test]
    fn test_crlf_is_one_enter() -> Result<(), io::Error> {
        let (events, _) = get_events("j\r\n")?;
        assert_eq!(vec!["j", ENTER], keys(&events));
        Ok(())
    }

    #[test]
    fn test_only_first_line_is_read() -> Result<(), io::Error> {
        let (events, _) = get_events("a b\nzz\n")?;
        assert_eq!(vec!["a", " ", "b", ENTER], keys(&events));
        Ok(())
    }

    #[test]
    fn test_last_line_without_newline() -> Result<(), io::Error> {
        let (events, more) = get_events("wet")?;
        assert!(more);
        assert_eq!(vec!["w", "e", "t"], keys(&events));
        Ok(())
    }

    #[test]
    fn test_end_of_input() -> Result<(), io::Error> {
        let (events, more) = get_events("")?;
        assert!(!more);
        assert!(events.is_empty());
        Ok(())
    }
}
