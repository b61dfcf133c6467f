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
use std::{io, time::Duration};

use tokio::{sync::mpsc::Sender, task::JoinHandle};
use tracing::{debug, info};

use super::KeyEvent;

/// A key source that replays a fixed list of key presses, in order, then finishes.
pub struct Source {
    keys: Vec<String>,
    interval: Duration,
}

impl Source {
    /// Creates a source that sends the given keys back to back.
    pub fn new<I, S>(keys: I) -> Source
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Source {
            keys: keys.into_iter().map(Into::into).collect(),
            interval: Duration::ZERO,
        }
    }

    /// Creates a source with one key press per character of the string.
    pub fn from_chars(keys: &str) -> Source {
        Source::new(keys.chars())
    }

    /// Waits the given interval before each key press after the first.
    pub fn with_interval(self, interval: Duration) -> Source {
        Source { interval, ..self }
    }
}

impl super::KeySource for Source {
    fn monitor_events(&self, events_tx: Sender<KeyEvent>) -> JoinHandle<Result<(), io::Error>> {
        let keys = self.keys.clone();
        let interval = self.interval;
        tokio::spawn(async move {
            info!(keys = keys.len(), "Script source started.");
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 && !interval.is_zero() {
                    tokio::time::sleep(interval).await;
                }
                debug!(key = key.as_str(), "Sending scripted key.");
                events_tx
                    .send(KeyEvent::new(key))
                    .await
                    .map_err(|e| io::Error::new(io::ErrorKind::BrokenPipe, e))?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod test {
    use std::{io, time::Duration};

    use tokio::sync::mpsc;

    use crate::input::{KeyEvent, KeySource};

    use super::Source;

    #[tokio::test]
    async fn test_replays_in_order() -> Result<(), io::Error> {
        let (sender, mut receiver) = mpsc::channel::<KeyEvent>(1);
        let handle = Source::new(["a", "Enter", "a"]).monitor_events(sender);

        let mut keys = Vec::new();
        while let Some(event) = receiver.recv().await {
            keys.push(event.key().to_string());
        }
        handle.await??;

        assert_eq!(vec!["a", "Enter", "a"], keys);
        Ok(())
    }

    #[tokio::test]
    async fn test_from_chars_with_interval() -> Result<(), io::Error> {
        let (sender, mut receiver) = mpsc::channel::<KeyEvent>(8);
        let started = tokio::time::Instant::now();
        let handle = Source::from_chars("sdf")
            .with_interval(Duration::from_millis(20))
            .monitor_events(sender);

        let mut keys = Vec::new();
        while let Some(event) = receiver.recv().await {
            keys.push(event.key().to_string());
        }
        handle.await??;

        assert_eq!(vec!["s", "d", "f"], keys);
        assert!(started.elapsed() >= Duration::from_millis(40));
        Ok(())
    }

    #[tokio::test]
    async fn test_closed_receiver_is_an_error() {
        let (sender, receiver) = mpsc::channel::<KeyEvent>(1);
        drop(receiver);
        let result = Source::from_chars("a").monitor_events(sender).await.unwrap();
        assert!(result.is_err());
    }
}
