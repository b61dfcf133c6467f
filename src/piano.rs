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

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, span, Instrument, Level};

use crate::dispatcher::Dispatcher;
use crate::input::KeySource;

/// Feeds key presses from a single source to the dispatcher.
pub struct Piano {
    handle: JoinHandle<()>,
}

impl Piano {
    /// Creates a new piano listening to the given source. Must be called from within a
    /// tokio runtime.
    pub fn new(dispatcher: Dispatcher, source: Arc<dyn KeySource>) -> Piano {
        Piano {
            handle: tokio::spawn(
                Piano::handle_events(dispatcher, source).instrument(span!(Level::INFO, "piano")),
            ),
        }
    }

    /// Join will block until the source runs out of key presses.
    pub async fn join(&mut self) -> Result<(), JoinError> {
        (&mut self.handle).await
    }

    /// Hands each key press to the dispatcher as it arrives.
    async fn handle_events(dispatcher: Dispatcher, source: Arc<dyn KeySource>) {
        let (events_tx, mut events_rx) = mpsc::channel(16);
        let join_handle = source.monitor_events(events_tx);

        info!(assets = %dispatcher.assets(), "Piano started.");

        while let Some(event) = events_rx.recv().await {
            dispatcher.on_key_press(&event);
        }

        info!("Piano closing.");
        match join_handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("Key source failed: {}", e),
            Err(e) => error!("Error waiting for key source to stop: {}", e),
        }
    }
}

#[cfg(test)]
mod test {
    use std::{
        error::Error,
        io,
        path::PathBuf,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    use tokio::{sync::mpsc::Sender, task::JoinHandle};

    use crate::{
        assets::AssetLayout,
        audio::{self, mock},
        dispatcher::Dispatcher,
        input::{script, KeyEvent, KeySource},
    };

    use super::Piano;

    /// Wraps a source and counts how many times it was registered.
    struct CountingSource {
        inner: script::Source,
        registrations: Arc<AtomicUsize>,
    }

    impl KeySource for CountingSource {
        fn monitor_events(
            &self,
            events_tx: Sender<KeyEvent>,
        ) -> JoinHandle<Result<(), io::Error>> {
            self.registrations.fetch_add(1, Ordering::SeqCst);
            self.inner.monitor_events(events_tx)
        }
    }

    fn mock_dispatcher() -> (Dispatcher, mock::Device) {
        let mock_device = mock::Device::get("mock");
        let device: Arc<dyn audio::Device> = Arc::new(mock_device.clone());
        (
            Dispatcher::new(device, AssetLayout::new("samples", "wav")),
            mock_device,
        )
    }

    #[tokio::test]
    async fn test_one_request_per_event() -> Result<(), Box<dyn Error>> {
        let (dispatcher, device) = mock_dispatcher();
        let registrations = Arc::new(AtomicUsize::new(0));
        let source = Arc::new(CountingSource {
            inner: script::Source::from_chars("asdfasdf"),
            registrations: registrations.clone(),
        });

        let mut piano = Piano::new(dispatcher, source);
        piano.join().await?;

        assert_eq!(1, registrations.load(Ordering::SeqCst));
        let expected: Vec<PathBuf> = "ASDFASDF"
            .chars()
            .map(|key| PathBuf::from(format!("samples/{}.wav", key)))
            .collect();
        assert_eq!(expected, device.requests());
        Ok(())
    }

    #[tokio::test]
    async fn test_mixed_input_in_order() -> Result<(), Box<dyn Error>> {
        let (dispatcher, device) = mock_dispatcher();
        let source = Arc::new(script::Source::new([
            "w", "Enter", "1", "e", "ArrowUp", "T", "t", "z", "y", "u",
        ]));

        let mut piano = Piano::new(dispatcher, source);
        piano.join().await?;

        let expected: Vec<PathBuf> = ["W", "E", "T", "T", "Y", "U"]
            .iter()
            .map(|key| PathBuf::from(format!("samples/{}.wav", key)))
            .collect();
        assert_eq!(expected, device.requests());
        Ok(())
    }

    #[tokio::test]
    async fn test_failing_device_keeps_handling_events() -> Result<(), Box<dyn Error>> {
        let mock_device = mock::Device::failing("mock-failing");
        let device: Arc<dyn audio::Device> = Arc::new(mock_device.clone());
        let dispatcher = Dispatcher::new(device, AssetLayout::new("missing", "mp3"));

        let mut piano = Piano::new(dispatcher, Arc::new(script::Source::from_chars("hjh")));
        piano.join().await?;

        assert_eq!(3, mock_device.requests().len());
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_source_finishes() -> Result<(), Box<dyn Error>> {
        let (dispatcher, device) = mock_dispatcher();
        let mut piano = Piano::new(dispatcher, Arc::new(script::Source::from_chars("")));
        piano.join().await?;
        assert!(device.requests().is_empty());
        Ok(())
    }
}
