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
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::{crate_version, Args, Parser, Subcommand};
use duration_string::DurationString;
use tracing_subscriber::EnvFilter;
use vpiano::assets::AssetLayout;
use vpiano::dispatcher::Dispatcher;
use vpiano::input::{script, terminal, KeySource};
use vpiano::key::Key;
use vpiano::piano::Piano;
use vpiano::{audio, config};

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A virtual piano for the terminal."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

/// Arguments that decide where the samples come from.
#[derive(Args)]
struct LayoutArgs {
    /// The path to the piano config.
    #[arg[short, long]]
    config: Option<String>,
    /// The directory holding one sample per key. Overrides the config.
    #[arg[short, long]]
    assets: Option<String>,
    /// The extension of the sample files. Overrides the config.
    #[arg[short, long]]
    extension: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Plays samples as keys are typed into the terminal.
    Play {
        #[command(flatten)]
        layout: LayoutArgs,
        /// The device name to play through. Overrides the config.
        #[arg[short, long]]
        device: Option<String>,
        /// Plays these keys, one per character, instead of reading the terminal.
        #[arg[short, long]]
        keys: Option<String>,
        /// The time between scripted keys.
        #[arg[short, long, default_value = "250ms"]]
        interval: String,
        /// How long to keep playing after the last key.
        #[arg[short, long, default_value = "2s"]]
        linger: String,
    },
    /// Lists the available audio output devices.
    Devices {},
    /// Prints the keyboard layout and the sample each key plays.
    Keys {
        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Checks that every key's sample exists and can be decoded.
    Verify {
        #[command(flatten)]
        layout: LayoutArgs,
    },
}

/// Loads the config and applies the layout overrides from the command line.
fn load_config(layout: LayoutArgs) -> Result<(config::Piano, AssetLayout), Box<dyn Error>> {
    let piano = config::Piano::load(layout.config.as_deref().map(Path::new))?;
    let assets = piano
        .assets()
        .merge(layout.assets, layout.extension)
        .layout();
    Ok((piano, assets))
}

fn parse_duration(duration: String) -> Result<Duration, Box<dyn Error>> {
    Ok(DurationString::from_string(duration)?.into())
}

fn print_layout(assets: &AssetLayout) {
    println!("Keys (samples: {}):", assets);
    for key in Key::ALL {
        println!(
            "- {} plays {:<2} ({})",
            key,
            key.note(),
            assets.path_for(key).display()
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            layout,
            device,
            keys,
            interval,
            linger,
        } => {
            let interval = parse_duration(interval)?;
            let linger = parse_duration(linger)?;
            let (piano_config, assets) = load_config(layout)?;
            let audio_config = match device {
                Some(device) => piano_config.audio().with_device(&device),
                None => piano_config.audio().clone(),
            };
            let device = audio::get_device(&audio_config)?;
            println!("Playing through {}.", device);

            let source: Arc<dyn KeySource> = match &keys {
                Some(keys) => Arc::new(script::Source::from_chars(keys).with_interval(interval)),
                None => {
                    print_layout(&assets);
                    println!("Type keys and press enter to play them. Ctrl-D quits.");
                    Arc::new(terminal::Source::new())
                }
            };

            Piano::new(Dispatcher::new(device, assets), source)
                .join()
                .await?;

            tokio::time::sleep(linger).await;
        }
        Commands::Devices {} => {
            let devices = audio::list_devices()?;

            if devices.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!("Devices:");
            for device in devices {
                println!("- {}", device);
            }
        }
        Commands::Keys { layout } => {
            let (_, assets) = load_config(layout)?;
            print_layout(&assets);
        }
        Commands::Verify { layout } => {
            let (_, assets) = load_config(layout)?;
            let statuses = assets.verify();
            let failed = statuses
                .iter()
                .filter(|status| status.result.is_err())
                .count();

            println!("Samples ({}):", assets);
            for status in statuses.iter() {
                println!("- {}", status);
            }

            if failed > 0 {
                return Err(format!("{} of {} samples failed", failed, statuses.len()).into());
            }
        }
    }

    Ok(())
}
