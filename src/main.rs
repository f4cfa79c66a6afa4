use std::time::Duration;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use palette::Srgb;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use padlight::{
    controller::{self, Command, Event},
    driver::{
        midi,
        novation::launchpad::{button::ButtonKind, color::Color},
    },
};

/// Lights up the buttons of a Launchpad MK2 as they are pressed.
#[derive(Parser, Debug)]
#[command(name = "padlight")]
struct Args {
    /// Name this program registers with the MIDI service
    #[arg(long, global = true, default_value = "padlight")]
    client_name: String,

    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// List MIDI devices with their indices
    List,

    /// Light buttons on a device while they are held down
    Run {
        /// Device index, as printed by `list`
        #[arg(short, long, default_value_t = 0)]
        device: usize,

        /// Color of a held grid pad, as `#rrggbb`
        #[arg(long, default_value = "#00ff00", value_parser = parse_color)]
        pad_color: Color,

        /// Color of a held side button, as `#rrggbb`
        #[arg(long, default_value = "#0000ff", value_parser = parse_color)]
        side_color: Color,

        /// Color of a held top button, as `#rrggbb`
        #[arg(long, default_value = "#ff7c00", value_parser = parse_color)]
        top_color: Color,
    },
}

fn parse_color(s: &str) -> Result<Color, String> {
    s.parse::<Srgb<u8>>()
        .map(Color::from)
        .map_err(|_| format!("invalid color {s:?}, expected #rrggbb"))
}

#[derive(Debug, Clone, Copy)]
struct ButtonColors {
    pad: Color,
    side: Color,
    top: Color,
}

impl ButtonColors {
    fn for_kind(&self, kind: ButtonKind) -> Color {
        match kind {
            ButtonKind::Pad => self.pad,
            ButtonKind::Side => self.side,
            ButtonKind::Top => self.top,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    match args.command {
        Mode::List => {
            for device in midi::list_devices(&args.client_name)? {
                println!("{}: {}", device.index, device.name);
            }
            Ok(())
        }
        Mode::Run {
            device,
            pad_color,
            side_color,
            top_color,
        } => {
            let colors = ButtonColors {
                pad: pad_color,
                side: side_color,
                top: top_color,
            };
            run(device, args.client_name, colors)
        }
    }
}

fn run(device: usize, client_name: String, colors: ButtonColors) -> anyhow::Result<()> {
    let ct = CancellationToken::new();

    let handler_ct = ct.clone();
    ctrlc::set_handler(move || {
        info!("received ctrl+c, exiting");
        handler_ct.cancel();
    })?;

    let (cmd_tx, cmd_rx) = flume::bounded(256);
    let (evt_tx, evt_rx) = flume::bounded(256);

    let join = controller::spawn_thread(ct.clone(), device, client_name, cmd_rx, evt_tx);

    while !ct.is_cancelled() {
        match evt_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(Event::Button(evt)) => {
                debug!(
                    "{:?} {} at velocity {}",
                    evt.address,
                    if evt.is_on { "pressed" } else { "released" },
                    evt.velocity
                );

                let color = if evt.is_on {
                    colors.for_kind(evt.address.kind())
                } else {
                    Color::OFF
                };

                if cmd_tx
                    .send(Command::Light {
                        address: evt.address,
                        color,
                    })
                    .is_err()
                {
                    break;
                }
            }
            Err(flume::RecvTimeoutError::Timeout) => {}
            Err(flume::RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!("stopping controller");
    ct.cancel();

    join.join()
        .map_err(|_| anyhow!("controller thread panicked"))??;

    info!("exit");

    Ok(())
}
