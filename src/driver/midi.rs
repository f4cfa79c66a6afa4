//! Platform MIDI transport.
//!
//! A device is an input port and an output port that share a name. Devices
//! are numbered in the order the platform lists their input ports.

use midir::{
    MidiInput, MidiInputConnection, MidiInputPort, MidiOutput, MidiOutputConnection,
    MidiOutputPort,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to create midi client")]
    Init(#[from] midir::InitError),
    #[error("failed to read midi port info")]
    PortInfo(#[from] midir::PortInfoError),
    #[error("failed to connect to midi port: {0}")]
    Connect(String),
    #[error("failed to send midi message")]
    Send(#[from] midir::SendError),
    #[error("no midi device with index {0}")]
    NoSuchDevice(usize),
}

/// Anything raw outbound MIDI bytes can be handed to.
pub trait MidiOut {
    fn send(&mut self, message: &[u8]) -> Result<(), Error>;
}

impl MidiOut for MidiOutputConnection {
    fn send(&mut self, message: &[u8]) -> Result<(), Error> {
        MidiOutputConnection::send(self, message)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub index: usize,
    pub name: String,
}

/// An open device. Inbound messages go to the handler given to [`open`] for
/// as long as this is alive.
pub struct Device {
    pub info: DeviceInfo,
    pub input: MidiInputConnection<()>,
    pub output: MidiOutputConnection,
}

struct Ports {
    info: DeviceInfo,
    input: MidiInputPort,
    output: MidiOutputPort,
}

fn paired_ports(midi_in: &MidiInput, midi_out: &MidiOutput) -> Result<Vec<Ports>, Error> {
    let mut outputs = Vec::new();
    for port in midi_out.ports() {
        outputs.push((midi_out.port_name(&port)?, port));
    }

    let mut devices = Vec::new();
    for input in midi_in.ports() {
        let name = midi_in.port_name(&input)?;

        let output = match outputs.iter().find(|(n, _)| *n == name) {
            Some((_, port)) => port.clone(),
            None => {
                debug!("skipping input-only port {name:?}");
                continue;
            }
        };

        devices.push(Ports {
            info: DeviceInfo {
                index: devices.len(),
                name,
            },
            input,
            output,
        });
    }

    Ok(devices)
}

/// Lists the devices currently visible, queried fresh on every call.
pub fn list_devices(client_name: &str) -> Result<Vec<DeviceInfo>, Error> {
    let midi_in = MidiInput::new(client_name)?;
    let midi_out = MidiOutput::new(client_name)?;

    Ok(paired_ports(&midi_in, &midi_out)?
        .into_iter()
        .map(|ports| ports.info)
        .collect())
}

/// Connects to device `index`. `on_packet` runs on the transport's delivery
/// thread with every raw inbound batch, one batch at a time.
pub fn open<F>(index: usize, client_name: &str, mut on_packet: F) -> Result<Device, Error>
where
    F: FnMut(&[u8]) + Send + 'static,
{
    let midi_in = MidiInput::new(client_name)?;
    let midi_out = MidiOutput::new(client_name)?;

    let ports = paired_ports(&midi_in, &midi_out)?
        .into_iter()
        .nth(index)
        .ok_or(Error::NoSuchDevice(index))?;

    debug!("connecting to midi device {index} ({})", ports.info.name);

    let input = midi_in
        .connect(
            &ports.input,
            &format!("{client_name}-in"),
            move |_timestamp, message, _| on_packet(message),
            (),
        )
        .map_err(|err| Error::Connect(err.to_string()))?;

    let output = midi_out
        .connect(&ports.output, &format!("{client_name}-out"))
        .map_err(|err| Error::Connect(err.to_string()))?;

    Ok(Device {
        info: ports.info,
        input,
        output,
    })
}
