//! Driver for the Novation Launchpad MK2 grid controller.
//!
//! Button presses arrive as note-on and control-change messages on channel 1;
//! LEDs are set one at a time with an RGB SysEx command.

use std::ops::{Deref, DerefMut};

use midir::{MidiInputConnection, MidiOutputConnection};
use thiserror::Error;
use tracing::trace;

use crate::driver::midi::{self, DeviceInfo, MidiOut};

pub mod button;
pub mod color;
pub mod packet;

use button::ButtonAddress;
use color::Color;
use packet::ButtonEvent;

#[derive(Debug, Error)]
pub enum Error {
    #[error("midi transport error")]
    Midi(#[from] midi::Error),
    #[error("launchpad protocol error")]
    Launchpad(#[from] LaunchpadError),
}

#[derive(Debug, Error)]
pub enum LaunchpadError {
    #[error("color ({red}, {green}, {blue}) is out of range")]
    ColorOutOfRange { red: i32, green: i32, blue: i32 },
    #[error("{field} value {value} does not fit in a byte")]
    ByteOutOfRange { field: &'static str, value: i32 },
}

/// Outbound half of a launchpad: turns light requests into SysEx and hands
/// them to `O`. Nothing is acknowledged or retried.
pub struct Launchpad<O: MidiOut> {
    output: O,
}

impl<O: MidiOut> Launchpad<O> {
    pub fn new(output: O) -> Self {
        Self { output }
    }

    pub fn light(&mut self, address: ButtonAddress, color: Color) -> Result<(), Error> {
        let packet = packet::encode_light_command(address, color)?;
        trace!("lighting {address:?} with {color:?}");
        self.output.send(&packet)?;
        Ok(())
    }

    pub fn light_all(&mut self, color: Color) -> Result<(), Error> {
        for address in ButtonAddress::all() {
            self.light(address, color)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), Error> {
        self.light_all(Color::OFF)
    }
}

/// A launchpad connected over the platform MIDI service.
///
/// The event handler is called from the transport's delivery thread, once per
/// decoded event and in arrival order. It is never called concurrently with
/// itself.
pub struct Session {
    launchpad: Launchpad<MidiOutputConnection>,
    info: DeviceInfo,
    _input: MidiInputConnection<()>,
}

impl Session {
    pub fn open<F>(index: usize, client_name: &str, mut handler: F) -> Result<Self, Error>
    where
        F: FnMut(ButtonEvent) + Send + 'static,
    {
        let device = midi::open(index, client_name, move |packet| {
            for event in packet::decode_inbound(packet) {
                trace!("received event {event:?}");
                handler(event);
            }
        })?;

        Ok(Self {
            launchpad: Launchpad::new(device.output),
            info: device.info,
            _input: device.input,
        })
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }
}

impl Deref for Session {
    type Target = Launchpad<MidiOutputConnection>;

    fn deref(&self) -> &Self::Target {
        &self.launchpad
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.launchpad
    }
}

#[cfg(test)]
mod test {
    use super::{
        button::{ButtonAddress, ButtonKind},
        color::Color,
        midi, Error, Launchpad, LaunchpadError, MidiOut,
    };

    #[derive(Default)]
    struct Recorder(Vec<Vec<u8>>);

    impl MidiOut for Recorder {
        fn send(&mut self, message: &[u8]) -> Result<(), midi::Error> {
            self.0.push(message.to_vec());
            Ok(())
        }
    }

    #[test]
    fn light_sends_one_command() {
        let mut lp = Launchpad::new(Recorder::default());
        lp.light(ButtonAddress::from_row_column(0, 0), Color::GREEN)
            .unwrap();

        assert_eq!(
            lp.output.0,
            vec![vec![0xF0, 0x00, 0x20, 0x29, 0x02, 0x18, 0x0B, 11, 0, 63, 0, 0xF7]]
        );
    }

    #[test]
    fn light_out_of_range_sends_nothing() {
        let mut lp = Launchpad::new(Recorder::default());
        let err = lp
            .light(ButtonAddress::from_raw_key(-5), Color::RED)
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Launchpad(LaunchpadError::ByteOutOfRange { field: "key", .. })
        ));
        assert!(lp.output.0.is_empty());
    }

    #[test]
    fn clear_turns_every_button_off() {
        let mut lp = Launchpad::new(Recorder::default());
        lp.clear().unwrap();

        assert_eq!(lp.output.0.len(), 80);
        assert!(lp.output.0.iter().all(|m| m[8..11] == [0, 0, 0]));

        // the top keys cleared are the ones inbound top events carry
        let top_keys: Vec<u8> = lp.output.0.iter().map(|m| m[7]).filter(|&k| k > 100).collect();
        assert_eq!(top_keys, (101..=108).collect::<Vec<u8>>());
        assert!(top_keys
            .iter()
            .all(|&k| ButtonAddress::from_raw_key(k as i32).kind() == ButtonKind::Top));
    }

    #[test]
    fn transport_errors_propagate() {
        struct Broken;

        impl MidiOut for Broken {
            fn send(&mut self, _: &[u8]) -> Result<(), midi::Error> {
                Err(midi::Error::NoSuchDevice(0))
            }
        }

        let mut lp = Launchpad::new(Broken);
        let err = lp.light_all(Color::BLUE).unwrap_err();
        assert!(matches!(err, Error::Midi(midi::Error::NoSuchDevice(0))));
    }
}
