use bytes::Buf;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::{button::ButtonAddress, color::Color, LaunchpadError};

pub const SYSEX_START: u8 = 0xF0;
pub const SYSEX_END: u8 = 0xF7;

/// Novation manufacturer id followed by the launchpad device id.
pub const HEADER: [u8; 5] = [0x00, 0x20, 0x29, 0x02, 0x18];

pub mod commands {
    pub const SET_LED_RGB: u8 = 0x0B;
}

pub const LIGHT_COMMAND_LEN: usize = 12;
pub const CHANNEL_MESSAGE_LEN: usize = 3;

pub type LightCommand = [u8; LIGHT_COMMAND_LEN];

/// Channel 1 status bytes that carry button presses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum Status {
    /// Pads and side buttons
    NoteOn = 0x90,

    /// Top buttons
    ControlChange = 0xB0,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ButtonEvent {
    pub address: ButtonAddress,
    pub is_on: bool,
    pub velocity: i32,
}

fn to_byte(field: &'static str, value: i32) -> Result<u8, LaunchpadError> {
    u8::try_from(value).map_err(|_| LaunchpadError::ByteOutOfRange { field, value })
}

/// Builds the SysEx message that sets one button's LED to an RGB color.
pub fn encode_light_command(
    address: ButtonAddress,
    color: Color,
) -> Result<LightCommand, LaunchpadError> {
    let mut packet = [0u8; LIGHT_COMMAND_LEN];

    packet[0] = SYSEX_START;
    packet[1..6].copy_from_slice(&HEADER);
    packet[6] = commands::SET_LED_RGB;
    packet[7] = to_byte("key", address.raw_key())?;
    packet[8] = to_byte("red", color.red())?;
    packet[9] = to_byte("green", color.green())?;
    packet[10] = to_byte("blue", color.blue())?;
    packet[11] = SYSEX_END;

    Ok(packet)
}

/// Button events in a batch of 3-byte channel messages, in order.
///
/// Messages with other status bytes are skipped, as is a trailing group
/// shorter than 3 bytes.
pub fn decode_inbound(packet: &[u8]) -> InboundEvents<'_> {
    InboundEvents { buf: packet }
}

pub struct InboundEvents<'a> {
    buf: &'a [u8],
}

impl Iterator for InboundEvents<'_> {
    type Item = ButtonEvent;

    fn next(&mut self) -> Option<ButtonEvent> {
        while self.buf.remaining() >= CHANNEL_MESSAGE_LEN {
            let status = self.buf.get_u8();
            let key = self.buf.get_u8();
            let velocity = self.buf.get_u8() as i32;

            if Status::from_u8(status).is_some() {
                return Some(ButtonEvent {
                    address: ButtonAddress::from_raw_key(key as i32),
                    is_on: velocity != 0,
                    velocity,
                });
            }
        }

        None
    }
}
