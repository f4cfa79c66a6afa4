//! Button input and RGB lighting for the Novation Launchpad MK2 over MIDI.

pub mod controller;
pub mod driver;
