use palette::Srgb;
use tracing::warn;

use super::LaunchpadError;

/// Highest intensity a single LED channel accepts.
pub const MAX_INTENSITY: i32 = 63;

/// An RGB color as the launchpad LEDs understand it, each channel in `0..=63`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Color {
    red: i32,
    green: i32,
    blue: i32,
}

impl Color {
    pub const OFF: Color = Color::preset(0, 0, 0);
    pub const RED: Color = Color::preset(63, 0, 0);
    pub const GREEN: Color = Color::preset(0, 63, 0);
    pub const BLUE: Color = Color::preset(0, 0, 63);
    pub const GOLD: Color = Color::preset(63, 31, 0);
    pub const PEACH: Color = Color::preset(63, 40, 25);
    pub const YELLOW: Color = Color::preset(63, 63, 0);

    /// Builds a color, falling back to [`Color::OFF`] with a warning if any
    /// channel is above [`MAX_INTENSITY`].
    pub fn new(red: i32, green: i32, blue: i32) -> Self {
        match Self::try_new(red, green, blue) {
            Ok(color) => color,
            Err(err) => {
                warn!("{err}, using off instead");
                Self::OFF
            }
        }
    }

    pub fn try_new(red: i32, green: i32, blue: i32) -> Result<Self, LaunchpadError> {
        Self::checked(red, green, blue).ok_or(LaunchpadError::ColorOutOfRange { red, green, blue })
    }

    /// The whole triple is rejected if one channel is too bright. Negative
    /// channels are let through here and rejected when the color is encoded.
    const fn checked(red: i32, green: i32, blue: i32) -> Option<Self> {
        if red > MAX_INTENSITY || green > MAX_INTENSITY || blue > MAX_INTENSITY {
            None
        } else {
            Some(Self { red, green, blue })
        }
    }

    const fn preset(red: i32, green: i32, blue: i32) -> Self {
        match Self::checked(red, green, blue) {
            Some(color) => color,
            None => panic!("preset color out of range"),
        }
    }

    pub const fn red(&self) -> i32 {
        self.red
    }

    pub const fn green(&self) -> i32 {
        self.green
    }

    pub const fn blue(&self) -> i32 {
        self.blue
    }
}

// 8-bit channels are scaled down to 6 bits
impl From<Srgb<u8>> for Color {
    fn from(color: Srgb<u8>) -> Self {
        Self::new(
            (color.red >> 2) as i32,
            (color.green >> 2) as i32,
            (color.blue >> 2) as i32,
        )
    }
}
