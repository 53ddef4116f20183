//! Packing of RGB triples into the single integer slot each pixel owns.

use std::fmt;

use serde::{Deserialize, Serialize};

const RED_WEIGHT: u32 = 65_536;
const GREEN_WEIGHT: u32 = 256;

/// Colour expressed as three byte channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Pure black, the colour every freshly spawned pixel starts with.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Creates a colour from byte components.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Creates a colour from loosely typed components such as slider values.
    ///
    /// Each component is rounded to the nearest integer and clamped into
    /// `0..=255`. NaN reads as zero; infinities clamp to the nearest bound.
    #[must_use]
    pub fn from_lossy(red: f64, green: f64, blue: f64) -> Self {
        Self::new(channel(red), channel(green), channel(blue))
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Packs the colour into its integer slot representation.
    #[must_use]
    pub const fn pack(self) -> PackedColor {
        PackedColor::pack(self.red, self.green, self.blue)
    }

    /// Renders the colour as six uppercase hexadecimal digits.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGB({},{},{})", self.red, self.green, self.blue)
    }
}

/// Single non-negative integer holding `r * 65536 + g * 256 + b`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedColor(u32);

impl PackedColor {
    /// Packed representation of black.
    pub const ZERO: Self = Self(0);

    /// Packs byte channels. The byte domain makes packing total, so no
    /// clamping happens here.
    #[must_use]
    pub const fn pack(red: u8, green: u8, blue: u8) -> Self {
        Self(red as u32 * RED_WEIGHT + green as u32 * GREEN_WEIGHT + blue as u32)
    }

    /// Wraps a raw slot value exactly as it was read from storage.
    #[must_use]
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Raw integer stored in a pixel slot.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Splits the value back into its channels by division and modulo.
    ///
    /// Values above `0xFF_FFFF` are not rejected; the red channel keeps
    /// only its low byte.
    #[must_use]
    pub const fn unpack(self) -> Rgb {
        let red = (self.0 / RED_WEIGHT) as u8;
        let green = ((self.0 % RED_WEIGHT) / GREEN_WEIGHT) as u8;
        let blue = (self.0 % GREEN_WEIGHT) as u8;
        Rgb::new(red, green, blue)
    }
}

impl From<Rgb> for PackedColor {
    fn from(color: Rgb) -> Self {
        color.pack()
    }
}

impl From<PackedColor> for Rgb {
    fn from(packed: PackedColor) -> Self {
        packed.unpack()
    }
}

/// Renders arbitrary numeric channels as six uppercase hexadecimal digits,
/// rounding and clamping each into `0..=255` first.
#[must_use]
pub fn to_hex(red: f64, green: f64, blue: f64) -> String {
    Rgb::from_lossy(red, green, blue).to_hex()
}

fn channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}
