//! RGB565 color encoding

/// Pack 8-bit channels into RGB565
///
/// Keeps the top 5 bits of red, 6 of green and 5 of blue.
pub const fn to_rgb565(r: u8, g: u8, b: u8) -> u16 {
    let r = (r >> 3) as u16;
    let g = (g >> 2) as u16;
    let b = (b >> 3) as u16;
    (r << 11) | (g << 5) | b
}

/// A display color in RGB565
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color(u16);

impl Color {
    pub const RED: Color = Color(0xF800);
    pub const GREEN: Color = Color(0x07E0);
    pub const BLUE: Color = Color(0x001F);
    pub const BLACK: Color = Color(0x0000);
    pub const YELLOW: Color = Color(0xFFE0);
    pub const WHITE: Color = Color(0xFFFF);

    /// Wrap a raw RGB565 value
    pub const fn from_raw(value: u16) -> Self {
        Self(value)
    }

    /// Convert from 8-bit channels
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(to_rgb565(r, g, b))
    }

    /// Raw RGB565 value
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl From<u16> for Color {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for Color {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#06X}", self.0)
    }
}
