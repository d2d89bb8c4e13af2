//! Native color packing and the luminance measure used to tell light
//! surfaces from dark ones.

/// A color in the device's native layout: `0x00BBGGRR`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ColorRef(pub u32);

impl ColorRef {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        ColorRef(r as u32 | (g as u32) << 8 | (b as u32) << 16)
    }

    pub const fn r(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    pub const fn b(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Perceived brightness, `(299 R + 587 G + 114 B) / 1000`, in 0..=255.
    ///
    /// Broadcast luma weighting; a plain channel average misreads saturated
    /// colors.
    pub const fn luminance(self) -> u32 {
        (self.r() as u32 * 299 + self.g() as u32 * 587 + self.b() as u32 * 114) / 1000
    }
}

/// User-configured text color, one integer per channel as read from settings.
///
/// Channels are kept as raw integers; only the low 8 bits of each take part
/// in [`ColorSetting::to_color_ref`], so `red: 300` behaves like `red: 44`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorSetting {
    pub red: i32,
    pub green: i32,
    pub blue: i32,
}

impl Default for ColorSetting {
    fn default() -> Self {
        // White text, matching the mod's shipped settings
        ColorSetting { red: 255, green: 255, blue: 255 }
    }
}

impl ColorSetting {
    pub const fn new(red: i32, green: i32, blue: i32) -> Self {
        ColorSetting { red, green, blue }
    }

    pub const fn to_color_ref(self) -> ColorRef {
        ColorRef::from_rgb(
            (self.red & 0xFF) as u8,
            (self.green & 0xFF) as u8,
            (self.blue & 0xFF) as u8,
        )
    }
}
