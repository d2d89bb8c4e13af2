//! Logical font descriptions and the font synthesizer.
//!
//! For every intercepted call the synthesizer copies the description of the
//! font currently selected into the device context, optionally swaps its
//! face name, builds a new font from it and selects that font in. The new
//! font comes back inside a [`FontGuard`], so it is released when the call
//! scope ends.

use crate::config::FaceNameOverride;
use crate::error::Error;
use crate::guard::FontGuard;
use crate::surface::DeviceContext;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Size of the fixed face-name buffer, in UTF-16 units, terminator included.
pub const FACE_NAME_LEN: usize = 32;

/// Longest face name that still leaves room for the terminator.
pub const MAX_FACE_NAME: usize = FACE_NAME_LEN - 1;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Platform-neutral copy of the native logical-font record.
///
/// Every attribute is carried through untouched; only `face_name` is ever
/// rewritten, and only through [`FontDescription::set_face_name`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FontDescription {
    pub height: i32,
    pub width: i32,
    pub escapement: i32,
    pub orientation: i32,
    pub weight: i32,            // 400=Normal, 700=Bold
    pub italic: u8,
    pub underline: u8,
    pub strike_out: u8,
    pub char_set: u8,
    pub out_precision: u8,
    pub clip_precision: u8,
    pub quality: u8,
    pub pitch_and_family: u8,
    pub face_name: [u16; FACE_NAME_LEN],
}

impl FontDescription {
    /// Face name up to the first terminator.
    pub fn face_name(&self) -> String {
        let end = self.face_name.iter().position(|&c| c == 0).unwrap_or(FACE_NAME_LEN);
        String::from_utf16_lossy(&self.face_name[..end])
    }

    /// Replace the face name.
    ///
    /// The whole buffer is zeroed before the new name is written, so nothing
    /// of a longer previous name survives. Names over [`MAX_FACE_NAME`] UTF-16
    /// units are rejected and leave the buffer untouched.
    pub fn set_face_name(&mut self, name: &str) -> Result<(), Error> {
        let units: Vec<u16> = name.encode_utf16().collect();
        if units.len() > MAX_FACE_NAME {
            return Err(Error::FaceNameTooLong {
                name: name.to_string(),
                len: units.len(),
                max: MAX_FACE_NAME,
            });
        }

        self.face_name = [0; FACE_NAME_LEN];
        self.face_name[..units.len()].copy_from_slice(&units);
        Ok(())
    }

    /// Apply the configured face-name override. A rejected name is logged
    /// and the current face name is kept.
    pub fn apply_override(&mut self, face_name: &FaceNameOverride) {
        let FaceNameOverride::Replace(name) = face_name else {
            return;
        };

        if let Err(Error::FaceNameTooLong { name, len, .. }) = self.set_face_name(name) {
            log::warn!("Trying to change font to \"{}\": size too long ({})", name, len);
        }
    }
}

/// A font built for one draw call, already selected into its context.
pub struct SynthesizedFont<'dc, D: DeviceContext + ?Sized> {
    pub font: FontGuard<'dc, D>,
    /// The description the font was built from, after the override.
    pub description: FontDescription,
}

// ============================================================================
// SYNTHESIS
// ============================================================================

/// Rebuild the context's current font with the configured face name and
/// select it in.
///
/// The previously selected font is not released; it is selected back when the
/// returned guard drops. Returns `None` if the current font can't be read or
/// the new one can't be created, in which case the context is left as it was.
pub fn synthesize_font<'dc, D>(dc: &'dc D, face_name: &FaceNameOverride) -> Option<SynthesizedFont<'dc, D>>
where
    D: DeviceContext + ?Sized,
{
    let current = dc.current_font();

    // Full copy: the source font's lifetime is not ours
    let Some(mut description) = dc.describe_font(current) else {
        log::debug!("synthesize_font: could not read current font {:?}", current);
        return None;
    };

    description.apply_override(face_name);

    let font = dc.create_font(&description);
    if font.is_null() {
        log::debug!("synthesize_font: font creation failed for \"{}\"", description.face_name());
        return None;
    }

    let previous = dc.select_font(font);

    Some(SynthesizedFont {
        font: FontGuard::selected(dc, font, previous),
        description,
    })
}
