//! Scoped ownership of a synthesized font.

use crate::surface::{DeviceContext, FontHandle};

/// Owns one font created for a single draw call and releases it exactly once
/// when dropped, whichever way the owning scope exits.
///
/// When the guard also knows which font was selected before it, that font is
/// selected back first, so the context never keeps a deleted font selected.
///
/// Deliberately not `Clone`: two guards over one handle would release twice.
pub struct FontGuard<'dc, D: DeviceContext + ?Sized> {
    dc: &'dc D,
    font: FontHandle,
    previous: Option<FontHandle>,
}

impl<'dc, D: DeviceContext + ?Sized> FontGuard<'dc, D> {
    /// Take ownership of `font`, which is not selected anywhere.
    pub fn new(dc: &'dc D, font: FontHandle) -> Self {
        FontGuard { dc, font, previous: None }
    }

    /// Take ownership of `font`, currently selected into `dc` in place of
    /// `previous`.
    pub fn selected(dc: &'dc D, font: FontHandle, previous: FontHandle) -> Self {
        FontGuard { dc, font, previous: Some(previous) }
    }

    /// The owned handle. Stays valid for as long as the guard lives.
    pub fn get(&self) -> FontHandle {
        self.font
    }
}

impl<D: DeviceContext + ?Sized> Drop for FontGuard<'_, D> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            if !previous.is_null() {
                self.dc.select_font(previous);
            }
        }

        // GDI tolerates DeleteObject(NULL) but nothing requires every backend to
        if self.font.is_null() {
            log::trace!("FontGuard: null font, nothing to release");
            return;
        }
        self.dc.delete_font(self.font);
    }
}
