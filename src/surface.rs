//! Capability traits over the host's drawing state and window tree.
//!
//! The synthesizer, classifier and interceptor never call the OS directly;
//! they go through these two traits. `win32::GdiSurface` implements both for
//! a real `HDC`, tests implement them with an in-memory fake.

use crate::color::ColorRef;
use crate::font::FontDescription;

/// Opaque handle to a font object owned by the device layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontHandle(pub usize);

impl FontHandle {
    pub const NULL: FontHandle = FontHandle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Opaque handle to a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub usize);

/// Transient drawing state of one device context, for the duration of one
/// intercepted call. The context itself is owned by the caller.
pub trait DeviceContext {
    /// Font currently selected into the context.
    fn current_font(&self) -> FontHandle;

    /// Full copy of the logical description behind `font`, or `None` if the
    /// handle can't be read.
    fn describe_font(&self, font: FontHandle) -> Option<FontDescription>;

    /// Build a new font object. Returns [`FontHandle::NULL`] on failure.
    fn create_font(&self, description: &FontDescription) -> FontHandle;

    /// Select `font` into the context and return the previously selected one.
    fn select_font(&self, font: FontHandle) -> FontHandle;

    /// Release a font object created by [`DeviceContext::create_font`].
    fn delete_font(&self, font: FontHandle);

    fn background_color(&self) -> ColorRef;

    /// Set the text color and return the previous one.
    fn set_text_color(&self, color: ColorRef) -> ColorRef;

    /// Window the context draws into, if any. Memory and off-screen contexts
    /// have none.
    fn window(&self) -> Option<WindowHandle>;
}

/// Read-only window-tree metadata used by the context classifier.
pub trait WindowContextQuery {
    /// Registered class name of `window`, truncated by the query to its
    /// fixed buffer.
    fn class_name(&self, window: WindowHandle) -> Option<String>;

    fn parent(&self, window: WindowHandle) -> Option<WindowHandle>;
}
