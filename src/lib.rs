//! Explorer Font - runtime font and text-color override for Explorer file views
//!
//! This crate sits between a host process and the two Win32 text-drawing
//! entry points (`DrawTextW` and `DrawTextExW`). Every intercepted call:
//! 1. gets a freshly synthesized font (optionally with a different face name)
//!    selected into its device context,
//! 2. gets its text color replaced, but only when the surface is a dark
//!    file-list view,
//! 3. is forwarded unchanged to the original implementation.
//!
//! ## Architecture Overview
//!
//! Leaves first:
//! - [`guard`]     - `FontGuard`, exactly-once release of a synthesized font
//! - [`font`]      - `FontDescription` and the font synthesizer
//! - [`classify`]  - light/dark background and file-list surface detection
//! - [`intercept`] - the per-call protocol shared by both entry points
//! - [`lifecycle`] - init / settings-changed / uninit, hook registration
//!
//! All window and device-context access goes through the capability traits
//! in [`surface`], so everything above runs against fakes in tests. The real
//! GDI/user32 backend lives in `win32` and only exists on Windows.
//!
//! The hooking facility, the settings store and the mod loader are external
//! collaborators; this crate only consumes the narrow interfaces described in
//! [`lifecycle::HookInstaller`], [`lifecycle::SymbolResolver`] and
//! [`config::SettingsStore`].

pub mod classify;
pub mod color;
pub mod config;
pub mod error;
pub mod font;
pub mod guard;
pub mod intercept;
pub mod lifecycle;
pub mod surface;

#[cfg(windows)]
pub mod win32;

#[cfg(test)]
pub(crate) mod test_support;

pub use color::{ColorRef, ColorSetting};
pub use config::{ColorOverrideConfig, ConfigHandle, FaceNameOverride, MemorySettings, SettingsStore};
pub use error::{Error, Result};
pub use font::{FontDescription, SynthesizedFont};
pub use guard::FontGuard;
pub use intercept::{EntryPoint, Interceptor};
pub use lifecycle::{FontOverrideMod, HookInstaller, HookState, OriginalTable, ProcAddress, Replacements, SymbolResolver};
pub use surface::{DeviceContext, FontHandle, WindowContextQuery, WindowHandle};
