//! The per-call protocol shared by both intercepted text-drawing entry points.

use std::sync::Arc;

use crate::classify::{is_file_list_surface, is_light_background};
use crate::config::{ColorOverrideConfig, ConfigHandle};
use crate::font::synthesize_font;
use crate::surface::{DeviceContext, WindowContextQuery};

/// The text-drawing entry points that get intercepted. The host toolkit
/// exposes a basic and an extended variant; both are treated identically so
/// a surface looks the same whichever one it uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    DrawText,   // DrawTextW
    DrawTextEx, // DrawTextExW
}

impl EntryPoint {
    pub const ALL: [EntryPoint; 2] = [EntryPoint::DrawText, EntryPoint::DrawTextEx];

    /// Module exporting both entry points.
    pub const MODULE: &'static str = "user32.dll";

    pub const fn symbol(self) -> &'static str {
        match self {
            EntryPoint::DrawText => "DrawTextW",
            EntryPoint::DrawTextEx => "DrawTextExW",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            EntryPoint::DrawText => 0,
            EntryPoint::DrawTextEx => 1,
        }
    }
}

/// Replacement behavior for the intercepted entry points.
///
/// Holds the published configuration; the original implementation is handed
/// in per call as a delegate, so this type never knows how hooking works.
#[derive(Debug, Default)]
pub struct Interceptor {
    config: Arc<ConfigHandle>,
}

impl Interceptor {
    pub fn new(config: Arc<ConfigHandle>) -> Self {
        Interceptor { config }
    }

    pub fn config(&self) -> &Arc<ConfigHandle> {
        &self.config
    }

    /// Run one intercepted call.
    ///
    /// Installs the synthesized font, overrides the text color when the
    /// surface is a dark file list and the override is enabled, then runs
    /// `original` and returns its result untouched. The synthesized font is
    /// released after `original` returns.
    pub fn intercept<S, R, F>(&self, entry: EntryPoint, surface: &S, original: F) -> R
    where
        S: DeviceContext + WindowContextQuery + ?Sized,
        F: FnOnce() -> R,
    {
        let config = self.config.snapshot();

        let _font = synthesize_font(surface, &config.face_name);

        if should_override_color(&config, surface) {
            let color = config.color.to_color_ref();
            log::trace!("{}: text color -> {:?}", entry.symbol(), color);
            surface.set_text_color(color);
        }

        original()
    }
}

/// The color gate, evaluated cheapest first and short-circuiting:
/// override enabled, background not light, surface is a file list.
pub fn should_override_color<S>(config: &ColorOverrideConfig, surface: &S) -> bool
where
    S: DeviceContext + WindowContextQuery + ?Sized,
{
    config.enabled && !is_light_background(surface) && is_file_list_surface(surface, surface)
}
