//! Context classifier: decides whether a draw call targets a dark
//! file-list view, using only metadata the device context already carries.

use crate::surface::{DeviceContext, WindowContextQuery, WindowHandle};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Window classes that render the file list themselves.
pub const FILE_LIST_CLASSES: [&str; 2] = ["DirectUIHWND", "SysListView32"];

/// Shell view that hosts the file list.
pub const SHELL_VIEW_CLASS: &str = "SHELLDLL_DefView";

/// How many parent links to follow looking for [`SHELL_VIEW_CLASS`]. Shell UI
/// nests its list controls a small, stable number of levels deep; going
/// further ends up in unrelated top-level windows.
pub const MAX_ANCESTOR_DEPTH: usize = 3;

/// Backgrounds brighter than this are light (menus, tooltips, ...).
pub const LIGHT_THRESHOLD: u32 = 128;

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// True when the context's background color is perceptually light.
///
/// The threshold is strict: a luminance of exactly 128 is dark.
pub fn is_light_background<D: DeviceContext + ?Sized>(dc: &D) -> bool {
    dc.background_color().luminance() > LIGHT_THRESHOLD
}

/// True when the context draws into Explorer's file/folder view.
///
/// A context with no window, or with no match within
/// [`MAX_ANCESTOR_DEPTH`] parents, is not a file list.
pub fn is_file_list_surface<D, W>(dc: &D, windows: &W) -> bool
where
    D: DeviceContext + ?Sized,
    W: WindowContextQuery + ?Sized,
{
    let Some(window) = dc.window() else {
        return false;
    };

    if is_class(windows, window, &FILE_LIST_CLASSES) {
        return true;
    }

    let mut current = window;
    for _ in 0..MAX_ANCESTOR_DEPTH {
        match windows.parent(current) {
            Some(parent) => current = parent,
            None => break,
        }

        if is_class(windows, current, &[SHELL_VIEW_CLASS]) {
            return true;
        }
    }

    false
}

fn is_class<W: WindowContextQuery + ?Sized>(windows: &W, window: WindowHandle, classes: &[&str]) -> bool {
    windows
        .class_name(window)
        .is_some_and(|name| classes.contains(&name.as_str()))
}
