//! GDI / user32 backend and the process-wide glue the mod loader calls into.
//!
//! The two replacement functions below are what the hooking facility
//! redirects `DrawTextW` and `DrawTextExW` to. They can't take extra
//! arguments, so they find the loaded [`FontOverrideMod`] and the originals
//! through two statics that only `mod_init` / `mod_uninit` write.

use std::ffi::c_void;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use windows::{
    core::*,
    Win32::{
        Foundation::*,
        Graphics::Gdi::*,
        System::LibraryLoader::{GetProcAddress, LoadLibraryW},
        UI::WindowsAndMessaging::{GetClassNameW, GetParent},
    },
};

use crate::color::ColorRef;
use crate::config::SettingsStore;
use crate::font::FontDescription;
use crate::intercept::EntryPoint;
use crate::lifecycle::{FontOverrideMod, HookInstaller, OriginalTable, ProcAddress, Replacements, SymbolResolver};
use crate::surface::{DeviceContext, FontHandle, WindowContextQuery, WindowHandle};

// ============================================================================
// CONSTANTS & STATE
// ============================================================================

// Class names in use are short; longer ones are truncated by GetClassNameW
const CLASS_NAME_BUFFER: usize = 256;

type DrawTextWFn = unsafe extern "system" fn(HDC, PCWSTR, i32, *mut RECT, DRAW_TEXT_FORMAT) -> i32;
type DrawTextExWFn =
    unsafe extern "system" fn(HDC, PWSTR, i32, *mut RECT, DRAW_TEXT_FORMAT, *mut DRAWTEXTPARAMS) -> i32;

static ORIGINALS: OriginalTable = OriginalTable::new();
static ACTIVE: ArcSwapOption<FontOverrideMod> = ArcSwapOption::const_empty();

// ============================================================================
// DEVICE CONTEXT
// ============================================================================

/// A caller's `HDC`, borrowed for one intercepted call.
pub struct GdiSurface {
    hdc: HDC,
}

impl GdiSurface {
    pub fn new(hdc: HDC) -> Self {
        GdiSurface { hdc }
    }
}

fn gdi_object(font: FontHandle) -> HGDIOBJ {
    HGDIOBJ(font.0 as *mut c_void)
}

fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.0 as *mut c_void)
}

impl DeviceContext for GdiSurface {
    fn current_font(&self) -> FontHandle {
        unsafe { FontHandle(GetCurrentObject(self.hdc, OBJ_FONT).0 as usize) }
    }

    fn describe_font(&self, font: FontHandle) -> Option<FontDescription> {
        let mut lf = LOGFONTW::default();
        let copied = unsafe {
            GetObjectW(
                gdi_object(font),
                std::mem::size_of::<LOGFONTW>() as i32,
                Some(&mut lf as *mut _ as *mut c_void),
            )
        };

        if copied == 0 {
            log::debug!("GetObjectW failed for {:?}. LastError={:?}", font, unsafe { GetLastError() });
            return None;
        }
        Some(from_logfont(&lf))
    }

    fn create_font(&self, description: &FontDescription) -> FontHandle {
        let lf = to_logfont(description);
        let font = unsafe { CreateFontIndirectW(&lf) };
        if font.is_invalid() {
            return FontHandle::NULL;
        }
        FontHandle(font.0 as usize)
    }

    fn select_font(&self, font: FontHandle) -> FontHandle {
        unsafe { FontHandle(SelectObject(self.hdc, gdi_object(font)).0 as usize) }
    }

    fn delete_font(&self, font: FontHandle) {
        unsafe {
            let _ = DeleteObject(gdi_object(font));
        }
    }

    fn background_color(&self) -> ColorRef {
        unsafe { ColorRef(GetBkColor(self.hdc).0) }
    }

    fn set_text_color(&self, color: ColorRef) -> ColorRef {
        unsafe { ColorRef(SetTextColor(self.hdc, COLORREF(color.0)).0) }
    }

    fn window(&self) -> Option<WindowHandle> {
        let hwnd = unsafe { WindowFromDC(self.hdc) };
        if hwnd.is_invalid() {
            return None;
        }
        Some(WindowHandle(hwnd.0 as usize))
    }
}

impl WindowContextQuery for GdiSurface {
    fn class_name(&self, window: WindowHandle) -> Option<String> {
        let mut buffer = [0u16; CLASS_NAME_BUFFER];
        let len = unsafe { GetClassNameW(hwnd(window), &mut buffer) };
        if len <= 0 {
            return None;
        }
        Some(String::from_utf16_lossy(&buffer[..len as usize]))
    }

    fn parent(&self, window: WindowHandle) -> Option<WindowHandle> {
        match unsafe { GetParent(hwnd(window)) } {
            Ok(parent) if !parent.is_invalid() => Some(WindowHandle(parent.0 as usize)),
            _ => None,
        }
    }
}

// LOGFONTW's byte fields are wrapper types in some `windows` releases and
// plain u8 in others; transmute reads both the same way.
fn from_logfont(lf: &LOGFONTW) -> FontDescription {
    unsafe {
        FontDescription {
            height: lf.lfHeight,
            width: lf.lfWidth,
            escapement: lf.lfEscapement,
            orientation: lf.lfOrientation,
            weight: lf.lfWeight,
            italic: lf.lfItalic,
            underline: lf.lfUnderline,
            strike_out: lf.lfStrikeOut,
            char_set: std::mem::transmute(lf.lfCharSet),
            out_precision: std::mem::transmute(lf.lfOutPrecision),
            clip_precision: std::mem::transmute(lf.lfClipPrecision),
            quality: std::mem::transmute(lf.lfQuality),
            pitch_and_family: std::mem::transmute(lf.lfPitchAndFamily),
            face_name: lf.lfFaceName,
        }
    }
}

fn to_logfont(desc: &FontDescription) -> LOGFONTW {
    unsafe {
        LOGFONTW {
            lfHeight: desc.height,
            lfWidth: desc.width,
            lfEscapement: desc.escapement,
            lfOrientation: desc.orientation,
            lfWeight: desc.weight,
            lfItalic: desc.italic,
            lfUnderline: desc.underline,
            lfStrikeOut: desc.strike_out,
            lfCharSet: std::mem::transmute(desc.char_set),
            lfOutPrecision: std::mem::transmute(desc.out_precision),
            lfClipPrecision: std::mem::transmute(desc.clip_precision),
            lfQuality: std::mem::transmute(desc.quality),
            lfPitchAndFamily: std::mem::transmute(desc.pitch_and_family),
            lfFaceName: desc.face_name,
        }
    }
}

// ============================================================================
// SYMBOL RESOLUTION
// ============================================================================

/// Resolves exports with `LoadLibraryW` + `GetProcAddress`.
pub struct ModuleResolver;

impl SymbolResolver for ModuleResolver {
    fn resolve(&self, module: &str, symbol: &str) -> Option<ProcAddress> {
        let module_wide: Vec<u16> = module.encode_utf16().chain(std::iter::once(0)).collect();
        let symbol_ansi: Vec<u8> = symbol.bytes().chain(std::iter::once(0)).collect();

        unsafe {
            let handle = match LoadLibraryW(PCWSTR(module_wide.as_ptr())) {
                Ok(handle) => handle,
                Err(err) => {
                    log::error!("LoadLibraryW({}) failed: {:?}", module, err);
                    return None;
                }
            };

            let proc = GetProcAddress(handle, PCSTR(symbol_ansi.as_ptr()))?;
            ProcAddress::new(proc as *const () as *mut c_void)
        }
    }
}

// ============================================================================
// REPLACEMENT FUNCTIONS
// ============================================================================

/// Replacement for `DrawTextW`.
pub unsafe extern "system" fn draw_text_w_hook(
    hdc: HDC,
    text: PCWSTR,
    len: i32,
    rect: *mut RECT,
    format: DRAW_TEXT_FORMAT,
) -> i32 {
    let Some(original) = ORIGINALS.get(EntryPoint::DrawText) else {
        log::error!("DrawTextW called with no original recorded");
        return 0;
    };
    let original: DrawTextWFn = std::mem::transmute(original.as_ptr());
    let call = || original(hdc, text, len, rect, format);

    let active = ACTIVE.load();
    match &*active {
        Some(loaded) => loaded.interceptor().intercept(EntryPoint::DrawText, &GdiSurface::new(hdc), call),
        None => call(),
    }
}

/// Replacement for `DrawTextExW`.
pub unsafe extern "system" fn draw_text_ex_w_hook(
    hdc: HDC,
    text: PWSTR,
    len: i32,
    rect: *mut RECT,
    format: DRAW_TEXT_FORMAT,
    params: *mut DRAWTEXTPARAMS,
) -> i32 {
    let Some(original) = ORIGINALS.get(EntryPoint::DrawTextEx) else {
        log::error!("DrawTextExW called with no original recorded");
        return 0;
    };
    let original: DrawTextExWFn = std::mem::transmute(original.as_ptr());
    let call = || original(hdc, text, len, rect, format, params);

    let active = ACTIVE.load();
    match &*active {
        Some(loaded) => loaded.interceptor().intercept(EntryPoint::DrawTextEx, &GdiSurface::new(hdc), call),
        None => call(),
    }
}

/// Addresses of the two replacement functions.
pub fn replacements() -> Option<Replacements> {
    Some(Replacements {
        draw_text: ProcAddress::new(draw_text_w_hook as DrawTextWFn as *const () as *mut c_void)?,
        draw_text_ex: ProcAddress::new(draw_text_ex_w_hook as DrawTextExWFn as *const () as *mut c_void)?,
    })
}

// ============================================================================
// MOD LOADER ENTRY POINTS
// ============================================================================

/// Load settings and hook both entry points. `false` tells the loader to
/// abort; nothing is left active in that case.
pub fn mod_init(store: &dyn SettingsStore, installer: &mut dyn HookInstaller) -> bool {
    let Some(replacements) = replacements() else {
        log::error!("Init failed: replacement functions have no address");
        return false;
    };

    match FontOverrideMod::on_init(store, &ModuleResolver, installer, &replacements, &ORIGINALS) {
        Ok(loaded) => {
            ACTIVE.store(Some(Arc::new(loaded)));
            true
        }
        Err(err) => {
            log::error!("Init failed: {}", err);
            ORIGINALS.clear();
            false
        }
    }
}

pub fn mod_settings_changed(store: &dyn SettingsStore) {
    if let Some(loaded) = &*ACTIVE.load() {
        loaded.on_settings_changed(store);
    }
}

/// Detach the loaded instance. Hooks still in place until the facility
/// removes them fall straight through to the originals.
pub fn mod_uninit() {
    if let Some(loaded) = ACTIVE.swap(None) {
        loaded.on_uninit();
    }
}
