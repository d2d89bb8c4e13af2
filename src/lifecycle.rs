//! Init / settings-changed / uninit, and the narrow interfaces consumed from
//! the hooking facility.

use std::ffi::c_void;
use std::fmt;
use std::ptr::{self, NonNull};
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};
use std::sync::Arc;

use crate::config::{ConfigHandle, SettingsStore};
use crate::error::{Error, Result};
use crate::intercept::{EntryPoint, Interceptor};

// ============================================================================
// COLLABORATOR INTERFACES
// ============================================================================

/// Non-null address of a function in the host process.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcAddress(NonNull<c_void>);

// A code address, never dereferenced as data
unsafe impl Send for ProcAddress {}
unsafe impl Sync for ProcAddress {}

impl ProcAddress {
    /// `None` for a null pointer.
    pub fn new(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(ProcAddress)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }
}

impl fmt::Debug for ProcAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProcAddress({:p})", self.0)
    }
}

/// Locates exported functions in the host process.
pub trait SymbolResolver {
    fn resolve(&self, module: &str, symbol: &str) -> Option<ProcAddress>;
}

/// The external hooking facility.
///
/// `install` registers `replacement` for `target` and returns the address to
/// call for the original behavior, or the facility's reason for refusing.
/// Hooks must not take effect before [`FontOverrideMod::on_init`] returns;
/// removal is the facility's own job at teardown.
pub trait HookInstaller {
    fn install(
        &mut self,
        target: ProcAddress,
        replacement: ProcAddress,
    ) -> std::result::Result<Option<ProcAddress>, String>;
}

/// Replacement functions, one per entry point.
#[derive(Clone, Copy, Debug)]
pub struct Replacements {
    pub draw_text: ProcAddress,
    pub draw_text_ex: ProcAddress,
}

impl Replacements {
    pub fn get(&self, entry: EntryPoint) -> ProcAddress {
        match entry {
            EntryPoint::DrawText => self.draw_text,
            EntryPoint::DrawTextEx => self.draw_text_ex,
        }
    }
}

/// Original implementations handed back by the hooking facility. Readable
/// from any thread without locking.
#[derive(Debug)]
pub struct OriginalTable {
    slots: [AtomicPtr<c_void>; 2],
}

impl Default for OriginalTable {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginalTable {
    pub const fn new() -> Self {
        OriginalTable {
            slots: [AtomicPtr::new(ptr::null_mut()), AtomicPtr::new(ptr::null_mut())],
        }
    }

    pub fn record(&self, entry: EntryPoint, original: ProcAddress) {
        self.slots[entry.index()].store(original.as_ptr(), Ordering::Release);
    }

    pub fn get(&self, entry: EntryPoint) -> Option<ProcAddress> {
        ProcAddress::new(self.slots[entry.index()].load(Ordering::Acquire))
    }

    pub fn clear(&self) {
        for slot in &self.slots {
            slot.store(ptr::null_mut(), Ordering::Release);
        }
    }
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookState {
    Uninstalled,
    Installed,
}

/// A loaded instance of the override: configuration, interceptor and the
/// hook state, driven by the mod loader's three entry points.
#[derive(Debug)]
pub struct FontOverrideMod {
    interceptor: Arc<Interceptor>,
    installed: AtomicBool,
}

impl FontOverrideMod {
    /// Load settings, then hook every [`EntryPoint`].
    ///
    /// Fails if an entry point can't be resolved, the facility refuses a
    /// hook, or it hands back no original. Nothing is hooked at address zero.
    pub fn on_init(
        store: &dyn SettingsStore,
        resolver: &dyn SymbolResolver,
        installer: &mut dyn HookInstaller,
        replacements: &Replacements,
        originals: &OriginalTable,
    ) -> Result<Self> {
        let config = Arc::new(ConfigHandle::default());
        let loaded = config.reload(store);
        log::info!(
            "Init: face name {:?}, custom color {} {:?}",
            loaded.face_name,
            loaded.enabled,
            loaded.color
        );

        for entry in EntryPoint::ALL {
            let symbol = entry.symbol();
            let target = resolver.resolve(EntryPoint::MODULE, symbol).ok_or(Error::SymbolNotFound {
                module: EntryPoint::MODULE,
                symbol,
            })?;

            let original = installer
                .install(target, replacements.get(entry))
                .map_err(|reason| Error::HookInstall { symbol, reason })?
                .ok_or(Error::NullOriginal { symbol })?;

            originals.record(entry, original);
            log::debug!("Hooked {} at {:?}", symbol, target);
        }

        Ok(FontOverrideMod {
            interceptor: Arc::new(Interceptor::new(config)),
            installed: AtomicBool::new(true),
        })
    }

    pub fn interceptor(&self) -> &Arc<Interceptor> {
        &self.interceptor
    }

    pub fn config(&self) -> &Arc<ConfigHandle> {
        self.interceptor.config()
    }

    pub fn state(&self) -> HookState {
        if self.installed.load(Ordering::Acquire) {
            HookState::Installed
        } else {
            HookState::Uninstalled
        }
    }

    /// Re-read all settings and publish them in one swap.
    pub fn on_settings_changed(&self, store: &dyn SettingsStore) {
        let config = self.config().reload(store);
        log::info!(
            "Settings changed: face name {:?}, custom color {} {:?}",
            config.face_name,
            config.enabled,
            config.color
        );
    }

    /// The hooks themselves are removed by the hooking facility.
    pub fn on_uninit(&self) {
        self.installed.store(false, Ordering::Release);
        log::info!("Uninit");
    }
}
