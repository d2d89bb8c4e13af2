//! In-memory device context and window tree, plus a per-thread log capture.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::color::ColorRef;
use crate::font::FontDescription;
use crate::surface::{DeviceContext, FontHandle, WindowContextQuery, WindowHandle};

// ============================================================================
// FAKE SURFACE
// ============================================================================

const HOST_FONT: FontHandle = FontHandle(100);

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    Create(FontHandle),
    Select(FontHandle),
    Delete(FontHandle),
    TextColor(ColorRef),
    Mark(&'static str),
}

struct State {
    fonts: HashMap<FontHandle, FontDescription>,
    next_font: usize,
    selected: FontHandle,
    created: Vec<FontHandle>,
    deleted: Vec<FontHandle>,
    events: Vec<Event>,
    background: ColorRef,
    text_color: ColorRef,
    window: Option<WindowHandle>,
    windows: HashMap<WindowHandle, (String, Option<WindowHandle>)>,
    fail_describe: bool,
    fail_create: bool,
    window_queries: usize,
    background_queries: usize,
}

/// Records every font and color operation made against it.
pub(crate) struct FakeSurface {
    state: RefCell<State>,
}

impl FakeSurface {
    /// A context drawing into the first window of `classes`, each window
    /// being the parent of the one before it. An empty chain means no window.
    pub(crate) fn with_window_chain(classes: &[&str]) -> Self {
        let mut windows = HashMap::new();
        for (i, class) in classes.iter().enumerate() {
            let parent = (i + 1 < classes.len()).then(|| WindowHandle(i + 2));
            windows.insert(WindowHandle(i + 1), (class.to_string(), parent));
        }

        let mut fonts = HashMap::new();
        fonts.insert(HOST_FONT, Self::host_description());

        FakeSurface {
            state: RefCell::new(State {
                fonts,
                next_font: HOST_FONT.0 + 1,
                selected: HOST_FONT,
                created: Vec::new(),
                deleted: Vec::new(),
                events: Vec::new(),
                background: ColorRef::from_rgb(0x19, 0x19, 0x19),
                text_color: ColorRef::from_rgb(0xC8, 0xC8, 0xC8),
                window: (!classes.is_empty()).then_some(WindowHandle(1)),
                windows,
                fail_describe: false,
                fail_create: false,
                window_queries: 0,
                background_queries: 0,
            }),
        }
    }

    /// Explorer's items view: DirectUIHWND under SHELLDLL_DefView, dark theme.
    pub(crate) fn dark_list_view() -> Self {
        Self::with_window_chain(&["DirectUIHWND", "DUIViewWndClassName", "SHELLDLL_DefView"])
    }

    pub(crate) fn without_window() -> Self {
        Self::with_window_chain(&[])
    }

    fn host_description() -> FontDescription {
        let mut desc = FontDescription {
            height: -12,
            weight: 400,
            char_set: 1,
            out_precision: 3,
            clip_precision: 2,
            quality: 5,
            pitch_and_family: 34,
            ..Default::default()
        };
        desc.set_face_name("Segoe UI Variable Text").unwrap();
        desc
    }

    pub(crate) fn original_description(&self) -> FontDescription {
        self.state.borrow().fonts[&HOST_FONT]
    }

    pub(crate) fn description_of(&self, font: FontHandle) -> Option<FontDescription> {
        self.state.borrow().fonts.get(&font).copied()
    }

    pub(crate) fn created(&self) -> Vec<FontHandle> {
        self.state.borrow().created.clone()
    }

    pub(crate) fn deleted(&self) -> Vec<FontHandle> {
        self.state.borrow().deleted.clone()
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub(crate) fn text_color(&self) -> ColorRef {
        self.state.borrow().text_color
    }

    pub(crate) fn set_background(&self, color: ColorRef) {
        self.state.borrow_mut().background = color;
    }

    pub(crate) fn fail_describe(&self) {
        self.state.borrow_mut().fail_describe = true;
    }

    pub(crate) fn fail_create(&self) {
        self.state.borrow_mut().fail_create = true;
    }

    pub(crate) fn mark(&self, label: &'static str) {
        self.state.borrow_mut().events.push(Event::Mark(label));
    }

    pub(crate) fn window_queries(&self) -> usize {
        self.state.borrow().window_queries
    }

    pub(crate) fn background_queries(&self) -> usize {
        self.state.borrow().background_queries
    }
}

impl DeviceContext for FakeSurface {
    fn current_font(&self) -> FontHandle {
        self.state.borrow().selected
    }

    fn describe_font(&self, font: FontHandle) -> Option<FontDescription> {
        let state = self.state.borrow();
        if state.fail_describe {
            return None;
        }
        state.fonts.get(&font).copied()
    }

    fn create_font(&self, description: &FontDescription) -> FontHandle {
        let mut state = self.state.borrow_mut();
        if state.fail_create {
            return FontHandle::NULL;
        }
        let font = FontHandle(state.next_font);
        state.next_font += 1;
        state.fonts.insert(font, *description);
        state.created.push(font);
        state.events.push(Event::Create(font));
        font
    }

    fn select_font(&self, font: FontHandle) -> FontHandle {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Select(font));
        std::mem::replace(&mut state.selected, font)
    }

    fn delete_font(&self, font: FontHandle) {
        let mut state = self.state.borrow_mut();
        assert!(!state.deleted.contains(&font), "{font:?} released twice");
        assert_ne!(state.selected, font, "{font:?} released while selected");
        state.deleted.push(font);
        state.events.push(Event::Delete(font));
    }

    fn background_color(&self) -> ColorRef {
        let mut state = self.state.borrow_mut();
        state.background_queries += 1;
        state.background
    }

    fn set_text_color(&self, color: ColorRef) -> ColorRef {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::TextColor(color));
        std::mem::replace(&mut state.text_color, color)
    }

    fn window(&self) -> Option<WindowHandle> {
        let mut state = self.state.borrow_mut();
        state.window_queries += 1;
        state.window
    }
}

impl WindowContextQuery for FakeSurface {
    fn class_name(&self, window: WindowHandle) -> Option<String> {
        let mut state = self.state.borrow_mut();
        state.window_queries += 1;
        state.windows.get(&window).map(|(class, _)| class.clone())
    }

    fn parent(&self, window: WindowHandle) -> Option<WindowHandle> {
        let mut state = self.state.borrow_mut();
        state.window_queries += 1;
        state.windows.get(&window).and_then(|(_, parent)| *parent)
    }
}

// ============================================================================
// LOG CAPTURE
// ============================================================================

thread_local! {
    static CAPTURED: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if record.level() != Level::Warn {
            return;
        }
        CAPTURED.with(|captured| {
            if let Some(lines) = captured.borrow_mut().as_mut() {
                lines.push(record.args().to_string());
            }
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL_LOGGER: Once = Once::new();

/// Run `f` and return the warnings it logged on this thread.
pub(crate) fn captured_warnings(f: impl FnOnce()) -> Vec<String> {
    INSTALL_LOGGER.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });

    CAPTURED.with(|captured| *captured.borrow_mut() = Some(Vec::new()));
    f();
    CAPTURED.with(|captured| captured.borrow_mut().take().unwrap_or_default())
}
