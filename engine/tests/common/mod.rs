//! Do some preparations for integration tests
//!
//! [`FakeDesktop`] mimics how the shell lays out its windows: before the spawn message,
//! `Progman` hosts the icon view itself; afterwards the icon view lives in a `WorkerW` and an
//! empty `WorkerW` follows it.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, LazyLock, RwLock};
use std::time::Duration;

use smol::process::Command;
use vidwall_engine::config::{ConfigError, Storage};
use vidwall_engine::desktop::{LAYER_CLASS, SHELL_ROOT_CLASS, SHELL_VIEW_CLASS, SPAWN_LAYER_MESSAGE};
use vidwall_engine::platform::{Enumeration, OsError, OsResult, Rect, ScreenMetrics};
use vidwall_engine::supervisor::SuperviseError;
use vidwall_engine::{PlayerBackend, ProcessTable, WindowHandle, WindowSystem};

pub static CAPTURED: LazyLock<Arc<RwLock<String>>> =
    LazyLock::new(|| Arc::new(RwLock::new(String::new())));

pub const PLAYER_CLASS: &str = "fakeplayer";

struct Capturer {
    content: Arc<RwLock<String>>,
}
impl std::io::Write for Capturer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut locked = self.content.write().unwrap();
        let got = std::str::from_utf8(buf).unwrap();
        locked.push_str(got);
        Ok(got.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn setup() {
    let cap = Capturer {
        content: CAPTURED.clone(),
    };
    let _ = env_logger::builder()
        .is_test(true)
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .filter_level(log::LevelFilter::Trace)
        .target(env_logger::Target::Pipe(Box::new(cap)))
        .try_init();
}

pub fn captured() -> String {
    CAPTURED.read().expect("Cannot read captured log").clone()
}

#[derive(Debug, Clone)]
struct FakeWindow {
    handle: WindowHandle,
    class: String,
    parent: Option<WindowHandle>,
}

#[derive(Default)]
pub struct FakeDesktop {
    windows: RefCell<Vec<FakeWindow>>,
    next: Cell<isize>,
    /// The shell splits the icon view off `Progman` on the spawn message.
    pub splits_on_message: Cell<bool>,
    pub messages: RefCell<Vec<(u32, usize, isize)>>,
    /// Number of windows the last enumeration visited.
    pub visited: Cell<usize>,
    pub positions: RefCell<HashMap<WindowHandle, Rect>>,
    pub fail_resize: Cell<bool>,
    pub fail_reparent: Cell<bool>,
    /// The player window shows up on this lookup, never if `None`.
    pub player_on_lookup: Cell<Option<usize>>,
    pub player_lookups: Cell<usize>,
    pub metrics: Cell<Option<ScreenMetrics>>,
}

impl FakeDesktop {
    /// A desktop where the layer has not been created yet.
    pub fn new() -> Self {
        let desktop = Self::default();
        desktop.next.set(0x100);
        desktop.metrics.set(Some(ScreenMetrics {
            width: 1920,
            height: 1080,
        }));
        desktop.splits_on_message.set(true);
        desktop.add("Shell_TrayWnd", None);
        let progman = desktop.add(SHELL_ROOT_CLASS, None);
        let view = desktop.add(SHELL_VIEW_CLASS, Some(progman));
        desktop.add("SysListView32", Some(view));
        desktop
    }

    pub fn add(&self, class: &str, parent: Option<WindowHandle>) -> WindowHandle {
        let handle = WindowHandle::from_raw(self.next.get());
        self.next.set(self.next.get() + 1);
        self.windows.borrow_mut().push(FakeWindow {
            handle,
            class: class.to_string(),
            parent,
        });
        handle
    }

    /// Inserts a top-level window right before `before` in z-order.
    pub fn insert_before(&self, before: WindowHandle, class: &str) -> WindowHandle {
        let handle = self.add(class, None);
        let mut windows = self.windows.borrow_mut();
        let window = windows.pop().unwrap();
        let index = windows.iter().position(|w| w.handle == before).unwrap();
        windows.insert(index, window);
        handle
    }

    pub fn first_of_class(&self, class: &str) -> Option<WindowHandle> {
        self.windows
            .borrow()
            .iter()
            .find(|w| w.class == class)
            .map(|w| w.handle)
    }

    pub fn parent_of(&self, window: WindowHandle) -> Option<WindowHandle> {
        self.windows
            .borrow()
            .iter()
            .find(|w| w.handle == window)
            .and_then(|w| w.parent)
    }

    pub fn top_level_count(&self) -> usize {
        self.windows
            .borrow()
            .iter()
            .filter(|w| w.parent.is_none())
            .count()
    }

    /// What the shell does on the spawn message.
    fn split(&self) {
        let Some(progman) = self.first_of_class(SHELL_ROOT_CLASS) else {
            return;
        };
        let Some(view) = self.first_of_class(SHELL_VIEW_CLASS) else {
            return;
        };
        if self.parent_of(view) != Some(progman) {
            return;
        }
        let host = self.insert_before(progman, LAYER_CLASS);
        self.insert_before(progman, LAYER_CLASS);
        let mut windows = self.windows.borrow_mut();
        if let Some(view) = windows.iter_mut().find(|w| w.handle == view) {
            view.parent = Some(host);
        }
    }

    fn search(
        &self,
        parent: Option<WindowHandle>,
        after: Option<WindowHandle>,
        class: Option<&str>,
    ) -> Option<WindowHandle> {
        let windows = self.windows.borrow();
        let mut siblings = windows.iter().filter(|w| w.parent == parent);
        if let Some(after) = after {
            siblings.by_ref().find(|w| w.handle == after)?;
        }
        siblings
            .find(|w| class.is_none_or(|class| w.class == class))
            .map(|w| w.handle)
    }
}

impl WindowSystem for FakeDesktop {
    fn find_window(&self, class: Option<&str>, _title: Option<&str>) -> Option<WindowHandle> {
        if class == Some(PLAYER_CLASS) {
            let lookups = self.player_lookups.get() + 1;
            self.player_lookups.set(lookups);
            if self.player_on_lookup.get() == Some(lookups) {
                self.add(PLAYER_CLASS, None);
            }
        }
        self.search(None, None, class)
    }

    fn find_child(
        &self,
        parent: Option<WindowHandle>,
        after: Option<WindowHandle>,
        class: &str,
    ) -> Option<WindowHandle> {
        self.search(parent, after, Some(class))
    }

    fn enum_top_level(&self, visit: &mut dyn FnMut(WindowHandle) -> Enumeration) -> OsResult<()> {
        let top: Vec<WindowHandle> = self
            .windows
            .borrow()
            .iter()
            .filter(|w| w.parent.is_none())
            .map(|w| w.handle)
            .collect();
        self.visited.set(0);
        for window in top {
            self.visited.set(self.visited.get() + 1);
            if visit(window) == Enumeration::Stop {
                break;
            }
        }
        Ok(())
    }

    fn send_message_timeout(
        &self,
        _window: WindowHandle,
        message: u32,
        wparam: usize,
        lparam: isize,
        _timeout: Duration,
    ) -> OsResult<usize> {
        self.messages.borrow_mut().push((message, wparam, lparam));
        if message == SPAWN_LAYER_MESSAGE && self.splits_on_message.get() {
            self.split();
        }
        Ok(0)
    }

    fn screen_metrics(&self) -> OsResult<ScreenMetrics> {
        self.metrics
            .get()
            .ok_or(OsError::new("GetSystemMetrics", 0))
    }

    fn set_position(&self, window: WindowHandle, rect: Rect) -> OsResult<()> {
        if self.fail_resize.get() {
            return Err(OsError::new("SetWindowPos", 0x5));
        }
        self.positions.borrow_mut().insert(window, rect);
        Ok(())
    }

    fn set_parent(&self, window: WindowHandle, parent: WindowHandle) -> OsResult<()> {
        if self.fail_reparent.get() {
            return Err(OsError::new("SetParent", 0x5));
        }
        let mut windows = self.windows.borrow_mut();
        let window = windows
            .iter_mut()
            .find(|w| w.handle == window)
            .ok_or(OsError::new("SetParent", 0x578))?;
        window.parent = Some(parent);
        Ok(())
    }
}

/// Storage kept in memory.
#[derive(Default)]
pub struct MemoryStorage {
    pub value: RefCell<Option<String>>,
    pub writes: Cell<usize>,
}

impl MemoryStorage {
    pub fn holding(value: &str) -> Self {
        let storage = Self::default();
        *storage.value.borrow_mut() = Some(value.to_string());
        storage
    }

    pub fn value(&self) -> Option<String> {
        self.value.borrow().clone()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, ConfigError> {
        Ok(self.value.borrow().clone())
    }

    fn save(&self, value: &str) -> Result<(), ConfigError> {
        self.writes.set(self.writes.get() + 1);
        *self.value.borrow_mut() = Some(value.to_string());
        Ok(())
    }
}

/// A process list nobody else touches.
#[derive(Default)]
pub struct FakeProcesses {
    pub running: HashMap<u32, String>,
}

impl ProcessTable for FakeProcesses {
    fn find(&mut self, image: &str) -> Result<Vec<u32>, SuperviseError> {
        Ok(self
            .running
            .iter()
            .filter(|(_, name)| name.as_str() == image)
            .map(|(&pid, _)| pid)
            .collect())
    }

    fn kill(&mut self, pid: u32) -> bool {
        self.running.remove(&pid).is_some()
    }
}

/// A player that exists on every machine and exits right away.
pub struct FakePlayer {
    pub executable: &'static str,
}

impl Default for FakePlayer {
    fn default() -> Self {
        Self {
            executable: if cfg!(windows) { "cmd" } else { "true" },
        }
    }
}

impl PlayerBackend for FakePlayer {
    fn executable(&self) -> &str {
        self.executable
    }

    fn window_class(&self) -> &str {
        PLAYER_CLASS
    }

    fn command(&self, program: &Path, video: &Path) -> Command {
        let mut cmd = Command::new(program);
        if cfg!(windows) {
            cmd.args(["/C", "exit", "0"]);
        } else {
            cmd.arg(video);
        }
        cmd
    }
}

/// A video file that passes validation.
pub fn video(name: &str) -> String {
    let dir = std::env::temp_dir().join("vidwall-tests");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, b"").unwrap();
    path.to_string_lossy().to_string()
}
