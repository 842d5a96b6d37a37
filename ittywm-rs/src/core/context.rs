use anyhow::Result;
use tracing::debug;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ButtonIndex, ConnectionExt, EventMask, GrabMode, ModMask, Visualid, Window};
use x11rb::rust_connection::RustConnection;

/// Keycode 0 is AnyKey in a key grab.
const ANY_KEY: u8 = 0;

/// Modifier that turns a click or keypress into a window-manager gesture.
pub const WM_MODIFIER: ModMask = ModMask::M1;

/// Connection to the X server and the screen being managed.
pub struct Context {
    pub conn: RustConnection,
    pub screen_num: usize,
    pub root_window: Window,
    pub root_visual: Visualid,
}

impl Context {
    pub fn new(display: Option<&str>) -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(display)?;
        let screen = &conn.setup().roots[screen_num];
        let root_window = screen.root;
        let root_visual = screen.root_visual;

        Ok(Self { conn, screen_num, root_window, root_visual })
    }

    /// Register the global modifier grabs on the root window: any key,
    /// button 1 (move) and button 3 (resize).
    ///
    /// With `ignore_locks`, the grabs are repeated for every CapsLock/NumLock
    /// combination so the gestures keep working while a lock is on.
    pub fn grab_input(&self, ignore_locks: bool) -> Result<()> {
        let mut modifiers = vec![WM_MODIFIER];
        if ignore_locks {
            modifiers.extend([
                WM_MODIFIER | ModMask::LOCK,
                WM_MODIFIER | ModMask::M2,
                WM_MODIFIER | ModMask::LOCK | ModMask::M2,
            ]);
        }

        for &mods in &modifiers {
            self.conn.grab_key(true, self.root_window, mods, ANY_KEY, GrabMode::ASYNC, GrabMode::ASYNC)?;
            for button in [ButtonIndex::M1, ButtonIndex::M3] {
                self.conn.grab_button(
                    false,
                    self.root_window,
                    EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE,
                    GrabMode::ASYNC,
                    GrabMode::ASYNC,
                    self.root_window,
                    x11rb::NONE,
                    button,
                    mods,
                )?;
            }
        }
        self.conn.flush()?;
        debug!("Registered {} modifier grab combination(s)", modifiers.len());
        Ok(())
    }
}
