use tracing::{debug, trace};
use x11rb::protocol::xproto::Window;

use crate::core::display::{DisplayClient, InputEvent};
use crate::window::drag::drag_window;
use crate::window::error::WmError;
use crate::window::settings::Settings;

pub struct WindowManager<D: DisplayClient> {
    pub display: D,
    pub settings: Settings,
}

impl<D: DisplayClient> WindowManager<D> {
    pub fn new(display: D, settings: Settings) -> Self {
        Self { display, settings }
    }

    /// Modifier + button press over `window`. Blocks until the drag it
    /// starts (if any) is released.
    pub fn on_button_press(&self, button: u8, window: Window) -> Result<(), WmError> {
        match drag_window(&self.display, button, window, self.settings.surrogate_pixel)? {
            Some(geometry) => debug!("Window {:#x} now at {:?}", window, geometry),
            None => debug!("No drag for button {} on {:#x}", button, window),
        }
        Ok(())
    }

    /// Modifier + any key over `window`: raise and focus it.
    pub fn on_key_press(&self, window: Window) -> Result<(), WmError> {
        self.display.raise_and_focus(window)
    }

    /// Dispatch events until the connection fails.
    pub fn run(&self) -> Result<(), WmError> {
        loop {
            self.display.flush()?;
            match self.display.next_event()? {
                // Presses over the bare root have no child window
                InputEvent::KeyPress { window } if window != x11rb::NONE => self.on_key_press(window)?,
                InputEvent::ButtonPress { button, window } if window != x11rb::NONE => {
                    self.on_button_press(button, window)?
                }
                InputEvent::ProtocolError { kind } => debug!("Request failed asynchronously: {:?}", kind),
                other => trace!("Unhandled event {:?}", other),
            }
        }
    }
}
