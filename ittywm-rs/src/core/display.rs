use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    ConfigureWindowAux, ConnectionExt, CreateWindowAux, EventMask, GrabMode, GrabStatus, InputFocus,
    StackMode, Window, WindowClass,
};
use x11rb::protocol::{ErrorKind, Event};

use crate::core::context::Context;
use crate::window::error::WmError;
use crate::window::geometry::{Geometry, Point};

/// Input the window manager reacts to, reduced from raw X11 events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyPress { window: Window },
    ButtonPress { button: u8, window: Window },
    ButtonRelease { button: u8 },
    Motion,
    /// Error reply to a request that was sent without waiting for one.
    ProtocolError { kind: ErrorKind },
    Other,
}

/// Partial reconfiguration: position-only or size-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryChange {
    Position { x: i32, y: i32 },
    Size { width: u32, height: u32 },
}

impl GeometryChange {
    fn to_aux(self) -> ConfigureWindowAux {
        match self {
            GeometryChange::Position { x, y } => ConfigureWindowAux::new().x(x).y(y),
            GeometryChange::Size { width, height } => ConfigureWindowAux::new().width(width).height(height),
        }
    }
}

/// Requests the window manager makes of the X server.
///
/// Everything except the queries and [`grab_pointer`](Self::grab_pointer) is
/// fire-and-forget; its effects become visible on the next [`flush`](Self::flush).
pub trait DisplayClient {
    fn root(&self) -> Window;

    fn query_geometry(&self, window: Window) -> Result<Geometry, WmError>;
    fn query_pointer(&self) -> Result<Point, WmError>;

    fn configure(&self, window: Window, change: GeometryChange) -> Result<(), WmError>;
    /// Stack above all siblings and take input focus.
    fn raise_and_focus(&self, window: Window) -> Result<(), WmError>;

    /// Create an unmapped, content-less window filled with `pixel`.
    fn create_window(&self, parent: Window, geometry: Geometry, pixel: u32) -> Result<Window, WmError>;
    fn destroy_window(&self, window: Window) -> Result<(), WmError>;
    fn map_window(&self, window: Window) -> Result<(), WmError>;
    fn unmap_window(&self, window: Window) -> Result<(), WmError>;

    /// Grab the pointer for motion and button release. `Ok(false)` if the
    /// server refused the grab.
    fn grab_pointer(&self) -> Result<bool, WmError>;
    fn ungrab_pointer(&self) -> Result<(), WmError>;

    fn next_event(&self) -> Result<InputEvent, WmError>;
    fn flush(&self) -> Result<(), WmError>;
}

impl From<Event> for InputEvent {
    fn from(event: Event) -> Self {
        match event {
            Event::KeyPress(e) => InputEvent::KeyPress { window: e.child },
            Event::ButtonPress(e) => InputEvent::ButtonPress { button: e.detail, window: e.child },
            Event::ButtonRelease(e) => InputEvent::ButtonRelease { button: e.detail },
            Event::MotionNotify(_) => InputEvent::Motion,
            Event::Error(e) => InputEvent::ProtocolError { kind: e.error_kind },
            _ => InputEvent::Other,
        }
    }
}

impl DisplayClient for Context {
    fn root(&self) -> Window {
        self.root_window
    }

    fn query_geometry(&self, window: Window) -> Result<Geometry, WmError> {
        let reply = self.conn.get_geometry(window)?.reply()?;
        Ok(Geometry::from(&reply))
    }

    fn query_pointer(&self) -> Result<Point, WmError> {
        let reply = self.conn.query_pointer(self.root_window)?.reply()?;
        Ok(Point::new(reply.root_x.into(), reply.root_y.into()))
    }

    fn configure(&self, window: Window, change: GeometryChange) -> Result<(), WmError> {
        self.conn.configure_window(window, &change.to_aux())?;
        Ok(())
    }

    fn raise_and_focus(&self, window: Window) -> Result<(), WmError> {
        self.conn.configure_window(window, &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE))?;
        self.conn.set_input_focus(InputFocus::PARENT, window, x11rb::CURRENT_TIME)?;
        Ok(())
    }

    fn create_window(&self, parent: Window, geometry: Geometry, pixel: u32) -> Result<Window, WmError> {
        let (x, y, width, height) = geometry.to_wire();
        let window = self.conn.generate_id()?;
        self.conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            window,
            parent,
            x, y, width, height, 0,
            WindowClass::INPUT_OUTPUT,
            self.root_visual,
            &CreateWindowAux::new().background_pixel(pixel),
        )?;
        Ok(window)
    }

    fn destroy_window(&self, window: Window) -> Result<(), WmError> {
        self.conn.destroy_window(window)?;
        Ok(())
    }

    fn map_window(&self, window: Window) -> Result<(), WmError> {
        self.conn.map_window(window)?;
        Ok(())
    }

    fn unmap_window(&self, window: Window) -> Result<(), WmError> {
        self.conn.unmap_window(window)?;
        Ok(())
    }

    fn grab_pointer(&self) -> Result<bool, WmError> {
        // Motion hints coalesce motion on the server; each query_pointer re-arms them.
        let mask = EventMask::BUTTON_RELEASE | EventMask::BUTTON_MOTION | EventMask::POINTER_MOTION_HINT;
        let reply = self
            .conn
            .grab_pointer(
                false,
                self.root_window,
                mask,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
                x11rb::NONE,
                x11rb::NONE,
                x11rb::CURRENT_TIME,
            )?
            .reply()?;
        Ok(reply.status == GrabStatus::SUCCESS)
    }

    fn ungrab_pointer(&self) -> Result<(), WmError> {
        self.conn.ungrab_pointer(x11rb::CURRENT_TIME)?;
        Ok(())
    }

    fn next_event(&self) -> Result<InputEvent, WmError> {
        Ok(self.conn.wait_for_event()?.into())
    }

    fn flush(&self) -> Result<(), WmError> {
        self.conn.flush()?;
        Ok(())
    }
}
