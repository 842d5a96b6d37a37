use tracing::{debug, trace, warn};
use x11rb::protocol::xproto::Window;

use crate::core::display::{DisplayClient, GeometryChange, InputEvent};
use crate::window::error::{absorb_stale, log_and_ignore, WmError};
use crate::window::geometry::{Geometry, Point};
use crate::window::surrogate::Surrogate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    Resize,
}

impl DragMode {
    /// Button 1 moves, button 3 resizes. Nothing else starts a drag.
    pub fn from_button(button: u8) -> Option<Self> {
        match button {
            1 => Some(DragMode::Move),
            3 => Some(DragMode::Resize),
            _ => None,
        }
    }
}

/// Active pointer grab, released on drop if not released explicitly.
struct PointerGrab<'a, D: DisplayClient> {
    display: &'a D,
    held: bool,
}

impl<'a, D: DisplayClient> PointerGrab<'a, D> {
    fn acquire(display: &'a D) -> Result<Option<Self>, WmError> {
        if display.grab_pointer()? {
            Ok(Some(Self { display, held: true }))
        } else {
            Ok(None)
        }
    }

    fn release(mut self) -> Result<(), WmError> {
        self.held = false;
        self.display.ungrab_pointer()
    }
}

impl<D: DisplayClient> Drop for PointerGrab<'_, D> {
    fn drop(&mut self) {
        if self.held {
            log_and_ignore(self.display.ungrab_pointer(), "ungrab pointer");
        }
    }
}

/// The single in-flight move or resize.
pub struct DragSession<'a, D: DisplayClient> {
    display: &'a D,
    target: Window,
    button: u8,
    mode: DragMode,
    geometry: Geometry,
    last_pointer: Point,
    surrogate: Option<Surrogate<'a, D>>,
    grab: PointerGrab<'a, D>,
}

impl<'a, D: DisplayClient> DragSession<'a, D> {
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// The window reconfigured on motion: the target itself when moving,
    /// the surrogate when resizing.
    pub fn active_window(&self) -> Window {
        self.surrogate.as_ref().map_or(self.target, Surrogate::window)
    }

    fn on_motion(&mut self) -> Result<(), WmError> {
        // A failed query counts as no movement; the next event retries.
        let Some(pointer) = absorb_stale(self.display.query_pointer(), "pointer query")? else {
            return Ok(());
        };
        let (dx, dy) = pointer.delta_from(self.last_pointer);
        self.last_pointer = pointer;
        if dx == 0 && dy == 0 {
            return Ok(());
        }

        let change = match self.mode {
            DragMode::Move => {
                self.geometry.translate(dx, dy);
                GeometryChange::Position { x: self.geometry.x, y: self.geometry.y }
            }
            DragMode::Resize => {
                self.geometry.resize_by(dx, dy);
                GeometryChange::Size { width: self.geometry.width, height: self.geometry.height }
            }
        };
        trace!("{:?} {:#x} by ({}, {}) -> {:?}", self.mode, self.active_window(), dx, dy, self.geometry);
        self.display.configure(self.active_window(), change)
    }

    /// Release the grab and, after a resize, swap the real window back in
    /// with its final size.
    fn finish(self) -> Result<(), WmError> {
        let DragSession { display, target, mode, geometry, surrogate, grab, .. } = self;
        grab.release()?;
        if let Some(surrogate) = surrogate {
            surrogate.destroy()?;
            display.configure(target, GeometryChange::Size { width: geometry.width, height: geometry.height })?;
            display.map_window(target)?;
            display.raise_and_focus(target)?;
        }
        debug!("Finished {:?} of {:#x} at {:?}", mode, target, geometry);
        Ok(())
    }
}

/// Drag state machine. `Dragging` consumes only the grabbed motion and
/// release events until the release of the button that started it.
pub enum DragState<'a, D: DisplayClient> {
    Idle,
    Dragging(DragSession<'a, D>),
}

impl<'a, D: DisplayClient> DragState<'a, D> {
    /// Idle to Dragging on a modifier press of `button` over `target`.
    ///
    /// Stays `Idle` when the button is not a drag button, when `target`
    /// vanished before its geometry could be read, or when the pointer could
    /// not be grabbed or located. In the last two cases any surrogate is
    /// removed and the target shown again.
    pub fn begin(display: &'a D, button: u8, target: Window, surrogate_pixel: u32) -> Result<Self, WmError> {
        let Some(mode) = DragMode::from_button(button) else {
            return Ok(DragState::Idle);
        };
        let Some(geometry) = absorb_stale(display.query_geometry(target), "drag geometry query")? else {
            return Ok(DragState::Idle);
        };

        let surrogate = match mode {
            DragMode::Move => None,
            DragMode::Resize => {
                let surrogate = Surrogate::create(display, geometry, surrogate_pixel)?;
                display.unmap_window(target)?;
                display.map_window(surrogate.window())?;
                Some(surrogate)
            }
        };
        let active = surrogate.as_ref().map_or(target, Surrogate::window);
        display.raise_and_focus(active)?;

        let Some(grab) = PointerGrab::acquire(display)? else {
            warn!("Pointer grab refused, not dragging {:#x}", target);
            restore(display, target, surrogate)?;
            return Ok(DragState::Idle);
        };
        let Some(last_pointer) = absorb_stale(display.query_pointer(), "drag pointer query")? else {
            grab.release()?;
            restore(display, target, surrogate)?;
            return Ok(DragState::Idle);
        };

        debug!("Started {:?} of {:#x} from {:?}", mode, target, geometry);
        Ok(DragState::Dragging(DragSession {
            display,
            target,
            button,
            mode,
            geometry,
            last_pointer,
            surrogate,
            grab,
        }))
    }

    pub fn transition(self, event: InputEvent) -> Result<Self, WmError> {
        let mut session = match self {
            DragState::Idle => return Ok(DragState::Idle),
            DragState::Dragging(session) => session,
        };
        match event {
            InputEvent::Motion => {
                session.on_motion()?;
                Ok(DragState::Dragging(session))
            }
            InputEvent::ButtonRelease { button } if button == session.button => {
                session.finish()?;
                Ok(DragState::Idle)
            }
            other => {
                trace!("Ignoring {:?} while dragging", other);
                Ok(DragState::Dragging(session))
            }
        }
    }
}

/// Undo the surrogate swap of a drag that never got going.
fn restore<D: DisplayClient>(display: &D, target: Window, surrogate: Option<Surrogate<'_, D>>) -> Result<(), WmError> {
    if let Some(surrogate) = surrogate {
        surrogate.destroy()?;
        display.map_window(target)?;
        display.raise_and_focus(target)?;
    }
    Ok(())
}

/// Run a whole drag: begin, then block on the grabbed event stream until
/// the matching release. Returns the final geometry, or `None` if no drag
/// took place.
pub fn drag_window<D: DisplayClient>(
    display: &D,
    button: u8,
    target: Window,
    surrogate_pixel: u32,
) -> Result<Option<Geometry>, WmError> {
    let mut state = DragState::begin(display, button, target, surrogate_pixel)?;
    let mut last = None;
    while let DragState::Dragging(session) = &state {
        last = Some(session.geometry());
        display.flush()?;
        let event = display.next_event()?;
        state = state.transition(event)?;
    }
    Ok(last)
}
