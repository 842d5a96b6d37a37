//! Scripted stand-in for the X server used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use x11rb::errors::ConnectionError;
use x11rb::protocol::xproto::Window;
use x11rb::protocol::ErrorKind;

use crate::core::display::{DisplayClient, GeometryChange, InputEvent};
use crate::window::error::WmError;
use crate::window::geometry::{Geometry, Point};

pub const ROOT: Window = 0x100;
const FIRST_GENERATED_ID: Window = 0x40_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Configure(Window, GeometryChange),
    RaiseAndFocus(Window),
    Create { window: Window, parent: Window, geometry: Geometry, pixel: u32 },
    Destroy(Window),
    Map(Window),
    Unmap(Window),
    GrabPointer,
    UngrabPointer,
}

pub fn stale(bad_value: u32) -> WmError {
    WmError::Stale { kind: ErrorKind::Window, bad_value }
}

fn disconnected() -> WmError {
    let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "script exhausted");
    WmError::Connection(ConnectionError::IoError(io))
}

/// Records every request in order and answers queries from a script.
///
/// Pointer queries pop scripted results in order; once drained, the last
/// known position is reported again. `next_event` fails with a connection
/// error when the event script runs out.
#[derive(Default)]
pub struct FakeDisplay {
    pub geometries: HashMap<Window, Geometry>,
    pub pointer: RefCell<VecDeque<Result<Point, WmError>>>,
    pub events: RefCell<VecDeque<InputEvent>>,
    pub requests: RefCell<Vec<Request>>,
    pub refuse_grab: bool,
    last_pointer: Cell<Point>,
    next_id: Cell<Window>,
    pub flushes: Cell<usize>,
}

impl FakeDisplay {
    pub fn new() -> Self {
        Self { next_id: Cell::new(FIRST_GENERATED_ID), ..Default::default() }
    }

    pub fn with_window(mut self, window: Window, geometry: Geometry) -> Self {
        self.geometries.insert(window, geometry);
        self
    }

    pub fn pointer_at(self, x: i32, y: i32) -> Self {
        self.pointer.borrow_mut().push_back(Ok(Point::new(x, y)));
        self
    }

    pub fn pointer_fails(self) -> Self {
        self.pointer.borrow_mut().push_back(Err(stale(ROOT)));
        self
    }

    pub fn event(self, event: InputEvent) -> Self {
        self.events.borrow_mut().push_back(event);
        self
    }

    /// Queue a motion event paired with the pointer position it will report.
    pub fn motion_to(self, x: i32, y: i32) -> Self {
        self.event(InputEvent::Motion).pointer_at(x, y)
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn configures_of(&self, window: Window) -> Vec<GeometryChange> {
        self.requests
            .borrow()
            .iter()
            .filter_map(|r| match r {
                Request::Configure(w, change) if *w == window => Some(*change),
                _ => None,
            })
            .collect()
    }

    pub fn created(&self) -> Vec<Window> {
        self.requests
            .borrow()
            .iter()
            .filter_map(|r| match r {
                Request::Create { window, .. } => Some(*window),
                _ => None,
            })
            .collect()
    }

    fn record(&self, request: Request) {
        self.requests.borrow_mut().push(request);
    }
}

impl DisplayClient for FakeDisplay {
    fn root(&self) -> Window {
        ROOT
    }

    fn query_geometry(&self, window: Window) -> Result<Geometry, WmError> {
        self.geometries.get(&window).copied().ok_or_else(|| stale(window))
    }

    fn query_pointer(&self) -> Result<Point, WmError> {
        match self.pointer.borrow_mut().pop_front() {
            Some(Ok(point)) => {
                self.last_pointer.set(point);
                Ok(point)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last_pointer.get()),
        }
    }

    fn configure(&self, window: Window, change: GeometryChange) -> Result<(), WmError> {
        self.record(Request::Configure(window, change));
        Ok(())
    }

    fn raise_and_focus(&self, window: Window) -> Result<(), WmError> {
        self.record(Request::RaiseAndFocus(window));
        Ok(())
    }

    fn create_window(&self, parent: Window, geometry: Geometry, pixel: u32) -> Result<Window, WmError> {
        let window = self.next_id.get();
        self.next_id.set(window + 1);
        self.record(Request::Create { window, parent, geometry, pixel });
        Ok(window)
    }

    fn destroy_window(&self, window: Window) -> Result<(), WmError> {
        self.record(Request::Destroy(window));
        Ok(())
    }

    fn map_window(&self, window: Window) -> Result<(), WmError> {
        self.record(Request::Map(window));
        Ok(())
    }

    fn unmap_window(&self, window: Window) -> Result<(), WmError> {
        self.record(Request::Unmap(window));
        Ok(())
    }

    fn grab_pointer(&self) -> Result<bool, WmError> {
        if self.refuse_grab {
            return Ok(false);
        }
        self.record(Request::GrabPointer);
        Ok(true)
    }

    fn ungrab_pointer(&self) -> Result<(), WmError> {
        self.record(Request::UngrabPointer);
        Ok(())
    }

    fn next_event(&self) -> Result<InputEvent, WmError> {
        self.events.borrow_mut().pop_front().ok_or_else(disconnected)
    }

    fn flush(&self) -> Result<(), WmError> {
        self.flushes.set(self.flushes.get() + 1);
        Ok(())
    }
}
