use tracing::debug;
use x11rb::protocol::xproto::Window;

use crate::core::display::DisplayClient;
use crate::window::error::{log_and_ignore, WmError};
use crate::window::geometry::Geometry;

/// Blank stand-in shown in place of a window while it is being resized.
///
/// The surrogate is destroyed when the guard goes away, whichever way the
/// resize ends. Mapping and unmapping are left to the caller so the real
/// window can be swapped out in adjacent requests.
pub struct Surrogate<'a, D: DisplayClient> {
    display: &'a D,
    window: Option<Window>,
}

impl<'a, D: DisplayClient> Surrogate<'a, D> {
    /// Create an unmapped surrogate on the root window covering `geometry`.
    pub fn create(display: &'a D, geometry: Geometry, pixel: u32) -> Result<Self, WmError> {
        let window = display.create_window(display.root(), geometry, pixel)?;
        debug!("Created surrogate {:#x} at {:?}", window, geometry);
        Ok(Self { display, window: Some(window) })
    }

    pub fn window(&self) -> Window {
        self.window.unwrap_or(x11rb::NONE)
    }

    /// Destroy the surrogate now. No request may name it afterwards.
    pub fn destroy(mut self) -> Result<(), WmError> {
        match self.window.take() {
            Some(window) => self.display.destroy_window(window),
            None => Ok(()),
        }
    }
}

impl<D: DisplayClient> Drop for Surrogate<'_, D> {
    fn drop(&mut self) {
        if let Some(window) = self.window.take() {
            log_and_ignore(self.display.destroy_window(window), "destroy surrogate");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fake::{FakeDisplay, Request, ROOT};

    #[test]
    fn test_create_is_unmapped_copy_of_geometry() {
        let display = FakeDisplay::new();
        let geometry = Geometry::new(10, 20, 300, 200);
        let surrogate = Surrogate::create(&display, geometry, 0x00ff00).unwrap();
        let window = surrogate.window();

        assert_eq!(
            display.requests(),
            vec![Request::Create { window, parent: ROOT, geometry, pixel: 0x00ff00 }]
        );
        surrogate.destroy().unwrap();
    }

    #[test]
    fn test_explicit_destroy_happens_once() {
        let display = FakeDisplay::new();
        let surrogate = Surrogate::create(&display, Geometry::new(0, 0, 50, 50), 0).unwrap();
        let window = surrogate.window();
        surrogate.destroy().unwrap();

        let destroys = display.requests().into_iter().filter(|r| *r == Request::Destroy(window)).count();
        assert_eq!(destroys, 1);
    }

    #[test]
    fn test_drop_destroys() {
        let display = FakeDisplay::new();
        let window = {
            let surrogate = Surrogate::create(&display, Geometry::new(0, 0, 50, 50), 0).unwrap();
            surrogate.window()
        };
        assert_eq!(display.requests().last(), Some(&Request::Destroy(window)));
    }
}
