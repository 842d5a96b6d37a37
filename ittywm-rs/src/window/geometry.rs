use x11rb::protocol::xproto::GetGeometryReply;

/// Smallest width or height a window may be resized to.
pub const MIN_SIZE: u32 = 32;

/// Absolute pointer position on the root window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise `self - origin`.
    pub fn delta_from(self, origin: Point) -> (i32, i32) {
        (self.x - origin.x, self.y - origin.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }

    /// Grow or shrink by the given deltas, flooring each dimension at [`MIN_SIZE`].
    pub fn resize_by(&mut self, dx: i32, dy: i32) {
        self.width = floor_dimension(self.width, dx);
        self.height = floor_dimension(self.height, dy);
    }

    /// Values saturated into the X11 wire types.
    pub fn to_wire(&self) -> (i16, i16, u16, u16) {
        (
            saturate_i16(self.x),
            saturate_i16(self.y),
            u16::try_from(self.width).unwrap_or(u16::MAX),
            u16::try_from(self.height).unwrap_or(u16::MAX),
        )
    }
}

impl From<&GetGeometryReply> for Geometry {
    fn from(reply: &GetGeometryReply) -> Self {
        Self::new(reply.x.into(), reply.y.into(), reply.width.into(), reply.height.into())
    }
}

fn floor_dimension(current: u32, delta: i32) -> u32 {
    let next = i64::from(current) + i64::from(delta);
    if next < i64::from(MIN_SIZE) {
        MIN_SIZE
    } else {
        u32::try_from(next).unwrap_or(u32::MAX)
    }
}

fn saturate_i16(v: i32) -> i16 {
    v.clamp(i16::MIN.into(), i16::MAX.into()) as i16
}
