#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All coordinates are CSS pixels. A [`Rect`] is either in document space
//! (scroll-independent, origin at the top of the page) or in client space
//! (relative to the viewport); the conversion between the two is
//! [`Viewport::to_document`] / [`Viewport::to_client`].

/// A point in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle for region bounds and hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    /// Width in pixels. Never negative.
    pub width: f64,
    /// Height in pixels. Never negative.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle. Negative sizes are clamped to zero.
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Grow (positive) or shrink (negative) every side by `margin`.
    ///
    /// Shrinking past zero yields an empty rectangle centered on the
    /// original one.
    pub fn inflate(&self, margin: f64) -> Rect {
        let width = self.width + 2.0 * margin;
        let height = self.height + 2.0 * margin;
        let cx = self.x + self.width / 2.0;
        let cy = self.y + self.height / 2.0;
        let width = width.max(0.0);
        let height = height.max(0.0);
        Rect::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    /// Whether the two rectangles overlap with non-zero area.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    pub fn offset(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// The visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Current vertical scroll offset (`window.scrollY`).
    pub scroll_y: f64,
    /// Viewport width (`innerWidth`).
    pub width: f64,
    /// Viewport height (`innerHeight`).
    pub height: f64,
}

impl Viewport {
    #[inline]
    pub fn new(scroll_y: f64, width: f64, height: f64) -> Self {
        Self {
            scroll_y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// The visible area in document space.
    #[inline]
    pub fn document_rect(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, self.width, self.height)
    }

    /// Convert a client-space rectangle (`getBoundingClientRect`) to document space.
    #[inline]
    pub fn to_document(&self, client: Rect) -> Rect {
        client.offset(0.0, self.scroll_y)
    }

    /// Convert a document-space rectangle to client space.
    #[inline]
    pub fn to_client(&self, document: Rect) -> Rect {
        document.offset(0.0, -self.scroll_y)
    }
}
