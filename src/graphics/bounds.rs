use kurbo::{Point, Rect};

/// Axis-aligned rectangle with a "does not exist" sentinel.
///
/// [`Bounds::NONE`] is the identity element for [`Bounds::add`]: unioning with
/// it is a no-op, and unioning it with anything yields that thing. The
/// sentinel is a `const` and `Bounds` is `Copy`, so consumers always work on
/// their own copy — there is no shared instance to corrupt.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width, non-negative for existing bounds.
    pub width: f64,
    /// Height, non-negative for existing bounds.
    pub height: f64,
}

impl Bounds {
    /// The non-existent bounds, identity for union.
    pub const NONE: Bounds = Bounds {
        x: f64::NAN,
        y: f64::NAN,
        width: f64::NAN,
        height: f64::NAN,
    };

    /// Bounds from origin and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Copy all fields from `other`.
    pub fn load(&mut self, other: &Bounds) {
        self.x = other.x;
        self.y = other.y;
        self.width = other.width;
        self.height = other.height;
    }

    /// Load from two arbitrary corners, normalizing so that origin is the
    /// minimum corner and width/height are non-negative.
    pub fn load_diag(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let (x1, x2) = if x2 < x1 { (x2, x1) } else { (x1, x2) };
        let (y1, y2) = if y2 < y1 { (y2, y1) } else { (y1, y2) };
        self.x = x1;
        self.y = y1;
        self.width = x2 - x1;
        self.height = y2 - y1;
    }

    /// Left edge.
    pub fn min_x(&self) -> f64 {
        self.x
    }

    /// Top edge.
    pub fn min_y(&self) -> f64 {
        self.y
    }

    /// Right edge.
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Union in place: grow to the minimal rectangle covering both.
    ///
    /// If `other` does not exist this is a no-op; if `self` does not exist it
    /// becomes a copy of `other`.
    pub fn add(&mut self, other: &Bounds) {
        if !other.exists() {
            return;
        }
        if self.exists() {
            self.load_diag(
                self.min_x().min(other.min_x()),
                self.min_y().min(other.min_y()),
                self.max_x().max(other.max_x()),
                self.max_y().max(other.max_y()),
            );
        } else {
            self.load(other);
        }
    }

    /// Extend the rectangle to cover `pt`.
    ///
    /// # Panics
    ///
    /// The bounds must already exist; extending [`Bounds::NONE`] by a point
    /// has no defined result.
    pub fn add_point(&mut self, pt: Point) {
        assert!(
            self.exists(),
            "Bounds::add_point requires existing bounds; seed with load/load_diag first"
        );
        self.load_diag(
            self.min_x().min(pt.x),
            self.min_y().min(pt.y),
            self.max_x().max(pt.x),
            self.max_y().max(pt.y),
        );
    }

    /// The four corners, clockwise from top-left.
    pub fn to_points(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
    }

    /// Whether this is a valid rectangle rather than the sentinel.
    pub fn exists(&self) -> bool {
        !self.x.is_nan()
    }

    /// Convert to a [`kurbo::Rect`], `None` for non-existent bounds.
    pub fn to_rect(&self) -> Option<Rect> {
        self.exists()
            .then(|| Rect::new(self.x, self.y, self.x + self.width, self.y + self.height))
    }
}

impl From<Rect> for Bounds {
    fn from(r: Rect) -> Self {
        Self {
            x: r.min_x(),
            y: r.min_y(),
            width: r.width(),
            height: r.height(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graphics/bounds.rs"]
mod tests;
