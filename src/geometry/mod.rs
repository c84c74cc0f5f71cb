//! Axis-aligned boxes in normalized image coordinates.

/// Denominator guard for IoU of degenerate boxes.
const IOU_EPSILON: f32 = 1e-10;

/// Axis-aligned box stored as top-left corner plus size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BBox {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl BBox {
    /// Builds a box from its top-left corner and size.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Builds a box from its center and size.
    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x: cx - w / 2.0,
            y: cy - h / 2.0,
            w,
            h,
        }
    }

    /// Returns the x coordinate of the right edge.
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Returns the y coordinate of the bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Returns `w * h`; negative when exactly one side is negative.
    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// Intersection-over-union with `other`; see [`iou`].
    pub fn iou(&self, other: &BBox) -> f32 {
        iou(self, other)
    }
}

/// Computes intersection-over-union, clamped to `[0, 1]`.
///
/// Intersection width and height are clamped to zero independently, so boxes
/// that are disjoint along both axes cannot produce a positive product. NaN
/// results from degenerate boxes are reported as 0.
pub fn iou(a: &BBox, b: &BBox) -> f32 {
    let left = a.x.max(b.x);
    let top = a.y.max(b.y);
    let right = a.right().min(b.right());
    let bottom = a.bottom().min(b.bottom());

    let inner_w = (right - left).max(0.0);
    let inner_h = (bottom - top).max(0.0);
    let inner_area = inner_w * inner_h;

    let r = inner_area / (a.area() + b.area() - inner_area + IOU_EPSILON);
    if r.is_nan() {
        return 0.0;
    }
    r.clamp(0.0, 1.0)
}
