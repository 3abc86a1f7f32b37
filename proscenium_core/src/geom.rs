// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry helpers on top of [`kurbo`].
//!
//! A node's local matrix is built from nine attributes (position, scale,
//! rotation, skew, and anchor) by [`create_box`]. Rotation and skew are in
//! degrees; rotation is folded into both skew angles, so a pure rotation is a
//! skew of equal angles on both axes.
//!
//! Matrices compose in column-vector order: a child's composed matrix is
//! `parent_composed * child_local`.

use kurbo::{Affine, Point, Rect};

/// The nine attributes that define a node's local matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalTransform {
    /// Horizontal position in the parent's space.
    pub x: f64,
    /// Vertical position in the parent's space.
    pub y: f64,
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Rotation in degrees, clockwise in a y-down space.
    pub rotation: f64,
    /// Horizontal skew in degrees.
    pub skew_x: f64,
    /// Vertical skew in degrees.
    pub skew_y: f64,
    /// Pivot x in the node's local space.
    pub anchor_x: f64,
    /// Pivot y in the node's local space.
    pub anchor_y: f64,
}

impl LocalTransform {
    /// Identity: no offset, unit scale, no rotation, skew, or anchor.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        rotation: 0.0,
        skew_x: 0.0,
        skew_y: 0.0,
        anchor_x: 0.0,
        anchor_y: 0.0,
    };

    /// Returns the local matrix described by these attributes.
    #[inline]
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        create_box(self)
    }
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Builds a local matrix from transform attributes.
///
/// The anchor is a pivot: the local point `(anchor_x, anchor_y)` lands at
/// `(x + anchor_x, y + anchor_y)` in the parent's space regardless of scale,
/// rotation, or skew.
#[must_use]
pub fn create_box(t: &LocalTransform) -> Affine {
    let skew_x = (t.skew_x + t.rotation).to_radians();
    let skew_y = (t.skew_y + t.rotation).to_radians();
    let a = skew_y.cos() * t.scale_x;
    let b = skew_y.sin() * t.scale_x;
    let c = -skew_x.sin() * t.scale_y;
    let d = skew_x.cos() * t.scale_y;
    let tx = t.x + t.anchor_x - (t.anchor_x * a + t.anchor_y * c);
    let ty = t.y + t.anchor_y - (t.anchor_x * b + t.anchor_y * d);
    Affine::new([a, b, c, d, tx, ty])
}

/// Returns the axis-aligned box of the four corners of `rect` mapped by
/// `affine`.
#[inline]
#[must_use]
pub fn bounding_box(affine: Affine, rect: Rect) -> Rect {
    affine.transform_rect_bbox(rect)
}

/// Clips `rect` against `clip` on all four edges.
///
/// The result is never larger than either input. Disjoint inputs collapse to
/// a zero-area rectangle.
#[must_use]
pub fn clip_rect(rect: Rect, clip: Rect) -> Rect {
    let rect = rect.abs();
    let clip = clip.abs();
    let x0 = rect.x0.max(clip.x0);
    let y0 = rect.y0.max(clip.y0);
    let x1 = rect.x1.min(clip.x1).max(x0);
    let y1 = rect.y1.min(clip.y1).max(y0);
    Rect::new(x0, y0, x1, y1)
}

/// Whether `rect` has no area.
#[inline]
#[must_use]
pub fn is_zero_area(rect: Rect) -> bool {
    !(rect.width().abs() > 0.0 && rect.height().abs() > 0.0)
}

/// Edge-inclusive containment. Zero-area rectangles contain nothing.
#[must_use]
pub fn contains_inclusive(rect: Rect, point: Point) -> bool {
    if is_zero_area(rect) {
        return false;
    }
    let rect = rect.abs();
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Returns the inverse of `affine`, or `None` if it is singular.
#[must_use]
pub fn invert(affine: Affine) -> Option<Affine> {
    let det = affine.determinant();
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let inv = affine.inverse();
    inv.is_finite().then_some(inv)
}

/// Union of two rectangles, ignoring zero-area operands.
#[must_use]
pub fn union_non_empty(a: Rect, b: Rect) -> Rect {
    match (is_zero_area(a), is_zero_area(b)) {
        (true, true) => Rect::ZERO,
        (true, false) => b,
        (false, true) => a,
        (false, false) => a.union(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_eq(a: Point, b: Point, eps: f64) {
        assert!(
            (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps,
            "expected {b:?}, got {a:?}"
        );
    }

    #[test]
    fn identity_attributes_give_identity_matrix() {
        let m = create_box(&LocalTransform::IDENTITY);
        let eps = 1e-9;
        for (got, want) in m.as_coeffs().iter().zip(Affine::IDENTITY.as_coeffs()) {
            assert!((got - want).abs() < eps, "coefficient mismatch");
        }
    }

    #[test]
    fn translation_and_scale() {
        let t = LocalTransform {
            x: 10.0,
            y: 20.0,
            scale_x: 2.0,
            scale_y: 3.0,
            ..LocalTransform::IDENTITY
        };
        let p = create_box(&t) * Point::new(1.0, 1.0);
        assert_point_eq(p, Point::new(12.0, 23.0), 1e-9);
    }

    #[test]
    fn rotation_is_clockwise_in_y_down_space() {
        let t = LocalTransform {
            rotation: 90.0,
            ..LocalTransform::IDENTITY
        };
        let p = create_box(&t) * Point::new(1.0, 0.0);
        assert_point_eq(p, Point::new(0.0, 1.0), 1e-9);
    }

    #[test]
    fn anchor_is_a_fixed_pivot() {
        let t = LocalTransform {
            x: 5.0,
            y: 7.0,
            scale_x: 3.0,
            scale_y: 0.5,
            rotation: 33.0,
            skew_x: 4.0,
            anchor_x: 20.0,
            anchor_y: 10.0,
            ..LocalTransform::IDENTITY
        };
        let p = create_box(&t) * Point::new(20.0, 10.0);
        assert_point_eq(p, Point::new(25.0, 17.0), 1e-9);
    }

    #[test]
    fn composition_is_parent_times_child() {
        let a = create_box(&LocalTransform {
            x: 10.0,
            ..LocalTransform::IDENTITY
        });
        let b = create_box(&LocalTransform {
            scale_x: 2.0,
            scale_y: 2.0,
            ..LocalTransform::IDENTITY
        });
        let c = create_box(&LocalTransform {
            x: 1.0,
            y: 1.0,
            ..LocalTransform::IDENTITY
        });
        let origin = a * b * c * Point::ORIGIN;
        assert_point_eq(origin, Point::new(12.0, 2.0), 1e-9);
    }

    #[test]
    fn clip_overlap_and_disjoint() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        let clipped = clip_rect(r, Rect::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!(clipped, Rect::new(10.0, 10.0, 20.0, 20.0));

        let disjoint = clip_rect(r, Rect::new(200.0, 200.0, 210.0, 210.0));
        assert!(is_zero_area(disjoint), "disjoint clip must collapse");
        assert!(!contains_inclusive(disjoint, Point::new(200.0, 200.0)));
    }

    #[test]
    fn containment_is_edge_inclusive() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(contains_inclusive(r, Point::new(100.0, 100.0)));
        assert!(contains_inclusive(r, Point::new(0.0, 50.0)));
        assert!(!contains_inclusive(r, Point::new(100.01, 50.0)));
        assert!(!contains_inclusive(Rect::ZERO, Point::ORIGIN));
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        assert!(invert(Affine::scale(0.0)).is_none());
        let m = Affine::translate((3.0, 4.0)) * Affine::scale(2.0);
        let inv = invert(m).expect("invertible");
        assert_point_eq(inv * (m * Point::new(7.0, -2.0)), Point::new(7.0, -2.0), 1e-9);
    }

    #[test]
    fn union_skips_empty_rects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(union_non_empty(a, Rect::ZERO), a);
        assert_eq!(union_non_empty(Rect::ZERO, a), a);
        assert_eq!(
            union_non_empty(a, Rect::new(20.0, 20.0, 30.0, 30.0)),
            Rect::new(0.0, 0.0, 30.0, 30.0)
        );
    }
}
