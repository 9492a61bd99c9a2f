// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-element decoders
//!
//! Each decoder tries the element's swept solid first and falls back to
//! the world bounding box of its meshes. Lengths come out in metres and
//! heights relative to the storey.

mod column;
mod fill;
mod furniture;
mod slab;
mod space;
mod stair;
mod wall;

use ifc_bim_geometry::{Matrix3, SweptSolid, WorldPlacement};
use ifc_bim_model::{Bounds3, Point2};

/// Maps points of a swept solid's profile plane into world plan
pub(crate) struct SolidFrame<'a> {
    pub placement: &'a WorldPlacement,
    pub solid: &'a SweptSolid,
    pub unit_scale: f64,
}

impl SolidFrame<'_> {
    /// Profile point to world plan, metres
    pub fn to_world(&self, x: f64, y: f64) -> Point2 {
        let m = &self.solid.position;
        let lx = (m[(0, 0)] * x + m[(0, 1)] * y + m[(0, 3)]) * self.unit_scale;
        let ly = (m[(1, 0)] * x + m[(1, 1)] * y + m[(1, 3)]) * self.unit_scale;
        let (sin, cos) = self.placement.rotation_z.sin_cos();
        Point2::new(
            self.placement.position.x + cos * lx - sin * ly,
            self.placement.position.y + sin * lx + cos * ly,
        )
    }

    /// Rotation about Z of the profile plane in world plan
    pub fn rotation_z(&self) -> f64 {
        let m = &self.solid.position;
        self.placement.rotation_z + m[(1, 0)].atan2(m[(0, 0)])
    }

    /// World height of the solid's underside
    pub fn base_z(&self) -> f64 {
        self.placement.position.z + self.solid.base_z() * self.unit_scale
    }

    pub fn length(&self, value: f64) -> f64 {
        value * self.unit_scale
    }
}

/// Rotation encoded in a 2D profile position
pub(crate) fn profile_rotation(position: &Matrix3<f64>) -> f64 {
    position[(1, 0)].atan2(position[(0, 0)])
}

/// Corners of a positioned rectangle profile, counter-clockwise
pub(crate) fn rectangle_corners(
    x_dim: f64,
    y_dim: f64,
    position: &Matrix3<f64>,
) -> Vec<(f64, f64)> {
    let (hx, hy) = (x_dim / 2.0, y_dim / 2.0);
    [(-hx, -hy), (hx, -hy), (hx, hy), (-hx, hy)]
        .into_iter()
        .map(|(x, y)| {
            (
                position[(0, 0)] * x + position[(0, 1)] * y + position[(0, 2)],
                position[(1, 0)] * x + position[(1, 1)] * y + position[(1, 2)],
            )
        })
        .collect()
}

/// Plan corners of a box, counter-clockwise
pub(crate) fn bounds_outline(bounds: &Bounds3) -> Vec<Point2> {
    vec![
        Point2::new(bounds.min.x, bounds.min.y),
        Point2::new(bounds.max.x, bounds.min.y),
        Point2::new(bounds.max.x, bounds.max.y),
        Point2::new(bounds.min.x, bounds.max.y),
    ]
}
