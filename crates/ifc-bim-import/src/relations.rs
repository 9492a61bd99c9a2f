// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door and window position along the host wall

use ifc_bim_model::{Point2, WallData};

/// Projections beyond this range are treated as not belonging to the wall
const NEAR_RANGE: (f64, f64) = (-1.0, 2.0);

/// Kept margin from either wall end
const END_MARGIN: f64 = 0.1;

/// Position used when the projection is unusable
pub const DEFAULT_POSITION: f64 = 0.5;

/// Result of projecting a point onto a wall axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WallPosition {
    /// Fraction along the axis, clamped to keep a margin from the ends
    Along(f64),
    /// Raw projection far outside the wall
    FarOutside(f64),
}

impl WallPosition {
    /// The fraction to store on the element
    pub fn value(&self) -> f64 {
        match self {
            WallPosition::Along(t) => *t,
            WallPosition::FarOutside(_) => DEFAULT_POSITION,
        }
    }
}

/// Project `point` onto the wall axis
///
/// `t = dot(p - start, end - start) / |end - start|²`. A zero-length wall
/// gives the default position.
pub fn position_on_wall(wall: &WallData, point: Point2) -> WallPosition {
    let (dx, dy) = (wall.end.x - wall.start.x, wall.end.y - wall.start.y);
    let length_sq = dx * dx + dy * dy;
    if !length_sq.is_finite() || length_sq <= 0.0 {
        return WallPosition::Along(DEFAULT_POSITION);
    }

    let t = ((point.x - wall.start.x) * dx + (point.y - wall.start.y) * dy) / length_sq;
    if !t.is_finite() || t < NEAR_RANGE.0 || t > NEAR_RANGE.1 {
        return WallPosition::FarOutside(t);
    }
    WallPosition::Along(t.clamp(END_MARGIN, 1.0 - END_MARGIN))
}

/// Prefer the mesh-based projection unless it landed on the default
pub fn choose_position(
    from_mesh: Option<WallPosition>,
    from_placement: WallPosition,
) -> WallPosition {
    match from_mesh {
        Some(position) if position.value() != DEFAULT_POSITION => position,
        _ => from_placement,
    }
}
