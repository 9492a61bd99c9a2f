// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement resolution
//!
//! Walks `IfcLocalPlacement.PlacementRelTo` chains. Two views are offered:
//! a plan view (position plus rotation about Z) used to recover parametric
//! elements, and a full 4x4 matrix used to place meshes. Both carry a
//! visited set; a chain that loops back on itself resolves to identity.

use ifc_bim_model::{DecodedEntity, EntityId, EntityResolver, IfcType};
use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector2, Vector3};
use rustc_hash::FxHashSet;

/// World placement of an object seen from above
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPlacement {
    pub position: Vector3<f64>,
    /// Rotation about +Z, radians
    pub rotation_z: f64,
}

impl WorldPlacement {
    pub const IDENTITY: WorldPlacement = WorldPlacement {
        position: Vector3::new(0.0, 0.0, 0.0),
        rotation_z: 0.0,
    };

    /// `local` expressed in this placement's frame
    ///
    /// Plan offsets are rotated by this placement's rotation; Z adds directly.
    pub fn compose(&self, local: &WorldPlacement) -> WorldPlacement {
        let (sin, cos) = self.rotation_z.sin_cos();
        let l = &local.position;
        WorldPlacement {
            position: Vector3::new(
                self.position.x + cos * l.x - sin * l.y,
                self.position.y + sin * l.x + cos * l.y,
                self.position.z + l.z,
            ),
            rotation_z: self.rotation_z + local.rotation_z,
        }
    }

    /// Scale the translation, e.g. from file units to metres
    pub fn scaled(mut self, scale: f64) -> Self {
        self.position *= scale;
        self
    }
}

impl Default for WorldPlacement {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Resolve the plan view of an object placement
///
/// Returns identity when the placement is missing or its chain is cyclic.
pub fn resolve_placement(resolver: &dyn EntityResolver, placement: EntityId) -> WorldPlacement {
    let mut visited = FxHashSet::default();
    match resolve_plan(resolver, placement, &mut visited) {
        Some(world) => world,
        None => {
            log::debug!("Placement chain from {placement} is cyclic; using identity");
            WorldPlacement::IDENTITY
        }
    }
}

/// `None` only when a cycle is found; broken links end the chain
fn resolve_plan(
    resolver: &dyn EntityResolver,
    id: EntityId,
    visited: &mut FxHashSet<EntityId>,
) -> Option<WorldPlacement> {
    if !visited.insert(id) {
        return None;
    }
    let Some(placement) = resolver.get(id) else {
        return Some(WorldPlacement::IDENTITY);
    };
    if placement.ifc_type != IfcType::IfcLocalPlacement {
        return Some(WorldPlacement::IDENTITY);
    }

    // RelativePlacement at index 1
    let local = placement
        .get_ref(1)
        .and_then(|axis| resolver.get(axis))
        .map(|axis| plan_of_axis(resolver, &axis))
        .unwrap_or_default();

    // PlacementRelTo at index 0
    match placement.get_ref(0) {
        Some(parent) => Some(resolve_plan(resolver, parent, visited)?.compose(&local)),
        None => Some(local),
    }
}

fn plan_of_axis(resolver: &dyn EntityResolver, axis: &DecodedEntity) -> WorldPlacement {
    let position = axis
        .get_ref(0)
        .and_then(|p| read_point(resolver, p))
        .map(|p| p.coords)
        .unwrap_or_else(Vector3::zeros);

    // RefDirection at index 2 for both 2D and 3D placements
    let rotation_z = axis
        .get_ref(2)
        .and_then(|d| read_direction(resolver, d))
        .map(|d| d.y.atan2(d.x))
        .unwrap_or(0.0);

    WorldPlacement {
        position,
        rotation_z,
    }
}

/// Full transform of an object placement, composed root first
///
/// Returns identity when the chain is cyclic.
pub fn placement_matrix(resolver: &dyn EntityResolver, placement: EntityId) -> Matrix4<f64> {
    let mut visited = FxHashSet::default();
    resolve_matrix(resolver, placement, &mut visited).unwrap_or_else(Matrix4::identity)
}

fn resolve_matrix(
    resolver: &dyn EntityResolver,
    id: EntityId,
    visited: &mut FxHashSet<EntityId>,
) -> Option<Matrix4<f64>> {
    if !visited.insert(id) {
        return None;
    }
    let Some(placement) = resolver.get(id) else {
        return Some(Matrix4::identity());
    };

    match placement.ifc_type {
        IfcType::IfcLocalPlacement => {
            let local = placement
                .get_ref(1)
                .and_then(|axis| axis2_placement_3d(resolver, axis))
                .unwrap_or_else(Matrix4::identity);
            match placement.get_ref(0) {
                Some(parent) => Some(resolve_matrix(resolver, parent, visited)? * local),
                None => Some(local),
            }
        }
        IfcType::IfcAxis2Placement3D => {
            Some(axis2_placement_3d(resolver, id).unwrap_or_else(Matrix4::identity))
        }
        _ => Some(Matrix4::identity()),
    }
}

/// Matrix of an `IfcAxis2Placement3D` (also accepts a 2D placement)
pub fn axis2_placement_3d(resolver: &dyn EntityResolver, id: EntityId) -> Option<Matrix4<f64>> {
    let placement = resolver.get(id)?;
    match placement.ifc_type {
        IfcType::IfcAxis2Placement3D => {}
        IfcType::IfcAxis2Placement2D => {
            let m = axis2_placement_2d(resolver, id)?;
            let mut out = Matrix4::identity();
            out.fixed_view_mut::<2, 2>(0, 0).copy_from(&m.fixed_view::<2, 2>(0, 0));
            out[(0, 3)] = m[(0, 2)];
            out[(1, 3)] = m[(1, 2)];
            return Some(out);
        }
        _ => return None,
    }

    let location = placement
        .get_ref(0)
        .and_then(|p| read_point(resolver, p))
        .unwrap_or_else(Point3::origin);
    let axis = placement
        .get_ref(1)
        .and_then(|d| read_direction(resolver, d))
        .and_then(|d| d.try_normalize(1e-12))
        .unwrap_or_else(Vector3::z);
    let ref_dir = placement
        .get_ref(2)
        .and_then(|d| read_direction(resolver, d))
        .unwrap_or_else(Vector3::x);

    // Project RefDirection onto the plane normal to Axis
    let x = (ref_dir - axis * ref_dir.dot(&axis))
        .try_normalize(1e-12)
        .or_else(|| any_perpendicular(&axis))?;
    let y = axis.cross(&x);

    Some(Matrix4::new(
        x.x, y.x, axis.x, location.x, //
        x.y, y.y, axis.y, location.y, //
        x.z, y.z, axis.z, location.z, //
        0.0, 0.0, 0.0, 1.0,
    ))
}

/// Homogeneous 2D matrix of an `IfcAxis2Placement2D`
pub fn axis2_placement_2d(resolver: &dyn EntityResolver, id: EntityId) -> Option<Matrix3<f64>> {
    let placement = resolver.get(id)?;
    if placement.ifc_type != IfcType::IfcAxis2Placement2D {
        return None;
    }

    let location = placement
        .get_ref(0)
        .and_then(|p| read_point(resolver, p))
        .map(|p| Point2::new(p.x, p.y))
        .unwrap_or_else(Point2::origin);
    let x = placement
        .get_ref(1)
        .and_then(|d| read_direction(resolver, d))
        .map(|d| Vector2::new(d.x, d.y))
        .and_then(|d| d.try_normalize(1e-12))
        .unwrap_or_else(Vector2::x);

    Some(Matrix3::new(
        x.x, -x.y, location.x, //
        x.y, x.x, location.y, //
        0.0, 0.0, 1.0,
    ))
}

fn any_perpendicular(axis: &Vector3<f64>) -> Option<Vector3<f64>> {
    let helper = if axis.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
    axis.cross(&helper).try_normalize(1e-12)
}

/// Coordinates of an `IfcCartesianPoint`; missing components are zero
pub fn read_point(resolver: &dyn EntityResolver, id: EntityId) -> Option<Point3<f64>> {
    let point = resolver.get(id)?;
    if point.ifc_type != IfcType::IfcCartesianPoint {
        return None;
    }
    let coords = point.get_list(0)?;
    let c = |i: usize| coords.get(i).and_then(|v| v.as_float()).unwrap_or(0.0);
    Some(Point3::new(c(0), c(1), c(2)))
}

/// Ratios of an `IfcDirection`; a 2D direction gets z = 0
pub fn read_direction(resolver: &dyn EntityResolver, id: EntityId) -> Option<Vector3<f64>> {
    let direction = resolver.get(id)?;
    if direction.ifc_type != IfcType::IfcDirection {
        return None;
    }
    let ratios = direction.get_list(0)?;
    let c = |i: usize| ratios.get(i).and_then(|v| v.as_float()).unwrap_or(0.0);
    Some(Vector3::new(c(0), c(1), c(2)))
}
