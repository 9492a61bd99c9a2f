// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion operations - converting 2D profiles to 3D meshes

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::profile::{Profile2D, Triangulation};
use nalgebra::{Matrix4, Point2, Point3, Vector3};

/// Extrude a 2D profile along +Z by `depth`
///
/// The profile's winding does not matter; clockwise rings are flipped so
/// side normals point outwards.
pub fn extrude_profile(
    profile: &Profile2D,
    depth: f64,
    transform: Option<Matrix4<f64>>,
) -> Result<Mesh> {
    if !(depth > 0.0) {
        return Err(Error::degenerate(format!("extrusion depth must be positive, got {depth}")));
    }

    let mut profile = profile.clone();
    if profile.signed_area() < 0.0 {
        profile.outer.reverse();
    }

    let triangulation = profile.triangulate()?;
    let mut mesh = Mesh::with_capacity(
        triangulation.points.len() * 2 + profile.outer.len() * 4,
        triangulation.indices.len() * 2 + profile.outer.len() * 6,
    );

    create_cap(&triangulation, 0.0, false, &mut mesh);
    create_cap(&triangulation, depth, true, &mut mesh);
    create_side_walls(&profile.outer, depth, &mut mesh);
    for hole in &profile.holes {
        create_side_walls(hole, depth, &mut mesh);
    }

    if let Some(matrix) = transform {
        mesh.transform(&matrix);
    }

    Ok(mesh)
}

/// Shear that turns a +Z extrusion into one along `direction`
///
/// Returns `None` for +Z itself and for directions lying in the profile plane.
pub fn direction_shear(direction: &Vector3<f64>) -> Option<Matrix4<f64>> {
    let d = direction.try_normalize(1e-12)?;
    if d.z.abs() < 1e-9 || (d - Vector3::z()).norm() < 1e-9 {
        return None;
    }
    let mut shear = Matrix4::identity();
    shear[(0, 2)] = d.x;
    shear[(1, 2)] = d.y;
    shear[(2, 2)] = d.z;
    Some(shear)
}

fn create_cap(triangulation: &Triangulation, z: f64, top: bool, mesh: &mut Mesh) {
    let base = mesh.vertex_count() as u32;
    let normal = if top { Vector3::z() } else { -Vector3::z() };

    for p in &triangulation.points {
        mesh.add_vertex(Point3::new(p.x, p.y, z), normal);
    }

    for tri in triangulation.indices.chunks_exact(3) {
        let (i0, i1, i2) = (
            base + tri[0] as u32,
            base + tri[1] as u32,
            base + tri[2] as u32,
        );
        if top {
            mesh.add_triangle(i0, i1, i2);
        } else {
            mesh.add_triangle(i0, i2, i1);
        }
    }
}

fn create_side_walls(boundary: &[Point2<f64>], depth: f64, mesh: &mut Mesh) {
    for i in 0..boundary.len() {
        let (p0, p1) = (&boundary[i], &boundary[(i + 1) % boundary.len()]);

        // Outward normal of a counter-clockwise edge; skip duplicate points
        let Some(normal) = Vector3::new(p1.y - p0.y, p0.x - p1.x, 0.0).try_normalize(1e-10) else {
            continue;
        };

        let idx = mesh.vertex_count() as u32;
        mesh.add_vertex(Point3::new(p0.x, p0.y, 0.0), normal);
        mesh.add_vertex(Point3::new(p1.x, p1.y, 0.0), normal);
        mesh.add_vertex(Point3::new(p1.x, p1.y, depth), normal);
        mesh.add_vertex(Point3::new(p0.x, p0.y, depth), normal);

        mesh.add_triangle(idx, idx + 1, idx + 2);
        mesh.add_triangle(idx, idx + 2, idx + 3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_extrude_box() {
        let mesh = extrude_profile(&Profile2D::rectangle(2.0, 1.0), 3.0, None).unwrap();
        // 2 caps of 2 triangles, 4 sides of 2 triangles
        assert_eq!(mesh.triangle_count(), 12);

        let (min, max) = mesh.bounds().unwrap();
        assert_relative_eq!(min.x, -1.0);
        assert_relative_eq!(max.y, 0.5);
        assert_relative_eq!(max.z, 3.0);
    }

    #[test]
    fn test_clockwise_profile_gets_outward_normals() {
        let mut profile = Profile2D::rectangle(2.0, 2.0);
        profile.outer.reverse();
        let mesh = extrude_profile(&profile, 1.0, None).unwrap();

        // First side quad follows the bottom edge y = -1, normal must face -Y
        let side_start = 8 * 3;
        assert_relative_eq!(mesh.normals[side_start + 1], -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_depth_is_rejected() {
        assert!(extrude_profile(&Profile2D::rectangle(1.0, 1.0), 0.0, None).is_err());
    }

    #[test]
    fn test_oblique_extrusion() {
        let shear = direction_shear(&Vector3::new(1.0, 0.0, 1.0)).unwrap();
        let mesh = extrude_profile(&Profile2D::rectangle(1.0, 1.0), 2.0, Some(shear)).unwrap();
        let (_, max) = mesh.bounds().unwrap();
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(max.z, 2.0 * s, epsilon = 1e-6);
        assert_relative_eq!(max.x, 0.5 + 2.0 * s, epsilon = 1e-6);
        assert!(direction_shear(&Vector3::z()).is_none());
    }
}
