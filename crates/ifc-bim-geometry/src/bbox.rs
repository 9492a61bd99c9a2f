// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! World bounding boxes of placed meshes

use ifc_bim_model::{Bounds3, CoordinateSystem, PlacedMesh};

/// Accumulate the Z-up world box of `meshes`
///
/// Each vertex goes through its mesh's instance transform, then back from
/// `convention` to Z-up. Returns `None` when there are no vertices.
pub fn mesh_bounds(meshes: &[PlacedMesh], convention: CoordinateSystem) -> Option<Bounds3> {
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    let mut any = false;

    for mesh in meshes {
        for i in 0..mesh.vertices.len() / 3 {
            let Some(world) = mesh.transformed_vertex(i) else {
                continue;
            };
            let p = convention.to_z_up(world);
            if !p.iter().all(|c| c.is_finite()) {
                continue;
            }
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
            any = true;
        }
    }

    any.then(|| Bounds3 {
        min: ifc_bim_model::Point3::new(min[0], min[1], min[2]),
        max: ifc_bim_model::Point3::new(max[0], max[1], max[2]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle(transform: [f64; 16]) -> PlacedMesh {
        PlacedMesh {
            transform,
            vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0, 3.0],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_bounds_apply_instance_transform() {
        let mut transform = PlacedMesh::IDENTITY;
        transform[12] = 5.0;
        let bounds = mesh_bounds(&[unit_triangle(transform)], CoordinateSystem::ZUp).unwrap();
        assert_relative_eq!(bounds.min.x, 5.0);
        assert_relative_eq!(bounds.max.x, 6.0);
        assert_relative_eq!(bounds.max.z, 3.0);
    }

    #[test]
    fn test_y_up_meshes_are_swapped_back() {
        let meshes = [unit_triangle(PlacedMesh::IDENTITY)];
        let bounds = mesh_bounds(&meshes, CoordinateSystem::YUp).unwrap();
        assert_relative_eq!(bounds.max.y, 3.0);
        assert_relative_eq!(bounds.max.z, 2.0);
    }

    #[test]
    fn test_empty_input_has_no_bounds() {
        assert!(mesh_bounds(&[], CoordinateSystem::ZUp).is_none());
        assert!(mesh_bounds(&[PlacedMesh::default()], CoordinateSystem::ZUp).is_none());
    }
}
