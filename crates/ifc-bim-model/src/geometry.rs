// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry collaborator interface

use crate::{EntityId, EntityResolver};
use serde::{Deserialize, Serialize};

/// Up-axis convention of mesh data
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateSystem {
    /// IFC native: Z is up
    #[default]
    #[serde(rename = "z-up", alias = "zUp", alias = "ZUp")]
    ZUp,
    /// Renderer convention: Y is up
    #[serde(rename = "y-up", alias = "yUp", alias = "YUp")]
    YUp,
}

impl CoordinateSystem {
    /// Map a point of this convention into Z-up (`y' = z, z' = y` for Y-up)
    #[inline]
    pub fn to_z_up(&self, p: [f64; 3]) -> [f64; 3] {
        match self {
            CoordinateSystem::ZUp => p,
            CoordinateSystem::YUp => [p[0], p[2], p[1]],
        }
    }
}

/// One triangulated piece of an element
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlacedMesh {
    /// Column-major 4x4 instance transform
    pub transform: [f64; 16],
    /// Flattened [x, y, z, ...] vertex positions, before `transform`
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl PlacedMesh {
    /// Column-major identity
    pub const IDENTITY: [f64; 16] = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];

    /// Vertex `i` multiplied by the instance transform
    pub fn transformed_vertex(&self, i: usize) -> Option<[f64; 3]> {
        let v = self.vertices.get(i * 3..i * 3 + 3)?;
        let (x, y, z) = (v[0] as f64, v[1] as f64, v[2] as f64);
        let m = &self.transform;
        Some([
            m[0] * x + m[4] * y + m[8] * z + m[12],
            m[1] * x + m[5] * y + m[9] * z + m[13],
            m[2] * x + m[6] * y + m[10] * z + m[14],
        ])
    }
}

/// A solid-modeling/triangulation kernel
///
/// Given an opened graph and an element id, returns the element's
/// triangulated geometry. Used only by the decoder's bounding-box fallback.
pub trait GeometryKernel {
    /// Up-axis of the vertices and transforms this kernel produces
    fn output_convention(&self) -> CoordinateSystem;

    /// Triangulate the body representation of `element`
    fn element_meshes(&self, resolver: &dyn EntityResolver, element: EntityId) -> Vec<PlacedMesh>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_y_up_swap() {
        assert_eq!(CoordinateSystem::YUp.to_z_up([1.0, 2.0, 3.0]), [1.0, 3.0, 2.0]);
        assert_eq!(CoordinateSystem::ZUp.to_z_up([1.0, 2.0, 3.0]), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_transformed_vertex_applies_translation() {
        let mut transform = PlacedMesh::IDENTITY;
        transform[12] = 10.0;
        transform[14] = -1.0;
        let mesh = PlacedMesh {
            transform,
            vertices: vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0],
            indices: vec![],
        };
        assert_eq!(mesh.transformed_vertex(1), Some([11.0, 2.0, 2.0]));
        assert_eq!(mesh.transformed_vertex(2), None);
    }

    #[test]
    fn test_coordinate_system_serde_names() {
        let cs: CoordinateSystem = serde_json::from_str("\"y-up\"").unwrap();
        assert_eq!(cs, CoordinateSystem::YUp);
        assert_eq!(serde_json::to_string(&CoordinateSystem::ZUp).unwrap(), "\"z-up\"");
    }
}
