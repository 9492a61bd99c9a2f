// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use ifc_bim_model::MeshData;
use nalgebra::{Matrix4, Point3, Vector3};

/// Triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz); may be empty for raw face sets
    pub normals: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions
            .extend([position.x as f32, position.y as f32, position.z as f32]);
        self.normals
            .extend([normal.x as f32, normal.y as f32, normal.z as f32]);
    }

    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend([i0, i1, i2]);
    }

    /// Append another mesh, re-basing its indices
    ///
    /// Normals are kept only while both meshes carry them.
    pub fn merge(&mut self, other: &Mesh) {
        if other.is_empty() {
            return;
        }

        let keep_normals = self.normals.len() == self.positions.len()
            && other.normals.len() == other.positions.len();
        let vertex_offset = self.vertex_count() as u32;

        self.positions.extend_from_slice(&other.positions);
        if keep_normals {
            self.normals.extend_from_slice(&other.normals);
        } else {
            self.normals.clear();
        }
        self.indices
            .extend(other.indices.iter().map(|&i| i + vertex_offset));
    }

    /// Transform positions, and normals by the inverse transpose
    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        self.positions.chunks_exact_mut(3).for_each(|chunk| {
            let p = matrix.transform_point(&Point3::new(
                chunk[0] as f64,
                chunk[1] as f64,
                chunk[2] as f64,
            ));
            chunk[0] = p.x as f32;
            chunk[1] = p.y as f32;
            chunk[2] = p.z as f32;
        });

        let normal_matrix = matrix.try_inverse().unwrap_or(*matrix).transpose();
        self.normals.chunks_exact_mut(3).for_each(|chunk| {
            let n = Vector3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
            let t = normal_matrix.transform_vector(&n);
            let t = t.try_normalize(1e-12).unwrap_or(t);
            chunk[0] = t.x as f32;
            chunk[1] = t.y as f32;
            chunk[2] = t.z as f32;
        });
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Axis-aligned bounds, or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut chunks = self.positions.chunks_exact(3);
        let first = chunks.next()?;
        let start = Point3::new(first[0] as f64, first[1] as f64, first[2] as f64);

        Some(chunks.fold((start, start), |(mut min, mut max), c| {
            for axis in 0..3 {
                let v = c[axis] as f64;
                min[axis] = min[axis].min(v);
                max[axis] = max[axis].max(v);
            }
            (min, max)
        }))
    }

    /// Drop triangles that reference missing vertices
    pub fn retain_valid_triangles(&mut self) {
        let count = self.vertex_count() as u32;
        let valid: Vec<u32> = self
            .indices
            .chunks_exact(3)
            .filter(|t| t.iter().all(|&i| i < count))
            .flatten()
            .copied()
            .collect();
        self.indices = valid;
    }

    /// Mesh data in the Y-up renderer convention
    ///
    /// Swaps Y and Z and reverses triangle winding so faces keep facing out.
    pub fn to_y_up_data(&self) -> MeshData {
        let swap = |buffer: &[f32]| -> Vec<f32> {
            buffer
                .chunks_exact(3)
                .flat_map(|c| [c[0], c[2], c[1]])
                .collect()
        };
        MeshData {
            positions: swap(&self.positions),
            normals: swap(&self.normals),
            indices: self
                .indices
                .chunks_exact(3)
                .flat_map(|t| [t[0], t[2], t[1]])
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.bounds().is_none());
    }

    #[test]
    fn test_merge_rebases_indices() {
        let mut a = Mesh::new();
        for x in 0..3 {
            a.add_vertex(Point3::new(x as f64, 0.0, 0.0), Vector3::z());
        }
        a.add_triangle(0, 1, 2);

        let mut b = a.clone();
        b.transform(&Matrix4::new_translation(&Vector3::new(0.0, 0.0, 5.0)));

        a.merge(&b);
        assert_eq!(a.vertex_count(), 6);
        assert_eq!(&a.indices[3..], &[3, 4, 5]);

        let (min, max) = a.bounds().unwrap();
        assert_relative_eq!(min.z, 0.0);
        assert_relative_eq!(max.z, 5.0);
        assert_relative_eq!(max.x, 2.0);
    }

    #[test]
    fn test_transform_rotates_normals() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0), Vector3::x());
        mesh.transform(&Matrix4::new_rotation(Vector3::z() * std::f64::consts::FRAC_PI_2));

        assert_relative_eq!(mesh.positions[1], 1.0, epsilon = 1e-6);
        assert_relative_eq!(mesh.normals[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_y_up_data_swaps_axes_and_winding() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Point3::new(1.0, 2.0, 3.0), Vector3::z());
        mesh.add_vertex(Point3::origin(), Vector3::z());
        mesh.add_vertex(Point3::origin(), Vector3::z());
        mesh.add_triangle(0, 1, 2);

        let data = mesh.to_y_up_data();
        assert_eq!(&data.positions[..3], &[1.0, 3.0, 2.0]);
        assert_eq!(&data.normals[..3], &[0.0, 1.0, 0.0]);
        assert_eq!(data.indices, vec![0, 2, 1]);
    }

    #[test]
    fn test_retain_valid_triangles() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Point3::origin(), Vector3::z());
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0), Vector3::z());
        mesh.add_vertex(Point3::new(0.0, 1.0, 0.0), Vector3::z());
        mesh.indices = vec![0, 1, 2, 0, 1, 7];
        mesh.retain_valid_triangles();
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }
}
