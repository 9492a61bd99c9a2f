// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation utilities
//!
//! Wrapper around earcutr for 2D polygons, plus the plane projection needed
//! to triangulate planar 3D faces.

use crate::{Error, Point2, Point3, Result, Vector3};

/// Triangulate a polygon with optional holes
///
/// Returns triangle indices into the outer ring followed by every hole with
/// at least three points, in order.
pub fn triangulate_polygon(
    outer: &[Point2<f64>],
    holes: &[Vec<Point2<f64>>],
) -> Result<Vec<usize>> {
    let n = outer.len();
    if n < 3 {
        return Err(Error::triangulation("Need at least 3 points to triangulate"));
    }

    let holes: Vec<&Vec<Point2<f64>>> = holes.iter().filter(|h| h.len() >= 3).collect();
    if holes.is_empty() {
        match n {
            3 => return Ok(vec![0, 1, 2]),
            4 if is_convex(outer) => return Ok(vec![0, 1, 2, 0, 2, 3]),
            _ => {}
        }
    }

    let mut vertices = Vec::with_capacity((n + holes.iter().map(|h| h.len()).sum::<usize>()) * 2);
    vertices.extend(outer.iter().flat_map(|p| [p.x, p.y]));

    let mut hole_starts = Vec::with_capacity(holes.len());
    for hole in holes {
        hole_starts.push(vertices.len() / 2);
        vertices.extend(hole.iter().flat_map(|p| [p.x, p.y]));
    }

    earcutr::earcut(&vertices, &hole_starts, 2).map_err(|e| Error::triangulation(format!("{e:?}")))
}

/// All turns of the ring go the same way
fn is_convex(points: &[Point2<f64>]) -> bool {
    let n = points.len();
    let mut sign = 0.0f64;

    for i in 0..n {
        let (p0, p1, p2) = (&points[i], &points[(i + 1) % n], &points[(i + 2) % n]);
        let cross = (p1.x - p0.x) * (p2.y - p1.y) - (p1.y - p0.y) * (p2.x - p1.x);
        if cross.abs() > 1e-10 {
            if sign != 0.0 && sign.signum() != cross.signum() {
                return false;
            }
            sign = cross;
        }
    }

    true
}

/// An orthonormal 2D frame lying in a face's plane
#[derive(Debug, Clone, Copy)]
pub struct PlaneBasis {
    pub origin: Point3<f64>,
    pub u: Vector3<f64>,
    pub v: Vector3<f64>,
}

impl PlaneBasis {
    /// Frame for the plane of `points`, using Newell's normal
    pub fn of_polygon(points: &[Point3<f64>]) -> Option<Self> {
        let origin = *points.first()?;
        let normal = polygon_normal(points);

        // Pick the world axis least aligned with the normal
        let reference = if normal.x.abs() <= normal.y.abs() && normal.x.abs() <= normal.z.abs() {
            Vector3::x()
        } else if normal.y.abs() <= normal.z.abs() {
            Vector3::y()
        } else {
            Vector3::z()
        };

        let u = normal.cross(&reference).try_normalize(1e-12)?;
        let v = normal.cross(&u).try_normalize(1e-12)?;
        Some(Self { origin, u, v })
    }

    pub fn project(&self, points: &[Point3<f64>]) -> Vec<Point2<f64>> {
        points
            .iter()
            .map(|p| {
                let d = p - self.origin;
                Point2::new(d.dot(&self.u), d.dot(&self.v))
            })
            .collect()
    }
}

/// Unit normal of a planar polygon (Newell's method); +Z when degenerate
pub fn polygon_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    let mut normal = Vector3::<f64>::zeros();

    for i in 0..n {
        let (a, b) = (&points[i], &points[(i + 1) % n]);
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }

    normal.try_normalize(1e-10).unwrap_or_else(Vector3::z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64, offset: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(offset, offset),
            Point2::new(offset + size, offset),
            Point2::new(offset + size, offset + size),
            Point2::new(offset, offset + size),
        ]
    }

    #[test]
    fn test_triangulate_square() {
        assert_eq!(triangulate_polygon(&square(1.0, 0.0), &[]).unwrap().len(), 6);
    }

    #[test]
    fn test_triangulate_concave_l_shape() {
        let l = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        assert_eq!(triangulate_polygon(&l, &[]).unwrap().len(), 12);
    }

    #[test]
    fn test_triangulate_with_hole() {
        let indices = triangulate_polygon(&square(4.0, 0.0), &[square(2.0, 1.0)]).unwrap();
        assert_eq!(indices.len(), 24);
        assert!(indices.iter().all(|&i| i < 8));
    }

    #[test]
    fn test_too_few_points() {
        assert!(triangulate_polygon(&square(1.0, 0.0)[..2], &[]).is_err());
    }

    #[test]
    fn test_polygon_normal_and_projection() {
        let pts = vec![
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 2.0, 1.0),
            Point3::new(0.0, 2.0, 3.0),
            Point3::new(0.0, 0.0, 3.0),
        ];
        let normal = polygon_normal(&pts);
        assert!((normal.x.abs() - 1.0).abs() < 1e-9);

        let basis = PlaneBasis::of_polygon(&pts).unwrap();
        let flat = basis.project(&pts);
        let side = (flat[1] - flat[0]).norm();
        assert!((side - 2.0).abs() < 1e-9);
    }
}
