// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D profile definitions and triangulation

use crate::error::{Error, Result};
use crate::triangulation::triangulate_polygon;
use nalgebra::{Matrix3, Point2};

/// 2D profile with optional holes
#[derive(Debug, Clone, PartialEq)]
pub struct Profile2D {
    /// Outer boundary
    pub outer: Vec<Point2<f64>>,
    pub holes: Vec<Vec<Point2<f64>>>,
}

/// Triangulated profile: every vertex (outer, then holes) and triangle indices
#[derive(Debug, Clone)]
pub struct Triangulation {
    pub points: Vec<Point2<f64>>,
    pub indices: Vec<usize>,
}

impl Profile2D {
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Rectangle centred at the origin
    pub fn rectangle(width: f64, height: f64) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::new(vec![
            Point2::new(-hw, -hh),
            Point2::new(hw, -hh),
            Point2::new(hw, hh),
            Point2::new(-hw, hh),
        ])
    }

    /// Circle centred at the origin
    ///
    /// `segments` defaults to an adaptive count.
    pub fn circle(radius: f64, segments: Option<usize>) -> Self {
        let segments = segments.unwrap_or_else(|| calculate_circle_segments(radius));
        let step = std::f64::consts::TAU / segments as f64;
        Self::new(
            (0..segments)
                .map(|i| {
                    let angle = step * i as f64;
                    Point2::new(radius * angle.cos(), radius * angle.sin())
                })
                .collect(),
        )
    }

    /// Polygon from a closed or open ring
    ///
    /// A repeated closing point is dropped.
    pub fn from_ring(mut points: Vec<Point2<f64>>) -> Self {
        if points.len() > 1 && (points[0] - points[points.len() - 1]).norm() < 1e-10 {
            points.pop();
        }
        Self::new(points)
    }

    /// Apply a 2D homogeneous transform (profile Position)
    pub fn transform(&mut self, matrix: &Matrix3<f64>) {
        let apply = |p: &mut Point2<f64>| *p = matrix.transform_point(p);
        self.outer.iter_mut().for_each(apply);
        self.holes.iter_mut().flatten().for_each(apply);
    }

    /// Triangulate the profile
    pub fn triangulate(&self) -> Result<Triangulation> {
        if self.outer.len() < 3 {
            return Err(Error::profile("Profile must have at least 3 vertices"));
        }

        let indices = triangulate_polygon(&self.outer, &self.holes)?;
        let points = self
            .outer
            .iter()
            .chain(self.holes.iter().filter(|h| h.len() >= 3).flatten())
            .copied()
            .collect();

        Ok(Triangulation { points, indices })
    }

    /// Shoelace area of the outer ring (positive when counter-clockwise)
    pub fn signed_area(&self) -> f64 {
        let n = self.outer.len();
        (0..n)
            .map(|i| {
                let (a, b) = (&self.outer[i], &self.outer[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            / 2.0
    }
}

/// Adaptive number of segments for a circle
#[inline]
pub fn calculate_circle_segments(radius: f64) -> usize {
    let segments = (radius.abs().sqrt() * 8.0).ceil() as usize;
    segments.clamp(8, 32)
}
