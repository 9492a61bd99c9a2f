// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry encoder
//!
//! Profiles, extrusions, boundary representations and placements. All
//! solids are written in element-local, Z-up coordinates.

use crate::error::Result;
use crate::session::Encoder;
use ifc_bim_model::{AttributeValue as V, EntityId, IfcType, Point2};

impl Encoder {
    pub(crate) fn cartesian_point(&mut self, coords: &[f64]) -> Result<EntityId> {
        self.graph
            .add(IfcType::IfcCartesianPoint, vec![V::floats(coords.iter().copied())])
    }

    pub(crate) fn direction(&mut self, x: f64, y: f64, z: f64) -> Result<EntityId> {
        self.graph.add(IfcType::IfcDirection, vec![V::floats([x, y, z])])
    }

    /// 2D placement at `offset` with default axes
    fn placement_2d(&mut self, offset: Point2) -> Result<EntityId> {
        let location = self.cartesian_point(&[offset.x, offset.y])?;
        self.graph
            .add(IfcType::IfcAxis2Placement2D, vec![location.into(), V::Null])
    }

    /// 3D placement at `(x, y, z)` rotated about +Z by `rotation_z` radians
    pub(crate) fn axis_placement(
        &mut self,
        x: f64,
        y: f64,
        z: f64,
        rotation_z: f64,
    ) -> Result<EntityId> {
        let location = if x == 0.0 && y == 0.0 && z == 0.0 {
            self.shared.origin
        } else {
            self.cartesian_point(&[x, y, z])?
        };
        let ref_direction = if rotation_z == 0.0 {
            self.shared.axis_x
        } else {
            self.direction(rotation_z.cos(), rotation_z.sin(), 0.0)?
        };
        self.graph.add(
            IfcType::IfcAxis2Placement3D,
            vec![location.into(), self.shared.axis_z.into(), ref_direction.into()],
        )
    }

    /// Local placement relative to `parent`
    ///
    /// The frame's reference direction is `(cos θ, sin θ, 0)`.
    pub fn local_placement(
        &mut self,
        parent: Option<EntityId>,
        x: f64,
        y: f64,
        z: f64,
        rotation_z: f64,
    ) -> Result<EntityId> {
        let relative = self.axis_placement(x, y, z, rotation_z)?;
        self.graph
            .add(IfcType::IfcLocalPlacement, vec![parent.into(), relative.into()])
    }

    /// Rectangle of `width` along X and `depth` along Y, centred on `offset`
    pub fn rectangle_profile(
        &mut self,
        width: f64,
        depth: f64,
        offset: Point2,
    ) -> Result<EntityId> {
        let position = self.placement_2d(offset)?;
        self.graph.add(
            IfcType::IfcRectangleProfileDef,
            vec![
                V::enumeration("AREA"),
                V::Null,
                position.into(),
                width.into(),
                depth.into(),
            ],
        )
    }

    pub fn circle_profile(&mut self, radius: f64) -> Result<EntityId> {
        let position = self.placement_2d(Point2::default())?;
        self.graph.add(
            IfcType::IfcCircleProfileDef,
            vec![V::enumeration("AREA"), V::Null, position.into(), radius.into()],
        )
    }

    /// Closed polygon profile; the first point is repeated to close the ring
    pub fn arbitrary_profile(&mut self, points: &[Point2]) -> Result<EntityId> {
        let mut ring = Vec::with_capacity(points.len() + 1);
        for p in points {
            ring.push(self.cartesian_point(&[p.x, p.y])?);
        }
        if let Some(first) = ring.first().copied() {
            ring.push(first);
        }
        let polyline = self.graph.add(IfcType::IfcPolyline, vec![V::refs(ring)])?;
        self.graph.add(
            IfcType::IfcArbitraryClosedProfileDef,
            vec![V::enumeration("AREA"), V::Null, polyline.into()],
        )
    }

    /// Extrude `profile` along +Z from `(0, 0, z_offset)`
    pub fn extrude(&mut self, profile: EntityId, depth: f64, z_offset: f64) -> Result<EntityId> {
        let position = self.axis_placement(0.0, 0.0, z_offset, 0.0)?;
        self.extrude_at(profile, position, self.shared.axis_z, depth)
    }

    /// Extrude with an explicit solid position and direction
    pub(crate) fn extrude_at(
        &mut self,
        profile: EntityId,
        position: EntityId,
        direction: EntityId,
        depth: f64,
    ) -> Result<EntityId> {
        self.graph.add(
            IfcType::IfcExtrudedAreaSolid,
            vec![profile.into(), position.into(), direction.into(), depth.into()],
        )
    }

    /// Triangle soup as a faceted brep
    ///
    /// `vertices` are Y-up and converted to Z-up. Triangles referencing a
    /// vertex out of range are skipped.
    pub fn faceted_brep(&mut self, vertices: &[f32], indices: &[u32]) -> Result<EntityId> {
        let mut points = Vec::with_capacity(vertices.len() / 3);
        for v in vertices.chunks_exact(3) {
            let (x, y, z) = (v[0] as f64, v[2] as f64, v[1] as f64);
            points.push(self.cartesian_point(&[x, y, z])?);
        }

        let mut faces = Vec::with_capacity(indices.len() / 3);
        for tri in indices.chunks_exact(3) {
            let corners: Option<Vec<EntityId>> =
                tri.iter().map(|&i| points.get(i as usize).copied()).collect();
            let Some(corners) = corners else {
                continue;
            };
            let poly_loop = self.graph.add(IfcType::IfcPolyLoop, vec![V::refs(corners)])?;
            let bound = self
                .graph
                .add(IfcType::IfcFaceOuterBound, vec![poly_loop.into(), V::Bool(true)])?;
            faces.push(self.graph.add(IfcType::IfcFace, vec![V::refs([bound])])?);
        }

        let shell = self.graph.add(IfcType::IfcClosedShell, vec![V::refs(faces)])?;
        self.graph.add(IfcType::IfcFacetedBrep, vec![shell.into()])
    }

    /// Shape representation in the body context holding every solid
    pub fn shape_representation(
        &mut self,
        solids: &[EntityId],
        identifier: &str,
        kind: &str,
    ) -> Result<EntityId> {
        self.graph.add(
            IfcType::IfcShapeRepresentation,
            vec![
                self.shared.body_context.into(),
                identifier.into(),
                kind.into(),
                V::refs(solids.iter().copied()),
            ],
        )
    }

    /// Body representation wrapped in a product definition shape
    pub(crate) fn product_shape(&mut self, solids: &[EntityId], kind: &str) -> Result<EntityId> {
        let representation = self.shape_representation(solids, "Body", kind)?;
        self.graph.add(
            IfcType::IfcProductDefinitionShape,
            vec![V::Null, V::Null, V::refs([representation])],
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::session::Encoder;
    use approx::assert_relative_eq;
    use ifc_bim_model::{EntityResolver, IfcType, Point2};

    fn encoder() -> Encoder {
        let mut encoder = Encoder::default();
        encoder.write_context().unwrap();
        encoder
    }

    #[test]
    fn test_arbitrary_profile_closes_ring() {
        let mut encoder = encoder();
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let profile = encoder.arbitrary_profile(&square).unwrap();

        let graph = encoder.graph();
        let polyline = graph.get(graph.get(profile).unwrap().get_ref(2).unwrap()).unwrap();
        let points = polyline.get_refs(0);
        assert_eq!(points.len(), 5);
        assert_eq!(points.first(), points.last());
    }

    #[test]
    fn test_local_placement_reference_direction() {
        let mut encoder = encoder();
        let angle = 30f64.to_radians();
        let placement = encoder.local_placement(None, 1.0, 2.0, 0.0, angle).unwrap();

        let graph = encoder.graph();
        let local = graph.get(placement).unwrap();
        assert!(local.get(0).unwrap().is_null());
        let axis = graph.get(local.get_ref(1).unwrap()).unwrap();
        let ref_dir = graph.get(axis.get_ref(2).unwrap()).unwrap();
        let ratios: Vec<f64> = ref_dir
            .get_list(0)
            .unwrap()
            .iter()
            .filter_map(|v| v.as_float())
            .collect();
        assert_relative_eq!(ratios[0], angle.cos());
        assert_relative_eq!(ratios[1], angle.sin());
        assert_relative_eq!(ratios[2], 0.0);
    }

    #[test]
    fn test_faceted_brep_swaps_axes_and_skips_bad_triangles() {
        let mut encoder = encoder();
        let vertices = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0, 3.0];
        encoder.faceted_brep(&vertices, &[0, 1, 2, 0, 1, 7]).unwrap();

        let graph = encoder.graph();
        assert_eq!(graph.count_by_type(&IfcType::IfcFace), 1);

        // Y-up (0, 2, 3) becomes Z-up (0, 3, 2)
        let swapped = graph
            .entities_by_type(&IfcType::IfcCartesianPoint)
            .into_iter()
            .filter_map(|p| {
                let coords: Vec<f64> = p.get_list(0)?.iter().filter_map(|v| v.as_float()).collect();
                (coords.len() == 3).then_some(coords)
            })
            .any(|c| c == [0.0, 3.0, 2.0]);
        assert!(swapped);
    }

    #[test]
    fn test_extrude_along_z_with_offset() {
        let mut encoder = encoder();
        let profile = encoder.circle_profile(0.2).unwrap();
        let solid = encoder.extrude(profile, 3.0, -0.5).unwrap();

        let graph = encoder.graph();
        let solid = graph.get(solid).unwrap();
        assert_eq!(solid.get_float(3), Some(3.0));
        let position = graph.get(solid.get_ref(1).unwrap()).unwrap();
        let location = graph.get(position.get_ref(0).unwrap()).unwrap();
        assert_eq!(location.get_list(0).unwrap()[2].as_float(), Some(-0.5));
    }
}
