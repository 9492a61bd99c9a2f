// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry Processors - one per representation item type
//!
//! Each processor turns one item into a mesh in the item's own coordinate
//! frame; the router applies placements and scaling afterwards.

use crate::extraction::read_swept_solid;
use crate::extrusion::{direction_shear, extrude_profile};
use crate::placement::read_point;
use crate::router::GeometryProcessor;
use crate::triangulation::{triangulate_polygon, PlaneBasis};
use crate::{Error, Mesh, Point3, Result};
use ifc_bim_model::{AttributeValue, DecodedEntity, EntityId, EntityResolver, IfcType};
use nalgebra::{Matrix4, Vector3};

/// ExtrudedAreaSolid processor
///
/// Handles IfcExtrudedAreaSolid with rectangle, circle and arbitrary closed
/// profiles.
#[derive(Debug, Default)]
pub struct ExtrudedAreaSolidProcessor;

impl ExtrudedAreaSolidProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryProcessor for ExtrudedAreaSolidProcessor {
    fn process(&self, entity: &DecodedEntity, resolver: &dyn EntityResolver) -> Result<Mesh> {
        let solid = read_swept_solid(resolver, entity)?;
        let profile = solid.profile.to_profile();

        let d = solid.direction;
        let extrusion = if d.x.abs() < 1e-3 && d.y.abs() < 1e-3 {
            // Along Z; a downward extrusion starts depth below the position
            (d.z < 0.0).then(|| Matrix4::new_translation(&Vector3::new(0.0, 0.0, -solid.depth)))
        } else {
            direction_shear(&d)
        };

        let mut mesh = extrude_profile(&profile, solid.depth, extrusion)?;
        mesh.transform(&solid.position);
        Ok(mesh)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcExtrudedAreaSolid]
    }
}

/// TriangulatedFaceSet processor
///
/// Handles IfcTriangulatedFaceSet, explicit triangle meshes with 1-based
/// indices into an IfcCartesianPointList3D.
#[derive(Debug, Default)]
pub struct TriangulatedFaceSetProcessor;

impl TriangulatedFaceSetProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryProcessor for TriangulatedFaceSetProcessor {
    fn process(&self, entity: &DecodedEntity, resolver: &dyn EntityResolver) -> Result<Mesh> {
        // Coordinates, Normals, Closed, CoordIndex
        let coord_id = entity
            .get_ref(0)
            .ok_or_else(|| Error::invalid_attribute(0, "Missing Coordinates"))?;
        let coords = resolver
            .get(coord_id)
            .ok_or_else(|| Error::entity_not_found(coord_id))?;
        let coord_list = coords
            .get_list(0)
            .ok_or_else(|| Error::invalid_attribute(0, "Missing CoordList"))?;

        let mut positions = Vec::with_capacity(coord_list.len() * 3);
        for coord in coord_list {
            let point = coord.as_list().unwrap_or_default();
            for axis in 0..3 {
                positions.push(point.get(axis).and_then(|v| v.as_float()).unwrap_or(0.0) as f32);
            }
        }

        let faces = entity
            .get_list(3)
            .ok_or_else(|| Error::invalid_attribute(3, "Missing CoordIndex"))?;

        // 1-based; index 0 and out-of-range triangles are dropped below
        let mut indices = Vec::with_capacity(faces.len() * 3);
        for face in faces {
            let Some(triangle) = face.as_list().filter(|t| t.len() >= 3) else {
                continue;
            };
            let corners: Option<Vec<u32>> = triangle[..3]
                .iter()
                .map(|v| v.as_integer().and_then(|i| u32::try_from(i).ok()?.checked_sub(1)))
                .collect();
            if let Some(corners) = corners {
                indices.extend(corners);
            }
        }

        let mut mesh = Mesh {
            positions,
            normals: Vec::new(),
            indices,
        };
        mesh.retain_valid_triangles();
        Ok(mesh)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcTriangulatedFaceSet]
    }
}

/// FacetedBrep processor
///
/// Handles IfcFacetedBrep: a closed shell of planar faces, each bounded by
/// poly loops. Inner bounds become holes.
#[derive(Debug, Default)]
pub struct FacetedBrepProcessor;

impl FacetedBrepProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Points of an IfcPolyLoop, `None` below three
    fn loop_points(
        &self,
        loop_id: EntityId,
        resolver: &dyn EntityResolver,
    ) -> Option<Vec<Point3<f64>>> {
        let poly_loop = resolver.get(loop_id)?;
        let points: Vec<Point3<f64>> = poly_loop
            .get_list(0)?
            .iter()
            .filter_map(|p| p.as_entity_ref())
            .filter_map(|id| read_point(resolver, id))
            .collect();
        (points.len() >= 3).then_some(points)
    }

    /// Outer loop and holes of one IfcFace
    fn face_loops(
        &self,
        face: &DecodedEntity,
        resolver: &dyn EntityResolver,
    ) -> Option<(Vec<Point3<f64>>, Vec<Vec<Point3<f64>>>)> {
        let mut outer: Option<Vec<Point3<f64>>> = None;
        let mut holes = Vec::new();

        for bound in resolver.resolve_ref_list(face.get(0)?) {
            let points = bound.get_ref(0).and_then(|id| self.loop_points(id, resolver));
            let Some(mut points) = points else {
                continue;
            };

            // Orientation .F. reverses the loop
            if bound.get(1).and_then(AttributeValue::as_bool) == Some(false) {
                points.reverse();
            }

            if bound.ifc_type == IfcType::IfcFaceOuterBound || outer.is_none() {
                if let Some(previous) = outer.replace(points) {
                    holes.push(previous);
                }
            } else {
                holes.push(points);
            }
        }

        outer.map(|outer| (outer, holes))
    }

    /// Triangulate one planar face into `mesh`
    fn triangulate_face(&self, outer: &[Point3<f64>], holes: &[Vec<Point3<f64>>], mesh: &mut Mesh) {
        let base = mesh.vertex_count() as u32;
        let push_all = |mesh: &mut Mesh, points: &[Point3<f64>]| {
            for p in points {
                mesh.positions.extend([p.x as f32, p.y as f32, p.z as f32]);
            }
        };

        let fan = |mesh: &mut Mesh| {
            for i in 1..outer.len() as u32 - 1 {
                mesh.add_triangle(base, base + i, base + i + 1);
            }
        };

        if holes.is_empty() && outer.len() <= 4 {
            push_all(mesh, outer);
            fan(mesh);
            return;
        }

        let triangulated = PlaneBasis::of_polygon(outer).and_then(|basis| {
            let holes_2d: Vec<_> = holes.iter().map(|h| basis.project(h)).collect();
            triangulate_polygon(&basis.project(outer), &holes_2d).ok()
        });

        push_all(mesh, outer);
        match triangulated {
            Some(indices) => {
                for hole in holes.iter().filter(|h| h.len() >= 3) {
                    push_all(mesh, hole);
                }
                mesh.indices.extend(indices.iter().map(|&i| base + i as u32));
            }
            None => fan(mesh),
        }
    }
}

impl GeometryProcessor for FacetedBrepProcessor {
    fn process(&self, entity: &DecodedEntity, resolver: &dyn EntityResolver) -> Result<Mesh> {
        // Outer (IfcClosedShell) -> CfsFaces
        let shell_id = entity
            .get_ref(0)
            .ok_or_else(|| Error::invalid_attribute(0, "Missing Outer shell"))?;
        let shell = resolver
            .get(shell_id)
            .ok_or_else(|| Error::entity_not_found(shell_id))?;
        let faces = shell
            .get(0)
            .map(|faces| resolver.resolve_ref_list(faces))
            .ok_or_else(|| Error::invalid_attribute(0, "Missing CfsFaces"))?;

        let mut mesh = Mesh::new();
        for face in faces {
            if let Some((outer, holes)) = self.face_loops(&face, resolver) {
                self.triangulate_face(&outer, &holes, &mut mesh);
            }
        }

        // Face meshes carry no normals
        mesh.normals.clear();
        Ok(mesh)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcFacetedBrep]
    }
}
