// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Swept-solid parameter extraction
//!
//! Recovers the parameters an element was built from (profile kind and
//! dimensions, extrusion depth, solid position) when its body is an
//! `IfcExtrudedAreaSolid`. Values are in file units.

use crate::placement::{axis2_placement_2d, axis2_placement_3d, read_direction, read_point};
use crate::profile::Profile2D;
use crate::{Error, Result};
use ifc_bim_model::{AttributeValue, DecodedEntity, EntityId, EntityResolver, IfcType};
use nalgebra::{Matrix3, Matrix4, Point2, Vector3};
use std::sync::Arc;

/// Representation identifiers treated as the element body
const BODY_IDENTIFIERS: [&str; 2] = ["Body", "Facetation"];

/// Profile of a swept solid
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileShape {
    Rectangle {
        x_dim: f64,
        y_dim: f64,
        /// Profile Position
        position: Matrix3<f64>,
    },
    Circle {
        radius: f64,
        position: Matrix3<f64>,
    },
    /// Closed outline without the repeated closing point
    Polygon(Vec<Point2<f64>>),
}

impl ProfileShape {
    /// Centre of the profile in the solid's local XY plane
    pub fn center(&self) -> Point2<f64> {
        match self {
            ProfileShape::Rectangle { position, .. } | ProfileShape::Circle { position, .. } => {
                Point2::new(position[(0, 2)], position[(1, 2)])
            }
            ProfileShape::Polygon(points) if !points.is_empty() => {
                let sum = points
                    .iter()
                    .fold(Vector3::zeros(), |acc, p| acc + Vector3::new(p.x, p.y, 0.0));
                let n = points.len() as f64;
                Point2::new(sum.x / n, sum.y / n)
            }
            ProfileShape::Polygon(_) => Point2::origin(),
        }
    }

    /// Outline ready for extrusion, profile Position applied
    pub fn to_profile(&self) -> Profile2D {
        match self {
            ProfileShape::Rectangle {
                x_dim,
                y_dim,
                position,
            } => {
                let mut profile = Profile2D::rectangle(*x_dim, *y_dim);
                profile.transform(position);
                profile
            }
            ProfileShape::Circle { radius, position } => {
                let mut profile = Profile2D::circle(*radius, None);
                profile.transform(position);
                profile
            }
            ProfileShape::Polygon(points) => Profile2D::new(points.clone()),
        }
    }
}

/// Parameters of an extruded area solid
#[derive(Debug, Clone, PartialEq)]
pub struct SweptSolid {
    pub profile: ProfileShape,
    pub depth: f64,
    /// Unit extrusion direction in the solid's frame
    pub direction: Vector3<f64>,
    /// Solid Position relative to the element placement
    pub position: Matrix4<f64>,
}

impl SweptSolid {
    /// Height of the solid's base above the element placement
    pub fn base_z(&self) -> f64 {
        if self.direction.z < 0.0 {
            self.position[(2, 3)] - self.depth
        } else {
            self.position[(2, 3)]
        }
    }
}

/// Representation items of the element's body
///
/// Follows `Representation` (index 6) to the product definition shape and
/// keeps shape representations identified as `Body` or `Facetation`, or
/// carrying no identifier.
pub fn body_items(
    resolver: &dyn EntityResolver,
    element: &DecodedEntity,
) -> Vec<Arc<DecodedEntity>> {
    let Some(shape) = element.get_ref(6).and_then(|id| resolver.get(id)) else {
        return Vec::new();
    };

    // IfcProductDefinitionShape: Name, Description, Representations
    let representations = shape
        .get(2)
        .map(|reps| resolver.resolve_ref_list(reps))
        .unwrap_or_default();

    representations
        .iter()
        .filter(|rep| rep.ifc_type == IfcType::IfcShapeRepresentation)
        .filter(|rep| match rep.get_string(1) {
            Some(identifier) => BODY_IDENTIFIERS.contains(&identifier),
            None => true,
        })
        .flat_map(|rep| {
            rep.get(3)
                .map(|items| resolver.resolve_ref_list(items))
                .unwrap_or_default()
        })
        .collect()
}

/// First extruded area solid of the element's body
pub fn extract_swept_solid(
    resolver: &dyn EntityResolver,
    element: &DecodedEntity,
) -> Result<SweptSolid> {
    let items = body_items(resolver, element);
    if items.is_empty() {
        return Err(Error::no_representation(format!("{} has no body items", element.id)));
    }

    let solid = items
        .iter()
        .find(|item| item.ifc_type == IfcType::IfcExtrudedAreaSolid)
        .ok_or_else(|| Error::no_representation(format!("{} has no extruded solid", element.id)))?;

    read_swept_solid(resolver, solid)
}

/// Read an `IfcExtrudedAreaSolid`
pub fn read_swept_solid(
    resolver: &dyn EntityResolver,
    solid: &DecodedEntity,
) -> Result<SweptSolid> {
    // SweptArea, Position, ExtrudedDirection, Depth
    let profile_id = solid
        .get_ref(0)
        .ok_or_else(|| Error::invalid_attribute(0, "Missing SweptArea"))?;
    let profile = resolver
        .get(profile_id)
        .ok_or_else(|| Error::entity_not_found(profile_id))?;
    let profile = read_profile(resolver, &profile)?;

    let depth = solid
        .get_float(3)
        .ok_or_else(|| Error::invalid_attribute(3, "Missing Depth"))?;

    let position = solid
        .get_ref(1)
        .and_then(|id| axis2_placement_3d(resolver, id))
        .unwrap_or_else(Matrix4::identity);

    let direction = solid
        .get_ref(2)
        .and_then(|id| read_direction(resolver, id))
        .and_then(|d| d.try_normalize(1e-12))
        .unwrap_or_else(Vector3::z);

    Ok(SweptSolid {
        profile,
        depth,
        direction,
        position,
    })
}

/// Read a rectangle, circle or arbitrary closed profile
pub fn read_profile(
    resolver: &dyn EntityResolver,
    profile: &DecodedEntity,
) -> Result<ProfileShape> {
    let position = |index: usize| {
        profile
            .get_ref(index)
            .and_then(|id| axis2_placement_2d(resolver, id))
            .unwrap_or_else(Matrix3::identity)
    };

    match profile.ifc_type {
        IfcType::IfcRectangleProfileDef => {
            // ProfileType, ProfileName, Position, XDim, YDim
            let x_dim = profile
                .get_float(3)
                .ok_or_else(|| Error::invalid_attribute(3, "Missing XDim"))?;
            let y_dim = profile
                .get_float(4)
                .ok_or_else(|| Error::invalid_attribute(4, "Missing YDim"))?;
            Ok(ProfileShape::Rectangle {
                x_dim,
                y_dim,
                position: position(2),
            })
        }
        IfcType::IfcCircleProfileDef => {
            // ProfileType, ProfileName, Position, Radius
            let radius = profile
                .get_float(3)
                .ok_or_else(|| Error::invalid_attribute(3, "Missing Radius"))?;
            Ok(ProfileShape::Circle {
                radius,
                position: position(2),
            })
        }
        IfcType::IfcArbitraryClosedProfileDef => {
            // ProfileType, ProfileName, OuterCurve
            let curve = profile
                .get_ref(2)
                .ok_or_else(|| Error::invalid_attribute(2, "Missing OuterCurve"))?;
            let points = read_polyline(resolver, curve)
                .ok_or_else(|| Error::profile(format!("OuterCurve {curve} is not a polyline")))?;
            let outline = Profile2D::from_ring(points).outer;
            if outline.len() < 3 {
                return Err(Error::profile("Outline needs at least 3 distinct points"));
            }
            Ok(ProfileShape::Polygon(outline))
        }
        ref other => Err(Error::unsupported_type(other.name())),
    }
}

/// Points of an `IfcPolyline`, in plan
pub fn read_polyline(resolver: &dyn EntityResolver, id: EntityId) -> Option<Vec<Point2<f64>>> {
    let polyline = resolver.get(id)?;
    if polyline.ifc_type != IfcType::IfcPolyline {
        return None;
    }
    polyline
        .get_list(0)?
        .iter()
        .map(|point| match point {
            AttributeValue::EntityRef(id) => {
                read_point(resolver, *id).map(|p| Point2::new(p.x, p.y))
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangle_center_and_outline() {
        let mut position = Matrix3::identity();
        position[(0, 2)] = 2.0;
        let shape = ProfileShape::Rectangle {
            x_dim: 4.0,
            y_dim: 0.2,
            position,
        };
        assert_eq!(shape.center(), Point2::new(2.0, 0.0));

        let profile = shape.to_profile();
        assert_relative_eq!(profile.outer[0].x, 0.0);
        assert_relative_eq!(profile.outer[2].x, 4.0);
    }

    #[test]
    fn test_polygon_center() {
        let shape = ProfileShape::Polygon(vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ]);
        assert_eq!(shape.center(), Point2::new(1.0, 1.0));
    }

    #[test]
    fn test_base_z_follows_direction() {
        let mut solid = SweptSolid {
            profile: ProfileShape::Polygon(Vec::new()),
            depth: 0.2,
            direction: Vector3::z(),
            position: Matrix4::new_translation(&Vector3::new(0.0, 0.0, 1.0)),
        };
        assert_relative_eq!(solid.base_z(), 1.0);
        solid.direction = -Vector3::z();
        assert_relative_eq!(solid.base_z(), 0.8);
    }
}
