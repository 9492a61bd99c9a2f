// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{profile_rotation, SolidFrame};
use crate::error::{ImportError, Result};
use crate::hierarchy::StoreyEntry;
use crate::session::Session;
use ifc_bim_geometry::{extract_swept_solid, ProfileShape};
use ifc_bim_model::{
    BimElement, Bounds3, DecodedEntity, ElementData, Placement, Point2, Point3, Quaternion,
    WallData,
};

/// Thinnest wall recovered from a bounding box
pub const MIN_WALL_THICKNESS: f64 = 0.05;

impl Session<'_> {
    /// Axis, thickness and height from a rectangle swept solid, falling
    /// back to the mesh bounding box
    pub(crate) fn decode_wall(
        &self,
        entity: &DecodedEntity,
        storey: &StoreyEntry,
    ) -> Result<BimElement> {
        let (wall, base_z, bounds) = match self.parametric_wall(entity) {
            Ok((wall, base_z)) => (wall, base_z, None),
            Err(reason) => {
                log::info!("Wall {}: {reason}; using mesh bounds", entity.id);
                let bounds = self.world_bounds(entity).ok_or(ImportError::NoGeometry)?;
                (wall_from_bounds(&bounds), bounds.min.z, Some(bounds))
            }
        };

        let placement = Placement::new(
            Point3::new(wall.start.x, wall.start.y, base_z - storey.origin_z),
            Quaternion::from_yaw(wall.angle()),
        );
        let mut element =
            BimElement::new(String::new(), ElementData::Wall(wall)).with_placement(placement);
        element.geometry.bounds = bounds;
        Ok(element)
    }

    /// Wall and the world height of its base
    fn parametric_wall(&self, entity: &DecodedEntity) -> Result<(WallData, f64)> {
        let solid = extract_swept_solid(self.resolver(), entity)?;
        let ProfileShape::Rectangle { x_dim, y_dim, position } = &solid.profile else {
            return Err(ImportError::invalid("profile is not a rectangle"));
        };

        // Longer side runs along the wall
        let angle = profile_rotation(position);
        let (length, thickness, (dx, dy)) = if x_dim >= y_dim {
            (*x_dim, *y_dim, (angle.cos(), angle.sin()))
        } else {
            (*y_dim, *x_dim, (-angle.sin(), angle.cos()))
        };

        let placement = self.world_placement(entity);
        let frame = SolidFrame {
            placement: &placement,
            solid: &solid,
            unit_scale: self.unit_scale,
        };
        let center = solid.profile.center();
        let half = length / 2.0;

        let wall = WallData {
            start: frame.to_world(center.x - dx * half, center.y - dy * half),
            end: frame.to_world(center.x + dx * half, center.y + dy * half),
            thickness: frame.length(thickness).max(MIN_WALL_THICKNESS),
            height: frame.length(solid.depth),
            openings: Vec::new(),
        };
        Ok((wall, frame.base_z()))
    }
}

/// Midline of the box along its longer plan side
pub fn wall_from_bounds(bounds: &Bounds3) -> WallData {
    let size = bounds.size();
    let center = bounds.center();
    let (start, end, thickness) = if size.x >= size.y {
        (
            Point2::new(bounds.min.x, center.y),
            Point2::new(bounds.max.x, center.y),
            size.y,
        )
    } else {
        (
            Point2::new(center.x, bounds.min.y),
            Point2::new(center.x, bounds.max.y),
            size.x,
        )
    };

    WallData {
        start,
        end,
        thickness: thickness.max(MIN_WALL_THICKNESS),
        height: size.z,
        openings: Vec::new(),
    }
}
