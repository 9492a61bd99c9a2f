// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Doors and windows
//!
//! A filling is tied to its wall through the opening it fills. Size comes
//! from the overall dimensions when present, position from projecting the
//! element onto the wall axis.

use crate::error::{ImportError, Result};
use crate::hierarchy::{entity_uuid, StoreyEntry};
use crate::relations::{choose_position, position_on_wall, WallPosition};
use crate::session::{PendingOpening, Session};
use ifc_bim_geometry::{extract_swept_solid, ProfileShape, SweptSolid};
use ifc_bim_model::{
    BimElement, Bounds3, DecodedEntity, ElementData, ElementType, IfcModel, Opening,
    OpeningFillData, OpeningKind, Placement, Point2, Point3, Quaternion,
};
use uuid::Uuid;

impl Session<'_> {
    pub(crate) fn decode_fill(
        &mut self,
        entity: &DecodedEntity,
        id: Uuid,
        element_type: ElementType,
        storey: &StoreyEntry,
    ) -> Result<BimElement> {
        let host = self
            .model
            .relations()
            .host_of_filling(entity.id)
            .ok_or(ImportError::NoHostWall)?;
        let wall_index = *self.walls.get(&host).ok_or(ImportError::NoHostWall)?;
        let (wall_id, wall) = match self.elements.get(wall_index) {
            Some(BimElement {
                id,
                data: ElementData::Wall(wall),
                ..
            }) => (*id, wall.clone()),
            _ => return Err(ImportError::NoHostWall),
        };

        let placement = self.world_placement(entity);
        let solid = extract_swept_solid(self.resolver(), entity).ok();
        let bounds = self.world_bounds(entity);
        let (width, height) = self.fill_size(entity, solid.as_ref(), bounds.as_ref())?;

        let from_mesh = bounds.map(|b| position_on_wall(&wall, b.center().plan()));
        let at = Point2::new(placement.position.x, placement.position.y);
        let from_placement = position_on_wall(&wall, at);
        let position = choose_position(from_mesh, from_placement);
        if let WallPosition::FarOutside(t) = position {
            self.warn(format!(
                "{element_type} {} projects to {t:.2} along its host wall; centring it",
                entity.id
            ));
        }
        let t = position.value();

        let base_z = match (&solid, &bounds) {
            (Some(solid), _) => placement.position.z + solid.base_z() * self.unit_scale,
            (None, Some(bounds)) => bounds.min.z,
            (None, None) => placement.position.z,
        };
        let sill_height = base_z - storey.origin_z;

        let kind = match element_type {
            ElementType::Window => OpeningKind::Window,
            _ => OpeningKind::Door,
        };
        let opening_id = self
            .model
            .relations()
            .filled_opening(entity.id)
            .and_then(|opening| self.resolver().get(opening))
            .map(|opening| entity_uuid(&opening))
            .unwrap_or_else(Uuid::new_v4);
        self.openings.push(PendingOpening {
            wall: wall_index,
            opening: Opening {
                id: opening_id,
                kind,
                element_id: id,
                position_on_wall: t,
                width,
                height,
                sill_height,
            },
        });

        let fill = OpeningFillData {
            host_wall_id: Some(wall_id),
            position_on_wall: t,
            width,
            height,
            sill_height,
        };
        let data = match kind {
            OpeningKind::Window => ElementData::Window(fill),
            OpeningKind::Door => ElementData::Door(fill),
        };
        let at = wall.point_on_wall(t);
        let mut element = BimElement::new(String::new(), data).with_placement(Placement::new(
            Point3::new(at.x, at.y, 0.0),
            Quaternion::from_yaw(wall.angle()),
        ));
        element.geometry.bounds = bounds;
        Ok(element)
    }

    /// Width and height, metres
    ///
    /// OverallHeight (8) and OverallWidth (9) first, then the leaf's
    /// rectangle profile, then the bounding box.
    fn fill_size(
        &self,
        entity: &DecodedEntity,
        solid: Option<&SweptSolid>,
        bounds: Option<&Bounds3>,
    ) -> Result<(f64, f64)> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let overall = (
            entity.get_float(9).map(|w| w * self.unit_scale),
            entity.get_float(8).map(|h| h * self.unit_scale),
        );
        if let (Some(width), Some(height)) = overall {
            if positive(width) && positive(height) {
                return Ok((width, height));
            }
        }

        if let Some(SweptSolid {
            profile: ProfileShape::Rectangle { x_dim, .. },
            depth,
            ..
        }) = solid
        {
            return Ok((x_dim * self.unit_scale, depth * self.unit_scale));
        }

        let bounds = bounds.ok_or(ImportError::NoGeometry)?;
        let size = bounds.size();
        Ok((size.x.max(size.y), size.z))
    }
}
