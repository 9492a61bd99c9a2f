// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::slab::profile_outline;
use super::{bounds_outline, SolidFrame};
use crate::error::{ImportError, Result};
use crate::hierarchy::StoreyEntry;
use crate::session::Session;
use ifc_bim_geometry::extract_swept_solid;
use ifc_bim_model::{
    BimElement, DecodedEntity, ElementData, IfcModel, Placement, Point2, Point3, SpaceData,
    SpaceType,
};

impl Session<'_> {
    /// Boundary and height; LongName (7), `.EXTERNAL.` at index 9
    pub(crate) fn decode_space(
        &self,
        entity: &DecodedEntity,
        storey: &StoreyEntry,
    ) -> Result<BimElement> {
        let (boundary, height, base_z) = match self.parametric_space(entity) {
            Ok(space) => space,
            Err(reason) => {
                log::info!("Space {}: {reason}; using mesh bounds", entity.id);
                let bounds = self.world_bounds(entity).ok_or(ImportError::NoGeometry)?;
                (bounds_outline(&bounds), bounds.size().z, bounds.min.z)
            }
        };

        let space_type = match entity.get_enum(9) {
            Some("EXTERNAL") => SpaceType::External,
            _ => SpaceType::Internal,
        };
        let long_name = entity
            .get_string(7)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let net_floor_area = self
            .model
            .properties()
            .quantity(entity.id, "NetFloorArea")
            .map(|area| area * self.unit_scale * self.unit_scale);

        Ok(BimElement::new(
            String::new(),
            ElementData::Space(SpaceData {
                boundary,
                height,
                space_type,
                long_name,
                net_floor_area,
            }),
        )
        .with_placement(Placement {
            position: Point3::new(0.0, 0.0, base_z - storey.origin_z),
            ..Placement::default()
        }))
    }

    fn parametric_space(&self, entity: &DecodedEntity) -> Result<(Vec<Point2>, f64, f64)> {
        let solid = extract_swept_solid(self.resolver(), entity)?;
        let placement = self.world_placement(entity);
        let frame = SolidFrame {
            placement: &placement,
            solid: &solid,
            unit_scale: self.unit_scale,
        };
        let boundary = profile_outline(&frame, &solid)?;
        Ok((boundary, frame.length(solid.depth), frame.base_z()))
    }
}
