// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{profile_rotation, SolidFrame};
use crate::error::{ImportError, Result};
use crate::hierarchy::StoreyEntry;
use crate::session::Session;
use ifc_bim_geometry::{extract_swept_solid, ProfileShape};
use ifc_bim_model::{
    BimElement, ColumnData, ColumnProfile, DecodedEntity, ElementData, Placement, Point3,
    Quaternion,
};

impl Session<'_> {
    pub(crate) fn decode_column(
        &self,
        entity: &DecodedEntity,
        storey: &StoreyEntry,
    ) -> Result<BimElement> {
        let (column, placement, bounds) = match self.parametric_column(entity, storey) {
            Ok((column, placement)) => (column, placement, None),
            Err(reason) => {
                log::info!("Column {}: {reason}; using mesh bounds", entity.id);
                let bounds = self.world_bounds(entity).ok_or(ImportError::NoGeometry)?;
                let size = bounds.size();
                let center = bounds.center();
                let column = ColumnData {
                    profile: ColumnProfile::Rectangular,
                    width: size.x,
                    depth: size.y,
                    height: size.z,
                };
                let placement = Placement::new(
                    Point3::new(center.x, center.y, bounds.min.z - storey.origin_z),
                    Quaternion::default(),
                );
                (column, placement, Some(bounds))
            }
        };

        let mut element =
            BimElement::new(String::new(), ElementData::Column(column)).with_placement(placement);
        element.geometry.bounds = bounds;
        Ok(element)
    }

    fn parametric_column(
        &self,
        entity: &DecodedEntity,
        storey: &StoreyEntry,
    ) -> Result<(ColumnData, Placement)> {
        let solid = extract_swept_solid(self.resolver(), entity)?;
        let placement = self.world_placement(entity);
        let frame = SolidFrame {
            placement: &placement,
            solid: &solid,
            unit_scale: self.unit_scale,
        };

        let (profile, width, depth, yaw) = match &solid.profile {
            ProfileShape::Rectangle { x_dim, y_dim, position } => (
                ColumnProfile::Rectangular,
                frame.length(*x_dim),
                frame.length(*y_dim),
                frame.rotation_z() + profile_rotation(position),
            ),
            ProfileShape::Circle { radius, .. } => {
                let diameter = frame.length(radius * 2.0);
                (ColumnProfile::Circular, diameter, diameter, frame.rotation_z())
            }
            ProfileShape::Polygon(_) => {
                return Err(ImportError::invalid("polygonal column profile"))
            }
        };

        let center = solid.profile.center();
        let at = frame.to_world(center.x, center.y);
        let column = ColumnData {
            profile,
            width,
            depth,
            height: frame.length(solid.depth),
        };
        let placement = Placement::new(
            Point3::new(at.x, at.y, frame.base_z() - storey.origin_z),
            Quaternion::from_yaw(yaw),
        );
        Ok((column, placement))
    }
}
