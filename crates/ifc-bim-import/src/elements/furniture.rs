// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Furniture, counters and generic proxies
//!
//! A single rectangle solid gives exact dimensions. Anything else keeps
//! its local mesh so it can be written back as a brep.

use super::{profile_rotation, SolidFrame};
use crate::error::{ImportError, Result};
use crate::hierarchy::StoreyEntry;
use crate::session::Session;
use ifc_bim_geometry::{body_items, extract_swept_solid, ProfileShape};
use ifc_bim_model::{
    BimElement, DecodedEntity, ElementData, FurnitureData, Placement, Point3, Quaternion,
};

impl Session<'_> {
    pub(crate) fn decode_furniture(
        &self,
        entity: &DecodedEntity,
        storey: &StoreyEntry,
    ) -> Result<BimElement> {
        if let Some(element) = self.parametric_furniture(entity, storey) {
            return Ok(element);
        }

        let bounds = self.world_bounds(entity).ok_or(ImportError::NoGeometry)?;
        let size = bounds.size();
        let placement = self.world_placement(entity);
        let mesh = self.router.element_local_mesh(entity, self.resolver());

        let mut element = BimElement::new(
            String::new(),
            ElementData::Furniture(FurnitureData {
                width: size.x,
                depth: size.y,
                height: size.z,
            }),
        )
        .with_placement(Placement::new(
            Point3::new(
                placement.position.x,
                placement.position.y,
                placement.position.z - storey.origin_z,
            ),
            Quaternion::from_yaw(placement.rotation_z),
        ));
        element.geometry.bounds = Some(bounds);
        element.geometry.mesh = (!mesh.is_empty()).then(|| mesh.to_y_up_data());
        Ok(element)
    }

    /// Block furniture, when the body is one centred rectangle solid
    fn parametric_furniture(
        &self,
        entity: &DecodedEntity,
        storey: &StoreyEntry,
    ) -> Option<BimElement> {
        if body_items(self.resolver(), entity).len() != 1 {
            return None;
        }
        let solid = extract_swept_solid(self.resolver(), entity).ok()?;
        let ProfileShape::Rectangle { x_dim, y_dim, position } = &solid.profile else {
            return None;
        };

        let placement = self.world_placement(entity);
        let frame = SolidFrame {
            placement: &placement,
            solid: &solid,
            unit_scale: self.unit_scale,
        };
        let center = solid.profile.center();
        let at = frame.to_world(center.x, center.y);

        let element = BimElement::new(
            String::new(),
            ElementData::Furniture(FurnitureData {
                width: frame.length(*x_dim),
                depth: frame.length(*y_dim),
                height: frame.length(solid.depth),
            }),
        )
        .with_placement(Placement::new(
            Point3::new(at.x, at.y, frame.base_z() - storey.origin_z),
            Quaternion::from_yaw(frame.rotation_z() + profile_rotation(position)),
        ));
        Some(element)
    }
}
