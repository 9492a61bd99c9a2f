// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{positive, Product};
use crate::error::Result;
use crate::session::Encoder;
use ifc_bim_model::{
    compress_guid, new_global_id, AttributeValue as V, BimElement, ElementData, EntityId, IfcType,
    OpeningFillData, Point2, Quantity, QuantitySet,
};
use uuid::Uuid;

/// Leaf thickness of door and window geometry
const LEAF_THICKNESS: f64 = 0.05;

/// Opening solids are this much thicker than the host wall so they cut through
const OPENING_DEPTH_FACTOR: f64 = 1.1;

impl Encoder {
    /// Door or window: opening element voiding the host wall, filled by the
    /// element itself
    pub(crate) fn encode_fill(
        &mut self,
        element: &BimElement,
        fill: &OpeningFillData,
        storey: Uuid,
    ) -> Result<Option<EntityId>> {
        let kind = element.element_type().name();
        let Some(host) = fill.host_wall_id.and_then(|id| self.walls.get(&id)).cloned() else {
            log::warn!("Skipping {kind} '{}': no host wall", element.name);
            return Ok(None);
        };
        if !positive(fill.width) || !positive(fill.height) {
            log::warn!(
                "Skipping {kind} '{}': degenerate size {} x {}",
                element.name,
                fill.width,
                fill.height
            );
            return Ok(None);
        }

        let wall = &host.data;
        let position = wall.point_on_wall(fill.position_on_wall);
        let angle = wall.angle();
        let z = element.placement.position.z + fill.sill_height;

        // Opening element
        let opening_depth = wall.thickness * OPENING_DEPTH_FACTOR;
        let opening_profile = self.rectangle_profile(fill.width, opening_depth, Point2::default())?;
        let opening_solid = self.extrude(opening_profile, fill.height, 0.0)?;
        let opening_shape = self.product_shape(&[opening_solid], "SweptSolid")?;
        let opening_placement = self.element_placement(storey, position.x, position.y, z, angle)?;
        let opening_guid = wall
            .openings
            .iter()
            .find(|o| o.element_id == element.id)
            .map(|o| compress_guid(&o.id))
            .unwrap_or_else(new_global_id);
        let opening = self.write_product(
            IfcType::IfcOpeningElement,
            Product {
                global_id: opening_guid,
                name: "Opening",
                object_type: V::text("Opening"),
                placement: opening_placement,
                shape: opening_shape,
                label: V::Null,
            },
            vec![],
        )?;
        self.write_void(host.entity, opening)?;

        // Leaf
        let leaf_profile = self.rectangle_profile(fill.width, LEAF_THICKNESS, Point2::default())?;
        let leaf_solid = self.extrude(leaf_profile, fill.height, 0.0)?;
        let leaf_shape = self.product_shape(&[leaf_solid], "SweptSolid")?;
        let leaf_placement = self.element_placement(storey, position.x, position.y, z, angle)?;
        let ifc_type = match element.data {
            ElementData::Window(_) => IfcType::IfcWindow,
            _ => IfcType::IfcDoor,
        };
        let entity = self.write_product(
            ifc_type,
            Product::of(element, leaf_placement, leaf_shape),
            vec![fill.height.into(), fill.width.into()],
        )?;
        self.write_fill(opening, entity)?;

        let mut quantities = QuantitySet::new("BaseQuantities");
        quantities.push(Quantity::length("Height", fill.height));
        quantities.push(Quantity::length("Width", fill.width));
        self.write_quantity_set(entity, &quantities)?;

        Ok(Some(entity))
    }
}
