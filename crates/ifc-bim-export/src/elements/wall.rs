// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{positive, Product};
use crate::error::Result;
use crate::session::{Encoder, WallRef};
use ifc_bim_model::{BimElement, EntityId, IfcType, Point2, Quantity, QuantitySet, WallData};
use uuid::Uuid;

/// Length below which a wall has no usable axis
const MIN_WALL_LENGTH: f64 = 1e-6;

impl Encoder {
    /// Rectangle of length × thickness starting at the placement origin,
    /// run along local X and extruded by the height
    pub(crate) fn encode_wall(
        &mut self,
        element: &BimElement,
        wall: &WallData,
        storey: Uuid,
    ) -> Result<Option<EntityId>> {
        let length = wall.length();
        if !length.is_finite()
            || length <= MIN_WALL_LENGTH
            || !positive(wall.thickness)
            || !positive(wall.height)
        {
            log::warn!(
                "Skipping wall '{}': degenerate dimensions {:.3} x {:.3} x {:.3}",
                element.name,
                length,
                wall.thickness,
                wall.height
            );
            return Ok(None);
        }

        let offset = Point2::new(length / 2.0, 0.0);
        let profile = self.rectangle_profile(length, wall.thickness, offset)?;
        let solid = self.extrude(profile, wall.height, 0.0)?;
        let shape = self.product_shape(&[solid], "SweptSolid")?;
        let placement = self.element_placement(
            storey,
            wall.start.x,
            wall.start.y,
            element.placement.position.z,
            wall.angle(),
        )?;

        let product = Product::of(element, placement, shape);
        let entity = self.write_product(IfcType::IfcWallStandardCase, product, vec![])?;
        self.write_quantity_set(entity, &wall_quantities(wall))?;

        self.walls.insert(
            element.id,
            WallRef {
                entity,
                data: wall.clone(),
            },
        );
        Ok(Some(entity))
    }
}

/// Base quantities; openings are not subtracted, so net equals gross
pub fn wall_quantities(wall: &WallData) -> QuantitySet {
    let length = wall.length();
    let side_area = length * wall.height;
    let volume = side_area * wall.thickness;

    let mut set = QuantitySet::new("BaseQuantities");
    set.push(Quantity::length("Length", length));
    set.push(Quantity::length("Height", wall.height));
    set.push(Quantity::length("Width", wall.thickness));
    set.push(Quantity::area("GrossSideArea", side_area));
    set.push(Quantity::area("NetSideArea", side_area));
    set.push(Quantity::volume("GrossVolume", volume));
    set.push(Quantity::volume("NetVolume", volume));
    set
}
