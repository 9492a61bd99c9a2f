// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{polygon_area, polygon_perimeter, positive, Product};
use crate::error::Result;
use crate::session::Encoder;
use ifc_bim_model::{
    AttributeValue as V, BimElement, EntityId, IfcType, Quantity, QuantitySet, SpaceData, SpaceType,
};
use uuid::Uuid;

impl Encoder {
    pub(crate) fn encode_space(
        &mut self,
        element: &BimElement,
        space: &SpaceData,
        storey: Uuid,
    ) -> Result<Option<EntityId>> {
        if space.boundary.len() < 3 || !positive(space.height) {
            log::warn!("Skipping space '{}': degenerate boundary or height", element.name);
            return Ok(None);
        }

        let profile = self.arbitrary_profile(&space.boundary)?;
        let solid = self.extrude(profile, space.height, 0.0)?;
        let shape = self.product_shape(&[solid], "SweptSolid")?;
        let z = element.placement.position.z;
        let placement = self.element_placement(storey, 0.0, 0.0, z, 0.0)?;

        let interior = match space.space_type {
            SpaceType::Internal => "INTERNAL",
            SpaceType::External => "EXTERNAL",
        };
        let long_name = space
            .long_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(V::text)
            .unwrap_or(V::Null);
        let entity = self.write_product(
            IfcType::IfcSpace,
            Product::of(element, placement, shape).label(long_name),
            vec![V::enumeration("ELEMENT"), V::enumeration(interior), V::Null],
        )?;
        self.write_quantity_set(entity, &space_quantities(space))?;
        Ok(Some(entity))
    }
}

/// Base quantities; net volume equals gross
pub(crate) fn space_quantities(space: &SpaceData) -> QuantitySet {
    let area = polygon_area(&space.boundary);
    let volume = area * space.height;

    let mut set = QuantitySet::new("BaseQuantities");
    set.push(Quantity::area("GrossFloorArea", area));
    if let Some(net) = space.net_floor_area {
        set.push(Quantity::area("NetFloorArea", net));
    }
    set.push(Quantity::length("GrossPerimeter", polygon_perimeter(&space.boundary)));
    set.push(Quantity::volume("GrossVolume", volume));
    set.push(Quantity::volume("NetVolume", volume));
    set.push(Quantity::length("Height", space.height));
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ifc_bim_model::Point2;

    #[test]
    fn test_space_quantities() {
        let space = SpaceData {
            boundary: vec![
                Point2::new(0.0, 0.0),
                Point2::new(5.0, 0.0),
                Point2::new(5.0, 4.0),
                Point2::new(0.0, 4.0),
            ],
            height: 2.5,
            space_type: SpaceType::Internal,
            long_name: None,
            net_floor_area: Some(18.5),
        };
        let set = space_quantities(&space);
        assert_relative_eq!(set.get("GrossFloorArea").unwrap(), 20.0);
        assert_relative_eq!(set.get("NetFloorArea").unwrap(), 18.5);
        assert_relative_eq!(set.get("GrossPerimeter").unwrap(), 18.0);
        assert_relative_eq!(set.get("GrossVolume").unwrap(), 50.0);
        assert_eq!(set.get("NetVolume"), set.get("GrossVolume"));
    }
}
