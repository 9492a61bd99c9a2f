// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{positive, Product};
use crate::error::Result;
use crate::session::Encoder;
use ifc_bim_model::{AttributeValue as V, BimElement, EntityId, IfcType, SlabData, SlabType};
use uuid::Uuid;

impl Encoder {
    /// Outline extruded by the thickness; floors hang below the storey
    /// level, ceilings sit on it
    pub(crate) fn encode_slab(
        &mut self,
        element: &BimElement,
        slab: &SlabData,
        storey: Uuid,
    ) -> Result<Option<EntityId>> {
        if slab.outline.len() < 3 || !positive(slab.thickness) {
            log::warn!(
                "Skipping slab '{}': {} outline points, thickness {}",
                element.name,
                slab.outline.len(),
                slab.thickness
            );
            return Ok(None);
        }

        let base_z = slab_base(slab);
        let profile = self.arbitrary_profile(&slab.outline)?;
        let solid = self.extrude(profile, slab.thickness, base_z)?;
        let shape = self.product_shape(&[solid], "SweptSolid")?;
        let placement = self.element_placement(storey, 0.0, 0.0, 0.0, 0.0)?;

        let predefined = match slab.slab_type {
            SlabType::Floor => "FLOOR",
            SlabType::Ceiling => "ROOF",
        };
        let entity = self.write_product(
            IfcType::IfcSlab,
            Product::of(element, placement, shape),
            vec![V::enumeration(predefined)],
        )?;
        Ok(Some(entity))
    }
}

/// Underside of the slab relative to the storey elevation
pub(crate) fn slab_base(slab: &SlabData) -> f64 {
    let base = match slab.slab_type {
        SlabType::Floor => -slab.thickness,
        SlabType::Ceiling => 0.0,
    };
    base + slab.elevation_offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ifc_bim_model::Point2;

    fn slab(slab_type: SlabType) -> SlabData {
        SlabData {
            outline: vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(1.0, 1.0)],
            thickness: 0.25,
            slab_type,
            elevation_offset: 0.1,
        }
    }

    #[test]
    fn test_slab_base() {
        assert_relative_eq!(slab_base(&slab(SlabType::Floor)), -0.15);
        assert_relative_eq!(slab_base(&slab(SlabType::Ceiling)), 0.1);
    }
}
