// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{positive, Product};
use crate::error::Result;
use crate::session::Encoder;
use ifc_bim_model::{BimElement, EntityId, FurnitureData, IfcType, Point2};
use uuid::Uuid;

impl Encoder {
    /// Mesh as a faceted brep when one is attached, otherwise a block
    pub(crate) fn encode_furniture(
        &mut self,
        element: &BimElement,
        furniture: &FurnitureData,
        storey: Uuid,
    ) -> Result<Option<EntityId>> {
        let mesh = element.geometry.mesh.as_ref().filter(|m| !m.is_empty());

        let shape = match mesh {
            Some(mesh) => {
                let brep = self.faceted_brep(&mesh.positions, &mesh.indices)?;
                self.product_shape(&[brep], "Brep")?
            }
            None => {
                if !positive(furniture.width)
                    || !positive(furniture.depth)
                    || !positive(furniture.height)
                {
                    log::warn!("Skipping furniture '{}': degenerate dimensions", element.name);
                    return Ok(None);
                }
                let profile =
                    self.rectangle_profile(furniture.width, furniture.depth, Point2::default())?;
                let solid = self.extrude(profile, furniture.height, 0.0)?;
                self.product_shape(&[solid], "SweptSolid")?
            }
        };

        let p = element.placement.position;
        let yaw = element.placement.rotation.yaw();
        let placement = self.element_placement(storey, p.x, p.y, p.z, yaw)?;
        let product = Product::of(element, placement, shape);
        let entity = self.write_product(IfcType::IfcFurnishingElement, product, vec![])?;
        Ok(Some(entity))
    }
}
