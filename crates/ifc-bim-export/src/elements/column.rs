// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{positive, Product};
use crate::error::Result;
use crate::session::Encoder;
use ifc_bim_model::{BimElement, ColumnData, ColumnProfile, EntityId, IfcType, Point2};
use uuid::Uuid;

impl Encoder {
    pub(crate) fn encode_column(
        &mut self,
        element: &BimElement,
        column: &ColumnData,
        storey: Uuid,
    ) -> Result<Option<EntityId>> {
        let depth_ok = column.profile == ColumnProfile::Circular || positive(column.depth);
        if !positive(column.width) || !depth_ok || !positive(column.height) {
            log::warn!("Skipping column '{}': degenerate dimensions", element.name);
            return Ok(None);
        }

        let profile = match column.profile {
            ColumnProfile::Circular => self.circle_profile(column.width / 2.0)?,
            ColumnProfile::Rectangular => {
                self.rectangle_profile(column.width, column.depth, Point2::default())?
            }
        };
        let solid = self.extrude(profile, column.height, 0.0)?;
        let shape = self.product_shape(&[solid], "SweptSolid")?;
        let p = element.placement.position;
        let yaw = element.placement.rotation.yaw();
        let placement = self.element_placement(storey, p.x, p.y, p.z, yaw)?;

        let product = Product::of(element, placement, shape);
        let entity = self.write_product(IfcType::IfcColumn, product, vec![])?;
        Ok(Some(entity))
    }
}
